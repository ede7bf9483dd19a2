//! Plain-text rendering of chat messages and staff menus

use concierge_agent::SessionState;
use concierge_core::{MenuItem, Message, Role, StaffMenuItem};

pub(crate) fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("${:.0}", price)
    } else {
        format!("${:.2}", price)
    }
}

/// One menu card; unavailable items carry a sold-out marker
pub(crate) fn menu_card(item: &MenuItem, available: bool) -> String {
    let mut head = format!("  * {}", item.name);
    if let Some(price) = item.display_price() {
        head.push_str(&format!("  {}", format_price(price)));
    }
    if let Some(category) = item.category.as_deref().filter(|c| !c.is_empty()) {
        head.push_str(&format!("  [{}]", category));
    }
    if !available {
        head.push_str("  (sold out)");
    }

    let mut lines = vec![head];
    if let Some(description) = item.display_description() {
        lines.push(format!("      {}", description));
    }
    if let Some(allergens) = item.allergens.as_deref().filter(|a| !a.is_empty()) {
        lines.push(format!("      Allergens: {}", allergens));
    }
    if let Some(note) = item.chefs_note.as_deref().filter(|n| !n.is_empty()) {
        lines.push(format!("      Chef's note: {}", note));
    }
    if let Some(chef) = item.chef.as_deref().filter(|c| !c.is_empty()) {
        lines.push(format!("      Chef: {}", chef));
    }
    lines.join("\n")
}

pub(crate) fn message(message: &Message, state: &SessionState) -> String {
    let speaker = match message.role {
        Role::User => "you",
        Role::Assistant => "concierge",
    };
    let mut out = format!("{}> {}", speaker, message.content);
    for item in message.menu_items.iter().flatten() {
        out.push('\n');
        out.push_str(&menu_card(item, state.is_item_available(&item.name)));
    }
    if let Some(feedback) = &message.feedback {
        out.push_str(&format!("\n  [coach] {}", feedback));
    }
    out
}

pub(crate) fn staff_menu(groups: &[(String, Vec<StaffMenuItem>)]) -> String {
    let mut out = String::new();
    for (category, items) in groups {
        out.push_str(&format!("{}\n", category));
        for item in items {
            let mark = if item.available { "on " } else { "off" };
            out.push_str(&format!("  [{}] {}\n", mark, item.name));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_core::AvailabilityEntry;

    #[test]
    fn test_price_formatting() {
        assert_eq!(format_price(12.0), "$12");
        assert_eq!(format_price(8.5), "$8.50");
    }

    #[test]
    fn test_card_hides_placeholder_fields() {
        let mut item = MenuItem::new("Edamame", 0.0);
        item.description = Some("TBD".to_string());
        item.allergens = Some("soy".to_string());
        let card = menu_card(&item, true);
        assert_eq!(card, "  * Edamame\n      Allergens: soy");

        item.chef = Some("Ken".to_string());
        assert!(menu_card(&item, true).ends_with("\n      Chef: Ken"));
    }

    #[test]
    fn test_sold_out_marker_from_availability() {
        let state = SessionState::default();
        state.replace_availability(vec![AvailabilityEntry {
            name: "Karaage".to_string(),
            available: false,
        }]);

        let mut log = concierge_core::MessageLog::new("welcome");
        let mut karaage = MenuItem::new("Karaage", 9.0);
        karaage.category = Some("Fried".to_string());
        let reply = log
            .push_assistant("Try these", vec![karaage, MenuItem::new("Gyoza", 7.5)])
            .clone();

        let text = message(&reply, &state);
        assert!(text.contains("Karaage  $9  [Fried]  (sold out)"));
        assert!(text.contains("Gyoza  $7.50\n") || text.ends_with("Gyoza  $7.50"));
    }

    #[test]
    fn test_staff_groups() {
        let groups = vec![(
            "Drinks".to_string(),
            vec![StaffMenuItem {
                name: "Highball".to_string(),
                category: "Drinks".to_string(),
                available: false,
            }],
        )];
        assert_eq!(staff_menu(&groups), "Drinks\n  [off] Highball\n");
    }
}
