mod common;

use std::sync::atomic::Ordering;

use common::{harness, test_settings, STAFF_PASSWORD};
use concierge_agent::AgentError;
use concierge_core::StaffMenuItem;

fn item(name: &str, category: &str, available: bool) -> StaffMenuItem {
    StaffMenuItem {
        name: name.to_string(),
        category: category.to_string(),
        available,
    }
}

fn stock(h: &common::Harness) {
    *h.backend.staff_items.lock() = vec![
        item("Karaage", "Fried", true),
        item("Highball", "Drinks", true),
        item("Takoyaki", "Fried", false),
        item("Mystery", "", true),
    ];
}

#[tokio::test]
async fn test_wrong_password_stays_logged_out() {
    let h = harness(&test_settings());
    stock(&h);
    let staff = h.concierge.staff();

    assert!(matches!(
        staff.login("guess").await,
        Err(AgentError::Unauthorized)
    ));
    assert!(!staff.is_logged_in());
    assert!(matches!(
        staff.toggle("Karaage").await,
        Err(AgentError::NotLoggedIn)
    ));
}

#[tokio::test]
async fn test_login_and_group_in_first_seen_order() {
    let h = harness(&test_settings());
    stock(&h);
    let staff = h.concierge.staff();

    assert_eq!(staff.login(STAFF_PASSWORD).await.unwrap(), 4);
    assert!(staff.is_logged_in());

    let groups = staff.grouped();
    let names: Vec<&str> = groups.iter().map(|(c, _)| c.as_str()).collect();
    assert_eq!(names, vec!["Fried", "Drinks", "Other"]);
    assert_eq!(groups[0].1.len(), 2);
    assert_eq!(groups[2].1[0].name, "Mystery");
}

#[tokio::test]
async fn test_toggle_is_optimistic_and_posts_new_value() {
    let h = harness(&test_settings());
    stock(&h);
    let staff = h.concierge.staff();
    staff.login(STAFF_PASSWORD).await.unwrap();

    assert!(!staff.toggle("Karaage").await.unwrap());
    assert!(!staff.items()[0].available);

    let toggles = h.backend.toggles.lock();
    assert_eq!(toggles[0].menu_name, "Karaage");
    assert!(!toggles[0].available);
}

#[tokio::test]
async fn test_failed_toggle_reverts() {
    let h = harness(&test_settings());
    stock(&h);
    let staff = h.concierge.staff();
    staff.login(STAFF_PASSWORD).await.unwrap();

    h.backend.toggle_fail.store(true, Ordering::SeqCst);
    assert!(matches!(
        staff.toggle("Takoyaki").await,
        Err(AgentError::Backend(_))
    ));
    assert!(!staff.items()[2].available);
}

#[tokio::test]
async fn test_unknown_item_rejected() {
    let h = harness(&test_settings());
    stock(&h);
    let staff = h.concierge.staff();
    staff.login(STAFF_PASSWORD).await.unwrap();

    assert!(matches!(
        staff.toggle("Sushi").await,
        Err(AgentError::InvalidInput(_))
    ));
    assert!(h.backend.toggles.lock().is_empty());
}

#[tokio::test]
async fn test_logout_clears_items() {
    let h = harness(&test_settings());
    stock(&h);
    let staff = h.concierge.staff();
    staff.login(STAFF_PASSWORD).await.unwrap();
    assert_eq!(staff.refresh().await.unwrap(), 4);

    staff.logout();
    assert!(staff.items().is_empty());
    assert!(matches!(staff.refresh().await, Err(AgentError::NotLoggedIn)));
}
