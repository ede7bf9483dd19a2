//! Menu items, availability and staff menu rows

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Category label used for staff rows without one
pub const UNCATEGORIZED: &str = "Other";

/// A menu item recommended by the backend
///
/// Only ever received from chat responses; never built from guest input.
/// Rows straight from the menu sheet use its Japanese column headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(alias = "メニュー名")]
    pub name: String,
    #[serde(default, alias = "カテゴリー", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, alias = "価格", deserialize_with = "deserialize_price")]
    pub price: f64,
    #[serde(default, alias = "魅力・特徴", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, alias = "アレルギー・注意", skip_serializing_if = "Option::is_none")]
    pub allergens: Option<String>,
    #[serde(
        default,
        alias = "chefsNote",
        skip_serializing_if = "Option::is_none"
    )]
    pub chefs_note: Option<String>,
    /// Chef in charge of the dish
    #[serde(default, alias = "担当シェフ", skip_serializing_if = "Option::is_none")]
    pub chef: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Sheet cells arrive as numbers, numeric strings, `"$8.50"` or blanks
fn deserialize_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Price {
        Number(f64),
        Text(String),
    }

    let price = match Option::<Price>::deserialize(deserializer)? {
        Some(Price::Number(n)) => n,
        Some(Price::Text(text)) => {
            let text = text.trim().trim_start_matches('$').replace(',', "");
            text.parse::<f64>().unwrap_or(0.0)
        }
        None => 0.0,
    };
    Ok(if price.is_finite() { price.max(0.0) } else { 0.0 })
}

impl MenuItem {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            category: None,
            price: price.max(0.0),
            description: None,
            allergens: None,
            chefs_note: None,
            chef: None,
            image_url: None,
        }
    }

    /// Price for display; zero or negative prices are not shown
    pub fn display_price(&self) -> Option<f64> {
        (self.price > 0.0).then_some(self.price)
    }

    /// Description for display; the sheet uses "TBD" as a placeholder
    pub fn display_description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty() && *d != "TBD")
    }
}

/// Availability of one menu item, keyed by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityEntry {
    pub name: String,
    pub available: bool,
}

/// Latest polled availability, joined to menu items by name
#[derive(Debug, Clone, Default)]
pub struct AvailabilitySet {
    entries: HashMap<String, bool>,
}

impl AvailabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole set with a fresh poll result
    pub fn replace(&mut self, entries: impl IntoIterator<Item = AvailabilityEntry>) {
        self.entries = entries
            .into_iter()
            .map(|entry| (entry.name, entry.available))
            .collect();
    }

    /// Fail-open: items without an entry are available
    pub fn is_item_available(&self, name: &str) -> bool {
        self.entries.get(name).copied().unwrap_or(true)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<AvailabilityEntry> for AvailabilitySet {
    fn from_iter<T: IntoIterator<Item = AvailabilityEntry>>(iter: T) -> Self {
        let mut set = Self::new();
        set.replace(iter);
        set
    }
}

/// A row of the staff menu-control view
///
/// The menu sheet uses Japanese column headers; English names are accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMenuItem {
    #[serde(rename = "メニュー名", alias = "name")]
    pub name: String,
    #[serde(rename = "カテゴリー", alias = "category", default)]
    pub category: String,
    #[serde(rename = "提供中", alias = "available", default)]
    pub available: bool,
}

/// Group staff rows by category, preserving first-seen category order
pub fn group_by_category(items: &[StaffMenuItem]) -> Vec<(String, Vec<StaffMenuItem>)> {
    let mut groups: Vec<(String, Vec<StaffMenuItem>)> = Vec::new();
    for item in items {
        let category = match item.category.trim() {
            "" => UNCATEGORIZED,
            c => c,
        };
        match groups.iter_mut().find(|(name, _)| name == category) {
            Some((_, members)) => members.push(item.clone()),
            None => groups.push((category.to_string(), vec![item.clone()])),
        }
    }
    groups
}
