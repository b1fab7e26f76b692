//! Structured product suggestions embedded in advisor replies.

use std::{collections::HashMap, fmt};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Transaction, TransactionKind};

use super::Citation;

pub const DATA_START: &str = "___DATA_START___";
pub const DATA_END: &str = "___DATA_END___";
const DEFAULT_BRAND: &str = "Generic";
const DEFAULT_CATEGORY: &str = "Groceries";
const PURCHASE_FALLBACK_CATEGORY: &str = "Shopping";

static DATA_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)___DATA_START___(.*?)___DATA_END___").expect("valid data block pattern")
});
static ITEM_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<item\s+([^>]+)/>").expect("valid item pattern"));
static ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([A-Za-z_]+)="([^"]*)""#).expect("valid attribute pattern"));
static LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d*\.?\d*").expect("valid number pattern"));

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ShoppingKind {
    Cheapest,
    Healthier,
    Sale,
    General,
}

impl ShoppingKind {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "cheapest" => ShoppingKind::Cheapest,
            "healthier" => ShoppingKind::Healthier,
            "sale" => ShoppingKind::Sale,
            _ => ShoppingKind::General,
        }
    }
}

impl fmt::Display for ShoppingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ShoppingKind::Cheapest => "cheapest",
            ShoppingKind::Healthier => "healthier",
            ShoppingKind::Sale => "sale",
            ShoppingKind::General => "general",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItem {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: ShoppingKind,
    pub name: String,
    pub brand: String,
    pub price: f64,
    pub store: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub reason: String,
}

impl ShoppingItem {
    /// The expense recorded when the user confirms buying this item.
    pub fn to_expense(&self, date: DateTime<Utc>) -> Transaction {
        let category = if self.category.trim().is_empty() {
            PURCHASE_FALLBACK_CATEGORY
        } else {
            self.category.as_str()
        };
        Transaction::new(
            TransactionKind::Expense,
            self.price,
            category,
            format!("{} {} ({})", self.brand, self.name, self.store),
            date,
        )
    }
}

/// Parsed shopping reply: suggestions plus the surrounding prose.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShoppingInsight {
    pub items: Vec<ShoppingItem>,
    pub narrative: String,
    pub sources: Vec<Citation>,
}

/// Free-text product search reply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchInsight {
    pub text: String,
    pub sources: Vec<Citation>,
}

/// Splits a reply into the `<item .../>` records found between the data
/// markers and the narrative with the block removed. A missing or unterminated
/// block yields no items and leaves the narrative intact.
pub fn parse_shopping_block(text: &str) -> (Vec<ShoppingItem>, String) {
    let Some(block) = DATA_BLOCK.captures(text) else {
        return (Vec::new(), text.trim().to_string());
    };
    let items = block
        .get(1)
        .map(|body| ITEM_TAG.captures_iter(body.as_str()).map(|tag| parse_item(&tag[1])).collect())
        .unwrap_or_default();
    let narrative = DATA_BLOCK.replace(text, "").trim().to_string();
    (items, narrative)
}

fn parse_item(attributes: &str) -> ShoppingItem {
    let mut values: HashMap<String, String> = HashMap::new();
    for capture in ATTRIBUTE.captures_iter(attributes) {
        values
            .entry(capture[1].to_string())
            .or_insert_with(|| capture[2].to_string());
    }
    let get = |name: &str| values.get(name).cloned().unwrap_or_default();
    let non_empty = |name: &str, fallback: &str| {
        let value = get(name);
        if value.trim().is_empty() {
            fallback.to_string()
        } else {
            value
        }
    };
    let image_url = Some(get("imageUrl")).filter(|url| !url.trim().is_empty());

    ShoppingItem {
        id: Uuid::new_v4(),
        kind: ShoppingKind::parse(&get("type")),
        name: get("name"),
        brand: non_empty("brand", DEFAULT_BRAND),
        price: parse_price(&get("price")),
        store: get("store"),
        category: non_empty("category", DEFAULT_CATEGORY),
        image_url,
        reason: get("reason"),
    }
}

/// Keeps digits and dots only, then reads the longest leading number, so
/// `R 1,299.00` is 1299 and a trailing full stop in `R45.99.` is ignored.
fn parse_price(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    LEADING_NUMBER
        .find(&cleaned)
        .and_then(|number| number.as_str().parse::<f64>().ok())
        .filter(|price| price.is_finite())
        .unwrap_or(0.0)
}

/// Items set aside while browsing suggestions.
#[derive(Debug, Clone, Default)]
pub struct ShoppingCart {
    items: Vec<ShoppingItem>,
}

impl ShoppingCart {
    /// Adds `item` unless it is already in the cart.
    pub fn add(&mut self, item: ShoppingItem) -> bool {
        if self.items.iter().any(|existing| existing.id == item.id) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn remove(&mut self, id: Uuid) -> Option<ShoppingItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn items(&self) -> &[ShoppingItem] {
        &self.items
    }

    pub fn total_estimated(&self) -> f64 {
        self.items.iter().map(|item| item.price).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const REPLY: &str = r#"Bread prices are steady this week.
___DATA_START___
<item type="cheapest" name="White Bread 700g" brand="" price="R14.99" store="Shoprite" category="Groceries" imageUrl="" reason="Lowest shelf price" />
<item type="healthier" name="Seed Loaf" brand="Woolworths" price="32.50" store="Woolworths" category="" imageUrl="https://example.com/loaf.png" reason="More fibre" />
<item type="mystery" name="Rolls" brand="Albany" price="n/a" store="Spar" category="Groceries" imageUrl="" reason="Bulk pack" />
<item type="sale" name="Rye Loaf" brand="Blue Ribbon" price="R45.99." store="Checkers" category="Groceries" imageUrl="" reason="Half price" />
<item type="sale" name="Bread Maker" brand="Russell Hobbs" price="1.299.00" store="Makro" category="Appliances" imageUrl="" reason="Clearance" />
___DATA_END___
Stick to the list."#;

    #[test]
    fn extracts_items_and_strips_block() {
        let (items, narrative) = parse_shopping_block(REPLY);
        assert_eq!(items.len(), 5);
        assert_eq!(items[0].kind, ShoppingKind::Cheapest);
        assert_eq!(items[0].brand, "Generic");
        assert_eq!(items[0].price, 14.99);
        assert_eq!(items[0].image_url, None);
        assert_eq!(items[1].category, "Groceries");
        assert_eq!(items[1].image_url.as_deref(), Some("https://example.com/loaf.png"));
        assert_eq!(items[2].kind, ShoppingKind::General);
        assert_eq!(items[2].price, 0.0);
        assert_eq!(items[3].price, 45.99);
        assert_eq!(items[4].price, 1.299);
        assert!(narrative.starts_with("Bread prices"));
        assert!(narrative.ends_with("Stick to the list."));
        assert!(!narrative.contains(DATA_START));
    }

    #[test]
    fn missing_block_keeps_narrative() {
        let (items, narrative) = parse_shopping_block("  Nothing structured here.  ");
        assert!(items.is_empty());
        assert_eq!(narrative, "Nothing structured here.");
    }

    #[test]
    fn unterminated_block_yields_no_items() {
        let text = "Intro\n___DATA_START___\n<item type=\"sale\" name=\"Milk\" price=\"20\" />";
        let (items, narrative) = parse_shopping_block(text);
        assert!(items.is_empty());
        assert_eq!(narrative, text.trim());
    }

    #[test]
    fn purchase_becomes_expense() {
        let (items, _) = parse_shopping_block(REPLY);
        let date = Utc.with_ymd_and_hms(2024, 9, 1, 10, 0, 0).unwrap();
        let txn = items[1].to_expense(date);
        assert_eq!(txn.kind, TransactionKind::Expense);
        assert_eq!(txn.amount, 32.5);
        assert_eq!(txn.description, "Woolworths Seed Loaf (Woolworths)");
    }

    #[test]
    fn cart_ignores_duplicates_and_totals_prices() {
        let (items, _) = parse_shopping_block(REPLY);
        let mut cart = ShoppingCart::default();
        assert!(cart.add(items[0].clone()));
        assert!(!cart.add(items[0].clone()));
        assert!(cart.add(items[1].clone()));
        assert!((cart.total_estimated() - 47.49).abs() < 1e-9);
        assert!(cart.remove(items[0].id).is_some());
        assert_eq!(cart.items().len(), 1);
    }
}
