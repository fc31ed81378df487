use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Version tag written into every export document
pub const EXPORT_FORMAT_VERSION: &str = "1.0";

/// How badly an item or gift card is wanted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = PriorityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(PriorityParseError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriorityParseError(pub String);

impl fmt::Display for PriorityParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown priority '{}' (expected low, medium or high)", self.0)
    }
}

impl std::error::Error for PriorityParseError {}

/// One concrete purchase option for an item.
///
/// Variants have no identity of their own; callers address them by position
/// in [`Item::variants`], which is only stable while the list is not reordered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Variant {
    pub color: String,
    pub size: String,
    /// Free text as typed by the user, e.g. "$29.99" or "about 30 EUR"
    pub price: String,
    /// Purchase URL, may be empty
    pub link: String,
    pub store_name: String,
}

impl Variant {
    /// True when every field is blank
    pub fn is_empty(&self) -> bool {
        self.color.is_empty()
            && self.size.is_empty()
            && self.price.is_empty()
            && self.link.is_empty()
            && self.store_name.is_empty()
    }

    /// Best-effort numeric reading of the price text.
    ///
    /// Takes the first run of digits and dots and parses it; returns 0.0 when
    /// nothing numeric is found. Not currency aware.
    pub fn price_value(&self) -> f64 {
        let start = match self.price.find(|c: char| c.is_ascii_digit() || c == '.') {
            Some(start) => start,
            None => return 0.0,
        };
        let run: String = self.price[start..]
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();

        // "1.2.3" style runs parse up to the second dot
        let mut parts = run.splitn(3, '.');
        let whole = parts.next().unwrap_or_default();
        let candidate = match parts.next() {
            Some(fraction) => format!("{}.{}", whole, fraction),
            None => whole.to_string(),
        };
        candidate.parse::<f64>().unwrap_or(0.0)
    }
}

/// A wishlist entry
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Item {
    /// Opaque identifier, unique within the item collection
    pub id: String,
    pub name: String,
    pub description: String,
    /// Category name, one of the default categories or a custom one
    pub category: String,
    pub priority: Priority,
    /// Surfaced as the "most wanted" view; derived when priority is assigned
    pub most_wanted: bool,
    /// "Top pick" highlight, independent of priority
    pub favorite: bool,
    /// Image URI, empty when there is none
    pub image: String,
    /// Purchase options, never empty once the item has been stored
    pub variants: Vec<Variant>,
    /// Creation time (RFC 3339)
    pub date_added: String,
    pub purchased: bool,
}

impl Item {
    /// Generate an item ID from a creation timestamp and a random suffix.
    ///
    /// The timestamp is rendered in base 36 so IDs sort roughly by creation
    /// time.
    pub fn generate_id(epoch_millis: u64, random_suffix: &str) -> String {
        format!("{}{}", to_base36(epoch_millis), random_suffix)
    }

    /// Assign a priority and re-derive `most_wanted` from it.
    ///
    /// High forces the flag on, medium and low force it off. Toggling the flag
    /// later does not touch the priority.
    pub fn assign_priority(&mut self, priority: Priority) {
        self.priority = priority;
        self.most_wanted = priority == Priority::High;
    }

    /// Back-fill a single empty variant when the item has none
    pub fn ensure_variant(&mut self) {
        if self.variants.is_empty() {
            self.variants.push(Variant::default());
        }
    }

    /// Variant at a UI selection index
    pub fn variant(&self, index: usize) -> Option<&Variant> {
        self.variants.get(index)
    }
}

/// A gift card entry. Parallel to [`Item`] but without variants.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GiftCard {
    pub id: String,
    pub name: String,
    pub image: String,
    pub link: String,
    pub notes: String,
    pub priority: Priority,
    pub date_added: String,
    pub purchased: bool,
}

/// Portable backup of the item collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: String,
    /// When the export was produced (RFC 3339)
    pub export_date: String,
    pub items: Vec<Item>,
}

/// Externally published export used for startup synchronization.
///
/// Both fields are optional on the wire; any other metadata is ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDocument {
    #[serde(default)]
    pub export_date: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<Item>>,
}

/// Gift card counters within [`WishlistStats`]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GiftCardStats {
    pub total: usize,
    pub purchased: usize,
    pub unpurchased: usize,
}

/// Summary counters over the whole wishlist
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistStats {
    pub total: usize,
    pub most_wanted: usize,
    pub purchased: usize,
    pub unpurchased: usize,
    /// Item count per category name, as stored on the items
    pub categories: BTreeMap<String, usize>,
    pub gift_cards: GiftCardStats,
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_item_id() {
        assert_eq!(Item::generate_id(0, "abc"), "0abc");
        assert_eq!(Item::generate_id(35, ""), "z");
        assert_eq!(Item::generate_id(36, "x1"), "10x1");
        // 2024-01-01T00:00:00Z in millis
        assert_eq!(Item::generate_id(1704067200000, ""), "lqu5m2o0");
    }

    #[test]
    fn test_assign_priority_derives_most_wanted() {
        let mut item = Item::default();
        item.most_wanted = false;
        item.assign_priority(Priority::High);
        assert!(item.most_wanted);

        item.assign_priority(Priority::Low);
        assert!(!item.most_wanted);

        item.most_wanted = true;
        item.assign_priority(Priority::Medium);
        assert!(!item.most_wanted);
    }

    #[test]
    fn test_ensure_variant_backfills_once() {
        let mut item = Item::default();
        item.ensure_variant();
        assert_eq!(item.variants.len(), 1);
        assert!(item.variants[0].is_empty());

        item.ensure_variant();
        assert_eq!(item.variants.len(), 1);
    }

    #[test]
    fn test_variant_price_value() {
        let price = |text: &str| Variant { price: text.to_string(), ..Default::default() }.price_value();

        assert_eq!(price("$149.99"), 149.99);
        assert_eq!(price("about 30 EUR"), 30.0);
        assert_eq!(price("1.2.3"), 1.2);
        assert_eq!(price("free"), 0.0);
        assert_eq!(price(""), 0.0);
    }

    #[test]
    fn test_priority_parse_and_display() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!(" low ".parse::<Priority>().unwrap(), Priority::Low);
        assert!("urgent".parse::<Priority>().is_err());
        assert_eq!(Priority::Medium.to_string(), "medium");
    }

    #[test]
    fn test_item_json_uses_camel_case() {
        let mut item = Item {
            id: "abc".to_string(),
            name: "Headphones".to_string(),
            ..Default::default()
        };
        item.assign_priority(Priority::High);
        item.ensure_variant();

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["mostWanted"], true);
        assert_eq!(json["priority"], "high");
        assert_eq!(json["variants"][0]["storeName"], "");
        assert!(json.get("dateAdded").is_some());
    }

    #[test]
    fn test_sparse_item_json_fills_defaults() {
        let item: Item = serde_json::from_str(r#"{"id":"x","name":"Ball"}"#).unwrap();
        assert_eq!(item.priority, Priority::Medium);
        assert!(item.variants.is_empty());
        assert!(!item.purchased);
    }

    #[test]
    fn test_snapshot_ignores_unknown_fields() {
        let snapshot: SnapshotDocument =
            serde_json::from_str(r#"{"version":"1.0","owner":"me","exportDate":"2024-01-01T00:00:00Z"}"#)
                .unwrap();
        assert_eq!(snapshot.export_date.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert!(snapshot.items.is_none());
    }
}
