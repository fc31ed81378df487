/// Categories every wishlist has. Never persisted and never removable.
pub const DEFAULT_CATEGORIES: [&str; 5] = ["electronics", "clothing", "school", "sports", "other"];

/// Category assigned to items created without one
pub const FALLBACK_CATEGORY: &str = "other";

/// Stored form of a category name: trimmed and lowercased
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Case-insensitive category comparison
pub fn same_category(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

pub fn is_default(name: &str) -> bool {
    DEFAULT_CATEGORIES.iter().any(|default| same_category(default, name))
}
