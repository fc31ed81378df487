// backend/src/domain/commands.rs

//! Domain-level command and query types.
//! These structs are the inputs of the domain services. A UI layer builds
//! them from its form state; the services fill in defaults and enforce the
//! wishlist invariants.

pub mod item {
    use shared::{Item, Priority, Variant};

    /// Input for creating a new item. Blank fields get the usual defaults.
    #[derive(Debug, Clone, Default)]
    pub struct CreateItemCommand {
        pub name: String,
        pub description: String,
        /// Defaults to `other`
        pub category: Option<String>,
        /// Defaults to medium
        pub priority: Option<Priority>,
        /// Forced on when the priority is high
        pub most_wanted: bool,
        pub favorite: bool,
        pub image: String,
        /// An empty list is back-filled with one blank variant
        pub variants: Vec<Variant>,
    }

    /// Partial update of an item. Only `Some` fields are applied.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateItemCommand {
        pub name: Option<String>,
        pub description: Option<String>,
        pub category: Option<String>,
        /// Re-derives `most_wanted`, overriding any `most_wanted` in the same update
        pub priority: Option<Priority>,
        pub most_wanted: Option<bool>,
        pub favorite: Option<bool>,
        pub image: Option<String>,
        pub variants: Option<Vec<Variant>>,
        pub purchased: Option<bool>,
    }

    /// Equality filters combined with AND. `None` fields are not applied.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct ItemFilter {
        pub category: Option<String>,
        pub priority: Option<Priority>,
        pub most_wanted: Option<bool>,
        pub purchased: Option<bool>,
    }

    impl ItemFilter {
        pub fn matches(&self, item: &Item) -> bool {
            self.category.as_ref().map_or(true, |c| &item.category == c)
                && self.priority.map_or(true, |p| item.priority == p)
                && self.most_wanted.map_or(true, |m| item.most_wanted == m)
                && self.purchased.map_or(true, |p| item.purchased == p)
        }
    }
}

pub mod gift_card {
    use shared::Priority;

    /// Input for creating a new gift card
    #[derive(Debug, Clone, Default)]
    pub struct CreateGiftCardCommand {
        pub name: String,
        pub image: String,
        pub link: String,
        pub notes: String,
        /// Defaults to medium
        pub priority: Option<Priority>,
    }

    /// Partial update of a gift card. Only `Some` fields are applied.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateGiftCardCommand {
        pub name: Option<String>,
        pub image: Option<String>,
        pub link: Option<String>,
        pub notes: Option<String>,
        pub priority: Option<Priority>,
        pub purchased: Option<bool>,
    }
}

pub mod category {
    /// Result of removing a custom category
    #[derive(Debug, Clone, PartialEq)]
    pub struct RemovedCategory {
        /// The custom category name as it was stored
        pub name: String,
        /// Whether items still reference the name. Advisory only.
        pub still_in_use: bool,
    }
}
