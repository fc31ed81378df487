use chrono::Utc;
use log::{debug, info, warn};
use shared::{Item, Priority, Variant};

use crate::domain::commands::item::{CreateItemCommand, ItemFilter, UpdateItemCommand};
use crate::domain::models::category::FALLBACK_CATEGORY;
use crate::domain::models::identifier::generate_id;
use crate::domain::sample_data::sample_items;
use crate::storage::{format_timestamp, StorageContext, Stored};

/// Service for managing wishlist items
#[derive(Clone)]
pub struct ItemService {
    context: StorageContext,
}

impl ItemService {
    pub fn new(context: StorageContext) -> Self {
        Self { context }
    }

    /// All items in insertion order (a copy)
    pub fn list_items(&self) -> Vec<Item> {
        self.context.read(|c| c.items.clone())
    }

    pub fn get_item(&self, item_id: &str) -> Option<Item> {
        let item = self.context.read(|c| c.items.iter().find(|i| i.id == item_id).cloned());
        if item.is_none() {
            debug!("Item not found: {}", item_id);
        }
        item
    }

    pub fn most_wanted_items(&self) -> Vec<Item> {
        self.context
            .read(|c| c.items.iter().filter(|i| i.most_wanted).cloned().collect())
    }

    /// Create and store a new item
    pub fn create_item(&self, command: CreateItemCommand) -> Stored<Item> {
        info!("Creating item: name='{}'", command.name);

        let priority = command.priority.unwrap_or_default();
        let category = command
            .category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_CATEGORY.to_string());

        let mut item = Item {
            id: String::new(),
            name: command.name,
            description: command.description,
            category,
            priority,
            most_wanted: command.most_wanted || priority == Priority::High,
            favorite: command.favorite,
            image: command.image,
            variants: command.variants,
            date_added: format_timestamp(&Utc::now()),
            purchased: false,
        };
        item.ensure_variant();

        let stored = self.context.update_items(|items| {
            item.id = generate_id(|candidate| items.iter().any(|i| i.id == candidate));
            items.push(item.clone());
            item
        });

        info!("Created item '{}' with ID: {}", stored.value.name, stored.value.id);
        stored
    }

    /// Merge the `Some` fields of `command` into an existing item.
    ///
    /// Returns `None` when no item has this id.
    pub fn update_item(&self, item_id: &str, command: UpdateItemCommand) -> Option<Stored<Item>> {
        info!("Updating item: {}", item_id);

        let stored = self.context.modify_items(|items| {
            let item = items.iter_mut().find(|i| i.id == item_id)?;
            let mut updated = item.clone();

            if let Some(name) = command.name {
                updated.name = name;
            }
            if let Some(description) = command.description {
                updated.description = description;
            }
            if let Some(category) = command.category {
                updated.category = category;
            }
            if let Some(most_wanted) = command.most_wanted {
                updated.most_wanted = most_wanted;
            }
            if let Some(favorite) = command.favorite {
                updated.favorite = favorite;
            }
            if let Some(image) = command.image {
                updated.image = image;
            }
            if let Some(variants) = command.variants {
                updated.variants = variants;
                updated.ensure_variant();
            }
            if let Some(purchased) = command.purchased {
                updated.purchased = purchased;
            }
            // Applied last so the derived flag wins over an explicit one
            if let Some(priority) = command.priority {
                updated.assign_priority(priority);
            }

            *item = updated.clone();
            Some(updated)
        });

        if stored.is_none() {
            warn!("Cannot update, item not found: {}", item_id);
        }
        stored
    }

    pub fn delete_item(&self, item_id: &str) -> Option<Stored<Item>> {
        info!("Deleting item: {}", item_id);

        let stored = self.context.modify_items(|items| {
            let index = items.iter().position(|i| i.id == item_id)?;
            Some(items.remove(index))
        });

        match &stored {
            Some(s) => info!("Deleted item '{}' ({})", s.value.name, item_id),
            None => warn!("Cannot delete, item not found: {}", item_id),
        }
        stored
    }

    /// Flip `most_wanted`. Priority is left alone.
    pub fn toggle_most_wanted(&self, item_id: &str) -> Option<Stored<Item>> {
        self.toggle(item_id, "most_wanted", |item| item.most_wanted = !item.most_wanted)
    }

    pub fn toggle_favorite(&self, item_id: &str) -> Option<Stored<Item>> {
        self.toggle(item_id, "favorite", |item| item.favorite = !item.favorite)
    }

    pub fn toggle_purchased(&self, item_id: &str) -> Option<Stored<Item>> {
        self.toggle(item_id, "purchased", |item| item.purchased = !item.purchased)
    }

    /// Case-insensitive substring search over name, description and category
    pub fn search_items(&self, query: &str) -> Vec<Item> {
        let needle = query.to_lowercase();
        self.context.read(|c| {
            c.items
                .iter()
                .filter(|item| {
                    item.name.to_lowercase().contains(&needle)
                        || item.description.to_lowercase().contains(&needle)
                        || item.category.to_lowercase().contains(&needle)
                })
                .cloned()
                .collect()
        })
    }

    pub fn filter_items(&self, filter: &ItemFilter) -> Vec<Item> {
        self.context
            .read(|c| c.items.iter().filter(|item| filter.matches(item)).cloned().collect())
    }

    /// Variant at a UI selection index, `None` for an unknown item or index
    pub fn selected_variant(&self, item_id: &str, index: usize) -> Option<Variant> {
        self.get_item(item_id)
            .and_then(|item| item.variant(index).cloned())
    }

    /// Remove every item. Returns how many were removed.
    pub fn clear_all_items(&self) -> Stored<usize> {
        info!("Clearing all items");
        self.context.update_items(|items| {
            let removed = items.len();
            items.clear();
            removed
        })
    }

    /// Add the demo items when the wishlist is empty.
    ///
    /// Returns how many items were added (zero when items already exist).
    pub fn seed_sample_items(&self) -> usize {
        if self.context.read(|c| !c.items.is_empty()) {
            debug!("Wishlist already has items, skipping sample data");
            return 0;
        }

        let samples = sample_items();
        let count = samples.len();
        for command in samples {
            self.create_item(command);
        }
        info!("Added {} sample items to empty wishlist", count);
        count
    }

    fn toggle(
        &self,
        item_id: &str,
        field: &str,
        flip: impl FnOnce(&mut Item),
    ) -> Option<Stored<Item>> {
        let stored = self.context.modify_items(|items| {
            let item = items.iter_mut().find(|i| i.id == item_id)?;
            flip(item);
            Some(item.clone())
        });

        match &stored {
            Some(_) => info!("Toggled {} on item {}", field, item_id),
            None => warn!("Cannot toggle {}, item not found: {}", field, item_id),
        }
        stored
    }
}
