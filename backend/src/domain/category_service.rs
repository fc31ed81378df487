//! Category management.
//!
//! The effective category list is the fixed defaults followed by the user's
//! custom categories. Names are unique ignoring case across both sets. Only
//! custom categories are persisted or removable.

use log::{info, warn};

use crate::domain::commands::category::RemovedCategory;
use crate::domain::models::category::{is_default, normalize, same_category, DEFAULT_CATEGORIES};
use crate::storage::{StorageContext, Stored};

#[derive(Clone)]
pub struct CategoryService {
    context: StorageContext,
}

impl CategoryService {
    pub fn new(context: StorageContext) -> Self {
        Self { context }
    }

    pub fn default_categories(&self) -> Vec<String> {
        DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
    }

    pub fn custom_categories(&self) -> Vec<String> {
        self.context.read(|c| c.custom_categories.clone())
    }

    /// Defaults first, then custom categories, without duplicates
    pub fn all_categories(&self) -> Vec<String> {
        let mut all = self.default_categories();
        for custom in self.custom_categories() {
            if !all.iter().any(|existing| same_category(existing, &custom)) {
                all.push(custom);
            }
        }
        all
    }

    /// Add a custom category.
    ///
    /// The name is trimmed and lowercased. Returns `None` when the name is
    /// blank or already present (ignoring case) among defaults or customs.
    pub fn add_category(&self, name: &str) -> Option<Stored<String>> {
        let normalized = normalize(name);
        if normalized.is_empty() {
            warn!("Rejecting blank category name");
            return None;
        }

        let stored = self.context.modify_categories(|_, custom| {
            let exists = is_default(&normalized)
                || custom.iter().any(|existing| same_category(existing, &normalized));
            if exists {
                return None;
            }
            custom.push(normalized.clone());
            Some(normalized.clone())
        });

        match &stored {
            Some(_) => info!("Added category '{}'", normalized),
            None => info!("Category '{}' already exists", normalized),
        }
        stored
    }

    /// Remove a custom category, matching the name ignoring case.
    ///
    /// Default categories cannot be removed. Items that still use the name are
    /// left untouched; [`RemovedCategory::still_in_use`] reports them.
    pub fn remove_category(&self, name: &str) -> Option<Stored<RemovedCategory>> {
        let stored = self.context.modify_categories(|collections, custom| {
            let index = custom.iter().position(|existing| same_category(existing, name))?;
            let removed = custom.remove(index);
            let still_in_use = collections
                .items
                .iter()
                .any(|item| same_category(&item.category, &removed));
            Some(RemovedCategory {
                name: removed,
                still_in_use,
            })
        });

        match &stored {
            Some(s) if s.value.still_in_use => warn!(
                "Removed category '{}' which is still used by some items",
                s.value.name
            ),
            Some(s) => info!("Removed category '{}'", s.value.name),
            None => warn!("Cannot remove category '{}': not a custom category", name),
        }
        stored
    }

    /// Whether any item references the category, ignoring case
    pub fn is_category_in_use(&self, name: &str) -> bool {
        self.context
            .read(|c| c.items.iter().any(|item| same_category(&item.category, name)))
    }
}
