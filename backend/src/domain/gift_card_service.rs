use chrono::Utc;
use log::{info, warn};
use shared::GiftCard;

use crate::domain::commands::gift_card::{CreateGiftCardCommand, UpdateGiftCardCommand};
use crate::domain::models::identifier::generate_id;
use crate::storage::{format_timestamp, StorageContext, Stored};

/// Service for managing gift cards
#[derive(Clone)]
pub struct GiftCardService {
    context: StorageContext,
}

impl GiftCardService {
    pub fn new(context: StorageContext) -> Self {
        Self { context }
    }

    pub fn list_gift_cards(&self) -> Vec<GiftCard> {
        self.context.read(|c| c.gift_cards.clone())
    }

    pub fn get_gift_card(&self, card_id: &str) -> Option<GiftCard> {
        self.context
            .read(|c| c.gift_cards.iter().find(|card| card.id == card_id).cloned())
    }

    pub fn create_gift_card(&self, command: CreateGiftCardCommand) -> Stored<GiftCard> {
        info!("Creating gift card: name='{}'", command.name);

        let mut card = GiftCard {
            id: String::new(),
            name: command.name,
            image: command.image,
            link: command.link,
            notes: command.notes,
            priority: command.priority.unwrap_or_default(),
            date_added: format_timestamp(&Utc::now()),
            purchased: false,
        };

        let stored = self.context.update_gift_cards(|cards| {
            card.id = generate_id(|candidate| cards.iter().any(|c| c.id == candidate));
            cards.push(card.clone());
            card
        });

        info!("Created gift card with ID: {}", stored.value.id);
        stored
    }

    pub fn update_gift_card(
        &self,
        card_id: &str,
        command: UpdateGiftCardCommand,
    ) -> Option<Stored<GiftCard>> {
        info!("Updating gift card: {}", card_id);

        let stored = self.context.modify_gift_cards(|cards| {
            let card = cards.iter_mut().find(|c| c.id == card_id)?;
            let mut updated = card.clone();

            if let Some(name) = command.name {
                updated.name = name;
            }
            if let Some(image) = command.image {
                updated.image = image;
            }
            if let Some(link) = command.link {
                updated.link = link;
            }
            if let Some(notes) = command.notes {
                updated.notes = notes;
            }
            if let Some(priority) = command.priority {
                updated.priority = priority;
            }
            if let Some(purchased) = command.purchased {
                updated.purchased = purchased;
            }

            *card = updated.clone();
            Some(updated)
        });

        if stored.is_none() {
            warn!("Cannot update, gift card not found: {}", card_id);
        }
        stored
    }

    pub fn delete_gift_card(&self, card_id: &str) -> Option<Stored<GiftCard>> {
        info!("Deleting gift card: {}", card_id);

        let stored = self.context.modify_gift_cards(|cards| {
            let index = cards.iter().position(|c| c.id == card_id)?;
            Some(cards.remove(index))
        });

        if stored.is_none() {
            warn!("Cannot delete, gift card not found: {}", card_id);
        }
        stored
    }

    pub fn toggle_purchased(&self, card_id: &str) -> Option<Stored<GiftCard>> {
        let stored = self.context.modify_gift_cards(|cards| {
            let card = cards.iter_mut().find(|c| c.id == card_id)?;
            card.purchased = !card.purchased;
            Some(card.clone())
        });

        if stored.is_none() {
            warn!("Cannot toggle purchased, gift card not found: {}", card_id);
        }
        stored
    }

    /// Case-insensitive substring search over name and notes
    pub fn search_gift_cards(&self, query: &str) -> Vec<GiftCard> {
        let needle = query.to_lowercase();
        self.context.read(|c| {
            c.gift_cards
                .iter()
                .filter(|card| {
                    card.name.to_lowercase().contains(&needle)
                        || card.notes.to_lowercase().contains(&needle)
                })
                .cloned()
                .collect()
        })
    }
}
