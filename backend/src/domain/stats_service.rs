use log::debug;
use shared::{GiftCardStats, WishlistStats};
use std::collections::BTreeMap;

use crate::storage::StorageContext;

/// Summary numbers for the wishlist header and the binary's report
#[derive(Clone)]
pub struct StatsService {
    context: StorageContext,
}

impl StatsService {
    pub fn new(context: StorageContext) -> Self {
        Self { context }
    }

    pub fn statistics(&self) -> WishlistStats {
        let stats = self.context.read(|c| {
            let total = c.items.len();
            let purchased = c.items.iter().filter(|i| i.purchased).count();

            let mut categories = BTreeMap::new();
            for item in &c.items {
                *categories.entry(item.category.clone()).or_insert(0) += 1;
            }

            let cards_total = c.gift_cards.len();
            let cards_purchased = c.gift_cards.iter().filter(|g| g.purchased).count();

            WishlistStats {
                total,
                most_wanted: c.items.iter().filter(|i| i.most_wanted).count(),
                purchased,
                unpurchased: total - purchased,
                categories,
                gift_cards: GiftCardStats {
                    total: cards_total,
                    purchased: cards_purchased,
                    unpurchased: cards_total - cards_purchased,
                },
            }
        });

        debug!("Computed statistics: {} items, {} gift cards", stats.total, stats.gift_cards.total);
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::gift_card::CreateGiftCardCommand;
    use crate::domain::commands::item::CreateItemCommand;
    use crate::domain::gift_card_service::GiftCardService;
    use crate::domain::item_service::ItemService;
    use crate::test_utils::TestEnvironment;
    use shared::Priority;

    #[test]
    fn test_empty_wishlist() {
        let env = TestEnvironment::new();
        let stats = StatsService::new(env.context.clone()).statistics();
        assert_eq!(stats, WishlistStats::default());
    }

    #[test]
    fn test_counts() {
        let env = TestEnvironment::new();
        let items = ItemService::new(env.context.clone());
        let cards = GiftCardService::new(env.context.clone());

        let headphones = items
            .create_item(CreateItemCommand {
                name: "Headphones".to_string(),
                category: Some("electronics".to_string()),
                priority: Some(Priority::High),
                ..Default::default()
            })
            .into_value();
        items.create_item(CreateItemCommand {
            name: "Speaker".to_string(),
            category: Some("electronics".to_string()),
            ..Default::default()
        });
        items.create_item(CreateItemCommand {
            name: "Sweater".to_string(),
            category: Some("clothing".to_string()),
            ..Default::default()
        });
        items.toggle_purchased(&headphones.id);

        let card = cards
            .create_gift_card(CreateGiftCardCommand {
                name: "Cinema".to_string(),
                ..Default::default()
            })
            .into_value();
        cards.create_gift_card(CreateGiftCardCommand::default());
        cards.toggle_purchased(&card.id);

        let stats = StatsService::new(env.context.clone()).statistics();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.most_wanted, 1);
        assert_eq!(stats.purchased, 1);
        assert_eq!(stats.unpurchased, 2);
        assert_eq!(stats.categories.get("electronics"), Some(&2));
        assert_eq!(stats.categories.get("clothing"), Some(&1));
        assert_eq!(stats.gift_cards, GiftCardStats {
            total: 2,
            purchased: 1,
            unpurchased: 1,
        });
    }
}
