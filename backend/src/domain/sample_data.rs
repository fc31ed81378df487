//! Demo content offered to a brand-new, empty wishlist.

use shared::{Priority, Variant};

use crate::domain::commands::item::CreateItemCommand;

fn variant(color: &str, size: &str, price: &str, link: &str, store_name: &str) -> Variant {
    Variant {
        color: color.to_string(),
        size: size.to_string(),
        price: price.to_string(),
        link: link.to_string(),
        store_name: store_name.to_string(),
    }
}

pub fn sample_items() -> Vec<CreateItemCommand> {
    vec![
        CreateItemCommand {
            name: "Wireless Bluetooth Headphones".to_string(),
            description: "High-quality noise-cancelling headphones perfect for music and calls".to_string(),
            category: Some("electronics".to_string()),
            priority: Some(Priority::High),
            most_wanted: true,
            variants: vec![
                variant("Black", "", "$149.99", "https://example.com/headphones-black", "Amazon"),
                variant("White", "", "$159.99", "https://example.com/headphones-white", "Best Buy"),
                variant("Blue", "", "$144.99", "https://example.com/headphones-blue", "Target"),
            ],
            ..Default::default()
        },
        CreateItemCommand {
            name: "Cozy Winter Sweater".to_string(),
            description: "Soft wool sweater perfect for cold weather".to_string(),
            category: Some("clothing".to_string()),
            priority: Some(Priority::Medium),
            most_wanted: true,
            variants: vec![
                variant("Red", "Medium", "$49.99", "https://example.com/sweater-red-m", "H&M"),
                variant("Navy", "Large", "$52.99", "https://example.com/sweater-navy-l", "Uniqlo"),
            ],
            ..Default::default()
        },
        CreateItemCommand {
            name: "Programming Book Collection".to_string(),
            description: "Essential books for learning modern web development".to_string(),
            category: Some("books".to_string()),
            priority: Some(Priority::Low),
            most_wanted: false,
            variants: vec![variant("", "", "$89.99", "https://example.com/book-collection", "Amazon")],
            ..Default::default()
        },
        CreateItemCommand {
            name: "Smart Home Speaker".to_string(),
            description: "Voice-controlled smart speaker with excellent sound quality".to_string(),
            category: Some("electronics".to_string()),
            priority: Some(Priority::Medium),
            most_wanted: false,
            variants: vec![
                variant("Black", "", "$79.99", "https://example.com/speaker-black", "Amazon"),
                variant("White", "", "$79.99", "https://example.com/speaker-white", "Google Store"),
            ],
            ..Default::default()
        },
    ]
}
