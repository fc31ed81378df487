use anyhow::{Context, Result};
use tracing::{info, warn};

use wishlist_backend::domain::SyncOutcome;
use wishlist_backend::logging::init_logging;
use wishlist_backend::{Backend, WishlistConfig};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let config = WishlistConfig::load().context("Failed to load configuration")?;
    let backend = Backend::open(&config)?;

    // Pull a newer published snapshot, if any
    let source = config.snapshot_source()?;
    match backend.sync_service.reconcile(source.as_ref()).await {
        SyncOutcome::Applied {
            items,
            synced_at,
            persisted,
        } => {
            info!("Synced {} items from snapshot dated {}", items, synced_at);
            if let Err(e) = persisted {
                warn!("Synced data is only held in memory: {}", e);
            }
        }
        SyncOutcome::Skipped(reason) => info!("Sync skipped: {}", reason),
    }

    if config.seed_sample_data {
        let added = backend.item_service.seed_sample_items();
        if added > 0 {
            info!("Seeded {} sample items", added);
        }
    }

    let stats = backend.stats_service.statistics();
    info!(
        "Wishlist has {} items ({} most wanted, {} purchased) and {} gift cards",
        stats.total, stats.most_wanted, stats.purchased, stats.gift_cards.total
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&stats).context("Failed to render statistics")?
    );

    Ok(())
}
