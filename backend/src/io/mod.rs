pub mod snapshot_fetcher;

pub use snapshot_fetcher::{
    parse_snapshot, FileSnapshotSource, HttpSnapshotFetcher, NoSnapshot, SnapshotSource,
    StaticSnapshot,
};
