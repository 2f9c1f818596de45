//! Streaming extraction of stats snapshots from a raw_stats log.

pub mod parse;
pub mod row;

pub use parse::{ExtractStats, SnapshotExtractor};
pub use row::RawSnapshot;
