//! Roll history for ArcanaDesk.
//!
//! A bounded, append-only log of evaluated rolls with summary statistics
//! (count, mean, min, max) recomputed from the retained records. The host
//! owns persistence; this crate only guarantees the aggregation contract:
//! FIFO eviction past the cap, immutable records, and a single-writer
//! read-after-write model.

pub mod history;
pub mod record;

pub use history::{CAPACITY, HistorySummary, RollHistory};
pub use record::RollRecord;
