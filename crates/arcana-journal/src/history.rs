//! Bounded roll history and summary statistics.

use serde::{Deserialize, Serialize};

use arcana_dice::Evaluation;

use crate::record::RollRecord;

/// Maximum number of records the history retains.
pub const CAPACITY: usize = 40;

/// An append-only log of recent rolls, capped at [`CAPACITY`] entries.
///
/// When the cap is exceeded the oldest record is evicted first. Records are
/// never mutated after insertion; statistics are recomputed from the
/// retained records on each query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RollHistory {
    records: Vec<RollRecord>,
}

impl RollHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a successful evaluation, evicting the oldest record when the
    /// history is full. Returns the stored record.
    pub fn append(&mut self, formula: &str, evaluation: &Evaluation) -> &RollRecord {
        if self.records.len() == CAPACITY {
            self.records.remove(0);
        }
        self.records.push(RollRecord::new(formula, evaluation));
        &self.records[self.records.len() - 1]
    }

    /// All retained records, oldest first.
    pub fn records(&self) -> &[RollRecord] {
        &self.records
    }

    /// Number of retained records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the history holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Remove every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Summary statistics over the retained totals, or `None` when empty.
    pub fn summary(&self) -> Option<HistorySummary> {
        if self.records.is_empty() {
            return None;
        }
        let totals: Vec<f64> = self.records.iter().map(|r| r.total).collect();
        let sum: f64 = totals.iter().sum();
        let average = (sum / totals.len() as f64 * 100.0).round() / 100.0;
        let min = totals.iter().copied().fold(f64::INFINITY, f64::min);
        let max = totals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(HistorySummary {
            count: totals.len(),
            average,
            min,
            max,
        })
    }
}

/// Statistics over the retained history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    /// Number of rolls counted.
    pub count: usize,
    /// Mean of the totals, rounded to two decimal places.
    pub average: f64,
    /// Lowest total.
    pub min: f64,
    /// Highest total.
    pub max: f64,
}

impl std::fmt::Display for HistorySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Average: {:.2} | Min: {} | Max: {} | Rolls: {}",
            self.average, self.min, self.max, self.count
        )
    }
}
