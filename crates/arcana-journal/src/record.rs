//! Roll history records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use arcana_dice::{Evaluation, TermOutcome};

/// One completed roll in the history.
///
/// Created on successful evaluation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollRecord {
    /// Unique record id.
    pub id: Uuid,
    /// The formula as the caller typed it.
    pub formula: String,
    /// Evaluation total.
    pub total: f64,
    /// Per-term breakdown at the time of the roll.
    pub breakdown: Vec<TermOutcome>,
    /// When the roll happened.
    pub timestamp: DateTime<Utc>,
}

impl RollRecord {
    /// Build a record from a finished evaluation.
    pub fn new(formula: &str, evaluation: &Evaluation) -> Self {
        Self {
            id: Uuid::new_v4(),
            formula: formula.to_string(),
            total: evaluation.total,
            breakdown: evaluation.breakdown.clone(),
            timestamp: Utc::now(),
        }
    }
}

impl std::fmt::Display for RollRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.breakdown.iter().map(ToString::to_string).collect();
        write!(f, "{}: {} = {}", self.formula, parts.join(" + "), self.total)
    }
}
