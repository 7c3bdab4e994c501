//! Evaluation results and per-term breakdown records.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The outcome of a flat modifier term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatOutcome {
    /// Normalized signless source text of the term.
    pub raw: String,
    /// Signed contribution to the total.
    pub value: f64,
}

/// The outcome of a dice term, with full provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiceOutcome {
    /// Normalized signless source text of the term.
    pub raw: String,
    /// Faces per die.
    pub faces: u32,
    /// Number of dice requested (explosions add rolls beyond this).
    pub count: u32,
    /// Every die value in draw order, including exploded bonus dice; a
    /// rerolled die contributes only its final accepted value.
    pub rolls: Vec<u32>,
    /// Values retained after keep/drop, in selection order.
    pub kept: Vec<u32>,
    /// Signed sum of the kept values.
    pub subtotal: i64,
}

impl DiceOutcome {
    /// Values rolled but not kept, in roll order.
    ///
    /// Reconciles by value multiplicity, not position: rolling `[6, 6, 2]`
    /// and keeping the highest reports kept `[6]`, dropped `[6, 2]`.
    pub fn dropped(&self) -> Vec<u32> {
        let mut remaining: HashMap<u32, usize> = HashMap::new();
        for &value in &self.kept {
            *remaining.entry(value).or_insert(0) += 1;
        }
        let mut dropped = Vec::new();
        for &value in &self.rolls {
            match remaining.get_mut(&value) {
                Some(count) if *count > 0 => *count -= 1,
                _ => dropped.push(value),
            }
        }
        dropped
    }
}

impl std::fmt::Display for DiceOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kept: Vec<String> = self.kept.iter().map(ToString::to_string).collect();
        write!(f, "{} [{}", self.raw, kept.join(","))?;
        let dropped = self.dropped();
        if !dropped.is_empty() {
            let dropped: Vec<String> = dropped.iter().map(ToString::to_string).collect();
            let sep = if kept.is_empty() { "" } else { " " };
            write!(f, "{sep}({})", dropped.join(","))?;
        }
        write!(f, "]")
    }
}

/// One breakdown entry per compiled term, in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TermOutcome {
    /// A flat modifier's contribution.
    Flat(FlatOutcome),
    /// A dice term's rolls and selection.
    Dice(DiceOutcome),
}

impl TermOutcome {
    /// Signed contribution of this entry to the evaluation total.
    pub fn signed_value(&self) -> f64 {
        match self {
            Self::Flat(flat) => flat.value,
            Self::Dice(dice) => dice.subtotal as f64,
        }
    }

    /// Normalized source text of the originating term.
    pub fn raw(&self) -> &str {
        match self {
            Self::Flat(flat) => &flat.raw,
            Self::Dice(dice) => &dice.raw,
        }
    }
}

impl std::fmt::Display for TermOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flat(flat) => write!(f, "{}", flat.value),
            Self::Dice(dice) => write!(f, "{dice}"),
        }
    }
}

/// The full result of evaluating a formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Sum of every breakdown entry's signed value.
    pub total: f64,
    /// Per-term records in source order.
    pub breakdown: Vec<TermOutcome>,
}

impl std::fmt::Display for Evaluation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.breakdown.iter().map(ToString::to_string).collect();
        write!(f, "{} = {}", parts.join(" + "), self.total)
    }
}
