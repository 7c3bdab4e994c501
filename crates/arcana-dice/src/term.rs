//! Compiled formula terms.
//!
//! A formula splits into signed terms, each either a flat numeric modifier
//! or a dice expression with optional keep/drop, reroll, and exploding
//! behavior. Terms keep their normalized source text for breakdown display.

use serde::{Deserialize, Serialize};

/// The sign applied to a term's contribution to the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sign {
    /// The term adds to the total.
    Plus,
    /// The term subtracts from the total.
    Minus,
}

impl Sign {
    /// Multiplier for this sign: `+1` or `-1`.
    pub fn factor(self) -> i64 {
        match self {
            Self::Plus => 1,
            Self::Minus => -1,
        }
    }
}

impl std::fmt::Display for Sign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
        }
    }
}

/// Which dice a keep/drop policy selects out of a rolled pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeepDropMode {
    /// Keep the `n` highest dice (`kh`).
    KeepHighest,
    /// Keep the `n` lowest dice (`kl`).
    KeepLowest,
    /// Drop the `n` highest dice (`dh`).
    DropHighest,
    /// Drop the `n` lowest dice (`dl`).
    DropLowest,
}

impl std::fmt::Display for KeepDropMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KeepHighest => write!(f, "kh"),
            Self::KeepLowest => write!(f, "kl"),
            Self::DropHighest => write!(f, "dh"),
            Self::DropLowest => write!(f, "dl"),
        }
    }
}

/// A keep/drop policy on a rolled dice pool.
///
/// `n` is never validated against the pool size: selection clamps, so
/// keeping more dice than were rolled keeps everything and dropping more
/// than were rolled drops everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeepDrop {
    /// Selection mode.
    pub mode: KeepDropMode,
    /// How many dice to keep or drop.
    pub n: usize,
}

impl KeepDrop {
    /// Select the kept values from a rolled pool.
    ///
    /// The returned order follows the selection procedure, not roll order:
    /// descending for keep-highest, ascending for the other modes.
    pub fn select(&self, rolls: &[u32]) -> Vec<u32> {
        let mut sorted = rolls.to_vec();
        sorted.sort_unstable();
        match self.mode {
            KeepDropMode::KeepHighest => {
                sorted.reverse();
                sorted.truncate(self.n);
            }
            KeepDropMode::KeepLowest => {
                sorted.truncate(self.n);
            }
            KeepDropMode::DropHighest => {
                let keep = sorted.len().saturating_sub(self.n);
                sorted.truncate(keep);
            }
            KeepDropMode::DropLowest => {
                sorted = sorted.split_off(self.n.min(sorted.len()));
            }
        }
        sorted
    }
}

/// Comparison operator of a reroll condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RerollOp {
    /// Reroll values at or below the threshold (`<=`).
    LessEq,
    /// Reroll values at or above the threshold (`>=`).
    GreaterEq,
    /// Reroll values strictly below the threshold (`<`).
    Less,
    /// Reroll values strictly above the threshold (`>`).
    Greater,
    /// Reroll values equal to the threshold (`=`).
    Eq,
}

impl std::fmt::Display for RerollOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LessEq => write!(f, "<="),
            Self::GreaterEq => write!(f, ">="),
            Self::Less => write!(f, "<"),
            Self::Greater => write!(f, ">"),
            Self::Eq => write!(f, "="),
        }
    }
}

/// A reroll policy on individual dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reroll {
    /// Comparison operator.
    pub op: RerollOp,
    /// Threshold the rolled value is compared against.
    pub threshold: u32,
}

impl Reroll {
    /// Whether a rolled value triggers a redraw.
    pub fn matches(&self, value: u32) -> bool {
        match self.op {
            RerollOp::LessEq => value <= self.threshold,
            RerollOp::GreaterEq => value >= self.threshold,
            RerollOp::Less => value < self.threshold,
            RerollOp::Greater => value > self.threshold,
            RerollOp::Eq => value == self.threshold,
        }
    }

    /// Whether the condition matches every face of a die, making the term
    /// unsatisfiable. Rejected at compile time.
    pub fn matches_all_faces(&self, faces: u32) -> bool {
        (1..=faces).all(|v| self.matches(v))
    }
}

/// A flat numeric modifier term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatTerm {
    /// Sign of the contribution.
    pub sign: Sign,
    /// Unsigned magnitude of the modifier.
    pub value: f64,
    /// Normalized signless source text.
    pub raw: String,
}

/// A dice expression term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiceTerm {
    /// Sign of the contribution.
    pub sign: Sign,
    /// Number of dice rolled (0 is legal and yields an empty pool).
    pub count: u32,
    /// Faces per die, at least 1.
    pub faces: u32,
    /// Optional keep/drop policy.
    pub keep_drop: Option<KeepDrop>,
    /// Optional reroll policy.
    pub reroll: Option<Reroll>,
    /// Whether dice showing the maximum face roll bonus dice.
    pub explode: bool,
    /// Normalized signless source text.
    pub raw: String,
}

/// One signed component of a compiled formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Term {
    /// A flat numeric modifier.
    Flat(FlatTerm),
    /// A dice expression.
    Dice(DiceTerm),
}
