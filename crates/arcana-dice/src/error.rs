//! Error types for formula compilation.

use thiserror::Error;

/// Result type for formula operations.
pub type FormulaResult<T> = Result<T, FormulaError>;

/// Errors detected while compiling a dice formula.
///
/// All failures are compile-time: evaluation of well-formed terms cannot
/// fail, and a failed compile aborts the whole formula with no partial total.
#[derive(Debug, Clone, Error)]
pub enum FormulaError {
    /// The formula reduces to no terms.
    #[error("empty formula")]
    Empty,

    /// A term matches neither the dice grammar nor a numeric literal.
    #[error("unrecognized term: {0}")]
    UnrecognizedTerm(String),

    /// A reroll condition would reject every face of the die, so the term
    /// could never settle on a value.
    #[error("impossible reroll condition for d{faces}: {term}")]
    ImpossibleReroll {
        /// The offending term text.
        term: String,
        /// Number of faces on the die.
        faces: u32,
    },
}
