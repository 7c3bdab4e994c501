//! Dice-notation compiler and evaluator for ArcanaDesk.
//!
//! Compiles compact roll formulas (`2d20kh1+5`, `4d6r<=2!`, `adv`) into
//! signed terms and evaluates them against an injected die source, keeping
//! full provenance per term: raw rolls, kept values, and subtotals survive
//! into the result for display and auditing.
//!
//! Evaluation performs no I/O and holds no shared state; give each
//! evaluation its own RNG (or a seed) to make it fully deterministic.

pub mod compiler;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod outcome;
pub mod term;

pub use compiler::compile;
pub use error::{FormulaError, FormulaResult};
pub use eval::{DieRoller, EXPLOSION_LIMIT, REROLL_LIMIT, evaluate, evaluate_terms};
pub use outcome::{DiceOutcome, Evaluation, FlatOutcome, TermOutcome};
pub use term::{DiceTerm, FlatTerm, KeepDrop, KeepDropMode, Reroll, RerollOp, Sign, Term};
