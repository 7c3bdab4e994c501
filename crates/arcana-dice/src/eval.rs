//! Term evaluation against a die source.
//!
//! Evaluation is pure apart from the injected [`DieRoller`]: the same
//! formula with the same roller sequence always produces the same result,
//! and no evaluation step performs I/O or fails. Both internal loops are
//! bounded — rerolls by [`REROLL_LIMIT`] redraws per die, explosions by
//! [`EXPLOSION_LIMIT`] bonus dice per term.

use rand::Rng;
use rand::rngs::StdRng;

use crate::compiler::compile;
use crate::error::FormulaResult;
use crate::outcome::{DiceOutcome, Evaluation, FlatOutcome, TermOutcome};
use crate::term::{DiceTerm, Term};

/// Maximum redraws for a single die under a reroll condition.
///
/// A reroll that passes compile-time validation can still have arbitrarily
/// low probability of settling; after this many redraws the last drawn value
/// is accepted silently, trading a small bias for guaranteed termination.
pub const REROLL_LIMIT: u32 = 50;

/// Maximum bonus dice a single term can gain from explosions.
///
/// Bounds the degenerate `1d1!` case, where every roll shows the maximum
/// face and the chain would never end.
pub const EXPLOSION_LIMIT: u32 = 1000;

/// A source of individual die values.
///
/// Implemented for [`StdRng`]; tests substitute scripted sources to make
/// evaluation deterministic.
pub trait DieRoller {
    /// Produce a uniformly distributed value in `1..=faces`.
    ///
    /// `faces` is always at least 1 — the compiler rejects zero-faced dice.
    fn roll(&mut self, faces: u32) -> u32;
}

impl DieRoller for StdRng {
    fn roll(&mut self, faces: u32) -> u32 {
        self.random_range(1..=faces)
    }
}

/// Compile and evaluate a formula in one step.
pub fn evaluate<R: DieRoller>(formula: &str, roller: &mut R) -> FormulaResult<Evaluation> {
    Ok(evaluate_terms(&compile(formula)?, roller))
}

/// Evaluate compiled terms in source order.
pub fn evaluate_terms<R: DieRoller>(terms: &[Term], roller: &mut R) -> Evaluation {
    let mut total = 0.0;
    let mut breakdown = Vec::with_capacity(terms.len());
    for term in terms {
        let outcome = match term {
            Term::Flat(f) => TermOutcome::Flat(FlatOutcome {
                raw: f.raw.clone(),
                value: f.value * f.sign.factor() as f64,
            }),
            Term::Dice(d) => TermOutcome::Dice(roll_dice_term(d, roller)),
        };
        total += outcome.signed_value();
        breakdown.push(outcome);
    }
    Evaluation { total, breakdown }
}

/// Roll one dice term: draw, reroll, explode, then apply keep/drop.
fn roll_dice_term<R: DieRoller>(term: &DiceTerm, roller: &mut R) -> DiceOutcome {
    let mut rolls = Vec::with_capacity(term.count as usize);
    let mut bonus = 0u32;
    for _ in 0..term.count {
        let mut value = draw(term, roller);
        rolls.push(value);
        if term.explode {
            // Bonus dice land directly after their trigger, so the roll
            // sequence interleaves originals and explosions in draw order.
            while value == term.faces && bonus < EXPLOSION_LIMIT {
                value = draw(term, roller);
                rolls.push(value);
                bonus += 1;
            }
        }
    }

    let kept = match &term.keep_drop {
        Some(kd) => kd.select(&rolls),
        None => rolls.clone(),
    };
    let subtotal = term.sign.factor() * kept.iter().map(|&v| i64::from(v)).sum::<i64>();

    DiceOutcome {
        raw: term.raw.clone(),
        faces: term.faces,
        count: term.count,
        rolls,
        kept,
        subtotal,
    }
}

/// Draw a single die value, redrawing under the term's reroll condition.
fn draw<R: DieRoller>(term: &DiceTerm, roller: &mut R) -> u32 {
    let mut value = roller.roll(term.faces);
    if let Some(reroll) = &term.reroll {
        let mut redraws = 0;
        while reroll.matches(value) && redraws < REROLL_LIMIT {
            value = roller.roll(term.faces);
            redraws += 1;
        }
    }
    value
}
