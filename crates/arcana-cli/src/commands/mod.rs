pub mod roll;
pub mod session;

use colored::Colorize;
use rand::SeedableRng;
use rand::rngs::StdRng;

use arcana_dice::{Evaluation, TermOutcome};

/// Build the roll RNG: seeded when requested, OS entropy otherwise.
fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Format a roll the way the desk's history pane does: the formula, each
/// term's kept dice (dropped ones parenthesized and dimmed), and the total.
fn render_roll(formula: &str, evaluation: &Evaluation) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(evaluation.breakdown.len());
    for outcome in &evaluation.breakdown {
        match outcome {
            TermOutcome::Flat(flat) => parts.push(flat.value.to_string()),
            TermOutcome::Dice(dice) => {
                let kept: Vec<String> = dice.kept.iter().map(ToString::to_string).collect();
                let mut text = format!("{} [{}", dice.raw, kept.join(",").green());
                let dropped = dice.dropped();
                if !dropped.is_empty() {
                    let dropped: Vec<String> = dropped.iter().map(ToString::to_string).collect();
                    let sep = if kept.is_empty() { "" } else { " " };
                    let parens = format!("({})", dropped.join(","));
                    text.push_str(&format!("{sep}{}", parens.dimmed()));
                }
                text.push(']');
                parts.push(text);
            }
        }
    }
    format!(
        "{}: {} = {}",
        formula.bold(),
        parts.join(" + "),
        evaluation.total
    )
}
