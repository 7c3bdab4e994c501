use std::io::{self, BufRead, Write};

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use arcana_dice::evaluate;
use arcana_journal::RollHistory;

pub fn run(seed: Option<u64>) -> Result<(), String> {
    let mut rng = super::make_rng(seed);
    let mut history = RollHistory::new();

    println!("  {} ArcanaDesk dice session", "Starting".bold());
    println!("  Type a formula to roll (e.g. 2d20kh1+5, adv, 4d6dl1).");
    println!("  Commands: history, stats, clear, help, quit.\n");

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input.to_lowercase().as_str() {
            "quit" | "q" => break,
            "help" => print_help(),
            "history" => print_history(&history),
            "stats" => print_stats(&history),
            "clear" => {
                history.clear();
                println!("History cleared.\n");
            }
            _ => match evaluate(input, &mut rng) {
                Ok(evaluation) => {
                    println!("{}\n", super::render_roll(input, &evaluation));
                    history.append(input, &evaluation);
                }
                // Failed attempts never reach the history.
                Err(e) => println!("{}\n", e.to_string().yellow()),
            },
        }
    }

    Ok(())
}

fn print_history(history: &RollHistory) {
    if history.is_empty() {
        println!("No rolls yet.\n");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Formula", "Breakdown", "Total"]);

    // Newest first, like the desk pane.
    for record in history.records().iter().rev() {
        let parts: Vec<String> = record.breakdown.iter().map(ToString::to_string).collect();
        table.add_row(vec![
            record.formula.clone(),
            parts.join(" + "),
            record.total.to_string(),
        ]);
    }

    println!("{table}\n");
}

fn print_stats(history: &RollHistory) {
    match history.summary() {
        Some(summary) => println!("{summary}\n"),
        None => println!("No rolls yet.\n"),
    }
}

fn print_help() {
    println!("  <formula>   roll it (dice grammar: [count]d<faces>[kh|kl|dh|dl N][r[op]N][!])");
    println!("  adv / dis   shorthand for 2d20kh1 / 2d20kl1");
    println!("  history     show the retained rolls, newest first");
    println!("  stats       average, min, max, and count over the history");
    println!("  clear       forget every retained roll");
    println!("  quit        leave the session\n");
}
