use arcana_dice::evaluate;

pub fn run(formula: &str, times: u32, seed: Option<u64>, json: bool) -> Result<(), String> {
    let mut rng = super::make_rng(seed);

    for _ in 0..times {
        let evaluation = evaluate(formula, &mut rng).map_err(|e| e.to_string())?;
        if json {
            let line = serde_json::to_string(&evaluation).map_err(|e| e.to_string())?;
            println!("{line}");
        } else {
            println!("{}", super::render_roll(formula, &evaluation));
        }
    }

    Ok(())
}
