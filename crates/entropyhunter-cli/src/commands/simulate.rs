use anyhow::Result;
use entropyhunter_core::{SimulationConfig, simulate};

pub fn run(cfg: SimulationConfig, output_path: Option<&str>) -> Result<()> {
    println!(
        "Simulating {} biased-subset tokens (k={}, w={}, length={})...\n",
        cfg.sample_size, cfg.model.subset_k, cfg.model.fav_weight, cfg.model.length
    );
    let report = simulate(&cfg)?;

    println!(
        "[subtle] predicted per-position entropy ≈ {:.3} bits",
        report.predicted_per_position_bits
    );
    println!(
        "[subtle] predicted total entropy      ≈ {:.3} bits\n",
        report.predicted_total_bits
    );

    print!("{}", super::analyze::render_table(&report.summary));
    print!("{}", super::analyze::render_summary(&report.summary));

    println!(
        "\nGenerated {} candidate tokens from the learned biases",
        report.guesses
    );
    println!(
        "Number of matches: {} out of {} (expected ≈ {:.4}, {:.4} from observed entropy)",
        report.matches, report.guesses, report.expected_matches, report.observed_expected_matches
    );
    if !report.example_matches.is_empty() {
        println!("Example matches:");
        for m in &report.example_matches {
            println!("  {m}");
        }
    }

    if let Some(path) = output_path {
        super::write_json(path, &report)?;
        println!("\nReport written to {path}");
    }
    Ok(())
}
