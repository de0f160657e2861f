use std::fmt::Write;

use anyhow::Result;
use entropyhunter_core::{CorpusSummary, HunterConfig, analyze_with};

pub fn run(input: &str, output_path: Option<&str>, cfg: &HunterConfig) -> Result<()> {
    let tokens = super::read_tokens(input)?;
    if tokens.is_empty() {
        eprintln!("Warning: {input} contains no tokens");
    }
    let summary = analyze_with(&tokens, &cfg.anomaly);
    print!("{}", render_table(&summary));
    print!("{}", render_summary(&summary));

    if let Some(path) = output_path {
        super::write_json(path, &summary)?;
        println!("\nProfile written to {path}");
    }
    Ok(())
}

/// One row per position: unique symbols, most frequent symbol and its count,
/// dominance ratio, observed and maximum entropy, anomaly marker.
pub fn render_table(summary: &CorpusSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>8}{:>8}{:>8}{:>9}{:>8}{:>9}{:>8}{:>9}",
        "Position", "Unique", "MaxChar", "MaxFreq", "Ratio", "Entropy", "MaxEnt", "Anomaly"
    );
    for p in &summary.positions {
        let flag = if p.anomaly { "*" } else { "" };
        let _ = writeln!(
            out,
            "{:>8}{:>8}{:>8}{:>9}{:>8.4}{:>9.4}{:>8.4}{:>9}",
            p.position,
            p.unique,
            super::display_symbol(p.most_frequent),
            p.most_frequent_count,
            p.dominance_ratio,
            p.entropy,
            p.max_entropy,
            flag
        );
    }
    out
}

/// Aggregate view: total entropy, effective space, hit probability and the
/// average number of guesses, all as powers of two.
pub fn render_summary(summary: &CorpusSummary) -> String {
    let h = summary.total_entropy;
    let mut out = String::new();
    let _ = writeln!(out, "\n--- Summary ---");
    let _ = writeln!(out, "Tokens analyzed        = {}", summary.token_count);
    let _ = writeln!(
        out,
        "Anomalous positions    = {}/{}",
        summary.anomalies().count(),
        summary.length()
    );
    let _ = writeln!(out, "Total entropy H_total  = {h:.4} bits");
    let _ = writeln!(out, "Effective space S_eff  = 2^{h:.4}");
    let _ = writeln!(out, "P(match per random guess) ≈ 2^{:.4}", -h);
    let _ = writeln!(
        out,
        "Expected guesses (avg) ≈ 2^{:.4}",
        summary.expected_guesses_log2()
    );
    out
}
