use std::fmt::Write;

use anyhow::Result;
use entropyhunter_core::{TheoryParams, TheoryReport};

pub fn run(params: TheoryParams, json: bool) -> Result<()> {
    let report = TheoryReport::compute(params)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render(&report));
    }
    Ok(())
}

pub fn render(r: &TheoryReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Per-position entropy (theory): {:.6} bits",
        r.per_position_bits
    );
    let _ = writeln!(out, "Total entropy (theory):        {:.6} bits", r.total_bits);
    let _ = writeln!(out, "S_eff = 2^{:.6}", r.total_bits);
    let _ = writeln!(out, "P(hit per random guess) ≈ 2^{:.6}", -r.total_bits);
    let _ = writeln!(
        out,
        "Expected matches for guesses={} & sample_size={}: {:.4}",
        group_thousands(r.params.guesses),
        group_thousands(r.params.sample_size),
        r.expected_matches
    );
    out
}

/// `1234567` → `1,234,567`.
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
