use anyhow::Result;
use entropyhunter_core::{CandidateGenerator, analyze};
use log::info;

pub struct GenerateCommandConfig<'a> {
    pub input: &'a str,
    pub num: usize,
    pub output_path: Option<&'a str>,
    pub seed: Option<u64>,
    pub workers: usize,
    pub preview_limit: usize,
}

pub fn run(cfg: GenerateCommandConfig<'_>) -> Result<()> {
    let tokens = super::read_tokens(cfg.input)?;
    if tokens.is_empty() {
        eprintln!("Warning: {} contains no tokens; candidates will be empty", cfg.input);
    }
    let summary = analyze(&tokens);
    info!(
        "learned {} positions ({:.3} bits) from {} tokens",
        summary.length(),
        summary.total_entropy,
        tokens.len()
    );

    let mut generator = CandidateGenerator::with_seed(cfg.seed);
    // Zero workers goes to the parallel path, which rejects it.
    let batch = if cfg.workers == 1 {
        generator.generate_from_summary(&summary, cfg.num)?
    } else {
        generator.generate_parallel(&summary, cfg.num, cfg.workers)?
    };

    match cfg.output_path {
        Some(path) => {
            super::write_lines(path, batch.iter())?;
            println!("Wrote {} candidates to {path}", batch.len());
        }
        None => {
            for candidate in batch.iter().take(cfg.preview_limit) {
                println!("{candidate}");
            }
        }
    }
    Ok(())
}
