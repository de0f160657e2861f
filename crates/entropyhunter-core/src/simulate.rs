//! End-to-end simulation against a synthetic biased-subset population.
//!
//! ```text
//! model params → build model → sample population → analyze → generate guesses → count hits
//! ```

use std::collections::HashSet;

use log::info;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;

use crate::config::AnomalyThresholds;
use crate::entropy::expected_matches;
use crate::error::{HunterError, Result};
use crate::generate::CandidateGenerator;
use crate::model::{BiasedSubsetModel, ModelParams};
use crate::profile::{CorpusSummary, analyze_with};

/// Example hits kept in a report.
pub const MAX_EXAMPLE_MATCHES: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub model: ModelParams,
    pub sample_size: usize,
    pub guesses: usize,
    pub seed: Option<u64>,
    pub thresholds: AnomalyThresholds,
    /// Generation workers; 1 keeps generation on the calling thread.
    pub workers: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            model: ModelParams::default(),
            sample_size: 50_000,
            guesses: 20_000,
            seed: None,
            thresholds: AnomalyThresholds::default(),
            workers: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub predicted_per_position_bits: f64,
    pub predicted_total_bits: f64,
    pub sample_size: usize,
    pub guesses: usize,
    /// Profile of the sampled population.
    pub summary: CorpusSummary,
    /// Candidates that equal some sampled token, counted with repeats.
    pub matches: usize,
    pub example_matches: Vec<String>,
    /// Matches the closed form expects for these sizes, from the predicted
    /// total entropy.
    pub expected_matches: f64,
    /// Same estimate from the entropy measured on the sampled population.
    pub observed_expected_matches: f64,
}

/// Run one simulation. With a seed the whole run is reproducible.
pub fn simulate(cfg: &SimulationConfig) -> Result<SimulationReport> {
    if cfg.sample_size == 0 {
        return Err(HunterError::invalid("sample size must be at least 1"));
    }
    if cfg.guesses == 0 {
        return Err(HunterError::invalid("guess count must be at least 1"));
    }
    if cfg.workers == 0 {
        return Err(HunterError::invalid("worker count must be at least 1"));
    }
    let mut rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let model = BiasedSubsetModel::build(cfg.model.clone(), &mut rng)?;
    let (per_position, total) = model.predict();
    info!("predicted entropy: {per_position:.3} bits/position, {total:.3} bits total");

    info!("sampling {} tokens", cfg.sample_size);
    let tokens = model.sample_many(cfg.sample_size, &mut rng);
    let summary = analyze_with(&tokens, &cfg.thresholds);

    info!("generating {} candidates from the observed profile", cfg.guesses);
    let mut generator = CandidateGenerator::seeded(rng.next_u64());
    let batch = if cfg.workers == 1 {
        generator.generate_from_summary(&summary, cfg.guesses)?
    } else {
        generator.generate_parallel(&summary, cfg.guesses, cfg.workers)?
    };

    let known: HashSet<&str> = tokens.iter().map(String::as_str).collect();
    let mut matches = 0;
    let mut example_matches = Vec::new();
    for hit in batch.hits(&known) {
        matches += 1;
        if example_matches.len() < MAX_EXAMPLE_MATCHES {
            example_matches.push(hit.to_string());
        }
    }
    info!("{matches} of {} candidates matched the population", cfg.guesses);

    Ok(SimulationReport {
        predicted_per_position_bits: per_position,
        predicted_total_bits: total,
        sample_size: cfg.sample_size,
        guesses: cfg.guesses,
        expected_matches: expected_matches(total, cfg.sample_size as u64, cfg.guesses as u64),
        observed_expected_matches: expected_matches(
            summary.total_entropy,
            cfg.sample_size as u64,
            cfg.guesses as u64,
        ),
        summary,
        matches,
        example_matches,
    })
}
