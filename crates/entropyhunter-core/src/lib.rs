//! # entropyhunter-core
//!
//! **How guessable are your tokens, really?**
//!
//! `entropyhunter-core` profiles a corpus of fixed-format tokens (session
//! ids, API keys, reset links) position by position, estimates how much
//! entropy the population actually carries, and turns that profile into
//! weighted guesses for tokens it has never seen.
//!
//! ## Quick Start
//!
//! ```
//! use entropyhunter_core::{CandidateGenerator, analyze};
//!
//! let tokens = ["AA01", "AA02", "AA03"];
//! let summary = analyze(&tokens);
//! assert!((summary.total_entropy - 3f64.log2()).abs() < 1e-9);
//!
//! let mut generator = CandidateGenerator::seeded(7);
//! let batch = generator.generate_from_summary(&summary, 10).unwrap();
//! assert_eq!(batch.len(), 10);
//! ```
//!
//! ## Architecture
//!
//! Tokens → Profiler (per-position counts) → Summary → Generator → Candidates
//!
//! The [`theory`] module is an independent path: it predicts the entropy of
//! the biased-subset model from its parameters alone, and [`simulate()`] ties
//! the model, profiler and generator together against a synthetic population.
//!
//! Every position is modelled as an independent categorical distribution.
//! Summed entropies are therefore an estimate that ignores correlations
//! between positions.

pub mod config;
pub mod entropy;
pub mod error;
pub mod generate;
pub mod model;
pub mod profile;
pub mod simulate;
pub mod theory;

pub use config::{AnomalyThresholds, HunterConfig, PAD_SYMBOL};
pub use entropy::{
    expected_matches, max_entropy, shannon_entropy, subtle_per_position_entropy,
    subtle_predict_bits,
};
pub use error::{HunterError, Result};
pub use generate::{CandidateBatch, CandidateGenerator, generate};
pub use model::{BiasedSubsetModel, ModelParams, SubsetPosition};
pub use profile::{
    CorpusSummary, PositionProfile, SymbolCounts, analyze, analyze_with, normalize,
};
pub use simulate::{SimulationConfig, SimulationReport, simulate};
pub use theory::{TheoryParams, TheoryReport, predict};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
