//! Weighted candidate generation from a positional profile.
//!
//! Every candidate is built by drawing each position independently from that
//! position's observed distribution. The generator owns its RNG; two
//! generators seeded alike produce the same batches for the same corpus.

use std::collections::HashSet;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::Serialize;

use crate::config::PAD_SYMBOL;
use crate::error::{HunterError, Result};
use crate::profile::{CorpusSummary, PositionProfile, analyze};

/// Candidates per independently seeded chunk in parallel generation.
pub const PARALLEL_CHUNK: usize = 1024;

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

/// Generated candidates in generation order. Duplicates are expected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CandidateBatch {
    pub candidates: Vec<String>,
}

impl CandidateBatch {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.candidates.iter().map(String::as_str)
    }

    /// Candidates (in batch order, with repeats) that occur in `known`.
    pub fn hits<'a>(&'a self, known: &'a HashSet<&str>) -> impl Iterator<Item = &'a str> {
        self.iter().filter(move |c| known.contains(c))
    }

    pub fn into_inner(self) -> Vec<String> {
        self.candidates
    }
}

impl IntoIterator for CandidateBatch {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.into_iter()
    }
}

// ---------------------------------------------------------------------------
// Per-position sampler
// ---------------------------------------------------------------------------

/// Cumulative-count table for one position.
#[derive(Debug, Clone)]
struct PositionSampler {
    symbols: Vec<char>,
    cumulative: Vec<u64>,
}

impl PositionSampler {
    fn new(profile: &PositionProfile) -> Self {
        let mut symbols = Vec::with_capacity(profile.unique);
        let mut cumulative = Vec::with_capacity(profile.unique);
        let mut acc = 0u64;
        for (sym, count) in profile.counts.iter() {
            acc += count;
            symbols.push(sym);
            cumulative.push(acc);
        }
        Self { symbols, cumulative }
    }

    fn total(&self) -> u64 {
        self.cumulative.last().copied().unwrap_or(0)
    }

    /// Symbol for a draw `u` in `[0, total)`: the first whose cumulative
    /// count is strictly greater than `u`. A draw equal to a cumulative
    /// boundary therefore belongs to the following symbol.
    fn select(&self, u: u64) -> char {
        let idx = self.cumulative.partition_point(|&cum| cum <= u);
        self.symbols[idx.min(self.symbols.len() - 1)]
    }

    /// An empty column has nothing to draw from and yields [`PAD_SYMBOL`],
    /// so later positions keep their place.
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> char {
        match self.total() {
            0 => PAD_SYMBOL,
            total => self.select(rng.random_range(0..total)),
        }
    }
}

fn build_samplers(summary: &CorpusSummary) -> Vec<PositionSampler> {
    summary
        .positions
        .iter()
        .map(PositionSampler::new)
        .collect()
}

fn draw_token<R: Rng + ?Sized>(samplers: &[PositionSampler], rng: &mut R) -> String {
    samplers.iter().map(|s| s.draw(rng)).collect()
}

fn check_count(count: usize) -> Result<()> {
    if count == 0 {
        return Err(HunterError::invalid("candidate count must be at least 1"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Candidate sampler with its own random stream.
#[derive(Debug, Clone)]
pub struct CandidateGenerator {
    rng: StdRng,
}

impl Default for CandidateGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateGenerator {
    /// Generator seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Generator with a reproducible stream.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn with_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::seeded)
    }

    /// Profile `tokens` and draw `count` candidates from the profile.
    pub fn generate<S: AsRef<str>>(&mut self, tokens: &[S], count: usize) -> Result<CandidateBatch> {
        check_count(count)?;
        let summary = analyze(tokens);
        self.generate_from_summary(&summary, count)
    }

    /// Draw `count` candidates from an existing profile.
    pub fn generate_from_summary(
        &mut self,
        summary: &CorpusSummary,
        count: usize,
    ) -> Result<CandidateBatch> {
        check_count(count)?;
        let samplers = build_samplers(summary);
        let candidates = (0..count)
            .map(|_| draw_token(&samplers, &mut self.rng))
            .collect();
        debug!(
            "generated {count} candidates over {} positions",
            samplers.len()
        );
        Ok(CandidateBatch { candidates })
    }

    /// Draw `count` candidates on `workers` threads.
    ///
    /// The batch is cut into [`PARALLEL_CHUNK`]-sized chunks, each with an
    /// RNG seeded from this generator's stream, so the output depends only on
    /// the generator state and never on `workers`. It differs from what
    /// [`generate_from_summary`](Self::generate_from_summary) would return.
    pub fn generate_parallel(
        &mut self,
        summary: &CorpusSummary,
        count: usize,
        workers: usize,
    ) -> Result<CandidateBatch> {
        check_count(count)?;
        if workers == 0 {
            return Err(HunterError::invalid("worker count must be at least 1"));
        }
        let samplers = build_samplers(summary);
        let n_chunks = count.div_ceil(PARALLEL_CHUNK);
        let seeds: Vec<u64> = (0..n_chunks).map(|_| self.rng.next_u64()).collect();
        let workers = workers.min(n_chunks);

        let mut chunks: Vec<(usize, Vec<String>)> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..workers)
                .map(|w| {
                    let samplers = &samplers;
                    let seeds = &seeds;
                    s.spawn(move || {
                        (w..n_chunks)
                            .step_by(workers)
                            .map(|chunk| {
                                let start = chunk * PARALLEL_CHUNK;
                                let len = PARALLEL_CHUNK.min(count - start);
                                let mut rng = StdRng::seed_from_u64(seeds[chunk]);
                                let tokens: Vec<String> =
                                    (0..len).map(|_| draw_token(samplers, &mut rng)).collect();
                                (chunk, tokens)
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        });
        chunks.sort_unstable_by_key(|&(chunk, _)| chunk);

        let candidates: Vec<String> = chunks.into_iter().flat_map(|(_, t)| t).collect();
        debug!(
            "generated {} candidates in {n_chunks} chunks on {workers} workers",
            candidates.len()
        );
        Ok(CandidateBatch { candidates })
    }
}

/// Profile `tokens` and draw `count` candidates; reproducible when `seed` is set.
pub fn generate<S: AsRef<str>>(tokens: &[S], count: usize, seed: Option<u64>) -> Result<CandidateBatch> {
    CandidateGenerator::with_seed(seed).generate(tokens, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::SymbolCounts;

    fn ninety_ten() -> Vec<String> {
        let mut tokens = Vec::with_capacity(1000);
        for i in 0..1000 {
            let head = if i % 10 == 0 { 'B' } else { 'A' };
            tokens.push(format!("{head}{}", i % 7));
        }
        tokens
    }

    #[test]
    fn test_count_is_exact() {
        let batch = generate(&["ab", "cd"], 137, Some(1)).unwrap();
        assert_eq!(batch.len(), 137);
        assert!(batch.iter().all(|c| c.chars().count() == 2));
    }

    #[test]
    fn test_zero_count_rejected() {
        let err = generate(&["ab"], 0, Some(1)).unwrap_err();
        assert!(matches!(err, HunterError::InvalidParameter(_)));
    }

    #[test]
    fn test_empty_corpus_yields_empty_strings() {
        let tokens: Vec<&str> = Vec::new();
        let batch = generate(&tokens, 5, Some(9)).unwrap();
        assert_eq!(batch.len(), 5);
        assert!(batch.iter().all(str::is_empty));
    }

    #[test]
    fn test_same_seed_same_batch() {
        let tokens = ninety_ten();
        let a = generate(&tokens, 500, Some(42)).unwrap();
        let b = generate(&tokens, 500, Some(42)).unwrap();
        assert_eq!(a, b);
        let c = generate(&tokens, 500, Some(43)).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_constant_position_is_always_reproduced() {
        let batch = generate(&["XY1", "XZ2", "XY3"], 200, Some(5)).unwrap();
        assert!(batch.iter().all(|c| c.starts_with('X')));
    }

    #[test]
    fn test_only_observed_symbols_appear() {
        let tokens = ["ab", "cd", "a"];
        let batch = generate(&tokens, 300, Some(7)).unwrap();
        for c in batch.iter() {
            let chars: Vec<char> = c.chars().collect();
            assert!(matches!(chars[0], 'a' | 'c'));
            assert!(matches!(chars[1], 'b' | 'd' | PAD_SYMBOL));
        }
    }

    #[test]
    fn test_sampling_fidelity() {
        let tokens = ninety_ten();
        let batch = generate(&tokens, 100_000, Some(2024)).unwrap();
        let a = batch.iter().filter(|c| c.starts_with('A')).count();
        let freq = a as f64 / batch.len() as f64;
        assert!((freq - 0.9).abs() < 0.01, "freq = {freq}");
    }

    #[test]
    fn test_select_boundaries() {
        // counts A=2, B=1, C=3 -> cumulative [2, 3, 6]
        let summary = analyze(&["A", "A", "B", "C", "C", "C"]);
        let sampler = PositionSampler::new(&summary.positions[0]);
        assert_eq!(sampler.total(), 6);
        let picks: Vec<char> = (0..6).map(|u| sampler.select(u)).collect();
        assert_eq!(picks, vec!['A', 'A', 'B', 'C', 'C', 'C']);
    }

    #[test]
    fn test_empty_column_keeps_its_place() {
        let mut summary = analyze(&["XAZ", "XBZ"]);
        summary.positions[1].counts = SymbolCounts::new();
        summary.positions[1].total = 0;
        summary.positions[1].unique = 0;

        let batch = CandidateGenerator::seeded(4)
            .generate_from_summary(&summary, 50)
            .unwrap();
        let expected: String = ['X', PAD_SYMBOL, 'Z'].iter().collect();
        assert!(batch.iter().all(|c| c == expected));

        let parallel = CandidateGenerator::seeded(4)
            .generate_parallel(&summary, 50, 2)
            .unwrap();
        assert!(parallel.iter().all(|c| c == expected));
    }

    #[test]
    fn test_hits_against_corpus() {
        let tokens = vec!["AA01", "AA02", "AA03"];
        let known: HashSet<&str> = tokens.iter().copied().collect();
        let batch = generate(&tokens, 3000, Some(11)).unwrap();
        let hits = batch.hits(&known).count();
        // Every candidate is "AA0" + one of {1,2,3}: all of them are hits.
        assert_eq!(hits, 3000);
    }

    #[test]
    fn test_parallel_independent_of_workers() {
        let summary = analyze(&ninety_ten());
        let count = PARALLEL_CHUNK * 3 + 17;
        let one = CandidateGenerator::seeded(3)
            .generate_parallel(&summary, count, 1)
            .unwrap();
        let four = CandidateGenerator::seeded(3)
            .generate_parallel(&summary, count, 4)
            .unwrap();
        let many = CandidateGenerator::seeded(3)
            .generate_parallel(&summary, count, 64)
            .unwrap();
        assert_eq!(one.len(), count);
        assert_eq!(one, four);
        assert_eq!(one, many);
    }

    #[test]
    fn test_parallel_rejects_zero_workers() {
        let summary = analyze(&["ab"]);
        let mut g = CandidateGenerator::seeded(1);
        assert!(g.generate_parallel(&summary, 10, 0).is_err());
    }
}
