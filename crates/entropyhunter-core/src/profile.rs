//! Positional profiling of a token corpus.
//!
//! Each position of the (normalized) tokens gets its own empirical
//! categorical distribution. The summary is built fresh per call from a
//! snapshot of the input and is never mutated afterwards.
//!
//! ```text
//! tokens → normalize (pad/truncate to max length) → per-position counts → stats
//! ```

use std::collections::HashMap;

use log::debug;
use serde::Serialize;

use crate::config::{AnomalyThresholds, PAD_SYMBOL};
use crate::entropy::{max_entropy, shannon_entropy};

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Length every token in `tokens` is normalized to: the longest token,
/// measured in Unicode scalar values.
pub fn normalized_length<S: AsRef<str>>(tokens: &[S]) -> usize {
    tokens
        .iter()
        .map(|t| t.as_ref().chars().count())
        .max()
        .unwrap_or(0)
}

/// Symbols of `token` right-padded with [`PAD_SYMBOL`] and truncated to
/// exactly `length` symbols.
pub fn padded_symbols(token: &str, length: usize) -> impl Iterator<Item = char> + '_ {
    token
        .chars()
        .chain(std::iter::repeat(PAD_SYMBOL))
        .take(length)
}

/// Normalize a batch so every token has the batch's maximum length.
pub fn normalize<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    let length = normalized_length(tokens);
    tokens
        .iter()
        .map(|t| padded_symbols(t.as_ref(), length).collect())
        .collect()
}

// ---------------------------------------------------------------------------
// Symbol counts
// ---------------------------------------------------------------------------

/// Symbol → count map that remembers first-occurrence order.
///
/// Iteration order is the order in which symbols were first counted, which
/// keeps the most-frequent tie-break and weighted sampling reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SymbolCounts {
    #[serde(rename = "symbols")]
    entries: Vec<(char, u64)>,
    #[serde(skip)]
    index: HashMap<char, usize>,
}

impl SymbolCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more occurrence of `symbol`.
    pub fn record(&mut self, symbol: char) {
        match self.index.get(&symbol) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(symbol, self.entries.len());
                self.entries.push((symbol, 1));
            }
        }
    }

    pub fn get(&self, symbol: char) -> u64 {
        self.index.get(&symbol).map_or(0, |&i| self.entries[i].1)
    }

    /// Number of distinct symbols seen.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|&(_, c)| c).sum()
    }

    /// `(symbol, count)` pairs in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (char, u64)> + '_ {
        self.entries.iter().copied()
    }

    /// Most frequent symbol; on equal counts the earliest-seen symbol wins.
    pub fn most_frequent(&self) -> Option<(char, u64)> {
        let mut best: Option<(char, u64)> = None;
        for &(sym, count) in &self.entries {
            match best {
                Some((_, c)) if count <= c => {}
                _ => best = Some((sym, count)),
            }
        }
        best
    }
}

impl FromIterator<char> for SymbolCounts {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        let mut counts = Self::new();
        for sym in iter {
            counts.record(sym);
        }
        counts
    }
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

/// Distribution and derived statistics for one position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionProfile {
    pub position: usize,
    pub counts: SymbolCounts,
    /// Number of observations (the corpus size).
    pub total: u64,
    pub unique: usize,
    pub most_frequent: char,
    pub most_frequent_count: u64,
    /// `most_frequent_count / total`.
    pub dominance_ratio: f64,
    /// Observed Shannon entropy in bits.
    pub entropy: f64,
    /// `log2(unique)`.
    pub max_entropy: f64,
    pub anomaly: bool,
}

impl PositionProfile {
    fn from_counts(position: usize, counts: SymbolCounts, thresholds: &AnomalyThresholds) -> Self {
        let total = counts.total();
        let unique = counts.len();
        let (most_frequent, most_frequent_count) =
            counts.most_frequent().unwrap_or((PAD_SYMBOL, 0));
        let dominance_ratio = if total == 0 {
            0.0
        } else {
            most_frequent_count as f64 / total as f64
        };
        let entropy = shannon_entropy(counts.iter().map(|(_, c)| c), total);
        Self {
            position,
            total,
            unique,
            most_frequent,
            most_frequent_count,
            dominance_ratio,
            entropy,
            max_entropy: max_entropy(unique),
            anomaly: thresholds.is_anomalous(dominance_ratio, entropy),
            counts,
        }
    }
}

/// Per-position profiles of a corpus and their aggregate entropy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusSummary {
    /// Number of tokens profiled.
    pub token_count: usize,
    pub positions: Vec<PositionProfile>,
    /// Sum of per-position entropies (assumes independent positions).
    pub total_entropy: f64,
}

impl CorpusSummary {
    /// Normalized token length (number of positions).
    pub fn length(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Size of a uniform space with the same total entropy, `2^H`.
    pub fn effective_space(&self) -> f64 {
        self.total_entropy.exp2()
    }

    /// Probability that a single guess drawn from the profile hits, `2^-H`.
    pub fn hit_probability(&self) -> f64 {
        (-self.total_entropy).exp2()
    }

    /// log2 of the average number of guesses to find one token, `H - 1`.
    pub fn expected_guesses_log2(&self) -> f64 {
        self.total_entropy - 1.0
    }

    pub fn anomalies(&self) -> impl Iterator<Item = &PositionProfile> {
        self.positions.iter().filter(|p| p.anomaly)
    }
}

/// Profile `tokens` with the default anomaly thresholds.
pub fn analyze<S: AsRef<str>>(tokens: &[S]) -> CorpusSummary {
    analyze_with(tokens, &AnomalyThresholds::default())
}

/// Profile `tokens`, flagging anomalies with `thresholds`.
///
/// Mixed-length input is normalized the same way [`normalize`] does, so
/// profiling the raw and the normalized batch gives identical summaries.
pub fn analyze_with<S: AsRef<str>>(tokens: &[S], thresholds: &AnomalyThresholds) -> CorpusSummary {
    let length = normalized_length(tokens);
    let mut columns: Vec<SymbolCounts> = vec![SymbolCounts::new(); length];
    for token in tokens {
        for (column, sym) in columns.iter_mut().zip(padded_symbols(token.as_ref(), length)) {
            column.record(sym);
        }
    }

    let positions: Vec<PositionProfile> = columns
        .into_iter()
        .enumerate()
        .map(|(i, counts)| PositionProfile::from_counts(i, counts, thresholds))
        .collect();
    // `Sum` for f64 starts at -0.0; an empty corpus must report +0.0.
    let total_entropy = positions.iter().fold(0.0, |acc, p| acc + p.entropy);

    let summary = CorpusSummary {
        token_count: tokens.len(),
        positions,
        total_entropy,
    };
    debug!(
        "profiled {} tokens over {} positions: {:.4} bits total, {} anomalous",
        summary.token_count,
        summary.length(),
        summary.total_entropy,
        summary.anomalies().count()
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_gives_empty_summary() {
        let tokens: Vec<String> = Vec::new();
        let s = analyze(&tokens);
        assert!(s.is_empty());
        assert_eq!(s.token_count, 0);
        assert_eq!(s.total_entropy, 0.0);
        assert!(s.total_entropy.is_sign_positive());
        assert_eq!(s.effective_space(), 1.0);
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains(r#""total_entropy":0.0"#), "{json}");
    }

    #[test]
    fn test_worked_example() {
        let s = analyze(&["AA01", "AA02", "AA03"]);
        assert_eq!(s.length(), 4);
        for p in &s.positions[..3] {
            assert_eq!(p.entropy, 0.0);
            assert_eq!(p.unique, 1);
            assert_eq!(p.dominance_ratio, 1.0);
            assert!(p.anomaly);
        }
        let last = &s.positions[3];
        assert_eq!(last.unique, 3);
        assert!((last.entropy - 3f64.log2()).abs() < 1e-12);
        assert!((last.entropy - last.max_entropy).abs() < 1e-12);
        assert_eq!(last.most_frequent, '1');
        assert!((s.total_entropy - 1.585).abs() < 1e-3);
        assert!((s.effective_space() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_tie_break_prefers_first_seen() {
        let s = analyze(&["B", "A", "A", "B", "C"]);
        let p = &s.positions[0];
        assert_eq!(p.most_frequent, 'B');
        assert_eq!(p.most_frequent_count, 2);

        let s = analyze(&["A", "B", "B", "A"]);
        assert_eq!(s.positions[0].most_frequent, 'A');
    }

    #[test]
    fn test_short_tokens_are_padded() {
        let s = analyze(&["ABC", "A"]);
        assert_eq!(s.length(), 3);
        let p1 = &s.positions[1];
        assert_eq!(p1.counts.get('B'), 1);
        assert_eq!(p1.counts.get(PAD_SYMBOL), 1);
        assert_eq!(p1.total, 2);
    }

    #[test]
    fn test_normalize_pads_to_longest() {
        let n = normalize(&["abcd", "ab", ""]);
        assert_eq!(n, vec!["abcd", "ab\0\0", "\0\0\0\0"]);
        assert!(n.iter().all(|t| t.chars().count() == 4));
    }

    #[test]
    fn test_normalize_then_analyze_is_identical() {
        let raw = vec!["x9", "x9k2", "y", "x9k2q", ""];
        let normalized = normalize(&raw);
        assert_eq!(analyze(&raw), analyze(&normalized));
        assert_eq!(normalize(&normalized), normalized);
    }

    #[test]
    fn test_entropy_bounds_hold() {
        let tokens = ["aab1", "abb2", "acb1", "aab3", "bzb1", "aab1"];
        let s = analyze(&tokens);
        for p in &s.positions {
            assert!(p.entropy >= 0.0);
            assert!(p.entropy <= p.max_entropy + 1e-12);
        }
        // Position 2 is constant, position 0 is skewed 5:1.
        assert_eq!(s.positions[2].entropy, 0.0);
        assert!(s.positions[0].entropy < s.positions[0].max_entropy);
    }

    #[test]
    fn test_multibyte_symbols_are_single_positions() {
        let s = analyze(&["αβ", "αγ"]);
        assert_eq!(s.length(), 2);
        assert_eq!(s.positions[0].most_frequent, 'α');
        assert!((s.positions[1].entropy - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_custom_thresholds() {
        let tokens = ["AB", "AC", "AD", "BE"];
        let lax = AnomalyThresholds {
            max_dominance: 0.9,
            min_entropy_bits: 0.5,
        };
        let s = analyze_with(&tokens, &lax);
        // 3/4 dominance, ~0.81 bits
        assert!(!s.positions[0].anomaly);
        assert!(analyze(&tokens).positions[0].anomaly);
    }

    #[test]
    fn test_symbol_counts_order_and_totals() {
        let counts: SymbolCounts = "zzyxz".chars().collect();
        let order: Vec<_> = counts.iter().collect();
        assert_eq!(order, vec![('z', 3), ('y', 1), ('x', 1)]);
        assert_eq!(counts.total(), 5);
        assert_eq!(counts.get('q'), 0);
        assert_eq!(counts.most_frequent(), Some(('z', 3)));
        assert_eq!(SymbolCounts::new().most_frequent(), None);
    }

    #[test]
    fn test_summary_serializes() {
        let s = analyze(&["AA01", "AA02"]);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["positions"].as_array().unwrap().len(), 4);
        assert_eq!(json["positions"][3]["counts"]["symbols"][0][0], "1");
    }
}
