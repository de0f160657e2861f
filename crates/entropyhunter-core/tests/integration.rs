//! Integration tests for entropyhunter-core.
//!
//! These exercise the full pipeline:
//! corpus → profile → candidates, and model → population → profile → guesses.

use std::collections::HashSet;
use std::io::Write;

use entropyhunter_core::{
    BiasedSubsetModel, CandidateGenerator, HunterConfig, HunterError, ModelParams, TheoryParams,
    TheoryReport, analyze, analyze_with, generate, normalize, predict,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn session_like_corpus() -> Vec<String> {
    // Fixed prefix, two-digit "user", a counter-ish block and a fixed suffix.
    (0..500)
        .map(|i| format!("AAAA{:02}{:04}ZZ", i % 37, (i * 13) % 1000))
        .collect()
}

#[test]
fn worked_example_end_to_end() {
    let tokens = ["AA01", "AA02", "AA03"];
    let summary = analyze(&tokens);
    assert_eq!(summary.length(), 4);
    assert!((summary.total_entropy - 1.585).abs() < 1e-3);
    assert!((summary.effective_space() - 3.0).abs() < 1e-9);
    assert!((summary.hit_probability() - 1.0 / 3.0).abs() < 1e-9);

    let batch = generate(&tokens, 50, Some(1)).unwrap();
    let known: HashSet<&str> = tokens.iter().copied().collect();
    assert_eq!(batch.hits(&known).count(), 50);
}

#[test]
fn fixed_prefix_and_suffix_are_flagged() {
    let summary = analyze(&session_like_corpus());
    assert_eq!(summary.length(), 12);
    for pos in [0, 1, 2, 3, 10, 11] {
        let p = &summary.positions[pos];
        assert_eq!(p.entropy, 0.0, "position {pos}");
        assert!(p.anomaly, "position {pos}");
    }
    assert!(summary.anomalies().count() >= 6);
}

#[test]
fn entropy_never_exceeds_max() {
    let summary = analyze(&session_like_corpus());
    for p in &summary.positions {
        assert!(p.entropy >= 0.0);
        assert!(p.entropy <= p.max_entropy + 1e-12);
    }
}

#[test]
fn mixed_lengths_profile_like_normalized() {
    let raw: Vec<String> = session_like_corpus()
        .into_iter()
        .enumerate()
        .map(|(i, t)| t.chars().take(6 + i % 7).collect())
        .collect();
    let normalized = normalize(&raw);
    assert_eq!(analyze(&raw), analyze(&normalized));
}

#[test]
fn generated_candidates_respect_positional_support() {
    let corpus = session_like_corpus();
    let summary = analyze(&corpus);
    let mut generator = CandidateGenerator::seeded(99);
    let batch = generator.generate_from_summary(&summary, 2_000).unwrap();
    for c in batch.iter() {
        assert!(c.starts_with("AAAA"));
        assert!(c.ends_with("ZZ"));
        for (sym, profile) in c.chars().zip(&summary.positions) {
            assert!(profile.counts.get(sym) > 0);
        }
    }
}

#[test]
fn sampling_tracks_observed_frequencies() {
    let mut corpus = vec!["A".to_string(); 900];
    corpus.extend(std::iter::repeat_n("B".to_string(), 100));
    let batch = generate(&corpus, 100_000, Some(5)).unwrap();
    let a = batch.iter().filter(|c| *c == "A").count() as f64 / 100_000.0;
    assert!((a - 0.9).abs() < 0.01, "observed {a}");
}

#[test]
fn same_seed_reproduces_batch() {
    let corpus = session_like_corpus();
    let a = generate(&corpus, 1_000, Some(1234)).unwrap();
    let b = generate(&corpus, 1_000, Some(1234)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn model_population_matches_theory() {
    let params = ModelParams::new(4, 8.0, 16);
    let mut rng = StdRng::seed_from_u64(77);
    let model = BiasedSubsetModel::build(params.clone(), &mut rng).unwrap();
    let (per, total) = predict(params.subset_k, params.fav_weight, params.length).unwrap();
    assert_eq!(model.predict(), (per, total));

    let population = model.sample_many(30_000, &mut rng);
    let summary = analyze(&population);
    assert!((summary.total_entropy - total).abs() < 0.3);

    let report = TheoryReport::compute(TheoryParams {
        subset_k: 4,
        fav_weight: 8.0,
        length: 16,
        sample_size: 50_000,
        guesses: 100_000,
    })
    .unwrap();
    assert_eq!(report.total_bits, total);
}

#[test]
fn invalid_parameters_are_rejected_up_front() {
    assert!(matches!(
        predict(1, 2.0, 8),
        Err(HunterError::InvalidParameter(_))
    ));
    assert!(matches!(
        generate(&["abc"], 0, None),
        Err(HunterError::InvalidParameter(_))
    ));
    let mut rng = StdRng::seed_from_u64(0);
    assert!(BiasedSubsetModel::build(ModelParams::new(9, 1.0, 4).with_alphabet("abc"), &mut rng).is_err());
}

#[test]
fn config_file_drives_thresholds() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"{{"anomaly": {{"max_dominance": 0.99, "min_entropy_bits": 0.0}}, "workers": 2}}"#
    )
    .unwrap();
    let cfg = HunterConfig::load(file.path()).unwrap();
    assert_eq!(cfg.workers, 2);

    // A 3:1 split is flagged by default but not under the relaxed policy.
    let tokens = ["A", "A", "A", "B"];
    assert!(analyze(&tokens).positions[0].anomaly);
    assert!(!analyze_with(&tokens, &cfg.anomaly).positions[0].anomaly);
}

#[test]
fn missing_config_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = HunterConfig::load(dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, HunterError::Io { .. }));
}
