/*!
 * Tests for reference match suggestions
 */

use rand::Rng;
use subsync::sync::{suggest_matches, CandidateMatch, MatchHeuristicConfig, MatchSuggester};
use subsync::SubtitleCollection;
use crate::common::{self, tc};

fn indices(candidates: &[CandidateMatch]) -> Vec<usize> {
    candidates.iter().map(|c| c.reference_index).collect()
}

#[test]
fn test_suggest_withNearbyCues_shouldRankByDistance() {
    let reference = common::sequence(&[0, 9_000, 10_500, 12_000, 50_000]);

    let candidates = suggest_matches(tc(10_000), &reference);

    assert_eq!(indices(&candidates), vec![2, 1, 3]);
    let total: f64 = candidates.iter().map(|c| c.weight).sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert!(candidates[0].weight > candidates[1].weight);
    assert!(candidates[1].weight > candidates[2].weight);
}

#[test]
fn test_suggest_withClosestCueTooFar_shouldReturnEmpty() {
    let reference = common::sequence(&[40_001, 90_000]);
    assert!(suggest_matches(tc(10_000), &reference).is_empty());
}

#[test]
fn test_suggest_atMaximumDistance_shouldStillSuggest() {
    let reference = common::sequence(&[40_000]);
    let candidates = suggest_matches(tc(10_000), &reference);

    assert_eq!(indices(&candidates), vec![0]);
    assert_eq!(candidates[0].weight, 1.0);
}

#[test]
fn test_suggest_withEmptyReference_shouldReturnEmpty() {
    assert!(suggest_matches(tc(1_000), &SubtitleCollection::new()).is_empty());
}

#[test]
fn test_suggest_withEqualDistances_shouldPreferLowerIndex() {
    let reference = common::sequence(&[4_000, 6_000]);

    let candidates = suggest_matches(tc(5_000), &reference);

    assert_eq!(indices(&candidates), vec![0, 1]);
    assert_eq!(candidates[0].weight, candidates[1].weight);
}

#[test]
fn test_suggest_withLowCoverage_shouldStillReturnMinimumCount() {
    let reference = common::sequence(&[0, 9_000, 10_500, 12_000, 50_000]);
    let config = MatchHeuristicConfig {
        coverage: 0.5,
        ..MatchHeuristicConfig::default()
    };

    let at_least_three = MatchSuggester::with_config(config.clone()).suggest(tc(10_000), &reference);
    assert_eq!(at_least_three.len(), 3);

    let at_least_one = MatchSuggester::with_config(MatchHeuristicConfig { min_candidates: 1, ..config })
        .suggest(tc(10_000), &reference);
    assert_eq!(indices(&at_least_one), vec![2, 1]);
}

#[test]
fn test_suggest_withUnboundedPoolWindow_shouldPoolEveryCue() {
    let reference = common::sequence(&[0, 9_000, 10_500, 12_000, 50_000]);
    let config = MatchHeuristicConfig {
        pool_window_ms: u64::MAX,
        ..MatchHeuristicConfig::default()
    };

    let candidates = MatchSuggester::with_config(config).suggest(tc(10_000), &reference);

    assert_eq!(candidates.first().map(|c| c.reference_index), Some(2));
}

#[test]
fn test_suggest_withRandomTracks_shouldKeepWeightInvariants() {
    let mut rng = rand::rng();

    for _ in 0..50 {
        let reference = common::random_sequence(rng.random_range(1..60));
        let source_time = tc(rng.random_range(0..200_000));

        let candidates = suggest_matches(source_time, &reference);
        let diffs: Vec<u64> = reference
            .iter()
            .map(|e| source_time.millis_to(e.start).unsigned_abs())
            .collect();
        let min_diff = *diffs.iter().min().unwrap();

        if min_diff > 30_000 {
            assert!(candidates.is_empty());
            continue;
        }

        assert!(!candidates.is_empty());
        assert_eq!(diffs[candidates[0].reference_index], min_diff);
        assert!(candidates.iter().all(|c| c.weight > 0.0 && c.weight <= 1.0));
        for pair in candidates.windows(2) {
            assert!(pair[0].weight >= pair[1].weight);
            if pair[0].weight == pair[1].weight {
                assert!(pair[0].reference_index < pair[1].reference_index);
            }
        }
        let total: f64 = candidates.iter().map(|c| c.weight).sum();
        assert!(total <= 1.0 + 1e-9);
    }
}

#[test]
fn test_relativeIntensity_shouldScaleToTopCandidate() {
    let top = CandidateMatch { reference_index: 0, weight: 0.5 };
    let other = CandidateMatch { reference_index: 1, weight: 0.25 };

    assert_eq!(top.relative_intensity(&top), 1.0);
    assert_eq!(other.relative_intensity(&top), 0.5);
}
