/*!
 * Candidate suggestions for picking a reference cue.
 *
 * Given the start time of a source cue, reference cues are ranked by how
 * close their start times are, using a Gaussian-shaped plausibility score
 * whose width adapts to the spread of nearby candidates. The result is a
 * presentation aid for a human choosing anchors, never an automatic match.
 */

use serde::{Deserialize, Serialize};

use crate::subtitle_processor::SubtitleCollection;
use crate::timecode::TimeCode;

/// A ranked guess at the reference cue matching a source cue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateMatch {
    /// Position in the reference sequence
    pub reference_index: usize,
    /// Share of the total plausibility, in `(0, 1]`
    pub weight: f64,
}

impl CandidateMatch {
    /// Weight relative to the best candidate, 1.0 for the best one
    pub fn relative_intensity(&self, top: &CandidateMatch) -> f64 {
        if top.weight > 0.0 {
            (self.weight / top.weight).min(1.0)
        } else {
            0.0
        }
    }
}

/// Tuning constants for the suggestion heuristic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchHeuristicConfig {
    /// Give up when the closest reference cue is further away than this
    #[serde(default = "default_max_min_diff_ms")]
    pub max_min_diff_ms: u64,

    /// Width of the pool used to estimate the spread, above the closest diff
    #[serde(default = "default_pool_window_ms")]
    pub pool_window_ms: u64,

    /// Spread assumed when the pool holds a single cue
    #[serde(default = "default_single_candidate_std_dev_ms")]
    pub single_candidate_std_dev_ms: f64,

    /// Minimum acceptance window above the closest diff
    #[serde(default = "default_min_threshold_window_ms")]
    pub min_threshold_window_ms: f64,

    /// Lower bound of the Gaussian width
    #[serde(default = "default_min_scale_ms")]
    pub min_scale_ms: f64,

    /// Stop once this share of the total weight is covered
    #[serde(default = "default_coverage")]
    pub coverage: f64,

    /// ...but never before this many candidates are selected
    #[serde(default = "default_min_candidates")]
    pub min_candidates: usize,
}

fn default_max_min_diff_ms() -> u64 {
    30_000
}

fn default_pool_window_ms() -> u64 {
    10_000
}

fn default_single_candidate_std_dev_ms() -> f64 {
    1_000.0
}

fn default_min_threshold_window_ms() -> f64 {
    3_000.0
}

fn default_min_scale_ms() -> f64 {
    1_000.0
}

fn default_coverage() -> f64 {
    0.95
}

fn default_min_candidates() -> usize {
    3
}

impl Default for MatchHeuristicConfig {
    fn default() -> Self {
        Self {
            max_min_diff_ms: default_max_min_diff_ms(),
            pool_window_ms: default_pool_window_ms(),
            single_candidate_std_dev_ms: default_single_candidate_std_dev_ms(),
            min_threshold_window_ms: default_min_threshold_window_ms(),
            min_scale_ms: default_min_scale_ms(),
            coverage: default_coverage(),
            min_candidates: default_min_candidates(),
        }
    }
}

/// Ranks reference cues for a source time
#[derive(Debug, Clone, Default)]
pub struct MatchSuggester {
    config: MatchHeuristicConfig,
}

impl MatchSuggester {
    /// Create a suggester with the default constants
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MatchHeuristicConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchHeuristicConfig {
        &self.config
    }

    /// Bounded, ordered candidate set; empty when nothing is close enough
    pub fn suggest(&self, source_time: TimeCode, reference: &SubtitleCollection) -> Vec<CandidateMatch> {
        let cfg = &self.config;

        let diffs: Vec<u64> = reference
            .iter()
            .map(|entry| source_time.millis_to(entry.start).unsigned_abs())
            .collect();

        let Some(&min_diff) = diffs.iter().min() else {
            return Vec::new();
        };
        if min_diff > cfg.max_min_diff_ms {
            return Vec::new();
        }

        let pool: Vec<f64> = diffs
            .iter()
            .filter(|&&d| d <= min_diff.saturating_add(cfg.pool_window_ms))
            .map(|&d| d as f64)
            .collect();
        let std_dev = if pool.len() <= 1 {
            cfg.single_candidate_std_dev_ms
        } else {
            population_std_dev(&pool)
        };

        let threshold = min_diff as f64 + (2.0 * std_dev).max(cfg.min_threshold_window_ms);
        let scale = std_dev.max(cfg.min_scale_ms);

        let mut scored: Vec<CandidateMatch> = diffs
            .iter()
            .enumerate()
            .filter(|&(_, &d)| d as f64 <= threshold)
            .map(|(reference_index, &d)| CandidateMatch {
                reference_index,
                weight: (-(d as f64 / scale).powi(2) / 2.0).exp(),
            })
            .collect();

        let total: f64 = scored.iter().map(|c| c.weight).sum();
        if total <= 0.0 {
            return Vec::new();
        }

        scored.sort_by(|a, b| {
            b.weight
                .total_cmp(&a.weight)
                .then(a.reference_index.cmp(&b.reference_index))
        });

        let mut selected = Vec::new();
        let mut cumulative = 0.0;
        for candidate in scored {
            if cumulative >= cfg.coverage && selected.len() >= cfg.min_candidates {
                break;
            }
            let share = candidate.weight / total;
            cumulative += share;
            // exp() underflows to zero far out in the tail
            if share > 0.0 {
                selected.push(CandidateMatch { weight: share, ..candidate });
            }
        }

        selected
    }
}

fn population_std_dev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Suggest reference cues for `source_time` using the default constants
pub fn suggest_matches(source_time: TimeCode, reference: &SubtitleCollection) -> Vec<CandidateMatch> {
    MatchSuggester::new().suggest(source_time, reference)
}
