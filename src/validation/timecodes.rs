/*!
 * Timecode validation for subtitle sequences.
 *
 * This module reports, without correcting anything:
 * - Inverted cues (end before start)
 * - Cues that start before the previous cue in presentation order
 * - Cues that start before the previous cue has ended
 * - Optionally, unusually large gaps between cues
 */

use log::debug;

use crate::subtitle_processor::{SubtitleCollection, SubtitleEntry};

/// Result of timecode validation for a single entry
#[derive(Debug, Clone)]
pub struct TimecodeEntryResult {
    /// Position of the entry in the sequence
    pub row: usize,
    /// Sequence number as stored
    pub seq_num: i64,
    /// Whether the entry passed validation
    pub passed: bool,
    /// Issues found
    pub issues: Vec<TimecodeIssue>,
}

/// Types of timecode issues
#[derive(Debug, Clone, PartialEq)]
pub enum TimecodeIssue {
    /// End time is before start time
    InvalidTimeRange {
        start_ms: u32,
        end_ms: u32,
    },
    /// Starts before the previous cue starts
    OutOfOrder {
        prev_row: usize,
        step_back_ms: i64,
    },
    /// Starts before the previous cue ends
    OverlapsWithEntry {
        prev_row: usize,
        overlap_ms: i64,
    },
    /// Gap too large between entries
    LargeGap {
        prev_row: usize,
        gap_ms: i64,
    },
}

impl TimecodeIssue {
    /// Large gaps are warnings, everything else is a failure
    pub fn is_failure(&self) -> bool {
        !matches!(self, TimecodeIssue::LargeGap { .. })
    }
}

impl std::fmt::Display for TimecodeIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimecodeIssue::InvalidTimeRange { start_ms, end_ms } => {
                write!(f, "Invalid time range: start {}ms > end {}ms", start_ms, end_ms)
            }
            TimecodeIssue::OutOfOrder { prev_row, step_back_ms } => {
                write!(
                    f,
                    "Starts {}ms before cue {} starts",
                    step_back_ms,
                    prev_row + 1
                )
            }
            TimecodeIssue::OverlapsWithEntry { prev_row, overlap_ms } => {
                write!(f, "Overlaps with cue {} by {}ms", prev_row + 1, overlap_ms)
            }
            TimecodeIssue::LargeGap { prev_row, gap_ms } => {
                write!(f, "Large gap of {}ms after cue {}", gap_ms, prev_row + 1)
            }
        }
    }
}

/// Result of validating all timecodes in a collection
#[derive(Debug, Clone)]
pub struct TimecodeValidationResult {
    /// Overall pass/fail status
    pub passed: bool,
    /// Results for each entry
    pub entry_results: Vec<TimecodeEntryResult>,
    /// Total number of issues
    pub total_issues: usize,
    /// Number of overlapping entries
    pub overlap_count: usize,
}

impl TimecodeValidationResult {
    /// Get all failed entries
    pub fn failed_entries(&self) -> Vec<&TimecodeEntryResult> {
        self.entry_results.iter().filter(|r| !r.passed).collect()
    }
}

/// Configuration for timecode validation
#[derive(Debug, Clone)]
pub struct TimecodeValidatorConfig {
    /// Whether to check for overlaps
    pub check_overlaps: bool,
    /// Maximum gap in ms before warning (0 = disable)
    pub max_gap_warning_ms: i64,
}

impl Default for TimecodeValidatorConfig {
    fn default() -> Self {
        Self {
            check_overlaps: true,
            max_gap_warning_ms: 0, // Disabled by default
        }
    }
}

/// Timecode validator for cue sequences
#[derive(Default)]
pub struct TimecodeValidator {
    config: TimecodeValidatorConfig,
}

impl TimecodeValidator {
    /// Create a new validator with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new validator with custom configuration
    pub fn with_config(config: TimecodeValidatorConfig) -> Self {
        Self { config }
    }

    /// Validate a single subtitle entry on its own
    pub fn validate_entry(&self, row: usize, entry: &SubtitleEntry) -> TimecodeEntryResult {
        let mut issues = Vec::new();

        if entry.duration_ms() < 0 {
            issues.push(TimecodeIssue::InvalidTimeRange {
                start_ms: entry.start.as_millis(),
                end_ms: entry.end.as_millis(),
            });
        }

        TimecodeEntryResult {
            row,
            seq_num: entry.seq_num,
            passed: issues.is_empty(),
            issues,
        }
    }

    /// Validate a whole sequence in presentation order
    pub fn validate_collection(&self, collection: &SubtitleCollection) -> TimecodeValidationResult {
        let entries = collection.entries();
        let mut entry_results: Vec<TimecodeEntryResult> = entries
            .iter()
            .enumerate()
            .map(|(row, e)| self.validate_entry(row, e))
            .collect();

        let mut overlap_count = 0;

        for (row, pair) in entries.windows(2).enumerate() {
            let (prev, next) = (&pair[0], &pair[1]);
            let result = &mut entry_results[row + 1];

            let step = prev.start.millis_to(next.start);
            if step < 0 {
                result.issues.push(TimecodeIssue::OutOfOrder {
                    prev_row: row,
                    step_back_ms: -step,
                });
                continue;
            }

            let gap = prev.end.millis_to(next.start);
            if self.config.check_overlaps && gap < 0 {
                overlap_count += 1;
                result.issues.push(TimecodeIssue::OverlapsWithEntry {
                    prev_row: row,
                    overlap_ms: -gap,
                });
            }

            if self.config.max_gap_warning_ms > 0 && gap > self.config.max_gap_warning_ms {
                result.issues.push(TimecodeIssue::LargeGap { prev_row: row, gap_ms: gap });
            }
        }

        for result in &mut entry_results {
            result.passed = !result.issues.iter().any(TimecodeIssue::is_failure);
        }

        let total_issues: usize = entry_results.iter().map(|r| r.issues.len()).sum();
        let passed = entry_results.iter().all(|r| r.passed);

        debug!(
            "Timecode validation: {} entries, {} issues, {} overlaps",
            entries.len(),
            total_issues,
            overlap_count
        );

        TimecodeValidationResult {
            passed,
            entry_results,
            total_issues,
            overlap_count,
        }
    }
}
