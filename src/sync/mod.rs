/*!
 * Timing operations on cue sequences.
 *
 * # Architecture
 *
 * - `shift`: constant offset applied to every cue
 * - `anchors`: sorted anchor pairs captured from the original sequence
 * - `point_sync`: piecewise-linear re-timing between anchors
 * - `matching`: ranked reference-cue suggestions for anchor picking
 *
 * Every operation takes its input by reference and returns a new sequence.
 */

pub mod anchors;
pub mod matching;
pub mod point_sync;
pub mod shift;

// Re-export main types
pub use anchors::{AnchorPair, AnchorSet};
pub use matching::{suggest_matches, CandidateMatch, MatchHeuristicConfig, MatchSuggester};
pub use point_sync::{apply_point_sync, PointSyncTransform, SegmentPosition};
pub use shift::{shift, validate_shift_delta, MAX_SHIFT_MS};
