/*!
 * Read-only checks on cue sequences.
 *
 * - `timecodes`: inverted ranges, ordering, overlaps and gaps
 */

pub mod timecodes;

// Re-export main types
pub use timecodes::{TimecodeIssue, TimecodeValidationResult, TimecodeValidator, TimecodeValidatorConfig};
