/*!
 * Uniform time shift.
 */

use crate::errors::SyncError;
use crate::subtitle_processor::SubtitleCollection;

/// Largest offset the caller-facing commands accept (one hour)
pub const MAX_SHIFT_MS: i64 = 3_600_000;

/// Add `delta_ms` to the start and end of every cue.
///
/// Accepts any offset; results that leave the day wrap around midnight.
pub fn shift(collection: &SubtitleCollection, delta_ms: i64) -> SubtitleCollection {
    collection.iter().map(|entry| entry.shifted(delta_ms)).collect()
}

/// Check an offset against a `±max_ms` bound
pub fn validate_shift_delta(delta_ms: i64, max_ms: i64) -> Result<i64, SyncError> {
    if delta_ms.abs() > max_ms {
        return Err(SyncError::ShiftOutOfRange { delta_ms, max_ms });
    }
    Ok(delta_ms)
}
