/*!
 * Tests for the constant time shift
 */

use subsync::errors::SyncError;
use subsync::sync::{shift, validate_shift_delta, MAX_SHIFT_MS};
use crate::common::{self, tc};

#[test]
fn test_shift_withZeroDelta_shouldBeIdentity() {
    let cues = common::random_sequence(25);
    assert_eq!(shift(&cues, 0), cues);
}

#[test]
fn test_shift_composed_shouldEqualSingleShift() {
    let cues = common::random_sequence(25);
    for (a, b) in [(1_500, -700), (-90_000, 30_000), (3_600_000, 3_600_000), (-5, 5)] {
        assert_eq!(shift(&shift(&cues, a), b), shift(&cues, a + b), "a={} b={}", a, b);
    }
}

#[test]
fn test_shift_shouldKeepTextAndNumbering() {
    let cues = common::sequence(&[1_000, 4_000]);
    let shifted = shift(&cues, 2_000);

    for (before, after) in cues.iter().zip(&shifted) {
        assert_eq!(before.seq_num, after.seq_num);
        assert_eq!(before.text, after.text);
        assert_eq!(before.duration_ms(), after.duration_ms());
    }
    assert_eq!(shifted.get(1).unwrap().start, tc(6_000));
}

#[test]
fn test_shift_beforeMidnight_shouldWrapToPreviousDay() {
    let cues = common::sequence(&[500]);
    let shifted = shift(&cues, -1_000);

    assert_eq!(shifted.get(0).unwrap().start.to_string(), "23:59:59,500");
    assert_eq!(shifted.get(0).unwrap().end.to_string(), "00:00:00,500");
    assert_eq!(shift(&shifted, 1_000), cues);
}

#[test]
fn test_shift_shouldNotTouchInput() {
    let cues = common::sequence(&[1_000]);
    let _ = shift(&cues, 10_000);
    assert_eq!(cues.get(0).unwrap().start, tc(1_000));
}

#[test]
fn test_validateShiftDelta_withinBound_shouldPass() {
    assert_eq!(validate_shift_delta(MAX_SHIFT_MS, MAX_SHIFT_MS), Ok(MAX_SHIFT_MS));
    assert_eq!(validate_shift_delta(-MAX_SHIFT_MS, MAX_SHIFT_MS), Ok(-MAX_SHIFT_MS));
}

#[test]
fn test_validateShiftDelta_beyondBound_shouldFail() {
    assert_eq!(
        validate_shift_delta(-MAX_SHIFT_MS - 1, MAX_SHIFT_MS),
        Err(SyncError::ShiftOutOfRange { delta_ms: -MAX_SHIFT_MS - 1, max_ms: MAX_SHIFT_MS })
    );
}
