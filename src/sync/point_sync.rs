/*!
 * Piecewise-linear point synchronization.
 *
 * Consecutive anchors define segments. Inside a segment the start time of a
 * cue is rescaled linearly between the two anchors; before the first and
 * after the last anchor the nearest segment's slope is extrapolated. Cue
 * durations are carried over unchanged. Mapped times that leave the day wrap
 * modulo 24 hours, the same way a constant shift does.
 */

use log::{debug, trace};

use crate::errors::SyncError;
use crate::subtitle_processor::{SubtitleCollection, SubtitleEntry};
use crate::sync::anchors::{AnchorPair, AnchorSet};
use crate::timecode::TimeCode;

/// Where a cue index falls relative to the anchors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentPosition {
    /// Before the first anchor's source cue
    BeforeFirst,
    /// In `[A_j, A_{j+1})`, or `[A_j, A_{j+1}]` for the final segment
    Between(usize),
    /// After the last anchor's source cue
    AfterLast,
}

/// A transform built from at least two anchors
#[derive(Debug, Clone)]
pub struct PointSyncTransform {
    anchors: Vec<AnchorPair>,
}

impl PointSyncTransform {
    pub fn new(anchors: &AnchorSet) -> Result<Self, SyncError> {
        if anchors.len() < 2 {
            return Err(SyncError::InsufficientAnchors { found: anchors.len() });
        }
        Ok(PointSyncTransform {
            anchors: anchors.as_slice().to_vec(),
        })
    }

    /// Classify a cue index against the anchors' source indices.
    ///
    /// Anchors are walked in source-time order and the first one whose cue
    /// comes after `index` closes the segment. For a track sorted by start
    /// time this is the usual half-open segment lookup; when anchor cue
    /// indices are out of order the first such anchor still decides.
    pub fn classify(&self, index: usize) -> SegmentPosition {
        let last = self.anchors.len() - 1;
        let reached = self
            .anchors
            .iter()
            .position(|a| a.source_index > index)
            .unwrap_or(self.anchors.len());

        if reached == 0 {
            SegmentPosition::BeforeFirst
        } else if reached <= last {
            SegmentPosition::Between(reached - 1)
        } else if index == self.anchors[last].source_index {
            SegmentPosition::Between(last - 1)
        } else {
            SegmentPosition::AfterLast
        }
    }

    /// New start time for the cue at `index` whose original start is `start`.
    ///
    /// Results before midnight or past the end of the day wrap around.
    pub fn map_start(&self, index: usize, start: TimeCode) -> TimeCode {
        let last = self.anchors.len() - 1;
        let (from, to, base) = match self.classify(index) {
            SegmentPosition::BeforeFirst => (&self.anchors[0], &self.anchors[1], &self.anchors[0]),
            SegmentPosition::Between(j) => (&self.anchors[j], &self.anchors[j + 1], &self.anchors[j]),
            SegmentPosition::AfterLast => (&self.anchors[last - 1], &self.anchors[last], &self.anchors[last]),
        };

        let old_span = from.source_time.millis_to(to.source_time);
        if old_span == 0 {
            trace!("Degenerate segment for cue {}, keeping its time", index);
            return start;
        }
        let new_span = from.reference_time.millis_to(to.reference_time);

        let scale = new_span as f64 / old_span as f64;
        let offset = base.source_time.millis_to(start);
        base.reference_time.add_millis((offset as f64 * scale).round() as i64)
    }

    /// Re-time every cue of the original sequence
    pub fn apply(&self, original: &SubtitleCollection) -> Result<SubtitleCollection, SyncError> {
        if let Some(bad) = self.anchors.iter().find(|a| a.source_index >= original.len()) {
            return Err(SyncError::SourceIndexOutOfRange {
                index: bad.source_index,
                len: original.len(),
            });
        }

        let synced: SubtitleCollection = original
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let start = self.map_start(index, entry.start);
                SubtitleEntry {
                    start,
                    end: start.add_millis(entry.duration_ms()),
                    ..entry.clone()
                }
            })
            .collect();

        debug!("Applied point sync with {} anchors to {} cues", self.anchors.len(), synced.len());
        Ok(synced)
    }
}

/// Compute the synced sequence from the original sequence and its anchors.
///
/// Always starts from `original`, so repeated calls with the same anchors
/// give identical results. Cues extrapolated outside the day wrap modulo
/// 24 hours and can therefore end up out of order.
pub fn apply_point_sync(original: &SubtitleCollection, anchors: &AnchorSet) -> Result<SubtitleCollection, SyncError> {
    PointSyncTransform::new(anchors)?.apply(original)
}
