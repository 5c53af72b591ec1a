/*!
 * Anchor pairs for point synchronization.
 *
 * An anchor ties one cue of the original source sequence to one cue of the
 * reference sequence. Times are always taken from the original, never from a
 * previously synced preview, so re-applying the transform does not compound.
 */

use serde::{Deserialize, Serialize};

use crate::errors::SyncError;
use crate::subtitle_processor::SubtitleCollection;
use crate::timecode::TimeCode;

/// One source/reference correspondence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorPair {
    /// Position of the cue in the original source sequence
    pub source_index: usize,
    /// Position of the cue in the reference sequence
    pub reference_index: usize,
    /// Original start time of the source cue
    pub source_time: TimeCode,
    /// Start time of the reference cue
    pub reference_time: TimeCode,
}

impl AnchorPair {
    pub fn new(source_index: usize, reference_index: usize, source_time: TimeCode, reference_time: TimeCode) -> Self {
        AnchorPair {
            source_index,
            reference_index,
            source_time,
            reference_time,
        }
    }
}

/// Anchors kept sorted by source time, at most one per source cue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorSet {
    anchors: Vec<AnchorPair>,
}

impl AnchorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an anchor from the two sequences and insert it
    pub fn capture(
        &mut self,
        original: &SubtitleCollection,
        reference: &SubtitleCollection,
        source_index: usize,
        reference_index: usize,
    ) -> Result<usize, SyncError> {
        let source = original.get(source_index).ok_or(SyncError::SourceIndexOutOfRange {
            index: source_index,
            len: original.len(),
        })?;
        let target = reference.get(reference_index).ok_or(SyncError::ReferenceIndexOutOfRange {
            index: reference_index,
            len: reference.len(),
        })?;

        self.insert(AnchorPair::new(source_index, reference_index, source.start, target.start))
    }

    /// Insert keeping source-time order; returns the anchor's position.
    ///
    /// A new anchor goes before existing anchors with the same source time.
    pub fn insert(&mut self, anchor: AnchorPair) -> Result<usize, SyncError> {
        if self.contains_source(anchor.source_index) {
            return Err(SyncError::DuplicateAnchorSource {
                source_index: anchor.source_index,
            });
        }

        let position = self
            .anchors
            .partition_point(|existing| existing.source_time < anchor.source_time);
        self.anchors.insert(position, anchor);
        Ok(position)
    }

    pub fn remove(&mut self, position: usize) -> Option<AnchorPair> {
        if position < self.anchors.len() {
            Some(self.anchors.remove(position))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.anchors.clear();
    }

    pub fn contains_source(&self, source_index: usize) -> bool {
        self.anchors.iter().any(|a| a.source_index == source_index)
    }

    pub fn get(&self, position: usize) -> Option<&AnchorPair> {
        self.anchors.get(position)
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AnchorPair> {
        self.anchors.iter()
    }

    pub fn as_slice(&self) -> &[AnchorPair] {
        &self.anchors
    }
}

impl<'a> IntoIterator for &'a AnchorSet {
    type Item = &'a AnchorPair;
    type IntoIter = std::slice::Iter<'a, AnchorPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.anchors.iter()
    }
}
