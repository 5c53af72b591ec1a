/*!
 * Interactive point-sync session.
 *
 * Holds the untouched original, the reference track, the anchor list and an
 * optional preview. Anchors are captured from the original, and every apply
 * recomputes from the original, so the user can add, remove and re-apply
 * anchors freely before accepting the result.
 */

use log::{debug, info};

use crate::errors::SyncError;
use crate::subtitle_processor::SubtitleCollection;
use crate::sync::{apply_point_sync, AnchorPair, AnchorSet, CandidateMatch, MatchSuggester};

pub struct PointSyncSession {
    original: SubtitleCollection,
    reference: SubtitleCollection,
    anchors: AnchorSet,
    preview: Option<SubtitleCollection>,
    suggester: MatchSuggester,
}

impl PointSyncSession {
    pub fn new(original: SubtitleCollection) -> Self {
        Self::with_suggester(original, MatchSuggester::new())
    }

    pub fn with_suggester(original: SubtitleCollection, suggester: MatchSuggester) -> Self {
        PointSyncSession {
            original,
            reference: SubtitleCollection::new(),
            anchors: AnchorSet::new(),
            preview: None,
            suggester,
        }
    }

    /// Replace the reference track; anchors pointing into the old one are dropped
    pub fn load_reference(&mut self, reference: SubtitleCollection) {
        if !self.anchors.is_empty() {
            debug!("Dropping {} anchors bound to the previous reference", self.anchors.len());
            self.anchors.clear();
        }
        info!("Loaded {} reference cues", reference.len());
        self.reference = reference;
    }

    pub fn original(&self) -> &SubtitleCollection {
        &self.original
    }

    pub fn reference(&self) -> &SubtitleCollection {
        &self.reference
    }

    pub fn anchors(&self) -> &AnchorSet {
        &self.anchors
    }

    /// Sequence currently shown on the source side: the preview if applied
    pub fn displayed(&self) -> &SubtitleCollection {
        self.preview.as_ref().unwrap_or(&self.original)
    }

    pub fn is_applied(&self) -> bool {
        self.preview.is_some()
    }

    /// Candidates for the displayed start time of a source row
    pub fn suggest_for(&self, source_row: usize) -> Vec<CandidateMatch> {
        match self.displayed().get(source_row) {
            Some(entry) => self.suggester.suggest(entry.start, &self.reference),
            None => Vec::new(),
        }
    }

    /// Anchor a source row to a reference row; returns the anchor's position
    pub fn add_anchor(&mut self, source_row: usize, reference_row: usize) -> Result<usize, SyncError> {
        self.anchors
            .capture(&self.original, &self.reference, source_row, reference_row)
    }

    pub fn remove_anchor(&mut self, position: usize) -> Option<AnchorPair> {
        self.anchors.remove(position)
    }

    /// Compute the preview from the original; the session is untouched on error
    pub fn apply(&mut self) -> Result<&SubtitleCollection, SyncError> {
        let synced = apply_point_sync(&self.original, &self.anchors)?;
        info!("Applied {} sync anchors", self.anchors.len());
        Ok(&*self.preview.insert(synced))
    }

    /// Go back to showing the original
    pub fn reset(&mut self) {
        self.preview = None;
    }

    /// The accepted result, if a preview was applied
    pub fn finish(self) -> Option<SubtitleCollection> {
        self.preview
    }
}
