/*!
 * Subtitle document model.
 *
 * A `SubtitleDocument` is the "current file" a front end works on: the cue
 * sequence, where it came from, and whether it has unsaved changes. Whole-
 * sequence operations build a new snapshot and swap it in only on success;
 * single-field edits are validated before anything is touched.
 *
 * - `edit`: typed per-field edit commands
 * - `session`: point-sync session state (anchors, preview, reset)
 */

pub mod edit;
pub mod session;

use std::path::{Path, PathBuf};

use log::info;

use crate::errors::{EditError, SubtitleError, SyncError};
use crate::subtitle_processor::{SubtitleCollection, SubtitleEncoding, SubtitleEntry};
use crate::sync::{shift, validate_shift_delta, MAX_SHIFT_MS};

pub use edit::{EditCommand, EditField, EditOutcome};
pub use session::PointSyncSession;

#[derive(Debug, Clone)]
pub struct SubtitleDocument {
    entries: SubtitleCollection,
    path: Option<PathBuf>,
    encoding: SubtitleEncoding,
    modified: bool,
    max_shift_ms: i64,
}

impl SubtitleDocument {
    /// Wrap an in-memory sequence that has no file yet
    pub fn from_collection(entries: SubtitleCollection) -> Self {
        SubtitleDocument {
            entries,
            path: None,
            encoding: SubtitleEncoding::Utf8,
            modified: false,
            max_shift_ms: MAX_SHIFT_MS,
        }
    }

    /// Load a document from disk
    pub fn open<P: AsRef<Path>>(path: P, encoding: SubtitleEncoding) -> Result<Self, SubtitleError> {
        let path = path.as_ref();
        let entries = SubtitleCollection::from_file(path, encoding)?;
        info!("Loaded {} subtitles from {:?}", entries.len(), path);

        Ok(SubtitleDocument {
            entries,
            path: Some(path.to_path_buf()),
            encoding,
            modified: false,
            max_shift_ms: MAX_SHIFT_MS,
        })
    }

    /// Override the bound used by `shift`
    pub fn with_max_shift(mut self, max_shift_ms: i64) -> Self {
        self.max_shift_ms = max_shift_ms;
        self
    }

    pub fn entries(&self) -> &SubtitleCollection {
        &self.entries
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Encoding the document was read with (it is always saved as UTF-8)
    pub fn encoding(&self) -> SubtitleEncoding {
        self.encoding
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Save to the current path
    pub fn save(&mut self) -> Result<(), SubtitleError> {
        let path = self.path.clone().ok_or(SubtitleError::MissingPath)?;
        self.save_as(path)
    }

    /// Save to `path` and make it the current path
    pub fn save_as<P: AsRef<Path>>(&mut self, path: P) -> Result<(), SubtitleError> {
        let path = path.as_ref();
        self.entries.write_to_srt(path)?;
        info!("Saved {} subtitles to {:?}", self.entries.len(), path);

        self.path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    /// Shift every cue; rejected offsets leave the document untouched
    pub fn shift(&mut self, delta_ms: i64) -> Result<(), SyncError> {
        let delta_ms = validate_shift_delta(delta_ms, self.max_shift_ms)?;
        self.entries = shift(&self.entries, delta_ms);
        self.modified = true;
        info!("Applied a {}ms time shift", delta_ms);
        Ok(())
    }

    /// Swap in a new sequence, e.g. an accepted point-sync result
    pub fn replace_entries(&mut self, entries: SubtitleCollection) {
        self.entries = entries;
        self.modified = true;
    }

    /// Start a point-sync session on the current sequence
    pub fn point_sync_session(&self) -> PointSyncSession {
        PointSyncSession::new(self.entries.clone())
    }

    /// Change one field of one cue
    pub fn apply_edit(&mut self, row: usize, command: EditCommand) -> Result<EditOutcome, EditError> {
        let len = self.entries.len();
        let entry: &mut SubtitleEntry = self
            .entries
            .entry_mut(row)
            .ok_or(EditError::RowOutOfRange { row, len })?;

        let outcome = command.apply_to(entry);
        if outcome.is_changed() {
            self.modified = true;
        }
        Ok(outcome)
    }

    /// Parse raw input for `field` and apply it to `row`
    pub fn edit_field(&mut self, row: usize, field: EditField, raw: &str) -> Result<EditOutcome, EditError> {
        if row >= self.entries.len() {
            return Err(EditError::RowOutOfRange { row, len: self.entries.len() });
        }
        let command = EditCommand::from_input(field, raw)?;
        self.apply_edit(row, command)
    }

    /// File name with a trailing `*` when there are unsaved changes
    pub fn title(&self) -> String {
        let mut title = self
            .path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| String::from("Untitled"));

        if self.modified {
            title.push_str(" *");
        }
        title
    }
}
