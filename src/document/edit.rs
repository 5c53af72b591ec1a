/*!
 * Typed single-field edits on a cue.
 */

use crate::errors::EditError;
use crate::subtitle_processor::SubtitleEntry;
use crate::timecode::TimeCode;

/// Editable field of a cue, in table column order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Index,
    Start,
    End,
    Text,
}

/// One validated change to one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    SetIndex(i64),
    SetStart(TimeCode),
    SetEnd(TimeCode),
    SetText(String),
}

impl EditCommand {
    /// Build a command from raw user input for `field`
    pub fn from_input(field: EditField, raw: &str) -> Result<Self, EditError> {
        match field {
            EditField::Index => raw
                .trim()
                .parse::<i64>()
                .map(Self::SetIndex)
                .map_err(|_| EditError::InvalidSequenceNumber(raw.to_string())),
            EditField::Start => Ok(Self::SetStart(TimeCode::parse(raw)?)),
            EditField::End => Ok(Self::SetEnd(TimeCode::parse(raw)?)),
            EditField::Text => Ok(Self::SetText(raw.to_string())),
        }
    }

    pub fn field(&self) -> EditField {
        match self {
            Self::SetIndex(_) => EditField::Index,
            Self::SetStart(_) => EditField::Start,
            Self::SetEnd(_) => EditField::End,
            Self::SetText(_) => EditField::Text,
        }
    }

    /// Apply to an entry, returning the outcome
    pub(crate) fn apply_to(self, entry: &mut SubtitleEntry) -> EditOutcome {
        let previous = entry.clone();
        match self {
            Self::SetIndex(value) => entry.seq_num = value,
            Self::SetStart(value) => entry.start = value,
            Self::SetEnd(value) => entry.end = value,
            Self::SetText(value) => entry.text = value,
        }

        if *entry == previous {
            EditOutcome::Unchanged
        } else {
            EditOutcome::Changed { previous }
        }
    }
}

/// Result of a successful edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The new value equals the old one
    Unchanged,
    /// The entry changed; `previous` holds its prior state
    Changed { previous: SubtitleEntry },
}

impl EditOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }
}
