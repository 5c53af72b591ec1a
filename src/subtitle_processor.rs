use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::anyhow;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::{SubtitleError, TimeCodeError};
use crate::timecode::TimeCode;

// @module: SRT codec and the ordered cue store

// @const: Blank line(s) between blocks, whitespace-only lines count as blank
static BLOCK_SEPARATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n\s*\n").unwrap()
});

// @const: SRT timestamp line, flexible around the arrow, trailing data ignored
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}:\d{2}:\d{2},\d{3})\s*-->\s*(\d{2}:\d{2}:\d{2},\d{3})").unwrap()
});

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Text encodings accepted when reading subtitle files.
///
/// Writing is always UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleEncoding {
    #[default]
    #[serde(alias = "utf-8")]
    Utf8,
    /// GB18030, a superset of GBK
    #[serde(alias = "gbk")]
    Gb18030,
}

impl SubtitleEncoding {
    /// Decode raw bytes, failing on any invalid sequence instead of substituting
    pub fn decode(self, bytes: &[u8]) -> Result<String, SubtitleError> {
        let (encoding, payload) = match self {
            Self::Utf8 => (encoding_rs::UTF_8, bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)),
            Self::Gb18030 => (encoding_rs::GB18030, bytes),
        };

        encoding
            .decode_without_bom_handling_and_without_replacement(payload)
            .map(Cow::into_owned)
            .ok_or(SubtitleError::Decode { encoding: self })
    }
}

impl fmt::Display for SubtitleEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utf8 => write!(f, "UTF-8"),
            Self::Gb18030 => write!(f, "GB18030"),
        }
    }
}

impl FromStr for SubtitleEncoding {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Self::Utf8),
            "gb18030" | "gbk" | "gb2312" => Ok(Self::Gb18030),
            _ => Err(anyhow!("Unsupported subtitle encoding: {}", s)),
        }
    }
}

/// Reason a block was skipped during lenient parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedBlock {
    #[error("block has {found} non-blank lines, at least 3 are required")]
    TooFewLines { found: usize },

    #[error("'{0}' is not a sequence number")]
    BadSequenceNumber(String),

    #[error("no timestamp range found in '{0}'")]
    MissingTimestamp(String),

    #[error("timestamp out of range: {0}")]
    BadTimestamp(#[from] TimeCodeError),
}

// @struct: Single subtitle cue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    // @field: Sequence number as written in the file, user-editable
    pub seq_num: i64,

    // @field: Start time
    pub start: TimeCode,

    // @field: End time, not required to follow start
    pub end: TimeCode,

    // @field: Cue text, lines joined with '\n'
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry
    pub fn new(seq_num: i64, start: TimeCode, end: TimeCode, text: impl Into<String>) -> Self {
        SubtitleEntry {
            seq_num,
            start,
            end,
            text: text.into(),
        }
    }

    /// Signed cue length in milliseconds, negative for inverted ranges
    pub fn duration_ms(&self) -> i64 {
        self.start.millis_to(self.end)
    }

    /// Same cue moved by a constant offset
    pub fn shifted(&self, delta_ms: i64) -> Self {
        SubtitleEntry {
            start: self.start.add_millis(delta_ms),
            end: self.end.add_millis(delta_ms),
            ..self.clone()
        }
    }

    /// Parse one blank-line-delimited block
    pub fn parse_block(block: &str) -> Result<Self, MalformedBlock> {
        let lines: Vec<&str> = block
            .split('\n')
            .filter(|line| !line.trim().is_empty())
            .collect();

        if lines.len() < 3 {
            return Err(MalformedBlock::TooFewLines { found: lines.len() });
        }

        let seq_line = lines[0].trim();
        let seq_num = seq_line
            .parse::<i64>()
            .map_err(|_| MalformedBlock::BadSequenceNumber(seq_line.to_string()))?;

        let time_line = lines[1].trim();
        let caps = TIMESTAMP_REGEX
            .captures(time_line)
            .ok_or_else(|| MalformedBlock::MissingTimestamp(time_line.to_string()))?;
        let start = TimeCode::parse(&caps[1])?;
        let end = TimeCode::parse(&caps[2])?;

        Ok(SubtitleEntry {
            seq_num,
            start,
            end,
            text: lines[2..].join("\n"),
        })
    }

    fn write_block(&self, out: &mut String, number: usize) {
        out.push_str(&format!("{}\n{} --> {}\n{}\n", number, self.start, self.end, self.text));
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.start, self.end)?;
        write!(f, "{}", self.text)
    }
}

/// Ordered, index-stable sequence of subtitle cues.
///
/// Position is presentation order; `seq_num` is carried along but never
/// used for ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtitleCollection {
    entries: Vec<SubtitleEntry>,
}

impl SubtitleCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<SubtitleEntry>) -> Self {
        SubtitleCollection { entries }
    }

    /// Read and parse an SRT file with the given encoding
    pub fn from_file<P: AsRef<Path>>(path: P, encoding: SubtitleEncoding) -> Result<Self, SubtitleError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| SubtitleError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!("Read {} bytes from {:?} as {}", bytes.len(), path, encoding);
        Self::parse_bytes(&bytes, encoding)
    }

    /// Decode raw bytes and parse them as SRT
    pub fn parse_bytes(bytes: &[u8], encoding: SubtitleEncoding) -> Result<Self, SubtitleError> {
        let content = encoding.decode(bytes)?;
        Self::parse_srt_string(&content)
    }

    /// Parse SRT text, skipping malformed blocks
    pub fn parse_srt_string(content: &str) -> Result<Self, SubtitleError> {
        let normalized = content.replace("\r\n", "\n");
        let mut entries = Vec::new();
        let mut skipped = 0;

        for (block_no, block) in BLOCK_SEPARATOR.split(&normalized).enumerate() {
            if block.trim().is_empty() {
                continue;
            }

            match SubtitleEntry::parse_block(block) {
                Ok(entry) => entries.push(entry),
                Err(reason) => {
                    skipped += 1;
                    debug!("Skipping subtitle block {}: {}", block_no + 1, reason);
                }
            }
        }

        if entries.is_empty() {
            warn!("No valid subtitle entries found in content");
            return Err(SubtitleError::EmptyResult);
        }

        if skipped > 0 {
            debug!("Parsed {} subtitle entries, skipped {} malformed blocks", entries.len(), skipped);
        }

        Ok(SubtitleCollection { entries })
    }

    /// Serialize to SRT, numbering blocks by position
    pub fn to_srt_string(&self) -> String {
        let mut out = String::new();
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            entry.write_block(&mut out, i + 1);
        }
        out
    }

    /// Write subtitles to an SRT file as UTF-8
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<(), SubtitleError> {
        let path = path.as_ref();
        let io_error = |source| SubtitleError::Io {
            path: path.to_path_buf(),
            source,
        };

        // Create parent directory if needed
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        fs::write(path, self.to_srt_string()).map_err(io_error)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SubtitleEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[SubtitleEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SubtitleEntry> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> Vec<SubtitleEntry> {
        self.entries
    }

    pub(crate) fn entry_mut(&mut self, index: usize) -> Option<&mut SubtitleEntry> {
        self.entries.get_mut(index)
    }

    /// Move every cue by a constant offset in place
    pub fn shift_in_place(&mut self, delta_ms: i64) {
        for entry in &mut self.entries {
            entry.start = entry.start.add_millis(delta_ms);
            entry.end = entry.end.add_millis(delta_ms);
        }
    }

    /// Copy with sequence numbers rewritten to `1..N` by position
    pub fn renumbered(&self) -> Self {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| SubtitleEntry {
                seq_num: i as i64 + 1,
                ..entry.clone()
            })
            .collect()
    }
}

impl FromIterator<SubtitleEntry> for SubtitleCollection {
    fn from_iter<I: IntoIterator<Item = SubtitleEntry>>(iter: I) -> Self {
        SubtitleCollection {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SubtitleCollection {
    type Item = &'a SubtitleEntry;
    type IntoIter = std::slice::Iter<'a, SubtitleEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Decode and parse SRT bytes
pub fn parse(bytes: &[u8], encoding: SubtitleEncoding) -> Result<SubtitleCollection, SubtitleError> {
    SubtitleCollection::parse_bytes(bytes, encoding)
}

/// Serialize a cue sequence to SRT text (UTF-8)
pub fn format(collection: &SubtitleCollection) -> String {
    collection.to_srt_string()
}
