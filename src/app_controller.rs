use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::document::{PointSyncSession, SubtitleDocument};
use crate::file_utils::FileManager;
use crate::subtitle_processor::{SubtitleCollection, SubtitleEncoding};
use crate::sync::{CandidateMatch, MatchSuggester};
use crate::validation::{TimecodeValidationResult, TimecodeValidator};

// @module: Application controller for subtitle synchronization

/// Counts reported after a folder run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Main application controller running the CLI commands on files
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn encoding_or_default(&self, encoding: Option<SubtitleEncoding>) -> SubtitleEncoding {
        encoding.unwrap_or(self.config.encoding)
    }

    fn resolve_output(&self, input: &Path, output: Option<PathBuf>, force_overwrite: bool) -> Result<Option<PathBuf>> {
        if !FileManager::file_exists(input) {
            return Err(anyhow!("Input file does not exist: {:?}", input));
        }

        let output_path = output.unwrap_or_else(|| FileManager::sibling_output_path(input, &self.config.output.suffix));
        if output_path.exists() && !force_overwrite {
            warn!("Output file already exists: {:?}. Use -f to force overwrite.", output_path);
            return Ok(None);
        }
        Ok(Some(output_path))
    }

    fn load(&self, path: &Path, encoding: Option<SubtitleEncoding>) -> Result<SubtitleDocument> {
        let document = SubtitleDocument::open(path, self.encoding_or_default(encoding))
            .with_context(|| format!("Failed to load subtitles from {}", path.display()))?;
        Ok(document.with_max_shift(self.config.shift.max_shift_ms))
    }

    /// Shift one file; returns the written path, or `None` when skipped
    pub fn run_shift(
        &self,
        input: &Path,
        output: Option<PathBuf>,
        delta_ms: i64,
        encoding: Option<SubtitleEncoding>,
        force_overwrite: bool,
    ) -> Result<Option<PathBuf>> {
        let Some(output_path) = self.resolve_output(input, output, force_overwrite)? else {
            return Ok(None);
        };

        let mut document = self.load(input, encoding)?;
        document.shift(delta_ms)?;
        document.save_as(&output_path)?;

        info!("Shifted {} cues by {}ms: {:?}", document.entries().len(), delta_ms, output_path);
        Ok(Some(output_path))
    }

    /// Shift every SRT file below a directory
    pub fn run_shift_folder(
        &self,
        input_dir: &Path,
        delta_ms: i64,
        encoding: Option<SubtitleEncoding>,
        force_overwrite: bool,
    ) -> Result<FolderSummary> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let files = FileManager::find_subtitle_files(input_dir, &self.config.output.suffix)?;
        if files.is_empty() {
            return Err(anyhow!("No subtitle files found in directory: {:?}", input_dir));
        }

        let folder_pb = ProgressBar::new(files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));

        let mut summary = FolderSummary::default();

        for file in &files {
            let file_name = file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Shifting: {}", file_name));

            match self.run_shift(file, None, delta_ms, encoding, force_overwrite) {
                Ok(Some(_)) => summary.processed += 1,
                Ok(None) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {}: {:#}", file_name, e);
                    summary.failed += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");
        info!(
            "Folder processing completed in {}: {} processed, {} skipped, {} errors",
            Self::format_duration(start_time.elapsed()),
            summary.processed,
            summary.skipped,
            summary.failed
        );

        Ok(summary)
    }

    /// Point-sync `source` against `reference` using 1-based cue number pairs
    pub fn run_sync(
        &self,
        source: &Path,
        reference: &Path,
        anchors: &[(usize, usize)],
        output: Option<PathBuf>,
        encoding: Option<SubtitleEncoding>,
        force_overwrite: bool,
    ) -> Result<Option<PathBuf>> {
        let Some(output_path) = self.resolve_output(source, output, force_overwrite)? else {
            return Ok(None);
        };

        let mut document = self.load(source, encoding)?;
        let reference_cues = self.load(reference, encoding)?.entries().clone();

        let suggester = MatchSuggester::with_config(self.config.matching.clone());
        let mut session = PointSyncSession::with_suggester(document.entries().clone(), suggester);
        session.load_reference(reference_cues);
        for &(source_no, reference_no) in anchors {
            let (source_row, reference_row) = Self::to_rows(source_no, reference_no)?;
            session
                .add_anchor(source_row, reference_row)
                .with_context(|| format!("Invalid anchor {}:{}", source_no, reference_no))?;
            debug!("Anchored source cue {} to reference cue {}", source_no, reference_no);
        }

        session.apply()?;
        let synced = session
            .finish()
            .ok_or_else(|| anyhow!("Point sync produced no result"))?;

        document.replace_entries(synced);
        document.save_as(&output_path)?;

        info!("Synced {} cues with {} anchors: {:?}", document.entries().len(), anchors.len(), output_path);
        Ok(Some(output_path))
    }

    /// Candidate reference cues for a 1-based source cue number
    pub fn suggest(
        &self,
        source: &Path,
        reference: &Path,
        cue_number: usize,
        encoding: Option<SubtitleEncoding>,
    ) -> Result<(SubtitleCollection, Vec<CandidateMatch>)> {
        let source_cues = self.load(source, encoding)?.entries().clone();
        let reference_cues = self.load(reference, encoding)?.entries().clone();

        let row = cue_number
            .checked_sub(1)
            .ok_or_else(|| anyhow!("Cue numbers start at 1"))?;
        let entry = source_cues
            .get(row)
            .ok_or_else(|| anyhow!("Source has {} cues, cue {} does not exist", source_cues.len(), cue_number))?;

        let suggester = MatchSuggester::with_config(self.config.matching.clone());
        let candidates = suggester.suggest(entry.start, &reference_cues);
        if candidates.is_empty() {
            info!("No reference cue within {}ms of {}", self.config.matching.max_min_diff_ms, entry.start);
        }

        Ok((reference_cues, candidates))
    }

    /// Validate the timing of one file, optionally writing the report
    pub fn run_check(
        &self,
        input: &Path,
        encoding: Option<SubtitleEncoding>,
        report_path: Option<&Path>,
    ) -> Result<TimecodeValidationResult> {
        let document = self.load(input, encoding)?;
        let result = TimecodeValidator::new().validate_collection(document.entries());

        if let Some(report_path) = report_path {
            FileManager::write_to_file(report_path, &Self::format_report(input, &result))?;
            info!("Timing report written to {:?}", report_path);
        }

        Ok(result)
    }

    /// Re-encode to UTF-8 with sequential numbering
    pub fn run_convert(
        &self,
        input: &Path,
        output: Option<PathBuf>,
        encoding: Option<SubtitleEncoding>,
        force_overwrite: bool,
    ) -> Result<Option<PathBuf>> {
        let Some(output_path) = self.resolve_output(input, output, force_overwrite)? else {
            return Ok(None);
        };

        let mut document = self.load(input, encoding)?;
        let renumbered = document.entries().renumbered();
        document.replace_entries(renumbered);
        document.save_as(&output_path)?;

        info!("Converted {:?} from {} to UTF-8: {:?}", input, document.encoding(), output_path);
        Ok(Some(output_path))
    }

    /// Plain-text timing report
    pub fn format_report(input: &Path, result: &TimecodeValidationResult) -> String {
        let mut report = format!(
            "Timing report for {}\n{} cues, {} issues, {} overlaps\n",
            input.display(),
            result.entry_results.len(),
            result.total_issues,
            result.overlap_count
        );

        for entry in result.entry_results.iter().filter(|r| !r.issues.is_empty()) {
            for issue in &entry.issues {
                report.push_str(&format!("cue {} (#{}): {}\n", entry.row + 1, entry.seq_num, issue));
            }
        }
        report
    }

    fn to_rows(source_no: usize, reference_no: usize) -> Result<(usize, usize)> {
        match (source_no.checked_sub(1), reference_no.checked_sub(1)) {
            (Some(s), Some(r)) => Ok((s, r)),
            _ => Err(anyhow!("Cue numbers start at 1, got {}:{}", source_no, reference_no)),
        }
    }

    fn format_duration(duration: std::time::Duration) -> String {
        let total_secs = duration.as_secs();
        if total_secs >= 60 {
            format!("{}m {}s", total_secs / 60, total_secs % 60)
        } else {
            format!("{}.{:03}s", total_secs, duration.subsec_millis())
        }
    }
}

/// Parse an anchor argument of the form `SRC:REF` (1-based cue numbers)
pub fn parse_anchor_arg(text: &str) -> Result<(usize, usize)> {
    let (source, reference) = text
        .split_once(':')
        .ok_or_else(|| anyhow!("Anchor '{}' must look like SRC:REF", text))?;
    let source = source.trim().parse::<usize>()
        .with_context(|| format!("Invalid source cue number in anchor '{}'", text))?;
    let reference = reference.trim().parse::<usize>()
        .with_context(|| format!("Invalid reference cue number in anchor '{}'", text))?;
    Ok((source, reference))
}
