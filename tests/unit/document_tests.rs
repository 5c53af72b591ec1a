/*!
 * Tests for the document model and point-sync sessions
 */

use anyhow::Result;
use subsync::document::{EditCommand, EditField, EditOutcome, PointSyncSession, SubtitleDocument};
use subsync::errors::{EditError, SubtitleError, SyncError, TimeCodeError};
use subsync::subtitle_processor::SubtitleEncoding;
use subsync::sync::MAX_SHIFT_MS;
use crate::common::{self, tc};

#[test]
fn test_open_shouldRecordPathAndStayUnmodified() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;

    let document = SubtitleDocument::open(&path, SubtitleEncoding::Utf8)?;

    assert_eq!(document.entries().len(), 3);
    assert_eq!(document.path(), Some(path.as_path()));
    assert!(!document.is_modified());
    assert_eq!(document.title(), "movie.srt");
    Ok(())
}

#[test]
fn test_open_withGb18030File_shouldDecode() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_gb18030_subtitle(temp_dir.path(), "zh.srt")?;

    let document = SubtitleDocument::open(&path, SubtitleEncoding::Gb18030)?;

    assert_eq!(document.entries().get(0).unwrap().text, "你好");
    assert_eq!(document.encoding(), SubtitleEncoding::Gb18030);
    Ok(())
}

#[test]
fn test_shift_shouldMarkModifiedAndUpdateTitle() -> Result<()> {
    let mut document = SubtitleDocument::from_collection(common::sequence(&[1_000]));

    document.shift(250)?;

    assert!(document.is_modified());
    assert_eq!(document.title(), "Untitled *");
    assert_eq!(document.entries().get(0).unwrap().start, tc(1_250));
    Ok(())
}

#[test]
fn test_shift_beyondBound_shouldLeaveDocumentUntouched() {
    let cues = common::sequence(&[1_000]);
    let mut document = SubtitleDocument::from_collection(cues.clone());

    let result = document.shift(MAX_SHIFT_MS + 1);

    assert!(matches!(result, Err(SyncError::ShiftOutOfRange { .. })));
    assert_eq!(document.entries(), &cues);
    assert!(!document.is_modified());
}

#[test]
fn test_withMaxShift_shouldApplyCustomBound() {
    let mut document = SubtitleDocument::from_collection(common::sequence(&[1_000])).with_max_shift(500);

    assert!(document.shift(-500).is_ok());
    assert_eq!(document.shift(501), Err(SyncError::ShiftOutOfRange { delta_ms: 501, max_ms: 500 }));
}

#[test]
fn test_save_withoutPath_shouldFail() {
    let mut document = SubtitleDocument::from_collection(common::sequence(&[1_000]));
    assert!(matches!(document.save(), Err(SubtitleError::MissingPath)));
}

#[test]
fn test_saveAs_shouldWriteRenumberedUtf8AndClearModified() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_gb18030_subtitle(temp_dir.path(), "zh.srt")?;
    let target = temp_dir.path().join("zh.utf8.srt");

    let mut document = SubtitleDocument::open(&source, SubtitleEncoding::Gb18030)?;
    document.edit_field(0, EditField::Index, "42")?;
    assert!(document.is_modified());

    document.save_as(&target)?;

    assert!(!document.is_modified());
    assert_eq!(document.path(), Some(target.as_path()));
    let written = std::fs::read_to_string(&target)?;
    assert_eq!(written, "1\n00:00:01,000 --> 00:00:02,000\n你好\n");
    Ok(())
}

#[test]
fn test_editField_withValidInput_shouldReturnPrevious() -> Result<()> {
    let mut document = SubtitleDocument::from_collection(common::sequence(&[1_000, 2_000]));

    let outcome = document.edit_field(1, EditField::Start, "00:00:02,500")?;

    match outcome {
        EditOutcome::Changed { previous } => assert_eq!(previous.start, tc(2_000)),
        EditOutcome::Unchanged => panic!("expected a change"),
    }
    assert_eq!(document.entries().get(1).unwrap().start, tc(2_500));
    assert!(document.is_modified());
    Ok(())
}

#[test]
fn test_editField_withSameValue_shouldBeUnchanged() -> Result<()> {
    let mut document = SubtitleDocument::from_collection(common::sequence(&[1_000]));

    let outcome = document.apply_edit(0, EditCommand::SetText("Line 1".to_string()))?;

    assert_eq!(outcome, EditOutcome::Unchanged);
    assert!(!document.is_modified());
    Ok(())
}

#[test]
fn test_editField_withInvalidInput_shouldLeaveDocumentUnchanged() {
    let cues = common::sequence(&[1_000]);
    let mut document = SubtitleDocument::from_collection(cues.clone());

    assert!(matches!(
        document.edit_field(0, EditField::End, "1:2:3"),
        Err(EditError::InvalidTimeCode(TimeCodeError::InvalidFormat(_)))
    ));
    assert_eq!(
        document.edit_field(0, EditField::Index, "one"),
        Err(EditError::InvalidSequenceNumber("one".to_string()))
    );
    assert_eq!(
        document.edit_field(3, EditField::Text, "x"),
        Err(EditError::RowOutOfRange { row: 3, len: 1 })
    );

    assert_eq!(document.entries(), &cues);
    assert!(!document.is_modified());
}

#[test]
fn test_editCommand_fromInput_shouldMapFields() -> Result<()> {
    let command = EditCommand::from_input(EditField::Text, "multi\nline")?;
    assert_eq!(command, EditCommand::SetText("multi\nline".to_string()));
    assert_eq!(command.field(), EditField::Text);
    assert_eq!(EditCommand::from_input(EditField::Index, " 7 ")?, EditCommand::SetIndex(7));
    Ok(())
}

#[test]
fn test_session_applyAndReset_shouldSwitchDisplayedSequence() -> Result<()> {
    let original = common::sequence(&[1_000, 2_000, 3_000]);
    let mut session = PointSyncSession::new(original.clone());
    session.load_reference(common::sequence(&[2_000, 6_000]));
    session.add_anchor(0, 0)?;
    session.add_anchor(2, 1)?;

    let preview = session.apply()?.clone();
    assert!(session.is_applied());
    assert_eq!(session.displayed(), &preview);
    assert_eq!(preview.get(1).unwrap().start, tc(4_000));

    session.reset();
    assert!(!session.is_applied());
    assert_eq!(session.displayed(), &original);
    assert_eq!(session.original(), &original);
    Ok(())
}

#[test]
fn test_session_reapply_shouldNotCompound() -> Result<()> {
    let mut session = PointSyncSession::new(common::sequence(&[1_000, 2_000, 3_000]));
    session.load_reference(common::sequence(&[2_000, 6_000]));
    session.add_anchor(0, 0)?;
    session.add_anchor(2, 1)?;

    let first = session.apply()?.clone();
    let second = session.apply()?.clone();

    assert_eq!(first, second);
    assert_eq!(session.finish(), Some(first));
    Ok(())
}

#[test]
fn test_session_applyWithOneAnchor_shouldKeepState() -> Result<()> {
    let original = common::sequence(&[1_000, 2_000]);
    let mut session = PointSyncSession::new(original.clone());
    session.load_reference(original.clone());
    session.add_anchor(0, 0)?;

    assert!(matches!(session.apply(), Err(SyncError::InsufficientAnchors { found: 1 })));
    assert!(!session.is_applied());
    assert_eq!(session.finish(), None);
    Ok(())
}

#[test]
fn test_session_loadReference_shouldDropAnchors() -> Result<()> {
    let original = common::sequence(&[1_000, 2_000]);
    let mut session = PointSyncSession::new(original.clone());
    session.load_reference(original.clone());
    session.add_anchor(0, 0)?;
    session.add_anchor(1, 1)?;

    session.load_reference(common::sequence(&[5_000]));

    assert!(session.anchors().is_empty());
    assert_eq!(session.reference().len(), 1);
    Ok(())
}

#[test]
fn test_session_suggestFor_shouldUseDisplayedStart() -> Result<()> {
    let mut session = PointSyncSession::new(common::sequence(&[1_000]));
    session.load_reference(common::sequence(&[1_000, 40_000]));

    let candidates = session.suggest_for(0);
    assert_eq!(candidates.first().map(|c| c.reference_index), Some(0));
    assert!(session.suggest_for(5).is_empty());
    Ok(())
}

#[test]
fn test_session_removeAnchor_shouldRestoreInsufficientState() -> Result<()> {
    let original = common::sequence(&[1_000, 2_000]);
    let mut session = PointSyncSession::new(original.clone());
    session.load_reference(original);
    session.add_anchor(0, 0)?;
    session.add_anchor(1, 1)?;

    assert!(session.remove_anchor(1).is_some());
    assert!(matches!(session.apply(), Err(SyncError::InsufficientAnchors { found: 1 })));
    Ok(())
}

#[test]
fn test_pointSyncSession_fromDocument_thenReplace_shouldMarkModified() -> Result<()> {
    let mut document = SubtitleDocument::from_collection(common::sequence(&[1_000, 2_000, 3_000]));
    let mut session = document.point_sync_session();
    session.load_reference(common::sequence(&[2_000, 6_000]));
    session.add_anchor(0, 0)?;
    session.add_anchor(2, 1)?;
    session.apply()?;

    if let Some(synced) = session.finish() {
        document.replace_entries(synced);
    }

    assert!(document.is_modified());
    assert_eq!(document.entries().get(2).unwrap().start, tc(6_000));
    Ok(())
}
