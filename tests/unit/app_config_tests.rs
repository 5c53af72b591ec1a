/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use log::LevelFilter;
use subsync::app_config::{Config, LogLevel};
use subsync::subtitle_processor::SubtitleEncoding;
use subsync::sync::MAX_SHIFT_MS;
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.encoding, SubtitleEncoding::Utf8);
    assert_eq!(config.output.suffix, "synced");
    assert_eq!(config.shift.max_shift_ms, MAX_SHIFT_MS);
    assert_eq!(config.matching.max_min_diff_ms, 30_000);
    assert_eq!(config.matching.min_candidates, 3);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();

    config.output.suffix = "".to_string();
    assert!(config.validate().is_err());
    config.output.suffix = "out/dir".to_string();
    assert!(config.validate().is_err());
    config.output.suffix = "fixed".to_string();
    assert!(config.validate().is_ok());

    config.shift.max_shift_ms = 0;
    assert!(config.validate().is_err());
    config.shift.max_shift_ms = 1_000;

    config.matching.coverage = 1.5;
    assert!(config.validate().is_err());
    config.matching.coverage = 0.9;

    config.matching.min_candidates = 0;
    assert!(config.validate().is_err());
    config.matching.min_candidates = 2;

    config.matching.min_scale_ms = 0.0;
    assert!(config.validate().is_err());
    config.matching.min_scale_ms = 500.0;

    assert!(config.validate().is_ok());
}

/// Partial files fill in the missing fields with defaults
#[test]
fn test_config_deserialize_withPartialJson_shouldUseDefaults() -> Result<()> {
    let config: Config = serde_json::from_str(
        r#"{ "encoding": "gbk", "matching": { "coverage": 0.8 }, "log_level": "debug" }"#,
    )?;

    assert_eq!(config.encoding, SubtitleEncoding::Gb18030);
    assert_eq!(config.matching.coverage, 0.8);
    assert_eq!(config.matching.pool_window_ms, 10_000);
    assert_eq!(config.output.suffix, "synced");
    assert_eq!(config.log_level, LogLevel::Debug);
    Ok(())
}

/// A missing config file is created with defaults
#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("subsync.json");

    let created = Config::load_or_create(&path)?;
    assert!(path.exists());
    assert_eq!(created.output.suffix, "synced");

    let mut changed = created.clone();
    changed.output.suffix = "fixed".to_string();
    changed.save(&path)?;

    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded.output.suffix, "fixed");
    Ok(())
}

#[test]
fn test_loadOrCreate_withBrokenJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "subsync.json", "{ not json")?;

    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

#[test]
fn test_logLevel_intoLevelFilter_shouldMapEachLevel() {
    assert_eq!(LevelFilter::from(LogLevel::Error), LevelFilter::Error);
    assert_eq!(LevelFilter::from(LogLevel::Trace), LevelFilter::Trace);
}
