//! Tests for the logger module

use crate::logger::config::*;
use crate::logger::writer::open_log_file;
use crate::logger::{LoggerError, build_layers};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper function to create a file-only configuration
fn file_config(path: &Path, format: LogFormat, append: bool) -> LoggerConfig {
    LoggerConfig {
        console: ConsoleConfig::new(false, false),
        file: FileConfig {
            enabled: true,
            path: path.to_path_buf(),
            append,
            format,
        },
        level: "info".to_string(),
    }
}

/// Emit one event through the configured layers, scoped to this thread
fn emit_through(config: &LoggerConfig, message: &str) {
    use tracing_subscriber::layer::SubscriberExt;

    let layers = build_layers(config).unwrap();
    let subscriber = tracing_subscriber::registry().with(layers);
    tracing::subscriber::with_default(subscriber, || {
        tracing::info!(job_id = "job-1", "{}", message);
    });
}

#[cfg(test)]
mod writer_tests {
    use super::*;

    #[test]
    fn test_open_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("logs").join("batchflow.log");
        let config = file_config(&path, LogFormat::Full, true);

        open_log_file(&config.file).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_open_disabled_output_is_error() {
        let config = FileConfig::default();
        assert!(matches!(
            open_log_file(&config),
            Err(LoggerError::Config { .. })
        ));
    }

    #[test]
    fn test_truncate_mode_discards_previous_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("batchflow.log");
        std::fs::write(&path, "stale line\n").unwrap();

        emit_through(&file_config(&path, LogFormat::Full, false), "fresh");

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("stale line"));
        assert!(content.contains("fresh"));
    }

    #[test]
    fn test_append_mode_keeps_previous_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("batchflow.log");
        std::fs::write(&path, "earlier run\n").unwrap();

        emit_through(&file_config(&path, LogFormat::Full, true), "later run");

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("earlier run\n"));
        assert!(content.contains("later run"));
    }
}

#[cfg(test)]
mod format_tests {
    use super::*;

    #[test]
    fn test_json_format_writes_one_object_per_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("batchflow.json");

        emit_through(&file_config(&path, LogFormat::Json, false), "job submitted");

        let content = std::fs::read_to_string(&path).unwrap();
        let line = content.lines().next().unwrap();
        let record: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(record["level"], "INFO");
        assert_eq!(record["fields"]["message"], "job submitted");
        assert_eq!(record["fields"]["job_id"], "job-1");
    }

    #[test]
    fn test_file_output_has_no_ansi_codes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("batchflow.log");
        let mut config = file_config(&path, LogFormat::Compact, false);
        config.console = ConsoleConfig::new(true, true);

        emit_through(&config, "plain text");

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("plain text"));
        assert!(!content.contains('\u{1b}'));
    }
}

#[cfg(test)]
mod layer_tests {
    use super::*;

    #[test]
    fn test_layer_count_follows_enabled_outputs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("batchflow.log");

        let mut config = file_config(&path, LogFormat::Full, true);
        assert_eq!(build_layers(&config).unwrap().len(), 1);

        config.console.enabled = true;
        assert_eq!(build_layers(&config).unwrap().len(), 2);

        config.file.enabled = false;
        assert_eq!(build_layers(&config).unwrap().len(), 1);
    }

    #[test]
    fn test_unwritable_path_is_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();

        let config = file_config(&blocker.join("batchflow.log"), LogFormat::Full, true);
        assert!(build_layers(&config).is_err());
    }

    #[test]
    fn test_default_file_path() {
        assert_eq!(
            FileConfig::default().path,
            PathBuf::from("logs/batchflow.log")
        );
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn property_level_validity_matches_known_levels(level in "[a-zA-Z]{1,8}") {
            let config = LoggerConfig {
                level: level.clone(),
                ..Default::default()
            };
            let known = matches!(
                level.to_lowercase().as_str(),
                "trace" | "debug" | "info" | "warn" | "error"
            );
            prop_assert_eq!(config.validate().is_ok(), known);
        }
    }
}
