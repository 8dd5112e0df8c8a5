//! Diagnostics setup.
//!
//! The caller builds the subscriber and owns the returned guard; logging
//! stops when the guard is dropped. Nothing is installed process-wide.

use anyhow::{Context, Result};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::subscriber::DefaultGuard;
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Where diagnostics go and how much of them.
#[derive(Debug, Clone)]
pub struct LogSettings {
    /// Maximum level printed to stderr.
    pub console_level: Level,
    /// Optional file receiving everything down to DEBUG.
    pub log_file: Option<PathBuf>,
}

/// Build the subscriber and make it the default for the current thread.
pub fn init(settings: &LogSettings) -> Result<DefaultGuard> {
    let console = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .with_writer(std::io::stderr)
        .with_filter(LevelFilter::from_level(settings.console_level));

    let file_layer = match settings.log_file {
        Some(ref path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create log directory: {}", parent.display())
                })?;
            }
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;

            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    let subscriber = tracing_subscriber::registry().with(console).with(file_layer);

    Ok(tracing::subscriber::set_default(subscriber))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_file_receives_debug_events() {
        let dir = TempDir::new().unwrap();
        let log_file = dir.path().join("logs").join("cvechart.log");

        let settings = LogSettings {
            console_level: Level::ERROR,
            log_file: Some(log_file.clone()),
        };

        let guard = init(&settings).unwrap();
        tracing::debug!("pie chart skipped");
        drop(guard);

        let content = std::fs::read_to_string(&log_file).unwrap();
        assert!(content.contains("pie chart skipped"));
        assert!(content.contains("DEBUG"));
    }

    #[test]
    fn test_console_only() {
        let settings = LogSettings {
            console_level: Level::INFO,
            log_file: None,
        };

        let guard = init(&settings);
        assert!(guard.is_ok());
    }
}
