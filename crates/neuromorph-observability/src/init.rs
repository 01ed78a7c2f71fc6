// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization
//!
//! Console logging is always available. With the `file-logging` feature,
//! [`init_logging`] also writes JSON logs into a timestamped run folder and
//! prunes old runs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;
use crate::config::{LogFormat, LoggingOptions};

const RUN_PREFIX: &str = "run_";
const RUN_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn console_layer(debug_flags: &CrateDebugFlags, options: &LoggingOptions) -> Result<BoxedLayer> {
    let filter_string = debug_flags.to_filter_string(&options.level);
    let filter = EnvFilter::try_new(&filter_string)
        .with_context(|| format!("Invalid log filter: {}", filter_string))?;

    let layer = match options.format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .json()
            .with_filter(filter)
            .boxed(),
    };
    Ok(layer)
}

/// Install a global subscriber writing to stderr
///
/// # Errors
/// Fails if the level is not a valid filter or a global subscriber is already set.
pub fn init_console_logging(debug_flags: &CrateDebugFlags, options: &LoggingOptions) -> Result<()> {
    Registry::default()
        .with(console_layer(debug_flags, options)?)
        .try_init()
        .context("Failed to install tracing subscriber")?;
    Ok(())
}

/// Keeps file writers alive; logs are flushed when dropped
#[cfg(feature = "file-logging")]
pub struct LoggingGuard {
    _file_guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: PathBuf,
}

#[cfg(feature = "file-logging")]
impl LoggingGuard {
    /// The run folder logs are written to
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

/// Initialize console logging plus JSON log files
///
/// Creates a timestamped folder structure:
/// ```text
/// ./logs/
///   └── run_20250101_120000/
///       ├── neuromorph-hoc.log
///       ├── neuromorph-structures.log
///       └── neuromorph.log (combined)
/// ```
#[cfg(feature = "file-logging")]
pub fn init_logging(debug_flags: &CrateDebugFlags, options: &LoggingOptions) -> Result<LoggingGuard> {
    use tracing_appender::rolling;

    let run_folder = options.log_dir.join(run_folder_name(Utc::now()));
    std::fs::create_dir_all(&run_folder)
        .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;

    cleanup_old_logs(&options.log_dir, options.retention_days, options.retention_runs, Utc::now())?;

    let mut layers: Vec<BoxedLayer> = vec![console_layer(debug_flags, options)?];
    let mut file_guards = Vec::new();

    for crate_name in crate::KNOWN_CRATES {
        let (writer, guard) = tracing_appender::non_blocking(rolling::daily(&run_folder, format!("{}.log", crate_name)));
        file_guards.push(guard);
        layers.push(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .json()
                .with_filter(EnvFilter::try_new(format!("{}=debug", crate_name.replace('-', "_")))?)
                .boxed(),
        );
    }

    let (combined, combined_guard) = tracing_appender::non_blocking(rolling::daily(&run_folder, "neuromorph.log"));
    file_guards.push(combined_guard);
    layers.push(
        tracing_subscriber::fmt::layer()
            .with_writer(combined)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .json()
            .with_filter(EnvFilter::try_new(debug_flags.to_filter_string(&options.level))?)
            .boxed(),
    );

    Registry::default()
        .with(layers)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(LoggingGuard {
        _file_guards: file_guards,
        log_dir: run_folder,
    })
}

/// `run_YYYYmmdd_HHMMSS` for the given instant
pub fn run_folder_name(now: DateTime<Utc>) -> String {
    format!("{}{}", RUN_PREFIX, now.format(RUN_TIMESTAMP_FORMAT))
}

fn parse_run_folder(name: &str) -> Option<DateTime<Utc>> {
    let timestamp = name.strip_prefix(RUN_PREFIX)?;
    let naive = NaiveDateTime::parse_from_str(timestamp, RUN_TIMESTAMP_FORMAT).ok()?;
    Some(Utc.from_utc_datetime(&naive))
}

/// Remove run folders older than `retention_days`, then all but the newest `retention_runs`.
///
/// Directories that do not look like run folders are left alone. Returns
/// the number of folders removed.
pub fn cleanup_old_logs(
    base_log_dir: &Path,
    retention_days: u32,
    retention_runs: usize,
    now: DateTime<Utc>,
) -> Result<usize> {
    if !base_log_dir.exists() {
        return Ok(0);
    }

    let mut runs: Vec<(PathBuf, DateTime<Utc>)> = Vec::new();
    for entry in std::fs::read_dir(base_log_dir)
        .with_context(|| format!("Failed to read log directory: {}", base_log_dir.display()))?
    {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        if let Some(started) = path.file_name().and_then(|n| n.to_str()).and_then(parse_run_folder) {
            runs.push((path, started));
        }
    }

    // Newest first
    runs.sort_by(|a, b| b.1.cmp(&a.1));

    let cutoff = now - chrono::Duration::days(i64::from(retention_days));
    let mut removed = 0;
    for (position, (path, started)) in runs.iter().enumerate() {
        if *started < cutoff || position >= retention_runs {
            match std::fs::remove_dir_all(path) {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Failed to remove old log directory"),
            }
        }
    }

    Ok(removed)
}
