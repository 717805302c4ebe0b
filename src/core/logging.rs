//! One-shot logging setup for the process.
//!
//! Besides installing the subscriber, this quiets the chatty third-party
//! crates underneath the HTTP client. In global mode the threshold applies to
//! every target instead.

use crate::core::progress::global_multi_progress;
use crate::error::{ModelsError, Result};
use indicatif::MultiProgress;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{prelude::*, EnvFilter};

/// Targets whose threshold is raised when scoped (non-global) mode is active.
pub const NOISY_TARGETS: &[&str] = &[
    "reqwest",
    "hyper",
    "hyper_util",
    "h2",
    "rustls",
    "tokio_util",
    "want",
    "mio",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    #[default]
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Parses a level name, falling back to `Warning` for anything unknown.
    pub fn parse_or_default(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => LogLevel::Debug,
            "INFO" => LogLevel::Info,
            "WARNING" | "WARN" => LogLevel::Warning,
            "ERROR" => LogLevel::Error,
            "CRITICAL" | "FATAL" => LogLevel::Critical,
            _ => LogLevel::Warning,
        }
    }

    /// `tracing` has no level above error, so critical collapses onto it.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error | LogLevel::Critical => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Master switch. When off, `RUST_LOG` decides, defaulting to `info`.
    pub enabled: bool,
    pub apply_globally: bool,
    pub level: String,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            apply_globally: false,
            level: LogLevel::Warning.to_string(),
        }
    }
}

impl LoggingOptions {
    pub fn level(&self) -> LogLevel {
        LogLevel::parse_or_default(&self.level)
    }

    /// Filter directives for these options, or `None` if configuration is disabled.
    pub fn filter_directives(&self) -> Option<String> {
        if !self.enabled {
            return None;
        }

        let level = self.level().directive();
        if self.apply_globally {
            return Some(level.to_string());
        }

        let mut directives = vec!["info".to_string()];
        directives.extend(NOISY_TARGETS.iter().map(|target| format!("{target}={level}")));
        Some(directives.join(","))
    }
}

/// Installs the global subscriber. Must be called at most once per process.
pub fn configure(options: &LoggingOptions) -> Result<()> {
    let filter = match options.filter_directives() {
        Some(directives) => EnvFilter::try_new(directives)
            .map_err(|e| ModelsError::logging_error(e.to_string()))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .without_time()
        .with_writer(IndicatifWriter::new(global_multi_progress()));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| ModelsError::logging_error(e.to_string()))
}

/// Writes to stderr while keeping progress bars intact.
#[derive(Clone)]
pub struct IndicatifWriter {
    progress_bars: MultiProgress,
}

impl IndicatifWriter {
    pub fn new(progress_bars: MultiProgress) -> Self {
        Self { progress_bars }
    }
}

impl Write for IndicatifWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.progress_bars.suspend(|| io::stderr().write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.progress_bars.suspend(|| io::stderr().flush())
    }
}

impl<'a> MakeWriter<'a> for IndicatifWriter {
    type Writer = IndicatifWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
