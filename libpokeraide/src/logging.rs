//! Subscriber setup shared by the PokerAide binaries
//!
//! `aide-ctl` logs to stderr; `aide-tui` owns the terminal and logs to a
//! file instead. Both read their defaults from the environment:
//!
//! ```bash
//! export POKERAIDE_LOG_FORMAT=json   # text | json | pretty
//! export POKERAIDE_LOG_LEVEL=debug   # any EnvFilter directive
//! ```
//!
//! `RUST_LOG`, when set, wins over the configured level.
//!
//! ```no_run
//! use libpokeraide::logging::{self, LogFormat, LogTarget};
//!
//! let installed = logging::from_env(false)
//!     .format(LogFormat::Json)
//!     .target(LogTarget::File("/tmp/aide.log".into()))
//!     .init();
//! assert!(installed);
//! ```

use std::fs::File;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

pub const FORMAT_ENV: &str = "POKERAIDE_LOG_FORMAT";
pub const LEVEL_ENV: &str = "POKERAIDE_LOG_LEVEL";

const DEFAULT_LEVEL: &str = "warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Single-line records without colors
    #[default]
    Text,
    /// One JSON object per record, span fields flattened in
    Json,
    /// Multi-line records with source locations
    Pretty,
}

impl LogFormat {
    pub const ALL: [LogFormat; 3] = [LogFormat::Text, LogFormat::Json, LogFormat::Pretty];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
            LogFormat::Pretty => "pretty",
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == wanted)
            .ok_or_else(|| format!("Unknown log format '{}' (expected text, json or pretty)", s))
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where records are written
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogTarget {
    #[default]
    Stderr,
    /// Appended to, created if missing
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// `EnvFilter` directive, e.g. `warn` or `libpokeraide=debug`
    pub level: String,
    /// Forces `debug` regardless of `level`
    pub verbose: bool,
    pub target: LogTarget,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: DEFAULT_LEVEL.to_string(),
            verbose: false,
            target: LogTarget::default(),
        }
    }
}

impl LoggingConfig {
    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn target(mut self, target: LogTarget) -> Self {
        self.target = target;
        self
    }

    pub fn with_file(self, path: PathBuf) -> Self {
        self.target(LogTarget::File(path))
    }

    fn directive(&self) -> &str {
        if self.verbose {
            "debug"
        } else {
            &self.level
        }
    }

    /// Install the global subscriber
    ///
    /// Returns false when a subscriber is already installed or the log file
    /// cannot be opened. Neither is fatal to the caller.
    pub fn init(&self) -> bool {
        match &self.target {
            LogTarget::Stderr => self.install(std::io::stderr, true),
            LogTarget::File(path) => {
                match File::options().create(true).append(true).open(path) {
                    Ok(file) => self.install(Mutex::new(file), false),
                    Err(e) => {
                        eprintln!("Cannot open log file {}: {}", path.display(), e);
                        false
                    }
                }
            }
        }
    }

    fn install<W>(&self, writer: W, ansi: bool) -> bool
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.directive()));
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer);

        let result = match self.format {
            LogFormat::Text => builder.with_ansi(false).with_target(false).try_init(),
            LogFormat::Json => builder
                .json()
                .flatten_event(true)
                .with_current_span(true)
                .with_span_list(true)
                .try_init(),
            LogFormat::Pretty => builder
                .pretty()
                .with_ansi(ansi)
                .with_file(true)
                .with_line_number(true)
                .try_init(),
        };
        result.is_ok()
    }
}

/// Stderr logging from the environment, text at `warn` when unset
pub fn init_default() -> bool {
    from_env(false).init()
}

/// Read format and level from the environment
///
/// Unparseable formats fall back to text rather than failing startup.
pub fn from_env(verbose: bool) -> LoggingConfig {
    let mut config = LoggingConfig {
        verbose,
        ..LoggingConfig::default()
    };

    if let Some(format) = std::env::var(FORMAT_ENV).ok().and_then(|s| s.parse().ok()) {
        config.format = format;
    }
    if let Ok(level) = std::env::var(LEVEL_ENV) {
        config.level = level;
    }
    config
}
