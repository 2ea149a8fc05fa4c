//! Logging setup using tracing.
//!
//! Logs always go to stderr. Stdout is reserved for the per-model report lines
//! and the GitHub Actions annotations emitted by the notifier.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Crates whose log level follows the configured level.
const WORKSPACE_TARGETS: &[&str] = &[
    "modelnamer",
    "modelnamer_core",
    "modelnamer_provider",
    "modelnamer_storage",
    "modelnamer_util",
];

/// Log level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level applied to the workspace crates.
    pub level: LogLevel,
    /// Whether to include file/line info in logs.
    pub include_location: bool,
    /// Whether to emit ANSI colors.
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            include_location: false,
            ansi: true,
        }
    }
}

impl LogConfig {
    /// Build the filter directive string, e.g. `warn,modelnamer=info,...`.
    ///
    /// Dependencies stay at `warn` so HTTP client noise does not drown the run log.
    pub fn directives(&self) -> String {
        let mut parts = vec!["warn".to_string()];
        for target in WORKSPACE_TARGETS {
            parts.push(format!("{target}={}", self.level.as_str()));
        }
        parts.join(",")
    }
}

/// Initialize logging with the given configuration.
///
/// This should be called once at application startup. `RUST_LOG` takes
/// precedence over the configured level when set.
pub fn init(config: LogConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.directives()));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(config.ansi)
        .with_file(config.include_location)
        .with_line_number(config.include_location);

    // try_init so repeated initialization in tests is harmless
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
