//! RAII-based timing utilities for measuring and logging operation durations.
//!
//! # Example
//!
//! ```rust,ignore
//! use modelnamer_util::timing::TimingGuard;
//!
//! async fn complete(prompt: &str) {
//!     let _timing = TimingGuard::generation("group");
//!     // ... HTTP call ...
//!     // Duration is logged when _timing is dropped
//! }
//! ```

use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Durations at or above this are logged at info level.
const INFO_THRESHOLD: Duration = Duration::from_secs(2);
/// Durations at or above this are logged at warn level.
const WARN_THRESHOLD: Duration = Duration::from_secs(15);

/// RAII guard that measures and logs the duration of an operation.
///
/// When dropped, logs the elapsed time since creation.
pub struct TimingGuard {
    /// Type of operation (e.g., "generation", "fetch")
    operation_type: &'static str,
    /// Name of the specific operation (e.g., a model id)
    operation_name: String,
    start: Instant,
}

impl TimingGuard {
    /// Create a new timing guard.
    pub fn new(operation_type: &'static str, operation_name: impl Into<String>) -> Self {
        let operation_name = operation_name.into();
        debug!(
            operation_type = operation_type,
            operation_name = %operation_name,
            "Starting operation"
        );
        Self {
            operation_type,
            operation_name,
            start: Instant::now(),
        }
    }

    /// Create a timing guard for a name-generation request.
    pub fn generation(name: impl Into<String>) -> Self {
        Self::new("generation", name)
    }

    /// Create a timing guard for the catalog fetch.
    pub fn fetch(name: impl Into<String>) -> Self {
        Self::new("fetch", name)
    }
}

/// Render a duration as `850ms`, `2.35s` or `1m 4.2s`.
pub fn format_duration(duration: Duration) -> String {
    let duration_ms = duration.as_millis();
    if duration_ms < 1000 {
        format!("{duration_ms}ms")
    } else if duration_ms < 60_000 {
        format!("{:.2}s", duration_ms as f64 / 1000.0)
    } else {
        let mins = duration_ms / 60_000;
        let secs = (duration_ms % 60_000) as f64 / 1000.0;
        format!("{mins}m {secs:.1}s")
    }
}

impl Drop for TimingGuard {
    #[allow(clippy::cognitive_complexity)]
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        let duration_ms = duration.as_millis();
        let duration_str = format_duration(duration);

        if duration >= WARN_THRESHOLD {
            warn!(
                operation_type = self.operation_type,
                operation_name = %self.operation_name,
                duration_ms = duration_ms as u64,
                duration = %duration_str,
                "Slow operation completed"
            );
        } else if duration >= INFO_THRESHOLD {
            info!(
                operation_type = self.operation_type,
                operation_name = %self.operation_name,
                duration_ms = duration_ms as u64,
                duration = %duration_str,
                "Operation completed"
            );
        } else {
            debug!(
                operation_type = self.operation_type,
                operation_name = %self.operation_name,
                duration_ms = duration_ms as u64,
                duration = %duration_str,
                "Operation completed"
            );
        }
    }
}
