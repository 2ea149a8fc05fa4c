//! Shared utilities for modelnamer.
//!
//! This crate provides common utilities used across the modelnamer workspace:
//! - Logging setup with tracing
//! - RAII-based timing for slow external calls

pub mod log;
pub mod timing;

pub use log::{LogConfig, LogLevel};
pub use timing::TimingGuard;
