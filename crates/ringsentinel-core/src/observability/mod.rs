//! Observability Infrastructure
//!
//! Structured logging for analysis runs. Every stage emits `tracing` events
//! tagged with its kernel id; `LogConfig` decides how they are rendered.
//!
//! # Example
//!
//! ```rust,ignore
//! use ringsentinel_core::observability::LogConfig;
//!
//! LogConfig::production().init()?;
//! ```

pub mod logging;

pub use logging::{LogConfig, LogLevel};
