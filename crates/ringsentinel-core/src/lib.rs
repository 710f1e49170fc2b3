//! # RingSentinel Core
//!
//! Core abstractions shared by the RingSentinel detection crates.
//!
//! This crate provides:
//! - Error type and `Result` alias
//! - Domain and kernel metadata definitions
//! - Trait definitions for batch kernels
//! - Detection configuration (defaults, TOML, environment overrides)
//! - Logging setup

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod domain;
pub mod error;
pub mod kernel;
pub mod observability;
pub mod traits;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{
        DetectionConfig, DetectionConfigBuilder, FanConfig, MerchantConfig, ScoringConfig,
        ShellConfig,
    };
    pub use crate::domain::Domain;
    pub use crate::error::{Result, SentinelError};
    pub use crate::kernel::KernelMetadata;
    pub use crate::observability::{LogConfig, LogLevel};
    pub use crate::traits::{BatchKernel, Kernel};
}
