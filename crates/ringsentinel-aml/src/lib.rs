//! # RingSentinel AML
//!
//! Fraud-ring detection over a transaction graph.
//!
//! ## Kernels
//! - `CycleDetector` - circular routing through 3-5 accounts
//! - `FanDetector` - fan-in / fan-out concentration with a velocity check
//! - `ShellDetector` - chains of low-activity pass-through accounts
//! - `RiskScorer` - composite account and ring risk scores
//! - `RingDetection` - the full pipeline as a batch kernel
//!
//! Detectors share one [`context::DetectionContext`]. Each account is
//! claimed by the first ring that reaches it, and the detectors always run
//! cycle, fan, shell.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod cycles;
pub mod engine;
pub mod fan;
pub mod messages;
pub mod scoring;
pub mod shell;
pub mod types;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::context::{DetectionContext, WorkingRing};
    pub use crate::cycles::CycleDetector;
    pub use crate::engine::RingDetection;
    pub use crate::fan::FanDetector;
    pub use crate::messages::{AnalysisInput, AnalysisOutput};
    pub use crate::scoring::{RiskScorer, ScoredRings};
    pub use crate::shell::ShellDetector;
    pub use crate::types::{
        AnalysisResult, DetectedPattern, FraudRing, PatternType, RiskLevel, RiskTiers, Summary,
        SuspiciousAccount,
    };
}
