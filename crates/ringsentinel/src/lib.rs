//! # RingSentinel
//!
//! Fraud-ring detection for money-transfer ledgers.
//!
//! RingSentinel takes one batch of transactions, builds the transaction graph
//! and flags accounts that match money-laundering topologies:
//!
//! - **Cycles**: funds routed around 3 to 5 accounts
//! - **Fan-in / fan-out**: many-to-one or one-to-many concentration
//! - **Shell networks**: chains of low-activity pass-through accounts
//!
//! Every claimed account gets a 0-100 suspicion score and every ring a
//! 0-100 risk score. High-volume payout hubs (merchants) are excluded from
//! all patterns.
//!
//! ## Quick Start
//!
//! ```rust
//! use ringsentinel::prelude::*;
//!
//! let transactions = vec![
//!     Transaction::new("T1", "A", "B", 100.0),
//!     Transaction::new("T2", "B", "C", 100.0),
//!     Transaction::new("T3", "C", "A", 100.0),
//! ];
//!
//! let result = RingDetection::compute(&transactions, &DetectionConfig::default());
//! assert_eq!(result.fraud_rings.len(), 1);
//! assert_eq!(result.fraud_rings[0].pattern_type, PatternType::Cycle);
//! ```
//!
//! ## Crates
//!
//! - [`core`]: errors, kernel traits, configuration, logging
//! - [`graph`]: transaction graph, merchant classification, cycle search
//! - [`aml`]: detectors, scoring and the end-to-end `RingDetection` kernel

#![warn(missing_docs)]
#![warn(clippy::all)]

// Re-export member crates
pub use ringsentinel_aml as aml;
pub use ringsentinel_core as core;
pub use ringsentinel_graph as graph;

/// Prelude module for convenient imports.
///
/// Import everything you need with:
/// ```rust,ignore
/// use ringsentinel::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use ringsentinel_core::prelude::*;

    // Graph types
    pub use ringsentinel_graph::prelude::*;

    // Detection
    pub use ringsentinel_aml::prelude::*;
}

/// Pipeline stage catalog.
pub mod catalog {
    use ringsentinel_aml::prelude::*;
    use ringsentinel_core::kernel::KernelMetadata;
    use ringsentinel_core::traits::Kernel;
    use ringsentinel_graph::prelude::*;

    /// Metadata of every pipeline stage, in execution order.
    pub fn stages() -> Vec<KernelMetadata> {
        vec![
            MerchantClassifier::new().metadata().clone(),
            BoundedCycleSearch::new().metadata().clone(),
            CycleDetector::new().metadata().clone(),
            FanDetector::new().metadata().clone(),
            ShellDetector::new().metadata().clone(),
            RiskScorer::new().metadata().clone(),
            RingDetection::new().metadata().clone(),
        ]
    }
}

/// Version information.
pub mod version {
    /// Crate version.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}
