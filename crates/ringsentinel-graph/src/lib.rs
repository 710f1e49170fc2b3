//! # RingSentinel Graph
//!
//! Transaction graph construction and the graph primitives the fraud-ring
//! detectors are built on.
//!
//! ## Kernels
//!
//! - `MerchantClassifier` - Batch kernel, payout-hub exclusion
//! - `BoundedCycleSearch` - Batch kernel, 3 to 5 hop simple cycles
//!
//! ## Helpers
//!
//! - `TransactionGraph` - interned adjacency, per-account counters and time series
//! - `velocity::has_burst` - sliding-window burst check over a time series

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cycles;
pub mod merchant;
pub mod velocity;

// Common graph types
pub mod types;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cycles::{BoundedCycleSearch, Cycle, MAX_CYCLE_DEPTH, MIN_CYCLE_LENGTH};
    pub use crate::merchant::{MerchantClassifier, MerchantSet};
    pub use crate::types::{parse_timestamp, EdgeAggregate, TimePoint, Transaction, TransactionGraph};
    pub use crate::velocity::{has_burst, window_hours};
}
