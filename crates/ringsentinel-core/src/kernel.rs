//! Kernel metadata.
//!
//! Each pipeline stage (graph builder, merchant classifier, the three
//! detectors, the scorer and the engine that chains them) is a kernel with a
//! stable identifier such as `"aml/fan"`. The identifier is what shows up in
//! logs.

use crate::domain::Domain;
use serde::{Deserialize, Serialize};

/// Descriptive metadata for a pipeline stage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelMetadata {
    /// Unique kernel identifier (e.g., "aml/cycle").
    pub id: String,

    /// Analytical area.
    pub domain: Domain,

    /// Human-readable description.
    pub description: String,

    /// Version of the stage's heuristic. Bump when thresholds or tie-breaking
    /// change, since results are not comparable across versions.
    pub version: u32,
}

impl KernelMetadata {
    /// Create metadata for a batch stage.
    #[must_use]
    pub fn batch(id: impl Into<String>, domain: Domain) -> Self {
        Self {
            id: id.into(),
            domain,
            description: String::new(),
            version: 1,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the version.
    #[must_use]
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Returns the kernel name without its namespace (`"aml/fan"` -> `"fan"`).
    #[must_use]
    pub fn name(&self) -> &str {
        self.id.rsplit('/').next().unwrap_or(&self.id)
    }

    /// Returns the full kernel ID path, prefixed with the domain.
    #[must_use]
    pub fn full_id(&self) -> String {
        format!("{}/{}", self.domain.as_str().to_lowercase(), self.id)
    }
}

impl Default for KernelMetadata {
    fn default() -> Self {
        Self::batch("unnamed", Domain::GraphAnalytics)
    }
}
