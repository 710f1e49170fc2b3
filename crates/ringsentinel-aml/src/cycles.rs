//! Cycle ring detection.

use crate::context::DetectionContext;
use crate::types::PatternType;
use ringsentinel_core::{domain::Domain, kernel::KernelMetadata, traits::Kernel};
use ringsentinel_graph::cycles::BoundedCycleSearch;
use ringsentinel_graph::merchant::MerchantSet;
use ringsentinel_graph::types::TransactionGraph;

/// Opens one `cycle` ring per distinct cycle member set.
#[derive(Debug, Clone)]
pub struct CycleDetector {
    metadata: KernelMetadata,
}

impl Default for CycleDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleDetector {
    /// Create a new cycle detector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: KernelMetadata::batch("aml/cycle", Domain::Compliance)
                .with_description("Circular routing through 3-5 non-merchant accounts"),
        }
    }

    /// Open cycle rings. Returns the number of rings opened.
    ///
    /// Every distinct member set gets a ring, even when all of its accounts
    /// were already claimed by an earlier cycle.
    pub fn compute(
        graph: &TransactionGraph,
        merchants: &MerchantSet,
        ctx: &mut DetectionContext,
    ) -> usize {
        let cycles = BoundedCycleSearch::compute(graph, merchants);
        let opened = cycles.len();
        for cycle in cycles {
            ctx.open_ring(PatternType::Cycle, cycle.members, Some(cycle.length), false);
        }
        tracing::debug!(rings = opened, "cycle detection done");
        opened
    }
}

impl Kernel for CycleDetector {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}
