//! Fan-in / fan-out ring detection.
//!
//! An account with at least `threshold` distinct non-merchant senders opens a
//! `fan_in` ring; with at least `threshold` distinct non-merchant receivers it
//! opens a `fan_out` ring. Ring members are the account followed by the first
//! `max_members` counterparties in discovery order. A ring is marked temporal
//! when `threshold` of the account's own transactions fall within the
//! temporal window.

use crate::context::DetectionContext;
use crate::types::PatternType;
use ringsentinel_core::{config::FanConfig, domain::Domain, kernel::KernelMetadata, traits::Kernel};
use ringsentinel_graph::merchant::MerchantSet;
use ringsentinel_graph::types::TransactionGraph;
use ringsentinel_graph::velocity::{has_burst, window_hours};

/// Fan pattern detector.
#[derive(Debug, Clone)]
pub struct FanDetector {
    metadata: KernelMetadata,
}

impl Default for FanDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl FanDetector {
    /// Create a new fan detector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: KernelMetadata::batch("aml/fan", Domain::Compliance)
                .with_description("Fan-in/fan-out concentration with velocity check"),
        }
    }

    /// Open fan rings. Returns the number of rings opened.
    ///
    /// The unclaimed guard is checked before each direction, so an account
    /// that qualifies both ways opens only its `fan_in` ring.
    pub fn compute(
        graph: &TransactionGraph,
        merchants: &MerchantSet,
        config: &FanConfig,
        ctx: &mut DetectionContext,
    ) -> usize {
        let window = window_hours(config.temporal_window_hours);
        let mut opened = 0;

        for node in 0..graph.node_count() {
            if merchants.contains(node) || ctx.is_claimed(node) {
                continue;
            }

            let senders = Self::counterparties(graph.in_neighbors(node), node, merchants);
            let receivers = Self::counterparties(graph.out_neighbors(node), node, merchants);
            if senders.len() < config.threshold && receivers.len() < config.threshold {
                continue;
            }

            let temporal = has_burst(graph.time_series(node), config.threshold, window);

            for (pattern, pool) in [(PatternType::FanIn, senders), (PatternType::FanOut, receivers)] {
                // An opened fan_in ring claims the account and blocks fan_out.
                if pool.len() < config.threshold || ctx.is_claimed(node) {
                    continue;
                }
                let mut members = Vec::with_capacity(config.max_members.min(pool.len()) + 1);
                members.push(node);
                members.extend(pool.into_iter().take(config.max_members));
                ctx.open_ring(pattern, members, None, temporal);
                opened += 1;
            }
        }

        tracing::debug!(rings = opened, "fan detection done");
        opened
    }

    /// Non-merchant neighbours other than the account itself.
    fn counterparties(neighbors: &[usize], node: usize, merchants: &MerchantSet) -> Vec<usize> {
        neighbors
            .iter()
            .copied()
            .filter(|&n| n != node && !merchants.contains(n))
            .collect()
    }
}

impl Kernel for FanDetector {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}
