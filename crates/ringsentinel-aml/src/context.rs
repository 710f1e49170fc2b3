//! Shared detection state threaded through the detectors.
//!
//! Ring ids come from one counter and every account is claimed by at most
//! one ring. A claim is never overwritten, so whichever detector reaches an
//! account first owns it. The detectors run cycle, fan, shell; that order is
//! the priority between overlapping patterns.

use crate::types::PatternType;

/// A ring as built by the detectors, before scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingRing {
    /// Ring identifier.
    pub ring_id: String,
    /// Member nodes, distinct, in detection order.
    pub members: Vec<usize>,
    /// Topology the ring was opened for.
    pub pattern_type: PatternType,
    /// Hop count for cycle rings.
    pub cycle_length: Option<usize>,
    /// Whether the ring's anchor account showed burst activity.
    pub temporal: bool,
}

/// Ring counter, working rings and the claim map for one analysis run.
#[derive(Debug, Clone, Default)]
pub struct DetectionContext {
    rings: Vec<WorkingRing>,
    owner: Vec<Option<usize>>,
    claim_order: Vec<usize>,
}

impl DetectionContext {
    /// Fresh context for a graph of `node_count` accounts.
    pub fn new(node_count: usize) -> Self {
        Self {
            rings: Vec::new(),
            owner: vec![None; node_count],
            claim_order: Vec::new(),
        }
    }

    /// Id the next opened ring will get.
    pub fn next_ring_id(&self) -> String {
        format!("RING_{:03}", self.rings.len() + 1)
    }

    /// Open a ring and claim its unclaimed members for it.
    ///
    /// Returns the ring's index.
    pub fn open_ring(
        &mut self,
        pattern_type: PatternType,
        members: Vec<usize>,
        cycle_length: Option<usize>,
        temporal: bool,
    ) -> usize {
        let index = self.rings.len();
        let ring_id = self.next_ring_id();

        for &node in &members {
            if self.owner[node].is_none() {
                self.owner[node] = Some(index);
                self.claim_order.push(node);
            }
        }

        tracing::trace!(ring_id = %ring_id, pattern = %pattern_type, members = members.len(), "ring opened");
        self.rings.push(WorkingRing {
            ring_id,
            members,
            pattern_type,
            cycle_length,
            temporal,
        });
        index
    }

    /// True if some ring owns the node.
    pub fn is_claimed(&self, node: usize) -> bool {
        self.owner.get(node).is_some_and(Option::is_some)
    }

    /// Index of the ring that owns the node.
    pub fn owner(&self, node: usize) -> Option<usize> {
        self.owner.get(node).copied().flatten()
    }

    /// Ring by index.
    pub fn ring(&self, index: usize) -> &WorkingRing {
        &self.rings[index]
    }

    /// Rings in creation order.
    pub fn rings(&self) -> &[WorkingRing] {
        &self.rings
    }

    /// Number of opened rings.
    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }

    /// `(node, ring index)` pairs in the order the claims were made.
    pub fn claims(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.claim_order
            .iter()
            .filter_map(move |&node| self.owner[node].map(|ring| (node, ring)))
    }

    /// Number of claimed accounts.
    pub fn claimed_count(&self) -> usize {
        self.claim_order.len()
    }
}
