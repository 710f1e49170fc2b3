//! Bounded simple-cycle search.
//!
//! Round-tripping funds through 3 to 5 accounts is the classic circular
//! routing signal. The search is a depth-limited DFS from every non-merchant
//! account; cycles are reported once per *member set*, so a different
//! rotation or a different route over the same accounts is a duplicate.

use crate::merchant::MerchantSet;
use crate::types::TransactionGraph;
use ringsentinel_core::{domain::Domain, kernel::KernelMetadata, traits::Kernel};
use std::collections::HashSet;

/// Longest path the search explores. Cycles longer than this are not found.
pub const MAX_CYCLE_DEPTH: usize = 5;

/// Shortest cycle reported.
pub const MIN_CYCLE_LENGTH: usize = 3;

/// A cycle found by the search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    /// Path from the start node; the closing edge returns to `members[0]`.
    pub members: Vec<usize>,
    /// Number of hops (equals `members.len()`).
    pub length: usize,
}

/// Bounded cycle search kernel.
#[derive(Debug, Clone)]
pub struct BoundedCycleSearch {
    metadata: KernelMetadata,
}

impl Default for BoundedCycleSearch {
    fn default() -> Self {
        Self::new()
    }
}

struct SearchState<'a> {
    graph: &'a TransactionGraph,
    merchants: &'a MerchantSet,
    path: Vec<usize>,
    on_path: Vec<bool>,
    seen: HashSet<Vec<usize>>,
    found: Vec<Cycle>,
}

impl BoundedCycleSearch {
    /// Create a new bounded cycle search kernel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: KernelMetadata::batch("graph/bounded-cycles", Domain::GraphAnalytics)
                .with_description("Depth-limited simple cycle enumeration (3-5 hops)"),
        }
    }

    /// Find cycles in discovery order.
    ///
    /// Start nodes are visited in graph order and neighbours in discovery
    /// order, so the output is deterministic for a given input order.
    pub fn compute(graph: &TransactionGraph, merchants: &MerchantSet) -> Vec<Cycle> {
        let mut state = SearchState {
            graph,
            merchants,
            path: Vec::with_capacity(MAX_CYCLE_DEPTH + 1),
            on_path: vec![false; graph.node_count()],
            seen: HashSet::new(),
            found: Vec::new(),
        };

        for start in 0..graph.node_count() {
            if merchants.contains(start) {
                continue;
            }
            state.path.push(start);
            state.on_path[start] = true;
            Self::dfs(&mut state, start, start);
            state.on_path[start] = false;
            state.path.pop();
        }

        tracing::debug!(cycles = state.found.len(), "bounded cycle search done");
        state.found
    }

    fn dfs(state: &mut SearchState<'_>, start: usize, current: usize) {
        let depth = state.path.len();
        if depth > MAX_CYCLE_DEPTH {
            return;
        }

        let graph = state.graph;
        for &next in graph.out_neighbors(current) {
            if state.merchants.contains(next) {
                continue;
            }

            if next == start && depth >= MIN_CYCLE_LENGTH {
                let mut key = state.path.clone();
                key.sort_unstable();
                if state.seen.insert(key) {
                    state.found.push(Cycle {
                        members: state.path.clone(),
                        length: depth,
                    });
                }
                // Closing the cycle ends this node's expansion.
                return;
            }

            if !state.on_path[next] {
                state.on_path[next] = true;
                state.path.push(next);
                Self::dfs(state, start, next);
                state.path.pop();
                state.on_path[next] = false;
            }
        }
    }
}

impl Kernel for BoundedCycleSearch {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}
