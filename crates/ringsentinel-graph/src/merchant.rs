//! Merchant (payment hub) classification.
//!
//! High-volume accounts paying out to many counterparties while receiving
//! from very few look like payroll processors or payment aggregators. They
//! are excluded from every pattern search so they neither join rings nor
//! bridge paths between otherwise unrelated accounts.

use crate::types::TransactionGraph;
use ringsentinel_core::{
    config::MerchantConfig, domain::Domain, kernel::KernelMetadata, traits::Kernel,
};

/// Set of merchant-classified nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MerchantSet {
    flags: Vec<bool>,
    count: usize,
}

impl MerchantSet {
    /// A set with no merchants for a graph of `node_count` nodes.
    #[must_use]
    pub fn none(node_count: usize) -> Self {
        Self {
            flags: vec![false; node_count],
            count: 0,
        }
    }

    /// True if `node` is a merchant. Unknown nodes are not.
    #[must_use]
    pub fn contains(&self, node: usize) -> bool {
        self.flags.get(node).copied().unwrap_or(false)
    }

    /// Number of merchants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// True if there are no merchants.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Merchant nodes in ascending (first-appearance) order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.flags
            .iter()
            .enumerate()
            .filter_map(|(node, &flag)| flag.then_some(node))
    }

    fn insert(&mut self, node: usize) {
        if !self.flags[node] {
            self.flags[node] = true;
            self.count += 1;
        }
    }
}

/// Merchant classification kernel.
#[derive(Debug, Clone)]
pub struct MerchantClassifier {
    metadata: KernelMetadata,
}

impl Default for MerchantClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl MerchantClassifier {
    /// Create a new merchant classifier.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: KernelMetadata::batch("graph/merchant", Domain::GraphAnalytics)
                .with_description("High fan-out / low fan-in hub classification"),
        }
    }

    /// True if a node meets every merchant criterion.
    #[must_use]
    pub fn is_merchant(graph: &TransactionGraph, node: usize, config: &MerchantConfig) -> bool {
        graph.tx_count(node) > config.min_tx_count
            && graph.out_degree(node) > config.min_out_degree
            && graph.in_degree(node) <= config.max_in_degree
    }

    /// Classify every node of the graph.
    pub fn compute(graph: &TransactionGraph, config: &MerchantConfig) -> MerchantSet {
        let mut merchants = MerchantSet::none(graph.node_count());
        for node in 0..graph.node_count() {
            if Self::is_merchant(graph, node, config) {
                merchants.insert(node);
            }
        }
        tracing::debug!(merchants = merchants.len(), "merchant classification done");
        merchants
    }
}

impl Kernel for MerchantClassifier {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Transaction;

    /// `hub` pays `outs` distinct receivers and receives from `ins` distinct senders.
    fn hub_graph(outs: usize, ins: usize) -> TransactionGraph {
        let mut txs = Vec::new();
        for i in 0..outs {
            txs.push(Transaction::new(format!("O{}", i), "HUB", format!("R{}", i), 10.0));
        }
        for i in 0..ins {
            txs.push(Transaction::new(format!("I{}", i), format!("S{}", i), "HUB", 10.0));
        }
        TransactionGraph::build(&txs)
    }

    #[test]
    fn test_merchant_metadata() {
        let kernel = MerchantClassifier::new();
        assert_eq!(kernel.metadata().id, "graph/merchant");
        assert_eq!(kernel.metadata().domain, Domain::GraphAnalytics);
    }

    #[test]
    fn test_payout_hub_is_merchant() {
        // tx_count = 60, out = 40, in = 2 (padded with repeat payouts)
        let mut graph = hub_graph(40, 2);
        for i in 0..18 {
            graph.add_transaction(&Transaction::new(
                format!("X{}", i),
                "HUB",
                format!("R{}", i),
                5.0,
            ));
        }
        let hub = graph.index_of("HUB").unwrap();
        assert_eq!(graph.tx_count(hub), 60);

        let merchants = MerchantClassifier::compute(&graph, &MerchantConfig::default());
        assert!(merchants.contains(hub));
        assert_eq!(merchants.len(), 1);
        assert_eq!(merchants.iter().collect::<Vec<_>>(), vec![hub]);
    }

    #[test]
    fn test_collector_is_not_merchant() {
        // tx_count = 60, out = 0, in = 60
        let graph = hub_graph(0, 60);
        let merchants = MerchantClassifier::compute(&graph, &MerchantConfig::default());
        assert!(merchants.is_empty());
    }

    #[test]
    fn test_thresholds_are_strict() {
        // tx_count = 50 exactly does not exceed 50.
        let graph = hub_graph(48, 2);
        let hub = graph.index_of("HUB").unwrap();
        assert_eq!(graph.tx_count(hub), 50);
        assert!(!MerchantClassifier::is_merchant(&graph, hub, &MerchantConfig::default()));

        // Six distinct senders is one too many.
        let graph = hub_graph(50, 6);
        let hub = graph.index_of("HUB").unwrap();
        assert!(!MerchantClassifier::is_merchant(&graph, hub, &MerchantConfig::default()));

        let graph = hub_graph(50, 5);
        let hub = graph.index_of("HUB").unwrap();
        assert!(MerchantClassifier::is_merchant(&graph, hub, &MerchantConfig::default()));
    }

    #[test]
    fn test_unknown_node_is_not_merchant() {
        let merchants = MerchantSet::none(3);
        assert!(!merchants.contains(10));
    }
}
