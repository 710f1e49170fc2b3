//! Shell network detection.
//!
//! Layering through pass-through accounts shows up as short chains of
//! low-activity accounts. Chains `start -> mid -> end (-> next)` are walked
//! from every eligible account and merged into groups by overlap; a group
//! becomes a `shell_network` ring when enough of its members are still
//! unclaimed.

use crate::context::DetectionContext;
use crate::types::PatternType;
use ringsentinel_core::{
    config::ShellConfig, domain::Domain, kernel::KernelMetadata, traits::Kernel,
};
use ringsentinel_graph::merchant::MerchantSet;
use ringsentinel_graph::types::TransactionGraph;

/// Shell network detector.
#[derive(Debug, Clone)]
pub struct ShellDetector {
    metadata: KernelMetadata,
}

impl Default for ShellDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellDetector {
    /// Create a new shell detector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: KernelMetadata::batch("aml/shell", Domain::Compliance)
                .with_description("Low-activity pass-through chains merged by overlap"),
        }
    }

    /// Open shell rings. Returns the number of rings opened.
    pub fn compute(
        graph: &TransactionGraph,
        merchants: &MerchantSet,
        config: &ShellConfig,
        ctx: &mut DetectionContext,
    ) -> usize {
        let groups = Self::find_groups(graph, merchants, config);

        let mut opened = 0;
        for group in groups {
            let unclaimed = group.iter().filter(|&&m| !ctx.is_claimed(m)).count();
            if unclaimed < config.min_unclaimed_members {
                continue;
            }
            ctx.open_ring(PatternType::Shell, group, None, false);
            opened += 1;
        }

        tracing::debug!(rings = opened, "shell detection done");
        opened
    }

    /// Walk every chain and merge them into groups, in discovery order.
    pub fn find_groups(
        graph: &TransactionGraph,
        merchants: &MerchantSet,
        config: &ShellConfig,
    ) -> Vec<Vec<usize>> {
        let eligible =
            |n: usize| !merchants.contains(n) && graph.tx_count(n) <= config.max_tx;

        let mut groups: Vec<Vec<usize>> = Vec::new();
        for start in (0..graph.node_count()).filter(|&n| eligible(n)) {
            for &mid in graph.out_neighbors(start) {
                if mid == start || !eligible(mid) {
                    continue;
                }
                for &end in graph.out_neighbors(mid) {
                    if end == start || end == mid || !eligible(end) {
                        continue;
                    }
                    let mut chain = vec![start, mid, end];
                    if let Some(&next) = graph
                        .out_neighbors(end)
                        .iter()
                        .find(|&&n| eligible(n) && !chain.contains(&n))
                    {
                        chain.push(next);
                    }
                    Self::merge(&mut groups, &chain);
                }
            }
        }

        groups
    }

    /// Fold a chain into the first group it overlaps, or start a new group.
    fn merge(groups: &mut Vec<Vec<usize>>, chain: &[usize]) {
        match groups
            .iter_mut()
            .find(|g| g.iter().any(|m| chain.contains(m)))
        {
            Some(group) => {
                for &m in chain {
                    if !group.contains(&m) {
                        group.push(m);
                    }
                }
            }
            None => groups.push(chain.to_vec()),
        }
    }
}

impl Kernel for ShellDetector {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringsentinel_graph::types::Transaction;

    fn graph_from(edges: &[(&str, &str)]) -> TransactionGraph {
        let txs: Vec<Transaction> = edges
            .iter()
            .enumerate()
            .map(|(i, (s, r))| Transaction::new(format!("T{}", i), *s, *r, 900.0))
            .collect();
        TransactionGraph::build(&txs)
    }

    fn run(graph: &TransactionGraph, ctx: &mut DetectionContext) -> usize {
        ShellDetector::compute(
            graph,
            &MerchantSet::none(graph.node_count()),
            &ShellConfig::default(),
            ctx,
        )
    }

    fn names(graph: &TransactionGraph, nodes: &[usize]) -> Vec<String> {
        nodes.iter().map(|&n| graph.account_id(n).to_string()).collect()
    }

    #[test]
    fn test_chain_of_four() {
        let graph = graph_from(&[("A", "B"), ("B", "C"), ("C", "D")]);
        let mut ctx = DetectionContext::new(graph.node_count());

        assert_eq!(run(&graph, &mut ctx), 1);
        let ring = ctx.ring(0);
        assert_eq!(ring.pattern_type, PatternType::Shell);
        assert_eq!(names(&graph, &ring.members), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_chain_of_two_ignored() {
        let graph = graph_from(&[("A", "B")]);
        let mut ctx = DetectionContext::new(graph.node_count());
        assert_eq!(run(&graph, &mut ctx), 0);
        assert!(ShellDetector::find_groups(
            &graph,
            &MerchantSet::none(2),
            &ShellConfig::default()
        )
        .is_empty());
    }

    #[test]
    fn test_busy_account_breaks_chain() {
        // B has five transactions.
        let graph = graph_from(&[
            ("A", "B"),
            ("B", "C"),
            ("X", "B"),
            ("Y", "B"),
            ("B", "Z"),
        ]);
        let mut ctx = DetectionContext::new(graph.node_count());
        assert_eq!(graph.tx_count(graph.index_of("B").unwrap()), 5);
        assert_eq!(run(&graph, &mut ctx), 0);
    }

    #[test]
    fn test_overlapping_chains_merge() {
        // A->B->C->D and E->C->D->F share C and D.
        let graph = graph_from(&[("A", "B"), ("B", "C"), ("C", "D"), ("E", "C"), ("D", "F")]);
        let groups =
            ShellDetector::find_groups(&graph, &MerchantSet::none(graph.node_count()), &ShellConfig::default());

        assert_eq!(groups.len(), 1);
        let mut members = names(&graph, &groups[0]);
        members.sort();
        assert_eq!(members, vec!["A", "B", "C", "D", "E", "F"]);
    }

    #[test]
    fn test_claimed_members_do_not_count() {
        let graph = graph_from(&[("A", "B"), ("B", "C"), ("C", "D")]);
        let mut ctx = DetectionContext::new(graph.node_count());
        // Two of the four members already belong to another ring.
        ctx.open_ring(PatternType::Cycle, vec![0, 1], Some(3), false);

        assert_eq!(run(&graph, &mut ctx), 0);
        assert_eq!(ctx.ring_count(), 1);
    }

    #[test]
    fn test_group_lists_claimed_members() {
        let graph = graph_from(&[("A", "B"), ("B", "C"), ("C", "D")]);
        let mut ctx = DetectionContext::new(graph.node_count());
        ctx.open_ring(PatternType::Cycle, vec![0], Some(3), false);

        assert_eq!(run(&graph, &mut ctx), 1);
        let shell = ctx.ring(1);
        assert_eq!(shell.members.len(), 4);
        assert_eq!(ctx.owner(0), Some(0));
        assert_eq!(ctx.owner(3), Some(1));
    }
}
