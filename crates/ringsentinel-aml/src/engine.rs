//! End-to-end ring detection.
//!
//! Builds the graph, classifies merchants, runs the cycle, fan and shell
//! detectors in that order over one shared [`DetectionContext`], scores the
//! result and assembles the report.

use crate::context::DetectionContext;
use crate::cycles::CycleDetector;
use crate::fan::FanDetector;
use crate::messages::{AnalysisInput, AnalysisOutput};
use crate::scoring::RiskScorer;
use crate::shell::ShellDetector;
use crate::types::{AnalysisResult, RiskTiers, Summary};
use async_trait::async_trait;
use ringsentinel_core::config::DetectionConfig;
use ringsentinel_core::error::{Result, SentinelError};
use ringsentinel_core::traits::BatchKernel;
use ringsentinel_core::{domain::Domain, kernel::KernelMetadata, traits::Kernel};
use ringsentinel_graph::merchant::{MerchantClassifier, MerchantSet};
use ringsentinel_graph::types::{Transaction, TransactionGraph};
use std::collections::BTreeMap;
use std::time::Instant;

/// Fraud-ring detection kernel.
#[derive(Debug, Clone)]
pub struct RingDetection {
    metadata: KernelMetadata,
    config: DetectionConfig,
}

impl Default for RingDetection {
    fn default() -> Self {
        Self::new()
    }
}

impl RingDetection {
    /// Create a ring detection kernel with default thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DetectionConfig::default())
    }

    /// Create a ring detection kernel with custom thresholds.
    #[must_use]
    pub fn with_config(config: DetectionConfig) -> Self {
        Self {
            metadata: KernelMetadata::batch("aml/ring-detection", Domain::Compliance)
                .with_description("Cycle, fan and shell ring detection with risk scoring"),
            config,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Analyze one batch of transactions.
    ///
    /// Never fails: empty or fully invalid input gives an empty result.
    pub fn compute(transactions: &[Transaction], config: &DetectionConfig) -> AnalysisResult {
        let started = Instant::now();
        tracing::info!(transactions = transactions.len(), "ring detection started");

        let graph = TransactionGraph::build(transactions);
        let merchants = MerchantClassifier::compute(&graph, &config.merchant);

        let mut ctx = DetectionContext::new(graph.node_count());
        let cycles = CycleDetector::compute(&graph, &merchants, &mut ctx);
        let fans = FanDetector::compute(&graph, &merchants, &config.fan, &mut ctx);
        let shells = ShellDetector::compute(&graph, &merchants, &config.shell, &mut ctx);

        let scored = RiskScorer::compute(&graph, &ctx, &config.scoring);

        let elapsed = started.elapsed().as_secs_f64();
        let summary = Summary {
            total_accounts_analyzed: graph.node_count(),
            suspicious_accounts_flagged: scored.suspicious_accounts.len(),
            fraud_rings_detected: scored.fraud_rings.len(),
            processing_time_seconds: (elapsed * 10.0).round() / 10.0,
        };

        tracing::info!(
            accounts = summary.total_accounts_analyzed,
            merchants = merchants.len(),
            cycle_rings = cycles,
            fan_rings = fans,
            shell_rings = shells,
            flagged = summary.suspicious_accounts_flagged,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "ring detection finished"
        );

        let mut result = Self::graph_report(&graph, &merchants, summary);
        result.ring_membership = ctx
            .claims()
            .map(|(node, ring)| {
                (
                    graph.account_id(node).to_string(),
                    ctx.ring(ring).ring_id.clone(),
                )
            })
            .collect();
        result.suspicious_accounts = scored.suspicious_accounts;
        result.fraud_rings = scored.fraud_rings;
        result.risk_tiers = RiskTiers::from(&config.scoring);
        result
    }

    /// Graph-level part of the report, with empty detection fields.
    fn graph_report(
        graph: &TransactionGraph,
        merchants: &MerchantSet,
        summary: Summary,
    ) -> AnalysisResult {
        let names = |nodes: &[usize]| -> Vec<String> {
            nodes
                .iter()
                .map(|&n| graph.account_id(n).to_string())
                .collect()
        };

        let mut out_edges = BTreeMap::new();
        let mut in_edges = BTreeMap::new();
        let mut account_tx_count = BTreeMap::new();
        let mut account_volume = BTreeMap::new();
        for (node, account) in graph.accounts().iter().enumerate() {
            if !graph.out_neighbors(node).is_empty() {
                out_edges.insert(account.clone(), names(graph.out_neighbors(node)));
            }
            if !graph.in_neighbors(node).is_empty() {
                in_edges.insert(account.clone(), names(graph.in_neighbors(node)));
            }
            account_tx_count.insert(account.clone(), graph.tx_count(node));
            account_volume.insert(account.clone(), graph.volume(node));
        }

        let edge_map = graph
            .edges()
            .map(|(s, r, edge)| {
                (
                    format!("{}->{}", graph.account_id(s), graph.account_id(r)),
                    *edge,
                )
            })
            .collect();

        AnalysisResult {
            out_edges,
            in_edges,
            edge_map,
            merchants: merchants
                .iter()
                .map(|n| graph.account_id(n).to_string())
                .collect(),
            all_accounts: graph.accounts().to_vec(),
            account_tx_count,
            account_volume,
            ring_membership: BTreeMap::new(),
            suspicious_accounts: Vec::new(),
            fraud_rings: Vec::new(),
            summary,
            risk_tiers: RiskTiers::default(),
        }
    }
}

impl Kernel for RingDetection {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }

    fn validate(&self) -> Result<()> {
        self.config.validate()
    }
}

#[async_trait]
impl BatchKernel<AnalysisInput, AnalysisOutput> for RingDetection {
    async fn execute(&self, input: AnalysisInput) -> Result<AnalysisOutput> {
        self.validate()?;
        self.validate_input(&input)?;

        let config = self.config.clone();
        let start = Instant::now();
        let result =
            tokio::task::spawn_blocking(move || Self::compute(&input.transactions, &config))
                .await
                .map_err(|e| SentinelError::internal(format!("ring detection task failed: {}", e)))?;

        Ok(AnalysisOutput {
            result,
            compute_time_us: start.elapsed().as_micros() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PatternType, RiskLevel};
    use std::time::Duration;

    fn triangle() -> Vec<Transaction> {
        vec![
            Transaction::new("T1", "A", "B", 100.0),
            Transaction::new("T2", "B", "C", 100.0),
            Transaction::new("T3", "C", "A", 100.0),
        ]
    }

    #[test]
    fn test_ring_detection_metadata() {
        let kernel = RingDetection::new();
        assert_eq!(kernel.metadata().id, "aml/ring-detection");
        assert_eq!(kernel.metadata().domain, Domain::Compliance);
        assert!(kernel.validate().is_ok());
    }

    #[test]
    fn test_empty_input() {
        let result = RingDetection::compute(&[], &DetectionConfig::default());
        assert_eq!(result.summary.total_accounts_analyzed, 0);
        assert_eq!(result.summary.fraud_rings_detected, 0);
        assert!(result.suspicious_accounts.is_empty());
        assert!(result.edge_map.is_empty());
    }

    #[test]
    fn test_report_fields() {
        let mut txs = triangle();
        txs.push(Transaction::new("T4", "A", "B", 50.0));
        let result = RingDetection::compute(&txs, &DetectionConfig::default());

        assert_eq!(result.all_accounts, vec!["A", "B", "C"]);
        assert_eq!(result.out_edges["A"], vec!["B"]);
        assert_eq!(result.in_edges["A"], vec!["C"]);
        assert_eq!(result.edge_map["A->B"].amount, 150.0);
        assert_eq!(result.edge_map["A->B"].count, 2);
        assert_eq!(result.account_tx_count["A"], 3);
        assert_eq!(result.account_volume["C"], 200.0);
        assert!(result.merchants.is_empty());
        assert_eq!(result.ring_membership["B"], "RING_001");
        assert_eq!(result.summary.suspicious_accounts_flagged, 3);
        assert_eq!(result.fraud_rings[0].pattern_type, PatternType::Cycle);
    }

    #[test]
    fn test_cycle_wins_over_shell() {
        // The triangle accounts are also low-activity chain members.
        let result = RingDetection::compute(&triangle(), &DetectionConfig::default());
        assert_eq!(result.fraud_rings.len(), 1);
        assert_eq!(result.summary.fraud_rings_detected, 1);
    }

    #[test]
    fn test_configured_risk_tiers() {
        let mut config = DetectionConfig::default();
        config.scoring.critical_threshold = 90.0;
        config.scoring.medium_threshold = 80.0;
        let result = RingDetection::compute(&triangle(), &config);

        // Ring scores 80, accounts 60.
        assert_eq!(
            result.fraud_rings[0].risk_level(&result.risk_tiers),
            RiskLevel::Medium
        );
        assert_eq!(result.rings_at_least(RiskLevel::Critical).count(), 0);
        assert_eq!(result.rings_at_least(RiskLevel::Medium).count(), 1);
        assert_eq!(result.accounts_at_least(RiskLevel::Medium).count(), 0);
        assert_eq!(result.accounts_at_least(RiskLevel::Low).count(), 3);

        let defaults = RingDetection::compute(&triangle(), &DetectionConfig::default());
        assert_eq!(defaults.rings_at_least(RiskLevel::Critical).count(), 1);
        assert_eq!(defaults.accounts_at_least(RiskLevel::Medium).count(), 3);
    }

    #[test]
    fn test_risk_tiers_not_serialized() {
        let result = RingDetection::compute(&triangle(), &DetectionConfig::default());
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("risk_tiers").is_none());

        let back: AnalysisResult = serde_json::from_value(json).unwrap();
        assert_eq!(back.risk_tiers, RiskTiers::default());
    }

    #[tokio::test]
    async fn test_batch_execute() {
        let kernel = RingDetection::new();
        let output = kernel.execute(AnalysisInput::new(triangle())).await.unwrap();
        assert_eq!(output.result.fraud_rings.len(), 1);
        assert_eq!(output.result.suspicious_accounts[0].suspicion_score, 60.0);
    }

    #[tokio::test]
    async fn test_execute_with_timeout() {
        let kernel = RingDetection::new();
        let output = kernel
            .execute_with_timeout(AnalysisInput::new(triangle()), Duration::from_secs(10))
            .await
            .unwrap();
        assert_eq!(output.result.summary.total_accounts_analyzed, 3);
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let mut config = DetectionConfig::default();
        config.fan.threshold = 0;
        let kernel = RingDetection::with_config(config);
        let err = kernel
            .execute(AnalysisInput::new(triangle()))
            .await
            .unwrap_err();
        assert!(matches!(err, SentinelError::ConfigError(_)));
    }
}
