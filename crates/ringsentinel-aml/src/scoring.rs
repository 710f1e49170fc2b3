//! Composite risk scoring.
//!
//! Account score = owning ring's pattern weight + ring velocity bonus +
//! degree bonuses + per-account burst bonus, capped at 100. Ring score =
//! mean member score + pattern bonus, capped at 100. Both are quantized to
//! one decimal.

use crate::context::DetectionContext;
use crate::types::{DetectedPattern, FraudRing, PatternType, SuspiciousAccount};
use ringsentinel_core::{
    config::ScoringConfig, domain::Domain, kernel::KernelMetadata, traits::Kernel,
};
use ringsentinel_graph::types::TransactionGraph;
use ringsentinel_graph::velocity::{has_burst, window_hours};

/// Scored detector output.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRings {
    /// Claimed accounts, highest score first (ties keep claim order).
    pub suspicious_accounts: Vec<SuspiciousAccount>,
    /// Rings in creation order.
    pub fraud_rings: Vec<FraudRing>,
}

/// Risk scoring kernel.
#[derive(Debug, Clone)]
pub struct RiskScorer {
    metadata: KernelMetadata,
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::new()
    }
}

fn tag(patterns: &mut Vec<DetectedPattern>, pattern: DetectedPattern) {
    if !patterns.contains(&pattern) {
        patterns.push(pattern);
    }
}

/// Round to one decimal and cap at 100.
pub(crate) fn quantize(score: f64) -> f64 {
    ((score * 10.0).round() / 10.0).min(100.0)
}

impl RiskScorer {
    /// Create a new risk scorer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: KernelMetadata::batch("aml/risk-scoring", Domain::RiskScoring)
                .with_description("Composite account and ring risk scores"),
        }
    }

    /// Score every claimed account and every ring.
    ///
    /// Reads the graph and context only; scoring the same detector output
    /// twice gives the same result.
    pub fn compute(
        graph: &TransactionGraph,
        ctx: &DetectionContext,
        config: &ScoringConfig,
    ) -> ScoredRings {
        let mut node_scores: Vec<Option<f64>> = vec![None; graph.node_count()];
        let mut suspicious_accounts = Vec::with_capacity(ctx.claimed_count());

        for (node, ring_index) in ctx.claims() {
            let (score, patterns) = Self::score_account(graph, ctx, node, ring_index, config);
            node_scores[node] = Some(score);
            suspicious_accounts.push(SuspiciousAccount {
                account_id: graph.account_id(node).to_string(),
                suspicion_score: score,
                detected_patterns: patterns,
                ring_id: ctx.ring(ring_index).ring_id.clone(),
            });
        }

        // Stable: ties keep claim order.
        suspicious_accounts.sort_by(|a, b| b.suspicion_score.total_cmp(&a.suspicion_score));

        let fraud_rings = ctx
            .rings()
            .iter()
            .map(|ring| {
                let total: f64 = ring
                    .members
                    .iter()
                    .map(|&m| node_scores[m].unwrap_or(0.0))
                    .sum();
                let average = total / ring.members.len().max(1) as f64;
                let bonus = match ring.pattern_type {
                    PatternType::Cycle => config.cycle_ring_bonus,
                    _ => config.ring_bonus,
                };
                FraudRing {
                    ring_id: ring.ring_id.clone(),
                    member_accounts: ring
                        .members
                        .iter()
                        .map(|&m| graph.account_id(m).to_string())
                        .collect(),
                    pattern_type: ring.pattern_type,
                    risk_score: quantize(average + bonus),
                }
            })
            .collect();

        ScoredRings {
            suspicious_accounts,
            fraud_rings,
        }
    }

    /// Score one account against the ring that owns it.
    pub fn score_account(
        graph: &TransactionGraph,
        ctx: &DetectionContext,
        node: usize,
        ring_index: usize,
        config: &ScoringConfig,
    ) -> (f64, Vec<DetectedPattern>) {
        let ring = ctx.ring(ring_index);
        let mut patterns = Vec::new();
        let mut score = 0.0;

        match ring.pattern_type {
            PatternType::Cycle => {
                tag(&mut patterns, DetectedPattern::Cycle(ring.cycle_length.unwrap_or(3)));
                score += config.cycle_weight;
            }
            PatternType::FanIn => {
                tag(&mut patterns, DetectedPattern::FanIn);
                score += config.fan_weight;
            }
            PatternType::FanOut => {
                tag(&mut patterns, DetectedPattern::FanOut);
                score += config.fan_weight;
            }
            PatternType::Shell => {
                tag(&mut patterns, DetectedPattern::Shell);
                score += config.shell_weight;
            }
        }

        if ring.temporal {
            tag(&mut patterns, DetectedPattern::HighVelocity);
            score += config.ring_velocity_bonus;
        }

        if graph.out_degree(node) >= config.degree_threshold {
            tag(&mut patterns, DetectedPattern::HighOutDegree);
            score += config.degree_bonus;
        }
        if graph.in_degree(node) >= config.degree_threshold {
            tag(&mut patterns, DetectedPattern::HighInDegree);
            score += config.degree_bonus;
        }

        if has_burst(
            graph.time_series(node),
            config.burst_count,
            window_hours(config.burst_window_hours),
        ) {
            tag(&mut patterns, DetectedPattern::HighVelocity);
            score += config.burst_bonus;
        }

        (quantize(score), patterns)
    }
}

impl Kernel for RiskScorer {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}
