//! Fraud-ring detection output types.

use ringsentinel_core::config::ScoringConfig;
use ringsentinel_graph::types::EdgeAggregate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Pattern Types
// ============================================================================

/// Topology a ring was opened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    /// Funds routed around a closed loop of 3 to 5 accounts.
    Cycle,
    /// Many senders concentrating into one account.
    FanIn,
    /// One account dispersing to many receivers.
    FanOut,
    /// Chain of low-activity pass-through accounts.
    #[serde(rename = "shell_network")]
    Shell,
}

impl PatternType {
    /// Wire name of the pattern type.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PatternType::Cycle => "cycle",
            PatternType::FanIn => "fan_in",
            PatternType::FanOut => "fan_out",
            PatternType::Shell => "shell_network",
        }
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evidence attached to a suspicious account.
///
/// Rendered as the tag strings `cycle_length_<n>`, `fan_in`, `fan_out`,
/// `shell_network`, `high_velocity`, `high_out_degree` and `high_in_degree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectedPattern {
    /// Member of a cycle ring of the given length.
    Cycle(usize),
    /// Member of a fan-in ring.
    FanIn,
    /// Member of a fan-out ring.
    FanOut,
    /// Member of a shell network.
    Shell,
    /// Burst activity (ring-level or per-account).
    HighVelocity,
    /// Pays many distinct receivers.
    HighOutDegree,
    /// Receives from many distinct senders.
    HighInDegree,
}

impl fmt::Display for DetectedPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectedPattern::Cycle(n) => write!(f, "cycle_length_{}", n),
            DetectedPattern::FanIn => f.write_str("fan_in"),
            DetectedPattern::FanOut => f.write_str("fan_out"),
            DetectedPattern::Shell => f.write_str("shell_network"),
            DetectedPattern::HighVelocity => f.write_str("high_velocity"),
            DetectedPattern::HighOutDegree => f.write_str("high_out_degree"),
            DetectedPattern::HighInDegree => f.write_str("high_in_degree"),
        }
    }
}

impl FromStr for DetectedPattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fan_in" => Ok(DetectedPattern::FanIn),
            "fan_out" => Ok(DetectedPattern::FanOut),
            "shell_network" => Ok(DetectedPattern::Shell),
            "high_velocity" => Ok(DetectedPattern::HighVelocity),
            "high_out_degree" => Ok(DetectedPattern::HighOutDegree),
            "high_in_degree" => Ok(DetectedPattern::HighInDegree),
            other => other
                .strip_prefix("cycle_length_")
                .and_then(|n| n.parse().ok())
                .map(DetectedPattern::Cycle)
                .ok_or_else(|| format!("unknown pattern tag: {}", other)),
        }
    }
}

impl Serialize for DetectedPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DetectedPattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        tag.parse().map_err(serde::de::Error::custom)
    }
}

/// Risk level classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskLevel {
    /// Below the review threshold.
    Low,
    /// Flag for review.
    Medium,
    /// Escalate.
    Critical,
}

/// Score thresholds separating the risk levels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskTiers {
    /// Lowest `Critical` score.
    pub critical: f64,
    /// Lowest `Medium` score.
    pub medium: f64,
}

impl RiskTiers {
    /// Classify a 0-100 score.
    pub fn classify(&self, score: f64) -> RiskLevel {
        if score >= self.critical {
            RiskLevel::Critical
        } else if score >= self.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl From<&ScoringConfig> for RiskTiers {
    fn from(config: &ScoringConfig) -> Self {
        Self {
            critical: config.critical_threshold,
            medium: config.medium_threshold,
        }
    }
}

impl Default for RiskTiers {
    fn default() -> Self {
        Self::from(&ScoringConfig::default())
    }
}

// ============================================================================
// Result Records
// ============================================================================

/// A detected fraud ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudRing {
    /// Ring identifier (`RING_001`, `RING_002`, ...).
    pub ring_id: String,
    /// Member account ids, distinct, in detection order.
    pub member_accounts: Vec<String>,
    /// Topology the ring was opened for.
    pub pattern_type: PatternType,
    /// Ring risk score (0-100, one decimal).
    pub risk_score: f64,
}

impl FraudRing {
    /// Risk level of the ring under the given tiers.
    pub fn risk_level(&self, tiers: &RiskTiers) -> RiskLevel {
        tiers.classify(self.risk_score)
    }
}

/// An account claimed by a ring, with its suspicion score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuspiciousAccount {
    /// Account id.
    pub account_id: String,
    /// Suspicion score (0-100, one decimal).
    pub suspicion_score: f64,
    /// Evidence, deduplicated, in discovery order.
    pub detected_patterns: Vec<DetectedPattern>,
    /// The ring that claimed the account.
    pub ring_id: String,
}

impl SuspiciousAccount {
    /// Risk level of the account under the given tiers.
    pub fn risk_level(&self, tiers: &RiskTiers) -> RiskLevel {
        tiers.classify(self.suspicion_score)
    }
}

/// Headline counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Distinct accounts in the input.
    pub total_accounts_analyzed: usize,
    /// Accounts claimed by a ring.
    pub suspicious_accounts_flagged: usize,
    /// Rings opened across all detectors.
    pub fraud_rings_detected: usize,
    /// Wall-clock analysis time, one decimal.
    pub processing_time_seconds: f64,
}

/// Complete analysis result.
///
/// Maps are ordered by key so serialized output is reproducible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Account -> distinct receivers in discovery order.
    pub out_edges: BTreeMap<String, Vec<String>>,
    /// Account -> distinct senders in discovery order.
    pub in_edges: BTreeMap<String, Vec<String>>,
    /// `"sender->receiver"` -> aggregate.
    pub edge_map: BTreeMap<String, EdgeAggregate>,
    /// Merchant-classified accounts in first-appearance order.
    pub merchants: Vec<String>,
    /// Every account in first-appearance order.
    pub all_accounts: Vec<String>,
    /// Transactions touching each account.
    pub account_tx_count: BTreeMap<String, usize>,
    /// Volume sent and received by each account.
    pub account_volume: BTreeMap<String, f64>,
    /// Account -> owning ring id.
    pub ring_membership: BTreeMap<String, String>,
    /// Claimed accounts, highest score first.
    pub suspicious_accounts: Vec<SuspiciousAccount>,
    /// Rings in creation order.
    pub fraud_rings: Vec<FraudRing>,
    /// Headline counts.
    pub summary: Summary,
    /// Thresholds the run was configured with.
    #[serde(skip)]
    pub risk_tiers: RiskTiers,
}

impl AnalysisResult {
    /// Look up a ring by id.
    pub fn ring(&self, ring_id: &str) -> Option<&FraudRing> {
        self.fraud_rings.iter().find(|r| r.ring_id == ring_id)
    }

    /// Look up a suspicious account by id.
    pub fn account(&self, account_id: &str) -> Option<&SuspiciousAccount> {
        self.suspicious_accounts
            .iter()
            .find(|a| a.account_id == account_id)
    }

    /// Suspicious accounts at or above a risk level, highest score first.
    pub fn accounts_at_least(&self, level: RiskLevel) -> impl Iterator<Item = &SuspiciousAccount> {
        self.suspicious_accounts
            .iter()
            .filter(move |a| a.risk_level(&self.risk_tiers) >= level)
    }

    /// Rings at or above a risk level, in creation order.
    pub fn rings_at_least(&self, level: RiskLevel) -> impl Iterator<Item = &FraudRing> {
        self.fraud_rings
            .iter()
            .filter(move |r| r.risk_level(&self.risk_tiers) >= level)
    }

    /// Rings of one pattern type, in creation order.
    pub fn rings_of(&self, pattern: PatternType) -> impl Iterator<Item = &FraudRing> {
        self.fraud_rings
            .iter()
            .filter(move |r| r.pattern_type == pattern)
    }
}
