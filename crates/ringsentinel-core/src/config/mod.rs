//! Detection Configuration
//!
//! Thresholds and score weights for one analysis run. Defaults reproduce the
//! reference heuristics exactly; overriding them changes which accounts are
//! flagged and how they score.
//!
//! # Example
//!
//! ```rust,ignore
//! use ringsentinel_core::config::DetectionConfig;
//!
//! // Load from environment
//! let config = DetectionConfig::from_env()?;
//!
//! // Or load from file
//! let config = DetectionConfig::from_file("config/detection.toml")?;
//! ```

use crate::error::{Result, SentinelError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Merchant (payment hub) classification thresholds.
///
/// An account is a merchant iff
/// `tx_count > min_tx_count && out_degree > min_out_degree && in_degree <= max_in_degree`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MerchantConfig {
    /// Transaction count that must be exceeded.
    pub min_tx_count: usize,
    /// Distinct out-degree that must be exceeded.
    pub min_out_degree: usize,
    /// Largest distinct in-degree a merchant may have.
    pub max_in_degree: usize,
}

impl Default for MerchantConfig {
    fn default() -> Self {
        Self {
            min_tx_count: 50,
            min_out_degree: 30,
            max_in_degree: 5,
        }
    }
}

/// Fan-in / fan-out detection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FanConfig {
    /// Minimum distinct non-merchant counterparties to open a ring.
    /// Also the window size (in transactions) of the temporal check.
    pub threshold: usize,
    /// Maximum counterparties listed in a ring besides the hub.
    pub max_members: usize,
    /// Span within which `threshold` consecutive transactions mark a ring temporal.
    pub temporal_window_hours: u64,
}

impl Default for FanConfig {
    fn default() -> Self {
        Self {
            threshold: 10,
            max_members: 20,
            temporal_window_hours: 72,
        }
    }
}

/// Shell-chain detection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Largest transaction count of a low-activity (shell) account.
    pub max_tx: usize,
    /// Unclaimed members a merged group needs to become a ring.
    pub min_unclaimed_members: usize,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            max_tx: 4,
            min_unclaimed_members: 3,
        }
    }
}

/// Score contributions and risk tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Contribution of owning a cycle ring.
    pub cycle_weight: f64,
    /// Contribution of owning a fan-in or fan-out ring.
    pub fan_weight: f64,
    /// Contribution of owning a shell ring.
    pub shell_weight: f64,
    /// Bonus when the owning ring passed the temporal check.
    pub ring_velocity_bonus: f64,
    /// Distinct degree at which the degree bonus applies.
    pub degree_threshold: usize,
    /// Bonus per direction (in/out) at or above `degree_threshold`.
    pub degree_bonus: f64,
    /// Transactions in a burst.
    pub burst_count: usize,
    /// Span within which `burst_count` consecutive transactions form a burst.
    pub burst_window_hours: u64,
    /// Bonus for an account-level burst.
    pub burst_bonus: f64,
    /// Added to the mean member score of cycle rings.
    pub cycle_ring_bonus: f64,
    /// Added to the mean member score of every other ring.
    pub ring_bonus: f64,
    /// Scores at or above this are critical.
    pub critical_threshold: f64,
    /// Scores at or above this (and below critical) are medium.
    pub medium_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            cycle_weight: 60.0,
            fan_weight: 50.0,
            shell_weight: 45.0,
            ring_velocity_bonus: 20.0,
            degree_threshold: 5,
            degree_bonus: 10.0,
            burst_count: 5,
            burst_window_hours: 24,
            burst_bonus: 15.0,
            cycle_ring_bonus: 20.0,
            ring_bonus: 15.0,
            critical_threshold: 70.0,
            medium_threshold: 40.0,
        }
    }
}

impl ScoringConfig {
    fn named_values(&self) -> [(&'static str, f64); 10] {
        [
            ("cycle_weight", self.cycle_weight),
            ("fan_weight", self.fan_weight),
            ("shell_weight", self.shell_weight),
            ("ring_velocity_bonus", self.ring_velocity_bonus),
            ("degree_bonus", self.degree_bonus),
            ("burst_bonus", self.burst_bonus),
            ("cycle_ring_bonus", self.cycle_ring_bonus),
            ("ring_bonus", self.ring_bonus),
            ("critical_threshold", self.critical_threshold),
            ("medium_threshold", self.medium_threshold),
        ]
    }
}

/// Full detection configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Merchant classification
    pub merchant: MerchantConfig,
    /// Fan detection
    pub fan: FanConfig,
    /// Shell detection
    pub shell: ShellConfig,
    /// Scoring
    pub scoring: ScoringConfig,
}

impl DetectionConfig {
    /// Load configuration from environment variables.
    ///
    /// Starts from the defaults and applies any `RINGSENTINEL_*` override
    /// present. A variable that is set but does not parse is an error.
    /// Every field has a variable; scoring fields use
    /// `RINGSENTINEL_SCORING_<FIELD>`, e.g. `RINGSENTINEL_SCORING_CYCLE_WEIGHT`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Apply `RINGSENTINEL_*` overrides read through `lookup` to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        override_from(&lookup, "RINGSENTINEL_MERCHANT_MIN_TX", &mut config.merchant.min_tx_count)?;
        override_from(
            &lookup,
            "RINGSENTINEL_MERCHANT_MIN_OUT_DEGREE",
            &mut config.merchant.min_out_degree,
        )?;
        override_from(
            &lookup,
            "RINGSENTINEL_MERCHANT_MAX_IN_DEGREE",
            &mut config.merchant.max_in_degree,
        )?;
        override_from(&lookup, "RINGSENTINEL_FAN_THRESHOLD", &mut config.fan.threshold)?;
        override_from(&lookup, "RINGSENTINEL_FAN_MAX_MEMBERS", &mut config.fan.max_members)?;
        override_from(
            &lookup,
            "RINGSENTINEL_TEMPORAL_WINDOW_HOURS",
            &mut config.fan.temporal_window_hours,
        )?;
        override_from(&lookup, "RINGSENTINEL_SHELL_MAX_TX", &mut config.shell.max_tx)?;
        override_from(
            &lookup,
            "RINGSENTINEL_SHELL_MIN_UNCLAIMED_MEMBERS",
            &mut config.shell.min_unclaimed_members,
        )?;
        override_from(
            &lookup,
            "RINGSENTINEL_SCORING_CYCLE_WEIGHT",
            &mut config.scoring.cycle_weight,
        )?;
        override_from(&lookup, "RINGSENTINEL_SCORING_FAN_WEIGHT", &mut config.scoring.fan_weight)?;
        override_from(
            &lookup,
            "RINGSENTINEL_SCORING_SHELL_WEIGHT",
            &mut config.scoring.shell_weight,
        )?;
        override_from(
            &lookup,
            "RINGSENTINEL_SCORING_RING_VELOCITY_BONUS",
            &mut config.scoring.ring_velocity_bonus,
        )?;
        override_from(
            &lookup,
            "RINGSENTINEL_SCORING_DEGREE_THRESHOLD",
            &mut config.scoring.degree_threshold,
        )?;
        override_from(
            &lookup,
            "RINGSENTINEL_SCORING_DEGREE_BONUS",
            &mut config.scoring.degree_bonus,
        )?;
        override_from(
            &lookup,
            "RINGSENTINEL_SCORING_BURST_COUNT",
            &mut config.scoring.burst_count,
        )?;
        override_from(
            &lookup,
            "RINGSENTINEL_SCORING_BURST_WINDOW_HOURS",
            &mut config.scoring.burst_window_hours,
        )?;
        override_from(
            &lookup,
            "RINGSENTINEL_SCORING_BURST_BONUS",
            &mut config.scoring.burst_bonus,
        )?;
        override_from(
            &lookup,
            "RINGSENTINEL_SCORING_CYCLE_RING_BONUS",
            &mut config.scoring.cycle_ring_bonus,
        )?;
        override_from(&lookup, "RINGSENTINEL_SCORING_RING_BONUS", &mut config.scoring.ring_bonus)?;
        override_from(
            &lookup,
            "RINGSENTINEL_SCORING_CRITICAL_THRESHOLD",
            &mut config.scoring.critical_threshold,
        )?;
        override_from(
            &lookup,
            "RINGSENTINEL_SCORING_MEDIUM_THRESHOLD",
            &mut config.scoring.medium_threshold,
        )?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| SentinelError::config(format!("Failed to read config: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| SentinelError::config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SentinelError::config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path.as_ref(), content)
            .map_err(|e| SentinelError::config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.fan.threshold == 0 {
            return Err(SentinelError::config("fan.threshold must be at least 1"));
        }
        if self.fan.max_members == 0 {
            return Err(SentinelError::config("fan.max_members must be at least 1"));
        }
        if self.shell.min_unclaimed_members == 0 {
            return Err(SentinelError::config(
                "shell.min_unclaimed_members must be at least 1",
            ));
        }
        if self.scoring.burst_count < 2 {
            return Err(SentinelError::config("scoring.burst_count must be at least 2"));
        }
        for (name, value) in self.scoring.named_values() {
            if !value.is_finite() || value < 0.0 {
                return Err(SentinelError::config(format!(
                    "scoring.{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if self.scoring.medium_threshold > self.scoring.critical_threshold {
            return Err(SentinelError::config(
                "scoring.medium_threshold must not exceed scoring.critical_threshold",
            ));
        }
        if self.fan.max_members < self.fan.threshold {
            tracing::warn!(
                max_members = self.fan.max_members,
                threshold = self.fan.threshold,
                "fan rings will list fewer counterparties than the threshold that opened them"
            );
        }

        Ok(())
    }
}

fn override_from<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    slot: &mut T,
) -> Result<()> {
    if let Some(raw) = lookup(key) {
        *slot = raw
            .trim()
            .parse()
            .map_err(|_| SentinelError::config(format!("{} is not a valid value: {:?}", key, raw)))?;
    }
    Ok(())
}

/// Configuration builder
#[derive(Default)]
pub struct DetectionConfigBuilder {
    config: DetectionConfig,
}

impl DetectionConfigBuilder {
    /// Create new builder starting from the defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure merchant classification
    pub fn merchant(mut self, f: impl FnOnce(MerchantConfig) -> MerchantConfig) -> Self {
        self.config.merchant = f(self.config.merchant);
        self
    }

    /// Configure fan detection
    pub fn fan(mut self, f: impl FnOnce(FanConfig) -> FanConfig) -> Self {
        self.config.fan = f(self.config.fan);
        self
    }

    /// Configure shell detection
    pub fn shell(mut self, f: impl FnOnce(ShellConfig) -> ShellConfig) -> Self {
        self.config.shell = f(self.config.shell);
        self
    }

    /// Configure scoring
    pub fn scoring(mut self, f: impl FnOnce(ScoringConfig) -> ScoringConfig) -> Self {
        self.config.scoring = f(self.config.scoring);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<DetectionConfig> {
        self.config.validate()?;
        Ok(self.config)
    }

    /// Build without validation
    pub fn build_unchecked(self) -> DetectionConfig {
        self.config
    }
}
