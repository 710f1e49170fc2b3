//! Domain definitions for kernel categorization.
//!
//! Every detection stage belongs to one analytical area. The domain appears
//! in kernel metadata and in log fields so a run can be filtered per stage.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Analytical area a kernel belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Domain {
    /// Graph construction and structural search (adjacency, merchants, cycles).
    GraphAnalytics,

    /// Laundering topology detection: cycles, fan-in/fan-out, shell chains.
    Compliance,

    /// Composite suspicion and ring risk scoring.
    RiskScoring,
}

impl Domain {
    /// All available domains.
    pub const ALL: &'static [Domain] = &[
        Domain::GraphAnalytics,
        Domain::Compliance,
        Domain::RiskScoring,
    ];

    /// Returns the domain name as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Domain::GraphAnalytics => "GraphAnalytics",
            Domain::Compliance => "Compliance",
            Domain::RiskScoring => "RiskScoring",
        }
    }

    /// Parse a domain from a string.
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GraphAnalytics" => Some(Domain::GraphAnalytics),
            "Compliance" => Some(Domain::Compliance),
            "RiskScoring" => Some(Domain::RiskScoring),
            _ => None,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_all_count() {
        assert_eq!(Domain::ALL.len(), 3);
    }

    #[test]
    fn test_domain_from_str() {
        assert_eq!(Domain::from_str("Compliance"), Some(Domain::Compliance));
        assert_eq!(Domain::from_str("Banking"), None);
    }

    #[test]
    fn test_domain_display_round_trips() {
        for domain in Domain::ALL {
            assert_eq!(Domain::from_str(&domain.to_string()), Some(*domain));
        }
    }
}
