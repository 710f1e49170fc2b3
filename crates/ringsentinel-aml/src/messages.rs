//! Batch kernel input/output messages.

use crate::types::AnalysisResult;
use ringsentinel_graph::types::Transaction;
use serde::{Deserialize, Serialize};

/// Ring detection input for batch execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisInput {
    /// Transactions to analyze, in ledger order.
    pub transactions: Vec<Transaction>,
}

impl AnalysisInput {
    /// Create a new ring detection input.
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }
}

/// Ring detection output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutput {
    /// The analysis result.
    pub result: AnalysisResult,
    /// Computation time in microseconds.
    pub compute_time_us: u64,
}
