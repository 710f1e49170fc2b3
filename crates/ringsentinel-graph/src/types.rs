//! Transaction records and the aggregated transaction graph.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Input Records
// ============================================================================

/// A money transfer between two accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction identifier.
    pub transaction_id: String,
    /// Sending account.
    pub sender_id: String,
    /// Receiving account.
    pub receiver_id: String,
    /// Transferred amount (non-negative).
    pub amount: f64,
    /// Free-form timestamp; see [`parse_timestamp`] for accepted formats.
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl Transaction {
    /// Create a transaction without a timestamp.
    pub fn new(
        transaction_id: impl Into<String>,
        sender_id: impl Into<String>,
        receiver_id: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            sender_id: sender_id.into(),
            receiver_id: receiver_id.into(),
            amount,
            timestamp: None,
        }
    }

    /// Attach a timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Parsed instant, if the timestamp is present and valid.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_deref().and_then(parse_timestamp)
    }
}

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a ledger timestamp.
///
/// Accepts RFC 3339 (with offset), naive date-times in the common ledger
/// layouts and bare dates. Naive values are taken as UTC. Returns `None`
/// for blank or unrecognised input.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

// ============================================================================
// Derived Aggregates
// ============================================================================

/// One timestamped transaction touching an account.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    /// When the transaction happened.
    pub at: DateTime<Utc>,
    /// Transaction amount.
    pub amount: f64,
}

/// Aggregate of all transactions on one ordered `sender -> receiver` pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeAggregate {
    /// Sum of amounts.
    pub amount: f64,
    /// Number of transactions.
    pub count: u64,
}

/// Directed, aggregated transaction graph.
///
/// Accounts are interned to dense indices in order of first appearance;
/// that order is the iteration order every detector uses. Neighbour lists
/// are de-duplicated and keep discovery order.
#[derive(Debug, Clone, Default)]
pub struct TransactionGraph {
    accounts: Vec<String>,
    index: HashMap<String, usize>,
    out_neighbors: Vec<Vec<usize>>,
    in_neighbors: Vec<Vec<usize>>,
    tx_count: Vec<usize>,
    volume: Vec<f64>,
    time_series: Vec<Vec<TimePoint>>,
    edges: HashMap<(usize, usize), EdgeAggregate>,
    edge_order: Vec<(usize, usize)>,
}

impl TransactionGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from transactions in input order.
    #[must_use]
    pub fn build(transactions: &[Transaction]) -> Self {
        let mut graph = Self::new();
        let mut skipped = 0usize;
        for tx in transactions {
            if !graph.add_transaction(tx) {
                skipped += 1;
            }
        }
        if skipped > 0 {
            tracing::warn!(skipped, "skipped transactions without sender or receiver");
        }
        tracing::debug!(
            accounts = graph.node_count(),
            edges = graph.edge_count(),
            "transaction graph built"
        );
        graph
    }

    /// Add one transaction. Returns `false` (and changes nothing) when the
    /// sender or receiver is blank.
    pub fn add_transaction(&mut self, tx: &Transaction) -> bool {
        if tx.sender_id.trim().is_empty() || tx.receiver_id.trim().is_empty() {
            return false;
        }

        let amount = if tx.amount.is_finite() && tx.amount > 0.0 {
            tx.amount
        } else {
            0.0
        };

        let s = self.intern(&tx.sender_id);
        let r = self.intern(&tx.receiver_id);

        self.tx_count[s] += 1;
        self.tx_count[r] += 1;
        self.volume[s] += amount;
        self.volume[r] += amount;

        if !self.edges.contains_key(&(s, r)) {
            self.edge_order.push((s, r));
            self.out_neighbors[s].push(r);
            self.in_neighbors[r].push(s);
        }
        let edge = self.edges.entry((s, r)).or_default();
        edge.amount += amount;
        edge.count += 1;

        if let Some(at) = tx.instant() {
            let point = TimePoint { at, amount };
            self.time_series[s].push(point);
            self.time_series[r].push(point);
        }

        true
    }

    fn intern(&mut self, account: &str) -> usize {
        if let Some(&idx) = self.index.get(account) {
            return idx;
        }
        let idx = self.accounts.len();
        self.accounts.push(account.to_string());
        self.index.insert(account.to_string(), idx);
        self.out_neighbors.push(Vec::new());
        self.in_neighbors.push(Vec::new());
        self.tx_count.push(0);
        self.volume.push(0.0);
        self.time_series.push(Vec::new());
        idx
    }

    /// Number of distinct accounts.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.accounts.len()
    }

    /// Number of distinct ordered edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_order.len()
    }

    /// True if no transaction has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Account ids in first-appearance order.
    #[must_use]
    pub fn accounts(&self) -> &[String] {
        &self.accounts
    }

    /// Account id of a node.
    #[must_use]
    pub fn account_id(&self, node: usize) -> &str {
        &self.accounts[node]
    }

    /// Node index of an account id.
    #[must_use]
    pub fn index_of(&self, account: &str) -> Option<usize> {
        self.index.get(account).copied()
    }

    /// Distinct receivers of a node, in discovery order.
    #[must_use]
    pub fn out_neighbors(&self, node: usize) -> &[usize] {
        &self.out_neighbors[node]
    }

    /// Distinct senders to a node, in discovery order.
    #[must_use]
    pub fn in_neighbors(&self, node: usize) -> &[usize] {
        &self.in_neighbors[node]
    }

    /// Distinct out-degree.
    #[must_use]
    pub fn out_degree(&self, node: usize) -> usize {
        self.out_neighbors[node].len()
    }

    /// Distinct in-degree.
    #[must_use]
    pub fn in_degree(&self, node: usize) -> usize {
        self.in_neighbors[node].len()
    }

    /// Transactions touching a node (a self-transfer counts twice).
    #[must_use]
    pub fn tx_count(&self, node: usize) -> usize {
        self.tx_count[node]
    }

    /// Cumulative volume sent and received.
    #[must_use]
    pub fn volume(&self, node: usize) -> f64 {
        self.volume[node]
    }

    /// Timestamped transactions touching a node, in input order.
    #[must_use]
    pub fn time_series(&self, node: usize) -> &[TimePoint] {
        &self.time_series[node]
    }

    /// Aggregate for an ordered pair, if any transaction exists on it.
    #[must_use]
    pub fn edge(&self, sender: usize, receiver: usize) -> Option<&EdgeAggregate> {
        self.edges.get(&(sender, receiver))
    }

    /// All edges in creation order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, &EdgeAggregate)> + '_ {
        self.edge_order
            .iter()
            .map(move |&(s, r)| (s, r, &self.edges[&(s, r)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: &str, s: &str, r: &str, amount: f64) -> Transaction {
        Transaction::new(id, s, r, amount)
    }

    #[test]
    fn test_build_aggregates() {
        let graph = TransactionGraph::build(&[
            tx("T1", "A", "B", 100.0),
            tx("T2", "A", "B", 50.0),
            tx("T3", "B", "C", 25.0),
        ]);

        assert_eq!(graph.accounts(), &["A", "B", "C"]);
        let (a, b, c) = (0, 1, 2);
        assert_eq!(graph.tx_count(a), 2);
        assert_eq!(graph.tx_count(b), 3);
        assert_eq!(graph.tx_count(c), 1);
        assert_eq!(graph.volume(b), 175.0);

        // Parallel transactions collapse into one adjacency entry and one edge.
        assert_eq!(graph.out_neighbors(a), &[b]);
        assert_eq!(graph.in_neighbors(b), &[a]);
        assert_eq!(graph.edge_count(), 2);
        let edge = graph.edge(a, b).unwrap();
        assert_eq!(edge.amount, 150.0);
        assert_eq!(edge.count, 2);
        assert!(graph.edge(b, a).is_none());
        assert_eq!(graph.index_of("C"), Some(c));
    }

    #[test]
    fn test_neighbor_discovery_order() {
        let graph = TransactionGraph::build(&[
            tx("T1", "HUB", "Z", 1.0),
            tx("T2", "HUB", "A", 1.0),
            tx("T3", "HUB", "M", 1.0),
            tx("T4", "HUB", "A", 1.0),
        ]);
        let hub = graph.index_of("HUB").unwrap();
        let names: Vec<&str> = graph
            .out_neighbors(hub)
            .iter()
            .map(|&n| graph.account_id(n))
            .collect();
        assert_eq!(names, vec!["Z", "A", "M"]);
    }

    #[test]
    fn test_time_series_skips_bad_timestamps() {
        let graph = TransactionGraph::build(&[
            tx("T1", "A", "B", 10.0).with_timestamp("2024-06-15 12:00:00"),
            tx("T2", "A", "B", 20.0).with_timestamp("not a date"),
            tx("T3", "B", "A", 30.0),
            tx("T4", "B", "A", 40.0).with_timestamp("2024-06-14T08:30:00Z"),
        ]);

        let a = graph.index_of("A").unwrap();
        let series = graph.time_series(a);
        assert_eq!(series.len(), 2);
        // Input order, not chronological order.
        assert_eq!(series[0].amount, 10.0);
        assert_eq!(series[1].amount, 40.0);
        assert!(series[1].at < series[0].at);
        assert_eq!(graph.tx_count(a), 4);
    }

    #[test]
    fn test_blank_endpoints_skipped() {
        let mut graph = TransactionGraph::new();
        assert!(!graph.add_transaction(&tx("T1", "", "B", 10.0)));
        assert!(!graph.add_transaction(&tx("T2", "A", "  ", 10.0)));
        assert!(graph.is_empty());
        assert!(graph.add_transaction(&tx("T3", "A", "B", 10.0)));
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_invalid_amounts_count_as_zero() {
        let graph = TransactionGraph::build(&[
            tx("T1", "A", "B", -5.0),
            tx("T2", "A", "B", f64::NAN),
        ]);
        assert_eq!(graph.volume(0), 0.0);
        assert_eq!(graph.edge(0, 1).unwrap().count, 2);
    }

    #[test]
    fn test_self_transfer() {
        let graph = TransactionGraph::build(&[tx("T1", "A", "A", 5.0)]);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.tx_count(0), 2);
        assert_eq!(graph.volume(0), 10.0);
        assert_eq!(graph.out_neighbors(0), &[0]);
        assert_eq!(graph.in_neighbors(0), &[0]);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = parse_timestamp("2024-06-15T12:00:00Z").unwrap();
        assert_eq!(parse_timestamp("2024-06-15 12:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-06-15T12:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024/06/15 12:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-06-15 12:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-06-15T14:00:00+02:00"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-06-15 12:00:00.250").map(|t| t.timestamp_millis()),
            Some(expected.timestamp_millis() + 250)
        );
        assert!(parse_timestamp("2024-06-15").is_some());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("   ").is_none());
        assert!(parse_timestamp("15/06/2024").is_none());
        assert!(parse_timestamp("2024-13-40 99:00:00").is_none());
    }
}
