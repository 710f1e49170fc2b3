//! Benchmark suite for RingSentinel
//!
//! Run with: `cargo bench --package ringsentinel`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ringsentinel::prelude::*;

/// Synthetic ledger with background traffic and planted rings.
fn create_ledger(account_count: usize, tx_count: usize) -> Vec<Transaction> {
    let mut seed: u64 = 0x5eed;
    let mut next = move || {
        seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        seed >> 33
    };

    let mut txs: Vec<Transaction> = (0..tx_count)
        .map(|i| {
            let s = next() as usize % account_count;
            let r = (s + 1 + next() as usize % 7) % account_count;
            let minute = next() % (60 * 24 * 30);
            Transaction::new(
                format!("TX{:07}", i),
                format!("ACC_{:05}", s),
                format!("ACC_{:05}", r),
                (next() % 10_000) as f64,
            )
            .with_timestamp(format!(
                "2024-04-{:02} {:02}:{:02}:00",
                1 + minute / (60 * 24),
                (minute / 60) % 24,
                minute % 60
            ))
        })
        .collect();

    // One planted cycle, fan and shell chain per 100 accounts.
    for k in 0..(account_count / 100).max(1) {
        for (i, (s, r)) in [("A", "B"), ("B", "C"), ("C", "A")].iter().enumerate() {
            txs.push(Transaction::new(
                format!("CY{}_{}", k, i),
                format!("CYC{}_{}", k, s),
                format!("CYC{}_{}", k, r),
                9_000.0,
            ));
        }
        for i in 0..12 {
            txs.push(Transaction::new(
                format!("FN{}_{}", k, i),
                format!("MULE{}_{}", k, i),
                format!("COLLECT{}", k),
                900.0,
            ));
        }
        for (i, (s, r)) in [("1", "2"), ("2", "3"), ("3", "4")].iter().enumerate() {
            txs.push(Transaction::new(
                format!("SH{}_{}", k, i),
                format!("SHELL{}_{}", k, s),
                format!("SHELL{}_{}", k, r),
                4_000.0,
            ));
        }
    }

    txs
}

fn graph_build_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph/build");

    for size in [1_000, 10_000, 50_000].iter() {
        let txs = create_ledger(size / 10, *size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("transactions", size), size, |b, _| {
            b.iter(|| TransactionGraph::build(black_box(&txs)))
        });
    }

    group.finish();
}

fn cycle_search_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph/bounded-cycles");

    for size in [1_000, 10_000].iter() {
        let txs = create_ledger(size / 10, *size);
        let graph = TransactionGraph::build(&txs);
        let merchants = MerchantSet::none(graph.node_count());
        group.throughput(Throughput::Elements(graph.node_count() as u64));
        group.bench_with_input(BenchmarkId::new("transactions", size), size, |b, _| {
            b.iter(|| BoundedCycleSearch::compute(black_box(&graph), black_box(&merchants)))
        });
    }

    group.finish();
}

fn ring_detection_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("aml/ring-detection");
    let config = DetectionConfig::default();

    for size in [1_000, 10_000, 50_000].iter() {
        let txs = create_ledger(size / 10, *size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("transactions", size), size, |b, _| {
            b.iter(|| RingDetection::compute(black_box(&txs), black_box(&config)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    graph_build_benchmark,
    cycle_search_benchmark,
    ring_detection_benchmark
);
criterion_main!(benches);
