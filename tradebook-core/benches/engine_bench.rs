//! Criterion benchmarks for Tradebook hot paths.
//!
//! Benchmarks:
//! 1. Accounting fold over a synthetic trade log
//! 2. Aggregators over the resulting ledger

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tradebook_core::aggregate::{distribute_by_type, hit_by_symbol, summarize_months};
use tradebook_core::domain::{Action, Outcome, TradeRecord};
use tradebook_core::engine::AccountingEngine;

// ── Helpers ──────────────────────────────────────────────────────────

fn make_trades(n: usize) -> Vec<TradeRecord> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    let symbols = ["AAPL", "MSFT", "TSLA", "NVDA"];
    let types = ["breakout", "reversal", "pullback"];
    (0..n)
        .map(|i| {
            let buy = 50.0 + (i as f64 * 0.1).sin() * 10.0;
            TradeRecord {
                row: i,
                date: base_date + chrono::Duration::days((i / 3) as i64),
                action: if i % 2 == 0 { Action::Buy } else { Action::Sell },
                outcome: if i % 5 < 3 { Outcome::Profit } else { Outcome::Loss },
                buy_point: buy,
                take_profit: buy * 1.04,
                stop_loss: buy * 0.98,
                symbol: symbols[i % symbols.len()].to_string(),
                trade_type: types[i % types.len()].to_string(),
                fields: vec![],
            }
        })
        .collect()
}

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_accounting(c: &mut Criterion) {
    let mut group = c.benchmark_group("accounting");
    let engine = AccountingEngine::default();
    for n in [1_000usize, 10_000, 100_000] {
        let trades = make_trades(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &trades, |b, trades| {
            b.iter(|| engine.run(black_box(trades)).unwrap())
        });
    }
    group.finish();
}

fn bench_aggregates(c: &mut Criterion) {
    let ledger = AccountingEngine::default()
        .run(&make_trades(50_000))
        .unwrap();
    let mut group = c.benchmark_group("aggregates");
    group.bench_function("monthly", |b| b.iter(|| summarize_months(black_box(&ledger))));
    group.bench_function("types", |b| b.iter(|| distribute_by_type(black_box(&ledger))));
    group.bench_function("symbols", |b| b.iter(|| hit_by_symbol(black_box(&ledger))));
    group.finish();
}

criterion_group!(benches, bench_accounting, bench_aggregates);
criterion_main!(benches);
