use chrono::NaiveDate;
use criterion::*;
use pairs_core::{EarningsPairs, FilingHistory, FilingRecord, Ticker, Universe};

// build a universe of `n` tickers, each with four quarterly filings a year from 2000, where
// filing dates drift a day or two between tickers
#[inline]
fn synthetic_universe(n: usize) -> Universe {
    (0..n)
        .map(|t| {
            let history: FilingHistory = (2000..2024)
                .flat_map(|year| {
                    [2u32, 5, 8, 11].into_iter().enumerate().map(move |(q, month)| {
                        let day = 10 + ((t + q + year as usize) % 3) as u32;
                        let change = if (t * 7 + q + year as usize) % 4 == 0 {
                            None
                        } else {
                            Some(((t + q) as f64 - 1.5) * 0.75)
                        };
                        FilingRecord::new(
                            NaiveDate::from_ymd_opt(year, month, day).expect("valid date"),
                            change,
                        )
                    })
                })
                .collect();
            Ticker::new(format!("T{t:03}"), history)
        })
        .collect()
}

// generate & compare pairs
// ----------------------------------------------------------
fn benchmark_compare_pairs(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare pairs");
    for n in [10, 50, 100] {
        let universe = synthetic_universe(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &universe, |b, universe| {
            b.iter(|| {
                let mut earnings_pairs =
                    EarningsPairs::new(black_box(universe)).expect("valid universe");
                earnings_pairs.generate_pairs().expect("pairs generated");
                earnings_pairs.compare_pairs()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_compare_pairs,);
criterion_main!(benches);
