use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use fight_stats::accumulator::{fold_records, fold_records_par};
use fight_stats::fight_dataset::{MatchRecord, SideCounters};
use fight_stats::shrinkage::ShrinkageConfig;
use fight_stats::stats_dict::build_stats_dict;

fn side(name: &str, seed: usize) -> SideCounters {
    let base = (seed % 13) as f64;
    SideCounters {
        name: name.to_string(),
        height: Some(64.0 + base),
        reach: Some(66.0 + base),
        age: Some(22.0 + (seed % 15) as f64),
        weight: Some(125.0 + 10.0 * (seed % 5) as f64),
        sig_strikes_landed: Some(20.0 + 3.0 * base),
        sig_strikes_attempted: Some(60.0 + 4.0 * base),
        takedowns_landed: Some((seed % 4) as f64),
        takedowns_attempted: Some((seed % 5) as f64),
        submission_attempts: Some((seed % 3) as f64),
        fight_minutes: Some(9.0 + 3.0 * (seed % 3) as f64),
    }
}

fn synthetic_records(n: usize) -> Vec<MatchRecord> {
    let classes = ["Flyweight", "Bantamweight", "Lightweight", "Welterweight"];
    (0..n)
        .map(|i| {
            let class = classes[i % classes.len()];
            MatchRecord {
                weight_class: class.to_string(),
                fighter_a: side(&format!("A{}", i % 97), i),
                fighter_b: side(&format!("B{}", i % 89), i + 7),
            }
        })
        .collect()
}

fn bench_fold(c: &mut Criterion) {
    let records = synthetic_records(4000);
    c.bench_function("fold_records", |b| {
        b.iter(|| {
            let acc = fold_records(black_box(&records));
            black_box(acc.fighter_count());
        })
    });
}

fn bench_fold_par(c: &mut Criterion) {
    let records = synthetic_records(4000);
    c.bench_function("fold_records_par", |b| {
        b.iter(|| {
            let acc = fold_records_par(black_box(&records));
            black_box(acc.fighter_count());
        })
    });
}

fn bench_build_dict(c: &mut Criterion) {
    let acc = fold_records(&synthetic_records(4000));
    c.bench_function("build_stats_dict", |b| {
        b.iter(|| {
            let dict = build_stats_dict(black_box(&acc), ShrinkageConfig::default());
            black_box(dict.len());
        })
    });
}

criterion_group!(perf, bench_fold, bench_fold_par, bench_build_dict);
criterion_main!(perf);
