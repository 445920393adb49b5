//! Benchmarks for filtering and the view transforms
//!
//! Run with: cargo bench

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use flowscope::filter::{apply, FilterPredicate, FilterSelectors, Selection};
use flowscope::store::FlowStore;
use flowscope::types::{FlowRecord, GroupField, HourBucket, MetricField, Subnet, WorkingHourGroup};
use flowscope::views::{box_plot, heatmap, histogram, polar, scatter, sunburst};

/// Deterministic store with metrics spread across every label band.
fn store_of(size: u64) -> FlowStore {
    let base = NaiveDate::from_ymd_opt(2020, 12, 1).unwrap_or_default();
    let bands = [400u64, 3_000, 20_000, 60_000, 150_000];
    let records = (0..size)
        .map(|i| {
            FlowRecord::new(
                base + chrono::Days::new(i % 14),
                HourBucket::all()[(i % 6) as usize],
                format!("10.{}.{}.{}", i % 4, (i / 4) % 200, 1 + i % 250),
            )
            .with_flows(1 + i % 40)
            .with_bytes(bands[(i % 5) as usize] + i % 100)
            .with_packets(5 + (i * 7) % 500)
            .with_flow_duration(60 + (i * 11) % 3_000)
            .with_communications(1 + i % 8)
            .with_country(i % 30)
            .with_k(2 + (i % 5) as u8)
            .with_working_hours(WorkingHourGroup::all()[(i % 3) as usize])
            .with_subnet(Subnet((i % 4) as u8))
        })
        .collect();
    FlowStore::new(records)
}

fn typical_selectors() -> FilterSelectors {
    FilterSelectors {
        start_date: NaiveDate::from_ymd_opt(2020, 12, 2),
        end_date: NaiveDate::from_ymd_opt(2020, 12, 12),
        labels: Selection::Many(vec![1, 2, 3]),
        working_hours: Selection::One("all".to_string()),
    }
}

fn bench_normalize(c: &mut Criterion) {
    let selectors = typical_selectors();
    c.bench_function("normalize_selectors", |b| {
        b.iter(|| FilterPredicate::normalize(black_box(&selectors)).unwrap());
    });
}

fn bench_filter_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_apply");
    let predicate = FilterPredicate::normalize(&typical_selectors()).unwrap();

    for size in [1_000u64, 10_000, 100_000].iter() {
        let store = store_of(*size);
        group.throughput(Throughput::Elements(*size));
        group.bench_with_input(BenchmarkId::new("apply", size), &store, |b, store| {
            b.iter(|| black_box(apply(&predicate, store)));
        });
    }

    group.finish();
}

fn bench_view_transforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("view_transforms");

    let store = store_of(10_000);
    let subset = apply(&FilterPredicate::unrestricted(), &store);
    group.throughput(Throughput::Elements(subset.len() as u64));

    group.bench_function("box", |b| {
        b.iter(|| black_box(box_plot::compute(&subset, GroupField::K, MetricField::Bytes)));
    });
    group.bench_function("sunburst", |b| {
        b.iter(|| black_box(sunburst::compute(&subset, MetricField::Bytes)));
    });
    group.bench_function("scatter", |b| {
        b.iter(|| {
            black_box(scatter::compute(
                &subset,
                MetricField::Flows,
                MetricField::Packets,
            ))
        });
    });
    group.bench_function("heatmap", |b| {
        b.iter(|| black_box(heatmap::compute(&subset)));
    });
    group.bench_function("polar", |b| {
        b.iter(|| black_box(polar::compute(&subset, MetricField::Bytes)));
    });
    group.bench_function("histogram", |b| {
        b.iter(|| black_box(histogram::compute(&subset, MetricField::Bytes)));
    });

    group.finish();
}

fn bench_chart_serialization(c: &mut Criterion) {
    let store = store_of(10_000);
    let subset = apply(&FilterPredicate::unrestricted(), &store);
    let spec = scatter::compute(&subset, MetricField::Flows, MetricField::Packets);

    c.bench_function("scatter_spec_to_json", |b| {
        b.iter(|| black_box(spec.to_json().unwrap()));
    });
}

criterion_group!(
    benches,
    bench_normalize,
    bench_filter_apply,
    bench_view_transforms,
    bench_chart_serialization,
);

criterion_main!(benches);
