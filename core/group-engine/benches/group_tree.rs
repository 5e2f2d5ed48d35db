//! Criterion benchmarks for grouping and flattening list items.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use engine::Record;
use group_engine::{build_group_tree, flatten, RenderOptions, ViewField};

const RECORD_COUNTS: &[usize] = &[100, 1_000, 5_000];

fn create_records(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| {
            Record::new()
                .with("Region", format!("Region {}", i % 7))
                .with("Category", format!("Category {}", i % 31))
                .with("Owner", format!("Owner {}", i % 113))
                .with("Amount", (i % 50) as f64)
                .with("Credit", (i % 3) as f64)
        })
        .collect()
}

fn benchmark_build_group_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_group_tree");

    for &count in RECORD_COUNTS {
        let records = create_records(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &records, |b, records| {
            b.iter(|| black_box(build_group_tree(records, &["Region", "Category", "Owner"])));
        });
    }
    group.finish();
}

fn benchmark_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten");
    let options = RenderOptions::default();
    let fields = vec![
        ViewField::new("Owner", "Owner"),
        ViewField::new("Amount", "Amount"),
        ViewField::new("Credit", "Credit"),
    ];

    for &count in RECORD_COUNTS {
        let tree = build_group_tree(&create_records(count), &["Region", "Category"]);
        group.bench_with_input(BenchmarkId::from_parameter(count), &tree, |b, tree| {
            b.iter(|| black_box(flatten(tree, 0, &fields, &options)));
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_build_group_tree, benchmark_flatten);
criterion_main!(benches);
