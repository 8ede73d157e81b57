//! Benchmarks for nested option mapping.

#![allow(clippy::unwrap_used)]

use criterion::{Criterion, criterion_group, criterion_main};
use homeboard_core::{OptionEntry, flatten_options, map_options};
use serde_json::{Map, Value, json};
use std::hint::black_box;

fn widget_options(width: usize) -> Map<String, Value> {
    let mut options = Map::new();
    for i in 0..width {
        options.insert(
            format!("group{i}"),
            json!({
                "enabled": true,
                "label": format!("Group {i}"),
                "limits": { "min": 0, "max": i, "steps": [1, 2, 5] },
            }),
        );
    }
    options
}

fn bench_map_options(c: &mut Criterion) {
    for width in [4, 64] {
        let entries: Vec<OptionEntry> = flatten_options(&widget_options(width)).unwrap();
        c.bench_function(&format!("map_options/{}_rows", entries.len()), |b| {
            b.iter(|| map_options(black_box(&entries)).unwrap())
        });
    }
}

fn bench_flatten_options(c: &mut Criterion) {
    let options = widget_options(64);
    c.bench_function("flatten_options/64_groups", |b| {
        b.iter(|| flatten_options(black_box(&options)).unwrap())
    });
}

criterion_group!(benches, bench_map_options, bench_flatten_options);
criterion_main!(benches);
