use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use adplan_forecast::{
    AggregateIndex, FillRateRow, ForecastEngine, ForecastRequest, InMemoryTables, InventoryRow,
    TargetingCriteria,
};

const DIMENSIONS: [&str; 4] = ["network", "zip", "genre", "device"];

/// Synthetic tables with `values_per_dimension` rows per dimension.
fn tables(values_per_dimension: usize) -> InMemoryTables {
    let mut fill = Vec::with_capacity(DIMENSIONS.len() * values_per_dimension);
    let mut inventory = Vec::with_capacity(DIMENSIONS.len() * values_per_dimension);
    for dimension in DIMENSIONS {
        for i in 0..values_per_dimension {
            let key = format!("{dimension}:v{i}");
            // Deterministic spread of rates and volumes.
            let rate = ((i * 37) % 100) as f64 / 100.0;
            fill.push(FillRateRow::new(key.clone(), (i as u64 % 500) + 1, rate));
            inventory.push(InventoryRow::new(key, 10_000 + (i as u64 * 7_919) % 1_000_000));
        }
    }
    InMemoryTables::new(fill, inventory)
}

fn bench_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_build");
    for size in [100usize, 1_000, 10_000] {
        let source = tables(size);
        group.throughput(Throughput::Elements((size * DIMENSIONS.len()) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &source, |b, source| {
            b.iter(|| AggregateIndex::load(black_box(source)))
        });
    }
    group.finish();
}

fn bench_forecast(c: &mut Criterion) {
    let engine = ForecastEngine::with_default_config(Arc::new(AggregateIndex::load(&tables(1_000))));

    let mut group = c.benchmark_group("forecast");
    for weeks in [1u32, 4, 52] {
        let criteria = TargetingCriteria::new()
            .with("network", ["v1", "v2", "v3"])
            .with("zip", ["v10", "v11"])
            .with("genre", Vec::<String>::new());
        let request = ForecastRequest::new(250_000.0, weeks, criteria).unwrap();
        group.bench_with_input(BenchmarkId::new("weeks", weeks), &request, |b, request| {
            b.iter(|| engine.forecast(black_box(request)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_index_build, bench_forecast);
criterion_main!(benches);
