use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use resoscan::analysis::{Analysis, AnalysisConfig};
use resoscan::events::synthetic::{generate, SyntheticConfig};
use resoscan::resolution::{extract_with, PositionLookup, Quantity};

/// Benchmark muon resolution extraction with both position lookups
fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");

    for hadrons_mean in [8.0, 40.0] {
        let events = generate(&SyntheticConfig {
            events: 500,
            hadrons_mean,
            ..SyntheticConfig::default()
        })
        .unwrap();
        let prepared: Vec<_> = events
            .iter()
            .map(|event| (event, event.association_index(), event.muon_candidates()))
            .collect();
        let particles: usize = events.iter().map(|e| e.reco.len()).sum();
        group.throughput(Throughput::Elements(particles as u64));

        for lookup in [PositionLookup::LinearScan, PositionLookup::Hashed] {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", lookup), format!("{}hadrons", hadrons_mean)),
                &lookup,
                |b, &lookup| {
                    b.iter(|| {
                        for (event, index, muons) in &prepared {
                            let values = extract_with(
                                lookup,
                                muons,
                                &event.reco,
                                index,
                                &event.truth,
                                Quantity::Pt,
                            );
                            black_box(values);
                        }
                    });
                },
            );
        }
    }

    group.finish();
}

/// Benchmark the per-event histogram filling
fn bench_analysis(c: &mut Criterion) {
    let events = generate(&SyntheticConfig {
        events: 500,
        ..SyntheticConfig::default()
    })
    .unwrap();

    c.bench_function("analysis_500_events", |b| {
        b.iter(|| {
            let mut analysis = Analysis::new(AnalysisConfig::default()).unwrap();
            for event in &events {
                analysis.process_event(black_box(event));
            }
            black_box(analysis.finish());
        });
    });
}

criterion_group!(benches, bench_extract, bench_analysis);
criterion_main!(benches);
