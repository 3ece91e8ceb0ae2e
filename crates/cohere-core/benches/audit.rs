use std::hint::black_box;

use cohere_core::{AuditorConfig, AuditorSession, CoherenceTracker, Complex, lexical_profile};
use criterion::{Criterion, criterion_group, criterion_main};

const INTENT: &str = "Synchronizing Universal Frequency";

fn bench_process_intent(c: &mut Criterion) {
    let mut session = AuditorSession::seeded(AuditorConfig::default(), 42).unwrap();
    c.bench_function("process_intent", |b| {
        b.iter(|| session.process_intent(black_box(INTENT)))
    });
}

fn bench_lexical_profile(c: &mut Criterion) {
    let long = INTENT.repeat(64);
    c.bench_function("lexical_profile_2k", |b| {
        b.iter(|| lexical_profile(black_box(&long)))
    });
}

fn bench_tracker_dimensions(c: &mut Criterion) {
    let mut group = c.benchmark_group("mix_and_correct");
    for dim in [2usize, 4, 8] {
        let mut ideal = vec![Complex::ZERO; dim];
        ideal[0] = Complex::ONE;
        let mut tracker = CoherenceTracker::new(&ideal).unwrap();
        group.bench_function(format!("dim_{dim}"), |b| {
            b.iter(|| {
                tracker.mix_noise(black_box(0.19));
                tracker.correct()
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_process_intent,
    bench_lexical_profile,
    bench_tracker_dimensions
);
criterion_main!(benches);
