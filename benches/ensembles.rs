use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use kinsim::{
    models, sample_ensemble, sample_ensemble_batched, sample_ensemble_seq, StreamKey, DEFAULT_SEED,
};

const REALIZATIONS: usize = 64;
const HORIZON: f64 = 5.0;

fn criterion_benchmark(c: &mut Criterion) {
    let network = models::lv();
    let stepper = network.step_gillespie();

    c.bench_function("lv ensemble parallel", |b| {
        b.iter(|| {
            let key = StreamKey::new(black_box(DEFAULT_SEED));
            sample_ensemble(key, REALIZATIONS, network.x0.view(), 0., HORIZON, &stepper).unwrap()
        })
    });

    c.bench_function("lv ensemble sequential", |b| {
        b.iter(|| {
            let key = StreamKey::new(black_box(DEFAULT_SEED));
            sample_ensemble_seq(key, REALIZATIONS, network.x0.view(), 0., HORIZON, &stepper)
                .unwrap()
        })
    });

    c.bench_function("lv ensemble batched", |b| {
        b.iter(|| {
            let key = StreamKey::new(black_box(DEFAULT_SEED));
            sample_ensemble_batched(
                key,
                REALIZATIONS,
                network.x0.view(),
                0.,
                HORIZON,
                &stepper,
                8,
            )
            .unwrap()
        })
    });
}

criterion_group! {
    name=benches; config=Criterion::default().sample_size(10); targets=criterion_benchmark
}
criterion_main!(benches);
