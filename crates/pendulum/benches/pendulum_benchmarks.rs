//! Benchmarks for the pendulum integrator.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pendulum::{Motion, Simulation, SimulationParameters, TIME_STEP, derivatives, rk4_step};

fn benchmark_derivatives(c: &mut Criterion) {
    let params = SimulationParameters::default();
    let y = Motion::at_rest(&params).to_vector();

    c.bench_function("derivatives", |b| {
        b.iter(|| black_box(derivatives(black_box(&y), &params)));
    });
}

fn benchmark_rk4_step(c: &mut Criterion) {
    let params = SimulationParameters::default();
    let motion = Motion::at_rest(&params);

    c.bench_function("rk4_step", |b| {
        b.iter(|| black_box(rk4_step(black_box(motion), &params, TIME_STEP)));
    });
}

fn benchmark_broadcast_interval(c: &mut Criterion) {
    // Sub-step counts for one 16 ms broadcast at various speed multipliers
    let mut group = c.benchmark_group("advance_per_broadcast");
    for steps in [1u64, 16, 160] {
        group.bench_with_input(BenchmarkId::from_parameter(steps), &steps, |b, &steps| {
            let mut sim = Simulation::default();
            b.iter(|| {
                sim.advance(steps);
                black_box(sim.snapshot())
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_derivatives,
    benchmark_rk4_step,
    benchmark_broadcast_interval
);
criterion_main!(benches);
