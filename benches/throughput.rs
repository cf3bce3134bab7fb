//! Throughput benchmarks for the hyperstate machine
//!
//! Measures transition throughput, machine construction and the transition
//! matrix bank build across vector widths.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hyperstate::{HyperstateMachine, MachineConfig, StateLabel, TransitionMatrixBank};
use std::time::Duration;

const DIMENSIONS: [usize; 4] = [16, 64, 128, 256];

/// Benchmark unforced transitions at several widths
fn bench_transition_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("transition_throughput");

    for dims in DIMENSIONS.iter() {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(dims), dims, |b, &dims| {
            let mut machine =
                HyperstateMachine::new(MachineConfig::new(dims, 7, 3).with_seed(42)).unwrap();
            b.iter(|| black_box(machine.transition(None).unwrap()));
        });
    }

    group.finish();
}

/// Benchmark forced transitions, which skip label sampling
fn bench_forced_transition(c: &mut Criterion) {
    let mut group = c.benchmark_group("forced_transition");
    let chain = [StateLabel::Entangled, StateLabel::Collapsed, StateLabel::Superposition];

    group.bench_function("chain_64", |b| {
        let mut machine =
            HyperstateMachine::new(MachineConfig::new(64, 3, 3).with_seed(42)).unwrap();
        let mut next = 0;
        b.iter(|| {
            let label = chain[next % chain.len()];
            next += 1;
            black_box(machine.transition(Some(label)).unwrap())
        });
    });

    group.finish();
}

/// Benchmark full machine construction
fn bench_initialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("initialization");
    group.measurement_time(Duration::from_secs(10));

    for dims in DIMENSIONS.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(dims), dims, |b, &dims| {
            b.iter(|| {
                black_box(
                    HyperstateMachine::new(MachineConfig::new(dims, 7, 3).with_seed(1)).unwrap(),
                )
            });
        });
    }

    group.finish();
}

/// Benchmark the transition matrix bank alone as the label count grows
fn bench_matrix_bank(c: &mut Criterion) {
    let mut group = c.benchmark_group("matrix_bank");

    for states in [3usize, 7, 15].iter() {
        group.throughput(Throughput::Elements((states * (states - 1)) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(states), states, |b, &states| {
            b.iter(|| {
                black_box(TransitionMatrixBank::build(
                    StateLabel::active_prefix(states),
                    64,
                    1.0,
                    true,
                ))
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_transition_throughput,
    bench_forced_transition,
    bench_initialization,
    bench_matrix_bank
);

criterion_main!(benches);
