//! Criterion benchmarks for hp-fold.
//!
//! Measures fitness evaluation, the two tail-reattaching operators, and
//! whole-generation production on benchmark sequences of increasing length.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hp_fold::fold::operators::{crossover, mutate};
use hp_fold::fold::{compute_fitness, AcidSequence, Chromosome, FoldConfig, Generation};
use hp_fold::lattice::MOVES;
use hp_fold::random::create_rng;

const SEQUENCES: [&str; 3] = [
    "hphpphhphpphphhpphph",
    "hhpphpphpphpphpphpphpphh",
    "pphpphhpppphhpppphhpppphh",
];

// ===========================================================================
// Fitness
// ===========================================================================

fn bench_fitness(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_fitness");
    let mut rng = create_rng(42);
    for acids in SEQUENCES {
        let sequence = AcidSequence::parse(acids).unwrap();
        let chromosome = Chromosome::random(&sequence, &MOVES, &mut rng);
        group.bench_with_input(
            BenchmarkId::from_parameter(sequence.len()),
            &chromosome,
            |b, c| b.iter(|| compute_fitness(black_box(c.acids().as_slice()), black_box(c.walk()))),
        );
    }
    group.finish();
}

// ===========================================================================
// Operators
// ===========================================================================

fn bench_operators(c: &mut Criterion) {
    let mut group = c.benchmark_group("operators");
    let mut rng = create_rng(42);
    for acids in SEQUENCES {
        let sequence = AcidSequence::parse(acids).unwrap();
        let left = Chromosome::random(&sequence, &MOVES, &mut rng);
        let right = Chromosome::random(&sequence, &MOVES, &mut rng);
        let pivot = sequence.len() / 2;

        group.bench_with_input(
            BenchmarkId::new("crossover", sequence.len()),
            &(left.clone(), right),
            |b, (l, r)| {
                let mut rng = create_rng(1);
                b.iter(|| black_box(crossover(l, r, pivot, &MOVES, &mut rng)))
            },
        );
        group.bench_with_input(
            BenchmarkId::new("mutate", sequence.len()),
            &left,
            |b, l| {
                let mut rng = create_rng(1);
                b.iter(|| black_box(mutate(l, pivot, &MOVES, &mut rng)))
            },
        );
    }
    group.finish();
}

// ===========================================================================
// Generations
// ===========================================================================

fn bench_produce_next(c: &mut Criterion) {
    let mut group = c.benchmark_group("produce_next");
    group.sample_size(10);
    for acids in SEQUENCES {
        let sequence = AcidSequence::parse(acids).unwrap();
        let config = FoldConfig::classic().with_parallel(false);
        let generation = Generation::random(&sequence, &config, &mut create_rng(42));
        group.bench_with_input(
            BenchmarkId::from_parameter(sequence.len()),
            &(generation, config),
            |b, (g, c)| {
                let mut rng = create_rng(7);
                b.iter(|| black_box(g.produce_next(black_box(c), false, &mut rng)))
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_fitness, bench_operators, bench_produce_next);
criterion_main!(benches);
