//! Populations of foldings.
//!
//! A [`Generation`] is built once, sorted best-first, indexed, and never
//! modified afterwards. The next generation is produced as a fresh value by
//! [`Generation::produce_next`]:
//!
//! 1. **Elites**: the top `elite_count` chromosomes are copied unchanged
//! 2. **Crossover pool**: roulette-selected pairs are crossed both ways at a
//!    random pivot; a pair is kept only when both children are valid
//! 3. **Random fill**: the remainder is filled with random foldings
//! 4. **Mutation**: `mutation_count` successful bends are applied to members
//!    of the crossover pool (two bends each under double-point mutation)

use super::config::FoldConfig;
use super::listener::GenerationReport;
use super::operators::{crossover, mutate};
use super::selection::select_pair;
use super::types::{AcidSequence, Chromosome};
use rand::Rng;
use std::collections::BTreeMap;
use std::ops::Range;
use tracing::trace;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Inclusive index range occupied by one fitness value in a sorted generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitnessRange {
    pub start: usize,
    pub end: usize,
}

impl FitnessRange {
    /// Number of chromosomes in the range.
    #[inline]
    pub fn count(&self) -> usize {
        self.end - self.start + 1
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        (self.start..=self.end).contains(&index)
    }
}

/// Maps each distinct fitness of a sorted generation to its index range.
///
/// `sum_of_fitnesses` adds every *distinct* value once. It is the width of
/// the roulette wheel, not a population total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FitnessIndex {
    ranges: BTreeMap<i32, FitnessRange>,
    sum_of_fitnesses: i64,
}

impl FitnessIndex {
    /// Builds the index from fitness values sorted ascending.
    pub fn from_sorted(fitnesses: &[i32]) -> Self {
        debug_assert!(fitnesses.windows(2).all(|w| w[0] <= w[1]));

        let mut index = Self::default();
        let mut start = 0;
        for chunk in fitnesses.chunk_by(|a, b| a == b) {
            let fitness = chunk[0];
            let end = start + chunk.len() - 1;
            index.ranges.insert(fitness, FitnessRange { start, end });
            index.sum_of_fitnesses += i64::from(fitness);
            start = end + 1;
        }
        index
    }

    /// The index range holding `fitness`, if present.
    pub fn range(&self, fitness: i32) -> Option<FitnessRange> {
        self.ranges.get(&fitness).copied()
    }

    /// Distinct fitness values, best (most negative) first.
    pub fn fitnesses(&self) -> impl Iterator<Item = i32> + '_ {
        self.ranges.keys().copied()
    }

    /// `(fitness, range)` pairs, best first.
    pub fn ranges(&self) -> impl Iterator<Item = (i32, FitnessRange)> + '_ {
        self.ranges.iter().map(|(&f, &r)| (f, r))
    }

    pub fn best_fitness(&self) -> Option<i32> {
        self.ranges.keys().next().copied()
    }

    pub fn sum_of_fitnesses(&self) -> i64 {
        self.sum_of_fitnesses
    }

    /// Number of distinct fitness values.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// One sorted, indexed population of foldings of a single acid sequence.
#[derive(Debug, Clone)]
pub struct Generation {
    acids: AcidSequence,
    chromosomes: Vec<Chromosome>,
    index: FitnessIndex,
}

impl Generation {
    /// Sorts `chromosomes` best-first and builds the fitness index.
    ///
    /// With `parallel` set and the `parallel` feature enabled the sort runs
    /// on the rayon pool. Both sorts are stable, so the order is identical.
    ///
    /// # Panics
    /// Panics if `chromosomes` is empty.
    pub fn from_chromosomes(
        acids: AcidSequence,
        mut chromosomes: Vec<Chromosome>,
        parallel: bool,
    ) -> Self {
        assert!(!chromosomes.is_empty(), "generation must not be empty");
        debug_assert!(chromosomes.iter().all(|c| c.acids() == &acids));

        sort_by_fitness(&mut chromosomes, parallel);
        let fitnesses: Vec<i32> = chromosomes.iter().map(Chromosome::fitness).collect();
        let index = FitnessIndex::from_sorted(&fitnesses);

        Self {
            acids,
            chromosomes,
            index,
        }
    }

    /// A generation of `config.population_size` random foldings.
    pub fn random<R: Rng>(acids: &AcidSequence, config: &FoldConfig, rng: &mut R) -> Self {
        let chromosomes = (0..config.population_size)
            .map(|_| Chromosome::random(acids, &config.moves, rng))
            .collect();
        Self::from_chromosomes(acids.clone(), chromosomes, config.parallel)
    }

    /// Builds the next generation from this one.
    ///
    /// `self` is left untouched. With `double_point` set every mutation bends
    /// the target twice, at two independent pivots; if either bend fails the
    /// attempt is discarded and retried.
    ///
    /// # Panics
    /// Panics if `config` leaves no room for a crossover pool, which
    /// [`FoldConfig::validate`] rejects.
    pub fn produce_next<R: Rng>(
        &self,
        config: &FoldConfig,
        double_point: bool,
        rng: &mut R,
    ) -> Generation {
        let population_size = config.population_size;
        let elite_count = config.elite_count().min(self.len());
        let crossover_end = elite_count + config.crossover_count();
        assert!(
            crossover_end > elite_count,
            "crossover pool must not be empty"
        );
        let last_pivot = self.acids.len() - 2;
        let moves = &config.moves;

        let mut next: Vec<Chromosome> = Vec::with_capacity(population_size);
        next.extend_from_slice(&self.chromosomes[..elite_count]);

        let mut failed_pairs = 0usize;
        while next.len() < crossover_end {
            let pair = select_pair(self, rng);
            let pivot = rng.random_range(1..=last_pivot);
            let left = crossover(pair.left, pair.right, pivot, moves, rng);
            let right = crossover(pair.right, pair.left, pivot, moves, rng);
            match (left, right) {
                (Some(left), Some(right)) => {
                    next.push(left);
                    if next.len() < crossover_end {
                        next.push(right);
                    }
                }
                _ => failed_pairs += 1,
            }
        }

        while next.len() < population_size {
            next.push(Chromosome::random(&self.acids, moves, rng));
        }

        let failed_mutations = apply_mutations(
            &mut next,
            elite_count..crossover_end,
            config,
            double_point,
            rng,
        );

        trace!(failed_pairs, failed_mutations, "generation assembled");

        Self::from_chromosomes(self.acids.clone(), next, config.parallel)
    }

    #[inline]
    pub fn acids(&self) -> &AcidSequence {
        &self.acids
    }

    /// The fittest chromosome.
    #[inline]
    pub fn best(&self) -> &Chromosome {
        &self.chromosomes[0]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    /// Always `false`: generations are never empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Chromosome> {
        self.chromosomes.get(index)
    }

    /// Members sorted best-first.
    pub fn chromosomes(&self) -> &[Chromosome] {
        &self.chromosomes
    }

    pub fn index(&self) -> &FitnessIndex {
        &self.index
    }

    pub fn sum_of_fitnesses(&self) -> i64 {
        self.index.sum_of_fitnesses()
    }

    /// Distinct fitness values present, best first.
    pub fn fitnesses(&self) -> impl Iterator<Item = i32> + '_ {
        self.index.fitnesses()
    }

    /// Number of members sharing the best fitness.
    pub fn count_at_best(&self) -> usize {
        self.index
            .range(self.best().fitness())
            .map_or(0, |r| r.count())
    }

    /// A uniformly chosen member with the given fitness.
    pub fn chromosome_with_fitness<R: Rng>(&self, fitness: i32, rng: &mut R) -> Option<&Chromosome> {
        let range = self.index.range(fitness)?;
        Some(&self.chromosomes[rng.random_range(range.start..=range.end)])
    }

    /// The progress line `"{best}: {count_at_best} / {population_size}"`.
    pub fn report_fittest_and_volume(&self) -> String {
        format!(
            "{}: {} / {}",
            self.best().fitness(),
            self.count_at_best(),
            self.len()
        )
    }

    /// Summary of this generation for listeners.
    pub fn report(&self, generation: usize, double_point_mutation: bool) -> GenerationReport {
        GenerationReport {
            generation,
            best_fitness: self.best().fitness(),
            count_at_best: self.count_at_best(),
            population_size: self.len(),
            distinct_fitnesses: self.index.len(),
            double_point_mutation,
        }
    }
}

/// Applies `config.mutation_count()` successful mutations to members drawn
/// uniformly from `pool`. Returns the number of failed attempts.
fn apply_mutations<R: Rng>(
    members: &mut [Chromosome],
    pool: Range<usize>,
    config: &FoldConfig,
    double_point: bool,
    rng: &mut R,
) -> usize {
    let moves = &config.moves;
    let mut failed = 0;
    let mut mutated = 0;
    while mutated < config.mutation_count() {
        let target = rng.random_range(pool.clone());
        let last_pivot = members[target].walk().len() - 2;
        let pivot = rng.random_range(1..=last_pivot);
        let mut result = mutate(&members[target], pivot, moves, rng);
        if double_point {
            result = result.and_then(|first| {
                let second_pivot = rng.random_range(1..=last_pivot);
                mutate(&first, second_pivot, moves, rng)
            });
        }
        match result {
            Some(m) => {
                members[target] = m;
                mutated += 1;
            }
            None => failed += 1,
        }
    }
    failed
}

fn sort_by_fitness(chromosomes: &mut [Chromosome], parallel: bool) {
    #[cfg(feature = "parallel")]
    if parallel {
        chromosomes.par_sort_by_key(Chromosome::fitness);
        return;
    }

    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    chromosomes.sort_by_key(Chromosome::fitness);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fold::types::{compute_fitness, is_self_avoiding};
    use crate::lattice::Point;
    use crate::random::create_rng;

    fn small_config() -> FoldConfig {
        FoldConfig::default()
            .with_population_size(60)
            .with_parallel(false)
    }

    fn assert_index_covers(generation: &Generation) {
        let mut expected_start = 0;
        for (fitness, range) in generation.index().ranges() {
            assert_eq!(range.start, expected_start, "gap or overlap before {fitness}");
            for i in range.start..=range.end {
                assert_eq!(generation.chromosomes()[i].fitness(), fitness);
            }
            expected_start = range.end + 1;
        }
        assert_eq!(expected_start, generation.len());
    }

    #[test]
    fn test_fitness_index_ranges() {
        let index = FitnessIndex::from_sorted(&[-3, -3, -2, 0, 0, 0]);
        assert_eq!(index.range(-3), Some(FitnessRange { start: 0, end: 1 }));
        assert_eq!(index.range(-2), Some(FitnessRange { start: 2, end: 2 }));
        assert_eq!(index.range(0), Some(FitnessRange { start: 3, end: 5 }));
        assert_eq!(index.range(-1), None);
        assert_eq!(index.sum_of_fitnesses(), -5);
        assert_eq!(index.fitnesses().collect::<Vec<_>>(), vec![-3, -2, 0]);
        assert_eq!(index.best_fitness(), Some(-3));
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_fitness_index_single_run() {
        let index = FitnessIndex::from_sorted(&[-1, -1, -1]);
        assert_eq!(index.range(-1), Some(FitnessRange { start: 0, end: 2 }));
        assert_eq!(index.range(-1).unwrap().count(), 3);
        assert_eq!(index.sum_of_fitnesses(), -1);
    }

    #[test]
    fn test_random_generation_sorted_and_indexed() {
        let acids = AcidSequence::parse("hphpphhphpphphhpphph").unwrap();
        let mut rng = create_rng(42);
        let generation = Generation::random(&acids, &small_config(), &mut rng);

        assert_eq!(generation.len(), 60);
        assert!(generation
            .chromosomes()
            .windows(2)
            .all(|w| w[0].fitness() <= w[1].fitness()));
        assert_index_covers(&generation);
        assert_eq!(
            generation.sum_of_fitnesses(),
            generation.fitnesses().map(i64::from).sum::<i64>()
        );
    }

    #[test]
    fn test_produce_next_preserves_invariants() {
        let acids = AcidSequence::parse("hhpphpphpphpphpphpphh").unwrap();
        let config = small_config();
        let mut rng = create_rng(7);
        let mut generation = Generation::random(&acids, &config, &mut rng);

        for step in 0..5 {
            let previous_best = generation.best().fitness();
            let elites: Vec<Chromosome> =
                generation.chromosomes()[..config.elite_count()].to_vec();

            let next = generation.produce_next(&config, step % 2 == 1, &mut rng);

            assert_eq!(next.len(), config.population_size);
            assert!(next.best().fitness() <= previous_best, "elitism violated");
            for elite in &elites {
                assert!(next.chromosomes().contains(elite), "elite lost");
            }
            for c in next.chromosomes() {
                assert_eq!(c.acids(), &acids);
                assert_eq!(c.walk()[0], Point::ORIGIN);
                assert_eq!(c.walk()[1], Point::new(1, 0));
                assert!(is_self_avoiding(c.walk()));
                assert_eq!(c.fitness(), compute_fitness(acids.as_slice(), c.walk()));
            }
            assert_index_covers(&next);
            generation = next;
        }
    }

    #[test]
    fn test_odd_crossover_quota_fills_exactly() {
        // 500 * (1 - 0.05 - 0.2) = 375 crossover children: odd.
        let acids = AcidSequence::parse("hpphhpph").unwrap();
        let config = FoldConfig::default().with_parallel(false);
        assert_eq!(config.crossover_count() % 2, 1);
        let mut rng = create_rng(3);
        let generation = Generation::random(&acids, &config, &mut rng);
        let next = generation.produce_next(&config, false, &mut rng);
        assert_eq!(next.len(), 500);
    }

    #[test]
    fn test_mutations_stay_in_crossover_pool() {
        let acids = AcidSequence::parse("hphpphhphpph").unwrap();
        let config = small_config().with_population_size(20).with_mutation_ratio(0.5);
        let mut rng = create_rng(17);
        let before: Vec<Chromosome> = (0..20)
            .map(|_| Chromosome::random(&acids, &config.moves, &mut rng))
            .collect();

        let mut members = before.clone();
        apply_mutations(&mut members, 5..15, &config, false, &mut rng);

        assert_eq!(&members[..5], &before[..5], "elite region mutated");
        assert_eq!(&members[15..], &before[15..], "random fill mutated");
        let changed = (5..15).filter(|&i| members[i] != before[i]).count();
        assert!(changed > 0, "no member of the pool was mutated");
        for m in &members[5..15] {
            assert!(is_self_avoiding(m.walk()));
        }
    }

    #[test]
    #[should_panic(expected = "crossover pool must not be empty")]
    fn test_produce_next_without_crossover_pool_panics() {
        let acids = AcidSequence::parse("hphpph").unwrap();
        let mut rng = create_rng(1);
        let generation = Generation::random(&acids, &small_config(), &mut rng);
        let config = small_config().with_elite_ratio(0.5).with_fill_ratio(0.5);
        generation.produce_next(&config, false, &mut rng);
    }

    #[test]
    fn test_chromosome_with_fitness_is_uniform_within_range() {
        // Four distinct all-polar foldings share fitness 0.
        let acids = AcidSequence::parse("pppp").unwrap();
        let walks = [
            [(0, 0), (1, 0), (2, 0), (3, 0)],
            [(0, 0), (1, 0), (2, 0), (2, 1)],
            [(0, 0), (1, 0), (1, 1), (0, 1)],
            [(0, 0), (1, 0), (1, -1), (2, -1)],
        ];
        let chromosomes = walks
            .iter()
            .map(|w| {
                let walk = w.iter().map(|&(x, y)| Point::new(x, y)).collect();
                Chromosome::from_walk(acids.clone(), walk).unwrap()
            })
            .collect();
        let generation = Generation::from_chromosomes(acids, chromosomes, false);
        assert_eq!(generation.index().range(0).unwrap().count(), 4);

        let mut rng = create_rng(42);
        let n = 40_000;
        let mut counts = [0u32; 4];
        for _ in 0..n {
            let picked = generation.chromosome_with_fitness(0, &mut rng).unwrap();
            let position = generation
                .chromosomes()
                .iter()
                .position(|c| std::ptr::eq(c, picked))
                .unwrap();
            counts[position] += 1;
        }
        for c in counts {
            let share = c as f64 / n as f64;
            assert!(
                (share - 0.25).abs() < 0.02,
                "pick share {share:.4} deviates from 0.25: counts {counts:?}"
            );
        }
    }

    #[test]
    fn test_chromosome_with_fitness() {
        let acids = AcidSequence::parse("hphpphhphpph").unwrap();
        let mut rng = create_rng(42);
        let generation = Generation::random(&acids, &small_config(), &mut rng);
        for f in generation.fitnesses().collect::<Vec<_>>() {
            let c = generation.chromosome_with_fitness(f, &mut rng).unwrap();
            assert_eq!(c.fitness(), f);
        }
        assert!(generation.chromosome_with_fitness(1, &mut rng).is_none());
    }

    #[test]
    fn test_report_line() {
        let acids = AcidSequence::parse("hphpphhphpph").unwrap();
        let mut rng = create_rng(42);
        let generation = Generation::random(&acids, &small_config(), &mut rng);
        let line = generation.report_fittest_and_volume();
        let expected = format!(
            "{}: {} / 60",
            generation.best().fitness(),
            generation.count_at_best()
        );
        assert_eq!(line, expected);
        assert_eq!(generation.report(3, false).to_string(), expected);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_sort_matches_sequential() {
        let acids = AcidSequence::parse("hphpphhphpphphhpphph").unwrap();
        let sequential = Generation::random(&acids, &small_config(), &mut create_rng(5));
        let parallel = Generation::random(
            &acids,
            &small_config().with_parallel(true),
            &mut create_rng(5),
        );
        assert_eq!(sequential.chromosomes(), parallel.chromosomes());
    }
}
