//! Roulette-wheel parent selection over a generation's fitness index.
//!
//! The wheel is spun over the *distinct* fitness values of a generation,
//! not over individuals. Each distinct value `f` owns a slot of width `|f|`,
//! so more negative (better) values are chosen proportionally more often.
//! Once a value is chosen, a chromosome carrying it is picked uniformly.
//!
//! # References
//!
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and
//!   Machine Learning*, ch. 1 (roulette wheel)

use super::generation::{FitnessIndex, Generation};
use super::types::Chromosome;
use rand::Rng;

/// Two parents chosen for crossover.
#[derive(Debug, Clone, Copy)]
pub struct MatingPair<'a> {
    pub left: &'a Chromosome,
    pub right: &'a Chromosome,
}

/// Spins the wheel once and returns the selected fitness value.
///
/// Draws `r` uniformly from `1..=|sum_of_fitnesses|`, then walks the
/// distinct values best-first adding each to `r`; the first value that
/// brings `r` to `≤ 0` wins. A value of `0` has zero width and is only
/// returned when every member has fitness `0`.
///
/// # Panics
/// Panics if the index is empty.
pub fn spin<R: Rng>(index: &FitnessIndex, rng: &mut R) -> i32 {
    let best = index
        .best_fitness()
        .expect("cannot spin an empty fitness index");

    let total = index.sum_of_fitnesses().unsigned_abs();
    if total == 0 {
        return best;
    }

    let mut remaining = rng.random_range(1..=total) as i64;
    let mut selected = best;
    for fitness in index.fitnesses() {
        selected = fitness;
        remaining += i64::from(fitness);
        if remaining <= 0 {
            break;
        }
    }
    selected
}

/// Selects two parents by independent spins of the wheel.
pub fn select_pair<'a, R: Rng>(generation: &'a Generation, rng: &mut R) -> MatingPair<'a> {
    let left_fitness = spin(generation.index(), rng);
    let right_fitness = spin(generation.index(), rng);
    let left = generation
        .chromosome_with_fitness(left_fitness, rng)
        .expect("spun fitness is present in the index");
    let right = generation
        .chromosome_with_fitness(right_fitness, rng)
        .expect("spun fitness is present in the index");
    MatingPair { left, right }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[test]
    fn test_spin_frequencies_proportional() {
        // Distinct values -6, -3, -1: expected shares 6/10, 3/10, 1/10.
        let index = FitnessIndex::from_sorted(&[-6, -6, -3, -3, -3, -1, 0, 0]);
        assert_eq!(index.sum_of_fitnesses(), -10);

        let mut rng = create_rng(42);
        let n = 100_000;
        let mut counts = [0u32; 3];
        for _ in 0..n {
            match spin(&index, &mut rng) {
                -6 => counts[0] += 1,
                -3 => counts[1] += 1,
                -1 => counts[2] += 1,
                other => panic!("unexpected fitness selected: {other}"),
            }
        }
        let expected = [0.6, 0.3, 0.1];
        for (c, e) in counts.iter().zip(expected) {
            let share = *c as f64 / n as f64;
            assert!(
                (share - e).abs() < 0.01,
                "selection share {share:.4} deviates from {e}: counts {counts:?}"
            );
        }
    }

    #[test]
    fn test_spin_never_selects_zero_alongside_negatives() {
        let index = FitnessIndex::from_sorted(&[-2, -1, 0, 0, 0, 0]);
        let mut rng = create_rng(1);
        for _ in 0..10_000 {
            assert_ne!(spin(&index, &mut rng), 0);
        }
    }

    #[test]
    fn test_spin_all_zero() {
        let index = FitnessIndex::from_sorted(&[0, 0, 0]);
        let mut rng = create_rng(42);
        assert_eq!(spin(&index, &mut rng), 0);
    }

    #[test]
    fn test_spin_single_value() {
        let index = FitnessIndex::from_sorted(&[-4, -4]);
        let mut rng = create_rng(42);
        for _ in 0..100 {
            assert_eq!(spin(&index, &mut rng), -4);
        }
    }

    #[test]
    #[should_panic(expected = "cannot spin an empty fitness index")]
    fn test_spin_empty_panics() {
        let index = FitnessIndex::from_sorted(&[]);
        let mut rng = create_rng(42);
        spin(&index, &mut rng);
    }
}
