//! Search configuration.
//!
//! [`FoldConfig`] holds the population layout and the controller's
//! stagnation and termination parameters.

use crate::error::FoldError;
use crate::lattice::{MoveTable, MOVES};

/// Configuration for an HP folding search.
///
/// The population of every generation is laid out as
///
/// ```text
/// [ elites | crossover pool | random fill ]
/// ```
///
/// with `crossover_count = population_size - elite_count - fill_count`.
/// Mutations target the crossover pool only.
///
/// # Defaults
///
/// ```
/// use hp_fold::fold::FoldConfig;
///
/// let config = FoldConfig::default();
/// assert_eq!(config.population_size, 500);
/// assert_eq!(config.elite_count(), 25);
/// assert_eq!(config.crossover_count(), 375);
/// assert_eq!(config.fill_count(), 100);
/// assert_eq!(config.mutation_count(), 125);
/// assert_eq!(config.stagnation_threshold, 150);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use hp_fold::fold::FoldConfig;
///
/// let config = FoldConfig::default()
///     .with_population_size(200)
///     .with_elite_ratio(0.1)
///     .with_stagnation_threshold(50)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct FoldConfig {
    /// Number of chromosomes in every generation.
    pub population_size: usize,

    /// Fraction of the population copied unchanged from the best of the
    /// previous generation (0.0–1.0).
    pub elite_ratio: f64,

    /// Fraction of the population filled with fresh random foldings
    /// (0.0–1.0).
    pub fill_ratio: f64,

    /// Number of successful mutations per generation, as a fraction of the
    /// population size (0.0–1.0).
    pub mutation_ratio: f64,

    /// Generations without improvement after which every mutation bends
    /// the chromosome at two pivots instead of one.
    ///
    /// Set to 0 to never escalate.
    pub stagnation_threshold: usize,

    /// Optional cap on the number of generations produced.
    ///
    /// `None` (the default) runs until the target fitness is reached or the
    /// search is cancelled.
    pub max_generations: Option<usize>,

    /// Whether to sort generations on the rayon pool.
    ///
    /// Only effective with the `parallel` feature. Results are identical
    /// either way.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    /// Directions allowed to follow each direction while growing walks and
    /// reattaching tails.
    pub moves: MoveTable,
}

impl Default for FoldConfig {
    fn default() -> Self {
        Self {
            population_size: 500,
            elite_ratio: 0.05,
            fill_ratio: 0.2,
            mutation_ratio: 0.25,
            stagnation_threshold: 150,
            max_generations: None,
            parallel: true,
            seed: None,
            moves: MOVES,
        }
    }
}

impl FoldConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the elite ratio.
    pub fn with_elite_ratio(mut self, ratio: f64) -> Self {
        self.elite_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Sets the random-fill ratio.
    pub fn with_fill_ratio(mut self, ratio: f64) -> Self {
        self.fill_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation ratio.
    pub fn with_mutation_ratio(mut self, ratio: f64) -> Self {
        self.mutation_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Sets the stagnation threshold (0 to disable escalation).
    pub fn with_stagnation_threshold(mut self, generations: usize) -> Self {
        self.stagnation_threshold = generations;
        self
    }

    /// Caps the number of generations produced.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = Some(n);
        self
    }

    /// Enables or disables the parallel sort.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replaces the move table.
    pub fn with_moves(mut self, moves: MoveTable) -> Self {
        self.moves = moves;
        self
    }

    /// Preset for short sequences and tests: population 100.
    pub fn small() -> Self {
        Self {
            population_size: 100,
            ..Self::default()
        }
    }

    /// The historical 200-member layout: 10 elites, 160 crossovers,
    /// 30 random, 50 mutations.
    pub fn classic() -> Self {
        Self {
            population_size: 200,
            elite_ratio: 0.05,
            fill_ratio: 0.15,
            mutation_ratio: 0.25,
            ..Self::default()
        }
    }

    /// Number of elites carried over unchanged.
    pub fn elite_count(&self) -> usize {
        share(self.population_size, self.elite_ratio)
    }

    /// Number of random foldings added each generation.
    pub fn fill_count(&self) -> usize {
        share(self.population_size, self.fill_ratio)
    }

    /// Number of crossover children per generation.
    pub fn crossover_count(&self) -> usize {
        self.population_size
            .saturating_sub(self.elite_count() + self.fill_count())
    }

    /// Number of successful mutations per generation.
    pub fn mutation_count(&self) -> usize {
        share(self.population_size, self.mutation_ratio)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns [`FoldError::InvalidConfig`] describing the first problem found.
    pub fn validate(&self) -> Result<(), FoldError> {
        if self.population_size < 4 {
            return Err(FoldError::InvalidConfig(
                "population_size must be at least 4".into(),
            ));
        }
        if self.elite_count() + self.fill_count() >= self.population_size {
            return Err(FoldError::InvalidConfig(
                "elite_ratio + fill_ratio leave no room for crossover".into(),
            ));
        }
        if self.max_generations == Some(0) {
            return Err(FoldError::InvalidConfig(
                "max_generations must be positive or None".into(),
            ));
        }
        Ok(())
    }
}

fn share(total: usize, ratio: f64) -> usize {
    (total as f64 * ratio).round() as usize
}
