//! Evolution controller.
//!
//! [`Evolution`] drives successive generations toward a target fitness one
//! [`step`](Evolution::step) at a time; [`FoldRunner`] wraps it in the
//! complete loop with cancellation and listener wiring:
//! initialization → produce next generation → track best → repeat.

use super::config::FoldConfig;
use super::generation::Generation;
use super::listener::{FoldListener, GenerationReport, Improvement};
use super::types::{AcidSequence, Chromosome};
use crate::error::FoldError;
use crate::random::create_rng;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info};

/// Lifecycle of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchState {
    /// The best fitness is still above the target.
    Running,
    /// The best fitness reached the target.
    Converged,
    /// Stopped externally between generations.
    Cancelled,
    /// Stopped after `max_generations` generations.
    GenerationLimit,
}

/// Result of a folding search.
#[derive(Debug, Clone)]
pub struct FoldResult {
    /// The best folding found.
    pub best: Chromosome,

    /// Best fitness value (same as `best.fitness()`).
    pub best_fitness: i32,

    /// Number of generations produced after the initial one.
    pub generations: usize,

    /// Terminal state. Never [`SearchState::Running`].
    pub state: SearchState,

    /// Number of improvements reported to the listener.
    pub improvements: usize,

    /// Best fitness after the initial generation and after each produced one.
    pub fitness_history: Vec<i32>,
}

impl FoldResult {
    pub fn converged(&self) -> bool {
        self.state == SearchState::Converged
    }
}

/// Step-wise evolution toward a target fitness.
///
/// Double-point mutation is switched on once `stagnation_threshold`
/// generations pass without improvement and stays on until the next
/// improvement.
pub struct Evolution<R: Rng> {
    config: FoldConfig,
    target: i32,
    rng: R,
    generation: Generation,
    best: Chromosome,
    generations: usize,
    stagnation: usize,
    double_point: bool,
    improvements: usize,
    fitness_history: Vec<i32>,
    state: SearchState,
}

impl<R: Rng> Evolution<R> {
    /// Builds the initial random generation.
    ///
    /// If its best member already meets `target` the evolution starts in
    /// [`SearchState::Converged`] and never produces a generation.
    ///
    /// # Errors
    /// - [`FoldError::PositiveTarget`] if `target > 0`
    /// - [`FoldError::InvalidConfig`] if `config` fails validation
    pub fn new(
        sequence: &AcidSequence,
        target: i32,
        config: FoldConfig,
        mut rng: R,
    ) -> Result<Self, FoldError> {
        if target > 0 {
            return Err(FoldError::PositiveTarget { target });
        }
        config.validate()?;

        let generation = Generation::random(sequence, &config, &mut rng);
        let best = generation.best().clone();
        let state = if best.fitness() <= target {
            SearchState::Converged
        } else {
            SearchState::Running
        };

        Ok(Self {
            fitness_history: vec![best.fitness()],
            config,
            target,
            rng,
            generation,
            best,
            generations: 0,
            stagnation: 0,
            double_point: false,
            improvements: 0,
            state,
        })
    }

    /// Produces one generation, unless the evolution has already stopped.
    ///
    /// Reports the new generation to `listener`, and the new best folding
    /// too when it improves on the previous best.
    pub fn step<L: FoldListener + ?Sized>(&mut self, listener: &L) -> SearchState {
        if self.state != SearchState::Running {
            return self.state;
        }
        if self
            .config
            .max_generations
            .is_some_and(|max| self.generations >= max)
        {
            self.state = SearchState::GenerationLimit;
            return self.state;
        }

        let threshold = self.config.stagnation_threshold;
        let double_point = threshold > 0 && self.stagnation >= threshold;
        if double_point && !self.double_point {
            debug!(
                generation = self.generations,
                stagnation = self.stagnation,
                "stagnation threshold reached, switching to double-point mutation"
            );
        }

        self.generation = self
            .generation
            .produce_next(&self.config, double_point, &mut self.rng);
        self.generations += 1;
        self.double_point = double_point;

        let candidate = self.generation.best();
        if candidate.fitness() < self.best.fitness() {
            self.best = candidate.clone();
            self.stagnation = 0;
            self.improvements += 1;
            debug!(
                generation = self.generations,
                fitness = self.best.fitness(),
                "new best folding"
            );
            listener.on_improvement(&Improvement {
                chromosome: self.best.clone(),
                generation: self.generations,
                fitness: self.best.fitness(),
            });
        } else {
            self.stagnation += 1;
        }
        self.fitness_history.push(self.best.fitness());

        let report = self.generation.report(self.generations, double_point);
        info!(generation = self.generations, "{report}");
        listener.on_generation(&report);

        if self.best.fitness() <= self.target {
            self.state = SearchState::Converged;
        }
        self.state
    }

    /// Stops a running evolution. Has no effect once it has stopped.
    pub fn cancel(&mut self) {
        if self.state == SearchState::Running {
            self.state = SearchState::Cancelled;
        }
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    /// The most recent generation.
    pub fn generation(&self) -> &Generation {
        &self.generation
    }

    /// Number of generations produced so far.
    pub fn generations(&self) -> usize {
        self.generations
    }

    /// Best folding found so far.
    pub fn best(&self) -> &Chromosome {
        &self.best
    }

    /// Consecutive generations without improvement.
    pub fn stagnation(&self) -> usize {
        self.stagnation
    }

    /// Report for the current generation.
    pub fn report(&self) -> GenerationReport {
        self.generation.report(self.generations, self.double_point)
    }

    pub fn into_result(self) -> FoldResult {
        FoldResult {
            best_fitness: self.best.fitness(),
            best: self.best,
            generations: self.generations,
            state: self.state,
            improvements: self.improvements,
            fitness_history: self.fitness_history,
        }
    }
}

/// Executes folding searches.
///
/// # Usage
///
/// ```no_run
/// use hp_fold::fold::{FoldConfig, FoldRunner};
///
/// let config = FoldConfig::default().with_seed(42);
/// let result = FoldRunner::run("hphpphhphpphphhpphph", -9, &config).unwrap();
/// println!("best fitness {} after {} generations", result.best_fitness, result.generations);
/// ```
pub struct FoldRunner;

impl FoldRunner {
    /// Runs a search without a listener.
    ///
    /// Without `max_generations` this only returns once `target` is reached;
    /// an unreachable target never terminates.
    pub fn run(acids: &str, target: i32, config: &FoldConfig) -> Result<FoldResult, FoldError> {
        Self::run_with_cancel(acids, target, config, &(), None)
    }

    /// Runs a search, reporting progress to `listener`.
    pub fn run_with_listener<L: FoldListener + ?Sized>(
        acids: &str,
        target: i32,
        config: &FoldConfig,
        listener: &L,
    ) -> Result<FoldResult, FoldError> {
        Self::run_with_cancel(acids, target, config, listener, None)
    }

    /// Runs a search with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the search stops
    /// before producing the next generation and returns the best folding
    /// found so far.
    pub fn run_with_cancel<L: FoldListener + ?Sized>(
        acids: &str,
        target: i32,
        config: &FoldConfig,
        listener: &L,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<FoldResult, FoldError> {
        let sequence = AcidSequence::parse(acids)?;
        let seed = resolve_seed(config);
        Self::search(
            &sequence,
            target,
            config,
            listener,
            cancel.as_deref(),
            create_rng(seed),
        )
    }

    /// Runs a search on a parsed sequence with an explicit random source.
    ///
    /// `config.seed` is ignored; all randomness is drawn from `rng`.
    pub fn search<L: FoldListener + ?Sized, R: Rng>(
        sequence: &AcidSequence,
        target: i32,
        config: &FoldConfig,
        listener: &L,
        cancel: Option<&AtomicBool>,
        rng: R,
    ) -> Result<FoldResult, FoldError> {
        let mut evolution = Evolution::new(sequence, target, config.clone(), rng)?;
        info!(
            length = sequence.len(),
            target,
            population_size = config.population_size,
            initial_best = evolution.best().fitness(),
            "starting HP folding search"
        );
        listener.on_generation(&evolution.report());

        while evolution.state() == SearchState::Running {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                evolution.cancel();
                break;
            }
            evolution.step(listener);
        }

        let result = evolution.into_result();
        info!(
            state = ?result.state,
            generations = result.generations,
            best = result.best_fitness,
            "HP folding search finished"
        );
        Ok(result)
    }

    /// Starts a search on a dedicated worker thread.
    ///
    /// Input and configuration are validated before the thread starts, so
    /// malformed input is reported here rather than from
    /// [`SearchHandle::join`].
    pub fn spawn(acids: &str, target: i32, config: FoldConfig) -> Result<SearchHandle, FoldError> {
        let sequence = AcidSequence::parse(acids)?;
        if target > 0 {
            return Err(FoldError::PositiveTarget { target });
        }
        config.validate()?;

        let cancel = Arc::new(AtomicBool::new(false));
        let (sender, improvements) = mpsc::channel();
        let flag = Arc::clone(&cancel);
        let seed = resolve_seed(&config);

        let worker = thread::spawn(move || {
            Self::search(
                &sequence,
                target,
                &config,
                &sender,
                Some(&flag),
                create_rng(seed),
            )
        });

        Ok(SearchHandle {
            cancel,
            improvements,
            worker,
        })
    }
}

fn resolve_seed(config: &FoldConfig) -> u64 {
    let seed = config.seed.unwrap_or_else(rand::random);
    info!(seed, "search seed");
    seed
}

/// Handle to a search running on a worker thread.
pub struct SearchHandle {
    cancel: Arc<AtomicBool>,
    improvements: Receiver<Improvement>,
    worker: JoinHandle<Result<FoldResult, FoldError>>,
}

impl SearchHandle {
    /// Requests the search to stop before its next generation.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// The shared cancellation flag.
    pub fn cancel_token(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Improvements in the order they were found.
    pub fn improvements(&self) -> &Receiver<Improvement> {
        &self.improvements
    }

    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Waits for the search to stop and returns its result.
    pub fn join(self) -> Result<FoldResult, FoldError> {
        self.worker.join().map_err(|_| FoldError::WorkerPanicked)?
    }
}

// ============================================================================
// Tests
// ============================================================================
