//! Progress notifications from a running search.
//!
//! The controller reports to a [`FoldListener`] after every generation and
//! whenever the best fitness improves. Listeners are optional: `()` ignores
//! everything, any `Fn(&Improvement)` closure receives improvements, and an
//! `mpsc::Sender<Improvement>` forwards them to another thread.

use super::types::Chromosome;
use std::fmt;
use std::sync::mpsc::Sender;

/// A new best folding found during the search.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Improvement {
    /// The best folding so far, with its acid sequence and walk.
    pub chromosome: Chromosome,
    /// Number of generations produced when it was found.
    pub generation: usize,
    /// Its fitness (same as `chromosome.fitness()`).
    pub fitness: i32,
}

/// Per-generation summary.
///
/// `Display` renders the progress line
/// `"{best_fitness}: {count_at_best} / {population_size}"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationReport {
    /// Generation number; 0 is the initial random generation.
    pub generation: usize,
    pub best_fitness: i32,
    /// Members sharing `best_fitness`.
    pub count_at_best: usize,
    pub population_size: usize,
    /// Number of distinct fitness values present.
    pub distinct_fitnesses: usize,
    /// Whether this generation was built with double-point mutation.
    pub double_point_mutation: bool,
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} / {}",
            self.best_fitness, self.count_at_best, self.population_size
        )
    }
}

/// Receives search progress.
///
/// Only confirmed improvements are reported; failed operator attempts
/// inside a generation are never surfaced.
pub trait FoldListener {
    /// Called each time the best fitness strictly improves.
    fn on_improvement(&self, improvement: &Improvement);

    /// Called once for the initial generation and once after every
    /// produced generation. The default implementation does nothing.
    fn on_generation(&self, _report: &GenerationReport) {}
}

impl FoldListener for () {
    fn on_improvement(&self, _improvement: &Improvement) {}
}

impl<F> FoldListener for F
where
    F: Fn(&Improvement),
{
    fn on_improvement(&self, improvement: &Improvement) {
        self(improvement)
    }
}

impl FoldListener for Sender<Improvement> {
    fn on_improvement(&self, improvement: &Improvement) {
        // A dropped receiver only means nobody is watching any more.
        let _ = self.send(improvement.clone());
    }
}
