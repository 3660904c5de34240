//! Genetic-algorithm search for HP-model protein foldings.
//!
//! A folding of an acid sequence is a self-avoiding walk on the square
//! lattice. Its fitness is the negated number of non-covalent contacts
//! between hydrophobic residues, so lower is better and `0` is the worst.
//!
//! # Key Types
//!
//! - [`AcidSequence`]: Parsed chain of hydrophobic/polar residues
//! - [`Chromosome`]: One folding with its cached fitness
//! - [`Generation`]: Sorted, indexed, immutable population
//! - [`FoldConfig`]: Population layout and stagnation parameters
//! - [`Evolution`]: Step-wise controller
//! - [`FoldRunner`]: Executes the search loop
//! - [`FoldListener`]: Receives improvements and per-generation reports
//!
//! # Submodules
//!
//! - [`operators`]: Rigid-rotation crossover and pivot mutation
//!
//! # References
//!
//! - Dill (1985), *Theory for the folding and stability of globular proteins*
//! - Unger & Moult (1993), *Genetic algorithms for protein folding simulations*

mod config;
mod generation;
mod listener;
pub mod operators;
mod runner;
mod selection;
mod types;

pub use config::FoldConfig;
pub use generation::{FitnessIndex, FitnessRange, Generation};
pub use listener::{FoldListener, GenerationReport, Improvement};
pub use runner::{Evolution, FoldResult, FoldRunner, SearchHandle, SearchState};
pub use selection::{select_pair, spin, MatingPair};
pub use types::{
    compute_fitness, is_self_avoiding, Acid, AcidSequence, Chromosome, MIN_SEQUENCE_LENGTH,
};
