//! HP-model protein folding by genetic search.
//!
//! Finds low-energy foldings of a hydrophobic/polar acid chain on the 2D
//! square lattice:
//!
//! - **Lattice**: Points, the four unit directions, and the move table
//!   restricting which direction may follow which.
//! - **Fold**: Chromosomes, roulette-wheel selection, rigid-rotation
//!   crossover and mutation, immutable generations, and the evolution
//!   controller with stagnation escalation and cancellation.
//!
//! # Quick Start
//!
//! ```no_run
//! use hp_fold::fold::{FoldConfig, FoldRunner};
//!
//! let config = FoldConfig::default().with_seed(7);
//! let result = FoldRunner::run("hhpphpphpphpphpphpphh", -9, &config)?;
//! println!("{}", result.best);
//! # Ok::<(), hp_fold::FoldError>(())
//! ```

pub mod error;
pub mod fold;
pub mod lattice;
pub mod random;

pub use error::FoldError;
