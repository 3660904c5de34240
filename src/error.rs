//! Error types for folding searches.

use thiserror::Error;

/// Errors raised when a search cannot be started or completed.
///
/// Operator exhaustion (a crossover or mutation that finds no self-avoiding
/// reattachment) is not an error; those operators return `None`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FoldError {
    #[error("invalid amino acid {found:?} at position {position}: expected one of h, H, p, P")]
    InvalidAcid { position: usize, found: char },

    #[error("amino acid sequence of length {length} is too short: at least 3 are required")]
    SequenceTooShort { length: usize },

    #[error("target fitness {target} is positive: fitness is never above 0")]
    PositiveTarget { target: i32 },

    #[error("walk is not a self-avoiding folding of its acid sequence")]
    InvalidWalk,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("search worker panicked")]
    WorkerPanicked,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = FoldError::InvalidAcid {
            position: 2,
            found: 'x',
        };
        assert_eq!(
            err.to_string(),
            "invalid amino acid 'x' at position 2: expected one of h, H, p, P"
        );
        assert!(FoldError::SequenceTooShort { length: 2 }
            .to_string()
            .contains("length 2"));
        assert!(FoldError::InvalidConfig("population_size must be at least 4".into())
            .to_string()
            .starts_with("invalid configuration"));
    }
}
