//! Amino-acid sequences and candidate foldings.
//!
//! A [`Chromosome`] is one complete folding of an [`AcidSequence`]: a
//! self-avoiding walk on the square lattice together with its HP-contact
//! fitness. Chromosomes are immutable; every structural change produces a
//! new instance.

use crate::error::FoldError;
use crate::lattice::{next_point, Direction, MoveTable, Point};
use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Minimum sequence length. Shorter sequences leave no valid pivot.
pub const MIN_SEQUENCE_LENGTH: usize = 3;

/// Classification of one amino acid in the HP model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Acid {
    /// `h` / `H`
    Hydrophobic,
    /// `p` / `P`
    Polar,
}

impl Acid {
    /// Parses a single marker, case-insensitively.
    pub fn from_char(c: char) -> Option<Acid> {
        match c {
            'h' | 'H' => Some(Acid::Hydrophobic),
            'p' | 'P' => Some(Acid::Polar),
            _ => None,
        }
    }

    #[inline]
    pub fn is_hydrophobic(self) -> bool {
        self == Acid::Hydrophobic
    }
}

/// An immutable amino-acid sequence shared by every folding of one search.
///
/// Cloning is cheap: the underlying storage is reference counted.
///
/// ```
/// use hp_fold::fold::{Acid, AcidSequence};
///
/// let seq: AcidSequence = "hPpH".parse().unwrap();
/// assert_eq!(seq.len(), 4);
/// assert_eq!(seq[1], Acid::Polar);
/// assert_eq!(seq.to_string(), "hpph");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcidSequence {
    acids: Arc<[Acid]>,
}

impl AcidSequence {
    /// Parses an acid string over `{h, H, p, P}`.
    ///
    /// # Errors
    ///
    /// - [`FoldError::InvalidAcid`] for any other character
    /// - [`FoldError::SequenceTooShort`] below [`MIN_SEQUENCE_LENGTH`]
    pub fn parse(acid_string: &str) -> Result<Self, FoldError> {
        let acids = acid_string
            .chars()
            .enumerate()
            .map(|(position, found)| {
                Acid::from_char(found).ok_or(FoldError::InvalidAcid { position, found })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_acids(acids)
    }

    /// Wraps an already classified sequence.
    pub fn from_acids(acids: Vec<Acid>) -> Result<Self, FoldError> {
        if acids.len() < MIN_SEQUENCE_LENGTH {
            return Err(FoldError::SequenceTooShort {
                length: acids.len(),
            });
        }
        Ok(Self {
            acids: acids.into(),
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.acids.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.acids.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Acid] {
        &self.acids
    }

    /// Number of hydrophobic positions.
    pub fn hydrophobic_count(&self) -> usize {
        self.acids.iter().filter(|a| a.is_hydrophobic()).count()
    }
}

impl std::ops::Index<usize> for AcidSequence {
    type Output = Acid;

    fn index(&self, index: usize) -> &Acid {
        &self.acids[index]
    }
}

impl FromStr for AcidSequence {
    type Err = FoldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AcidSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for acid in self.acids.iter() {
            let c = if acid.is_hydrophobic() { 'h' } else { 'p' };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// One candidate folding.
///
/// # Invariants
///
/// - `walk.len() == acids.len()`
/// - `walk[0] == (0, 0)` and `walk[1] == (1, 0)`
/// - consecutive points are lattice-adjacent
/// - no point repeats (self-avoiding walk)
/// - `fitness == compute_fitness(acids, walk)`
///
/// With the `serde` feature, deserialization goes through
/// [`Chromosome::from_walk`] and recomputes the fitness.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "SerializedChromosome"))]
pub struct Chromosome {
    acids: AcidSequence,
    walk: Vec<Point>,
    fitness: i32,
}

/// Wire form of a [`Chromosome`]; a stored fitness is ignored.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct SerializedChromosome {
    acids: AcidSequence,
    walk: Vec<Point>,
}

#[cfg(feature = "serde")]
impl TryFrom<SerializedChromosome> for Chromosome {
    type Error = FoldError;

    fn try_from(value: SerializedChromosome) -> Result<Self, Self::Error> {
        Chromosome::from_walk(value.acids, value.walk).ok_or(FoldError::InvalidWalk)
    }
}

impl Chromosome {
    /// Generates a random self-avoiding folding of `acids`.
    ///
    /// Walks are grown from the fixed start `(0,0) → (1,0)` by choosing
    /// uniformly among the moves the table allows after the previous one;
    /// a walk that collides with itself is discarded and regrown from
    /// scratch. There is no attempt cap, so expected running time grows
    /// exponentially with sequence length. Callers folding very long
    /// sequences should account for this.
    pub fn random<R: Rng>(acids: &AcidSequence, moves: &MoveTable, rng: &mut R) -> Self {
        let walk = random_walk(acids.len(), moves, rng);
        Self::from_parts(acids.clone(), walk)
    }

    /// Builds a chromosome from an explicit walk, checking every invariant.
    ///
    /// Returns `None` if the walk has the wrong length, does not start at
    /// `(0,0) → (1,0)`, contains a non-adjacent step, or revisits a point.
    pub fn from_walk(acids: AcidSequence, walk: Vec<Point>) -> Option<Self> {
        if walk.len() != acids.len() || !has_canonical_start(&walk) {
            return None;
        }
        if !walk.windows(2).all(|w| w[0].is_adjacent(w[1])) || !is_self_avoiding(&walk) {
            return None;
        }
        Some(Self::from_parts(acids, walk))
    }

    /// Assembles a chromosome from a walk the caller has already validated.
    pub(crate) fn from_parts(acids: AcidSequence, walk: Vec<Point>) -> Self {
        debug_assert_eq!(acids.len(), walk.len());
        debug_assert!(is_self_avoiding(&walk));
        let fitness = compute_fitness(acids.as_slice(), &walk);
        Self {
            acids,
            walk,
            fitness,
        }
    }

    #[inline]
    pub fn acids(&self) -> &AcidSequence {
        &self.acids
    }

    #[inline]
    pub fn walk(&self) -> &[Point] {
        &self.walk
    }

    /// Negated count of non-covalent H–H contacts. Lower is better.
    #[inline]
    pub fn fitness(&self) -> i32 {
        self.fitness
    }

    /// Horizontal and vertical span of the folding, in lattice units.
    pub fn bounding_box(&self) -> (u32, u32) {
        let (mut min_x, mut max_x, mut min_y, mut max_y) = (0, 0, 0, 0);
        for p in &self.walk {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
        ((max_x - min_x) as u32, (max_y - min_y) as u32)
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, p) in self.walk.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{p}")?;
        }
        write!(f, "] {}", self.fitness)
    }
}

/// Computes the HP fitness of a folding.
///
/// Every hydrophobic acid at index `i` looks at its four lattice neighbors;
/// each neighbor occupied by a hydrophobic acid at index `j > i + 1`
/// contributes `-1`. Each non-covalent contact is therefore counted exactly
/// once, from its lower-indexed side.
///
/// # Panics
/// Panics if `acids` and `walk` differ in length.
pub fn compute_fitness(acids: &[Acid], walk: &[Point]) -> i32 {
    assert_eq!(acids.len(), walk.len(), "acids and walk must have equal length");

    let hydrophobic: HashMap<Point, usize> = walk
        .iter()
        .zip(acids)
        .enumerate()
        .filter(|(_, (_, acid))| acid.is_hydrophobic())
        .map(|(i, (&p, _))| (p, i))
        .collect();

    let mut contacts = 0;
    for (&p, &i) in &hydrophobic {
        for neighbor in p.neighbors() {
            if let Some(&j) = hydrophobic.get(&neighbor) {
                if j > i + 1 {
                    contacts -= 1;
                }
            }
        }
    }
    contacts
}

/// Whether no two points of `walk` coincide.
pub fn is_self_avoiding(walk: &[Point]) -> bool {
    let mut seen = HashSet::with_capacity(walk.len());
    walk.iter().all(|p| seen.insert(*p))
}

fn has_canonical_start(walk: &[Point]) -> bool {
    walk.len() >= 2 && walk[0] == Point::ORIGIN && walk[1] == Point::new(1, 0)
}

/// Grows random walks until one is self-avoiding.
fn random_walk<R: Rng>(length: usize, moves: &MoveTable, rng: &mut R) -> Vec<Point> {
    loop {
        let mut walk = Vec::with_capacity(length);
        walk.push(Point::ORIGIN);
        walk.push(Point::new(1, 0));
        let mut previous = Direction::Right;

        for i in 2..length {
            let next = moves.allowed(previous)[rng.random_range(0..3)];
            walk.push(next_point(walk[i - 1], next));
            previous = next;
        }

        if is_self_avoiding(&walk) {
            return walk;
        }
    }
}
