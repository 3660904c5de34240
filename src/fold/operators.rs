//! Geometry-preserving genetic operators on foldings.
//!
//! Both operators cut a walk after a pivot and reattach a tail fragment to
//! the kept prefix:
//!
//! - [`crossover`]: the tail comes from a second parent
//! - [`mutate`]: the tail is the chromosome's own suffix (a bend at the pivot)
//!
//! The tail is moved as a rigid body. It is rotated so that its entry bond
//! points in a newly chosen direction, then translated so that it starts one
//! step from the pivot. A rigid move preserves the tail's internal shape and
//! self-avoidance, so only the junction with the prefix can collide; the
//! spliced walk is validated and the next direction tried on failure.
//!
//! At most three directions are permitted after the pivot's incoming bond,
//! each tried once in random order. Mutation skips the tail's current
//! direction, leaving at most two. When all fail the operator returns
//! `None` and the caller retries with another pivot or pair.

use super::types::{is_self_avoiding, Chromosome};
use crate::lattice::{next_point, Direction, MoveTable, Point};
use rand::seq::SliceRandom;
use rand::Rng;

/// A lattice symmetry built from coordinate swaps and negations.
///
/// Applied in order: swap `x`/`y`, then negate `x`, then negate `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transform {
    pub swap_xy: bool,
    pub negate_x: bool,
    pub negate_y: bool,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        swap_xy: false,
        negate_x: false,
        negate_y: false,
    };

    const HALF_TURN: Transform = Transform {
        swap_xy: false,
        negate_x: true,
        negate_y: true,
    };

    /// Quarter turn counter-clockwise: `(x, y) → (−y, x)`.
    const LEFT_TURN: Transform = Transform {
        swap_xy: true,
        negate_x: true,
        negate_y: false,
    };

    /// Quarter turn clockwise: `(x, y) → (y, −x)`.
    const RIGHT_TURN: Transform = Transform {
        swap_xy: true,
        negate_x: false,
        negate_y: true,
    };

    /// The rotation that carries `old` onto `new`.
    ///
    /// Covers all twelve ordered pairs of distinct directions; equal
    /// directions yield [`Transform::IDENTITY`].
    pub fn between(old: Direction, new: Direction) -> Transform {
        use Direction::*;
        match (old, new) {
            (Right, Right) | (Left, Left) | (Up, Up) | (Down, Down) => Self::IDENTITY,
            (Right, Left) | (Left, Right) | (Up, Down) | (Down, Up) => Self::HALF_TURN,
            (Right, Up) | (Left, Down) | (Up, Left) | (Down, Right) => Self::LEFT_TURN,
            (Right, Down) | (Left, Up) | (Up, Right) | (Down, Left) => Self::RIGHT_TURN,
        }
    }

    /// Applies the transform to a single point about the origin.
    #[inline]
    pub fn apply(self, p: Point) -> Point {
        let (mut x, mut y) = if self.swap_xy { (p.y, p.x) } else { (p.x, p.y) };
        if self.negate_x {
            x = -x;
        }
        if self.negate_y {
            y = -y;
        }
        Point::new(x, y)
    }
}

/// Rigidly reorients `fragment` and places its first point on `anchor`.
///
/// The fragment is treated as originally proceeding in `old_direction`;
/// after the call it proceeds in `new_direction`. Pairwise distances and
/// adjacency within the fragment are preserved.
pub fn shift_and_rotate(
    fragment: &[Point],
    old_direction: Direction,
    new_direction: Direction,
    anchor: Point,
) -> Vec<Point> {
    let Some(&origin) = fragment.first() else {
        return Vec::new();
    };
    let transform = Transform::between(old_direction, new_direction);
    fragment
        .iter()
        .map(|&p| {
            let r = transform.apply(Point::new(p.x - origin.x, p.y - origin.y));
            Point::new(r.x + anchor.x, r.y + anchor.y)
        })
        .collect()
}

/// Crosses `left` with `right` at `pivot`.
///
/// The child keeps `left.walk[..=pivot]` and grafts `right.walk[pivot + 1..]`
/// onto it. The child carries `left`'s acid sequence.
///
/// Returns `None` if `pivot` is outside `1..=len-2`, the parents differ in
/// length, or no permitted direction yields a self-avoiding splice.
pub fn crossover<R: Rng>(
    left: &Chromosome,
    right: &Chromosome,
    pivot: usize,
    moves: &MoveTable,
    rng: &mut R,
) -> Option<Chromosome> {
    if left.walk().len() != right.walk().len() {
        return None;
    }
    reattach_tail(left, right.walk(), pivot, moves, false, rng)
}

/// Bends `chromosome` at `pivot`.
///
/// The suffix after `pivot` is rotated into a newly chosen permitted
/// direction other than its current one, so a returned chromosome always
/// differs from the input.
///
/// Returns `None` if `pivot` is outside `1..=len-2` or no other permitted
/// direction yields a self-avoiding walk.
pub fn mutate<R: Rng>(
    chromosome: &Chromosome,
    pivot: usize,
    moves: &MoveTable,
    rng: &mut R,
) -> Option<Chromosome> {
    reattach_tail(chromosome, chromosome.walk(), pivot, moves, true, rng)
}

/// Keeps `base.walk[..=pivot]` and reattaches `donor[pivot + 1..]`.
///
/// With `bend` set the donor tail's own entry direction is not a candidate.
fn reattach_tail<R: Rng>(
    base: &Chromosome,
    donor: &[Point],
    pivot: usize,
    moves: &MoveTable,
    bend: bool,
    rng: &mut R,
) -> Option<Chromosome> {
    let walk = base.walk();
    if pivot == 0 || pivot + 1 >= walk.len() {
        return None;
    }

    let previous = Direction::between(walk[pivot - 1], walk[pivot])?;
    let entry = Direction::between(donor[pivot], donor[pivot + 1])?;
    let tail = &donor[pivot + 1..];

    let mut candidates = moves.allowed(previous);
    candidates.shuffle(rng);

    let mut spliced = Vec::with_capacity(walk.len());
    for direction in candidates {
        if bend && direction == entry {
            continue;
        }
        let anchor = next_point(walk[pivot], direction);
        spliced.clear();
        spliced.extend_from_slice(&walk[..=pivot]);
        spliced.extend(shift_and_rotate(tail, entry, direction, anchor));

        if is_self_avoiding(&spliced) {
            return Some(Chromosome::from_parts(base.acids().clone(), spliced));
        }
    }

    None
}
