//! Square-lattice geometry.
//!
//! A folding lives on the integer lattice ℤ². This module provides the
//! coordinate type [`Point`], the four-direction move vocabulary
//! [`Direction`], and the [`MoveTable`] that restricts which direction may
//! follow which while a walk is being grown.

use std::fmt;

/// An integer lattice coordinate.
///
/// Equality and hashing use the ordered pair, so `(2, 4)` and `(4, 2)` are
/// distinct keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// The origin `(0, 0)`.
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The four lattice neighbors, in direction-code order.
    pub fn neighbors(self) -> [Point; 4] {
        Direction::ALL.map(|d| next_point(self, d))
    }

    /// Whether `other` is exactly one lattice step away.
    pub fn is_adjacent(self, other: Point) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() == 1
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four unit moves on the lattice.
///
/// The numeric codes (`1..=4`) are stable and used in the move table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Direction {
    /// Code 1: `+x`.
    Right = 1,
    /// Code 2: `-x`.
    Left = 2,
    /// Code 3: `+y`.
    Up = 3,
    /// Code 4: `-y`.
    Down = 4,
}

impl Direction {
    /// All directions in code order.
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Up,
        Direction::Down,
    ];

    /// The numeric code of this direction.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Looks up a direction by its numeric code.
    pub fn from_code(code: u8) -> Option<Direction> {
        match code {
            1 => Some(Direction::Right),
            2 => Some(Direction::Left),
            3 => Some(Direction::Up),
            4 => Some(Direction::Down),
            _ => None,
        }
    }

    /// The unit offset `(dx, dy)` of this direction.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Right => (1, 0),
            Direction::Left => (-1, 0),
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
        }
    }

    /// The direction that retraces this one.
    pub fn reverse(self) -> Direction {
        match self {
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// The direction of the single step from `from` to `to`.
    ///
    /// Returns `None` if the two points are not lattice-adjacent.
    pub fn between(from: Point, to: Point) -> Option<Direction> {
        match (to.x - from.x, to.y - from.y) {
            (1, 0) => Some(Direction::Right),
            (-1, 0) => Some(Direction::Left),
            (0, 1) => Some(Direction::Up),
            (0, -1) => Some(Direction::Down),
            _ => None,
        }
    }
}

/// Returns the point one lattice step from `p` in `direction`.
#[inline]
pub fn next_point(p: Point, direction: Direction) -> Point {
    let (dx, dy) = direction.offset();
    Point::new(p.x + dx, p.y + dy)
}

/// Maps a previous direction to the three directions allowed to follow it.
///
/// Every entry excludes the reversal of its key, so a walk grown from the
/// table never immediately retraces a bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveTable {
    next: [[Direction; 3]; 4],
}

/// The move table used throughout the crate.
///
/// | previous | allowed next |
/// |----------|--------------|
/// | 1 (`+x`) | 1, 3, 4      |
/// | 2 (`-x`) | 2, 3, 4      |
/// | 3 (`+y`) | 1, 2, 3      |
/// | 4 (`-y`) | 1, 2, 4      |
pub const MOVES: MoveTable = MoveTable {
    next: [
        [Direction::Right, Direction::Up, Direction::Down],
        [Direction::Left, Direction::Up, Direction::Down],
        [Direction::Right, Direction::Left, Direction::Up],
        [Direction::Right, Direction::Left, Direction::Down],
    ],
};

impl MoveTable {
    /// Builds a table from explicit rows, indexed by direction code − 1.
    ///
    /// Returns `None` if any row contains the reversal of its key or
    /// repeats a direction.
    pub fn new(next: [[Direction; 3]; 4]) -> Option<Self> {
        for (key, row) in Direction::ALL.iter().zip(next.iter()) {
            if row.contains(&key.reverse()) {
                return None;
            }
            if row[0] == row[1] || row[1] == row[2] || row[0] == row[2] {
                return None;
            }
        }
        Some(Self { next })
    }

    /// The directions permitted to follow `previous`.
    #[inline]
    pub fn allowed(&self, previous: Direction) -> [Direction; 3] {
        self.next[previous.code() as usize - 1]
    }
}

impl Default for MoveTable {
    fn default() -> Self {
        MOVES
    }
}
