//! The 8-way compass used for tile adjacency. Which of these directions
//! actually exist, and which of them cross a tile edge rather than a vertex,
//! depends on the active topology; see [Topology](crate::Topology).

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

/// One of the eight compass directions between a tile and its neighbours.
///
/// The discriminant values match the layout of the direction tables used by
/// the rest of the map code:
///
/// ```text
/// -------
/// |0|1|2|
/// |-+-+-|
/// |3| |4|
/// |-+-+-|
/// |5|6|7|
/// -------
/// ```
///
/// With this numbering the opposite direction is always `7 - dir`, which
/// [Self::reverse] relies on.
#[derive(
    Copy, Clone, Debug, EnumIter, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Northwest = 0,
    North = 1,
    Northeast = 2,
    West = 3,
    East = 4,
    Southwest = 5,
    South = 6,
    Southeast = 7,
}

impl Direction {
    /// All directions, in discriminant order. Iterating this visits the
    /// direction tables in their storage order.
    pub const ALL: [Self; 8] = [
        Self::Northwest,
        Self::North,
        Self::Northeast,
        Self::West,
        Self::East,
        Self::Southwest,
        Self::South,
        Self::Southeast,
    ];

    /// All directions in clockwise compass order, starting at north.
    pub const CLOCKWISE: [Self; 8] = [
        Self::North,
        Self::Northeast,
        Self::East,
        Self::Southeast,
        Self::South,
        Self::Southwest,
        Self::West,
        Self::Northwest,
    ];

    /// The map-space step this direction represents. Each component is one
    /// of `-1`, `0`, or `1`. North is negative y, west is negative x.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::Northwest => (-1, -1),
            Self::North => (0, -1),
            Self::Northeast => (1, -1),
            Self::West => (-1, 0),
            Self::East => (1, 0),
            Self::Southwest => (-1, 1),
            Self::South => (0, 1),
            Self::Southeast => (1, 1),
        }
    }

    /// Get the direction directly opposite this one.
    pub fn reverse(self) -> Self {
        Self::ALL[7 - self as usize]
    }

    /// Get the index of this direction within the clockwise compass
    /// ordering.
    fn clockwise_index(self) -> usize {
        // CLOCKWISE contains every direction, so this can't fail
        Self::CLOCKWISE.iter().position(|dir| self == *dir).unwrap()
    }

    /// Get the next direction clockwise on the compass.
    pub fn clockwise(self) -> Self {
        let index = self.clockwise_index();
        Self::CLOCKWISE[(index + 1) % Self::CLOCKWISE.len()]
    }

    /// Get the next direction counter-clockwise on the compass.
    pub fn counterclockwise(self) -> Self {
        let index = self.clockwise_index();
        // Adding len-1 avoids a negative intermediate; same post-modulus
        // result as subtracting 1
        Self::CLOCKWISE
            [(index + Self::CLOCKWISE.len() - 1) % Self::CLOCKWISE.len()]
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Northwest => "NW",
            Self::North => "N",
            Self::Northeast => "NE",
            Self::West => "W",
            Self::East => "E",
            Self::Southwest => "SW",
            Self::South => "S",
            Self::Southeast => "SE",
        };
        write!(f, "{}", name)
    }
}
