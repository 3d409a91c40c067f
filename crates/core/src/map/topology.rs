//! The topology of a map: its shape (rectangular or hexagonal, optionally
//! isometric), its native dimensions, and which axes wrap around. Every
//! coordinate, distance, and direction query takes the topology as an
//! explicit parameter, so a server map and a client map with different
//! topologies can coexist in one process without cross-talk.

use crate::map::direction::Direction;
use anyhow::ensure;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

/// Smallest allowed native dimension. Small enough to admit miniature
/// test maps.
pub const MIN_LINEAR_SIZE: i32 = 4;
/// Largest allowed native dimension.
pub const MAX_LINEAR_SIZE: i32 = 512;
/// Smallest allowed total tile count.
pub const MIN_TILES: usize =
    (MIN_LINEAR_SIZE * MIN_LINEAR_SIZE) as usize;
/// Largest allowed total tile count.
pub const MAX_TILES: usize = 2_048_000;

/// The shape of a map's grid. Hexness decides which directions exist and how
/// distance is measured; isometry decides how map coordinates are sheared
/// into native storage order.
#[derive(
    Copy, Clone, Debug, EnumIter, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// Plain rectangular grid
    Flat,
    /// Isometric rectangular grid
    Iso,
    /// Hexagonal grid
    Hex,
    /// Isometric hexagonal grid
    IsoHex,
}

impl Shape {
    pub fn is_hex(self) -> bool {
        matches!(self, Self::Hex | Self::IsoHex)
    }

    pub fn is_iso(self) -> bool {
        matches!(self, Self::Iso | Self::IsoHex)
    }
}

/// A validated map topology. Construction computes the direction
/// validity/cardinality tables for the shape; after that the value is
/// immutable, so the tables can never go stale. Changing topology means
/// building a new value (and a new map).
#[derive(Clone, Debug)]
pub struct Topology {
    shape: Shape,
    wrap_x: bool,
    wrap_y: bool,
    width: i32,
    height: i32,
    valid_dirs: Vec<Direction>,
    cardinal_dirs: Vec<Direction>,
    dir_validity: [bool; 8],
    dir_cardinality: [bool; 8],
}

impl Topology {
    /// Build a topology from a shape, per-axis wrap flags, and native
    /// dimensions. Returns an error if the dimensions are out of bounds or
    /// have the wrong parity for the shape.
    pub fn new(
        shape: Shape,
        wrap_x: bool,
        wrap_y: bool,
        width: i32,
        height: i32,
    ) -> anyhow::Result<Self> {
        ensure!(
            (MIN_LINEAR_SIZE..=MAX_LINEAR_SIZE).contains(&width),
            "map width {} outside [{}, {}]",
            width,
            MIN_LINEAR_SIZE,
            MAX_LINEAR_SIZE
        );
        ensure!(
            (MIN_LINEAR_SIZE..=MAX_LINEAR_SIZE).contains(&height),
            "map height {} outside [{}, {}]",
            height,
            MIN_LINEAR_SIZE,
            MAX_LINEAR_SIZE
        );
        let tiles = width as usize * height as usize;
        ensure!(
            (MIN_TILES..=MAX_TILES).contains(&tiles),
            "map of {} tiles outside [{}, {}]",
            tiles,
            MIN_TILES,
            MAX_TILES
        );
        ensure!(
            !shape.is_iso() || height % 2 == 0,
            "isometric maps require an even native height, got {}",
            height
        );

        let mut valid_dirs = Vec::new();
        let mut cardinal_dirs = Vec::new();
        let mut dir_validity = [false; 8];
        let mut dir_cardinality = [false; 8];
        for dir in Direction::iter() {
            if Self::shape_has_valid_dir(shape, dir) {
                valid_dirs.push(dir);
                dir_validity[dir as usize] = true;
            }
            if Self::shape_has_cardinal_dir(shape, dir) {
                cardinal_dirs.push(dir);
                dir_cardinality[dir as usize] = true;
            }
        }
        assert!(!valid_dirs.is_empty() && valid_dirs.len() <= 8);
        assert!(
            !cardinal_dirs.is_empty()
                && cardinal_dirs.len() <= valid_dirs.len()
        );

        Ok(Self {
            shape,
            wrap_x,
            wrap_y,
            width,
            height,
            valid_dirs,
            cardinal_dirs,
            dir_validity,
            dir_cardinality,
        })
    }

    /// Does the given direction exist at all under this shape? The four
    /// compass cardinals always exist. SE/NW are missing on hex grids and
    /// NE/SW are missing on iso-hex grids; rectangular grids (isometric or
    /// not) keep all eight.
    fn shape_has_valid_dir(shape: Shape, dir: Direction) -> bool {
        match dir {
            Direction::Southeast | Direction::Northwest => {
                !(shape.is_hex() && !shape.is_iso())
            }
            Direction::Northeast | Direction::Southwest => {
                !(shape.is_hex() && shape.is_iso())
            }
            Direction::North
            | Direction::East
            | Direction::South
            | Direction::West => true,
        }
    }

    /// Does stepping in the given direction cross a tile edge (rather than
    /// just a vertex) under this shape? On hex grids the two surviving
    /// diagonals cross edges too, so there every valid direction is
    /// cardinal.
    fn shape_has_cardinal_dir(shape: Shape, dir: Direction) -> bool {
        match dir {
            Direction::North
            | Direction::East
            | Direction::South
            | Direction::West => true,
            Direction::Southeast | Direction::Northwest => {
                shape.is_hex() && shape.is_iso()
            }
            Direction::Northeast | Direction::Southwest => {
                shape.is_hex() && !shape.is_iso()
            }
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn wrap_x(&self) -> bool {
        self.wrap_x
    }

    pub fn wrap_y(&self) -> bool {
        self.wrap_y
    }

    /// Native width of the map
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Native height of the map
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Total number of real positions on the map
    pub fn num_tiles(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Is the given direction valid under this topology?
    pub fn is_valid_dir(&self, dir: Direction) -> bool {
        self.dir_validity[dir as usize]
    }

    /// Is the given direction cardinal under this topology?
    pub fn is_cardinal_dir(&self, dir: Direction) -> bool {
        self.dir_cardinality[dir as usize]
    }

    /// The valid directions of this topology, in direction-table order
    pub fn valid_dirs(&self) -> &[Direction] {
        &self.valid_dirs
    }

    /// The cardinal directions of this topology, in direction-table order
    pub fn cardinal_dirs(&self) -> &[Direction] {
        &self.cardinal_dirs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topology(shape: Shape) -> Topology {
        Topology::new(shape, false, false, 8, 8).unwrap()
    }

    #[test]
    fn test_direction_counts() {
        for shape in Shape::iter() {
            let topology = topology(shape);
            let valid = topology.valid_dirs().len();
            let cardinal = topology.cardinal_dirs().len();
            assert!((1..=8).contains(&valid), "{:?}", shape);
            assert!((1..=valid).contains(&cardinal), "{:?}", shape);
        }
    }

    #[test]
    fn test_flat_directions() {
        let topology = topology(Shape::Flat);
        assert_eq!(topology.valid_dirs().len(), 8);
        assert_eq!(topology.cardinal_dirs().len(), 4);
        assert!(topology.is_valid_dir(Direction::Southeast));
        assert!(!topology.is_cardinal_dir(Direction::Southeast));
    }

    #[test]
    fn test_iso_directions() {
        // Isometry without hexness changes nothing about directions
        let topology = topology(Shape::Iso);
        assert_eq!(topology.valid_dirs().len(), 8);
        assert_eq!(topology.cardinal_dirs().len(), 4);
    }

    #[test]
    fn test_hex_directions() {
        let topology = topology(Shape::Hex);
        assert_eq!(topology.valid_dirs().len(), 6);
        assert_eq!(topology.cardinal_dirs().len(), 6);
        assert!(!topology.is_valid_dir(Direction::Southeast));
        assert!(!topology.is_valid_dir(Direction::Northwest));
        assert!(topology.is_cardinal_dir(Direction::Northeast));
        assert!(topology.is_cardinal_dir(Direction::Southwest));
        // Every valid direction is cardinal on a hex grid
        for &dir in topology.valid_dirs() {
            assert!(topology.is_cardinal_dir(dir));
        }
    }

    #[test]
    fn test_iso_hex_directions() {
        let topology = topology(Shape::IsoHex);
        assert_eq!(topology.valid_dirs().len(), 6);
        assert_eq!(topology.cardinal_dirs().len(), 6);
        assert!(!topology.is_valid_dir(Direction::Northeast));
        assert!(!topology.is_valid_dir(Direction::Southwest));
        assert!(topology.is_cardinal_dir(Direction::Southeast));
        assert!(topology.is_cardinal_dir(Direction::Northwest));
    }

    #[test]
    fn test_cardinal_dirs_are_valid() {
        for shape in Shape::iter() {
            let topology = topology(shape);
            for &dir in topology.cardinal_dirs() {
                assert!(
                    topology.is_valid_dir(dir),
                    "{:?} cardinal {} is not valid",
                    shape,
                    dir
                );
            }
        }
    }

    #[test]
    fn test_size_validation() {
        assert!(Topology::new(Shape::Flat, false, false, 3, 8).is_err());
        assert!(Topology::new(Shape::Flat, false, false, 8, 600).is_err());
        assert!(Topology::new(Shape::Flat, false, false, 4, 4).is_ok());
        assert!(Topology::new(Shape::Flat, false, false, 512, 512).is_ok());
    }

    #[test]
    fn test_iso_parity_validation() {
        assert!(Topology::new(Shape::Iso, false, false, 8, 9).is_err());
        assert!(Topology::new(Shape::IsoHex, false, false, 8, 9).is_err());
        assert!(Topology::new(Shape::Iso, false, false, 8, 10).is_ok());
        // Non-iso shapes don't care about parity
        assert!(Topology::new(Shape::Hex, false, false, 8, 9).is_ok());
    }
}
