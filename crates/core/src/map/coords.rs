//! The three coordinate spaces of a map and the transforms between them.
//!
//! - **Map coordinates** are the user-facing cartesian space. All public
//!   positional APIs speak map coordinates. They may be out of range; the
//!   topology decides whether such a position is real (reachable by
//!   wrapping) or not.
//! - **Native coordinates** are the internal, topology-normalized space.
//!   Tiles are stored in native row-major order, wrapping happens on native
//!   axes, and most geometry is easiest here. On isometric maps native
//!   space is the map space sheared and compressed 2x along X.
//! - **Natural coordinates** are display-oriented: the same shear as
//!   native, but uncompressed, so on isometric maps the natural width is
//!   twice the native width. Only a few consumers (latitude projection,
//!   edge-nearness checks) care about this space.
//!
//! Map↔native round-trips exactly for every position; the native→map
//! direction never wraps, since wrapping is only meaningful on the native
//! side.

use crate::{
    map::{direction::Direction, tile::TileIndex, topology::Topology},
    util,
};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// A position in map space. May refer to a location outside the map bounds;
/// use [Topology::normalize] to find out whether it is real.
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {})", "self.x", "self.y")]
pub struct MapPos {
    pub x: i32,
    pub y: i32,
}

impl MapPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The position one step in the given direction. The result is not
    /// normalized.
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.offset();
        Self::new(self.x + dx, self.y + dy)
    }
}

/// A position in native space. In-range native positions map 1:1 onto tile
/// storage indices.
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {})", "self.x", "self.y")]
pub struct NativePos {
    pub x: i32,
    pub y: i32,
}

impl NativePos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A position in natural (display-oriented) space.
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {})", "self.x", "self.y")]
pub struct NaturalPos {
    pub x: i32,
    pub y: i32,
}

impl NaturalPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Topology {
    /// Convert a map position to native space. This is a pure linear
    /// transform; no wrapping is applied.
    pub fn map_to_native(&self, pos: MapPos) -> NativePos {
        if self.shape().is_iso() {
            let nat_y = pos.x + pos.y - self.width();
            let nat_x = (2 * pos.x - nat_y - (nat_y & 1)) / 2;
            NativePos::new(nat_x, nat_y)
        } else {
            NativePos::new(pos.x, pos.y)
        }
    }

    /// Convert a native position back to map space. Exact inverse of
    /// [Self::map_to_native]; never wraps.
    pub fn native_to_map(&self, pos: NativePos) -> MapPos {
        if self.shape().is_iso() {
            let map_x = (pos.y + (pos.y & 1)) / 2 + pos.x;
            let map_y = pos.y - map_x + self.width();
            MapPos::new(map_x, map_y)
        } else {
            MapPos::new(pos.x, pos.y)
        }
    }

    /// Convert a map position to natural space.
    pub fn map_to_natural(&self, pos: MapPos) -> NaturalPos {
        if self.shape().is_iso() {
            let ntl_y = pos.x + pos.y - self.width();
            let ntl_x = 2 * pos.x - ntl_y;
            NaturalPos::new(ntl_x, ntl_y)
        } else {
            NaturalPos::new(pos.x, pos.y)
        }
    }

    /// Width of the map in natural coordinates. Double the native width on
    /// isometric maps, where natural X is uncompressed.
    pub fn natural_width(&self) -> i32 {
        if self.shape().is_iso() {
            2 * self.width()
        } else {
            self.width()
        }
    }

    /// Height of the map in natural coordinates.
    pub fn natural_height(&self) -> i32 {
        self.height()
    }

    /// Convert an arbitrary (possibly out-of-range) map position into its
    /// canonical in-range representative. Returns `None` when the position
    /// is off-map in a non-wrapping direction. This is the single authority
    /// on whether a position is real.
    pub fn normalize(&self, pos: MapPos) -> Option<MapPos> {
        // Normalization is best done in native coordinates
        let nat = self.map_to_native(pos);
        let nat_x = self.normalize_axis(nat.x, self.width(), self.wrap_x())?;
        let nat_y = self.normalize_axis(nat.y, self.height(), self.wrap_y())?;
        Some(self.native_to_map(NativePos::new(nat_x, nat_y)))
    }

    fn normalize_axis(
        &self,
        value: i32,
        range: i32,
        wraps: bool,
    ) -> Option<i32> {
        if wraps {
            Some(util::wrap(value, range))
        } else if (0..range).contains(&value) {
            Some(value)
        } else {
            None
        }
    }

    /// Is this map position real, i.e. does it refer to some tile on the
    /// map (possibly after wrapping)?
    pub fn is_real_pos(&self, pos: MapPos) -> bool {
        self.normalize(pos).is_some()
    }

    /// Is this map position real *and* in canonical form?
    pub fn is_normal_pos(&self, pos: MapPos) -> bool {
        self.normalize(pos) == Some(pos)
    }

    /// Find the real position nearest to the given one. Non-wrapping native
    /// axes are clamped to the map edge; wrapping axes are left to wrap,
    /// since every value is real there. Always returns a normal position.
    pub fn nearest_real_pos(&self, pos: MapPos) -> MapPos {
        let nat = self.map_to_native(pos);
        let nat_x = if self.wrap_x() {
            util::wrap(nat.x, self.width())
        } else {
            nat.x.clamp(0, self.width() - 1)
        };
        let nat_y = if self.wrap_y() {
            util::wrap(nat.y, self.height())
        } else {
            nat.y.clamp(0, self.height() - 1)
        };
        self.native_to_map(NativePos::new(nat_x, nat_y))
    }

    /// Storage index of an in-range native position. Panics if the position
    /// is out of range; this mapping is owned by the tile array layout.
    pub fn native_index(&self, pos: NativePos) -> TileIndex {
        assert!(
            (0..self.width()).contains(&pos.x)
                && (0..self.height()).contains(&pos.y),
            "native position {} out of range",
            pos
        );
        TileIndex((pos.y * self.width() + pos.x) as usize)
    }

    /// Storage index of a native position, wrapping each axis as the
    /// topology allows. `None` when out of range on a non-wrapping axis.
    pub fn checked_native_index(&self, pos: NativePos) -> Option<TileIndex> {
        let nat_x = self.normalize_axis(pos.x, self.width(), self.wrap_x())?;
        let nat_y = self.normalize_axis(pos.y, self.height(), self.wrap_y())?;
        Some(self.native_index(NativePos::new(nat_x, nat_y)))
    }

    /// Storage index of a map position, if the position is real.
    pub fn map_index(&self, pos: MapPos) -> Option<TileIndex> {
        self.checked_native_index(self.map_to_native(pos))
    }

    /// The native position a storage index refers to.
    pub fn index_to_native(&self, index: TileIndex) -> NativePos {
        assert!(index.0 < self.num_tiles(), "tile index {} out of range", index);
        let width = self.width() as usize;
        NativePos::new((index.0 % width) as i32, (index.0 / width) as i32)
    }

    /// The (normal) map position a storage index refers to.
    pub fn index_to_map(&self, index: TileIndex) -> MapPos {
        self.native_to_map(self.index_to_native(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::topology::Shape;
    use strum::IntoEnumIterator;

    fn all_topologies(width: i32, height: i32) -> Vec<Topology> {
        let mut topologies = Vec::new();
        for shape in Shape::iter() {
            for &(wrap_x, wrap_y) in &[
                (false, false),
                (true, false),
                (false, true),
                (true, true),
            ] {
                topologies.push(
                    Topology::new(shape, wrap_x, wrap_y, width, height)
                        .unwrap(),
                );
            }
        }
        topologies
    }

    #[test]
    fn test_native_round_trip() {
        for topology in all_topologies(6, 4) {
            for nat_y in 0..topology.height() {
                for nat_x in 0..topology.width() {
                    let nat = NativePos::new(nat_x, nat_y);
                    let map = topology.native_to_map(nat);
                    assert_eq!(
                        topology.map_to_native(map),
                        nat,
                        "round trip failed for {} under {:?}",
                        nat,
                        topology.shape()
                    );
                    // Positions produced from in-range native coordinates
                    // are already canonical
                    assert!(topology.is_normal_pos(map));
                }
            }
        }
    }

    #[test]
    fn test_index_round_trip() {
        for topology in all_topologies(6, 4) {
            for index in 0..topology.num_tiles() {
                let index = TileIndex(index);
                let map = topology.index_to_map(index);
                assert_eq!(topology.map_index(map), Some(index));
            }
        }
    }

    #[test]
    fn test_normalize_wrapping() {
        // 6x4, wraps in X only
        let topology =
            Topology::new(Shape::Flat, true, false, 6, 4).unwrap();

        assert_eq!(
            topology.normalize(MapPos::new(7, 2)),
            Some(MapPos::new(1, 2))
        );
        assert_eq!(
            topology.normalize(MapPos::new(-1, 0)),
            Some(MapPos::new(5, 0))
        );
        // Y doesn't wrap
        assert_eq!(topology.normalize(MapPos::new(2, 4)), None);
        assert_eq!(topology.normalize(MapPos::new(2, -1)), None);
    }

    #[test]
    fn test_nearest_real_pos() {
        let topology =
            Topology::new(Shape::Flat, true, false, 6, 4).unwrap();

        // Already-normal positions are untouched
        assert_eq!(
            topology.nearest_real_pos(MapPos::new(3, 2)),
            MapPos::new(3, 2)
        );
        // Non-wrapping axis clamps, wrapping axis wraps
        assert_eq!(
            topology.nearest_real_pos(MapPos::new(7, 9)),
            MapPos::new(1, 3)
        );
        assert_eq!(
            topology.nearest_real_pos(MapPos::new(-2, -5)),
            MapPos::new(4, 0)
        );

        for x in -8..14 {
            for y in -8..14 {
                let nearest = topology.nearest_real_pos(MapPos::new(x, y));
                assert!(topology.is_normal_pos(nearest));
            }
        }
    }

    #[test]
    fn test_natural_dimensions() {
        let flat = Topology::new(Shape::Flat, false, false, 6, 4).unwrap();
        assert_eq!(flat.natural_width(), 6);
        assert_eq!(flat.natural_height(), 4);

        let iso = Topology::new(Shape::Iso, false, false, 6, 4).unwrap();
        assert_eq!(iso.natural_width(), 12);
        assert_eq!(iso.natural_height(), 4);
    }

    #[test]
    fn test_natural_in_range() {
        for topology in all_topologies(6, 4) {
            for index in 0..topology.num_tiles() {
                let map = topology.index_to_map(TileIndex(index));
                let ntl = topology.map_to_natural(map);
                assert!((0..topology.natural_width()).contains(&ntl.x));
                assert!((0..topology.natural_height()).contains(&ntl.y));
            }
        }
    }
}
