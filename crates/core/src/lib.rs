//! Meridian is the map/topology engine for a turn-based strategy game. It
//! answers the geometric questions the rest of the game asks — which tiles
//! exist, which are adjacent, how far apart two tiles are, how "polar" a
//! tile is — consistently across rectangular, hexagonal, and isometric
//! grids with any combination of X/Y wrapping. Simulation rules, rendering,
//! and networking live elsewhere.
//!
//! ```
//! use meridian::{Map, MapConfig, Shape};
//!
//! let config = MapConfig {
//!     shape: Shape::Hex,
//!     width: 64,
//!     height: 32,
//!     ..MapConfig::default()
//! };
//! let map = Map::new(config).unwrap();
//! assert_eq!(map.num_tiles(), 64 * 32);
//! // From here you can look up tiles, walk neighbours, measure distances.
//! ```
//!
//! See [MapConfig] for the supported topology options.

mod config;
mod map;
mod util;

pub use crate::{
    config::MapConfig,
    map::{
        coords::{MapPos, NativePos, NaturalPos},
        direction::Direction,
        latitude::LATITUDE_BOUND,
        outward::OutwardOffset,
        startpos::{PackedStartPos, StartPos, MAX_NATIONS},
        tile::{
            ContinentId, ExtraId, ExtraSet, NationId, PlayerId, TerrainId,
            Tile, TileIndex, UnitId, MAX_EXTRAS,
        },
        topology::{
            Shape, Topology, MAX_LINEAR_SIZE, MAX_TILES, MIN_LINEAR_SIZE,
            MIN_TILES,
        },
        Map, StartPosMap,
    },
};
