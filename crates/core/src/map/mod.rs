pub mod coords;
pub mod direction;
mod distance;
pub mod latitude;
pub mod outward;
pub mod startpos;
pub mod tile;
pub mod topology;

use crate::{
    config::MapConfig,
    map::{
        coords::{MapPos, NativePos},
        direction::Direction,
        latitude::relative_southness,
        outward::{generate_outward_offsets, OutwardOffset},
        startpos::StartPos,
        tile::{Tile, TileIndex},
        topology::Topology,
    },
    timed,
};
use anyhow::Context;
use fnv::FnvBuildHasher;
use indexmap::IndexMap;
use log::info;
use rand::Rng;
use validator::Validate;

/// The start-position registry: tile → record, in insertion order.
pub type StartPosMap = IndexMap<TileIndex, StartPos, FnvBuildHasher>;

/// A game map: a topology, the tiles living on it, the start-position
/// registry, and the precomputed outward search table.
///
/// A map is allocated in one step by [Map::new] and torn down by dropping
/// it; tiles are never added, removed, or moved after that. Tile *contents*
/// are mutable through [Map::tile_mut]. Servers and clients each build
/// their own `Map` value; nothing here is process-global, so maps with
/// different topologies can coexist.
#[derive(Clone, Debug)]
pub struct Map {
    /// The config this map was built from. Immutable once the map exists.
    config: MapConfig,
    topology: Topology,
    tiles: Vec<Tile>,
    startposes: StartPosMap,
    outward_offsets: Vec<OutwardOffset>,
}

impl Map {
    /// Build a map from a config: validate it, set up the topology and its
    /// direction tables, allocate every tile (initially empty), and
    /// precompute the outward search table. Returns an error if the config
    /// is invalid; a constructed map always satisfies every topology
    /// invariant.
    pub fn new(config: MapConfig) -> anyhow::Result<Self> {
        config.validate().context("invalid map config")?;
        let topology = Topology::new(
            config.shape,
            config.wrap_x,
            config.wrap_y,
            i32::from(config.width),
            i32::from(config.height),
        )?;

        info!(
            "Allocating a {}x{} {:?} map ({} tiles)",
            topology.width(),
            topology.height(),
            topology.shape(),
            topology.num_tiles()
        );
        let tiles = (0..topology.num_tiles())
            .map(|index| Tile::new(TileIndex(index)))
            .collect();
        let outward_offsets = timed!(
            "Outward index generation",
            generate_outward_offsets(&topology)
        );

        Ok(Self {
            config,
            topology,
            tiles,
            startposes: StartPosMap::default(),
            outward_offsets,
        })
    }

    /// Get a reference to the config that defines this map.
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Get the topology of this map. All coordinate math is available
    /// directly on the topology; the map-level methods below are
    /// conveniences that operate on tiles instead of positions.
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Total number of tiles on the map
    pub fn num_tiles(&self) -> usize {
        self.tiles.len()
    }

    /// Iterate every tile on the map, in storage (native row-major) order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Iterate every tile mutably, in storage order.
    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.tiles.iter_mut()
    }

    /// Get the tile at the given storage index. Panics if the index is out
    /// of range; indices only come from this map, so that indicates a bug.
    pub fn tile(&self, index: TileIndex) -> &Tile {
        &self.tiles[index.0]
    }

    /// Get the tile at the given storage index, mutably.
    pub fn tile_mut(&mut self, index: TileIndex) -> &mut Tile {
        &mut self.tiles[index.0]
    }

    /// The canonical map position of a tile.
    pub fn pos_of(&self, tile: &Tile) -> MapPos {
        self.topology.index_to_map(tile.index())
    }

    /// Look up the tile at a map position. `None` when the position is
    /// off-map in a non-wrapping direction; that's a routine outcome at map
    /// edges, not an error.
    pub fn tile_at(&self, pos: MapPos) -> Option<&Tile> {
        self.topology.map_index(pos).map(|index| self.tile(index))
    }

    /// Look up the tile at a native position, wrapping as the topology
    /// allows.
    pub fn tile_at_native(&self, pos: NativePos) -> Option<&Tile> {
        self.topology
            .checked_native_index(pos)
            .map(|index| self.tile(index))
    }

    /// The tile one step from `tile` in the given direction. `None` if the
    /// direction is not valid under this topology, or if the step leaves
    /// the map.
    pub fn step(&self, tile: &Tile, dir: Direction) -> Option<&Tile> {
        if !self.topology.is_valid_dir(dir) {
            return None;
        }
        self.tile_at(self.pos_of(tile).step(dir))
    }

    /// Iterate the tiles adjacent to `tile`, each paired with the valid
    /// direction leading to it.
    pub fn adjacent_with_dir<'a>(
        &'a self,
        tile: &Tile,
    ) -> impl Iterator<Item = (Direction, &'a Tile)> + 'a {
        let pos = self.pos_of(tile);
        self.topology.valid_dirs().iter().filter_map(move |&dir| {
            self.tile_at(pos.step(dir)).map(|tile| (dir, tile))
        })
    }

    /// Iterate the tiles adjacent to `tile`.
    pub fn adjacent<'a>(
        &'a self,
        tile: &Tile,
    ) -> impl Iterator<Item = &'a Tile> + 'a {
        self.adjacent_with_dir(tile).map(|(_, tile)| tile)
    }

    /// Iterate the cardinally-adjacent tiles of `tile` (those across a tile
    /// edge).
    pub fn cardinal_adjacent<'a>(
        &'a self,
        tile: &Tile,
    ) -> impl Iterator<Item = &'a Tile> + 'a {
        let pos = self.pos_of(tile);
        self.topology
            .cardinal_dirs()
            .iter()
            .filter_map(move |&dir| self.tile_at(pos.step(dir)))
    }

    /// Iterate all tiles within `max_dist` real distance of `center`
    /// (inclusive, including `center` itself), in non-decreasing distance
    /// order. Backed by the precomputed outward table, so each query is
    /// just a walk over normalized offsets.
    pub fn outward_from<'a>(
        &'a self,
        center: &Tile,
        max_dist: i32,
    ) -> impl Iterator<Item = &'a Tile> + 'a {
        let pos = self.pos_of(center);
        self.outward_offsets
            .iter()
            .take_while(move |offset| offset.dist <= max_dist)
            .filter_map(move |offset| {
                self.tile_at(MapPos::new(pos.x + offset.dx, pos.y + offset.dy))
            })
    }

    /// Iterate all tiles in the square of the given radius around `center`
    /// (including `center`), row by row. Off-map positions are skipped.
    pub fn square_around<'a>(
        &'a self,
        center: &Tile,
        radius: i32,
    ) -> impl Iterator<Item = &'a Tile> + 'a {
        let pos = self.pos_of(center);
        (-radius..=radius)
            .flat_map(move |dy| {
                (-radius..=radius).map(move |dx| (dx, dy))
            })
            .filter_map(move |(dx, dy)| {
                self.tile_at(MapPos::new(pos.x + dx, pos.y + dy))
            })
    }

    /// The raw outward table: every offset a search could need, sorted by
    /// ascending real distance.
    pub fn outward_offsets(&self) -> &[OutwardOffset] {
        &self.outward_offsets
    }

    /// Shortest map-space vector from one tile to another. See
    /// [Topology::distance_vector].
    pub fn distance_vector(&self, from: &Tile, to: &Tile) -> (i32, i32) {
        self.topology
            .distance_vector(self.pos_of(from), self.pos_of(to))
    }

    /// Number of unit steps between two tiles.
    pub fn real_distance(&self, from: &Tile, to: &Tile) -> i32 {
        self.topology.real_distance(self.pos_of(from), self.pos_of(to))
    }

    /// Manhattan-style distance between two tiles.
    pub fn distance(&self, from: &Tile, to: &Tile) -> i32 {
        self.topology.distance(self.pos_of(from), self.pos_of(to))
    }

    /// Squared distance between two tiles.
    pub fn sq_distance(&self, from: &Tile, to: &Tile) -> i32 {
        self.topology.sq_distance(self.pos_of(from), self.pos_of(to))
    }

    /// Are the two tiles exactly one step apart?
    pub fn is_adjacent(&self, from: &Tile, to: &Tile) -> bool {
        self.real_distance(from, to) == 1
    }

    /// The direction of the step from `from` to `to`, if the two tiles are
    /// one valid step apart.
    pub fn direction_for_step(
        &self,
        from: &Tile,
        to: &Tile,
    ) -> Option<Direction> {
        self.adjacent_with_dir(from)
            .find(|(_, tile)| tile.index() == to.index())
            .map(|(dir, _)| dir)
    }

    /// Is the move between these two adjacent tiles a cardinal one (across
    /// a tile edge)?
    pub fn is_move_cardinal(&self, from: &Tile, to: &Tile) -> bool {
        let pos = self.pos_of(from);
        self.topology.cardinal_dirs().iter().any(|&dir| {
            self.tile_at(pos.step(dir))
                .map_or(false, |tile| tile.index() == to.index())
        })
    }

    /// Is this tile close enough to a non-wrapping map edge that an area of
    /// radius `dist` around it gets truncated? Search and placement code
    /// uses this to avoid positions with an abnormal neighbourhood.
    pub fn is_singular(&self, tile: &Tile, dist: i32) -> bool {
        let ntl = self.topology.map_to_natural(self.pos_of(tile));
        // Natural coordinates are doubled in scale on iso maps
        let dist = if self.topology.shape().is_iso() {
            dist * 2
        } else {
            dist
        };
        (!self.topology.wrap_x()
            && (ntl.x < dist
                || ntl.x >= self.topology.natural_width() - dist))
            || (!self.topology.wrap_y()
                && (ntl.y < dist
                    || ntl.y >= self.topology.natural_height() - dist))
    }

    /// A uniformly random tile.
    pub fn rand_tile<'a>(&'a self, rng: &mut impl Rng) -> &'a Tile {
        self.tile(TileIndex(rng.gen_range(0..self.num_tiles())))
    }

    /// A uniformly random (normal) map position.
    pub fn rand_pos(&self, rng: &mut impl Rng) -> MapPos {
        let nat = NativePos::new(
            rng.gen_range(0..self.topology.width()),
            rng.gen_range(0..self.topology.height()),
        );
        self.topology.native_to_map(nat)
    }

    /// A random tile adjacent to the given one. Each existing neighbour is
    /// picked with equal probability. `None` only if the tile has no
    /// neighbours at all, which no supported topology produces.
    pub fn rand_neighbour<'a>(
        &'a self,
        rng: &mut impl Rng,
        tile: &Tile,
    ) -> Option<&'a Tile> {
        let mut dirs = Direction::ALL;
        // Shrinking-pool pick: a failed direction is replaced by the last
        // candidate, so this needs at most 8 draws
        let mut remaining = dirs.len();
        while remaining > 0 {
            let choice = rng.gen_range(0..remaining);
            if let Some(neighbour) = self.step(tile, dirs[choice]) {
                return Some(neighbour);
            }
            dirs[choice] = dirs[remaining - 1];
            remaining -= 1;
        }
        None
    }

    /// A random tile for which `filter` returns true. Samples up to
    /// `num_tiles / 10` candidates; if none passes, falls back to
    /// enumerating every matching tile and picking among those, so this
    /// only returns `None` when no tile on the map passes the filter.
    pub fn rand_tile_filtered<'a>(
        &'a self,
        rng: &mut impl Rng,
        filter: impl Fn(&Tile) -> bool,
    ) -> Option<&'a Tile> {
        let max_tries = (self.num_tiles() / 10).max(1);
        for _ in 0..max_tries {
            let tile = self.rand_tile(rng);
            if filter(tile) {
                return Some(tile);
            }
        }

        // Slow but reliable
        let candidates: Vec<&Tile> =
            self.tiles.iter().filter(|tile| filter(tile)).collect();
        if candidates.is_empty() {
            None
        } else {
            Some(candidates[rng.gen_range(0..candidates.len())])
        }
    }

    /// Signed latitude of a tile, in `[south_latitude, north_latitude]`.
    /// Northernmost tiles get `north_latitude`, southernmost get
    /// `south_latitude`; see [latitude](crate::map::latitude) for how
    /// "north" depends on the wrap configuration.
    pub fn signed_latitude(&self, tile: &Tile) -> i32 {
        let north = self.config.north_latitude;
        let south = self.config.south_latitude;
        // Single-latitude map; no need to examine the tile
        if north == south {
            return south;
        }

        let southness = relative_southness(&self.topology, self.pos_of(tile));
        (f64::from(north) * (1.0 - southness)
            + f64::from(south) * southness) as i32
    }

    /// Create a start position at the given tile, replacing any existing
    /// record there. The fresh record allows every nation.
    pub fn startpos_new(&mut self, tile: TileIndex) -> &mut StartPos {
        assert!(tile.0 < self.tiles.len(), "tile index {} out of range", tile);
        self.startposes.insert(tile, StartPos::new(tile));
        // Can't fail, we just inserted it
        self.startposes.get_mut(&tile).unwrap()
    }

    /// The start position at the given tile, if any.
    pub fn startpos(&self, tile: TileIndex) -> Option<&StartPos> {
        self.startposes.get(&tile)
    }

    /// The start position at the given tile, mutably.
    pub fn startpos_mut(&mut self, tile: TileIndex) -> Option<&mut StartPos> {
        self.startposes.get_mut(&tile)
    }

    /// Remove the start position at the given tile. Returns whether one
    /// existed.
    pub fn remove_startpos(&mut self, tile: TileIndex) -> bool {
        self.startposes.shift_remove(&tile).is_some()
    }

    /// Number of registered start positions
    pub fn startpos_count(&self) -> usize {
        self.startposes.len()
    }

    /// Iterate all start positions, in creation order.
    pub fn startposes(&self) -> impl Iterator<Item = &StartPos> {
        self.startposes.values()
    }
}
