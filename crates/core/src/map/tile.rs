//! Tiles and the small id types the simulation layers use to refer to
//! rulesets entities from a tile. The map engine doesn't know what a
//! terrain or an extra *is*; it only stores and hands back the ids.

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Dense storage index of a tile. Assigned when the map is allocated and
/// never reused; every non-owning reference to a tile is one of these.
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    From,
    Into,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
pub struct TileIndex(pub usize);

/// Id of a terrain type, assigned by the ruleset
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    From,
    Into,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
pub struct TerrainId(pub u16);

/// Id of an extra (tile improvement, resource, etc.), assigned by the
/// ruleset
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    From,
    Into,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
pub struct ExtraId(pub u16);

/// Id of a nation
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    From,
    Into,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
pub struct NationId(pub u16);

/// Id of a player
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    From,
    Into,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
pub struct PlayerId(pub u16);

/// Id of a unit
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    From,
    Into,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
pub struct UnitId(pub u32);

/// Continent assignment of a tile. Zero means unassigned; positive ids are
/// continents, negative ids are oceans.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    From,
    Into,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
pub struct ContinentId(pub i32);

impl ContinentId {
    pub const NONE: Self = Self(0);

    pub fn is_assigned(self) -> bool {
        self.0 != 0
    }

    pub fn is_ocean(self) -> bool {
        self.0 < 0
    }
}

/// The highest number of distinct extras a ruleset can define.
pub const MAX_EXTRAS: usize = 128;

/// A fixed-capacity bitset recording which extras are present on a tile.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraSet([u64; MAX_EXTRAS / 64]);

impl ExtraSet {
    pub fn contains(&self, extra: ExtraId) -> bool {
        let index = usize::from(extra.0);
        assert!(index < MAX_EXTRAS, "extra id {} out of range", extra);
        self.0[index / 64] & (1 << (index % 64)) != 0
    }

    pub fn insert(&mut self, extra: ExtraId) {
        let index = usize::from(extra.0);
        assert!(index < MAX_EXTRAS, "extra id {} out of range", extra);
        self.0[index / 64] |= 1 << (index % 64);
    }

    pub fn remove(&mut self, extra: ExtraId) {
        let index = usize::from(extra.0);
        assert!(index < MAX_EXTRAS, "extra id {} out of range", extra);
        self.0[index / 64] &= !(1 << (index % 64));
    }

    pub fn clear(&mut self) {
        self.0 = [0; MAX_EXTRAS / 64];
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|word| *word == 0)
    }

    /// Iterate the extras in this set in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = ExtraId> + '_ {
        (0..MAX_EXTRAS as u16)
            .map(ExtraId)
            .filter(move |extra| self.contains(*extra))
    }
}

/// One cell of the map grid. Tiles are allocated in a single contiguous
/// block when the map is created, start out empty, and live until the whole
/// map is dropped. The map exclusively owns tile storage; everything else
/// holds a [TileIndex].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tile {
    index: TileIndex,
    terrain: Option<TerrainId>,
    resource: Option<ExtraId>,
    extras: ExtraSet,
    continent: ContinentId,
    owner: Option<PlayerId>,
    units: Vec<UnitId>,
    altitude: i32,
    label: Option<String>,
}

impl Tile {
    /// Create an empty tile at the given storage index.
    pub(crate) fn new(index: TileIndex) -> Self {
        Self {
            index,
            terrain: None,
            resource: None,
            extras: ExtraSet::default(),
            continent: ContinentId::NONE,
            owner: None,
            units: Vec::new(),
            altitude: 0,
            label: None,
        }
    }

    pub fn index(&self) -> TileIndex {
        self.index
    }

    /// The terrain of this tile, or `None` while unknown
    pub fn terrain(&self) -> Option<TerrainId> {
        self.terrain
    }

    pub fn set_terrain(&mut self, terrain: Option<TerrainId>) {
        self.terrain = terrain;
    }

    /// The resource on this tile, if any
    pub fn resource(&self) -> Option<ExtraId> {
        self.resource
    }

    pub fn set_resource(&mut self, resource: Option<ExtraId>) {
        self.resource = resource;
    }

    pub fn extras(&self) -> &ExtraSet {
        &self.extras
    }

    pub fn has_extra(&self, extra: ExtraId) -> bool {
        self.extras.contains(extra)
    }

    pub fn add_extra(&mut self, extra: ExtraId) {
        self.extras.insert(extra);
    }

    pub fn remove_extra(&mut self, extra: ExtraId) {
        self.extras.remove(extra);
    }

    pub fn continent(&self) -> ContinentId {
        self.continent
    }

    pub fn set_continent(&mut self, continent: ContinentId) {
        self.continent = continent;
    }

    /// The player owning this tile, or `None` if unclaimed
    pub fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    pub fn set_owner(&mut self, owner: Option<PlayerId>) {
        self.owner = owner;
    }

    /// The units currently occupying this tile
    pub fn units(&self) -> &[UnitId] {
        &self.units
    }

    pub fn add_unit(&mut self, unit: UnitId) {
        if !self.units.contains(&unit) {
            self.units.push(unit);
        }
    }

    /// Remove a unit from this tile. Returns whether it was present.
    pub fn remove_unit(&mut self, unit: UnitId) -> bool {
        match self.units.iter().position(|present| *present == unit) {
            Some(index) => {
                self.units.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn altitude(&self) -> i32 {
        self.altitude
    }

    pub fn set_altitude(&mut self, altitude: i32) {
        self.altitude = altitude;
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tile() {
        let tile = Tile::new(TileIndex(3));
        assert_eq!(tile.index(), TileIndex(3));
        assert_eq!(tile.terrain(), None);
        assert_eq!(tile.resource(), None);
        assert!(tile.extras().is_empty());
        assert!(!tile.continent().is_assigned());
        assert_eq!(tile.owner(), None);
        assert!(tile.units().is_empty());
        assert_eq!(tile.altitude(), 0);
        assert_eq!(tile.label(), None);
    }

    #[test]
    fn test_extra_set() {
        let mut extras = ExtraSet::default();
        assert!(extras.is_empty());

        extras.insert(ExtraId(0));
        extras.insert(ExtraId(77));
        assert!(extras.contains(ExtraId(0)));
        assert!(extras.contains(ExtraId(77)));
        assert!(!extras.contains(ExtraId(1)));
        assert_eq!(
            extras.iter().collect::<Vec<_>>(),
            vec![ExtraId(0), ExtraId(77)]
        );

        extras.remove(ExtraId(0));
        assert!(!extras.contains(ExtraId(0)));
        extras.clear();
        assert!(extras.is_empty());
    }

    #[test]
    fn test_units() {
        let mut tile = Tile::new(TileIndex(0));
        tile.add_unit(UnitId(1));
        tile.add_unit(UnitId(2));
        // Adding the same unit twice is a no-op
        tile.add_unit(UnitId(1));
        assert_eq!(tile.units(), &[UnitId(1), UnitId(2)]);

        assert!(tile.remove_unit(UnitId(1)));
        assert!(!tile.remove_unit(UnitId(1)));
        assert_eq!(tile.units(), &[UnitId(2)]);
    }

    #[test]
    fn test_continent_signs() {
        assert!(!ContinentId::NONE.is_assigned());
        assert!(ContinentId(4).is_assigned());
        assert!(!ContinentId(4).is_ocean());
        assert!(ContinentId(-2).is_assigned());
        assert!(ContinentId(-2).is_ocean());
    }
}
