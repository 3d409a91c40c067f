//! Start positions: per-tile records of which nations may begin the game
//! there. The nation set is dual-purpose: an allow-list normally, a
//! deny-list when the record is in excluding mode. The mutation rules below
//! let UI code toggle single nations without knowing the current polarity.

use crate::map::tile::{NationId, TileIndex};
use fnv::FnvHashSet;
use serde::{Deserialize, Serialize};

/// The highest number of nations the packed wire form can carry.
pub const MAX_NATIONS: usize = 256;

const NATION_BITSET_BYTES: usize = MAX_NATIONS / 8;

/// Which nations may start at one particular tile.
///
/// The `exclude` flag flips the meaning of the nation set: when clear the
/// set is an allow-list (and an *empty* allow-list means "anyone", see
/// [Self::allows_all]); when set it is a deny-list.
#[derive(Clone, Debug)]
pub struct StartPos {
    tile: TileIndex,
    exclude: bool,
    nations: FnvHashSet<NationId>,
}

impl StartPos {
    /// A fresh record allows every nation.
    pub(crate) fn new(tile: TileIndex) -> Self {
        Self {
            tile,
            exclude: false,
            nations: FnvHashSet::default(),
        }
    }

    /// The tile this start position is attached to
    pub fn tile(&self) -> TileIndex {
        self.tile
    }

    /// Is the nation set currently a deny-list?
    pub fn excluding(&self) -> bool {
        self.exclude
    }

    /// The nations currently in the set (allow-list or deny-list, per
    /// [Self::excluding]), in no particular order
    pub fn nations(&self) -> impl Iterator<Item = NationId> + '_ {
        self.nations.iter().copied()
    }

    /// Record that the given nation may start here. If the set is empty or
    /// already an allow-list, the nation is inserted (and excluding mode is
    /// switched off); if it is a non-empty deny-list, the nation is removed
    /// from it instead. Note that removing the last entry of the deny-list
    /// leaves an empty set still in excluding mode, so a subsequent
    /// [Self::disallow] will extend the deny-list rather than start an
    /// allow-list. Returns whether the set changed.
    pub fn allow(&mut self, nation: NationId) -> bool {
        if self.nations.is_empty() || !self.exclude {
            self.exclude = false;
            self.nations.insert(nation)
        } else {
            self.nations.remove(&nation)
        }
    }

    /// Record that the given nation may not start here. Mirror image of
    /// [Self::allow]: inserts into the deny-list (switching excluding mode
    /// on) when the set is empty or already a deny-list, removes from the
    /// allow-list otherwise. Returns whether the set changed.
    pub fn disallow(&mut self, nation: NationId) -> bool {
        if self.nations.is_empty() || self.exclude {
            self.exclude = true;
            self.nations.insert(nation)
        } else {
            self.nations.remove(&nation)
        }
    }

    /// May the given nation start here?
    pub fn is_allowed(&self, nation: NationId) -> bool {
        self.exclude != self.nations.contains(&nation)
    }

    /// Does this start position accept any nation at all? True exactly when
    /// the nation set is empty. Note the asymmetry with [Self::is_allowed]:
    /// an empty allow-list answers `false` for every specific nation but
    /// still reports `allows_all`, which callers use as "unrestricted".
    pub fn allows_all(&self) -> bool {
        self.nations.is_empty()
    }

    /// Flatten this record into its fixed-layout wire form. Panics if a
    /// nation id is beyond [MAX_NATIONS].
    pub fn pack(&self, id: u32) -> PackedStartPos {
        let mut nations = vec![0_u8; NATION_BITSET_BYTES];
        for nation in &self.nations {
            let index = usize::from(nation.0);
            assert!(index < MAX_NATIONS, "nation id {} out of range", nation);
            nations[index / 8] |= 1 << (index % 8);
        }
        PackedStartPos {
            id,
            exclude: self.exclude,
            nations,
        }
    }

    /// Replace this record's contents from a wire form.
    pub fn unpack(&mut self, packed: &PackedStartPos) {
        self.exclude = packed.exclude;
        self.nations.clear();
        for (byte_index, byte) in packed.nations.iter().enumerate() {
            for bit in 0..8 {
                if byte & (1 << bit) != 0 {
                    self.nations
                        .insert(NationId((byte_index * 8 + bit) as u16));
                }
            }
        }
    }
}

/// Fixed-layout serializable form of a [StartPos]: its registry id, the
/// excluding flag, and the nation set as a bit-vector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedStartPos {
    pub id: u32,
    pub exclude: bool,
    pub nations: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const NATION_A: NationId = NationId(0);
    const NATION_B: NationId = NationId(1);

    #[test]
    fn test_fresh_allows_all() {
        let psp = StartPos::new(TileIndex(0));
        assert!(psp.allows_all());
        assert!(!psp.excluding());
        assert!(psp.is_allowed(NATION_A));
        assert!(psp.is_allowed(NATION_B));
    }

    #[test]
    fn test_allow_then_disallow_polarity() {
        let mut psp = StartPos::new(TileIndex(0));

        // Allowing one nation turns the set into an allow-list
        assert!(psp.allow(NATION_A));
        assert!(!psp.excluding());
        assert!(psp.is_allowed(NATION_A));
        assert!(!psp.is_allowed(NATION_B));

        // Disallowing it again removes it from the allow-list; the set is
        // empty but *not* back in allow-everyone mode for specific queries
        assert!(psp.disallow(NATION_A));
        assert!(!psp.excluding());
        assert!(!psp.is_allowed(NATION_A));
        assert!(!psp.is_allowed(NATION_B));
        // ...yet allows_all still reports the set as unrestricted
        assert!(psp.allows_all());
    }

    #[test]
    fn test_disallow_then_allow_polarity() {
        let mut psp = StartPos::new(TileIndex(0));

        // Disallowing on an empty set starts a deny-list
        assert!(psp.disallow(NATION_A));
        assert!(psp.excluding());
        assert!(!psp.is_allowed(NATION_A));
        assert!(psp.is_allowed(NATION_B));

        // Allowing the denied nation removes it from the deny-list but
        // leaves excluding mode on
        assert!(psp.allow(NATION_A));
        assert!(psp.excluding());
        assert!(psp.is_allowed(NATION_A));
        assert!(psp.is_allowed(NATION_B));

        // With the set empty and excluding mode still on, a disallow
        // extends the deny-list again
        assert!(psp.disallow(NATION_B));
        assert!(psp.excluding());
        assert!(psp.is_allowed(NATION_A));
        assert!(!psp.is_allowed(NATION_B));
    }

    #[test]
    fn test_repeated_mutation_is_noop() {
        let mut psp = StartPos::new(TileIndex(0));
        assert!(psp.allow(NATION_A));
        // Already present in the allow-list
        assert!(!psp.allow(NATION_A));
        // Not present in the allow-list
        assert!(!psp.disallow(NATION_B));
    }

    #[test]
    fn test_pack_round_trip() {
        let mut psp = StartPos::new(TileIndex(5));
        psp.disallow(NationId(3));
        psp.disallow(NationId(200));

        let packed = psp.pack(7);
        assert_eq!(packed.id, 7);
        assert!(packed.exclude);

        let mut restored = StartPos::new(TileIndex(5));
        restored.unpack(&packed);
        assert!(restored.excluding());
        let mut nations: Vec<_> = restored.nations().collect();
        nations.sort();
        assert_eq!(nations, vec![NationId(3), NationId(200)]);
        assert!(!restored.is_allowed(NationId(3)));
        assert!(restored.is_allowed(NationId(4)));
    }
}
