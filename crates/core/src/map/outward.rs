//! The precomputed "iterate outward" table: every map-space offset a search
//! could ever need, sorted by ascending real distance. Search code walks
//! this table to visit tiles in strictly non-decreasing distance order
//! without re-deriving offsets per query.

use crate::map::{coords::NativePos, topology::Topology};
use serde::{Deserialize, Serialize};

/// One entry of the iterate-outward table: a map-space offset and its real
/// distance from the (implicit) center.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutwardOffset {
    pub dx: i32,
    pub dy: i32,
    pub dist: i32,
}

/// Build the outward table for a topology. The offsets enumerate, exactly
/// once each, every native position in the explorable bounding box around
/// the map center: a wrapping axis only needs its own size (every tile is
/// within half a wrap of the center in either direction), while a
/// non-wrapping axis needs almost double that, since a search may start at
/// one edge and reach the other. Offsets that fall off a particular map are
/// skipped at iteration time by position normalization, not here.
///
/// Entries are sorted by distance; ties keep their generation order, which
/// is deterministic but not part of the contract.
pub(crate) fn generate_outward_offsets(
    topology: &Topology,
) -> Vec<OutwardOffset> {
    // The center is an arbitrary anchor: offsets computed against it are
    // valid anywhere because the native-to-map transform preserves
    // differences up to the per-row stagger, which the bounding box covers
    let center = NativePos::new(topology.width() / 2, topology.height() / 2);
    let map_center = topology.native_to_map(center);

    let (nat_min_x, nat_max_x) = if topology.wrap_x() {
        (0, topology.width() - 1)
    } else {
        (center.x - topology.width() + 1, center.x + topology.width() - 1)
    };
    let (nat_min_y, nat_max_y) = if topology.wrap_y() {
        (0, topology.height() - 1)
    } else {
        (
            center.y - topology.height() + 1,
            center.y + topology.height() - 1,
        )
    };

    let size = (nat_max_x - nat_min_x + 1) as usize
        * (nat_max_y - nat_min_y + 1) as usize;
    let mut offsets = Vec::with_capacity(size);
    for nat_x in nat_min_x..=nat_max_x {
        for nat_y in nat_min_y..=nat_max_y {
            let map_pos =
                topology.native_to_map(NativePos::new(nat_x, nat_y));
            let dx = map_pos.x - map_center.x;
            let dy = map_pos.y - map_center.y;
            offsets.push(OutwardOffset {
                dx,
                dy,
                dist: topology.vector_real_distance(dx, dy),
            });
        }
    }
    assert_eq!(offsets.len(), size);

    // Stable sort; equal distances keep generation order
    offsets.sort_by_key(|offset| offset.dist);
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::topology::Shape;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    #[test]
    fn test_monotone_distance() {
        for shape in Shape::iter() {
            for &(wrap_x, wrap_y) in
                &[(false, false), (true, false), (true, true)]
            {
                let topology =
                    Topology::new(shape, wrap_x, wrap_y, 8, 8).unwrap();
                let offsets = generate_outward_offsets(&topology);
                for pair in offsets.windows(2) {
                    assert!(
                        pair[0].dist <= pair[1].dist,
                        "distance went backwards under {:?}",
                        shape
                    );
                }
            }
        }
    }

    #[test]
    fn test_completeness_unwrapped() {
        // Non-wrapping 5x5: the bounding box is 9x9 offsets around the
        // center, each appearing exactly once with its real distance
        let topology = Topology::new(Shape::Flat, false, false, 5, 5).unwrap();
        let offsets = generate_outward_offsets(&topology);
        assert_eq!(offsets.len(), 81);

        let mut seen = HashSet::new();
        for offset in &offsets {
            assert!((-4..=4).contains(&offset.dx));
            assert!((-4..=4).contains(&offset.dy));
            assert!(
                seen.insert((offset.dx, offset.dy)),
                "duplicate offset ({}, {})",
                offset.dx,
                offset.dy
            );
            assert_eq!(
                offset.dist,
                topology.vector_real_distance(offset.dx, offset.dy)
            );
        }
        for dx in -4..=4 {
            for dy in -4..=4 {
                assert!(seen.contains(&(dx, dy)));
            }
        }
    }

    #[test]
    fn test_wrapping_shrinks_table() {
        let unwrapped =
            Topology::new(Shape::Flat, false, false, 8, 8).unwrap();
        let wrapped = Topology::new(Shape::Flat, true, true, 8, 8).unwrap();
        assert_eq!(generate_outward_offsets(&unwrapped).len(), 15 * 15);
        assert_eq!(generate_outward_offsets(&wrapped).len(), 8 * 8);
    }

    #[test]
    fn test_first_entry_is_center() {
        let topology = Topology::new(Shape::Flat, true, true, 8, 8).unwrap();
        let offsets = generate_outward_offsets(&topology);
        assert_eq!(offsets[0], OutwardOffset { dx: 0, dy: 0, dist: 0 });
    }
}
