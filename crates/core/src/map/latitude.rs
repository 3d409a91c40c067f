//! The latitude projection used by climate generation. Latitude is a
//! linear function of position on maps with a non-wrapping axis; on a torus
//! there is no edge to act as a pole, so a custom projection folds the map
//! through its 8-fold symmetry instead.

use crate::map::{coords::MapPos, topology::Topology};

/// Magnitude bound for configured latitudes. A map configured with
/// `north_latitude = LATITUDE_BOUND` and `south_latitude = -LATITUDE_BOUND`
/// spans pole to pole.
pub const LATITUDE_BOUND: i32 = 1000;

/// How far south a position is, as a fraction in `[0.0, 1.0]`: `0.0` at the
/// northernmost point of the map and `1.0` at the southernmost.
///
/// Computed in natural coordinates, since those are the display-oriented
/// ones ("north" is a visual notion):
///
/// - If Y does not wrap, the north pole is the entire `y = 0` edge
///   (Mercator).
/// - If only Y wraps, east and west take the role of the poles; same
///   projection with the axes swapped.
/// - If both axes wrap (torus), the poles are single points: north at the
///   middle of the `y = 0` row, south half the map away in both directions.
///   The four corners and the map center all sit on the equator.
pub(crate) fn relative_southness(topology: &Topology, pos: MapPos) -> f64 {
    let ntl = topology.map_to_natural(pos);
    let width = topology.natural_width();
    let height = topology.natural_height();

    if !topology.wrap_y() {
        return f64::from(ntl.y) / f64::from(height - 1);
    }
    if !topology.wrap_x() {
        return f64::from(ntl.x) / f64::from(width - 1);
    }

    // Torus. Fold the map into one quarter, exploiting that the projection
    // is symmetric across both the vertical and the horizontal midline;
    // x and y end up in [0.0, 1.0] with the map corner at (0, 0) and the
    // map center at (1, 1).
    let x = fold(ntl.x, width);
    let y = fold(ntl.y, height);

    // Flip x so the north pole lands on (0, 0) and the south pole on
    // (1, 1), with the equator on the anti-diagonal between them
    let x = 1.0 - x;

    // Fold once more, along the equator, onto the north triangle. The
    // remembered side picks which hemisphere the colatitude applies to.
    let southern = x + y > 1.0;
    let (x, y) = if southern { (1.0 - x, 1.0 - y) } else { (x, y) };

    // Relative colatitude: 0 at the pole, 1 at the equator. Near the pole
    // the isolines are quarter circles; at the equator the isoline must be
    // the straight diagonal. Blending the two by the manhattan distance
    // itself keeps the area enclosed by an isoline growing quadratically
    // with distance from the pole, matching non-toroidal maps.
    let manhattan = x + y;
    let circular = 1.5 * (x * x + y * y);
    let colatitude =
        (1.0 - manhattan) * circular + manhattan * (manhattan * manhattan);

    if southern {
        1.0 - colatitude / 2.0
    } else {
        colatitude / 2.0
    }
}

/// Fold a natural coordinate across the midline of its axis, normalized to
/// `[0.0, 1.0]`: 0 at either map edge, 1 in the middle.
fn fold(value: i32, dimension: i32) -> f64 {
    let half = dimension / 2 - 1;
    let folded = if value > half { dimension - 1 - value } else { value };
    f64::from(folded) / f64::from(half)
}
