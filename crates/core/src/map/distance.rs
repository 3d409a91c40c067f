//! Distance metrics over map positions. All of these respect wrapping (the
//! measured vector is always a shortest representative) and hexness (on hex
//! grids one diagonal axis has no single-step move, which changes what
//! "real" distance means).

use crate::{
    map::coords::{MapPos, NativePos},
    map::topology::Topology,
    util,
};
use std::cmp;

impl Topology {
    /// The `(dx, dy)` map-space offset from `from` to `to`, chosen to be a
    /// shortest representative under wrapping. With the standard wrapping-X
    /// topology the result satisfies `-width/2 <= dx < width/2`.
    pub fn distance_vector(&self, from: MapPos, to: MapPos) -> (i32, i32) {
        if self.wrap_x() || self.wrap_y() {
            // Wrapping is done in native coordinates, where each axis wraps
            // independently
            let nat0 = self.map_to_native(from);
            let nat1 = self.map_to_native(to);
            let mut dx = nat1.x - nat0.x;
            let mut dy = nat1.y - nat0.y;
            if self.wrap_x() {
                // Wrap dx into [-width/2, width/2)
                dx = util::wrap(dx + self.width() / 2, self.width())
                    - self.width() / 2;
            }
            if self.wrap_y() {
                dy = util::wrap(dy + self.height() / 2, self.height())
                    - self.height() / 2;
            }

            // Convert the native delta back to a pair of map positions and
            // take the final difference there
            let from = self.native_to_map(nat0);
            let to =
                self.native_to_map(NativePos::new(nat0.x + dx, nat0.y + dy));
            (to.x - from.x, to.y - from.y)
        } else {
            (to.x - from.x, to.y - from.y)
        }
    }

    /// The "real" distance a given vector covers: the number of single-tile
    /// steps needed to traverse it. On non-hex grids this is the Chebyshev
    /// distance. On hex grids one diagonal has no single-step move (which
    /// one depends on isometry), so vectors along it cost the full
    /// Manhattan distance.
    pub fn vector_real_distance(&self, dx: i32, dy: i32) -> i32 {
        if self.shape().is_hex() {
            let blocked = if self.shape().is_iso() {
                // Iso-hex: no NE/SW move, so mixed-sign diagonals are
                // blocked
                dx.signum() * dy.signum() < 0
            } else {
                // Hex: no SE/NW move, so same-sign diagonals are blocked
                dx.signum() * dy.signum() > 0
            };
            if blocked {
                dx.abs() + dy.abs()
            } else {
                cmp::max(dx.abs(), dy.abs())
            }
        } else {
            cmp::max(dx.abs(), dy.abs())
        }
    }

    /// The squared distance of a vector. On hex grids the Euclidean form
    /// would disagree with the non-Euclidean metric, so the squared real
    /// distance is used instead.
    pub fn vector_sq_distance(&self, dx: i32, dy: i32) -> i32 {
        if self.shape().is_hex() {
            let dist = self.vector_real_distance(dx, dy);
            dist * dist
        } else {
            dx * dx + dy * dy
        }
    }

    /// Number of unit steps between two positions. Symmetric: when a
    /// wrapped axis admits two equally-short vector representatives (offset
    /// of exactly half the wrap size), the cheaper one under the hex metric
    /// is used.
    pub fn real_distance(&self, from: MapPos, to: MapPos) -> i32 {
        let (dx, dy) = self.distance_vector(from, to);
        let mut dist = self.vector_real_distance(dx, dy);
        if self.shape().is_hex() {
            // The sign of a half-size offset is arbitrary, but hex metrics
            // care about sign interplay between the axes
            let tie_x = self.wrap_x() && dx.abs() * 2 == self.width();
            let tie_y = self.wrap_y() && dy.abs() * 2 == self.height();
            if tie_x {
                dist = cmp::min(dist, self.vector_real_distance(-dx, dy));
            }
            if tie_y {
                dist = cmp::min(dist, self.vector_real_distance(dx, -dy));
            }
            if tie_x && tie_y {
                dist = cmp::min(dist, self.vector_real_distance(-dx, -dy));
            }
        }
        dist
    }

    /// Manhattan-style distance between two positions. On hex grids every
    /// valid direction is cardinal, so this coincides with the real
    /// distance there. Rarely what you want; prefer [Self::real_distance].
    pub fn distance(&self, from: MapPos, to: MapPos) -> i32 {
        if self.shape().is_hex() {
            self.real_distance(from, to)
        } else {
            let (dx, dy) = self.distance_vector(from, to);
            dx.abs() + dy.abs()
        }
    }

    /// Squared distance between two positions. See
    /// [Self::vector_sq_distance].
    pub fn sq_distance(&self, from: MapPos, to: MapPos) -> i32 {
        if self.shape().is_hex() {
            let dist = self.real_distance(from, to);
            dist * dist
        } else {
            let (dx, dy) = self.distance_vector(from, to);
            dx * dx + dy * dy
        }
    }

    /// Are the two positions exactly one step apart?
    pub fn is_adjacent(&self, from: MapPos, to: MapPos) -> bool {
        self.real_distance(from, to) == 1
    }
}
