//! Discrete (classified-data) interpolation inside grid cells.
//!
//! Identical to nearest-neighbour interpolation except for the special
//! case of a cell carrying exactly two distinct values with one of
//! them in a single corner: that corner is cut straight across between
//! the adjacent edge midpoints, giving rounded class boundaries
//! instead of staircase notches.

use super::nearest::blocky_triangle_fill;
use super::{place_band, Corner, Interpolation, Place};
use crate::edge::Edge;
use crate::flip_grid::FlipGrid;
use crate::flip_set::FlipSet;
use crate::missing::Missing;

/// Interpolation for discrete class data.
#[derive(Debug, Clone, Copy)]
pub struct Discrete {
    missing: Missing,
}

impl Discrete {
    pub fn new(missing: Missing) -> Self {
        Self { missing }
    }
}

impl Default for Discrete {
    fn default() -> Self {
        Self::new(Missing::Nan)
    }
}

impl Interpolation for Discrete {
    fn missing(&self) -> Missing {
        self.missing
    }

    fn rectangle_fill(
        &self,
        corners: [Corner; 4],
        _cell: (usize, usize),
        lo: Option<f64>,
        hi: Option<f64>,
        flipset: &mut FlipSet,
        _flipgrid: &mut FlipGrid,
    ) {
        let lo = lo.unwrap_or(f64::NAN);
        let hi = hi.unwrap_or(f64::NAN);
        let [p1, p2, p3, p4] = corners;

        if self.missing.is_missing(p1.z) {
            blocky_triangle_fill(self.missing, [p2, p3, p4], lo, hi, flipset);
            return;
        }
        if self.missing.is_missing(p2.z) {
            blocky_triangle_fill(self.missing, [p1, p3, p4], lo, hi, flipset);
            return;
        }
        if self.missing.is_missing(p3.z) {
            blocky_triangle_fill(self.missing, [p1, p2, p4], lo, hi, flipset);
            return;
        }
        if self.missing.is_missing(p4.z) {
            blocky_triangle_fill(self.missing, [p1, p2, p3], lo, hi, flipset);
            return;
        }

        let c1 = place_band(p1.z, lo, hi);
        let c2 = place_band(p2.z, lo, hi);
        let c3 = place_band(p3.z, lo, hi);
        let c4 = place_band(p4.z, lo, hi);

        let (x12, y12) = ((p1.x + p2.x) / 2.0, (p1.y + p2.y) / 2.0);
        let (x23, y23) = ((p2.x + p3.x) / 2.0, (p2.y + p3.y) / 2.0);
        let (x34, y34) = ((p3.x + p4.x) / 2.0, (p3.y + p4.y) / 2.0);
        let (x41, y41) = ((p4.x + p1.x) / 2.0, (p4.y + p1.y) / 2.0);
        let (x0, y0) = ((x12 + x34) / 2.0, (y12 + y34) / 2.0);

        let inside = |c: Place| c == Place::Inside;

        // The cell boundary is common to both variants.
        if inside(c1) {
            flipset.eflip(Edge::new(x41, y41, p1.x, p1.y));
            flipset.eflip(Edge::new(p1.x, p1.y, x12, y12));
        }
        if inside(c2) {
            flipset.eflip(Edge::new(x12, y12, p2.x, p2.y));
            flipset.eflip(Edge::new(p2.x, p2.y, x23, y23));
        }
        if inside(c3) {
            flipset.eflip(Edge::new(x23, y23, p3.x, p3.y));
            flipset.eflip(Edge::new(p3.x, p3.y, x34, y34));
        }
        if inside(c4) {
            flipset.eflip(Edge::new(x34, y34, p4.x, p4.y));
            flipset.eflip(Edge::new(p4.x, p4.y, x41, y41));
        }

        // A lone odd corner among three equals is cut straight across.
        let (z1, z2, z3, z4) = (p1.z, p2.z, p3.z, p4.z);
        if z2 == z3 && z3 == z4 && z1 != z2 {
            if inside(c1) && !inside(c2) {
                flipset.eflip(Edge::new(x12, y12, x41, y41));
            }
            if inside(c2) && !inside(c1) {
                flipset.eflip(Edge::new(x41, y41, x12, y12));
            }
        } else if z1 == z3 && z3 == z4 && z2 != z1 {
            if inside(c2) && !inside(c3) {
                flipset.eflip(Edge::new(x23, y23, x12, y12));
            }
            if inside(c3) && !inside(c2) {
                flipset.eflip(Edge::new(x12, y12, x23, y23));
            }
        } else if z1 == z2 && z2 == z4 && z3 != z1 {
            if inside(c3) && !inside(c4) {
                flipset.eflip(Edge::new(x34, y34, x23, y23));
            }
            if inside(c4) && !inside(c3) {
                flipset.eflip(Edge::new(x23, y23, x34, y34));
            }
        } else if z1 == z2 && z2 == z3 && z4 != z1 {
            if inside(c4) && !inside(c1) {
                flipset.eflip(Edge::new(x41, y41, x34, y34));
            }
            if inside(c1) && !inside(c4) {
                flipset.eflip(Edge::new(x34, y34, x41, y41));
            }
        } else {
            // Regular nearest-neighbour spokes through the centre.
            if inside(c1) && !inside(c2) {
                flipset.eflip(Edge::new(x12, y12, x0, y0));
            }
            if inside(c2) && !inside(c1) {
                flipset.eflip(Edge::new(x0, y0, x12, y12));
            }
            if inside(c2) && !inside(c3) {
                flipset.eflip(Edge::new(x23, y23, x0, y0));
            }
            if inside(c3) && !inside(c2) {
                flipset.eflip(Edge::new(x0, y0, x23, y23));
            }
            if inside(c3) && !inside(c4) {
                flipset.eflip(Edge::new(x34, y34, x0, y0));
            }
            if inside(c4) && !inside(c3) {
                flipset.eflip(Edge::new(x0, y0, x34, y34));
            }
            if inside(c4) && !inside(c1) {
                flipset.eflip(Edge::new(x41, y41, x0, y0));
            }
            if inside(c1) && !inside(c4) {
                flipset.eflip(Edge::new(x0, y0, x41, y41));
            }
        }
    }

    fn rectangle_line(&self, _corners: [Corner; 4], _value: f64, _flipset: &mut FlipSet) {}

    fn triangle_fill(
        &self,
        corners: [Corner; 3],
        lo: Option<f64>,
        hi: Option<f64>,
        flipset: &mut FlipSet,
    ) {
        blocky_triangle_fill(
            self.missing,
            corners,
            lo.unwrap_or(f64::NAN),
            hi.unwrap_or(f64::NAN),
            flipset,
        );
    }

    fn triangle_line(&self, _corners: [Corner; 3], _value: f64, _flipset: &mut FlipSet) {}
}
