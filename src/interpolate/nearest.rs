//! Nearest-neighbour interpolation inside grid cells.
//!
//! Every corner claims the quarter of the cell nearest to it;
//! boundaries run through edge midpoints and the cell centre. The
//! output is blocky but uses the same cancellation discipline as the
//! smooth interpolations, so adjacent cells still share boundaries
//! exactly.

use super::{place_band, Corner, Interpolation, Place};
use crate::edge::Edge;
use crate::flip_grid::FlipGrid;
use crate::flip_set::FlipSet;
use crate::missing::Missing;

/// Band emission for a triangle, corner areas split at edge midpoints
/// and the centroid. Shared with the discrete interpolation.
pub(super) fn blocky_triangle_fill(
    missing: Missing,
    corners: [Corner; 3],
    lo: f64,
    hi: f64,
    out: &mut FlipSet,
) {
    let [p1, p2, p3] = corners;
    if missing.is_missing(p1.z) || missing.is_missing(p2.z) || missing.is_missing(p3.z) {
        return;
    }

    let c1 = place_band(p1.z, lo, hi);
    let c2 = place_band(p2.z, lo, hi);
    let c3 = place_band(p3.z, lo, hi);

    let (x12, y12) = ((p1.x + p2.x) / 2.0, (p1.y + p2.y) / 2.0);
    let (x23, y23) = ((p2.x + p3.x) / 2.0, (p2.y + p3.y) / 2.0);
    let (x31, y31) = ((p3.x + p1.x) / 2.0, (p3.y + p1.y) / 2.0);
    let (x0, y0) = ((p1.x + p2.x + p3.x) / 3.0, (p1.y + p2.y + p3.y) / 3.0);

    let inside = |c: Place| c == Place::Inside;

    if inside(c1) {
        out.eflip(Edge::new(x31, y31, p1.x, p1.y));
        out.eflip(Edge::new(p1.x, p1.y, x12, y12));
    }
    if inside(c2) {
        out.eflip(Edge::new(x12, y12, p2.x, p2.y));
        out.eflip(Edge::new(p2.x, p2.y, x23, y23));
    }
    if inside(c3) {
        out.eflip(Edge::new(x23, y23, p3.x, p3.y));
        out.eflip(Edge::new(p3.x, p3.y, x31, y31));
    }

    if inside(c1) && !inside(c2) {
        out.eflip(Edge::new(x12, y12, x0, y0));
    }
    if inside(c2) && !inside(c1) {
        out.eflip(Edge::new(x0, y0, x12, y12));
    }
    if inside(c2) && !inside(c3) {
        out.eflip(Edge::new(x23, y23, x0, y0));
    }
    if inside(c3) && !inside(c2) {
        out.eflip(Edge::new(x0, y0, x23, y23));
    }
    if inside(c3) && !inside(c1) {
        out.eflip(Edge::new(x31, y31, x0, y0));
    }
    if inside(c1) && !inside(c3) {
        out.eflip(Edge::new(x0, y0, x31, y31));
    }
}

/// Nearest-neighbour interpolation. Line mode is not provided: the
/// blocky band boundary is rarely meaningful as an isoline.
#[derive(Debug, Clone, Copy)]
pub struct NearestNeighbour {
    missing: Missing,
}

impl NearestNeighbour {
    pub fn new(missing: Missing) -> Self {
        Self { missing }
    }
}

impl Default for NearestNeighbour {
    fn default() -> Self {
        Self::new(Missing::Nan)
    }
}

impl Interpolation for NearestNeighbour {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lone_inside_corner_claims_its_quarter() {
        let interp = NearestNeighbour::new(Missing::Nan);
        let mut flipset = FlipSet::new();
        let mut flipgrid = FlipGrid::new(2, 2, false).unwrap();
        let corners = [
            Corner::new(0.0, 0.0, 5.0),
            Corner::new(0.0, 1.0, 0.0),
            Corner::new(1.0, 1.0, 0.0),
            Corner::new(1.0, 0.0, 0.0),
        ];
        interp.rectangle_fill(corners, (0, 0), Some(4.0), Some(6.0), &mut flipset, &mut flipgrid);
        let edges = flipset.finish();
        // Quarter square: two half-sides plus two spokes to the centre.
        assert_eq!(edges.len(), 4);
        for e in &edges {
            let on_quarter = |x: f64, y: f64| x <= 0.5 && y <= 0.5;
            assert!(on_quarter(e.x1(), e.y1()) && on_quarter(e.x2(), e.y2()));
        }
    }

    #[test]
    fn test_all_inside_emits_cell_boundary_only() {
        let interp = NearestNeighbour::new(Missing::Nan);
        let mut flipset = FlipSet::new();
        let mut flipgrid = FlipGrid::new(2, 2, false).unwrap();
        let corners = [
            Corner::new(0.0, 0.0, 5.0),
            Corner::new(0.0, 1.0, 5.0),
            Corner::new(1.0, 1.0, 5.0),
            Corner::new(1.0, 0.0, 5.0),
        ];
        interp.rectangle_fill(corners, (0, 0), Some(4.0), Some(6.0), &mut flipset, &mut flipgrid);
        // Eight half-sides around the cell, no interior spokes.
        let edges = flipset.finish();
        assert_eq!(edges.len(), 8);
        assert!(flipgrid.is_empty());
    }
}
