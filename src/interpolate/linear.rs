//! Linear interpolation inside grid cells.

use super::{Blend, Corner, Interpolation};
use crate::flip_grid::FlipGrid;
use crate::flip_set::FlipSet;
use crate::missing::Missing;

pub(crate) struct LinearBlend;

impl Blend for LinearBlend {
    fn crossing(a: Corner, b: Corner, value: f64) -> (f64, f64) {
        // The equality tests are required for handling value == limit
        // cases without any rounding error: the crossing must land on
        // the corner exactly.
        if a.z == value {
            (a.x, a.y)
        } else if b.z == value {
            (b.x, b.y)
        } else if a.x < b.x || (a.x == b.x && a.y < b.y) {
            let s = (value - b.z) / (a.z - b.z);
            (b.x + s * (a.x - b.x), b.y + s * (a.y - b.y))
        } else {
            let s = (value - a.z) / (b.z - a.z);
            (a.x + s * (b.x - a.x), a.y + s * (b.y - a.y))
        }
    }

    fn center(z1: f64, z2: f64, z3: f64, z4: f64) -> f64 {
        (z1 + z2 + z3 + z4) / 4.0
    }
}

/// Linear interpolation: crossings are placed where the linear blend
/// of the corner values reaches the threshold.
#[derive(Debug, Clone, Copy)]
pub struct Linear {
    missing: Missing,
}

impl Linear {
    pub fn new(missing: Missing) -> Self {
        Self { missing }
    }
}

impl Default for Linear {
    fn default() -> Self {
        Self::new(Missing::Nan)
    }
}

impl Interpolation for Linear {
    fn missing(&self) -> Missing {
        self.missing
    }

    fn rectangle_fill(
        &self,
        corners: [Corner; 4],
        cell: (usize, usize),
        lo: Option<f64>,
        hi: Option<f64>,
        flipset: &mut FlipSet,
        flipgrid: &mut FlipGrid,
    ) {
        super::fill_rectangle::<LinearBlend>(
            self.missing,
            corners,
            cell,
            lo.unwrap_or(f64::NAN),
            hi.unwrap_or(f64::NAN),
            flipset,
            flipgrid,
        );
    }

    fn rectangle_line(&self, corners: [Corner; 4], value: f64, flipset: &mut FlipSet) {
        super::line_rectangle::<LinearBlend>(self.missing, corners, value, flipset);
    }

    fn triangle_fill(
        &self,
        corners: [Corner; 3],
        lo: Option<f64>,
        hi: Option<f64>,
        flipset: &mut FlipSet,
    ) {
        super::fill_triangle::<LinearBlend>(
            self.missing,
            corners,
            lo.unwrap_or(f64::NAN),
            hi.unwrap_or(f64::NAN),
            flipset,
        );
    }

    fn triangle_line(&self, corners: [Corner; 3], value: f64, flipset: &mut FlipSet) {
        super::line_triangle::<LinearBlend>(self.missing, corners, value, flipset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner(x: f64, y: f64, z: f64) -> Corner {
        Corner::new(x, y, z)
    }

    #[test]
    fn test_crossing_midpoint() {
        let (x, y) = LinearBlend::crossing(corner(0.0, 0.0, 0.0), corner(1.0, 0.0, 1.0), 0.5);
        assert_eq!((x, y), (0.5, 0.0));
    }

    #[test]
    fn test_crossing_exact_at_endpoints() {
        let a = corner(3.0, 7.0, 2.0);
        let b = corner(4.0, 7.0, 5.0);
        assert_eq!(LinearBlend::crossing(a, b, 2.0), (3.0, 7.0));
        assert_eq!(LinearBlend::crossing(a, b, 5.0), (4.0, 7.0));
    }

    #[test]
    fn test_crossing_order_independent() {
        let a = corner(0.1, 0.2, 1.0);
        let b = corner(0.7, 0.9, 4.0);
        let p = LinearBlend::crossing(a, b, 2.3);
        let q = LinearBlend::crossing(b, a, 2.3);
        assert_eq!(p, q);
    }

    #[test]
    fn test_fill_all_inside_goes_through_flip_grid() {
        let grid = crate::grid::PointGrid::from_fn(3, 3, |i, j| {
            crate::grid::GridPoint::new(i as f64, j as f64, 5.0)
        });
        let interp = Linear::new(Missing::Nan);
        let mut flipset = FlipSet::new();
        let mut flipgrid = FlipGrid::new(3, 3, false).unwrap();
        let corners = [
            corner(0.0, 0.0, 5.0),
            corner(0.0, 1.0, 5.0),
            corner(1.0, 1.0, 5.0),
            corner(1.0, 0.0, 5.0),
        ];
        interp.rectangle_fill(corners, (0, 0), Some(0.0), Some(10.0), &mut flipset, &mut flipgrid);
        assert!(flipset.is_empty());
        assert!(!flipgrid.is_empty());

        flipgrid.flush(&grid, &mut flipset);
        assert_eq!(flipset.finish().len(), 4);
    }

    #[test]
    fn test_fill_band_wedge_is_closed_and_clockwise() {
        // One corner above the band: the wedge between the lo and hi
        // crossings survives.
        let interp = Linear::new(Missing::Nan);
        let mut flipset = FlipSet::new();
        let mut flipgrid = FlipGrid::new(2, 2, false).unwrap();
        let corners = [
            corner(0.0, 0.0, 0.0),
            corner(0.0, 1.0, 1.0),
            corner(1.0, 1.0, 0.0),
            corner(1.0, 0.0, 0.0),
        ];
        interp.rectangle_fill(
            corners,
            (0, 0),
            Some(0.25),
            Some(0.75),
            &mut flipset,
            &mut flipgrid,
        );
        assert!(flipgrid.is_empty());

        let edges = flipset.finish();
        assert_eq!(edges.len(), 4);
        // Each vertex has one incoming and one outgoing edge.
        for e in &edges {
            assert!(edges.iter().any(|f| f.starts_at(e.x2(), e.y2())));
        }
    }
}
