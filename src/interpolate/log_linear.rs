//! Log-linear interpolation inside grid cells.
//!
//! Intended for quantities like precipitation whose level spacing is
//! multiplicative. All values must be non-negative; negative inputs
//! are a usage error and are silently ignored at the cell level.

use super::{Blend, Corner, Interpolation};
use crate::flip_grid::FlipGrid;
use crate::flip_set::FlipSet;
use crate::missing::Missing;

pub(crate) struct LogLinearBlend;

impl Blend for LogLinearBlend {
    // Note: log1p(a) - log1p(b) differs from log1p(a/b) when b = 0,
    // so the mathematical "simplification" cannot be used here. The
    // base of the logarithm cancels out of s entirely.
    fn crossing(a: Corner, b: Corner, value: f64) -> (f64, f64) {
        if a.z == b.z {
            (a.x, a.y)
        } else if a.z < 0.0 || b.z < 0.0 || value < 0.0 {
            // Usage error, data must be non-negative.
            (a.x, a.y)
        } else if a.x < b.x || (a.x == b.x && a.y < b.y) {
            let s = (value.ln_1p() - b.z.ln_1p()) / (a.z.ln_1p() - b.z.ln_1p());
            (b.x + s * (a.x - b.x), b.y + s * (a.y - b.y))
        } else {
            let s = (value.ln_1p() - a.z.ln_1p()) / (b.z.ln_1p() - a.z.ln_1p());
            (a.x + s * (b.x - a.x), a.y + s * (b.y - a.y))
        }
    }

    fn center(z1: f64, z2: f64, z3: f64, z4: f64) -> f64 {
        ((z1.ln_1p() + z2.ln_1p() + z3.ln_1p() + z4.ln_1p()) / 4.0).exp_m1()
    }
}

/// Log-linear interpolation: crossings are placed where the
/// `log1p`-blend of the corner values reaches the threshold.
#[derive(Debug, Clone, Copy)]
pub struct LogLinear {
    missing: Missing,
}

impl LogLinear {
    pub fn new(missing: Missing) -> Self {
        Self { missing }
    }
}

impl Default for LogLinear {
    fn default() -> Self {
        Self::new(Missing::Nan)
    }
}

impl Interpolation for LogLinear {
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
        super::fill_rectangle::<LogLinearBlend>(
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
        super::line_rectangle::<LogLinearBlend>(self.missing, corners, value, flipset);
    }

    fn triangle_fill(
        &self,
        corners: [Corner; 3],
        lo: Option<f64>,
        hi: Option<f64>,
        flipset: &mut FlipSet,
    ) {
        super::fill_triangle::<LogLinearBlend>(
            self.missing,
            corners,
            lo.unwrap_or(f64::NAN),
            hi.unwrap_or(f64::NAN),
            flipset,
        );
    }

    fn triangle_line(&self, corners: [Corner; 3], value: f64, flipset: &mut FlipSet) {
        super::line_triangle::<LogLinearBlend>(self.missing, corners, value, flipset);
    }
}
