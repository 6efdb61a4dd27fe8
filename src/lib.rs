//! # geo-contour
//!
//! A 2D contouring engine for scalar fields sampled on structured
//! quadrilateral grids. Given grid values with world coordinates per
//! node, it produces **isolines** (curves `z = v`) and **isobands**
//! (fill polygons for `lo <= z < hi`) as OGC-valid planar geometry:
//! simple linestrings or multi-linestrings for lines, simple polygons
//! or multipolygons with holes for fills.
//!
//! ## How it works
//!
//! Every cell is classified against the threshold(s) and emits
//! directed edges circulating the filled region clockwise. Interior
//! edges are produced twice, once per adjacent cell in opposite
//! directions, and cancel inside toggle-on-insert containers (a hashed
//! [`FlipSet`] for interior geometry, a dense [`FlipGrid`] for whole
//! cell sides). What survives is exactly the contour boundary, which
//! the builder chains into rings, classifies into shells and holes by
//! winding, and delivers through a [`GeometrySink`].
//!
//! Saddle cells are always split into four triangles through the cell
//! centre, so adjacent thresholds produce matching boundaries, and
//! crossing coordinates are computed on canonically ordered endpoints
//! so neighbouring cells agree bit for bit.
//!
//! ## Examples
//!
//! ### GeoJSON isobands
//!
//! ```rust
//! use geo_contour::{band_features, GridPoint, PointGrid};
//!
//! // A radially decaying bump sampled on an 8x8 grid.
//! let grid = PointGrid::from_fn(8, 8, |i, j| {
//!     let (dx, dy) = (i as f64 - 3.5, j as f64 - 3.5);
//!     GridPoint::new(i as f64, j as f64, 20.0 - dx * dx - dy * dy)
//! });
//!
//! // Three isobands: 0-5, 5-10, 10-20, computed in parallel.
//! let collection = band_features(&grid, &[0.0, 5.0, 10.0, 20.0]).unwrap();
//! assert!(!collection.features.is_empty());
//! ```
//!
//! ### Driving the engine directly
//!
//! ```rust
//! use geo_contour::{
//!     CollectSink, Contourer, GridPoint, Linear, Missing, PointGrid, ValueHints,
//! };
//!
//! let grid = PointGrid::from_fn(8, 8, |i, j| {
//!     let (dx, dy) = (i as f64 - 3.5, j as f64 - 3.5);
//!     GridPoint::new(i as f64, j as f64, dx * dx + dy * dy)
//! });
//!
//! // Hints are built once per grid and reused across thresholds.
//! let hints = ValueHints::new(&grid, Missing::Nan).unwrap();
//!
//! let mut contourer = Contourer::new(Linear::new(Missing::Nan));
//! let mut sink = CollectSink::default();
//! contourer.fill_hinted(&grid, Some(2.0), Some(8.0), &hints, &mut sink).unwrap();
//! assert_eq!(sink.polygons.len(), 1);
//! ```
//!
//! ## Missing data and degenerate cells
//!
//! A configurable [`Missing`] predicate (NaN, NaN-or-Inf, or a
//! sentinel value) is applied to values and, separately, to
//! coordinates. A rectangle with one missing corner is contoured as
//! the remaining triangle; more missing corners, an invalid cell, or
//! a non-convex / counter-clockwise corner quadrilateral skip the
//! cell. World-wrapping grids contour the seam column without
//! cancelling it against column zero.

mod builder;
mod contourer;
mod edge;
mod error;
mod features;
mod flip_grid;
mod flip_set;
mod grid;
mod hints;
mod interpolate;
mod missing;
mod ring;
mod sink;
mod smooth;

pub use contourer::Contourer;
pub use edge::Edge;
pub use error::{CollectDiagnostics, ContourError, Diagnostics, LogDiagnostics, Warning};
pub use features::{band_feature, band_features, line_feature, line_features};
pub use flip_grid::FlipGrid;
pub use flip_set::FlipSet;
pub use grid::{Grid, GridPoint, PointGrid};
pub use hints::{CoordHints, CoordRect, ValueHints, ValueRect, DEFAULT_MAX_LEAF};
pub use interpolate::{Corner, Discrete, Interpolation, Linear, LogLinear, NearestNeighbour};
pub use missing::Missing;
pub use ring::Ring;
pub use sink::{CollectSink, GeoJsonSink, GeometrySink, DEFAULT_PRECISION};
pub use smooth::{savitzky_golay_2d, MirrorGrid};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_cancellation_shrinks_by_two() {
        let mut set = FlipSet::new();
        set.flip(Edge::new(0.0, 0.0, 1.0, 0.0));
        set.flip(Edge::new(2.0, 0.0, 3.0, 0.0));
        assert_eq!(set.len(), 2);
        set.flip(Edge::new(1.0, 0.0, 0.0, 0.0));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_end_to_end_band_is_deterministic() {
        let grid = PointGrid::from_fn(16, 16, |i, j| {
            let (dx, dy) = (i as f64 - 7.5, j as f64 - 7.5);
            GridPoint::new(i as f64, j as f64, (dx * dx + dy * dy).sqrt())
        });

        let run = || {
            let mut contourer = Contourer::new(Linear::new(Missing::Nan));
            let mut sink = CollectSink::default();
            contourer.fill(&grid, Some(2.0), Some(5.0), &mut sink).unwrap();
            sink.polygons
        };
        assert_eq!(run(), run());
    }
}
