//! Top-level contouring facade.
//!
//! A [`Contourer`] pairs an interpolation strategy with a diagnostics
//! channel and drives one request at a time: iterate candidate cells
//! (the whole grid, or only the rectangles a hint tree nominates),
//! let the interpolation toggle edges into the flip structures, flush
//! and sort the survivors, and hand them to the builder.
//!
//! A contourer holds no per-request state: running `fill` twice on the
//! same inputs produces bit-identical edge lists. Distinct contourers
//! may run concurrently against the same grid and hint trees.

use crate::builder;
use crate::error::{ContourError, Diagnostics, LogDiagnostics};
use crate::flip_grid::FlipGrid;
use crate::flip_set::FlipSet;
use crate::grid::Grid;
use crate::hints::{CoordHints, ValueHints};
use crate::interpolate::{Corner, Interpolation};
use crate::missing::Missing;
use crate::sink::GeometrySink;

/// Contouring facade over an interpolation strategy.
#[derive(Debug)]
pub struct Contourer<I, D = LogDiagnostics> {
    interpolation: I,
    diagnostics: D,
    world_wrap: bool,
    coord_missing: Missing,
}

impl<I: Interpolation> Contourer<I> {
    pub fn new(interpolation: I) -> Self {
        Self {
            interpolation,
            diagnostics: LogDiagnostics,
            world_wrap: false,
            coord_missing: Missing::Nan,
        }
    }
}

impl<I: Interpolation, D: Diagnostics> Contourer<I, D> {
    pub fn with_diagnostics(interpolation: I, diagnostics: D) -> Self {
        Self { interpolation, diagnostics, world_wrap: false, coord_missing: Missing::Nan }
    }

    /// Treat the grid as wrapping around in the x-direction: after the
    /// regular columns the wrap cell joining column `width-1` to the
    /// (shifted) column 0 is contoured as well.
    pub fn world_wrap(mut self, on: bool) -> Self {
        self.world_wrap = on;
        self
    }

    /// Missing-value predicate applied to coordinates.
    pub fn coord_missing(mut self, missing: Missing) -> Self {
        self.coord_missing = missing;
        self
    }

    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut D {
        &mut self.diagnostics
    }

    fn corners<G: Grid>(grid: &G, i: usize, j: usize) -> [Corner; 4] {
        [
            Corner::new(grid.x(i, j), grid.y(i, j), grid.z(i, j)),
            Corner::new(grid.x(i, j + 1), grid.y(i, j + 1), grid.z(i, j + 1)),
            Corner::new(grid.x(i + 1, j + 1), grid.y(i + 1, j + 1), grid.z(i + 1, j + 1)),
            Corner::new(grid.x(i + 1, j), grid.y(i + 1, j), grid.z(i + 1, j)),
        ]
    }

    /// A cell participates only when it is marked valid, all corner
    /// coordinates are usable, and the corner quadrilateral is convex
    /// and clockwise. Degenerate cells, e.g. projections collapsing to
    /// a line at the poles, are skipped.
    fn cell_ok<G: Grid>(&self, grid: &G, corners: &[Corner; 4], i: usize, j: usize) -> bool {
        if !grid.valid(i, j) {
            return false;
        }
        for c in corners {
            if self.coord_missing.is_missing(c.x) || self.coord_missing.is_missing(c.y) {
                return false;
            }
        }
        let mut turning = false;
        for k in 0..4 {
            let a = corners[k];
            let b = corners[(k + 1) % 4];
            let c = corners[(k + 2) % 4];
            let cross = (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x);
            if cross > 0.0 {
                return false;
            }
            if cross < 0.0 {
                turning = true;
            }
        }
        turning
    }

    fn fill_cell<G: Grid>(
        &self,
        grid: &G,
        i: usize,
        j: usize,
        lo: Option<f64>,
        hi: Option<f64>,
        flipset: &mut FlipSet,
        flipgrid: &mut FlipGrid,
    ) {
        let corners = Self::corners(grid, i, j);
        if self.cell_ok(grid, &corners, i, j) {
            self.interpolation.rectangle_fill(corners, (i, j), lo, hi, flipset, flipgrid);
        }
    }

    fn line_cell<G: Grid>(&self, grid: &G, i: usize, j: usize, value: f64, flipset: &mut FlipSet) {
        let corners = Self::corners(grid, i, j);
        if self.cell_ok(grid, &corners, i, j) {
            self.interpolation.rectangle_line(corners, value, flipset);
        }
    }

    fn check_grid<G: Grid>(grid: &G) -> Result<(), ContourError> {
        if grid.width() == 0 || grid.height() == 0 {
            return Err(ContourError::EmptyGrid);
        }
        Ok(())
    }

    /// Fill polygons for the band `lo <= z < hi` over the whole grid.
    /// A `None` limit means unbounded on that side.
    pub fn fill<G, S>(
        &mut self,
        grid: &G,
        lo: Option<f64>,
        hi: Option<f64>,
        sink: &mut S,
    ) -> Result<(), ContourError>
    where
        G: Grid,
        S: GeometrySink,
    {
        Self::check_grid(grid)?;
        let mut flipset = FlipSet::new();
        let mut flipgrid = FlipGrid::new(grid.width(), grid.height(), self.world_wrap)?;

        let cell_columns = if self.world_wrap { grid.width() } else { grid.width() - 1 };
        for j in 0..grid.height() - 1 {
            for i in 0..cell_columns {
                self.fill_cell(grid, i, j, lo, hi, &mut flipset, &mut flipgrid);
            }
        }

        self.finish_fill(grid, flipset, flipgrid, sink)
    }

    /// Fill restricted to the cells nominated by the value hints.
    pub fn fill_hinted<G, S>(
        &mut self,
        grid: &G,
        lo: Option<f64>,
        hi: Option<f64>,
        hints: &ValueHints,
        sink: &mut S,
    ) -> Result<(), ContourError>
    where
        G: Grid,
        S: GeometrySink,
    {
        Self::check_grid(grid)?;
        let mut flipset = FlipSet::new();
        let mut flipgrid = FlipGrid::new(grid.width(), grid.height(), self.world_wrap)?;

        for rect in hints.rectangles_band(lo, hi) {
            for j in rect.y1..rect.y2 {
                for i in rect.x1..rect.x2 {
                    self.fill_cell(grid, i, j, lo, hi, &mut flipset, &mut flipgrid);
                }
            }
        }
        self.fill_wrap_column(grid, lo, hi, &mut flipset, &mut flipgrid);

        self.finish_fill(grid, flipset, flipgrid, sink)
    }

    /// Fill restricted to cells that both carry band values and fall
    /// inside the coordinate bounding box.
    #[allow(clippy::too_many_arguments)]
    pub fn fill_clipped<G, S>(
        &mut self,
        grid: &G,
        lo: Option<f64>,
        hi: Option<f64>,
        hints: &ValueHints,
        coord_hints: &CoordHints,
        bbox: (f64, f64, f64, f64),
        sink: &mut S,
    ) -> Result<(), ContourError>
    where
        G: Grid,
        S: GeometrySink,
    {
        Self::check_grid(grid)?;
        let mut flipset = FlipSet::new();
        let mut flipgrid = FlipGrid::new(grid.width(), grid.height(), self.world_wrap)?;

        let (xmin, ymin, xmax, ymax) = bbox;
        let value_rects = hints.rectangles_band(lo, hi);
        let coord_rects = coord_hints.rectangles(xmin, ymin, xmax, ymax);

        // The rectangle sets each partition the grid, so every cell
        // appears in at most one pairwise intersection.
        for v in &value_rects {
            for c in &coord_rects {
                let x1 = v.x1.max(c.x1);
                let y1 = v.y1.max(c.y1);
                let x2 = v.x2.min(c.x2);
                let y2 = v.y2.min(c.y2);
                for j in y1..y2 {
                    for i in x1..x2 {
                        self.fill_cell(grid, i, j, lo, hi, &mut flipset, &mut flipgrid);
                    }
                }
            }
        }
        self.fill_wrap_column(grid, lo, hi, &mut flipset, &mut flipgrid);

        self.finish_fill(grid, flipset, flipgrid, sink)
    }

    fn fill_wrap_column<G: Grid>(
        &self,
        grid: &G,
        lo: Option<f64>,
        hi: Option<f64>,
        flipset: &mut FlipSet,
        flipgrid: &mut FlipGrid,
    ) {
        if self.world_wrap {
            let i = grid.width() - 1;
            for j in 0..grid.height() - 1 {
                self.fill_cell(grid, i, j, lo, hi, flipset, flipgrid);
            }
        }
    }

    fn finish_fill<G, S>(
        &mut self,
        grid: &G,
        mut flipset: FlipSet,
        flipgrid: FlipGrid,
        sink: &mut S,
    ) -> Result<(), ContourError>
    where
        G: Grid,
        S: GeometrySink,
    {
        flipgrid.flush(grid, &mut flipset);
        let edges = flipset.finish();
        builder::fill(&edges, sink, &mut self.diagnostics)
    }

    /// Isolines for `z = value` over the whole grid.
    pub fn line<G, S>(&mut self, grid: &G, value: f64, sink: &mut S) -> Result<(), ContourError>
    where
        G: Grid,
        S: GeometrySink,
    {
        Self::check_grid(grid)?;
        let mut flipset = FlipSet::new();

        let cell_columns = if self.world_wrap { grid.width() } else { grid.width() - 1 };
        for j in 0..grid.height() - 1 {
            for i in 0..cell_columns {
                self.line_cell(grid, i, j, value, &mut flipset);
            }
        }

        let edges = flipset.finish();
        builder::line(&edges, sink, &mut self.diagnostics)
    }

    /// Isolines restricted to the cells nominated by the value hints.
    pub fn line_hinted<G, S>(
        &mut self,
        grid: &G,
        value: f64,
        hints: &ValueHints,
        sink: &mut S,
    ) -> Result<(), ContourError>
    where
        G: Grid,
        S: GeometrySink,
    {
        Self::check_grid(grid)?;
        let mut flipset = FlipSet::new();

        for rect in hints.rectangles_value(value) {
            for j in rect.y1..rect.y2 {
                for i in rect.x1..rect.x2 {
                    self.line_cell(grid, i, j, value, &mut flipset);
                }
            }
        }
        self.line_wrap_column(grid, value, &mut flipset);

        let edges = flipset.finish();
        builder::line(&edges, sink, &mut self.diagnostics)
    }

    /// Isolines restricted to cells that both carry the value and fall
    /// inside the coordinate bounding box.
    pub fn line_clipped<G, S>(
        &mut self,
        grid: &G,
        value: f64,
        hints: &ValueHints,
        coord_hints: &CoordHints,
        bbox: (f64, f64, f64, f64),
        sink: &mut S,
    ) -> Result<(), ContourError>
    where
        G: Grid,
        S: GeometrySink,
    {
        Self::check_grid(grid)?;
        let mut flipset = FlipSet::new();

        let (xmin, ymin, xmax, ymax) = bbox;
        let value_rects = hints.rectangles_value(value);
        let coord_rects = coord_hints.rectangles(xmin, ymin, xmax, ymax);

        for v in &value_rects {
            for c in &coord_rects {
                let x1 = v.x1.max(c.x1);
                let y1 = v.y1.max(c.y1);
                let x2 = v.x2.min(c.x2);
                let y2 = v.y2.min(c.y2);
                for j in y1..y2 {
                    for i in x1..x2 {
                        self.line_cell(grid, i, j, value, &mut flipset);
                    }
                }
            }
        }
        self.line_wrap_column(grid, value, &mut flipset);

        let edges = flipset.finish();
        builder::line(&edges, sink, &mut self.diagnostics)
    }

    fn line_wrap_column<G: Grid>(&self, grid: &G, value: f64, flipset: &mut FlipSet) {
        if self.world_wrap {
            let i = grid.width() - 1;
            for j in 0..grid.height() - 1 {
                self.line_cell(grid, i, j, value, flipset);
            }
        }
    }
}
