//! Grid access and a lightweight concrete grid.
//!
//! The engine reads its input through the [`Grid`] trait: scalar value
//! and world coordinates per node, plus an optional per-cell validity
//! predicate. [`PointGrid`] is a ready-made dense implementation at
//! 24 bytes per node, which for large weather grids is an order of
//! magnitude lighter than keeping full GeoJSON features around.

/// Read-only view of a structured quadrilateral grid.
///
/// Indices run `0 <= i < width` and `0 <= j < height`. The cell with
/// lower-left corner (i,j) references corners (i,j), (i,j+1),
/// (i+1,j+1), (i+1,j) — clockwise when y grows upward.
///
/// In world-wrap mode the engine additionally reads column
/// `i == width()`, the wrap column: it represents the same meridian as
/// column 0 but shifted by one wrap period in x.
pub trait Grid {
    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Scalar value at node (i,j).
    fn z(&self, i: usize, j: usize) -> f64;

    /// World x-coordinate of node (i,j).
    fn x(&self, i: usize, j: usize) -> f64;

    /// World y-coordinate of node (i,j).
    fn y(&self, i: usize, j: usize) -> f64;

    /// Whether the cell with lower-left corner (i,j) is topologically
    /// usable. Defaults to true for every cell.
    fn valid(&self, i: usize, j: usize) -> bool {
        let _ = (i, j);
        true
    }
}

/// A single grid node: planar coordinates and a scalar value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

impl GridPoint {
    pub fn new(x: f64, y: f64, value: f64) -> Self {
        Self { x, y, value }
    }
}

/// Dense row-major grid of [`GridPoint`]s.
#[derive(Debug, Clone)]
pub struct PointGrid {
    width: usize,
    height: usize,
    points: Vec<GridPoint>,
    /// x-period served to accesses of the wrap column `i == width`.
    wrap_period: Option<f64>,
}

impl PointGrid {
    /// Build a grid from row-major points (`points[j * width + i]`).
    ///
    /// # Panics
    ///
    /// Panics if `points.len() != width * height`.
    pub fn new(width: usize, height: usize, points: Vec<GridPoint>) -> Self {
        assert_eq!(points.len(), width * height, "point count must be width * height");
        Self { width, height, points, wrap_period: None }
    }

    /// Build a grid by evaluating a closure at every (i,j).
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> GridPoint,
    {
        let mut points = Vec::with_capacity(width * height);
        for j in 0..height {
            for i in 0..width {
                points.push(f(i, j));
            }
        }
        Self::new(width, height, points)
    }

    /// Declare the grid world-wrapping with the given x-period
    /// (360 for geographic longitudes). Accessing column `width`
    /// then resolves to column 0 shifted by the period.
    pub fn with_wrap_period(mut self, period: f64) -> Self {
        self.wrap_period = Some(period);
        self
    }

    fn point(&self, i: usize, j: usize) -> (&GridPoint, f64) {
        if i == self.width {
            let period = self
                .wrap_period
                .expect("wrap column accessed on a grid without a wrap period");
            (&self.points[j * self.width], period)
        } else {
            (&self.points[j * self.width + i], 0.0)
        }
    }
}

impl Grid for PointGrid {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn z(&self, i: usize, j: usize) -> f64 {
        self.point(i, j).0.value
    }

    fn x(&self, i: usize, j: usize) -> f64 {
        let (p, shift) = self.point(i, j);
        p.x + shift
    }

    fn y(&self, i: usize, j: usize) -> f64 {
        self.point(i, j).0.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_point_size() {
        use std::mem::size_of;
        assert_eq!(size_of::<GridPoint>(), 24);
    }

    #[test]
    fn test_point_grid_from_fn() {
        let grid = PointGrid::from_fn(3, 2, |i, j| {
            GridPoint::new(i as f64, j as f64, (i + 10 * j) as f64)
        });
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.z(2, 1), 12.0);
        assert_eq!(grid.x(2, 1), 2.0);
        assert_eq!(grid.y(2, 1), 1.0);
        assert!(grid.valid(0, 0));
    }

    #[test]
    fn test_wrap_column() {
        let grid = PointGrid::from_fn(4, 2, |i, j| {
            GridPoint::new(i as f64 * 90.0, j as f64, i as f64)
        })
        .with_wrap_period(360.0);
        assert_eq!(grid.x(4, 1), 360.0);
        assert_eq!(grid.y(4, 1), 1.0);
        assert_eq!(grid.z(4, 0), 0.0);
    }

    #[test]
    #[should_panic]
    fn test_point_count_mismatch_panics() {
        let _ = PointGrid::new(2, 2, vec![GridPoint::new(0.0, 0.0, 0.0)]);
    }
}
