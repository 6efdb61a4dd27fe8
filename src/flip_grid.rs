//! Toggle-on-insert grid of cell sides.
//!
//! A [`FlipSet`](crate::FlipSet) would work for cell-boundary edges
//! too, but in typical fills most cell sides are flipped either twice
//! or not at all, so hashing every one of them is wasteful. The
//! `FlipGrid` instead stores a three-state marker per grid side
//! (absent, or oriented one of the two possible ways) in two dense
//! arrays, one for horizontal and one for vertical sides. Flushing
//! emits each surviving side as a directed edge whose orientation
//! keeps the filled interior on the right.
//!
//! For world-wrapping data the column `i = width-1` and the column
//! `i = 0` represent the same meridian but must not cancel; the grid
//! accommodates this by widening itself by one column so the wrap
//! cell's sides occupy their own slots.

use crate::edge::Edge;
use crate::error::ContourError;
use crate::flip_set::FlipSet;
use crate::grid::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum HSide {
    Absent,
    Bottom,
    Top,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum VSide {
    Absent,
    Left,
    Right,
}

#[derive(Debug)]
pub struct FlipGrid {
    /// Corner columns, widened by one in world-wrap mode.
    width: usize,
    height: usize,
    /// Count of surviving sides, for the trivial flush fast path.
    size: usize,
    /// Horizontal sides, `(width-1) * height`, row-major.
    horizontal: Vec<HSide>,
    /// Vertical sides, `width * (height-1)`, row-major.
    vertical: Vec<VSide>,
}

impl FlipGrid {
    /// `width` and `height` are the corner dimensions of the grid.
    pub fn new(width: usize, height: usize, world_wrap: bool) -> Result<Self, ContourError> {
        if width < 2 || height < 2 {
            return Err(ContourError::TooSmallFlipGrid { width, height });
        }
        let width = if world_wrap { width + 1 } else { width };
        Ok(Self {
            width,
            height,
            size: 0,
            horizontal: vec![HSide::Absent; (width - 1) * height],
            vertical: vec![VSide::Absent; width * (height - 1)],
        })
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Toggle the bottom side of cell (i,j).
    pub fn flip_bottom(&mut self, i: usize, j: usize) {
        self.flip_horizontal(j * (self.width - 1) + i, HSide::Bottom);
    }

    /// Toggle the top side of cell (i,j).
    pub fn flip_top(&mut self, i: usize, j: usize) {
        self.flip_horizontal((j + 1) * (self.width - 1) + i, HSide::Top);
    }

    /// Toggle the left side of cell (i,j).
    pub fn flip_left(&mut self, i: usize, j: usize) {
        self.flip_vertical(j * self.width + i, VSide::Left);
    }

    /// Toggle the right side of cell (i,j).
    pub fn flip_right(&mut self, i: usize, j: usize) {
        self.flip_vertical(j * self.width + i + 1, VSide::Right);
    }

    fn flip_horizontal(&mut self, index: usize, side: HSide) {
        if self.horizontal[index] == HSide::Absent {
            self.horizontal[index] = side;
            self.size += 1;
        } else {
            self.horizontal[index] = HSide::Absent;
            self.size -= 1;
        }
    }

    fn flip_vertical(&mut self, index: usize, side: VSide) {
        if self.vertical[index] == VSide::Absent {
            self.vertical[index] = side;
            self.size += 1;
        } else {
            self.vertical[index] = VSide::Absent;
            self.size -= 1;
        }
    }

    /// Emit every surviving side into the flip set as a directed edge.
    ///
    /// A horizontal side at row j spans corners (i,j)-(i+1,j); top
    /// orientation runs left to right, bottom right to left. A
    /// vertical side at column i spans (i,j)-(i,j+1); left orientation
    /// runs upward, right downward. This keeps the filled region to
    /// the right of every edge. Delivery goes through `eflip` since
    /// projected coordinates may collapse at the poles.
    pub fn flush<G: Grid>(&self, grid: &G, flipset: &mut FlipSet) {
        if self.size == 0 {
            return;
        }

        for j in 0..self.height {
            for i in 0..self.width - 1 {
                let (x1, y1) = (grid.x(i, j), grid.y(i, j));
                let (x2, y2) = (grid.x(i + 1, j), grid.y(i + 1, j));
                match self.horizontal[j * (self.width - 1) + i] {
                    HSide::Absent => {}
                    HSide::Top => flipset.eflip(Edge::new(x1, y1, x2, y2)),
                    HSide::Bottom => flipset.eflip(Edge::new(x2, y2, x1, y1)),
                }
            }
        }

        for j in 0..self.height - 1 {
            for i in 0..self.width {
                let (x1, y1) = (grid.x(i, j), grid.y(i, j));
                let (x2, y2) = (grid.x(i, j + 1), grid.y(i, j + 1));
                match self.vertical[j * self.width + i] {
                    VSide::Absent => {}
                    VSide::Left => flipset.eflip(Edge::new(x1, y1, x2, y2)),
                    VSide::Right => flipset.eflip(Edge::new(x2, y2, x1, y1)),
                }
            }
        }
    }
}
