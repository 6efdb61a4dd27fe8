//! Search trees for pruning cells by value range and coordinate bbox.
//!
//! Both trees are binary partitions of the grid's corner-index
//! rectangle, built once per grid and reused across thresholds: the
//! recursion halves the longer dimension until leaves span at most
//! `max_leaf` indices, and every node aggregates the statistics of its
//! subtree. Queries return the minimal set of node rectangles that can
//! contain the requested value range or bounding box: when both
//! children of a node match, the parent stands in for the whole
//! subtree.
//!
//! Nodes live in a flat vector addressed by indices, with a sentinel
//! for missing children. Trees are immutable once built and can be
//! shared freely between threads.

use crate::error::ContourError;
use crate::grid::Grid;
use crate::missing::Missing;

/// Default bound on the index span of a leaf rectangle.
pub const DEFAULT_MAX_LEAF: usize = 10;

const NIL: u32 = u32::MAX;

/// Corner-index rectangle with value statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRect {
    pub x1: usize,
    pub y1: usize,
    pub x2: usize,
    pub y2: usize,
    pub min: f64,
    pub max: f64,
    pub has_missing: bool,
}

/// Corner-index rectangle with coordinate statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordRect {
    pub x1: usize,
    pub y1: usize,
    pub x2: usize,
    pub y2: usize,
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    /// False when every corner in the rectangle has missing coordinates.
    pub is_valid: bool,
}

#[derive(Debug, Clone)]
struct ValueNode {
    rect: ValueRect,
    /// True when no corner in the rectangle has a usable value.
    all_missing: bool,
    left: u32,
    right: u32,
}

#[derive(Debug, Clone)]
struct CoordNode {
    rect: CoordRect,
    left: u32,
    right: u32,
}

fn leaf_split(
    x1: usize,
    y1: usize,
    x2: usize,
    y2: usize,
    max_leaf: usize,
) -> Option<(usize, usize, usize, usize, usize, usize, usize, usize)> {
    let gw = x2 - x1;
    let gh = y2 - y1;
    if (gw <= max_leaf && gh <= max_leaf) || gw <= 1 || gh <= 1 {
        return None;
    }
    // Split the longer dimension; children share the boundary index so
    // no cell is covered twice.
    if gw > gh {
        let x = (x1 + x2) / 2;
        Some((x1, y1, x, y2, x, y1, x2, y2))
    } else {
        let y = (y1 + y2) / 2;
        Some((x1, y1, x2, y, x1, y, x2, y2))
    }
}

/// Binary partition of the grid indexed by the min/max of z.
#[derive(Debug, Clone)]
pub struct ValueHints {
    nodes: Vec<ValueNode>,
    root: u32,
    missing: Missing,
}

impl ValueHints {
    pub fn new<G: Grid>(grid: &G, missing: Missing) -> Result<Self, ContourError> {
        Self::with_max_leaf(grid, missing, DEFAULT_MAX_LEAF)
    }

    pub fn with_max_leaf<G: Grid>(
        grid: &G,
        missing: Missing,
        max_leaf: usize,
    ) -> Result<Self, ContourError> {
        if grid.width() == 0 || grid.height() == 0 {
            return Err(ContourError::EmptyGrid);
        }
        let mut hints = Self { nodes: Vec::new(), root: NIL, missing };
        hints.root = hints.build(grid, max_leaf, 0, 0, grid.width() - 1, grid.height() - 1);
        Ok(hints)
    }

    fn build<G: Grid>(
        &mut self,
        grid: &G,
        max_leaf: usize,
        x1: usize,
        y1: usize,
        x2: usize,
        y2: usize,
    ) -> u32 {
        match leaf_split(x1, y1, x2, y2, max_leaf) {
            None => {
                let mut has_missing = false;
                let mut min = f64::NAN;
                let mut max = f64::NAN;
                let mut any = false;
                for j in y1..=y2 {
                    for i in x1..=x2 {
                        let value = grid.z(i, j);
                        if self.missing.is_missing(value) {
                            has_missing = true;
                        } else if !any {
                            any = true;
                            min = value;
                            max = value;
                        } else {
                            min = min.min(value);
                            max = max.max(value);
                        }
                    }
                }
                self.push(ValueNode {
                    rect: ValueRect { x1, y1, x2, y2, min, max, has_missing },
                    all_missing: !any,
                    left: NIL,
                    right: NIL,
                })
            }
            Some((lx1, ly1, lx2, ly2, rx1, ry1, rx2, ry2)) => {
                let left = self.build(grid, max_leaf, lx1, ly1, lx2, ly2);
                let right = self.build(grid, max_leaf, rx1, ry1, rx2, ry2);
                let l = &self.nodes[left as usize];
                let r = &self.nodes[right as usize];
                let has_missing = l.rect.has_missing | r.rect.has_missing;
                let (min, max, all_missing) = if l.all_missing {
                    (r.rect.min, r.rect.max, r.all_missing)
                } else if r.all_missing {
                    (l.rect.min, l.rect.max, false)
                } else {
                    (l.rect.min.min(r.rect.min), l.rect.max.max(r.rect.max), false)
                };
                self.push(ValueNode {
                    rect: ValueRect { x1, y1, x2, y2, min, max, has_missing },
                    all_missing,
                    left,
                    right,
                })
            }
        }
    }

    fn push(&mut self, node: ValueNode) -> u32 {
        self.nodes.push(node);
        (self.nodes.len() - 1) as u32
    }

    /// Minimal set of rectangles whose [min,max] interval contains the
    /// value. Querying with a value the missing predicate rejects
    /// returns the rectangles holding only missing data.
    pub fn rectangles_value(&self, value: f64) -> Vec<ValueRect> {
        if self.missing.is_missing(value) {
            self.query(&|node: &ValueNode| node.all_missing)
        } else {
            self.query(&|node: &ValueNode| {
                !node.all_missing && node.rect.min <= value && value <= node.rect.max
            })
        }
    }

    /// Minimal set of rectangles overlapping the band. A `None` bound
    /// means unbounded on that side.
    pub fn rectangles_band(&self, lo: Option<f64>, hi: Option<f64>) -> Vec<ValueRect> {
        self.query(&|node: &ValueNode| {
            if node.all_missing {
                return false;
            }
            match (lo, hi) {
                (Some(lo), Some(hi)) => lo.max(node.rect.min) <= hi.min(node.rect.max),
                (Some(lo), None) => node.rect.max >= lo,
                (None, Some(hi)) => node.rect.min <= hi,
                (None, None) => true,
            }
        })
    }

    fn query(&self, pred: &dyn Fn(&ValueNode) -> bool) -> Vec<ValueRect> {
        let mut out = Vec::new();
        if self.find(&mut out, self.root, pred) {
            out.push(self.nodes[self.root as usize].rect);
        }
        out
    }

    fn find(&self, out: &mut Vec<ValueRect>, index: u32, pred: &dyn Fn(&ValueNode) -> bool) -> bool {
        let node = &self.nodes[index as usize];
        if !pred(node) {
            return false;
        }
        if node.left == NIL {
            return true;
        }
        let left_ok = self.find(out, node.left, pred);
        let right_ok = self.find(out, node.right, pred);
        if left_ok && right_ok {
            return true;
        }
        if left_ok {
            out.push(self.nodes[node.left as usize].rect);
        }
        if right_ok {
            out.push(self.nodes[node.right as usize].rect);
        }
        false
    }
}

/// Binary partition of the grid indexed by the min/max of (x,y).
#[derive(Debug, Clone)]
pub struct CoordHints {
    nodes: Vec<CoordNode>,
    root: u32,
    missing: Missing,
}

impl CoordHints {
    pub fn new<G: Grid>(grid: &G, missing: Missing) -> Result<Self, ContourError> {
        Self::with_max_leaf(grid, missing, DEFAULT_MAX_LEAF)
    }

    pub fn with_max_leaf<G: Grid>(
        grid: &G,
        missing: Missing,
        max_leaf: usize,
    ) -> Result<Self, ContourError> {
        if grid.width() == 0 || grid.height() == 0 {
            return Err(ContourError::EmptyGrid);
        }
        let mut hints = Self { nodes: Vec::new(), root: NIL, missing };
        hints.root = hints.build(grid, max_leaf, 0, 0, grid.width() - 1, grid.height() - 1);
        Ok(hints)
    }

    fn build<G: Grid>(
        &mut self,
        grid: &G,
        max_leaf: usize,
        x1: usize,
        y1: usize,
        x2: usize,
        y2: usize,
    ) -> u32 {
        match leaf_split(x1, y1, x2, y2, max_leaf) {
            None => {
                let mut rect = CoordRect {
                    x1,
                    y1,
                    x2,
                    y2,
                    min_x: 0.0,
                    min_y: 0.0,
                    max_x: 0.0,
                    max_y: 0.0,
                    is_valid: false,
                };
                for j in y1..=y2 {
                    for i in x1..=x2 {
                        let x = grid.x(i, j);
                        let y = grid.y(i, j);
                        if self.missing.is_missing(x) || self.missing.is_missing(y) {
                            continue;
                        }
                        if !rect.is_valid {
                            rect.is_valid = true;
                            rect.min_x = x;
                            rect.max_x = x;
                            rect.min_y = y;
                            rect.max_y = y;
                        } else {
                            rect.min_x = rect.min_x.min(x);
                            rect.max_x = rect.max_x.max(x);
                            rect.min_y = rect.min_y.min(y);
                            rect.max_y = rect.max_y.max(y);
                        }
                    }
                }
                self.push(CoordNode { rect, left: NIL, right: NIL })
            }
            Some((lx1, ly1, lx2, ly2, rx1, ry1, rx2, ry2)) => {
                let left = self.build(grid, max_leaf, lx1, ly1, lx2, ly2);
                let right = self.build(grid, max_leaf, rx1, ry1, rx2, ry2);
                let l = self.nodes[left as usize].rect;
                let r = self.nodes[right as usize].rect;
                let mut rect = CoordRect {
                    x1,
                    y1,
                    x2,
                    y2,
                    min_x: 0.0,
                    min_y: 0.0,
                    max_x: 0.0,
                    max_y: 0.0,
                    is_valid: false,
                };
                if l.is_valid {
                    rect.is_valid = true;
                    rect.min_x = l.min_x;
                    rect.max_x = l.max_x;
                    rect.min_y = l.min_y;
                    rect.max_y = l.max_y;
                    if r.is_valid {
                        rect.min_x = rect.min_x.min(r.min_x);
                        rect.max_x = rect.max_x.max(r.max_x);
                        rect.min_y = rect.min_y.min(r.min_y);
                        rect.max_y = rect.max_y.max(r.max_y);
                    }
                } else if r.is_valid {
                    rect.is_valid = true;
                    rect.min_x = r.min_x;
                    rect.max_x = r.max_x;
                    rect.min_y = r.min_y;
                    rect.max_y = r.max_y;
                }
                self.push(CoordNode { rect, left, right })
            }
        }
    }

    fn push(&mut self, node: CoordNode) -> u32 {
        self.nodes.push(node);
        (self.nodes.len() - 1) as u32
    }

    /// Minimal set of rectangles whose coordinate bbox overlaps the
    /// query bbox.
    pub fn rectangles(&self, xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Vec<CoordRect> {
        let mut out = Vec::new();
        if self.find(&mut out, self.root, xmin, ymin, xmax, ymax) {
            out.push(self.nodes[self.root as usize].rect);
        }
        out
    }

    fn find(
        &self,
        out: &mut Vec<CoordRect>,
        index: u32,
        xmin: f64,
        ymin: f64,
        xmax: f64,
        ymax: f64,
    ) -> bool {
        let node = &self.nodes[index as usize];
        let rect = &node.rect;
        let no_overlap = !rect.is_valid
            || xmin > rect.max_x
            || ymin > rect.max_y
            || rect.min_x > xmax
            || rect.min_y > ymax;
        if no_overlap {
            return false;
        }
        if node.left == NIL {
            return true;
        }
        let left_ok = self.find(out, node.left, xmin, ymin, xmax, ymax);
        let right_ok = self.find(out, node.right, xmin, ymin, xmax, ymax);
        if left_ok && right_ok {
            return true;
        }
        if left_ok {
            out.push(self.nodes[node.left as usize].rect);
        }
        if right_ok {
            out.push(self.nodes[node.right as usize].rect);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GridPoint, PointGrid};

    #[test]
    fn test_empty_grid_is_an_error() {
        let grid = PointGrid::new(0, 0, Vec::new());
        assert!(matches!(ValueHints::new(&grid, Missing::Never), Err(ContourError::EmptyGrid)));
        assert!(matches!(CoordHints::new(&grid, Missing::Never), Err(ContourError::EmptyGrid)));
    }

    #[test]
    fn test_all_missing_nodes_match_missing_queries_only() {
        let grid = PointGrid::from_fn(4, 4, |i, j| GridPoint::new(i as f64, j as f64, f64::NAN));
        let hints = ValueHints::new(&grid, Missing::Nan).unwrap();
        assert!(hints.rectangles_value(1.0).is_empty());
        assert_eq!(hints.rectangles_value(f64::NAN).len(), 1);
        assert!(hints.rectangles_band(None, None).is_empty());
    }

    #[test]
    fn test_unbounded_band_matches_everything_valid() {
        let grid = PointGrid::from_fn(4, 4, |i, j| {
            GridPoint::new(i as f64, j as f64, (i + j) as f64)
        });
        let hints = ValueHints::new(&grid, Missing::Nan).unwrap();
        let rects = hints.rectangles_band(None, None);
        assert_eq!(rects.len(), 1);
        assert_eq!((rects[0].x1, rects[0].y1, rects[0].x2, rects[0].y2), (0, 0, 3, 3));
    }
}
