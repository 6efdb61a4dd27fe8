//! Per-cell contour emission strategies.
//!
//! Each interpolation strategy classifies the corners of a cell
//! against the requested threshold(s) and emits directed edges whose
//! even occurrences cancel: interior edges are produced twice (once
//! per adjacent cell, reversed) and disappear, leaving the contour
//! boundary. All strategies share one signature set and are chosen at
//! request time through static dispatch.
//!
//! [`Linear`] and [`LogLinear`] share the exact case analysis and
//! differ only in the crossing formula and the cell-centre value used
//! for saddle subdivision. [`NearestNeighbour`] and [`Discrete`]
//! place their points at edge midpoints and cell centres instead,
//! producing blocky output with the same cancellation discipline.

mod discrete;
mod linear;
mod log_linear;
mod nearest;

pub use discrete::Discrete;
pub use linear::Linear;
pub use log_linear::LogLinear;
pub use nearest::NearestNeighbour;

use crate::edge::Edge;
use crate::flip_grid::FlipGrid;
use crate::flip_set::FlipSet;
use crate::missing::Missing;

/// One cell corner: world coordinates and the sampled value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Corner {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A per-cell contour emitter.
///
/// Corner order for a rectangle is (i,j), (i,j+1), (i+1,j+1), (i+1,j),
/// which is clockwise when y grows upward; triangles keep the same
/// winding. Unbounded band limits are expressed as `None`.
pub trait Interpolation {
    /// The missing-value predicate applied to corner values.
    fn missing(&self) -> Missing;

    /// Emit the intersection of cell (i,j) with the band `lo <= z < hi`.
    /// Full-cell sides go through the flip grid, everything else
    /// through the flip set.
    fn rectangle_fill(
        &self,
        corners: [Corner; 4],
        cell: (usize, usize),
        lo: Option<f64>,
        hi: Option<f64>,
        flipset: &mut FlipSet,
        flipgrid: &mut FlipGrid,
    );

    /// Emit the isoline `z = value` crossing the cell.
    fn rectangle_line(&self, corners: [Corner; 4], value: f64, flipset: &mut FlipSet);

    /// Band emission for a 3-corner cell (a rectangle with exactly one
    /// missing corner reduces to this).
    fn triangle_fill(
        &self,
        corners: [Corner; 3],
        lo: Option<f64>,
        hi: Option<f64>,
        flipset: &mut FlipSet,
    );

    /// Isoline emission for a 3-corner cell.
    fn triangle_line(&self, corners: [Corner; 3], value: f64, flipset: &mut FlipSet);
}

/// Corner classification against a band or a line level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Place {
    Below,
    Inside,
    Above,
}

use Place::{Above, Below, Inside};

/// Classify against a band. Unbounded limits arrive as NaN, for which
/// both comparisons are false, so every valid value lands Inside --
/// this also covers the -inf..+inf case.
#[inline]
pub(crate) fn place_band(z: f64, lo: f64, hi: f64) -> Place {
    if z < lo {
        Below
    } else if z >= hi {
        Above
    } else {
        Inside
    }
}

/// Classify against a line level: Below iff `z < value`, Above
/// otherwise. This matches the lower boundary of the band
/// `[value, ..)`, so isolines coincide with isoband borders.
#[inline]
pub(crate) fn place_line(z: f64, value: f64) -> Place {
    if z < value {
        Below
    } else {
        Above
    }
}

/// A cell looks like a saddle for some value z if that value would
/// intersect all four edges. Hence if the intersection of the value
/// intervals spanned by the edges is non-empty, there is a potential
/// saddle. The test must not involve the contour limits: every
/// threshold has to make the same subdivision decision or adjacent
/// bands would not share boundaries.
pub(crate) fn is_saddle(z1: f64, z2: f64, z3: f64, z4: f64) -> bool {
    let mut lo = z1.min(z2);
    let mut hi = z1.max(z2);
    lo = lo.max(z2.min(z3));
    hi = hi.min(z2.max(z3));
    if lo >= hi {
        return false;
    }
    lo = lo.max(z3.min(z4));
    hi = hi.min(z3.max(z4));
    if lo >= hi {
        return false;
    }
    lo = lo.max(z4.min(z1));
    hi = hi.min(z4.max(z1));
    hi > lo
}

/// Crossing formula and cell-centre value shared by the linear family.
pub(crate) trait Blend {
    /// Coordinate where the segment a-b reaches `value`. The
    /// arithmetic runs on lexicographically sorted endpoints so both
    /// cells sharing the segment compute bit-identical results; any
    /// disagreement would leave uncancelled slivers.
    fn crossing(a: Corner, b: Corner, value: f64) -> (f64, f64);

    /// Centre value used when a saddle cell is split into triangles.
    fn center(z1: f64, z2: f64, z3: f64, z4: f64) -> f64;
}

/// Push a point unless it repeats the previous one.
fn unique_push(pts: &mut Vec<(f64, f64)>, p: (f64, f64)) {
    if pts.last() != Some(&p) {
        pts.push(p);
    }
}

/// Emit a local polyline as a closed clockwise ring.
fn flush_polygon(pts: &[(f64, f64)], flipset: &mut FlipSet) {
    let n = pts.len();
    if n > 2 {
        for pair in pts.windows(2) {
            flipset.eflip(Edge::new(pair[0].0, pair[0].1, pair[1].0, pair[1].1));
        }
        flipset.eflip(Edge::new(pts[n - 1].0, pts[n - 1].1, pts[0].0, pts[0].1));
    }
}

/// Emit an accumulated line-mode pair as one directed edge.
fn flush_line(pts: &mut Vec<(f64, f64)>, flipset: &mut FlipSet) {
    debug_assert_eq!(pts.len(), 2, "a cell line segment needs exactly 2 coordinates");
    if pts.len() == 2 {
        flipset.eflip(Edge::new(pts[0].0, pts[0].1, pts[1].0, pts[1].1));
    }
    pts.clear();
}

/// Walk one cell edge in fill mode, appending Inside endpoints and
/// band-limit crossings to the local ring under construction.
fn band_edge<B: Blend>(
    pts: &mut Vec<(f64, f64)>,
    a: Corner,
    ca: Place,
    b: Corner,
    cb: Place,
    lo: f64,
    hi: f64,
) {
    match (ca, cb) {
        (Below, Below) | (Above, Above) => {}
        (Below, Inside) => {
            unique_push(pts, B::crossing(a, b, lo));
            unique_push(pts, (b.x, b.y));
        }
        (Below, Above) => {
            unique_push(pts, B::crossing(a, b, lo));
            unique_push(pts, B::crossing(a, b, hi));
        }
        (Inside, Below) => {
            unique_push(pts, (a.x, a.y));
            unique_push(pts, B::crossing(a, b, lo));
        }
        (Inside, Inside) => {
            unique_push(pts, (a.x, a.y));
            unique_push(pts, (b.x, b.y));
        }
        (Inside, Above) => {
            unique_push(pts, (a.x, a.y));
            unique_push(pts, B::crossing(a, b, hi));
        }
        (Above, Below) => {
            unique_push(pts, B::crossing(a, b, hi));
            unique_push(pts, B::crossing(a, b, lo));
        }
        (Above, Inside) => {
            unique_push(pts, B::crossing(a, b, hi));
            unique_push(pts, (b.x, b.y));
        }
    }
}

/// Push the line crossing of one cell edge; only Below/not-Below
/// transitions carry the isoline.
fn line_cross<B: Blend>(
    pts: &mut Vec<(f64, f64)>,
    a: Corner,
    ca: Place,
    b: Corner,
    cb: Place,
    value: f64,
) {
    if (ca == Below) ^ (cb == Below) {
        pts.push(B::crossing(a, b, value));
    }
}

// Triangle handlers for fill mode. Each expects its corners permuted
// into the canonical classification its name states; the dispatcher
// only ever rotates the corners, preserving the clockwise winding.

fn triangle_bbi<B: Blend>(p1: Corner, p2: Corner, p3: Corner, lo: f64, _hi: f64, out: &mut FlipSet) {
    let (ax, ay) = B::crossing(p1, p3, lo);
    let (bx, by) = B::crossing(p2, p3, lo);
    out.eflip(Edge::new(ax, ay, bx, by));
    out.eflip(Edge::new(bx, by, p3.x, p3.y));
    out.eflip(Edge::new(p3.x, p3.y, ax, ay));
}

fn triangle_bba<B: Blend>(p1: Corner, p2: Corner, p3: Corner, lo: f64, hi: f64, out: &mut FlipSet) {
    let (ax, ay) = B::crossing(p1, p3, lo);
    let (bx, by) = B::crossing(p1, p3, hi);
    let (cx, cy) = B::crossing(p2, p3, hi);
    let (dx, dy) = B::crossing(p2, p3, lo);
    out.eflip(Edge::new(ax, ay, dx, dy));
    out.eflip(Edge::new(dx, dy, cx, cy));
    out.eflip(Edge::new(cx, cy, bx, by));
    out.eflip(Edge::new(bx, by, ax, ay));
}

fn triangle_bii<B: Blend>(p1: Corner, p2: Corner, p3: Corner, lo: f64, _hi: f64, out: &mut FlipSet) {
    let (ax, ay) = B::crossing(p1, p2, lo);
    let (bx, by) = B::crossing(p1, p3, lo);
    out.eflip(Edge::new(ax, ay, p2.x, p2.y));
    out.eflip(Edge::new(p2.x, p2.y, p3.x, p3.y));
    out.eflip(Edge::new(p3.x, p3.y, bx, by));
    out.eflip(Edge::new(bx, by, ax, ay));
}

fn triangle_bia<B: Blend>(p1: Corner, p2: Corner, p3: Corner, lo: f64, hi: f64, out: &mut FlipSet) {
    let (ax, ay) = B::crossing(p1, p2, lo);
    let (bx, by) = B::crossing(p2, p3, hi);
    let (cx, cy) = B::crossing(p1, p3, hi);
    let (dx, dy) = B::crossing(p1, p3, lo);
    out.eflip(Edge::new(ax, ay, p2.x, p2.y));
    out.eflip(Edge::new(p2.x, p2.y, bx, by));
    out.eflip(Edge::new(bx, by, cx, cy));
    out.eflip(Edge::new(cx, cy, dx, dy));
    out.eflip(Edge::new(dx, dy, ax, ay));
}

fn triangle_bai<B: Blend>(p1: Corner, p2: Corner, p3: Corner, lo: f64, hi: f64, out: &mut FlipSet) {
    let (ax, ay) = B::crossing(p1, p2, lo);
    let (bx, by) = B::crossing(p1, p2, hi);
    let (cx, cy) = B::crossing(p2, p3, hi);
    let (dx, dy) = B::crossing(p1, p3, lo);
    out.eflip(Edge::new(ax, ay, bx, by));
    out.eflip(Edge::new(bx, by, cx, cy));
    out.eflip(Edge::new(cx, cy, p3.x, p3.y));
    out.eflip(Edge::new(p3.x, p3.y, dx, dy));
    out.eflip(Edge::new(dx, dy, ax, ay));
}

fn triangle_baa<B: Blend>(p1: Corner, p2: Corner, p3: Corner, lo: f64, hi: f64, out: &mut FlipSet) {
    let (ax, ay) = B::crossing(p1, p2, lo);
    let (bx, by) = B::crossing(p1, p2, hi);
    let (cx, cy) = B::crossing(p1, p3, hi);
    let (dx, dy) = B::crossing(p1, p3, lo);
    out.eflip(Edge::new(ax, ay, bx, by));
    out.eflip(Edge::new(bx, by, cx, cy));
    out.eflip(Edge::new(cx, cy, dx, dy));
    out.eflip(Edge::new(dx, dy, ax, ay));
}

fn triangle_iia<B: Blend>(p1: Corner, p2: Corner, p3: Corner, _lo: f64, hi: f64, out: &mut FlipSet) {
    let (ax, ay) = B::crossing(p1, p3, hi);
    let (bx, by) = B::crossing(p2, p3, hi);
    out.eflip(Edge::new(p1.x, p1.y, p2.x, p2.y));
    out.eflip(Edge::new(p2.x, p2.y, bx, by));
    out.eflip(Edge::new(bx, by, ax, ay));
    out.eflip(Edge::new(ax, ay, p1.x, p1.y));
}

fn triangle_iaa<B: Blend>(p1: Corner, p2: Corner, p3: Corner, _lo: f64, hi: f64, out: &mut FlipSet) {
    let (ax, ay) = B::crossing(p1, p2, hi);
    let (bx, by) = B::crossing(p1, p3, hi);
    out.eflip(Edge::new(p1.x, p1.y, ax, ay));
    out.eflip(Edge::new(ax, ay, bx, by));
    out.eflip(Edge::new(bx, by, p1.x, p1.y));
}

/// Fill-mode triangle with pre-computed classifications.
fn fill_triangle_classified<B: Blend>(
    p1: Corner,
    c1: Place,
    p2: Corner,
    c2: Place,
    p3: Corner,
    c3: Place,
    lo: f64,
    hi: f64,
    out: &mut FlipSet,
) {
    match (c1, c2, c3) {
        (Below, Below, Below) | (Above, Above, Above) => {}
        (Below, Below, Inside) => triangle_bbi::<B>(p1, p2, p3, lo, hi, out),
        (Below, Below, Above) => triangle_bba::<B>(p1, p2, p3, lo, hi, out),
        (Below, Inside, Below) => triangle_bbi::<B>(p3, p1, p2, lo, hi, out),
        (Below, Inside, Inside) => triangle_bii::<B>(p1, p2, p3, lo, hi, out),
        (Below, Inside, Above) => triangle_bia::<B>(p1, p2, p3, lo, hi, out),
        (Below, Above, Below) => triangle_bba::<B>(p3, p1, p2, lo, hi, out),
        (Below, Above, Inside) => triangle_bai::<B>(p1, p2, p3, lo, hi, out),
        (Below, Above, Above) => triangle_baa::<B>(p1, p2, p3, lo, hi, out),
        (Inside, Below, Below) => triangle_bbi::<B>(p2, p3, p1, lo, hi, out),
        (Inside, Below, Inside) => triangle_bii::<B>(p2, p3, p1, lo, hi, out),
        (Inside, Below, Above) => triangle_bai::<B>(p2, p3, p1, lo, hi, out),
        (Inside, Inside, Below) => triangle_bii::<B>(p3, p1, p2, lo, hi, out),
        (Inside, Inside, Inside) => {
            out.eflip(Edge::new(p1.x, p1.y, p2.x, p2.y));
            out.eflip(Edge::new(p2.x, p2.y, p3.x, p3.y));
            out.eflip(Edge::new(p3.x, p3.y, p1.x, p1.y));
        }
        (Inside, Inside, Above) => triangle_iia::<B>(p1, p2, p3, lo, hi, out),
        (Inside, Above, Below) => triangle_bia::<B>(p3, p1, p2, lo, hi, out),
        (Inside, Above, Inside) => triangle_iia::<B>(p3, p1, p2, lo, hi, out),
        (Inside, Above, Above) => triangle_iaa::<B>(p1, p2, p3, lo, hi, out),
        (Above, Below, Below) => triangle_bba::<B>(p2, p3, p1, lo, hi, out),
        (Above, Below, Inside) => triangle_bia::<B>(p2, p3, p1, lo, hi, out),
        (Above, Below, Above) => triangle_baa::<B>(p2, p3, p1, lo, hi, out),
        (Above, Inside, Below) => triangle_bai::<B>(p3, p1, p2, lo, hi, out),
        (Above, Inside, Inside) => triangle_iia::<B>(p2, p3, p1, lo, hi, out),
        (Above, Inside, Above) => triangle_iaa::<B>(p2, p3, p1, lo, hi, out),
        (Above, Above, Below) => triangle_baa::<B>(p3, p1, p2, lo, hi, out),
        (Above, Above, Inside) => triangle_iaa::<B>(p3, p1, p2, lo, hi, out),
    }
}

/// Shared fill-mode triangle entry.
pub(crate) fn fill_triangle<B: Blend>(
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
    fill_triangle_classified::<B>(p1, c1, p2, c2, p3, c3, lo, hi, out);
}

/// Shared fill-mode rectangle entry.
pub(crate) fn fill_rectangle<B: Blend>(
    missing: Missing,
    corners: [Corner; 4],
    cell: (usize, usize),
    lo: f64,
    hi: f64,
    flipset: &mut FlipSet,
    flipgrid: &mut FlipGrid,
) {
    let [p1, p2, p3, p4] = corners;

    // With exactly one corner missing the remaining triangle can still
    // be contoured; two or more missing corners skip the cell.
    if missing.is_missing(p1.z) {
        fill_triangle::<B>(missing, [p2, p3, p4], lo, hi, flipset);
        return;
    }
    if missing.is_missing(p2.z) {
        fill_triangle::<B>(missing, [p1, p3, p4], lo, hi, flipset);
        return;
    }
    if missing.is_missing(p3.z) {
        fill_triangle::<B>(missing, [p1, p2, p4], lo, hi, flipset);
        return;
    }
    if missing.is_missing(p4.z) {
        fill_triangle::<B>(missing, [p1, p2, p3], lo, hi, flipset);
        return;
    }

    let c1 = place_band(p1.z, lo, hi);
    let c2 = place_band(p2.z, lo, hi);
    let c3 = place_band(p3.z, lo, hi);
    let c4 = place_band(p4.z, lo, hi);

    if c1 == c2 && c2 == c3 && c3 == c4 {
        // All above or all below leaves nothing; all inside covers the
        // entire cell through the flip grid.
        if c1 == Inside {
            let (i, j) = cell;
            flipgrid.flip_top(i, j);
            flipgrid.flip_right(i, j);
            flipgrid.flip_bottom(i, j);
            flipgrid.flip_left(i, j);
        }
        return;
    }

    if !is_saddle(p1.z, p2.z, p3.z, p4.z) {
        let mut pts = Vec::with_capacity(8);
        band_edge::<B>(&mut pts, p1, c1, p2, c2, lo, hi);
        band_edge::<B>(&mut pts, p2, c2, p3, c3, lo, hi);
        band_edge::<B>(&mut pts, p3, c3, p4, c4, lo, hi);
        band_edge::<B>(&mut pts, p4, c4, p1, c1, lo, hi);
        flush_polygon(&pts, flipset);
    } else {
        let p0 = Corner::new(
            (p1.x + p2.x + p3.x + p4.x) / 4.0,
            (p1.y + p2.y + p3.y + p4.y) / 4.0,
            B::center(p1.z, p2.z, p3.z, p4.z),
        );
        fill_triangle::<B>(missing, [p1, p2, p0], lo, hi, flipset);
        fill_triangle::<B>(missing, [p2, p3, p0], lo, hi, flipset);
        fill_triangle::<B>(missing, [p3, p4, p0], lo, hi, flipset);
        fill_triangle::<B>(missing, [p4, p1, p0], lo, hi, flipset);
    }
}

/// Shared line-mode triangle entry.
pub(crate) fn line_triangle<B: Blend>(
    missing: Missing,
    corners: [Corner; 3],
    value: f64,
    out: &mut FlipSet,
) {
    let [p1, p2, p3] = corners;
    if missing.is_missing(p1.z) || missing.is_missing(p2.z) || missing.is_missing(p3.z) {
        return;
    }
    let c1 = place_line(p1.z, value);
    let c2 = place_line(p2.z, value);
    let c3 = place_line(p3.z, value);

    if c1 == c2 && c2 == c3 {
        return;
    }

    // A triangle with no Below corner contributes nothing. On areas of
    // constant value there is no sensible line definition, so the line
    // is anchored to the infimum side; this also prevents double lines
    // on flat plateaus.
    if c1 != Below && c2 != Below && c3 != Below {
        return;
    }

    // The edges run towards the Above side in a fixed order so that
    // the region z >= value ends up to the right of each edge.
    let mut pts = Vec::with_capacity(2);
    line_cross::<B>(&mut pts, p1, c1, p2, c2, value);
    line_cross::<B>(&mut pts, p2, c2, p3, c3, value);
    let mut final_place = c3;
    if pts.len() != 2 {
        line_cross::<B>(&mut pts, p3, c3, p1, c1, value);
        final_place = c1;
    }

    debug_assert_eq!(pts.len(), 2);
    if pts.len() == 2 {
        if final_place == Below {
            out.eflip(Edge::new(pts[0].0, pts[0].1, pts[1].0, pts[1].1));
        } else {
            out.eflip(Edge::new(pts[1].0, pts[1].1, pts[0].0, pts[0].1));
        }
    }
}

/// Shared line-mode rectangle entry.
pub(crate) fn line_rectangle<B: Blend>(
    missing: Missing,
    corners: [Corner; 4],
    value: f64,
    out: &mut FlipSet,
) {
    let [p1, p2, p3, p4] = corners;

    if missing.is_missing(p1.z) {
        line_triangle::<B>(missing, [p2, p3, p4], value, out);
        return;
    }
    if missing.is_missing(p2.z) {
        line_triangle::<B>(missing, [p1, p3, p4], value, out);
        return;
    }
    if missing.is_missing(p3.z) {
        line_triangle::<B>(missing, [p1, p2, p4], value, out);
        return;
    }
    if missing.is_missing(p4.z) {
        line_triangle::<B>(missing, [p1, p2, p3], value, out);
        return;
    }

    let c1 = place_line(p1.z, value);
    let c2 = place_line(p2.z, value);
    let c3 = place_line(p3.z, value);
    let c4 = place_line(p4.z, value);

    if c1 == c2 && c2 == c3 && c3 == c4 {
        return;
    }

    // The subdivision decision must not depend on the contour value so
    // that isolines match isoband boundaries.
    if is_saddle(p1.z, p2.z, p3.z, p4.z) {
        let p0 = Corner::new(
            (p1.x + p2.x + p3.x + p4.x) / 4.0,
            (p1.y + p2.y + p3.y + p4.y) / 4.0,
            B::center(p1.z, p2.z, p3.z, p4.z),
        );
        line_triangle::<B>(missing, [p1, p2, p0], value, out);
        line_triangle::<B>(missing, [p2, p3, p0], value, out);
        line_triangle::<B>(missing, [p3, p4, p0], value, out);
        line_triangle::<B>(missing, [p4, p1, p0], value, out);
        return;
    }

    let mut pts = Vec::with_capacity(4);
    let cross = |pts: &mut Vec<(f64, f64)>, a: Corner, ca: Place, b: Corner, cb: Place| {
        line_cross::<B>(pts, a, ca, b, cb, value);
    };

    match (c1 == Below, c2 == Below, c3 == Below, c4 == Below) {
        (true, true, true, true) | (false, false, false, false) => {}
        (true, true, true, false) => {
            cross(&mut pts, p4, c4, p1, c1);
            cross(&mut pts, p3, c3, p4, c4);
        }
        (true, true, false, true) => {
            cross(&mut pts, p3, c3, p4, c4);
            cross(&mut pts, p2, c2, p3, c3);
        }
        (true, true, false, false) => {
            cross(&mut pts, p4, c4, p1, c1);
            cross(&mut pts, p2, c2, p3, c3);
        }
        (true, false, true, true) => {
            cross(&mut pts, p2, c2, p3, c3);
            cross(&mut pts, p1, c1, p2, c2);
        }
        (true, false, true, false) => {
            // Ambiguous double crossing: the centre value decides
            // which diagonal pairing is connected.
            let c0 = place_line(B::center(p1.z, p2.z, p3.z, p4.z), value);
            if c0 == Below {
                cross(&mut pts, p2, c2, p3, c3);
                cross(&mut pts, p1, c1, p2, c2);
                flush_line(&mut pts, out);
                cross(&mut pts, p4, c4, p1, c1);
                cross(&mut pts, p3, c3, p4, c4);
            } else {
                cross(&mut pts, p4, c4, p1, c1);
                cross(&mut pts, p1, c1, p2, c2);
                flush_line(&mut pts, out);
                cross(&mut pts, p2, c2, p3, c3);
                cross(&mut pts, p3, c3, p4, c4);
            }
        }
        (true, false, false, true) => {
            cross(&mut pts, p3, c3, p4, c4);
            cross(&mut pts, p1, c1, p2, c2);
        }
        (true, false, false, false) => {
            cross(&mut pts, p4, c4, p1, c1);
            cross(&mut pts, p1, c1, p2, c2);
        }
        (false, true, true, true) => {
            cross(&mut pts, p1, c1, p2, c2);
            cross(&mut pts, p4, c4, p1, c1);
        }
        (false, true, true, false) => {
            cross(&mut pts, p1, c1, p2, c2);
            cross(&mut pts, p3, c3, p4, c4);
        }
        (false, true, false, true) => {
            let c0 = place_line(B::center(p1.z, p2.z, p3.z, p4.z), value);
            if c0 == Above {
                cross(&mut pts, p1, c1, p2, c2);
                cross(&mut pts, p2, c2, p3, c3);
                flush_line(&mut pts, out);
                cross(&mut pts, p3, c3, p4, c4);
                cross(&mut pts, p4, c4, p1, c1);
            } else {
                cross(&mut pts, p1, c1, p2, c2);
                cross(&mut pts, p4, c4, p1, c1);
                flush_line(&mut pts, out);
                cross(&mut pts, p3, c3, p4, c4);
                cross(&mut pts, p2, c2, p3, c3);
            }
        }
        (false, true, false, false) => {
            cross(&mut pts, p1, c1, p2, c2);
            cross(&mut pts, p2, c2, p3, c3);
        }
        (false, false, true, true) => {
            cross(&mut pts, p2, c2, p3, c3);
            cross(&mut pts, p4, c4, p1, c1);
        }
        (false, false, true, false) => {
            cross(&mut pts, p2, c2, p3, c3);
            cross(&mut pts, p3, c3, p4, c4);
        }
        (false, false, false, true) => {
            cross(&mut pts, p3, c3, p4, c4);
            cross(&mut pts, p4, c4, p1, c1);
        }
    }

    if !pts.is_empty() {
        flush_line(&mut pts, out);
    }
}
