//! Assembles cancelled edge sets into rings and delivers geometry.
//!
//! The contourer produces all edges directed so that the filled
//! interior is to the right. Every shell built from them is therefore
//! automatically clockwise and every hole counter-clockwise.
//!
//! Once the edges are collected into a lexicographically sorted
//! vector, polylines are grown edge by edge: the successor of an edge
//! is looked up among the edges starting at its end point, using the
//! previous match position as a search hint. Several candidates at a
//! junction are resolved by taking the one that turns most clockwise,
//! which keeps the interior to the right through saddle pinch points.
//! An edge already assigned to the polyline under construction marks a
//! self-touch whose loop is split off as its own ring; an edge of an
//! older, still-open polyline lets isoline fragments chain together.

use std::collections::HashMap;

use crate::edge::Edge;
use crate::error::{ContourError, Diagnostics, Warning};
use crate::ring::Ring;
use crate::sink::GeometrySink;

/// Sentinel for an edge not yet assigned to any polyline.
const UNASSIGNED: usize = usize::MAX;

struct Assembly {
    polylines: Vec<Ring>,
    /// Edge index -> polyline index.
    targets: Vec<usize>,
    /// Polyline index -> representative non-vertical edge index,
    /// the origin of the vertical ray used for hole classification.
    ring_edge: Vec<usize>,
}

/// Find the first edge starting at `end`, exploiting the sorted order.
/// `pos` and `lastpos` are the previous two match positions; their
/// difference extrapolates how far to jump before stepping linearly.
fn find_first_match(
    end: (f64, f64),
    edges: &[Edge],
    pos: usize,
    lastpos: usize,
) -> Option<usize> {
    let n = edges.len() as i64;
    let (qx, qy) = end;

    let mut pos = pos as i64 + (pos as i64 - lastpos as i64);
    pos = pos.clamp(0, n - 1);

    if edges[pos as usize].cmp_start(qx, qy) != std::cmp::Ordering::Less {
        // Search left for a smaller start, then test its successor.
        loop {
            pos -= 1;
            if pos < 0 || edges[pos as usize].cmp_start(qx, qy) == std::cmp::Ordering::Less {
                pos += 1;
                if edges[pos as usize].starts_at(qx, qy) {
                    return Some(pos as usize);
                }
                return None;
            }
        }
    } else {
        // Search right for the first match or a greater start.
        loop {
            pos += 1;
            if pos >= n {
                return None;
            }
            let e = &edges[pos as usize];
            if e.cmp_start(qx, qy) == std::cmp::Ordering::Less {
                continue;
            }
            if e.starts_at(qx, qy) {
                return Some(pos as usize);
            }
            return None;
        }
    }
}

struct Match {
    index: Option<usize>,
    self_touch: bool,
    isoline_extension: bool,
}

/// Pick the best edge to continue with among all candidates sharing
/// the polyline's end point.
fn pick_best_match(
    polylines: &[Ring],
    polyline: &Ring,
    edges: &[Edge],
    targets: &[usize],
    pos: Option<usize>,
    polyline_index: usize,
) -> Match {
    let mut result = Match { index: None, self_touch: false, isoline_extension: false };
    let Some(pos) = pos else {
        return result;
    };

    let (qx, qy) = polyline.last();

    // An edge assigned to the current polyline signals a self-touch;
    // an edge of an older unclosed polyline is a viable continuation.
    let mut available: Vec<usize> = Vec::new();
    for (i, edge) in edges.iter().enumerate().skip(pos) {
        if !edge.starts_at(qx, qy) {
            break;
        }
        let target = targets[i];
        if target == UNASSIGNED {
            available.push(i);
        } else if target == polyline_index {
            result.self_touch = true;
        } else if !polylines[target].closed() {
            available.push(i);
        }
    }

    if available.is_empty() {
        return result;
    }

    let best = if available.len() == 1 {
        available[0]
    } else {
        // Pick the edge turning most clockwise with respect to the end
        // of the polyline: most negative symmetric modulo in -180..180.
        let alpha1 = polyline.end_angle();
        let mut best = available[0];
        let mut best_angle = 999.0;
        for &i in &available {
            let alpha2 = edges[i].angle();
            let angle = (alpha2 - alpha1 + 180.0 + 360.0) % 360.0 - 180.0;
            if angle < best_angle {
                best_angle = angle;
                best = i;
            }
        }
        best
    };

    // Extending an old isoline if the best match is not closed; it
    // will never close on its own or the algorithm would already have
    // closed it.
    if targets[best] != UNASSIGNED && targets[best] < polylines.len() {
        result.isoline_extension = !polylines[targets[best]].closed();
    }

    result.index = Some(best);
    result
}

/// Last non-vertical edge of the polyline, scanned backwards.
fn representative_edge(edges: &[Edge], edgeindexes: &[usize]) -> usize {
    for i in (1..edgeindexes.len()).rev() {
        let idx = edgeindexes[i];
        if edges[idx].x1() != edges[idx].x2() {
            return idx;
        }
    }
    0
}

fn assemble<D: Diagnostics>(edges: &[Edge], diag: &mut D) -> Result<Assembly, ContourError> {
    let mut polylines: Vec<Ring> = Vec::new();
    let mut targets = vec![UNASSIGNED; edges.len()];
    let mut ring_edge: Vec<usize> = Vec::new();

    // Scan position for the next free starting edge.
    let mut scan = 0;

    loop {
        let Some(start) = (scan..edges.len()).find(|&i| targets[i] == UNASSIGNED) else {
            break;
        };
        scan = start + 1;

        let first = &edges[start];
        let mut polyline = Ring::from_edge(first.x1(), first.y1(), first.x2(), first.y2());
        targets[start] = polylines.len();

        // Selected edges, kept for re-indexing on self-touches.
        let mut edgeindexes: Vec<usize> = vec![start];

        let mut index = start;
        let mut lastindex = start;

        loop {
            let hint = index;
            let found = find_first_match(polyline.last(), edges, index, lastindex);
            let matched =
                pick_best_match(&polylines, &polyline, edges, &targets, found, polylines.len());
            lastindex = hint;

            // No match ends the polyline.
            let Some(best) = matched.index else {
                ring_edge.push(0);
                polylines.push(std::mem::take(&mut polyline));
                break;
            };
            index = best;

            // Split off the ring formed by a self-touch.
            if matched.self_touch {
                let Some(ring) = polyline.remove_self_touch() else {
                    return Err(ContourError::InvalidExtension);
                };
                if ring.signed_area() != 0.0 {
                    ring_edge.push(representative_edge(edges, &edgeindexes));
                    polylines.push(ring);
                    edgeindexes.truncate(polyline.len() - 1);
                    let reindexed = polylines.len();
                    for &ei in &edgeindexes {
                        targets[ei] = reindexed;
                    }
                } else {
                    diag.warn(Warning::DegenerateSelfTouchCut);
                }
            }

            // Chain onto an older open polyline and start afresh.
            if matched.isoline_extension {
                let target = targets[best];
                let current = std::mem::take(&mut polyline);
                match polylines[target].extend_start(current) {
                    Ok(()) => {
                        for &ei in &edgeindexes {
                            targets[ei] = target;
                        }
                    }
                    Err(current) => {
                        // Touching the old polyline somewhere besides
                        // its start point; stop this polyline as-is.
                        ring_edge.push(representative_edge(edges, &edgeindexes));
                        polylines.push(current);
                    }
                }
                break;
            }

            if targets[best] != UNASSIGNED {
                return Err(ContourError::InvalidExtension);
            }
            let edge = &edges[best];
            if !polyline.extend_end(edge.x1(), edge.y1(), edge.x2(), edge.y2()) {
                return Err(ContourError::InvalidExtension);
            }
            targets[best] = polylines.len();
            edgeindexes.push(best);

            if polyline.closed() {
                ring_edge.push(representative_edge(edges, &edgeindexes));
                polylines.push(std::mem::take(&mut polyline));
                break;
            }
        }
    }

    Ok(Assembly { polylines, targets, ring_edge })
}

/// Find the shell enclosing the hole whose representative edge is
/// `edge_index`, by casting a vertical ray up from the edge midpoint.
/// The midpoint is chosen because rings are guaranteed not to touch
/// there, so a strict ordering of the crossings exists. The scan over
/// candidate edges is bounded by the maximum edge width.
fn find_shell(
    targets: &[usize],
    edges: &[Edge],
    edge_index: usize,
    hole_index: usize,
    max_edge_width: f64,
) -> Option<usize> {
    let x = (edges[edge_index].x1() + edges[edge_index].x2()) / 2.0;
    let y = (edges[edge_index].y1() + edges[edge_index].y2()) / 2.0;

    // Skip to the last edge that could still reach x.
    let mut pos = edge_index + 1;
    while pos < edges.len() && edges[pos].x1() - max_edge_width <= x {
        pos += 1;
    }

    // Crossing count per polyline and the crossing y-coordinates.
    let mut counts: HashMap<usize, usize> = HashMap::new();
    let mut intersections: Vec<(f64, usize)> = Vec::new();

    while pos > 0 {
        pos -= 1;
        let edge = &edges[pos];
        let (x1, y1, x2, y2) = (edge.x1(), edge.y1(), edge.x2(), edge.y2());

        if x1 + max_edge_width < x {
            // No further edge can reach x.
            break;
        } else if y1 < y && y2 < y {
            // Below the ray origin.
        } else if x1 >= x && x2 >= x {
            // Entirely to the right; note the half-open convention
            // x1 <= x < x2 so shared endpoints count once.
        } else if x1 < x && x2 < x {
            // Entirely to the left.
        } else if targets[pos] == hole_index {
            // The hole itself.
        } else if x1 == x2 {
            // Vertical edges cannot cross a vertical ray.
        } else {
            let alpha = (y2 - y1) / (x2 - x1);
            let ysect = alpha * (x - x1) + y1;
            if y < ysect {
                let polyline = targets[pos];
                *counts.entry(polyline).or_insert(0) += 1;
                intersections.push((ysect, polyline));
            }
        }
    }

    // The enclosing shell is the polyline with the smallest crossing
    // above the hole and an odd crossing count.
    intersections.sort_by(|a, b| a.0.total_cmp(&b.0));
    for (_, polyline) in intersections {
        if counts[&polyline] % 2 != 0 {
            return Some(polyline);
        }
    }
    None
}

/// Build polygons from fill-mode edges and deliver them to the sink.
pub fn fill<S, D>(edges: &[Edge], sink: &mut S, diag: &mut D) -> Result<(), ContourError>
where
    S: GeometrySink,
    D: Diagnostics,
{
    let assembly = assemble(edges, diag)?;
    let Assembly { polylines, targets, ring_edge } = assembly;

    if polylines.is_empty() {
        return Ok(());
    }

    for (i, polyline) in polylines.iter().enumerate() {
        if !polyline.closed() {
            diag.warn(Warning::RingNotClosed { ring: i });
        }
    }

    let max_edge_width =
        edges.iter().map(|e| (e.x1() - e.x2()).abs()).fold(-1.0_f64, f64::max);

    // Shells keep their polyline order.
    let mut shell_position: HashMap<usize, usize> = HashMap::new();
    let mut shells: Vec<usize> = Vec::new();
    for (i, polyline) in polylines.iter().enumerate() {
        if polyline.closed() && polyline.is_clockwise() {
            shell_position.insert(i, shells.len());
            shells.push(i);
        }
    }

    let mut shell_holes: Vec<Vec<usize>> = vec![Vec::new(); shells.len()];
    for (i, polyline) in polylines.iter().enumerate() {
        if !polyline.closed() || polyline.is_clockwise() {
            continue;
        }
        let owner = find_shell(&targets, edges, ring_edge[i], i, max_edge_width)
            .and_then(|owner| shell_position.get(&owner).copied());
        match owner {
            Some(position) => shell_holes[position].push(i),
            None => diag.warn(Warning::DegenerateHole { hole: i }),
        }
    }

    for (position, &shell) in shells.iter().enumerate() {
        let holes: Vec<&[(f64, f64)]> =
            shell_holes[position].iter().map(|&h| polylines[h].points()).collect();
        sink.polygon(polylines[shell].points(), &holes);
    }

    Ok(())
}

/// Build linestrings from line-mode edges and deliver them to the
/// sink. Open polylines are expected; classification is skipped.
pub fn line<S, D>(edges: &[Edge], sink: &mut S, diag: &mut D) -> Result<(), ContourError>
where
    S: GeometrySink,
    D: Diagnostics,
{
    let assembly = assemble(edges, diag)?;
    for polyline in &assembly.polylines {
        if !polyline.is_empty() {
            sink.line_string(polyline.points());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollectDiagnostics;
    use crate::flip_set::FlipSet;
    use crate::sink::CollectSink;

    fn sorted(edges: Vec<Edge>) -> Vec<Edge> {
        let mut set = FlipSet::new();
        for e in edges {
            set.flip(e);
        }
        set.finish()
    }

    #[test]
    fn test_single_square_ring() {
        let edges = sorted(vec![
            Edge::new(0.0, 0.0, 0.0, 1.0),
            Edge::new(0.0, 1.0, 1.0, 1.0),
            Edge::new(1.0, 1.0, 1.0, 0.0),
            Edge::new(1.0, 0.0, 0.0, 0.0),
        ]);
        let mut sink = CollectSink::default();
        let mut diag = CollectDiagnostics::default();
        fill(&edges, &mut sink, &mut diag).unwrap();

        assert_eq!(sink.polygons.len(), 1);
        let (shell, holes) = &sink.polygons[0];
        assert_eq!(shell.len(), 5);
        assert_eq!(shell.first(), shell.last());
        assert!(holes.is_empty());
        assert!(diag.warnings.is_empty());
    }

    #[test]
    fn test_shell_with_hole() {
        // Outer square CW, inner square CCW (a hole).
        let edges = sorted(vec![
            Edge::new(0.0, 0.0, 0.0, 3.0),
            Edge::new(0.0, 3.0, 3.0, 3.0),
            Edge::new(3.0, 3.0, 3.0, 0.0),
            Edge::new(3.0, 0.0, 0.0, 0.0),
            Edge::new(1.0, 1.0, 2.0, 1.0),
            Edge::new(2.0, 1.0, 2.0, 2.0),
            Edge::new(2.0, 2.0, 1.0, 2.0),
            Edge::new(1.0, 2.0, 1.0, 1.0),
        ]);
        let mut sink = CollectSink::default();
        let mut diag = CollectDiagnostics::default();
        fill(&edges, &mut sink, &mut diag).unwrap();

        assert_eq!(sink.polygons.len(), 1);
        let (shell, holes) = &sink.polygons[0];
        assert_eq!(shell.len(), 5);
        assert_eq!(holes.len(), 1);
        assert_eq!(holes[0].len(), 5);
        assert!(diag.warnings.is_empty());
    }

    #[test]
    fn test_two_disjoint_shells() {
        let edges = sorted(vec![
            Edge::new(0.0, 0.0, 0.0, 1.0),
            Edge::new(0.0, 1.0, 1.0, 1.0),
            Edge::new(1.0, 1.0, 1.0, 0.0),
            Edge::new(1.0, 0.0, 0.0, 0.0),
            Edge::new(5.0, 0.0, 5.0, 1.0),
            Edge::new(5.0, 1.0, 6.0, 1.0),
            Edge::new(6.0, 1.0, 6.0, 0.0),
            Edge::new(6.0, 0.0, 5.0, 0.0),
        ]);
        let mut sink = CollectSink::default();
        let mut diag = CollectDiagnostics::default();
        fill(&edges, &mut sink, &mut diag).unwrap();
        assert_eq!(sink.polygons.len(), 2);
    }

    #[test]
    fn test_open_polyline_in_line_mode() {
        let edges = sorted(vec![
            Edge::new(0.0, 0.0, 1.0, 1.0),
            Edge::new(1.0, 1.0, 2.0, 1.0),
            Edge::new(2.0, 1.0, 3.0, 0.0),
        ]);
        let mut sink = CollectSink::default();
        let mut diag = CollectDiagnostics::default();
        line(&edges, &mut sink, &mut diag).unwrap();

        assert_eq!(sink.lines.len(), 1);
        assert_eq!(sink.lines[0].len(), 4);
        assert_eq!(sink.lines[0][0], (0.0, 0.0));
        assert_eq!(sink.lines[0][3], (3.0, 0.0));
    }

    #[test]
    fn test_figure_eight_splits_at_touch_point() {
        // Two CW squares sharing the corner (1,1).
        let edges = sorted(vec![
            Edge::new(0.0, 0.0, 0.0, 1.0),
            Edge::new(0.0, 1.0, 1.0, 1.0),
            Edge::new(1.0, 1.0, 1.0, 0.0),
            Edge::new(1.0, 0.0, 0.0, 0.0),
            Edge::new(1.0, 1.0, 1.0, 2.0),
            Edge::new(1.0, 2.0, 2.0, 2.0),
            Edge::new(2.0, 2.0, 2.0, 1.0),
            Edge::new(2.0, 1.0, 1.0, 1.0),
        ]);
        let mut sink = CollectSink::default();
        let mut diag = CollectDiagnostics::default();
        fill(&edges, &mut sink, &mut diag).unwrap();

        assert_eq!(sink.polygons.len(), 2);
        for (shell, holes) in &sink.polygons {
            assert_eq!(shell.first(), shell.last());
            assert!(holes.is_empty());
        }
    }
}
