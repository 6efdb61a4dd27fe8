use geo_contour::{CollectSink, Contourer, GridPoint, Linear, Missing, PointGrid};

fn contour_line(grid: &PointGrid, value: f64) -> CollectSink {
    let mut contourer = Contourer::new(Linear::new(Missing::Nan));
    let mut sink = CollectSink::default();
    contourer.line(grid, value, &mut sink).unwrap();
    sink
}

#[test]
fn test_single_cell_pulse() {
    // One hot corner at (0,1): the half-level isoline is a single open
    // segment cutting the corner off.
    let grid = PointGrid::from_fn(2, 2, |i, j| {
        let z = if (i, j) == (0, 1) { 1.0 } else { 0.0 };
        GridPoint::new(i as f64, j as f64, z)
    });
    let sink = contour_line(&grid, 0.5);

    assert_eq!(sink.lines.len(), 1);
    let line = &sink.lines[0];
    assert_eq!(line.len(), 2);
    let mut ends = line.clone();
    ends.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
    assert_eq!(ends, vec![(0.0, 0.5), (0.5, 1.0)]);
}

#[test]
fn test_closed_isoline_around_a_bump() {
    let grid = PointGrid::from_fn(12, 12, |i, j| {
        let dx = i as f64 - 5.5;
        let dy = j as f64 - 5.5;
        GridPoint::new(i as f64, j as f64, dx * dx + dy * dy)
    });
    let sink = contour_line(&grid, 9.0);

    assert_eq!(sink.lines.len(), 1);
    let line = &sink.lines[0];
    assert_eq!(line.first(), line.last());
    assert!(line.len() > 8);
    // Every vertex sits on the z = 9 contour within interpolation
    // accuracy of the radius.
    for &(x, y) in line {
        let r = ((x - 5.5).powi(2) + (y - 5.5).powi(2)).sqrt();
        assert!((r - 3.0).abs() < 0.2, "vertex ({x},{y}) at radius {r}");
    }
}

#[test]
fn test_plateau_produces_no_double_lines() {
    // Columns at the isoline value form a flat plateau; only the two
    // plateau borders carry a line, the plateau interior none.
    let grid = PointGrid::from_fn(4, 2, |i, j| {
        let z = if i == 1 || i == 2 { 1.0 } else { 0.0 };
        GridPoint::new(i as f64, j as f64, z)
    });
    let sink = contour_line(&grid, 1.0);

    assert_eq!(sink.lines.len(), 2);
    let mut xs: Vec<f64> = sink.lines.iter().map(|l| l[0].0).collect();
    xs.sort_by(f64::total_cmp);
    assert_eq!(xs, vec![1.0, 2.0]);
    for line in &sink.lines {
        assert_eq!(line.len(), 2);
        assert_eq!(line[0].0, line[1].0);
    }
}

#[test]
fn test_isoline_fragments_chain_into_one_polyline() {
    // A tilted plane: the isoline crosses the whole grid as one
    // straight polyline assembled from per-cell segments.
    let grid = PointGrid::from_fn(6, 6, |i, j| {
        GridPoint::new(i as f64, j as f64, (i + j) as f64)
    });
    let sink = contour_line(&grid, 4.5);

    assert_eq!(sink.lines.len(), 1);
    let line = &sink.lines[0];
    assert!(line.len() >= 2);
    assert_ne!(line.first(), line.last());
    for &(x, y) in line {
        assert!((x + y - 4.5).abs() < 1e-12);
    }
}

#[test]
fn test_line_matches_band_boundary() {
    // The isoline at v coincides vertex-for-vertex with the lower
    // boundary of the band [v, ..): both classify corners identically
    // and interpolate on canonically sorted endpoints.
    let grid = PointGrid::from_fn(10, 10, |i, j| {
        let dx = i as f64 - 4.5;
        let dy = j as f64 - 4.5;
        GridPoint::new(i as f64, j as f64, dx * dx + dy * dy)
    });

    let line_sink = contour_line(&grid, 8.0);

    let mut contourer = Contourer::new(Linear::new(Missing::Nan));
    let mut band_sink = CollectSink::default();
    contourer.fill(&grid, Some(8.0), None, &mut band_sink).unwrap();

    // The unbounded-above band's hole is the z = 8 ring.
    assert_eq!(band_sink.polygons.len(), 1);
    let holes = &band_sink.polygons[0].1;
    assert_eq!(holes.len(), 1);
    assert_eq!(line_sink.lines.len(), 1);

    let mut band_points: Vec<(f64, f64)> = holes[0].clone();
    let mut line_points: Vec<(f64, f64)> = line_sink.lines[0].clone();
    let key = |p: &(f64, f64)| (p.0.to_bits(), p.1.to_bits());
    band_points.sort_by_key(key);
    band_points.dedup();
    line_points.sort_by_key(key);
    line_points.dedup();
    assert_eq!(band_points, line_points);
}

#[test]
fn test_isoline_is_deterministic() {
    let grid = PointGrid::from_fn(16, 16, |i, j| {
        GridPoint::new(i as f64, j as f64, ((i * 7 + j * 13) % 11) as f64)
    });
    let a = contour_line(&grid, 5.0);
    let b = contour_line(&grid, 5.0);
    assert_eq!(a.lines, b.lines);
}
