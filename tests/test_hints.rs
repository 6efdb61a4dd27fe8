use geo_contour::{CoordHints, Grid, GridPoint, Missing, PointGrid, ValueHints};

/// 100x100 grid with z = i + j.
fn ramp_grid() -> PointGrid {
    PointGrid::from_fn(100, 100, |i, j| {
        GridPoint::new(i as f64, j as f64, (i + j) as f64)
    })
}

#[test]
fn test_value_rectangles_for_bands() {
    let hints = ValueHints::with_max_leaf(&ramp_grid(), Missing::Never, 10).unwrap();

    assert!(hints.rectangles_band(Some(-99.0), Some(-98.0)).is_empty());
    assert!(hints.rectangles_band(Some(998.0), Some(999.0)).is_empty());

    let r = hints.rectangles_band(Some(0.0), Some(5.0));
    assert_eq!(r.len(), 1);
    assert_eq!((r[0].x1, r[0].y1, r[0].x2, r[0].y2), (0, 0, 6, 6));
    assert_eq!((r[0].min, r[0].max), (0.0, 12.0));
    assert!(!r[0].has_missing);

    let r = hints.rectangles_band(Some(0.0), Some(10.0));
    assert_eq!(r.len(), 2);
    assert_eq!((r[0].x1, r[0].y1, r[0].x2, r[0].y2), (0, 6, 6, 12));
    assert_eq!((r[0].min, r[0].max), (6.0, 18.0));
    assert_eq!((r[1].x1, r[1].y1, r[1].x2, r[1].y2), (0, 0, 12, 6));
    assert_eq!((r[1].min, r[1].max), (0.0, 18.0));
}

#[test]
fn test_value_rectangles_for_single_values() {
    let hints = ValueHints::with_max_leaf(&ramp_grid(), Missing::Never, 10).unwrap();

    let r = hints.rectangles_value(0.0);
    assert_eq!(r.len(), 1);
    assert_eq!((r[0].x1, r[0].y1, r[0].x2, r[0].y2), (0, 0, 6, 6));

    let r = hints.rectangles_value(10.0);
    assert_eq!(r.len(), 2);
    assert_eq!((r[0].x1, r[0].y1, r[0].x2, r[0].y2), (0, 6, 6, 12));
    assert_eq!((r[1].x1, r[1].y1, r[1].x2, r[1].y2), (0, 0, 12, 6));
}

#[test]
fn test_value_hints_have_no_false_negatives() {
    let grid = ramp_grid();
    let hints = ValueHints::with_max_leaf(&grid, Missing::Never, 10).unwrap();

    for value in [0.5, 17.0, 99.5, 150.0, 197.5] {
        let rects = hints.rectangles_value(value);
        // Every cell whose corner values straddle the level must be
        // covered by some returned rectangle.
        for j in 0..grid.height() - 1 {
            for i in 0..grid.width() - 1 {
                let corners = [
                    grid.z(i, j),
                    grid.z(i, j + 1),
                    grid.z(i + 1, j + 1),
                    grid.z(i + 1, j),
                ];
                let min = corners.iter().cloned().fold(f64::INFINITY, f64::min);
                let max = corners.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                if min <= value && value <= max {
                    let covered = rects
                        .iter()
                        .any(|r| r.x1 <= i && i < r.x2 && r.y1 <= j && j < r.y2);
                    assert!(covered, "cell ({i},{j}) lost for value {value}");
                }
            }
        }
    }
}

#[test]
fn test_value_rectangles_respect_their_bounds() {
    let grid = ramp_grid();
    let hints = ValueHints::with_max_leaf(&grid, Missing::Never, 10).unwrap();
    for rect in hints.rectangles_band(Some(40.0), Some(60.0)) {
        assert!(rect.x1 < rect.x2 && rect.x2 <= grid.width() - 1);
        assert!(rect.y1 < rect.y2 && rect.y2 <= grid.height() - 1);
        // Reported extrema really bound the rectangle's values.
        for j in rect.y1..=rect.y2 {
            for i in rect.x1..=rect.x2 {
                let z = grid.z(i, j);
                assert!(rect.min <= z && z <= rect.max);
            }
        }
    }
}

/// Functional grid with sheared coordinates x = 2i + j, y = i + 2j.
struct Sheared {
    width: usize,
    height: usize,
}

impl Grid for Sheared {
    fn width(&self) -> usize {
        self.width
    }
    fn height(&self) -> usize {
        self.height
    }
    fn z(&self, _i: usize, _j: usize) -> f64 {
        0.0
    }
    fn x(&self, i: usize, j: usize) -> f64 {
        (2 * i + j) as f64
    }
    fn y(&self, i: usize, j: usize) -> f64 {
        (i + 2 * j) as f64
    }
}

#[test]
fn test_coordinate_rectangles() {
    let grid = Sheared { width: 1000, height: 1000 };
    let hints = CoordHints::new(&grid, Missing::Never).unwrap();

    // Low left corner, trivial query.
    let r = hints.rectangles(0.0, 0.0, 5.0, 5.0);
    assert_eq!(r.len(), 1);
    assert_eq!((r[0].x1, r[0].y1, r[0].x2, r[0].y2), (0, 0, 7, 7));
    assert!(r[0].is_valid);

    // Completely outside.
    let r = hints.rectangles(10000.0, 10000.0, 20000.0, 20000.0);
    assert!(r.is_empty());

    // In the centre every returned rectangle overlaps the query box.
    let r = hints.rectangles(100.0, 100.0, 150.0, 150.0);
    assert!(!r.is_empty());
    for rect in &r {
        let outside = 100.0 > rect.max_x
            || 100.0 > rect.max_y
            || rect.min_x > 150.0
            || rect.min_y > 150.0;
        assert!(!outside, "rectangle {rect:?} does not overlap the query box");
    }
}

#[test]
fn test_coordinate_hints_with_missing_coordinates() {
    // An entirely unusable grid matches nothing.
    struct Nowhere;
    impl Grid for Nowhere {
        fn width(&self) -> usize {
            8
        }
        fn height(&self) -> usize {
            8
        }
        fn z(&self, _i: usize, _j: usize) -> f64 {
            1.0
        }
        fn x(&self, _i: usize, _j: usize) -> f64 {
            f64::NAN
        }
        fn y(&self, _i: usize, _j: usize) -> f64 {
            f64::NAN
        }
    }
    let hints = CoordHints::new(&Nowhere, Missing::Nan).unwrap();
    assert!(hints.rectangles(-1e9, -1e9, 1e9, 1e9).is_empty());
}

#[test]
fn test_missing_values_are_tracked() {
    let grid = PointGrid::from_fn(40, 40, |i, j| {
        let z = if i < 3 && j < 3 { f64::NAN } else { (i + j) as f64 };
        GridPoint::new(i as f64, j as f64, z)
    });
    let hints = ValueHints::with_max_leaf(&grid, Missing::Nan, 10).unwrap();

    let rects = hints.rectangles_band(Some(0.0), Some(500.0));
    assert!(!rects.is_empty());
    let has_missing: Vec<_> = rects.iter().filter(|r| r.has_missing).collect();
    // The corner rectangle containing the NaN block reports it.
    assert!(has_missing.iter().any(|r| r.x1 == 0 && r.y1 == 0));
}
