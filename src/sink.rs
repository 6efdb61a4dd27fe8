//! Geometry sinks.
//!
//! The engine never formats its own output: finished rings are handed
//! to a [`GeometrySink`], which may build GeoJSON, feed a renderer, or
//! simply collect vectors. Shells arrive clockwise and holes
//! counter-clockwise, both closed (first point repeated last);
//! isolines arrive as open or closed polylines.

use geojson::{Geometry, Position, Value as GeoValue};

/// Receives the finished geometry of one contour request.
pub trait GeometrySink {
    /// One isoline polyline.
    fn line_string(&mut self, points: &[(f64, f64)]);

    /// One polygon: a clockwise shell and its counter-clockwise holes.
    fn polygon(&mut self, shell: &[(f64, f64)], holes: &[&[(f64, f64)]]);
}

/// Collects geometry into plain vectors.
#[derive(Debug, Default)]
pub struct CollectSink {
    pub lines: Vec<Vec<(f64, f64)>>,
    /// (shell, holes) pairs in delivery order.
    pub polygons: Vec<(Vec<(f64, f64)>, Vec<Vec<(f64, f64)>>)>,
}

impl GeometrySink for CollectSink {
    fn line_string(&mut self, points: &[(f64, f64)]) {
        self.lines.push(points.to_vec());
    }

    fn polygon(&mut self, shell: &[(f64, f64)], holes: &[&[(f64, f64)]]) {
        self.polygons
            .push((shell.to_vec(), holes.iter().map(|h| h.to_vec()).collect()));
    }
}

/// Default coordinate precision of the GeoJSON sink: 5 decimal places,
/// approximately 1 meter for geographic coordinates.
pub const DEFAULT_PRECISION: u32 = 5;

/// Round a coordinate value to the given number of decimal places.
fn round_coord(value: f64, precision: u32) -> f64 {
    let factor = 10_f64.powi(precision as i32);
    (value * factor).round() / factor
}

/// Builds GeoJSON MultiPolygon / MultiLineString geometry.
#[derive(Debug, Default)]
pub struct GeoJsonSink {
    precision: Option<u32>,
    polygons: Vec<Vec<Vec<Position>>>,
    lines: Vec<Vec<Position>>,
}

impl GeoJsonSink {
    /// Full-precision sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink rounding coordinates to `precision` decimal places.
    pub fn with_precision(precision: u32) -> Self {
        Self { precision: Some(precision), ..Self::default() }
    }

    fn position(&self, p: (f64, f64)) -> Position {
        match self.precision {
            Some(prec) => vec![round_coord(p.0, prec), round_coord(p.1, prec)],
            None => vec![p.0, p.1],
        }
    }

    fn ring(&self, points: &[(f64, f64)]) -> Vec<Position> {
        points.iter().map(|&p| self.position(p)).collect()
    }

    /// The accumulated polygons as a MultiPolygon geometry.
    pub fn into_multi_polygon(self) -> Geometry {
        Geometry::new(GeoValue::MultiPolygon(self.polygons))
    }

    /// The accumulated polylines as a MultiLineString geometry.
    pub fn into_multi_line_string(self) -> Geometry {
        Geometry::new(GeoValue::MultiLineString(self.lines))
    }
}

impl GeometrySink for GeoJsonSink {
    fn line_string(&mut self, points: &[(f64, f64)]) {
        let line = self.ring(points);
        self.lines.push(line);
    }

    fn polygon(&mut self, shell: &[(f64, f64)], holes: &[&[(f64, f64)]]) {
        let mut rings = Vec::with_capacity(1 + holes.len());
        rings.push(self.ring(shell));
        for hole in holes {
            rings.push(self.ring(hole));
        }
        self.polygons.push(rings);
    }
}
