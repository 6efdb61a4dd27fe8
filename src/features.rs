//! GeoJSON front-end.
//!
//! Convenience functions turning contour requests into GeoJSON
//! features: one `MultiPolygon` feature per isoband with
//! `lower_level` / `upper_level` properties, one `MultiLineString`
//! feature per isoline with an `isovalue` property. The plural
//! variants contour many levels on Rayon's work-stealing pool; each
//! level is an independent single-threaded request and all of them
//! share the grid and one immutable hint tree.

use geojson::{Feature, FeatureCollection, JsonObject, Value as GeoValue};
use rayon::prelude::*;

use crate::contourer::Contourer;
use crate::error::ContourError;
use crate::grid::Grid;
use crate::hints::ValueHints;
use crate::interpolate::{Interpolation, Linear};
use crate::missing::Missing;
use crate::sink::{GeoJsonSink, DEFAULT_PRECISION};

/// The front-end contours with linear interpolation and NaN gaps.
fn interpolation() -> Linear {
    Linear::new(Missing::Nan)
}

/// Hints must agree with the interpolation on what is missing.
fn hints_for<G: Grid>(grid: &G) -> Result<ValueHints, ContourError> {
    ValueHints::new(grid, interpolation().missing())
}

fn feature_with(geometry: geojson::Geometry, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn band_feature_hinted<G: Grid>(
    grid: &G,
    hints: &ValueHints,
    lower: f64,
    upper: f64,
) -> Result<Feature, ContourError> {
    let mut sink = GeoJsonSink::with_precision(DEFAULT_PRECISION);
    let mut contourer = Contourer::new(interpolation());
    contourer.fill_hinted(grid, Some(lower), Some(upper), hints, &mut sink)?;

    let mut properties = JsonObject::new();
    properties.insert("lower_level".to_string(), serde_json::json!(lower));
    properties.insert("upper_level".to_string(), serde_json::json!(upper));
    Ok(feature_with(sink.into_multi_polygon(), properties))
}

fn line_feature_hinted<G: Grid>(
    grid: &G,
    hints: &ValueHints,
    isovalue: f64,
) -> Result<Feature, ContourError> {
    let mut sink = GeoJsonSink::with_precision(DEFAULT_PRECISION);
    let mut contourer = Contourer::new(interpolation());
    contourer.line_hinted(grid, isovalue, hints, &mut sink)?;

    let mut properties = JsonObject::new();
    properties.insert("isovalue".to_string(), serde_json::json!(isovalue));
    Ok(feature_with(sink.into_multi_line_string(), properties))
}

/// Contour a single isoband into a `MultiPolygon` feature.
pub fn band_feature<G: Grid>(grid: &G, lower: f64, upper: f64) -> Result<Feature, ContourError> {
    let hints = hints_for(grid)?;
    band_feature_hinted(grid, &hints, lower, upper)
}

/// Contour a single isoline into a `MultiLineString` feature.
pub fn line_feature<G: Grid>(grid: &G, isovalue: f64) -> Result<Feature, ContourError> {
    let hints = hints_for(grid)?;
    line_feature_hinted(grid, &hints, isovalue)
}

/// True when the feature carries a non-empty MultiPolygon.
fn has_polygons(feature: &Feature) -> bool {
    match &feature.geometry {
        Some(geometry) => match &geometry.value {
            GeoValue::MultiPolygon(polygons) => !polygons.is_empty(),
            _ => false,
        },
        None => false,
    }
}

/// True when the feature carries a non-empty MultiLineString.
fn has_lines(feature: &Feature) -> bool {
    match &feature.geometry {
        Some(geometry) => match &geometry.value {
            GeoValue::MultiLineString(lines) => !lines.is_empty(),
            _ => false,
        },
        None => false,
    }
}

/// Contour N-1 isobands from N sorted thresholds in parallel.
/// Features with empty geometry are filtered out.
pub fn band_features<G>(grid: &G, thresholds: &[f64]) -> Result<FeatureCollection, ContourError>
where
    G: Grid + Sync,
{
    let hints = hints_for(grid)?;

    let features = (0..thresholds.len().saturating_sub(1))
        .into_par_iter()
        .map(|i| band_feature_hinted(grid, &hints, thresholds[i], thresholds[i + 1]))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FeatureCollection {
        bbox: None,
        foreign_members: None,
        features: features.into_iter().filter(has_polygons).collect(),
    })
}

/// Contour one isoline per value in parallel. Features with empty
/// geometry are filtered out.
pub fn line_features<G>(grid: &G, isovalues: &[f64]) -> Result<FeatureCollection, ContourError>
where
    G: Grid + Sync,
{
    let hints = hints_for(grid)?;

    let features = isovalues
        .par_iter()
        .map(|&isovalue| line_feature_hinted(grid, &hints, isovalue))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FeatureCollection {
        bbox: None,
        foreign_members: None,
        features: features.into_iter().filter(has_lines).collect(),
    })
}
