//! Canonical coordinates and the extractor that resolves the loosely typed
//! point shapes accepted by the tools.
//!
//! Points, markers and route vertices are latitude-first. Polygon rings are
//! longitude-first (GeoJSON order). Both orders resolve into the same
//! [`Point`] through [`parse_lat_first`] and [`parse_lon_first`].

use crate::diagnostics::{Diagnostics, FeatureKind};
use crate::error::{Result, ViewportError};
use serde::Serialize;
use serde_json::Value;

/// A validated geographic coordinate in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Point {
    lat: f64,
    lon: f64,
}

impl Point {
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        validate_lat(lat)?;
        validate_lon(lon)?;
        Ok(Point { lat, lon })
    }

    /// Builds a point from values already known to be finite, pinning them
    /// into the legal range.
    pub(crate) fn clamped(lat: f64, lon: f64) -> Self {
        Point {
            lat: lat.clamp(-90.0, 90.0),
            lon: lon.clamp(-180.0, 180.0),
        }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

fn validate_lat(lat: f64) -> Result<()> {
    if !lat.is_finite() {
        return Err(ViewportError::InvalidCoordinate(
            "latitude is not a finite number".to_string(),
        ));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(ViewportError::InvalidCoordinate(format!(
            "latitude {} must be between -90 and 90",
            lat
        )));
    }
    Ok(())
}

fn validate_lon(lon: f64) -> Result<()> {
    if !lon.is_finite() {
        return Err(ViewportError::InvalidCoordinate(
            "longitude is not a finite number".to_string(),
        ));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(ViewportError::InvalidCoordinate(format!(
            "longitude {} must be between -180 and 180",
            lon
        )));
    }
    Ok(())
}

/// Reads a JSON number, or a string holding one. Non-finite results are
/// rejected.
pub fn parse_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|v| v.is_finite())
}

fn component(value: &Value, name: &str) -> Result<f64> {
    parse_number(value).ok_or_else(|| {
        ViewportError::InvalidCoordinate(format!("{} is not a number: {}", name, value))
    })
}

fn require_pair(values: &[Value]) -> Result<(&Value, &Value)> {
    match values {
        [first, second, ..] => Ok((first, second)),
        _ => Err(ViewportError::InvalidCoordinate(format!(
            "expected at least 2 values, got {}",
            values.len()
        ))),
    }
}

/// Parses `[lat, lon, ...]`.
pub fn parse_lat_first(values: &[Value]) -> Result<Point> {
    let (lat, lon) = require_pair(values)?;
    Point::new(component(lat, "latitude")?, component(lon, "longitude")?)
}

/// Parses `[lon, lat, ...]`.
pub fn parse_lon_first(values: &[Value]) -> Result<Point> {
    let (lon, lat) = require_pair(values)?;
    Point::new(component(lat, "latitude")?, component(lon, "longitude")?)
}

/// The accepted coordinate shapes, classified once before any number is read.
#[derive(Debug, Clone, Copy)]
pub enum CoordinateShape<'a> {
    /// `[lat, lon]`
    Pair(&'a [Value]),
    /// `{"coordinates": [lat, lon]}`
    Wrapped(&'a [Value]),
    /// `{"lat": .., "lon": ..}`
    Named { lat: &'a Value, lon: &'a Value },
}

impl<'a> CoordinateShape<'a> {
    /// Shapes are tried in a fixed order: pair, wrapped, named.
    pub fn classify(item: &'a Value) -> Option<Self> {
        if let Some(values) = item.as_array() {
            return (values.len() >= 2).then_some(CoordinateShape::Pair(values.as_slice()));
        }
        let object = item.as_object()?;
        if let Some(values) = object.get("coordinates").and_then(Value::as_array) {
            if let [lat, lon, ..] = values.as_slice() {
                if parse_number(lat).is_some() && parse_number(lon).is_some() {
                    return Some(CoordinateShape::Wrapped(values.as_slice()));
                }
            }
        }
        match (object.get("lat"), object.get("lon")) {
            (Some(lat), Some(lon)) => Some(CoordinateShape::Named { lat, lon }),
            _ => None,
        }
    }

    pub fn resolve(&self) -> Result<Point> {
        match *self {
            CoordinateShape::Pair(values) | CoordinateShape::Wrapped(values) => {
                parse_lat_first(values)
            }
            CoordinateShape::Named { lat, lon } => {
                Point::new(component(lat, "latitude")?, component(lon, "longitude")?)
            }
        }
    }
}

/// Resolves any accepted shape into a [`Point`], reporting why it failed.
pub fn resolve(item: &Value) -> Result<Point> {
    CoordinateShape::classify(item)
        .ok_or_else(|| {
            ViewportError::InvalidCoordinate(
                "expected [lat, lon], {coordinates: [lat, lon]} or {lat, lon}".to_string(),
            )
        })?
        .resolve()
}

/// Resolves `item`, or records it as dropped and returns `None`.
pub fn extract(
    item: &Value,
    index: usize,
    kind: FeatureKind,
    diagnostics: &mut Diagnostics,
) -> Option<Point> {
    match resolve(item) {
        Ok(point) => Some(point),
        Err(err) => {
            diagnostics.drop_feature(kind, index, reason_of(err));
            None
        }
    }
}

/// Strips the variant prefix so diagnostics carry only the cause.
pub(crate) fn reason_of(err: ViewportError) -> String {
    match err {
        ViewportError::InvalidCoordinate(reason) => reason,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn all_shapes_resolve_to_the_same_point() {
        let expected = Point::new(52.37, 4.89).unwrap();
        assert_eq!(resolve(&json!({"lat": 52.37, "lon": 4.89})).unwrap(), expected);
        assert_eq!(resolve(&json!([52.37, 4.89])).unwrap(), expected);
        assert_eq!(resolve(&json!({"coordinates": [52.37, 4.89]})).unwrap(), expected);
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let point = resolve(&json!({"lat": "52.37", "lon": " 4.89 "})).unwrap();
        assert_eq!(point, Point::new(52.37, 4.89).unwrap());
    }

    #[test]
    fn pair_ignores_extra_values() {
        let item = json!([1.0, 2.0, 3.0]);
        let shape = CoordinateShape::classify(&item).unwrap();
        assert!(matches!(shape, CoordinateShape::Pair(_)));
        let point = shape.resolve().unwrap();
        assert_eq!((point.lat(), point.lon()), (1.0, 2.0));
    }

    #[test]
    fn short_coordinates_fall_back_to_named_fields() {
        let point = resolve(&json!({"coordinates": [1.0], "lat": 10.0, "lon": 20.0})).unwrap();
        assert_eq!((point.lat(), point.lon()), (10.0, 20.0));
    }

    #[test]
    fn non_numeric_coordinates_fall_back_to_named_fields() {
        let item = json!({"coordinates": ["a", "b"], "lat": 1.0, "lon": 2.0});
        assert!(matches!(
            CoordinateShape::classify(&item),
            Some(CoordinateShape::Named { .. })
        ));
        assert_eq!(resolve(&item).unwrap(), Point::new(1.0, 2.0).unwrap());
    }

    #[test]
    fn non_numeric_coordinates_without_named_fields_are_rejected() {
        assert!(resolve(&json!({"coordinates": ["a", "b"]})).is_err());
    }

    #[test]
    fn lon_first_swaps_order() {
        let point = parse_lon_first(&[json!(4.89), json!(52.37)]).unwrap();
        assert_eq!((point.lat(), point.lon()), (52.37, 4.89));
    }

    #[test]
    fn out_of_range_latitude_is_rejected() {
        let err = resolve(&json!({"lat": 200, "lon": 4.89})).unwrap_err();
        assert!(matches!(err, ViewportError::InvalidCoordinate(_)));
        assert!(err.to_string().contains("between -90 and 90"));
    }

    #[test]
    fn out_of_range_longitude_is_rejected() {
        assert!(resolve(&json!([10.0, 180.5])).is_err());
        assert!(resolve(&json!([10.0, -180.0])).is_ok());
    }

    #[test]
    fn non_numeric_values_are_rejected() {
        assert!(resolve(&json!({"lat": "north", "lon": 4.0})).is_err());
        assert!(resolve(&json!({"lat": null, "lon": 4.0})).is_err());
        assert!(resolve(&json!([true, 4.0])).is_err());
        assert!(resolve(&json!("52.0,4.0")).is_err());
        assert!(resolve(&json!([52.0])).is_err());
    }

    #[test]
    fn extract_records_dropped_item() {
        let mut diag = Diagnostics::new();
        let item = json!({"lat": 200, "lon": 4.89});
        assert!(extract(&item, 3, FeatureKind::Marker, &mut diag).is_none());
        assert_eq!(diag.dropped().len(), 1);
        assert_eq!(diag.dropped()[0].index, 3);
        assert_eq!(diag.dropped()[0].kind, FeatureKind::Marker);
        assert!(diag.dropped()[0].reason.starts_with("latitude 200"));
    }

    #[test]
    fn extract_valid_item_leaves_no_diagnostic() {
        let mut diag = Diagnostics::new();
        let point = extract(&json!([52.37, 4.89]), 0, FeatureKind::Route, &mut diag);
        assert!(point.is_some());
        assert!(diag.dropped().is_empty());
    }
}
