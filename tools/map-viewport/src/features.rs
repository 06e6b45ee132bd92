//! Flattens markers, routes, polygons and circles into the points that
//! frame them.

use crate::circle::{DEFAULT_SEGMENTS, circle_points};
use crate::diagnostics::{Diagnostics, DroppedFeature, FeatureKind};
use crate::error::{Result, ViewportError};
use crate::point::{CoordinateShape, Point, extract, parse_lon_first, parse_number, reason_of};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

/// Raw feature arrays as received from the tool arguments. Items stay
/// untyped until the collector classifies them, so one malformed item never
/// rejects the whole request.
///
/// A missing key and an explicit `null` both mean "none of this kind".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureSet {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub markers: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub routes: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub polygons: Vec<Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// How many features of each kind contributed at least one point.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FeatureCounts {
    pub markers: usize,
    pub routes: usize,
    /// Polygons and circles.
    pub polygons: usize,
}

#[derive(Debug)]
pub struct Collected {
    pub points: Vec<Point>,
    pub counts: FeatureCounts,
    pub dropped: Vec<DroppedFeature>,
}

enum Shape<'a> {
    Ring(&'a [Value]),
    Circle { center: &'a Value, radius: &'a Value },
}

fn classify_shape(item: &Value) -> Option<Shape<'_>> {
    let object = item.as_object()?;
    if object.get("type").and_then(Value::as_str) == Some("circle") {
        if let (Some(center), Some(radius)) = (object.get("center"), object.get("radius")) {
            return Some(Shape::Circle { center, radius });
        }
    }
    object
        .get("coordinates")
        .and_then(Value::as_array)
        .map(|ring| Shape::Ring(ring.as_slice()))
}

fn route_vertices(route: &Value) -> Option<&[Value]> {
    match route {
        Value::Array(vertices) => Some(vertices.as_slice()),
        Value::Object(object) => object.get("points").and_then(Value::as_array).map(Vec::as_slice),
        _ => None,
    }
}

/// Collects the points of every valid feature. Invalid features and
/// vertices are dropped and reported; only an empty result is an error.
pub fn collect(features: &FeatureSet) -> Result<Collected> {
    let mut diagnostics = Diagnostics::new();
    let mut points = Vec::new();
    let mut counts = FeatureCounts::default();

    for (index, marker) in features.markers.iter().enumerate() {
        if let Some(point) = extract(marker, index, FeatureKind::Marker, &mut diagnostics) {
            points.push(point);
            counts.markers += 1;
        }
    }

    for (index, route) in features.routes.iter().enumerate() {
        let Some(vertices) = route_vertices(route) else {
            diagnostics.drop_feature(
                FeatureKind::Route,
                index,
                "expected an array of points or {points: [...]}",
            );
            continue;
        };
        let before = points.len();
        for (vertex, item) in vertices.iter().enumerate() {
            match CoordinateShape::classify(item).map(|shape| shape.resolve()) {
                Some(Ok(point)) => points.push(point),
                Some(Err(err)) => diagnostics.drop_feature(
                    FeatureKind::Route,
                    index,
                    format!("vertex {}: {}", vertex, reason_of(err)),
                ),
                None => diagnostics.drop_feature(
                    FeatureKind::Route,
                    index,
                    format!("vertex {}: unrecognized coordinate shape", vertex),
                ),
            }
        }
        if points.len() > before {
            counts.routes += 1;
        }
    }

    for (index, polygon) in features.polygons.iter().enumerate() {
        match classify_shape(polygon) {
            Some(Shape::Ring(ring)) => {
                let before = points.len();
                for (vertex, pair) in ring.iter().enumerate() {
                    let parsed = pair
                        .as_array()
                        .ok_or_else(|| {
                            ViewportError::InvalidCoordinate("expected [lon, lat]".to_string())
                        })
                        .and_then(|pair| parse_lon_first(pair));
                    match parsed {
                        Ok(point) => points.push(point),
                        Err(err) => diagnostics.drop_feature(
                            FeatureKind::Polygon,
                            index,
                            format!("vertex {}: {}", vertex, reason_of(err)),
                        ),
                    }
                }
                if points.len() > before {
                    counts.polygons += 1;
                }
            }
            Some(Shape::Circle { center, radius }) => {
                let Some(center) = extract(center, index, FeatureKind::Circle, &mut diagnostics)
                else {
                    continue;
                };
                match parse_number(radius) {
                    Some(r) if r > 0.0 => {
                        points.extend(circle_points(center, r, DEFAULT_SEGMENTS));
                        counts.polygons += 1;
                    }
                    _ => diagnostics.drop_feature(
                        FeatureKind::Circle,
                        index,
                        format!("radius must be a positive number of meters, got {}", radius),
                    ),
                }
            }
            None => diagnostics.drop_feature(
                FeatureKind::Polygon,
                index,
                "expected {type: \"polygon\", coordinates} or {type: \"circle\", center, radius}",
            ),
        }
    }

    debug!(
        points = points.len(),
        dropped = diagnostics.dropped().len(),
        "collected features"
    );

    if points.is_empty() {
        return Err(ViewportError::NoValidGeometry);
    }

    Ok(Collected {
        points,
        counts,
        dropped: diagnostics.into_dropped(),
    })
}
