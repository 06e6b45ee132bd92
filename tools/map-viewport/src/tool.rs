//! Tool definitions and argument handling, independent of the protocol
//! bindings. Every tool returns the JSON text of its result, or the message
//! to send back as an error result.

use crate::circle::{DEFAULT_SEGMENTS, circle_points};
use crate::config::{Canvas, ViewportConfig};
use crate::features::FeatureSet;
use crate::point::{parse_number, resolve};
use crate::viewport::{ViewportRequest, compute_viewport};
use serde_json::Value;

pub const MAP_VIEWPORT: &str = "map_viewport";
pub const CIRCLE_POLYGON: &str = "circle_polygon";

const MIN_SEGMENTS: u64 = 3;
const MAX_SEGMENTS: u64 = 360;

pub struct ToolSpec {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub input_schema: &'static str,
}

pub fn tool_specs() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: MAP_VIEWPORT,
            title: "Map Viewport",
            description: "Compute the bounds, center and zoom level that frame a set of map \
                          features (markers, routes, polygons, circles) or an explicit bbox on a \
                          map image of the given size. Features with invalid coordinates are \
                          skipped and listed under 'dropped'.",
            input_schema: r#"{
                "type": "object",
                "properties": {
                    "bbox": {
                        "type": "array",
                        "items": {"type": "number"},
                        "minItems": 4,
                        "maxItems": 4,
                        "description": "Explicit area [west, south, east, north]; overrides features"
                    },
                    "markers": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "lat": {"type": "number"},
                                "lon": {"type": "number"},
                                "label": {"type": "string"},
                                "color": {"type": "string"}
                            },
                            "required": ["lat", "lon"]
                        },
                        "description": "Point markers"
                    },
                    "routes": {
                        "type": "array",
                        "description": "Routes as arrays of points ({lat, lon}, [lat, lon] or {coordinates: [lat, lon]}) or {points: [...]}"
                    },
                    "polygons": {
                        "type": "array",
                        "description": "{type: 'polygon', coordinates: [[lon, lat], ...]} or {type: 'circle', center: {lat, lon}, radius: meters}"
                    },
                    "width": {"type": "integer", "minimum": 100, "maximum": 2048, "default": 800},
                    "height": {"type": "integer", "minimum": 100, "maximum": 2048, "default": 600}
                }
            }"#,
        },
        ToolSpec {
            name: CIRCLE_POLYGON,
            title: "Circle Polygon",
            description: "Approximate a circle of the given radius in meters around a GPS point \
                          as a closed polygon ring in [lon, lat] order.",
            input_schema: r#"{
                "type": "object",
                "properties": {
                    "center": {
                        "type": "object",
                        "properties": {
                            "lat": {"type": "number", "description": "Center latitude (-90 to 90)"},
                            "lon": {"type": "number", "description": "Center longitude (-180 to 180)"}
                        },
                        "required": ["lat", "lon"]
                    },
                    "radius": {"type": "number", "exclusiveMinimum": 0, "description": "Radius in meters"},
                    "segments": {"type": "integer", "minimum": 3, "maximum": 360, "default": 64}
                },
                "required": ["center", "radius"]
            }"#,
        },
    ]
}

/// Runs the named tool. `None` when the name belongs to another handler.
pub fn call(
    name: &str,
    arguments: &Option<String>,
    config: &ViewportConfig,
) -> Option<Result<String, String>> {
    match name {
        MAP_VIEWPORT => Some(execute_map_viewport(arguments, config)),
        CIRCLE_POLYGON => Some(execute_circle_polygon(arguments)),
        _ => None,
    }
}

fn parse_json(arguments: &Option<String>) -> Result<Value, String> {
    let args_str = arguments
        .as_ref()
        .ok_or_else(|| "Missing arguments".to_string())?;

    serde_json::from_str(args_str).map_err(|e| format!("Invalid JSON arguments: {}", e))
}

fn parse_dimension(json: &Value, name: &str, default: u32) -> Result<u32, String> {
    match json.get(name) {
        None | Some(Value::Null) => Ok(default),
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| {
                format!(
                    "Invalid parameter '{}': expected a whole number of pixels",
                    name
                )
            }),
    }
}

fn parse_bbox(value: &Value) -> Result<[f64; 4], String> {
    const USAGE: &str = "bbox must be an array of four numbers [west, south, east, north]";

    let items = value.as_array().filter(|a| a.len() == 4).ok_or(USAGE)?;
    let mut bbox = [0.0; 4];
    for (slot, item) in bbox.iter_mut().zip(items) {
        *slot = parse_number(item).ok_or(USAGE)?;
    }
    Ok(bbox)
}

fn parse_viewport_args(
    arguments: &Option<String>,
    config: &ViewportConfig,
) -> Result<(ViewportRequest, Canvas), String> {
    let json = parse_json(arguments)?;

    let width = parse_dimension(&json, "width", config.default_canvas.width())?;
    let height = parse_dimension(&json, "height", config.default_canvas.height())?;
    let canvas = Canvas::new(width, height).map_err(|e| e.to_string())?;

    let request = match json.get("bbox") {
        Some(bbox) if !bbox.is_null() => ViewportRequest::Bbox(parse_bbox(bbox)?),
        _ => {
            let features: FeatureSet = serde_json::from_value(json)
                .map_err(|e| format!("Invalid feature arrays: {}", e))?;
            ViewportRequest::Features(features)
        }
    };

    Ok((request, canvas))
}

pub fn execute_map_viewport(
    arguments: &Option<String>,
    config: &ViewportConfig,
) -> Result<String, String> {
    let (request, canvas) = parse_viewport_args(arguments, config)?;
    let framed = compute_viewport(&request, canvas, config).map_err(|e| e.to_string())?;

    let result = serde_json::json!({
        "bounds": framed.viewport.bounds,
        "center": framed.viewport.center,
        "zoom": framed.viewport.zoom,
        "width": canvas.width(),
        "height": canvas.height(),
        "dropped": framed.dropped
    });

    Ok(result.to_string())
}

pub fn execute_circle_polygon(arguments: &Option<String>) -> Result<String, String> {
    let json = parse_json(arguments)?;

    let center = json
        .get("center")
        .ok_or_else(|| "Missing 'center' parameter".to_string())?;
    let center = resolve(center).map_err(|e| format!("Invalid 'center': {}", e))?;

    let radius = json
        .get("radius")
        .and_then(parse_number)
        .filter(|r| *r > 0.0)
        .ok_or_else(|| "Missing or invalid parameter 'radius': expected meters > 0".to_string())?;

    let segments = match json.get("segments") {
        None | Some(Value::Null) => DEFAULT_SEGMENTS,
        Some(v) => v
            .as_u64()
            .filter(|n| (MIN_SEGMENTS..=MAX_SEGMENTS).contains(n))
            .map(|n| n as usize)
            .ok_or_else(|| {
                format!(
                    "Invalid parameter 'segments': expected an integer between {} and {}",
                    MIN_SEGMENTS, MAX_SEGMENTS
                )
            })?,
    };

    let mut ring: Vec<[f64; 2]> = circle_points(center, radius, segments)
        .into_iter()
        .map(|p| [p.lon(), p.lat()])
        .collect();
    if let Some(first) = ring.first().copied() {
        ring.push(first);
    }

    let result = serde_json::json!({
        "type": "Polygon",
        "coordinates": [ring],
        "center": [center.lon(), center.lat()],
        "radius_m": radius,
        "segments": segments
    });

    Ok(result.to_string())
}
