//! Inverts the slippy-map tile pyramid: the largest zoom at which a bounds
//! fits the canvas.

use crate::bounds::Bounds;
use crate::config::Canvas;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 17.0;
pub const TILE_SIZE_PX: f64 = 256.0;
pub const DEFAULT_CANVAS_PADDING_PX: u32 = 80;

/// Subtracted from the exact fit so edge features are not flush with the
/// canvas border.
const FIT_MARGIN: f64 = 0.1;

/// Latitude limit of the Web-Mercator square.
const MERCATOR_MAX_LAT: f64 = 85.051_128_78;

/// How the latitude extent is converted to a fraction of the world height.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomModel {
    /// Degrees of latitude scale like degrees of longitude.
    #[default]
    Linear,
    /// Latitudes are projected with the Web-Mercator y transform.
    #[serde(rename = "mercator", alias = "web-mercator", alias = "webmercator")]
    WebMercator,
}

/// Web-Mercator y in world fractions (0 at the equator).
fn mercator_y(lat: f64) -> f64 {
    let phi = lat.clamp(-MERCATOR_MAX_LAT, MERCATOR_MAX_LAT).to_radians();
    (PI / 4.0 + phi / 2.0).tan().ln() / (2.0 * PI)
}

/// Zoom at which `fraction` of the world spans `pixels`. `None` for an empty
/// extent, which places no limit on the zoom.
fn fit_zoom(pixels: f64, fraction: f64) -> Option<f64> {
    (fraction > 0.0).then(|| (pixels / (fraction * TILE_SIZE_PX)).log2())
}

/// Largest zoom in [`MIN_ZOOM`, `MAX_ZOOM`] at which `bounds` fits `canvas`
/// with `padding_px` free on every edge.
pub fn solve_zoom(bounds: &Bounds, canvas: Canvas, padding_px: u32, model: ZoomModel) -> f64 {
    let inset = 2.0 * f64::from(padding_px);
    let effective_width = (f64::from(canvas.width()) - inset).max(1.0);
    let effective_height = (f64::from(canvas.height()) - inset).max(1.0);

    let lat_fraction = match model {
        ZoomModel::Linear => bounds.lat_span() / 360.0,
        ZoomModel::WebMercator => (mercator_y(bounds.north) - mercator_y(bounds.south)).abs(),
    };
    let lon_fraction = bounds.lon_span() / 360.0;

    let lat_zoom = fit_zoom(effective_height, lat_fraction);
    let lon_zoom = fit_zoom(effective_width, lon_fraction);

    let zoom = match (lat_zoom, lon_zoom) {
        (Some(a), Some(b)) => a.min(b) - FIT_MARGIN,
        (Some(z), None) | (None, Some(z)) => z - FIT_MARGIN,
        (None, None) => MAX_ZOOM,
    };

    if zoom.is_nan() {
        return MAX_ZOOM;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn bounds(north: f64, south: f64, east: f64, west: f64) -> Bounds {
        Bounds {
            north,
            south,
            east,
            west,
        }
    }

    #[test]
    fn matches_closed_form() {
        // 640x440 effective, 1 degree square
        let b = bounds(53.0, 52.0, 5.0, 4.0);
        let zoom = solve_zoom(&b, Canvas::default(), 80, ZoomModel::Linear);
        let expected = (440.0_f64 * 360.0 / 256.0).log2() - 0.1;
        assert_close(zoom, expected, 1e-12);
    }

    #[test]
    fn narrower_axis_limits_zoom() {
        let wide = bounds(52.1, 52.0, 14.0, 4.0);
        let zoom = solve_zoom(&wide, Canvas::default(), 80, ZoomModel::Linear);
        let expected = (640.0_f64 * 360.0 / (10.0 * 256.0)).log2() - 0.1;
        assert_close(zoom, expected, 1e-12);
    }

    #[test]
    fn result_is_clamped() {
        let world = bounds(90.0, -90.0, 180.0, -180.0);
        let small = Canvas::new(100, 100).unwrap();
        assert_eq!(solve_zoom(&world, small, 80, ZoomModel::Linear), MIN_ZOOM);

        let tiny = bounds(52.000_001, 52.0, 4.000_001, 4.0);
        assert_eq!(solve_zoom(&tiny, Canvas::default(), 80, ZoomModel::Linear), MAX_ZOOM);
    }

    #[test]
    fn zero_span_axis_is_ignored() {
        let flat = bounds(52.0, 52.0, 14.0, 4.0);
        let zoom = solve_zoom(&flat, Canvas::default(), 80, ZoomModel::Linear);
        let expected = (640.0_f64 * 360.0 / (10.0 * 256.0)).log2() - 0.1;
        assert_close(zoom, expected, 1e-12);

        let point = bounds(52.0, 52.0, 4.0, 4.0);
        assert_eq!(solve_zoom(&point, Canvas::default(), 80, ZoomModel::Linear), MAX_ZOOM);
    }

    #[test]
    fn oversized_padding_still_yields_valid_zoom() {
        let b = bounds(53.0, 52.0, 5.0, 4.0);
        let zoom = solve_zoom(&b, Canvas::new(100, 100).unwrap(), 500, ZoomModel::WebMercator);
        assert!(zoom.is_finite());
        assert!((MIN_ZOOM..=MAX_ZOOM).contains(&zoom));
    }

    #[test]
    fn clamped_for_many_combinations() {
        let sizes = [100, 333, 800, 2048];
        let spans = [0.0, 1e-7, 0.003, 0.5, 12.0, 179.0];
        for model in [ZoomModel::Linear, ZoomModel::WebMercator] {
            for &w in &sizes {
                for &h in &sizes {
                    for &s in &spans {
                        let b = bounds(40.0 + s / 2.0, 40.0 - s / 2.0, s, -s);
                        let z = solve_zoom(&b, Canvas::new(w, h).unwrap(), 80, model);
                        assert!((MIN_ZOOM..=MAX_ZOOM).contains(&z), "{w}x{h} span {s}: {z}");
                    }
                }
            }
        }
    }

    #[test]
    fn mercator_zooms_out_further_at_high_latitude() {
        let b = bounds(71.0, 70.0, 1.0, 0.0);
        let linear = solve_zoom(&b, Canvas::default(), 80, ZoomModel::Linear);
        let mercator = solve_zoom(&b, Canvas::default(), 80, ZoomModel::WebMercator);
        assert!(mercator < linear);
    }

    #[test]
    fn zoom_model_serde_names() {
        assert_eq!(serde_json::to_string(&ZoomModel::WebMercator).unwrap(), "\"mercator\"");
        let model: ZoomModel = serde_json::from_str("\"linear\"").unwrap();
        assert_eq!(model, ZoomModel::Linear);
    }
}
