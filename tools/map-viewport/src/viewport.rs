//! Composes collection, padding and zoom into a single viewport.

use crate::bounds::{Bounds, compute_bounds};
use crate::config::{Canvas, ViewportConfig};
use crate::diagnostics::DroppedFeature;
use crate::error::{Result, ViewportError};
use crate::features::{FeatureCounts, FeatureSet, collect};
use crate::point::Point;
use crate::zoom::solve_zoom;
use serde::Serialize;
use tracing::debug;

/// What to frame: an explicit box, or a set of features.
#[derive(Debug, Clone)]
pub enum ViewportRequest {
    /// `[west, south, east, north]` in degrees. Still padded.
    Bbox([f64; 4]),
    Features(FeatureSet),
}

/// Region a rendered map canvas shows.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Viewport {
    pub bounds: Bounds,
    /// `[lon, lat]` midpoint of `bounds`.
    pub center: [f64; 2],
    pub zoom: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FramedViewport {
    pub viewport: Viewport,
    pub dropped: Vec<DroppedFeature>,
}

fn bbox_corners(bbox: [f64; 4]) -> Result<[Point; 2]> {
    let [west, south, east, north] = bbox;

    for (name, value) in [("west", west), ("east", east)] {
        if !value.is_finite() || !(-180.0..=180.0).contains(&value) {
            return Err(ViewportError::InvalidBbox(format!(
                "{} longitude must be between -180 and 180",
                name
            )));
        }
    }
    for (name, value) in [("south", south), ("north", north)] {
        if !value.is_finite() || !(-90.0..=90.0).contains(&value) {
            return Err(ViewportError::InvalidBbox(format!(
                "{} latitude must be between -90 and 90",
                name
            )));
        }
    }
    if west >= east {
        return Err(ViewportError::InvalidBbox(
            "west must be less than east".to_string(),
        ));
    }
    if south >= north {
        return Err(ViewportError::InvalidBbox(
            "south must be less than north".to_string(),
        ));
    }

    Ok([Point::new(south, west)?, Point::new(north, east)?])
}

/// Computes the viewport for `request` on `canvas`.
///
/// Features that cannot be read are dropped and listed in the result; an
/// explicit bbox is padded like any other two-point feature set.
pub fn compute_viewport(
    request: &ViewportRequest,
    canvas: Canvas,
    config: &ViewportConfig,
) -> Result<FramedViewport> {
    let (points, counts, dropped) = match request {
        ViewportRequest::Bbox(bbox) => {
            (bbox_corners(*bbox)?.to_vec(), FeatureCounts::default(), Vec::new())
        }
        ViewportRequest::Features(features) => {
            let collected = collect(features)?;
            (collected.points, collected.counts, collected.dropped)
        }
    };

    let framed = compute_bounds(&points, counts)?;
    let zoom = solve_zoom(
        &framed.padded,
        canvas,
        config.canvas_padding_px,
        config.zoom_model,
    );

    debug!(
        points = points.len(),
        dropped = dropped.len(),
        padding = framed.padding,
        zoom,
        "framed viewport"
    );

    Ok(FramedViewport {
        viewport: Viewport {
            bounds: framed.padded,
            center: framed.padded.center(),
            zoom,
        },
        dropped,
    })
}
