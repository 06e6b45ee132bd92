//! Raw bounding box of the collected points and the padding heuristic that
//! grows it into a framed map area.

use crate::error::{Result, ViewportError};
use crate::features::FeatureCounts;
use crate::point::Point;
use serde::Serialize;

/// Spans below this are treated as a single spot.
const NEAR_DEGENERATE_SPAN: f64 = 0.001;
/// Padding in degrees around a near-degenerate cluster.
const NEAR_DEGENERATE_PADDING: f64 = 0.01;
const TIGHT_SPAN: f64 = 0.01;

const SINGLE_MARKER_FACTOR: f64 = 0.3;
const TIGHT_FACTOR: f64 = 0.5;
const WIDE_FACTOR: f64 = 0.25;
const ROUTE_WITH_MARKERS_FACTOR: f64 = 1.5;
const MANY_MARKERS_FACTOR: f64 = 1.2;
const MANY_MARKERS: usize = 3;

/// Axis-aligned latitude/longitude rectangle in degrees. Antimeridian
/// wrapping is not modelled: `west <= east` always.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Bounds {
    /// Smallest rectangle containing every point.
    pub fn from_points(points: &[Point]) -> Result<Self> {
        let first = points.first().ok_or_else(|| {
            ViewportError::DegenerateBounds("no points to bound".to_string())
        })?;
        let mut bounds = Bounds {
            north: first.lat(),
            south: first.lat(),
            east: first.lon(),
            west: first.lon(),
        };
        for p in points.iter().skip(1) {
            bounds.north = bounds.north.max(p.lat());
            bounds.south = bounds.south.min(p.lat());
            bounds.east = bounds.east.max(p.lon());
            bounds.west = bounds.west.min(p.lon());
        }
        bounds.check()?;
        Ok(bounds)
    }

    fn check(&self) -> Result<()> {
        let finite = [self.north, self.south, self.east, self.west]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(ViewportError::DegenerateBounds(format!(
                "non-finite extent {:?}",
                self
            )));
        }
        if self.south > self.north {
            return Err(ViewportError::DegenerateBounds(format!(
                "south {} is above north {}",
                self.south, self.north
            )));
        }
        if self.west > self.east {
            return Err(ViewportError::DegenerateBounds(format!(
                "west {} is east of {}",
                self.west, self.east
            )));
        }
        Ok(())
    }

    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    pub fn lon_span(&self) -> f64 {
        self.east - self.west
    }

    /// The larger of the two extents.
    pub fn span(&self) -> f64 {
        self.lat_span().max(self.lon_span())
    }

    /// Midpoint as `[lon, lat]`.
    pub fn center(&self) -> [f64; 2] {
        [
            f64::midpoint(self.west, self.east),
            f64::midpoint(self.south, self.north),
        ]
    }

    /// Grows every side by `degrees`, then clamps to the legal range.
    pub fn expand(&self, degrees: f64) -> Self {
        Bounds {
            north: (self.north + degrees).min(90.0),
            south: (self.south - degrees).max(-90.0),
            east: (self.east + degrees).min(180.0),
            west: (self.west - degrees).max(-180.0),
        }
    }

    pub fn contains(&self, other: &Bounds) -> bool {
        self.north >= other.north
            && self.south <= other.south
            && self.east >= other.east
            && self.west <= other.west
    }

    pub fn contains_point(&self, p: Point) -> bool {
        (self.south..=self.north).contains(&p.lat()) && (self.west..=self.east).contains(&p.lon())
    }
}

/// Padding in degrees applied to each side of a box with the given span.
pub fn padding_for(span: f64, counts: FeatureCounts) -> f64 {
    let mut padding = if counts.markers == 1 {
        if span < NEAR_DEGENERATE_SPAN {
            (span * SINGLE_MARKER_FACTOR).max(NEAR_DEGENERATE_PADDING)
        } else {
            span * SINGLE_MARKER_FACTOR
        }
    } else if span < NEAR_DEGENERATE_SPAN {
        NEAR_DEGENERATE_PADDING
    } else if span < TIGHT_SPAN {
        span * TIGHT_FACTOR
    } else {
        span * WIDE_FACTOR
    };

    if counts.routes > 0 && counts.markers > 1 {
        padding *= ROUTE_WITH_MARKERS_FACTOR;
    }
    if counts.markers > MANY_MARKERS {
        padding *= MANY_MARKERS_FACTOR;
    }
    padding
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FramedBounds {
    pub raw: Bounds,
    pub padded: Bounds,
    /// Degrees added to each side before clamping.
    pub padding: f64,
}

pub fn compute_bounds(points: &[Point], counts: FeatureCounts) -> Result<FramedBounds> {
    let raw = Bounds::from_points(points)?;
    let padding = padding_for(raw.span(), counts);
    Ok(FramedBounds {
        raw,
        padded: raw.expand(padding),
        padding,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn pt(lat: f64, lon: f64) -> Point {
        Point::new(lat, lon).unwrap()
    }

    fn counts(markers: usize, routes: usize, polygons: usize) -> FeatureCounts {
        FeatureCounts {
            markers,
            routes,
            polygons,
        }
    }

    #[test]
    fn raw_bounds_cover_points() {
        let points = [pt(52.3732, 4.8907), pt(52.5234, 13.4114), pt(51.0, 7.0)];
        let raw = Bounds::from_points(&points).unwrap();
        assert_eq!(
            raw,
            Bounds {
                north: 52.5234,
                south: 51.0,
                east: 13.4114,
                west: 4.8907
            }
        );
        assert!(points.iter().all(|p| raw.contains_point(*p)));
    }

    #[test]
    fn empty_points_are_degenerate() {
        assert!(matches!(
            Bounds::from_points(&[]),
            Err(ViewportError::DegenerateBounds(_))
        ));
    }

    #[test]
    fn base_padding_thresholds() {
        assert_close(padding_for(2.0, counts(1, 0, 0)), 0.6, 1e-12);
        assert_close(padding_for(0.0, counts(1, 0, 0)), 0.01, 1e-12);
        assert_close(padding_for(0.0005, counts(0, 0, 1)), 0.01, 1e-12);
        assert_close(padding_for(0.004, counts(2, 0, 0)), 0.002, 1e-12);
        assert_close(padding_for(0.01, counts(2, 0, 0)), 0.0025, 1e-12);
        assert_close(padding_for(8.0, counts(0, 1, 0)), 2.0, 1e-12);
    }

    #[test]
    fn multipliers_compound() {
        assert_close(padding_for(1.0, counts(2, 1, 0)), 0.25 * 1.5, 1e-12);
        assert_close(padding_for(1.0, counts(4, 0, 0)), 0.25 * 1.2, 1e-12);
        assert_close(padding_for(1.0, counts(5, 2, 0)), 0.25 * 1.5 * 1.2, 1e-12);
        // a single marker next to a route keeps the single-marker base
        assert_close(padding_for(1.0, counts(1, 1, 0)), 0.3, 1e-12);
    }

    #[test]
    fn duplicated_marker_pads_at_least_as_much() {
        let single = compute_bounds(&[pt(52.3732, 4.8907)], counts(1, 0, 0)).unwrap();
        let many = compute_bounds(&[pt(52.3732, 4.8907); 4], counts(4, 0, 0)).unwrap();
        assert!(many.padding >= single.padding);
        assert!(many.padded.contains(&single.padded));
    }

    #[test]
    fn padded_contains_raw_and_is_clamped() {
        let framed =
            compute_bounds(&[pt(89.0, -179.0), pt(-89.0, 179.0)], counts(2, 0, 0)).unwrap();
        assert!(framed.padded.contains(&framed.raw));
        assert_eq!(framed.padded.north, 90.0);
        assert_eq!(framed.padded.south, -90.0);
        assert_eq!(framed.padded.east, 180.0);
        assert_eq!(framed.padded.west, -180.0);
    }

    #[test]
    fn single_point_is_surrounded() {
        let framed = compute_bounds(&[pt(52.3732, 4.8907)], counts(1, 0, 0)).unwrap();
        assert!(framed.padded.lat_span() > 0.0);
        assert!(framed.padded.lon_span() > 0.0);
        assert!(framed.padded.north > 52.3732 && framed.padded.south < 52.3732);
    }

    #[test]
    fn center_is_lon_lat_midpoint() {
        let b = Bounds {
            north: 10.0,
            south: 0.0,
            east: 30.0,
            west: 20.0,
        };
        assert_eq!(b.center(), [25.0, 5.0]);
    }
}
