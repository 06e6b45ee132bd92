//! Map Viewport Tool
//!
//! Frames map features for a raster map of a given pixel size: computes the
//! padded geographic bounds, the center and the zoom level a renderer should
//! use. Markers, routes, polygons and geodesic circles are accepted in the
//! loose shapes agents tend to produce; unreadable features are skipped and
//! reported instead of failing the call.
//!
//! # Building the MCP component
//!
//! The default build is the plain engine and the tool handlers in [`tool`].
//! The exported wasmcp component (`list_tools`/`call_tool`) is only compiled
//! with the `component` feature, which needs the `map-viewport` WIT world
//! under `wit/`:
//!
//! ```text
//! cargo build --release --target wasm32-wasip2 --features component
//! ```
//!
//! Without the feature the crate exports no component, so a plain
//! `cargo build` of the cdylib is not deployable as a tool.

#[cfg(feature = "component")]
mod bindings {
    wit_bindgen::generate!({
        world: "map-viewport",
        generate_all,
    });
}

#[cfg(feature = "component")]
mod component;

pub mod bounds;
pub mod circle;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod features;
pub mod point;
pub mod tool;
pub mod viewport;
pub mod zoom;

pub use bounds::{Bounds, FramedBounds, compute_bounds};
pub use circle::{circle_points, haversine_m};
pub use config::{Canvas, ViewportConfig};
pub use diagnostics::{DroppedFeature, FeatureKind};
pub use error::{Result, ViewportError};
pub use features::{FeatureCounts, FeatureSet, collect};
pub use point::{Point, extract, parse_lat_first, parse_lon_first};
pub use viewport::{FramedViewport, Viewport, ViewportRequest, compute_viewport};
pub use zoom::{ZoomModel, solve_zoom};
