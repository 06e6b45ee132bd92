use crate::error::{Result, ViewportError};
use crate::zoom::{DEFAULT_CANVAS_PADDING_PX, ZoomModel};
use serde_json::Value;
use tracing::warn;

pub const MIN_CANVAS_PX: u32 = 100;
pub const MAX_CANVAS_PX: u32 = 2048;

pub const ZOOM_MODEL_VAR: &str = "MAP_VIEWPORT_ZOOM_MODEL";
pub const PADDING_PX_VAR: &str = "MAP_VIEWPORT_PADDING_PX";

/// Pixel size of the map image the viewport is framed for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        check_dimension("width", width)?;
        check_dimension("height", height)?;
        Ok(Canvas { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Canvas {
            width: 800,
            height: 600,
        }
    }
}

fn check_dimension(name: &str, value: u32) -> Result<()> {
    if !(MIN_CANVAS_PX..=MAX_CANVAS_PX).contains(&value) {
        return Err(ViewportError::InvalidCanvas(format!(
            "{} must be between {} and {} pixels",
            name, MIN_CANVAS_PX, MAX_CANVAS_PX
        )));
    }
    Ok(())
}

/// Settings passed explicitly into every viewport computation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewportConfig {
    /// Pixels kept free on each canvas edge when solving the zoom.
    pub canvas_padding_px: u32,
    pub zoom_model: ZoomModel,
    /// Used when a request gives no width/height.
    pub default_canvas: Canvas,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        ViewportConfig {
            canvas_padding_px: DEFAULT_CANVAS_PADDING_PX,
            zoom_model: ZoomModel::default(),
            default_canvas: Canvas::default(),
        }
    }
}

impl ViewportConfig {
    /// Reads overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from a key lookup. Unparseable values are logged and
    /// ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ViewportConfig::default();

        if let Some(raw) = lookup(ZOOM_MODEL_VAR) {
            let name = Value::String(raw.trim().to_ascii_lowercase());
            match serde_json::from_value::<ZoomModel>(name) {
                Ok(model) => config.zoom_model = model,
                Err(e) => warn!(
                    var = ZOOM_MODEL_VAR,
                    value = %raw,
                    error = %e,
                    "unknown zoom model, using default"
                ),
            }
        }

        if let Some(raw) = lookup(PADDING_PX_VAR) {
            match raw.trim().parse::<u32>() {
                Ok(px) => config.canvas_padding_px = px,
                Err(e) => warn!(
                    var = PADDING_PX_VAR,
                    value = %raw,
                    error = %e,
                    "invalid padding, using default"
                ),
            }
        }

        config
    }
}
