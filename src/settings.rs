//! Editor settings.
//!
//! Geometry knobs the host may tune: grid cell size, canvas bounds and hit
//! tolerances. Settings live in a JSON file under the platform config
//! directory; every field is optional and falls back to the defaults in
//! [`crate::constants`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::constants::{
    CANVAS_HEIGHT, CANVAS_WIDTH, CONNECTION_HIT_TOLERANCE, CONNECTOR_HIT_RADIUS, GRID_SIZE,
    LABEL_FONT_PX, SEGMENT_GRAB_TOLERANCE,
};
use crate::error::{DiagramError, DiagramResult};
use crate::geometry::{Point, Rect};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorSettings {
    pub grid_size: f32,
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub connector_hit_radius: f32,
    pub connection_hit_tolerance: f32,
    pub segment_grab_tolerance: f32,
    pub label_font_px: f32,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            connector_hit_radius: CONNECTOR_HIT_RADIUS,
            connection_hit_tolerance: CONNECTION_HIT_TOLERANCE,
            segment_grab_tolerance: SEGMENT_GRAB_TOLERANCE,
            label_font_px: LABEL_FONT_PX,
        }
    }
}

impl EditorSettings {
    /// `<config_dir>/mathgrid/settings.json`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mathgrid").join("settings.json"))
    }

    /// Load from the default location, falling back to defaults.
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load from `path`. A missing file yields defaults silently; an
    /// unreadable or invalid one is logged and yields defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "No settings file, using defaults");
            return Self::default();
        }
        match Self::try_load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(path = %path.display(), "Ignoring settings file: {}", e);
                Self::default()
            }
        }
    }

    pub fn try_load_from(path: &Path) -> DiagramResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&raw)?;
        settings.validate().map_err(DiagramError::MalformedDocument)?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), String> {
        let positive = |name: &str, v: f32| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(format!("{name} must be a positive number, got {v}"))
            }
        };
        positive("gridSize", self.grid_size)?;
        positive("canvasWidth", self.canvas_width)?;
        positive("canvasHeight", self.canvas_height)?;
        positive("connectorHitRadius", self.connector_hit_radius)?;
        positive("connectionHitTolerance", self.connection_hit_tolerance)?;
        positive("segmentGrabTolerance", self.segment_grab_tolerance)?;
        positive("labelFontPx", self.label_font_px)
    }

    pub fn canvas_bounds(&self) -> Rect {
        Rect::new(Point::default(), self.canvas_width, self.canvas_height)
    }

    /// Whether a pointer position lies over the canvas (edges included)
    pub fn is_over_canvas(&self, p: Point) -> bool {
        self.canvas_bounds().contains(p)
    }

    pub fn block_size(&self) -> (f32, f32) {
        (self.grid_size, self.grid_size)
    }
}
