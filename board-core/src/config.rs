use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;
use crate::geometry::Viewport;

/// Tunables of the placement engine. Every field has a default, so a JSON
/// override only needs to name what it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Overlap ratio (intersection / candidate area) above which a placement is vetoed.
    pub overlap_threshold: f64,
    /// Per-axis vertex distance for vertex snapping (px).
    pub snap_distance: f64,
    pub grid_spacing: f64,
    /// Rotation quantum for the rotate gesture (degrees).
    pub rotation_step: f64,
    pub rotation_offset: f64,
    pub board: Viewport,
    pub grid_dot_radius: f64,
    pub grid_dot_color: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            overlap_threshold: OVERLAP_THRESHOLD,
            snap_distance: SNAP_DISTANCE_PX,
            grid_spacing: GRID_SPACING_PX,
            rotation_step: ROTATION_STEP_DEG,
            rotation_offset: ROTATION_OFFSET_DEG,
            board: Viewport {
                width: BOARD_WIDTH_PX,
                height: BOARD_HEIGHT_PX,
            },
            grid_dot_radius: GRID_DOT_RADIUS_PX,
            grid_dot_color: GRID_DOT_COLOR.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let cfg: EngineConfig = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            what: "engine config",
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, v: f64) -> Result<(), ConfigError> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("expected a positive number, got {v}"),
                })
            }
        }
        if !(self.overlap_threshold >= 0.0 && self.overlap_threshold <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "overlap_threshold",
                reason: format!("expected a ratio in [0, 1], got {}", self.overlap_threshold),
            });
        }
        positive("snap_distance", self.snap_distance)?;
        positive("grid_spacing", self.grid_spacing)?;
        positive("rotation_step", self.rotation_step)?;
        positive("board.width", self.board.width)?;
        positive("board.height", self.board.height)?;
        if !self.rotation_offset.is_finite() {
            return Err(ConfigError::Invalid {
                field: "rotation_offset",
                reason: "must be finite".to_string(),
            });
        }
        Ok(())
    }
}
