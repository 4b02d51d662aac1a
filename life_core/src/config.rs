//! Configuration types for the simulator.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{LifeError, Result};

/// Slider range for the delay between ticks, in milliseconds.
pub const MIN_DELAY_MS: u64 = 1;
pub const MAX_DELAY_MS: u64 = 1000;

/// Start-up settings. Loaded from JSON, any missing field takes its default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Grid width in cells
    pub width: i32,

    /// Grid height in cells
    pub height: i32,

    /// Delay between ticks (milliseconds)
    pub tick_delay_ms: u64,

    /// On-screen edge of one cell, in points
    pub cell_size: f32,

    /// Gap between neighbouring cells, in points
    pub cell_gap: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 70,
            height: 70,
            tick_delay_ms: 500,
            cell_size: 8.0,
            cell_gap: 1.0,
        }
    }
}

impl SimConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(LifeError::InvalidDimensions {
                width: self.width as i64,
                height: self.height as i64,
            });
        }
        Ok(())
    }

    /// Tick delay clamped to the supported range.
    pub fn tick_delay(&self) -> Duration {
        Duration::from_millis(self.tick_delay_ms.clamp(MIN_DELAY_MS, MAX_DELAY_MS))
    }
}
