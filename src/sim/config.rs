//! Simulation configuration
//!
//! Gameplay constants are fixed in `crate::consts`; this only carries what the
//! host decides at startup (seed, initial viewport, timer cadence).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::consts::{DEFAULT_BANNER_MS, DEFAULT_SPAWN_INTERVAL_MS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Initial viewport size in CSS pixels
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Periodic enemy spawn cadence; `<= 0` disables periodic spawning
    pub spawn_interval_ms: f32,
    /// How long the "boss incoming" banner stays up
    pub banner_duration_ms: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            viewport_width: 1280.0,
            viewport_height: 720.0,
            spawn_interval_ms: DEFAULT_SPAWN_INTERVAL_MS,
            banner_duration_ms: DEFAULT_BANNER_MS,
        }
    }
}

impl SimConfig {
    /// Parse from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.viewport_width, self.viewport_height)
    }

    pub fn periodic_spawning(&self) -> bool {
        self.spawn_interval_ms > 0.0
    }
}
