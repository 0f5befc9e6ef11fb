//! Tuning constants for the encounter layer.

use gridspace::{TileSize, Viewport};
use serde::{Deserialize, Serialize};

use crate::error::SetupError;

/// Configuration for a [`World`](crate::world::World).
///
/// Every field has a default, so a JSON document only needs to name the values
/// it overrides.
///
/// ```
/// use encounter_core::config::EncounterConfig;
///
/// let config = EncounterConfig::from_json_str(r#"{ "seed": 7, "blink_delay": 5 }"#).unwrap();
/// assert_eq!(config.seed, 7);
/// assert_eq!(config.blink_delay, 5);
/// assert_eq!(config.viewport_side, 9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterConfig {
    /// Seed of the world RNG.
    pub seed: u64,
    /// Viewport side in cells. Also the line-of-sight range of shooting monsters.
    pub viewport_side: u32,
    /// Cell width in pixels.
    pub tile_width: f32,
    /// Cell height in pixels.
    pub tile_height: f32,
    /// Frames between blink toggles of a pickable awaiting pickup.
    pub blink_delay: u32,
    /// Frames after a pickable is bumped during which pickup confirm is ignored.
    pub pickup_grace: u32,
    /// Frames between shots when a shooting monster does not specify its own.
    pub default_fire_delay: u32,
    /// Projectile speed in pixels per frame.
    pub default_projectile_speed: f32,
    /// Damage passed to a projectile victim's hit hook.
    pub default_projectile_damage: i32,
    /// Projectile family used by shooting monsters.
    pub default_projectile_family: String,
    /// Lifetime of the impact effect played on a projectile hit.
    pub impact_effect_ms: u32,
    /// Z priority of room objects.
    pub object_z: i32,
    /// Z priority of projectiles.
    pub projectile_z: i32,
    /// Z priority of door overlays.
    pub overlay_z: i32,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            viewport_side: 9,
            tile_width: 32.0,
            tile_height: 32.0,
            blink_delay: 3,
            pickup_grace: 6,
            default_fire_delay: 10,
            default_projectile_speed: 16.0,
            default_projectile_damage: 2,
            default_projectile_family: "red".to_string(),
            impact_effect_ms: 1000,
            object_z: 1,
            projectile_z: 1000,
            overlay_z: 5000,
        }
    }
}

impl EncounterConfig {
    /// Parses a configuration from JSON, filling unspecified fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::Malformed`] if the document does not parse.
    pub fn from_json_str(json: &str) -> Result<Self, SetupError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns a copy with a different RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Pixel size of a cell.
    #[must_use]
    pub const fn tile_size(&self) -> TileSize {
        TileSize::new(self.tile_width, self.tile_height)
    }

    /// Viewport anchored at the room origin.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport_side, self.tile_size())
    }
}
