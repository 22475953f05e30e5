//! Camera and parallax bookkeeping
//!
//! The camera is a pure function of the player position. Parallax layers
//! accumulate the player's per-tick displacement at reduced rates.

use serde::{Deserialize, Serialize};

use super::level::{CloudLayers, LevelDef};
use crate::consts::*;
use crate::wrap_into;

/// Backdrop scenery moves at this fraction of the player displacement
pub const BACKDROP_RATE: f32 = 0.7;
/// Backdrop accumulator stays within `[-BACKDROP_RANGE, BACKDROP_RANGE]`
pub const BACKDROP_RANGE: f32 = 200.0;
/// Near cloud layer rate
pub const NEAR_CLOUD_RATE: f32 = 0.5;
/// Far cloud layer rate
pub const FAR_CLOUD_RATE: f32 = 1.0 / 3.0;

/// Horizontal camera offset centering the player, within the level bounds
#[inline]
pub fn camera_offset(player_x: f32) -> f32 {
    (player_x + PLAYER_WIDTH / 2.0 - VIEW_WIDTH / 2.0).clamp(0.0, LEVEL_WIDTH - VIEW_WIDTH)
}

/// Screen number (1-based) the camera currently shows
#[inline]
pub fn screen_index(camera_x: f32) -> u32 {
    (camera_x / VIEW_WIDTH) as u32 + 1
}

/// Parallax offsets for the active level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Parallax {
    /// Backdrop scenery offset (only for backdrops with parallax)
    pub backdrop: f32,
    /// Whether `backdrop` tracks the player
    pub backdrop_enabled: bool,
    /// Cloud positions (screen space)
    pub clouds: CloudLayers,
}

impl Parallax {
    /// Fresh offsets for a level
    pub fn for_level(def: &LevelDef) -> Self {
        Self {
            backdrop: 0.0,
            backdrop_enabled: def.backdrop.has_parallax(),
            clouds: def.clouds.map(|c| c.generate()).unwrap_or_default(),
        }
    }

    /// Shift every layer by the player's displacement this tick
    pub fn advance(&mut self, dx: f32) {
        if dx == 0.0 {
            return;
        }
        if self.backdrop_enabled {
            self.backdrop =
                (self.backdrop - BACKDROP_RATE * dx).clamp(-BACKDROP_RANGE, BACKDROP_RANGE);
        }
        for cloud in &mut self.clouds.near {
            cloud.x = wrap_cloud(cloud.x - NEAR_CLOUD_RATE * dx);
        }
        for cloud in &mut self.clouds.far {
            cloud.x = wrap_cloud(cloud.x - FAR_CLOUD_RATE * dx);
        }
    }
}

/// Keep a cloud inside `[-VIEW_WIDTH, 2 * VIEW_WIDTH)` for a 3-screen level:
/// once it drifts a full viewport past either screen edge it reappears on
/// the other side.
#[inline]
fn wrap_cloud(x: f32) -> f32 {
    wrap_into(x, -VIEW_WIDTH, LEVEL_WIDTH)
}
