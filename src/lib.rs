//! Campus Run - A side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, levels, animation)
//! - `renderer`: Scene composition and WebGPU rendering pipeline
//! - `assets`: Sprite loading with flat-color fallbacks
//! - `settings`: Player preferences

pub mod assets;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use assets::{AssetError, Assets, ImageData};
pub use settings::Settings;

/// Game configuration constants
///
/// Physics values are per tick. The simulation runs at `TICK_RATE` and every
/// velocity below assumes that rate.
pub mod consts {
    /// Ticks per second
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Viewport dimensions (game pixels)
    pub const VIEW_WIDTH: f32 = 800.0;
    pub const VIEW_HEIGHT: f32 = 480.0;
    /// Top of the ground strip
    pub const GROUND_Y: f32 = VIEW_HEIGHT - 60.0;

    /// Downward acceleration per tick
    pub const GRAVITY: f32 = 0.5;
    /// Vertical velocity applied on jump (negative = up)
    pub const JUMP_SPEED: f32 = -10.0;
    /// Spring launch multiplier on top of `JUMP_SPEED`
    pub const SPRING_BOOST: f32 = 1.5;

    /// Player box (40x60 base sprite scaled 1.3 x 1.4)
    pub const PLAYER_WIDTH: f32 = 52.0;
    pub const PLAYER_HEIGHT: f32 = 84.0;
    /// Horizontal speed per tick
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Crouch draw height relative to standing height
    pub const CROUCH_FACTOR: f32 = 0.5;
    /// Off-screen spawn column
    pub const SPAWN_X: f32 = -PLAYER_WIDTH;

    /// Water drag per tick of contact
    pub const WATER_DRAG: f32 = PLAYER_SPEED * 0.5;
    /// Rotating hazard push per tick of contact
    pub const ROTATING_PUSH: f32 = PLAYER_SPEED * 2.0;

    /// Level layout
    pub const NUM_LEVELS: usize = 5;
    pub const SCREENS_PER_LEVEL: u32 = 3;
    pub const LEVEL_WIDTH: f32 = VIEW_WIDTH * SCREENS_PER_LEVEL as f32;

    /// Boss box
    pub const ENEMY_WIDTH: f32 = 52.0;
    pub const ENEMY_HEIGHT: f32 = 84.0;

    /// Non-interactive "Level N" banner duration
    pub const LEVEL_BANNER_MS: f64 = 2000.0;
    /// Victory animation duration
    pub const VICTORY_MS: f64 = 1200.0;
}

/// Wrap `x` into `[lo, lo + span)`
#[inline]
pub fn wrap_into(x: f32, lo: f32, span: f32) -> f32 {
    lo + (x - lo).rem_euclid(span)
}
