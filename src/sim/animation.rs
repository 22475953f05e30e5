//! Character animation state selection and frame pacing
//!
//! Frame advance is wall-clock driven (milliseconds from the host), while the
//! state itself is derived from the simulation every tick.

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;

/// Frames per player sprite sheet (3 columns x 2 rows)
pub const SHEET_FRAMES: usize = 6;
/// Frames in the victory sequence
pub const FIGHT_FRAMES: usize = 4;

/// Which sprite sequence the player shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AnimState {
    #[default]
    Idle,
    Walk,
    Jump,
    Crouch,
}

/// Horizontal facing, right by default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Playback parameters for one animation state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clip {
    pub frames: usize,
    pub interval_ms: f64,
    /// Wrap to the first frame, otherwise hold the last one
    pub looping: bool,
}

impl AnimState {
    pub fn clip(&self) -> Clip {
        match self {
            // Idle shows the first walk frame
            AnimState::Idle => Clip {
                frames: 1,
                interval_ms: 100.0,
                looping: true,
            },
            AnimState::Walk => Clip {
                frames: SHEET_FRAMES,
                interval_ms: 100.0,
                looping: true,
            },
            // Jump-rise plays through once and holds the last pose
            AnimState::Jump => Clip {
                frames: SHEET_FRAMES,
                interval_ms: 60.0,
                looping: false,
            },
            AnimState::Crouch => Clip {
                frames: 1,
                interval_ms: 100.0,
                looping: false,
            },
        }
    }

    /// Pick the state from simulation values, highest priority first
    pub fn select(vel_y: f32, down: bool, left: bool, right: bool) -> Self {
        if vel_y != 0.0 {
            AnimState::Jump
        } else if down {
            AnimState::Crouch
        } else if left || right {
            AnimState::Walk
        } else {
            AnimState::Idle
        }
    }
}

impl Facing {
    pub fn from_input(left: bool) -> Self {
        if left { Facing::Left } else { Facing::Right }
    }
}

/// Frame pacing for the player sprite
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Animator {
    pub state: AnimState,
    pub frame: usize,
    /// Time of state entry or of the last frame advance
    pub last_advance_ms: f64,
}

impl Animator {
    /// Feed this tick's state. Entering a new state restarts at frame 0.
    pub fn update(&mut self, state: AnimState, now_ms: f64) {
        if state != self.state {
            self.state = state;
            self.frame = 0;
            self.last_advance_ms = now_ms;
            return;
        }

        let clip = state.clip();
        if now_ms - self.last_advance_ms > clip.interval_ms {
            self.last_advance_ms = now_ms;
            self.frame = if clip.looping {
                (self.frame + 1) % clip.frames
            } else {
                (self.frame + 1).min(clip.frames - 1)
            };
        }
    }

    /// Restart in idle (level start, respawn)
    pub fn reset(&mut self, now_ms: f64) {
        self.state = AnimState::Idle;
        self.frame = 0;
        self.last_advance_ms = now_ms;
    }
}

/// Where the player sprite is drawn.
///
/// Crouching shrinks the sprite to `CROUCH_FACTOR` of the standing height and
/// keeps the feet on the same line. Collision geometry is never touched.
pub fn sprite_rect(body: &Rect, state: AnimState) -> Rect {
    match state {
        AnimState::Crouch => {
            let h = (PLAYER_HEIGHT * CROUCH_FACTOR).floor();
            Rect::new(body.left(), body.bottom() - h, body.size.x, h)
        }
        _ => *body,
    }
}

/// Non-interactive victory sequence played after a won battle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FightAnimation {
    pub started_ms: f64,
}

impl FightAnimation {
    pub fn new(started_ms: f64) -> Self {
        Self { started_ms }
    }

    pub fn finished(&self, now_ms: f64) -> bool {
        now_ms - self.started_ms >= VICTORY_MS
    }

    /// Frame to show at `now_ms`, the last frame once finished
    pub fn frame(&self, now_ms: f64) -> usize {
        let per_frame = VICTORY_MS / FIGHT_FRAMES as f64;
        let elapsed = (now_ms - self.started_ms).max(0.0);
        ((elapsed / per_frame) as usize).min(FIGHT_FRAMES - 1)
    }

    /// Screen rect, centered in the viewport
    pub fn screen_rect() -> Rect {
        let size = PLAYER_HEIGHT * 2.0;
        Rect::new(
            (VIEW_WIDTH - size) / 2.0,
            (VIEW_HEIGHT - size) / 2.0,
            size,
            size,
        )
    }
}
