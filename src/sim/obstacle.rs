//! Obstacle registry
//!
//! Each obstacle kind maps to one collision behavior per axis and to one
//! visual (an optional sprite with a flat-color fallback).

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;

/// Obstacle kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Spike,
    Spring,
    Platform,
    Water,
    Rotating,
}

/// What the horizontal pass does on overlap
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HorizontalResponse {
    /// Send the player back to spawn and stop the pass
    Kill,
    /// Push the player out along x
    Block,
}

/// What the vertical pass does on overlap
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VerticalResponse {
    /// Send the player back to spawn and stop the pass
    Kill,
    /// Launch upward with the given velocity, feet on the top edge
    Launch { vel_y: f32 },
    /// Land on the top edge, only when arriving from above
    Land,
    /// Shove the player left while in contact, feet on the top edge
    Shove { dx: f32 },
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 5] = [
        ObstacleKind::Spike,
        ObstacleKind::Spring,
        ObstacleKind::Platform,
        ObstacleKind::Water,
        ObstacleKind::Rotating,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleKind::Spike => "spike",
            ObstacleKind::Spring => "spring",
            ObstacleKind::Platform => "platform",
            ObstacleKind::Water => "water",
            ObstacleKind::Rotating => "rotating",
        }
    }

    pub fn horizontal(&self) -> HorizontalResponse {
        match self {
            ObstacleKind::Spike => HorizontalResponse::Kill,
            _ => HorizontalResponse::Block,
        }
    }

    pub fn vertical(&self) -> VerticalResponse {
        match self {
            ObstacleKind::Spike => VerticalResponse::Kill,
            ObstacleKind::Spring => VerticalResponse::Launch {
                vel_y: JUMP_SPEED * SPRING_BOOST,
            },
            ObstacleKind::Platform => VerticalResponse::Land,
            ObstacleKind::Water => VerticalResponse::Shove { dx: -WATER_DRAG },
            ObstacleKind::Rotating => VerticalResponse::Shove { dx: -ROTATING_PUSH },
        }
    }

    /// Fallback color when no sprite is loaded
    pub fn color(&self) -> [f32; 4] {
        match self {
            ObstacleKind::Water => [1.0, 1.0, 0.0, 1.0],
            _ => [0.59, 0.29, 0.0, 1.0],
        }
    }

    /// Optional sprite file under `assets/sprites/obstacles/`
    pub fn sprite_file(&self) -> String {
        format!("{}.png", self.as_str())
    }

    /// Whether the sprite spins while drawn
    pub fn spins(&self) -> bool {
        matches!(self, ObstacleKind::Rotating)
    }
}

/// A placed obstacle. Immutable for the lifetime of a level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub rect: Rect,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub const fn new(kind: ObstacleKind, x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            rect: Rect::new(x, y, w, h),
            kind,
        }
    }

    /// Obstacle resting on the ground line, `h` tall
    pub const fn on_ground(kind: ObstacleKind, x: f32, w: f32, h: f32) -> Self {
        Self::new(kind, x, GROUND_Y - h, w, h)
    }
}
