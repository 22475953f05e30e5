//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform dependencies:
//! - Physics advances once per tick, never by measured frame time
//! - Obstacles resolve in list order
//! - Wall-clock time enters only through `TickInput::now_ms`

pub mod animation;
pub mod camera;
pub mod collision;
pub mod level;
pub mod obstacle;
pub mod rect;
pub mod state;
pub mod tick;

pub use animation::{AnimState, Animator, Facing, FightAnimation, sprite_rect};
pub use camera::{Parallax, camera_offset, screen_index};
pub use collision::{HorizontalOutcome, VerticalOutcome, resolve_horizontal, resolve_vertical};
pub use level::{Backdrop, BossKind, Enemy, LEVELS, LevelDef, level};
pub use obstacle::{Obstacle, ObstacleKind};
pub use rect::Rect;
pub use state::{GameEvent, GamePhase, GameState, Player};
pub use tick::{TickInput, tick};
