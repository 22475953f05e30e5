//! Game state and core simulation types
//!
//! Everything the frame loop mutates lives in one `GameState` value.

use serde::{Deserialize, Serialize};

use super::animation::{Animator, Facing, FightAnimation};
use super::camera::{Parallax, camera_offset};
use super::level::{Enemy, level};
use super::obstacle::Obstacle;
use super::rect::Rect;
use crate::consts::*;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Story text, waiting for the start key
    Intro,
    /// Active platforming
    Playing,
    /// Player touched the boss; only fight/flee are accepted
    Battle,
    /// Won a battle, victory sequence playing (non-interactive)
    Victory(FightAnimation),
    /// "Level N" banner shown until `until_ms` (non-interactive)
    LevelBanner { until_ms: f64 },
    /// All levels cleared
    Complete,
}

/// Something that happened during a tick, for logging and effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    SpringBounce,
    SpikeHit,
    BattleStarted,
    EnemyDefeated,
    Fled,
    /// 1-based level number
    LevelStarted { level: usize },
    RunComplete,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    /// Vertical velocity per tick (positive = down)
    pub vel_y: f32,
    pub facing: Facing,
    pub anim: Animator,
}

impl Player {
    /// Spawn rectangle: one body width left of the screen, on the ground
    pub fn spawn_rect() -> Rect {
        Rect::new(SPAWN_X, GROUND_Y - PLAYER_HEIGHT, PLAYER_WIDTH, PLAYER_HEIGHT)
    }

    pub fn new() -> Self {
        Self {
            rect: Self::spawn_rect(),
            vel_y: 0.0,
            facing: Facing::Right,
            anim: Animator::default(),
        }
    }

    /// Back to spawn, standing still
    pub fn respawn(&mut self, now_ms: f64) {
        self.rect = Self::spawn_rect();
        self.vel_y = 0.0;
        self.facing = Facing::Right;
        self.anim.reset(now_ms);
    }

    /// On the ground or resting on an obstacle
    #[inline]
    pub fn grounded(&self) -> bool {
        self.vel_y == 0.0
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Active level (0-based)
    pub level_index: usize,
    /// Current phase
    pub phase: GamePhase,
    pub player: Player,
    /// The level's boss
    pub enemy: Enemy,
    /// Obstacles of the active level, in resolution order
    pub obstacles: Vec<Obstacle>,
    /// Horizontal camera offset, derived from the player each tick
    pub camera_x: f32,
    pub parallax: Parallax,
    /// Play the victory sequence after a won battle
    pub victory_animation: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events raised by the last tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// New run, parked on the intro screen with level 1 loaded
    pub fn new() -> Self {
        let def = level(0);
        Self {
            level_index: 0,
            phase: GamePhase::Intro,
            player: Player::new(),
            enemy: (def.boss)(),
            obstacles: (def.obstacles)(),
            camera_x: camera_offset(SPAWN_X),
            parallax: Parallax::for_level(def),
            victory_animation: true,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Builder toggle for the victory sequence
    pub fn with_victory_animation(mut self, enabled: bool) -> Self {
        self.victory_animation = enabled;
        self
    }

    /// 1-based level number for display
    pub fn level_number(&self) -> usize {
        self.level_index + 1
    }

    pub fn in_battle(&self) -> bool {
        self.phase == GamePhase::Battle
    }

    /// Victory sequence or level banner is running
    pub fn blocking_animation(&self) -> bool {
        matches!(
            self.phase,
            GamePhase::Victory(_) | GamePhase::LevelBanner { .. }
        )
    }

    /// Load level `index`: rebuild obstacles and boss, respawn the player,
    /// reset parallax.
    pub fn load_level(&mut self, index: usize, now_ms: f64) {
        let def = level(index);
        self.level_index = index;
        self.obstacles = (def.obstacles)();
        self.enemy = (def.boss)();
        self.player.respawn(now_ms);
        self.camera_x = camera_offset(self.player.rect.left());
        self.parallax = Parallax::for_level(def);
    }

    /// Horizontal extent the player must reach to leave the level
    pub fn level_end_x(&self) -> f32 {
        LEVEL_WIDTH
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
