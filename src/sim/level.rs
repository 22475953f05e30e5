//! Level table
//!
//! Levels are static configuration: a backdrop tag, an obstacle factory, a
//! boss factory and optional cloud decoration. Only the active index changes
//! at runtime.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::obstacle::{Obstacle, ObstacleKind};
use super::rect::Rect;
use crate::consts::*;

/// Background drawing strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Backdrop {
    /// University buildings with a parallax skyline
    Campus,
    Street,
    Park,
    Harbor,
    Rooftops,
}

impl Backdrop {
    /// Whether this backdrop offsets its scenery by the parallax accumulator
    pub fn has_parallax(&self) -> bool {
        matches!(self, Backdrop::Campus)
    }

    pub fn sky_color(&self) -> [f32; 4] {
        match self {
            Backdrop::Campus => [0.2, 0.59, 0.78, 1.0],
            Backdrop::Street => [0.45, 0.62, 0.78, 1.0],
            Backdrop::Park => [0.35, 0.7, 0.9, 1.0],
            Backdrop::Harbor => [0.85, 0.55, 0.35, 1.0],
            Backdrop::Rooftops => [0.06, 0.07, 0.2, 1.0],
        }
    }

    pub fn ground_color(&self) -> [f32; 4] {
        match self {
            Backdrop::Harbor => [0.3, 0.28, 0.25, 1.0],
            Backdrop::Rooftops => [0.2, 0.18, 0.2, 1.0],
            _ => [0.39, 0.2, 0.0, 1.0],
        }
    }
}

/// Which boss guards the end of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossKind {
    HallMonitor,
    Bouncer,
    ParkRanger,
    Dockhand,
    Dean,
}

impl BossKind {
    pub fn name(&self) -> &'static str {
        match self {
            BossKind::HallMonitor => "The Hall Monitor",
            BossKind::Bouncer => "The Bouncer",
            BossKind::ParkRanger => "The Park Ranger",
            BossKind::Dockhand => "The Dockhand",
            BossKind::Dean => "The Dean",
        }
    }

    /// Fallback color when the enemy sprite is missing
    pub fn color(&self) -> [f32; 4] {
        match self {
            BossKind::Dean => [0.6, 0.1, 0.6, 1.0],
            _ => [0.2, 0.78, 0.2, 1.0],
        }
    }
}

/// The level's boss
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub rect: Rect,
    pub alive: bool,
    pub kind: BossKind,
}

impl Enemy {
    /// Boss standing in the middle of the level's last screen
    pub fn at_level_end(kind: BossKind) -> Self {
        let x = VIEW_WIDTH * (SCREENS_PER_LEVEL - 1) as f32 + VIEW_WIDTH / 2.0 - ENEMY_WIDTH / 2.0;
        Self {
            rect: Rect::new(x, GROUND_Y - ENEMY_HEIGHT, ENEMY_WIDTH, ENEMY_HEIGHT),
            alive: true,
            kind,
        }
    }
}

/// Seeded cloud placement for the two parallax layers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudSpec {
    pub seed: u64,
    pub near: usize,
    pub far: usize,
}

/// Cloud positions in screen space, one list per layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CloudLayers {
    pub near: Vec<Vec2>,
    pub far: Vec<Vec2>,
}

impl CloudSpec {
    /// Place clouds across the wrap band `[-VIEW_WIDTH, LEVEL_WIDTH - VIEW_WIDTH)`
    pub fn generate(&self) -> CloudLayers {
        let mut rng = Pcg32::seed_from_u64(self.seed);
        let mut layer = |count: usize, y_min: f32, y_max: f32| -> Vec<Vec2> {
            (0..count)
                .map(|_| {
                    Vec2::new(
                        rng.random_range(-VIEW_WIDTH..LEVEL_WIDTH - VIEW_WIDTH),
                        rng.random_range(y_min..y_max),
                    )
                })
                .collect()
        };
        let near = layer(self.near, 40.0, 140.0);
        let far = layer(self.far, 20.0, 90.0);
        CloudLayers { near, far }
    }
}

/// One level descriptor
#[derive(Debug, Clone, Copy)]
pub struct LevelDef {
    pub name: &'static str,
    pub backdrop: Backdrop,
    pub obstacles: fn() -> Vec<Obstacle>,
    pub boss: fn() -> Enemy,
    pub clouds: Option<CloudSpec>,
}

/// The fixed level sequence
pub static LEVELS: [LevelDef; NUM_LEVELS] = [
    LevelDef {
        name: "Campus",
        backdrop: Backdrop::Campus,
        obstacles: campus_obstacles,
        boss: campus_boss,
        clouds: None,
    },
    LevelDef {
        name: "Main Street",
        backdrop: Backdrop::Street,
        obstacles: street_obstacles,
        boss: street_boss,
        clouds: None,
    },
    LevelDef {
        name: "City Park",
        backdrop: Backdrop::Park,
        obstacles: park_obstacles,
        boss: park_boss,
        clouds: Some(CloudSpec {
            seed: 0x5eed_0003,
            near: 6,
            far: 9,
        }),
    },
    LevelDef {
        name: "Harbor",
        backdrop: Backdrop::Harbor,
        obstacles: harbor_obstacles,
        boss: harbor_boss,
        clouds: Some(CloudSpec {
            seed: 0x5eed_0004,
            near: 5,
            far: 7,
        }),
    },
    LevelDef {
        name: "Rooftops",
        backdrop: Backdrop::Rooftops,
        obstacles: rooftop_obstacles,
        boss: rooftop_boss,
        clouds: None,
    },
];

/// Level descriptor by 0-based index.
///
/// # Panics
/// Panics when `index >= NUM_LEVELS`; the index only ever comes from the
/// closed level table.
pub fn level(index: usize) -> &'static LevelDef {
    &LEVELS[index]
}

fn campus_boss() -> Enemy {
    Enemy::at_level_end(BossKind::HallMonitor)
}

fn street_boss() -> Enemy {
    Enemy::at_level_end(BossKind::Bouncer)
}

fn park_boss() -> Enemy {
    Enemy::at_level_end(BossKind::ParkRanger)
}

fn harbor_boss() -> Enemy {
    Enemy::at_level_end(BossKind::Dockhand)
}

fn rooftop_boss() -> Enemy {
    Enemy::at_level_end(BossKind::Dean)
}

/// x offset of screen `n` (0-based) within a level
const fn screen(n: u32) -> f32 {
    VIEW_WIDTH * n as f32
}

fn campus_obstacles() -> Vec<Obstacle> {
    use ObstacleKind::*;
    let off = screen(1);
    vec![
        // Screen 1
        Obstacle::on_ground(Spike, 150.0, 100.0, 10.0),
        Obstacle::on_ground(Spring, 350.0, 40.0, 20.0),
        Obstacle::new(Platform, 550.0, GROUND_Y - 120.0, 80.0, 20.0),
        Obstacle::new(Water, 480.0, GROUND_Y - 5.0, 200.0, 10.0),
        // Screen 2
        Obstacle::on_ground(Spring, off + 150.0, 40.0, 20.0),
        Obstacle::on_ground(Spike, off + 200.0, 120.0, 10.0),
        Obstacle::on_ground(Rotating, off + 600.0, 60.0, 60.0),
    ]
}

fn street_obstacles() -> Vec<Obstacle> {
    use ObstacleKind::*;
    let off = screen(1);
    vec![
        Obstacle::on_ground(Spike, 220.0, 80.0, 10.0),
        Obstacle::new(Platform, 420.0, GROUND_Y - 200.0, 120.0, 20.0),
        Obstacle::on_ground(Rotating, 640.0, 60.0, 60.0),
        Obstacle::on_ground(Spring, off + 250.0, 40.0, 20.0),
        Obstacle::on_ground(Spike, off + 300.0, 130.0, 10.0),
        Obstacle::new(Water, off + 520.0, GROUND_Y - 5.0, 160.0, 10.0),
    ]
}

fn park_obstacles() -> Vec<Obstacle> {
    use ObstacleKind::*;
    let off = screen(1);
    vec![
        Obstacle::new(Water, 180.0, GROUND_Y - 5.0, 240.0, 10.0),
        Obstacle::on_ground(Spring, 760.0, 40.0, 20.0),
        Obstacle::on_ground(Spike, off + 10.0, 120.0, 10.0),
        Obstacle::on_ground(Rotating, off + 400.0, 60.0, 60.0),
        Obstacle::on_ground(Spike, off + 700.0, 90.0, 10.0),
        Obstacle::new(Platform, screen(2) + 150.0, GROUND_Y - 200.0, 100.0, 20.0),
    ]
}

fn harbor_obstacles() -> Vec<Obstacle> {
    use ObstacleKind::*;
    let off = screen(1);
    vec![
        Obstacle::new(Water, 120.0, GROUND_Y - 5.0, 300.0, 10.0),
        Obstacle::new(Platform, 220.0, GROUND_Y - 200.0, 100.0, 20.0),
        Obstacle::on_ground(Spike, 520.0, 110.0, 10.0),
        Obstacle::on_ground(Spring, off + 150.0, 40.0, 20.0),
        Obstacle::on_ground(Spike, off + 200.0, 120.0, 10.0),
        Obstacle::on_ground(Rotating, off + 600.0, 60.0, 60.0),
        Obstacle::new(Water, off + 850.0, GROUND_Y - 5.0, 250.0, 10.0),
    ]
}

fn rooftop_obstacles() -> Vec<Obstacle> {
    use ObstacleKind::*;
    let off = screen(1);
    vec![
        Obstacle::on_ground(Spike, 160.0, 120.0, 10.0),
        Obstacle::on_ground(Rotating, 420.0, 60.0, 60.0),
        Obstacle::new(Platform, 560.0, GROUND_Y - 200.0, 100.0, 20.0),
        Obstacle::on_ground(Spike, 700.0, 100.0, 10.0),
        Obstacle::on_ground(Spring, off + 350.0, 40.0, 20.0),
        Obstacle::on_ground(Spike, off + 400.0, 130.0, 10.0),
        Obstacle::on_ground(Rotating, off + 900.0, 60.0, 60.0),
        Obstacle::new(Water, off + 1050.0, GROUND_Y - 5.0, 90.0, 10.0),
    ]
}
