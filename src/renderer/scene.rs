//! Scene composition
//!
//! Turns a `GameState` into screen-space draw commands and HUD text. Nothing
//! here touches the GPU or the DOM, so frames can be inspected in tests.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

use super::vertex::colors;
use crate::assets::{Assets, TextureKey, CLOUD_SIZE};
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::level::Backdrop;
use crate::sim::{GamePhase, GameState, Rect, screen_index, sprite_rect};

/// Rotating hazards turn this many radians per second
pub const SPIN_RATE: f32 = PI;

/// Player stand-in color when no sprites are loaded
const PLAYER_FALLBACK: [f32; 4] = [0.9, 0.3, 0.3, 1.0];

pub const INTRO_LINES: [&str; 3] = [
    "It's an ordinary morning at the university.",
    "Leon sets off on his way...",
    "Press [Space] to start...",
];

/// One screen-space primitive, drawn in order
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Fill {
        rect: Rect,
        color: [f32; 4],
        rotation: f32,
    },
    Sprite {
        key: TextureKey,
        rect: Rect,
        rotation: f32,
    },
}

impl DrawCommand {
    pub fn fill(rect: Rect, color: [f32; 4]) -> Self {
        DrawCommand::Fill {
            rect,
            color,
            rotation: 0.0,
        }
    }

    pub fn rect(&self) -> &Rect {
        match self {
            DrawCommand::Fill { rect, .. } | DrawCommand::Sprite { rect, .. } => rect,
        }
    }
}

/// Which point of the text box `TextItem::pos` refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    TopLeft,
    TopCenter,
    TopRight,
    Center,
}

/// A line of HUD text in viewport pixels
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub pos: Vec2,
    pub anchor: TextAnchor,
}

impl TextItem {
    fn new(text: impl Into<String>, x: f32, y: f32, anchor: TextAnchor) -> Self {
        Self {
            text: text.into(),
            pos: Vec2::new(x, y),
            anchor,
        }
    }
}

/// Everything needed to present one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub clear: [f32; 4],
    pub commands: Vec<DrawCommand>,
    pub texts: Vec<TextItem>,
}

impl Frame {
    fn new(clear: [f32; 4]) -> Self {
        Self {
            clear,
            commands: Vec::new(),
            texts: Vec::new(),
        }
    }

    fn fill(&mut self, rect: Rect, color: [f32; 4]) {
        self.commands.push(DrawCommand::fill(rect, color));
    }

    /// Sprite if loaded, flat color otherwise
    fn sprite_or_fill(
        &mut self,
        assets: Option<&Assets>,
        key: TextureKey,
        rect: Rect,
        color: [f32; 4],
        rotation: f32,
    ) {
        let cmd = if assets.is_some_and(|a| a.has(key)) {
            DrawCommand::Sprite {
                key,
                rect,
                rotation,
            }
        } else {
            DrawCommand::Fill {
                rect,
                color,
                rotation,
            }
        };
        self.commands.push(cmd);
    }

    pub fn has_sprite(&self, key: TextureKey) -> bool {
        self.commands
            .iter()
            .any(|c| matches!(c, DrawCommand::Sprite { key: k, .. } if *k == key))
    }
}

/// Angle of a spinning hazard at `now_ms`
pub fn spin_angle(now_ms: f64) -> f32 {
    ((now_ms / 1000.0) as f32 * SPIN_RATE).rem_euclid(TAU)
}

/// Build the frame for the current state
pub fn compose(
    state: &GameState,
    assets: Option<&Assets>,
    settings: &Settings,
    now_ms: f64,
    fps: u32,
) -> Frame {
    let def = crate::sim::level(state.level_index);

    match state.phase {
        GamePhase::Intro => {
            let mut frame = Frame::new(colors::INTRO_BG);
            for (i, line) in INTRO_LINES.iter().enumerate() {
                frame.texts.push(TextItem::new(
                    *line,
                    VIEW_WIDTH / 2.0,
                    60.0 + i as f32 * 30.0,
                    TextAnchor::TopCenter,
                ));
            }
            return frame;
        }
        GamePhase::LevelBanner { .. } => {
            let mut frame = Frame::new(def.backdrop.sky_color());
            frame.texts.push(center_text(format!("Level {}", state.level_number())));
            return frame;
        }
        GamePhase::Complete => {
            let mut frame = Frame::new(def.backdrop.sky_color());
            frame.texts.push(center_text("You made it!"));
            return frame;
        }
        GamePhase::Playing | GamePhase::Battle | GamePhase::Victory(_) => {}
    }

    let mut frame = Frame::new(def.backdrop.sky_color());

    // Backdrop
    let offset = if state.parallax.backdrop_enabled && settings.effective_parallax() {
        state.parallax.backdrop
    } else {
        0.0
    };
    for (rect, color) in scenery(def.backdrop, offset) {
        frame.fill(rect, color);
    }

    if settings.clouds {
        let size = Vec2::new(CLOUD_SIZE.0 as f32, CLOUD_SIZE.1 as f32);
        for (layer, color, scale) in [
            (&state.parallax.clouds.far, colors::CLOUD_FAR, 0.6),
            (&state.parallax.clouds.near, colors::CLOUD, 1.0),
        ] {
            for pos in layer {
                let rect = Rect {
                    pos: *pos,
                    size: size * scale,
                };
                frame.sprite_or_fill(assets, TextureKey::Cloud, rect, color, 0.0);
            }
        }
    }

    frame.fill(
        Rect::new(0.0, GROUND_Y, VIEW_WIDTH, VIEW_HEIGHT - GROUND_Y),
        def.backdrop.ground_color(),
    );

    let cam = state.camera_x;
    for o in &state.obstacles {
        let rect = o.rect.shifted_x(cam);
        if rect.right() < 0.0 || rect.left() > VIEW_WIDTH {
            continue;
        }
        let rotation = if o.kind.spins() && settings.effective_spin() {
            spin_angle(now_ms)
        } else {
            0.0
        };
        frame.sprite_or_fill(
            assets,
            TextureKey::Obstacle(o.kind),
            rect,
            o.kind.color(),
            rotation,
        );
    }

    // The fight sequence replaces both characters while it has frames
    if let GamePhase::Victory(fight) = state.phase {
        let key = TextureKey::Fight(fight.frame(now_ms));
        if assets.is_some_and(|a| a.has(key)) {
            frame.commands.push(DrawCommand::Sprite {
                key,
                rect: crate::sim::FightAnimation::screen_rect(),
                rotation: 0.0,
            });
            push_hud(&mut frame, state, settings, fps);
            return frame;
        }
    }

    if state.enemy.alive {
        frame.sprite_or_fill(
            assets,
            TextureKey::Enemy,
            state.enemy.rect.shifted_x(cam),
            state.enemy.kind.color(),
            0.0,
        );
    }

    let player = &state.player;
    let key = TextureKey::Player {
        state: player.anim.state,
        facing: player.facing,
        frame: player.anim.frame,
    };
    let rect = sprite_rect(&player.rect, player.anim.state).shifted_x(cam);
    frame.sprite_or_fill(assets, key, rect, PLAYER_FALLBACK, 0.0);

    push_hud(&mut frame, state, settings, fps);
    frame
}

fn center_text(text: impl Into<String>) -> TextItem {
    TextItem::new(text, VIEW_WIDTH / 2.0, VIEW_HEIGHT / 2.0, TextAnchor::Center)
}

fn push_hud(frame: &mut Frame, state: &GameState, settings: &Settings, fps: u32) {
    frame.texts.push(TextItem::new(
        format!(
            "Level {}/{}  Screen {}/{}",
            state.level_number(),
            NUM_LEVELS,
            screen_index(state.camera_x),
            SCREENS_PER_LEVEL
        ),
        10.0,
        10.0,
        TextAnchor::TopLeft,
    ));
    if settings.show_fps {
        frame.texts.push(TextItem::new(
            format!("FPS: {}", fps),
            VIEW_WIDTH - 10.0,
            10.0,
            TextAnchor::TopRight,
        ));
    }
    if state.in_battle() {
        frame.texts.push(TextItem::new(
            format!(
                "Level {}: {} blocks the way!",
                state.level_number(),
                state.enemy.kind.name()
            ),
            50.0,
            150.0,
            TextAnchor::TopLeft,
        ));
        frame.texts.push(TextItem::new(
            "[F] fight  [R] flee",
            50.0,
            180.0,
            TextAnchor::TopLeft,
        ));
    }
}

/// Background scenery for a backdrop, shifted horizontally by `offset`
pub fn scenery(backdrop: Backdrop, offset: f32) -> Vec<(Rect, [f32; 4])> {
    let mut out = Vec::new();
    match backdrop {
        Backdrop::Campus => {
            // Wide enough to cover the viewport across the whole parallax range
            const HEIGHTS: [f32; 8] = [150.0, 210.0, 170.0, 230.0, 160.0, 200.0, 180.0, 220.0];
            for (i, h) in HEIGHTS.iter().enumerate() {
                let x = -200.0 + i as f32 * 160.0 + offset;
                let top = GROUND_Y - h;
                out.push((Rect::new(x, top, 130.0, *h), colors::SCENERY_LIGHT));
                let mut wy = top + 20.0;
                while wy + 20.0 < GROUND_Y - 10.0 {
                    for col in 0..3 {
                        let wx = x + 15.0 + col as f32 * 40.0;
                        out.push((Rect::new(wx, wy, 20.0, 20.0), colors::WINDOW));
                    }
                    wy += 40.0;
                }
            }
        }
        Backdrop::Street => {
            for i in 0..5 {
                let x = 20.0 + i as f32 * 170.0 + offset;
                out.push((Rect::new(x, GROUND_Y - 120.0, 140.0, 120.0), colors::SCENERY_DARK));
                out.push((Rect::new(x + 20.0, GROUND_Y - 90.0, 100.0, 40.0), colors::WINDOW));
                out.push((Rect::new(x + 155.0, GROUND_Y - 150.0, 6.0, 150.0), colors::SCENERY_LIGHT));
            }
        }
        Backdrop::Park => {
            for i in 0..6 {
                let x = 40.0 + i as f32 * 140.0 + offset;
                out.push((Rect::new(x + 25.0, GROUND_Y - 80.0, 16.0, 80.0), colors::TRUNK));
                out.push((Rect::new(x, GROUND_Y - 150.0, 66.0, 80.0), colors::FOLIAGE));
            }
        }
        Backdrop::Harbor => {
            out.push((Rect::new(0.0, GROUND_Y - 40.0, VIEW_WIDTH, 40.0), colors::WATER));
            for i in 0..3 {
                let x = 120.0 + i as f32 * 260.0 + offset;
                out.push((Rect::new(x, GROUND_Y - 220.0, 14.0, 180.0), colors::SCENERY_DARK));
                out.push((Rect::new(x - 60.0, GROUND_Y - 220.0, 140.0, 12.0), colors::SCENERY_DARK));
            }
        }
        Backdrop::Rooftops => {
            out.push((Rect::new(620.0, 40.0, 50.0, 50.0), colors::MOON));
            const HEIGHTS: [f32; 6] = [90.0, 140.0, 110.0, 170.0, 100.0, 130.0];
            for (i, h) in HEIGHTS.iter().enumerate() {
                let x = i as f32 * 140.0 + offset;
                out.push((Rect::new(x, GROUND_Y - h, 120.0, *h), colors::SCENERY_DARK));
            }
        }
    }
    out
}
