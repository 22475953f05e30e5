//! Sprite loading
//!
//! Files are gathered into an `AssetBundle` (read from disk natively, fetched
//! over HTTP in the browser) and decoded with the `image` crate. Player sheets
//! are required; every other sprite is optional and falls back to a flat
//! color in the scene.

use std::collections::HashMap;
use std::fmt;

use image::imageops::{self, FilterType};
use image::{GenericImageView, RgbaImage};

use crate::consts::*;
use crate::sim::animation::{AnimState, FIGHT_FRAMES, Facing, SHEET_FRAMES};
use crate::sim::obstacle::ObstacleKind;

/// Root folder (native) or URL prefix (web) of all sprite files
pub const ASSET_ROOT: &str = "assets";

/// Player sheet layout: 3 columns x 2 rows of 166x250 frames
pub const SHEET_COLS: u32 = 3;
pub const SHEET_ROWS: u32 = 2;
pub const SHEET_FRAME_W: u32 = 166;
pub const SHEET_FRAME_H: u32 = 250;

pub const WALK_SHEET: &str = "sprites/player/walk.png";
pub const JUMP_SHEET: &str = "sprites/player/jump.png";
pub const CROUCH_SHEET: &str = "sprites/player/crouch.png";
pub const ENEMY_SPRITE: &str = "sprites/enemy.png";
pub const CLOUD_SPRITE: &str = "sprites/cloud.png";
/// Victory sequence, `FIGHT_FRAMES` equal columns in one row
pub const FIGHT_SHEET: &str = "sprites/fight.png";

/// Cloud sprite size
pub const CLOUD_SIZE: (u32, u32) = (120, 50);

/// Asset loading failure
#[derive(Debug)]
pub enum AssetError {
    /// File not present in the bundle
    Missing { path: String },
    /// File present but not a decodable image
    Decode {
        path: String,
        source: image::ImageError,
    },
    /// Sheet smaller than its declared grid
    SheetTooSmall {
        path: String,
        needed: (u32, u32),
        actual: (u32, u32),
    },
    /// Browser fetch failed
    Fetch { path: String, reason: String },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Missing { path } => write!(f, "missing asset {}", path),
            AssetError::Decode { path, source } => {
                write!(f, "failed to decode {}: {}", path, source)
            }
            AssetError::SheetTooSmall {
                path,
                needed,
                actual,
            } => write!(
                f,
                "sheet {} is {}x{}, needs at least {}x{}",
                path, actual.0, actual.1, needed.0, needed.1
            ),
            AssetError::Fetch { path, reason } => write!(f, "failed to fetch {}: {}", path, reason),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Decoded RGBA image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub pixels: RgbaImage,
}

impl ImageData {
    /// Single-color image (tests, placeholders)
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, image::Rgba(rgba)),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Raw RGBA8 bytes, row-major
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn resized(&self, width: u32, height: u32) -> Self {
        Self {
            pixels: imageops::resize(&self.pixels, width, height, FilterType::Triangle),
        }
    }

    pub fn flipped(&self) -> Self {
        Self {
            pixels: imageops::flip_horizontal(&self.pixels),
        }
    }
}

/// Raw file contents keyed by path relative to `ASSET_ROOT`
#[derive(Debug, Clone, Default)]
pub struct AssetBundle {
    files: HashMap<String, Vec<u8>>,
}

impl AssetBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, bytes: Vec<u8>) {
        self.files.insert(path.into(), bytes);
    }

    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(|b| b.as_slice())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Every file the game knows how to use
    pub fn manifest() -> Vec<String> {
        let mut paths: Vec<String> = [
            WALK_SHEET,
            JUMP_SHEET,
            CROUCH_SHEET,
            ENEMY_SPRITE,
            CLOUD_SPRITE,
            FIGHT_SHEET,
        ]
        .iter()
        .map(|p| p.to_string())
        .collect();
        paths.extend(ObstacleKind::ALL.iter().map(obstacle_path));
        paths
    }

    /// Read every manifest file under `root`; absent files are skipped
    #[cfg(not(target_arch = "wasm32"))]
    pub fn read_dir(root: &std::path::Path) -> Self {
        let mut bundle = Self::new();
        for path in Self::manifest() {
            match std::fs::read(root.join(&path)) {
                Ok(bytes) => bundle.insert(path, bytes),
                Err(e) => log::debug!("Skipping {}: {}", path, e),
            }
        }
        log::info!("Read {} asset files from {}", bundle.len(), root.display());
        bundle
    }

    /// Fetch every manifest file relative to `root`; failed fetches are skipped
    #[cfg(target_arch = "wasm32")]
    pub async fn fetch(root: &str) -> Self {
        let mut bundle = Self::new();
        for path in Self::manifest() {
            let url = format!("{}/{}", root, path);
            match fetch_bytes(&url).await {
                Ok(bytes) => bundle.insert(path, bytes),
                Err(e) => log::debug!("Skipping {}", e),
            }
        }
        log::info!("Fetched {} asset files", bundle.len());
        bundle
    }

    fn decode(&self, path: &str) -> Result<ImageData, AssetError> {
        let bytes = self.get(path).ok_or_else(|| AssetError::Missing {
            path: path.to_string(),
        })?;
        let img = image::load_from_memory(bytes).map_err(|source| AssetError::Decode {
            path: path.to_string(),
            source,
        })?;
        Ok(ImageData {
            pixels: img.to_rgba8(),
        })
    }

    /// Load one image, optionally scaled. Never fails: problems are logged
    /// and reported as `None` so the caller can fall back to a flat color.
    pub fn load_image(&self, path: &str, size: Option<(u32, u32)>) -> Option<ImageData> {
        match self.decode(path) {
            Ok(img) => {
                log::info!("Loaded {}", path);
                Some(match size {
                    Some((w, h)) => img.resized(w, h),
                    None => img,
                })
            }
            Err(e) => {
                log::warn!("Sprite unavailable, using fallback color: {}", e);
                None
            }
        }
    }

    /// Split a sprite sheet into `cols` x `rows` frames, row-major, each scaled
    /// to `size`
    pub fn load_strip(
        &self,
        path: &str,
        cols: u32,
        rows: u32,
        frame: (u32, u32),
        size: (u32, u32),
    ) -> Result<Vec<ImageData>, AssetError> {
        let sheet = self.decode(path)?;
        let needed = (cols * frame.0, rows * frame.1);
        let actual = (sheet.width(), sheet.height());
        if actual.0 < needed.0 || actual.1 < needed.1 {
            return Err(AssetError::SheetTooSmall {
                path: path.to_string(),
                needed,
                actual,
            });
        }

        let mut frames = Vec::with_capacity((cols * rows) as usize);
        for row in 0..rows {
            for col in 0..cols {
                let view = sheet
                    .pixels
                    .view(col * frame.0, row * frame.1, frame.0, frame.1);
                let img = ImageData {
                    pixels: view.to_image(),
                };
                frames.push(img.resized(size.0, size.1));
            }
        }
        Ok(frames)
    }
}

fn obstacle_path(kind: &ObstacleKind) -> String {
    format!("sprites/obstacles/{}", kind.sprite_file())
}

#[cfg(target_arch = "wasm32")]
async fn fetch_bytes(url: &str) -> Result<Vec<u8>, AssetError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let fail = |reason: String| AssetError::Fetch {
        path: url.to_string(),
        reason,
    };
    let window = web_sys::window().ok_or_else(|| fail("no window".to_string()))?;
    let value = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| fail(format!("{:?}", e)))?;
    let response: web_sys::Response = value
        .dyn_into()
        .map_err(|e| fail(format!("{:?}", e)))?;
    if !response.ok() {
        return Err(fail(format!("HTTP {}", response.status())));
    }
    let buffer = JsFuture::from(response.array_buffer().map_err(|e| fail(format!("{:?}", e)))?)
        .await
        .map_err(|e| fail(format!("{:?}", e)))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// Texture identity shared by the scene and the GPU texture cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKey {
    Player {
        state: AnimState,
        facing: Facing,
        frame: usize,
    },
    Enemy,
    Obstacle(ObstacleKind),
    Cloud,
    Fight(usize),
}

/// Player frames, right-facing as loaded and left-facing mirrored
#[derive(Debug, Clone)]
pub struct PlayerSprites {
    walk: [Vec<ImageData>; 2],
    jump: [Vec<ImageData>; 2],
    crouch: [Vec<ImageData>; 2],
}

impl PlayerSprites {
    /// Build from right-facing frame lists
    pub fn new(walk: Vec<ImageData>, jump: Vec<ImageData>, crouch: Vec<ImageData>) -> Self {
        let mirror = |frames: Vec<ImageData>| {
            let left = frames.iter().map(ImageData::flipped).collect();
            [left, frames]
        };
        Self {
            walk: mirror(walk),
            jump: mirror(jump),
            crouch: mirror(crouch),
        }
    }

    /// Required sheets; any failure aborts startup
    pub fn load(bundle: &AssetBundle) -> Result<Self, AssetError> {
        let size = (PLAYER_WIDTH as u32, PLAYER_HEIGHT as u32);
        let frame = (SHEET_FRAME_W, SHEET_FRAME_H);
        let walk = bundle.load_strip(WALK_SHEET, SHEET_COLS, SHEET_ROWS, frame, size)?;
        let jump = bundle.load_strip(JUMP_SHEET, SHEET_COLS, SHEET_ROWS, frame, size)?;
        let crouch = bundle.load_strip(CROUCH_SHEET, SHEET_COLS, SHEET_ROWS, frame, size)?;
        Ok(Self::new(walk, jump, crouch))
    }

    /// Frame for a state; idle shows the first walk frame
    pub fn frame(&self, state: AnimState, facing: Facing, frame: usize) -> Option<&ImageData> {
        let side = match facing {
            Facing::Left => 0,
            Facing::Right => 1,
        };
        match state {
            AnimState::Idle => self.walk[side].first(),
            AnimState::Walk => self.walk[side].get(frame),
            AnimState::Jump => self.jump[side].get(frame),
            AnimState::Crouch => self.crouch[side].get(frame),
        }
    }
}

/// Everything the renderer can draw as an image
#[derive(Debug, Clone)]
pub struct Assets {
    pub player: PlayerSprites,
    pub enemy: Option<ImageData>,
    pub obstacles: HashMap<ObstacleKind, ImageData>,
    pub cloud: Option<ImageData>,
    pub fight: Vec<ImageData>,
}

impl Assets {
    /// Decode a bundle. Only missing player sheets are an error.
    pub fn load(bundle: &AssetBundle) -> Result<Self, AssetError> {
        let player = PlayerSprites::load(bundle)?;

        let enemy = bundle.load_image(
            ENEMY_SPRITE,
            Some((ENEMY_WIDTH as u32, ENEMY_HEIGHT as u32)),
        );
        let cloud = bundle.load_image(CLOUD_SPRITE, Some(CLOUD_SIZE));

        let mut obstacles = HashMap::new();
        for kind in ObstacleKind::ALL {
            if let Some(img) = bundle.load_image(&obstacle_path(&kind), None) {
                obstacles.insert(kind, img);
            }
        }

        let fight = bundle
            .get(FIGHT_SHEET)
            .map(|_| load_fight(bundle))
            .unwrap_or_default();

        Ok(Self {
            player,
            enemy,
            obstacles,
            cloud,
            fight,
        })
    }

    pub fn image(&self, key: TextureKey) -> Option<&ImageData> {
        match key {
            TextureKey::Player {
                state,
                facing,
                frame,
            } => self.player.frame(state, facing, frame),
            TextureKey::Enemy => self.enemy.as_ref(),
            TextureKey::Obstacle(kind) => self.obstacles.get(&kind),
            TextureKey::Cloud => self.cloud.as_ref(),
            TextureKey::Fight(frame) => self.fight.get(frame),
        }
    }

    pub fn has(&self, key: TextureKey) -> bool {
        self.image(key).is_some()
    }

    /// Every loaded image with its key, for GPU upload
    pub fn textures(&self) -> Vec<(TextureKey, &ImageData)> {
        let mut out = Vec::new();
        for facing in [Facing::Left, Facing::Right] {
            for state in [AnimState::Walk, AnimState::Jump, AnimState::Crouch] {
                for frame in 0..SHEET_FRAMES {
                    let key = TextureKey::Player {
                        state,
                        facing,
                        frame,
                    };
                    if let Some(img) = self.image(key) {
                        out.push((key, img));
                    }
                }
            }
        }
        let singles = [TextureKey::Enemy, TextureKey::Cloud]
            .into_iter()
            .chain(ObstacleKind::ALL.into_iter().map(TextureKey::Obstacle))
            .chain((0..FIGHT_FRAMES).map(TextureKey::Fight));
        for key in singles {
            if let Some(img) = self.image(key) {
                out.push((key, img));
            }
        }
        out
    }
}

/// Victory frames are optional; a broken sheet only loses the sequence
fn load_fight(bundle: &AssetBundle) -> Vec<ImageData> {
    let sheet = match bundle.load_image(FIGHT_SHEET, None) {
        Some(sheet) => sheet,
        None => return Vec::new(),
    };
    let frame = (sheet.width() / FIGHT_FRAMES as u32, sheet.height());
    if frame.0 == 0 || frame.1 == 0 {
        log::warn!("Victory sequence unavailable: {} is too small", FIGHT_SHEET);
        return Vec::new();
    }
    let size = PLAYER_HEIGHT as u32 * 2;
    match bundle.load_strip(FIGHT_SHEET, FIGHT_FRAMES as u32, 1, frame, (size, size)) {
        Ok(frames) => frames,
        Err(e) => {
            log::warn!("Victory sequence unavailable: {}", e);
            Vec::new()
        }
    }
}
