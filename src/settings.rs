//! Player preferences
//!
//! Persisted as JSON in LocalStorage on the web; native runs use defaults.

use serde::{Deserialize, Serialize};

/// Display preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Scenery ===
    /// Backdrop scenery scrolls slower than the foreground
    pub parallax: bool,
    /// Cloud layers on levels that have them
    pub clouds: bool,

    // === Gameplay presentation ===
    /// Play the fight sequence after a won battle
    pub victory_animation: bool,

    // === Accessibility ===
    /// Reduced motion (static backdrop, no spinning hazards)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_fps: true,
            parallax: true,
            clouds: true,
            victory_animation: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective parallax (respects reduced_motion)
    pub fn effective_parallax(&self) -> bool {
        self.parallax && !self.reduced_motion
    }

    /// Whether rotating hazards are drawn spinning
    pub fn effective_spin(&self) -> bool {
        !self.reduced_motion
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "campus_run_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_enable_everything() {
        let s = Settings::default();
        assert!(s.show_fps && s.parallax && s.clouds && s.victory_animation);
        assert!(!s.reduced_motion);
    }

    #[test]
    fn test_reduced_motion_overrides() {
        let s = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert!(!s.effective_parallax());
        assert!(!s.effective_spin());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s: Settings = serde_json::from_str(r#"{"show_fps":false}"#).expect("parse");
        assert!(!s.show_fps);
        assert!(s.clouds);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_native_load_uses_defaults() {
        let s = Settings::load();
        s.save();
        assert!(s.show_fps && s.clouds);
        assert!(!s.reduced_motion);
    }
}
