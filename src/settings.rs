//! Game settings and preferences
//!
//! Persisted in LocalStorage on the web; natively the defaults apply.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === HUD ===
    /// Show FPS counter at startup
    pub show_fps: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === Simulation ===
    /// Fixed RNG seed; a time-based seed is used when unset
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_fps: false,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            mute_on_blur: true,

            seed: None,
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "lunar_lander_settings";

    /// Parse settings JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Seed to use for a new game
    pub fn seed_or(&self, fallback: u64) -> u64 {
        self.seed.unwrap_or(fallback)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = local_storage()
            .and_then(|storage| storage.get_item(Self::STORAGE_KEY).ok().flatten());
        match stored.map(|json| Self::from_json(&json)) {
            Some(Ok(settings)) => {
                log::info!("Loaded settings from LocalStorage");
                settings
            }
            Some(Err(e)) => {
                log::warn!("Ignoring invalid stored settings: {}", e);
                Self::default()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = local_storage() else {
            return;
        };
        match self.to_json() {
            Ok(json) => {
                if storage.set_item(Self::STORAGE_KEY, &json).is_ok() {
                    log::info!("Settings saved");
                }
            }
            Err(e) => log::warn!("Settings not saved: {}", e),
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

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"show_fps": true, "seed": 42}"#).expect("valid");
        assert!(settings.show_fps);
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.master_volume, 0.8);
        assert!(!settings.muted);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            show_fps: true,
            sfx_volume: 0.3,
            ..Default::default()
        };
        let json = settings.to_json().expect("serializes");
        assert_eq!(Settings::from_json(&json).expect("parses"), settings);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(Settings::from_json("{not json").is_err());
    }

    #[test]
    fn test_seed_fallback() {
        assert_eq!(Settings::default().seed_or(7), 7);
        let fixed = Settings {
            seed: Some(3),
            ..Default::default()
        };
        assert_eq!(fixed.seed_or(7), 3);
    }
}
