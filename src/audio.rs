//! Sound registry
//!
//! Sounds are loaded once at startup under a short name and triggered by
//! name afterwards. The simulation never calls into audio directly; it
//! queues [`GameEvent`]s which [`SoundManager::handle_event`] plays.

use std::collections::{BTreeMap, HashSet};

use crate::settings::Settings;
use crate::sim::GameEvent;
use crate::sim::sounds;

/// Sounds loaded at startup: (name, asset path)
pub const DEFAULT_SOUNDS: [(&str, &str); 3] = [
    (sounds::EXPLODE, "res/EXPLODE1.WAV"),
    (sounds::THRUST, "res/THRUST.WAV"),
    (sounds::LOW_FUEL, "res/SFIRE.WAV"),
];

/// Error type for audio setup and playback
#[derive(Debug, thiserror::Error)]
pub enum SoundError {
    #[error("Unknown sound: {0}")]
    UnknownSound(String),

    #[error("Failed to load sound '{name}' from {path}: {reason}")]
    Load {
        name: String,
        path: String,
        reason: String,
    },
}

/// Platform audio output
pub trait SoundBackend {
    /// Prepare the asset at `path` for playback under `name`
    fn load(&mut self, name: &str, path: &str) -> Result<(), SoundError>;
    /// Start `name` from the beginning
    fn play(&mut self, name: &str, looping: bool);
    fn stop(&mut self, name: &str);
    /// Effective volume for every sound (0.0 - 1.0)
    fn set_volume(&mut self, volume: f32);
}

/// Name-keyed sound registry
pub struct SoundManager<B: SoundBackend> {
    backend: B,
    sounds: BTreeMap<String, String>,
    looping: HashSet<String>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<B: SoundBackend> SoundManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            sounds: BTreeMap::new(),
            looping: HashSet::new(),
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Create a manager with every default sound loaded; any failure is fatal
    pub fn with_default_sounds(backend: B) -> Result<Self, SoundError> {
        let mut manager = Self::new(backend);
        for (name, path) in DEFAULT_SOUNDS {
            manager.load(name, path)?;
        }
        log::info!("Loaded {} sounds", manager.sounds.len());
        Ok(manager)
    }

    pub fn load(&mut self, name: &str, path: &str) -> Result<(), SoundError> {
        self.backend.load(name, path)?;
        self.sounds.insert(name.to_string(), path.to_string());
        Ok(())
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.sounds.contains_key(name)
    }

    pub fn is_looping(&self, name: &str) -> bool {
        self.looping.contains(name)
    }

    fn check(&self, name: &str) -> Result<(), SoundError> {
        if self.is_loaded(name) {
            Ok(())
        } else {
            Err(SoundError::UnknownSound(name.to_string()))
        }
    }

    /// One-shot playback
    pub fn play(&mut self, name: &str) -> Result<(), SoundError> {
        self.check(name)?;
        self.backend.play(name, false);
        Ok(())
    }

    /// Start looping; already-looping sounds keep playing undisturbed
    pub fn play_looping(&mut self, name: &str) -> Result<(), SoundError> {
        self.check(name)?;
        if self.looping.insert(name.to_string()) {
            self.backend.play(name, true);
        }
        Ok(())
    }

    pub fn stop(&mut self, name: &str) -> Result<(), SoundError> {
        self.check(name)?;
        self.looping.remove(name);
        self.backend.stop(name);
        Ok(())
    }

    pub fn stop_all(&mut self) {
        for name in self.sounds.keys() {
            self.backend.stop(name);
        }
        self.looping.clear();
    }

    /// Apply volume preferences
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.master_volume = settings.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        self.muted = settings.muted;
        self.backend.set_volume(self.effective_volume());
    }

    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play the sound side of a simulation event
    pub fn handle_event(&mut self, event: &GameEvent) {
        let result = match event {
            GameEvent::PlaySound(name) => self.play(name),
            GameEvent::LoopSound(name) => self.play_looping(name),
            GameEvent::StopSound(name) => self.stop(name),
            GameEvent::StopAllSounds => {
                self.stop_all();
                Ok(())
            }
            _ => Ok(()),
        };
        if let Err(e) = result {
            log::warn!("Sound event {:?} failed: {}", event, e);
        }
    }

    /// Stop everything before the manager goes away
    pub fn shutdown(&mut self) {
        self.stop_all();
        log::info!("Audio shut down");
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

/// Backend for builds without audio output
#[derive(Debug, Default)]
pub struct SilentBackend;

impl SoundBackend for SilentBackend {
    fn load(&mut self, name: &str, path: &str) -> Result<(), SoundError> {
        log::debug!("Silent backend: registered '{}' ({})", name, path);
        Ok(())
    }

    fn play(&mut self, name: &str, looping: bool) {
        log::trace!("play {} (loop: {})", name, looping);
    }

    fn stop(&mut self, name: &str) {
        log::trace!("stop {}", name);
    }

    fn set_volume(&mut self, _volume: f32) {}
}

/// Backend using `<audio>` elements
#[cfg(target_arch = "wasm32")]
pub struct WebAudioBackend {
    elements: std::collections::HashMap<String, web_sys::HtmlAudioElement>,
    volume: f32,
}

#[cfg(target_arch = "wasm32")]
impl WebAudioBackend {
    pub fn new() -> Self {
        Self {
            elements: std::collections::HashMap::new(),
            volume: 1.0,
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for WebAudioBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl SoundBackend for WebAudioBackend {
    fn load(&mut self, name: &str, path: &str) -> Result<(), SoundError> {
        let element =
            web_sys::HtmlAudioElement::new_with_src(path).map_err(|e| SoundError::Load {
                name: name.to_string(),
                path: path.to_string(),
                reason: format!("{:?}", e),
            })?;
        element.set_preload("auto");
        element.set_volume(self.volume as f64);
        self.elements.insert(name.to_string(), element);
        Ok(())
    }

    fn play(&mut self, name: &str, looping: bool) {
        let Some(element) = self.elements.get(name) else {
            return;
        };
        element.set_loop(looping);
        element.set_current_time(0.0);
        // Browsers reject playback until the first user gesture
        if element.play().is_err() {
            log::warn!("Playback of '{}' was blocked", name);
        }
    }

    fn stop(&mut self, name: &str) {
        if let Some(element) = self.elements.get(name) {
            let _ = element.pause();
            element.set_current_time(0.0);
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        for element in self.elements.values() {
            element.set_volume(volume as f64);
        }
    }
}
