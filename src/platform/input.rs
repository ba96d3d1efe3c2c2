//! Keyboard mapping
//!
//! Key names follow `KeyboardEvent.key`, so the web front-end can pass them
//! straight through. Discrete actions fire on key-down; the ship controls are
//! read from the held-key state every frame.

use std::collections::HashSet;

use crate::sim::TickInput;

/// Discrete key-down actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Quit,
    ToggleFps,
    ToggleFullscreen,
    Start,
    Pause,
    Kill,
    QuitToMenu,
}

/// Map a key name to its discrete action
pub fn key_action(key: &str) -> Option<KeyAction> {
    match key {
        "Escape" => Some(KeyAction::Quit),
        "j" | "J" => Some(KeyAction::ToggleFps),
        "f" | "F" => Some(KeyAction::ToggleFullscreen),
        "Enter" => Some(KeyAction::Start),
        "p" | "P" => Some(KeyAction::Pause),
        "k" | "K" => Some(KeyAction::Kill),
        "q" | "Q" => Some(KeyAction::QuitToMenu),
        _ => None,
    }
}

/// Keys currently held down
#[derive(Debug, Clone, Default)]
pub struct HeldKeys {
    keys: HashSet<String>,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: &str) {
        self.keys.insert(normalize(key));
    }

    pub fn release(&mut self, key: &str) {
        self.keys.remove(&normalize(key));
    }

    /// Drop everything (e.g. when the window loses focus and key-ups are lost)
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn is_down(&self, key: &str) -> bool {
        self.keys.contains(&normalize(key))
    }

    fn any_down(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.is_down(k))
    }

    pub fn rotate_left(&self) -> bool {
        self.any_down(&["ArrowLeft", "z"])
    }

    pub fn rotate_right(&self) -> bool {
        self.any_down(&["ArrowRight", "x"])
    }

    pub fn thrust(&self) -> bool {
        self.any_down(&["ArrowUp", "n"])
    }

    /// Copy the continuous controls into a tick input
    pub fn apply_to(&self, input: &mut TickInput) {
        input.rotate_left = self.rotate_left();
        input.rotate_right = self.rotate_right();
        input.thrust = self.thrust();
    }
}

/// Letter keys arrive as either case depending on shift/caps lock
fn normalize(key: &str) -> String {
    if key.chars().count() == 1 {
        key.to_lowercase()
    } else {
        key.to_string()
    }
}

/// Record a discrete action into the pending tick input
pub fn apply_action(input: &mut TickInput, action: KeyAction) {
    match action {
        KeyAction::Quit => input.quit = true,
        KeyAction::ToggleFps => input.toggle_fps = true,
        KeyAction::ToggleFullscreen => input.toggle_fullscreen = true,
        KeyAction::Start => input.start = true,
        KeyAction::Pause => input.pause = true,
        KeyAction::Kill => input.kill = true,
        KeyAction::QuitToMenu => input.quit_to_menu = true,
    }
}
