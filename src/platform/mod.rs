//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Drawing (the `Surface` the stage and HUD draw into)
//! - Input events (key names to game actions)
//! - Time/ticks (FPS measurement, native frame pacing)

pub mod input;
pub mod surface;
pub mod time;

pub use input::{HeldKeys, KeyAction, apply_action, key_action};
pub use surface::{Rgb, Surface, TextItem};
pub use time::FpsCounter;
