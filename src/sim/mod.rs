//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per frame
//! - Seeded RNG only
//! - Stable iteration order (stage insertion order)
//! - No GPU or browser dependencies; drawing goes through `platform::Surface`

pub mod ship;
pub mod sprite;
pub mod stage;
pub mod state;
pub mod tick;

pub use ship::{DEBRIS_SEGMENTS, Ship, ShipPart, sounds};
pub use sprite::{Pose, Rect, VectorSprite};
pub use stage::{Anchor, SpriteGroup, SpriteId, Stage, StageSprite};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, TickOutcome, tick};
