//! Game state and phase transitions
//!
//! Everything the frame loop mutates lives in [`GameState`]. Side effects
//! the simulation cannot perform itself (sound, fullscreen) are queued as
//! [`GameEvent`]s for the front-end to drain after each tick.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ship::{Ship, sounds};
use super::stage::{SpriteGroup, Stage};
use crate::consts::*;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GamePhase {
    /// Title screen, waiting for start
    #[default]
    AttractMode,
    /// Ship under player control
    Playing,
    /// Debris flying, ship respawns when the countdown ends
    Exploding,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::AttractMode => "attract_mode",
            GamePhase::Playing => "playing",
            GamePhase::Exploding => "exploding",
        }
    }

    /// Whether `self -> next` is an edge of the state machine
    pub fn can_transition_to(self, next: GamePhase) -> bool {
        matches!(
            (self, next),
            (GamePhase::AttractMode, GamePhase::Playing)
                | (GamePhase::Playing, GamePhase::Exploding)
                | (GamePhase::Exploding, GamePhase::Playing)
                | (GamePhase::Playing, GamePhase::AttractMode)
        )
    }
}

/// Side effects requested by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// One-shot sound
    PlaySound(&'static str),
    /// Start a looping sound (no-op if it is already looping)
    LoopSound(&'static str),
    StopSound(&'static str),
    StopAllSounds,
    ToggleFullscreen,
    PhaseChanged { from: GamePhase, to: GamePhase },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed used for debris spread
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub stage: Stage,
    /// Current ship; kept through the explosion so its debris can be traced back
    pub ship: Option<Ship>,
    pub paused: bool,
    pub showing_fps: bool,
    pub fullscreen: bool,
    pub score: u64,
    /// Counts every processed frame, paused ones included. Never displayed.
    pub seconds_count: u64,
    /// Frames since the ship exploded
    pub exploding_count: u32,
    /// Pending side effects, drained by the front-end
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh state in attract mode
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::AttractMode,
            stage: Stage::new(STAGE_TITLE, STAGE_WIDTH, STAGE_HEIGHT),
            ship: None,
            paused: false,
            showing_fps: false,
            fullscreen: false,
            score: 0,
            seconds_count: 1,
            exploding_count: 0,
            events: Vec::new(),
        }
    }

    /// Move to `next` if the edge is allowed; rejected edges leave the phase unchanged
    pub fn transition(&mut self, next: GamePhase) -> bool {
        if !self.phase.can_transition_to(next) {
            log::warn!(
                "Rejected phase transition {} -> {}",
                self.phase.as_str(),
                next.as_str()
            );
            return false;
        }
        log::info!("Phase {} -> {}", self.phase.as_str(), next.as_str());
        self.events.push(GameEvent::PhaseChanged {
            from: self.phase,
            to: next,
        });
        self.phase = next;
        true
    }

    /// Start a new game from attract mode
    pub fn initialise_game(&mut self) {
        if !self.transition(GamePhase::Playing) {
            return;
        }
        self.create_new_ship();
        self.score = 0;
        self.seconds_count = 1;
    }

    /// Clear leftover debris and put a fresh ship at stage center
    pub fn create_new_ship(&mut self) {
        self.stage.remove_group(SpriteGroup::ShipDebris);
        if let Some(old) = self.ship.take() {
            old.despawn(&mut self.stage);
        }
        self.ship = Some(Ship::spawn(&mut self.stage));
    }

    /// Destroy the ship and start the explosion countdown
    pub fn kill_ship(&mut self) {
        if !self.transition(GamePhase::Exploding) {
            return;
        }
        self.events.push(GameEvent::StopSound(sounds::THRUST));
        self.events.push(GameEvent::PlaySound(sounds::EXPLODE));
        self.exploding_count = 0;
        if let Some(ship) = &self.ship {
            ship.despawn(&mut self.stage);
            let debris = ship.explode(&mut self.stage, &mut self.rng);
            log::debug!("Ship exploded into {} pieces", debris.len());
        }
    }

    /// Leave the game and return to the title screen
    pub fn quit_to_menu(&mut self) {
        if !self.transition(GamePhase::AttractMode) {
            return;
        }
        self.events.push(GameEvent::StopAllSounds);
        if let Some(ship) = self.ship.take() {
            ship.despawn(&mut self.stage);
        }
        self.paused = false;
    }

    /// Advance the explosion countdown; respawns when it runs out
    pub fn update_exploding(&mut self) {
        self.exploding_count += 1;
        if self.exploding_count > EXPLODING_TTL && self.transition(GamePhase::Playing) {
            self.create_new_ship();
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    #[test]
    fn test_allowed_edges() {
        use GamePhase::*;
        assert!(AttractMode.can_transition_to(Playing));
        assert!(Playing.can_transition_to(Exploding));
        assert!(Exploding.can_transition_to(Playing));
        assert!(Playing.can_transition_to(AttractMode));

        assert!(!AttractMode.can_transition_to(Exploding));
        assert!(!Exploding.can_transition_to(AttractMode));
        assert!(!Playing.can_transition_to(Playing));
    }

    #[test]
    fn test_rejected_transition_keeps_phase() {
        let mut state = GameState::new(1);
        assert!(!state.transition(GamePhase::Exploding));
        assert_eq!(state.phase, GamePhase::AttractMode);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_initialise_game_spawns_ship() {
        let mut state = GameState::new(1);
        state.seconds_count = 99;
        state.initialise_game();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.seconds_count, 1);
        let ship = state.ship.as_ref().expect("ship spawned");
        assert_eq!(ship.pose.position, DVec2::new(512.0, 384.0));
        assert_eq!(state.stage.group_count(SpriteGroup::Ship), 6);
    }

    #[test]
    fn test_kill_ship_replaces_ship_with_debris() {
        let mut state = GameState::new(1);
        state.initialise_game();
        state.drain_events();
        state.kill_ship();

        assert_eq!(state.phase, GamePhase::Exploding);
        assert_eq!(state.stage.group_count(SpriteGroup::Ship), 0);
        assert_eq!(state.stage.group_count(SpriteGroup::ShipDebris), 5);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::StopSound(sounds::THRUST)));
        assert!(events.contains(&GameEvent::PlaySound(sounds::EXPLODE)));
    }

    #[test]
    fn test_kill_outside_playing_is_rejected() {
        let mut state = GameState::new(1);
        state.kill_ship();
        assert_eq!(state.phase, GamePhase::AttractMode);
        assert!(state.stage.is_empty());
    }

    #[test]
    fn test_explosion_countdown_respawns() {
        let mut state = GameState::new(1);
        state.initialise_game();
        state.kill_ship();
        for _ in 0..EXPLODING_TTL {
            state.update_exploding();
        }
        assert_eq!(state.phase, GamePhase::Exploding);
        state.update_exploding();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.stage.group_count(SpriteGroup::ShipDebris), 0);
        assert_eq!(state.stage.group_count(SpriteGroup::Ship), 6);
    }

    #[test]
    fn test_quit_to_menu_tears_down() {
        let mut state = GameState::new(1);
        state.initialise_game();
        state.quit_to_menu();
        assert_eq!(state.phase, GamePhase::AttractMode);
        assert!(state.ship.is_none());
        assert!(state.stage.is_empty());
        assert!(state.drain_events().contains(&GameEvent::StopAllSounds));
    }

    #[test]
    fn test_same_seed_same_debris() {
        let run = |seed| {
            let mut state = GameState::new(seed);
            state.initialise_game();
            state.kill_ship();
            state
                .stage
                .sprites()
                .map(|s| s.sprite.pose.heading)
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }
}
