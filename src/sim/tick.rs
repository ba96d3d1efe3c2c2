//! Fixed-step frame tick
//!
//! One call advances the game by exactly one frame: discrete key actions,
//! held-key ship controls, the explosion countdown, then sprite movement.

use super::ship::sounds;
use super::state::{GameEvent, GamePhase, GameState};

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Window closed or Escape
    pub quit: bool,
    pub toggle_fps: bool,
    pub toggle_fullscreen: bool,
    /// Start a game from attract mode
    pub start: bool,
    /// Toggle pause while playing
    pub pause: bool,
    /// Destroy the ship (debug)
    pub kill: bool,
    /// Abandon the game and return to attract mode
    pub quit_to_menu: bool,
    /// Held controls
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub thrust: bool,
}

impl TickInput {
    /// Clear one-shot actions after they have been processed, keeping held keys
    pub fn clear_actions(&mut self) {
        *self = TickInput {
            rotate_left: self.rotate_left,
            rotate_right: self.rotate_right,
            thrust: self.thrust,
            ..Default::default()
        };
    }
}

/// Whether the loop should keep running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Quit,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) -> TickOutcome {
    state.seconds_count += 1;

    if input.quit {
        log::info!("Quit requested");
        state.events.push(GameEvent::StopAllSounds);
        return TickOutcome::Quit;
    }

    // Global keys
    if input.toggle_fps {
        state.showing_fps = !state.showing_fps;
    }
    if input.toggle_fullscreen {
        state.fullscreen = !state.fullscreen;
        state.events.push(GameEvent::ToggleFullscreen);
    }

    match state.phase {
        GamePhase::AttractMode => {
            if input.start {
                state.initialise_game();
            }
        }
        GamePhase::Playing => {
            if input.pause {
                state.paused = !state.paused;
                log::info!("Paused: {}", state.paused);
            }
            // Pause freezes the ship, kill included
            if input.kill && !state.paused {
                state.kill_ship();
            }
            if input.quit_to_menu {
                state.quit_to_menu();
            }
        }
        GamePhase::Exploding => {}
    }

    if state.paused {
        return TickOutcome::Continue;
    }

    match state.phase {
        GamePhase::Playing => process_ship_keys(state, input),
        GamePhase::Exploding => state.update_exploding(),
        GamePhase::AttractMode => {}
    }

    state.stage.move_sprites(state.ship.as_mut());

    TickOutcome::Continue
}

/// Translate held keys into ship rotation and thrust
fn process_ship_keys(state: &mut GameState, input: &TickInput) {
    let Some(ship) = state.ship.as_mut() else {
        return;
    };

    if input.rotate_left {
        ship.rotate_left();
    } else if input.rotate_right {
        ship.rotate_right();
    }

    if input.thrust {
        ship.increase_thrust(&mut state.events);
        ship.accelerating = true;
    } else {
        if ship.accelerating {
            state.events.push(GameEvent::StopSound(sounds::THRUST));
        }
        ship.accelerating = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::SpriteGroup;
    use glam::DVec2;

    fn playing() -> GameState {
        let mut state = GameState::new(12345);
        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        state
    }

    #[test]
    fn test_tick_attract_to_playing() {
        let mut state = GameState::new(12345);
        assert_eq!(state.phase, GamePhase::AttractMode);

        // Tick without start - should stay in attract mode
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::AttractMode);
        assert!(state.ship.is_none());

        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.ship.is_some());
    }

    #[test]
    fn test_start_ignored_while_playing() {
        let mut state = playing();
        let first = state.ship.as_ref().and_then(|s| s.part_id(crate::sim::ShipPart::Hull));
        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        let second = state.ship.as_ref().and_then(|s| s.part_id(crate::sim::ShipPart::Hull));
        assert_eq!(first, second);
    }

    #[test]
    fn test_left_wins_over_right() {
        let mut state = playing();
        let input = TickInput {
            rotate_left: true,
            rotate_right: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.ship.as_ref().map(|s| s.pose.angle), Some(SHIP_TURN_ANGLE));
    }

    #[test]
    fn test_thrust_lights_jet_and_loops_sound() {
        let mut state = playing();
        state.drain_events();
        let input = TickInput {
            thrust: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        let ship = state.ship.as_ref().expect("ship");
        assert!(ship.accelerating);
        assert!(ship.pose.heading.y < 0.0);
        // Moved up in the same frame
        assert!(ship.pose.position.y < 384.0);
        assert!(state.drain_events().contains(&GameEvent::LoopSound(sounds::THRUST)));

        tick(&mut state, &TickInput::default());
        assert!(!state.ship.as_ref().expect("ship").accelerating);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::StopSound(sounds::THRUST)]
        );
    }

    #[test]
    fn test_pause_freezes_ship() {
        let mut state = playing();
        let thrust = TickInput {
            thrust: true,
            ..Default::default()
        };
        tick(&mut state, &thrust);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        assert!(state.paused);
        let frozen = state.ship.as_ref().map(|s| s.pose);

        let seconds = state.seconds_count;
        for _ in 0..10 {
            tick(&mut state, &thrust);
        }
        assert_eq!(state.ship.as_ref().map(|s| s.pose), frozen);
        // Frame counter keeps running while paused
        assert_eq!(state.seconds_count, seconds + 10);

        tick(&mut state, &pause);
        assert!(!state.paused);
    }

    #[test]
    fn test_global_keys_work_while_paused() {
        let mut state = playing();
        state.paused = true;
        let input = TickInput {
            toggle_fps: true,
            toggle_fullscreen: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert!(state.showing_fps);
        assert!(state.fullscreen);
        assert!(state.drain_events().contains(&GameEvent::ToggleFullscreen));

        let quit = TickInput {
            quit: true,
            ..Default::default()
        };
        assert_eq!(tick(&mut state, &quit), TickOutcome::Quit);
    }

    #[test]
    fn test_kill_then_respawn_after_countdown() {
        let mut state = playing();
        let kill = TickInput {
            kill: true,
            ..Default::default()
        };
        tick(&mut state, &kill);
        assert_eq!(state.phase, GamePhase::Exploding);
        assert_eq!(state.stage.group_count(SpriteGroup::ShipDebris), 5);

        // The kill frame counts as the first exploding frame
        let mut exploding_frames = 1;
        while state.phase == GamePhase::Exploding && exploding_frames <= EXPLODING_TTL {
            tick(&mut state, &TickInput::default());
            if state.phase == GamePhase::Exploding {
                exploding_frames += 1;
            }
        }
        assert_eq!(exploding_frames, EXPLODING_TTL);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.stage.group_count(SpriteGroup::ShipDebris), 0);
        let ship = state.ship.as_ref().expect("respawned");
        assert_eq!(ship.pose.position, DVec2::new(512.0, 384.0));
        assert_eq!(ship.pose.heading, DVec2::ZERO);
    }

    #[test]
    fn test_kill_ignored_while_paused() {
        let mut state = playing();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        let kill = TickInput {
            kill: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        tick(&mut state, &kill);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.paused);
        assert!(state.ship.as_ref().is_some_and(|s| s.is_on_stage(&state.stage)));

        // Unpausing leaves a live game that can still explode and respawn
        tick(&mut state, &pause);
        assert!(!state.paused);
        tick(&mut state, &kill);
        assert_eq!(state.phase, GamePhase::Exploding);
        for _ in 0..EXPLODING_TTL {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_debris_drifts_while_exploding() {
        let mut state = playing();
        let kill = TickInput {
            kill: true,
            ..Default::default()
        };
        tick(&mut state, &kill);
        let before: Vec<_> = state.stage.sprites().map(|s| s.sprite.pose.position).collect();
        tick(&mut state, &TickInput::default());
        let after: Vec<_> = state.stage.sprites().map(|s| s.sprite.pose.position).collect();
        assert_ne!(before, after);
    }

    #[test]
    fn test_quit_to_menu() {
        let mut state = playing();
        let input = TickInput {
            quit_to_menu: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.phase, GamePhase::AttractMode);
        assert!(state.stage.is_empty());
    }

    #[test]
    fn test_clear_actions_keeps_held_keys() {
        let mut input = TickInput {
            kill: true,
            thrust: true,
            rotate_left: true,
            ..Default::default()
        };
        input.clear_actions();
        assert!(!input.kill);
        assert!(input.thrust);
        assert!(input.rotate_left);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed and inputs end up identical
        let run = || {
            let mut state = playing();
            let inputs = [
                TickInput {
                    thrust: true,
                    rotate_left: true,
                    ..Default::default()
                },
                TickInput {
                    kill: true,
                    ..Default::default()
                },
                TickInput::default(),
            ];
            for input in inputs.iter().cycle().take(30) {
                tick(&mut state, input);
            }
            state
                .stage
                .sprites()
                .map(|s| s.sprite.pose.position)
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
