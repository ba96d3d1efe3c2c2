//! Frame composition: sprites, HUD and screen text

use glam::DVec2;

use crate::platform::{Rgb, Surface};
use crate::sim::{GamePhase, GameState};

const TITLE_COLOR: Rgb = Rgb::new(180, 180, 180);
const PROMPT_COLOR: Rgb = Rgb::new(200, 200, 200);
const SCORE_COLOR: Rgb = Rgb::new(200, 200, 200);

/// Draw one complete frame and present it
pub fn draw_frame(state: &mut GameState, surface: &mut dyn Surface, fps: u32) {
    surface.clear(Rgb::BACKGROUND);
    state.stage.draw_sprites(state.ship.as_ref(), surface);

    draw_score(state, surface);
    if state.showing_fps {
        draw_fps(surface, fps);
    }
    if state.phase == GamePhase::AttractMode {
        draw_attract_text(surface);
    }
    if state.paused {
        draw_paused(surface);
    }

    surface.present();
}

/// Two-digit score, top left
pub fn format_score(score: u64) -> String {
    format!("{:02}", score)
}

fn draw_score(state: &GameState, surface: &mut dyn Surface) {
    surface.draw_text(
        &format_score(state.score),
        30,
        SCORE_COLOR,
        DVec2::new(100.0, 45.0),
    );
}

fn draw_fps(surface: &mut dyn Surface, fps: u32) {
    let (width, _) = surface.size();
    surface.draw_text(
        &format!("{} FPS", fps),
        15,
        Rgb::WHITE,
        DVec2::new(width as f64 / 2.0, 15.0),
    );
}

fn draw_attract_text(surface: &mut dyn Surface) {
    let (width, height) = surface.size();
    let (cx, cy) = (width as f64 / 2.0, height as f64 / 2.0);

    // Title sits two line-heights above center, prompt one
    surface.draw_text("Lunar Lander", 50, TITLE_COLOR, DVec2::new(cx, cy - 75.0));
    surface.draw_text("Push start to Play", 30, PROMPT_COLOR, DVec2::new(cx, cy - 15.0));
    surface.draw_text(
        "(C) 1979 Atari INC.",
        20,
        Rgb::WHITE,
        DVec2::new(cx, height as f64 - 30.0),
    );
}

fn draw_paused(surface: &mut dyn Surface) {
    let (width, height) = surface.size();
    surface.draw_text(
        "Paused",
        30,
        Rgb::WHITE,
        DVec2::new(width as f64 / 2.0, height as f64 / 2.0),
    );
}
