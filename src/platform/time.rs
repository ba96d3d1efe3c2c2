//! Frame timing
//!
//! The browser paces frames with `requestAnimationFrame`; natively the
//! [`FrameClock`] sleeps to hold the target rate. Both feed an
//! [`FpsCounter`] for the on-screen readout.

use crate::consts::FPS_SAMPLE_FRAMES;

/// Frames-per-second readout, refreshed every `FPS_SAMPLE_FRAMES` frames
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    frames: u32,
    elapsed_ms: f64,
    fps: u32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame that took `frame_ms` milliseconds
    pub fn record(&mut self, frame_ms: f64) {
        self.elapsed_ms += frame_ms;
        self.frames += 1;
        if self.frames % FPS_SAMPLE_FRAMES == 0 {
            if self.elapsed_ms > 0.0 {
                self.fps = (self.frames as f64 / (self.elapsed_ms / 1000.0)).round() as u32;
            }
            self.frames = 0;
            self.elapsed_ms = 0.0;
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

/// Sleeps to pace a native loop at a fixed rate
#[cfg(not(target_arch = "wasm32"))]
pub struct FrameClock {
    frame: std::time::Duration,
    last: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl FrameClock {
    pub fn new(target_fps: u32) -> Self {
        Self {
            frame: std::time::Duration::from_secs_f64(1.0 / target_fps.max(1) as f64),
            last: std::time::Instant::now(),
        }
    }

    /// Block until the next frame is due; returns milliseconds since the last tick
    pub fn tick(&mut self) -> f64 {
        let since = self.last.elapsed();
        if since < self.frame {
            std::thread::sleep(self.frame - since);
        }
        let now = std::time::Instant::now();
        let ms = now.duration_since(self.last).as_secs_f64() * 1000.0;
        self.last = now;
        ms
    }
}
