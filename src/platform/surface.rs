//! Drawing surface abstraction
//!
//! Everything the game draws goes through [`Surface`]: line loops for the
//! vector sprites and short text strings for the HUD. Coordinates are stage
//! pixels with the origin top-left and y pointing down.

use glam::DVec2;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    /// Stage background
    pub const BACKGROUND: Rgb = Rgb::new(10, 10, 10);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Normalized RGBA for GPU vertices
    pub fn to_rgba_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            1.0,
        ]
    }

    /// CSS `rgb()` string for the DOM overlay
    pub fn to_css(self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// A text string placed on the surface, centered on `center`
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub font_size: u32,
    pub color: Rgb,
    pub center: DVec2,
}

/// Target for a frame's drawing commands
pub trait Surface {
    /// Width and height in stage pixels
    fn size(&self) -> (u32, u32);

    /// Start a new frame filled with `color`
    fn clear(&mut self, color: Rgb);

    /// Draw connected line segments through `points`; `closed` joins the last
    /// point back to the first
    fn draw_polyline(&mut self, points: &[DVec2], color: Rgb, closed: bool);

    /// Render `text` centered on `center`
    fn draw_text(&mut self, text: &str, font_size: u32, color: Rgb, center: DVec2);

    /// Finish the frame
    fn present(&mut self);
}
