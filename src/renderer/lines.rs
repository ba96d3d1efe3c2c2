//! CPU-side frame builder
//!
//! [`LineBatch`] implements [`Surface`] by expanding every polyline into
//! line-list vertex pairs and collecting text items. `present` publishes the
//! finished frame; the GPU pipeline uploads its vertices and the HUD overlay
//! renders its text.

use glam::DVec2;

use super::vertex::Vertex;
use crate::platform::{Rgb, Surface, TextItem};

/// One finished frame
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub clear_color: Rgb,
    /// Line list: every two vertices form one segment
    pub vertices: Vec<Vertex>,
    pub text: Vec<TextItem>,
}

/// Builds frames from drawing commands
#[derive(Debug, Clone)]
pub struct LineBatch {
    width: u32,
    height: u32,
    building: Frame,
    presented: Frame,
    polylines: usize,
    frames_presented: u64,
}

impl LineBatch {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            building: Frame::default(),
            presented: Frame::default(),
            polylines: 0,
            frames_presented: 0,
        }
    }

    /// Last presented frame
    pub fn presented(&self) -> &Frame {
        &self.presented
    }

    /// Frame currently being built
    pub fn pending(&self) -> &Frame {
        &self.building
    }

    /// Polylines submitted since the last clear
    pub fn polyline_count(&self) -> usize {
        self.polylines
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    fn push_segment(&mut self, a: DVec2, b: DVec2, color: Rgb) {
        self.building.vertices.push(Vertex::at(a, color));
        self.building.vertices.push(Vertex::at(b, color));
    }
}

impl Surface for LineBatch {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Rgb) {
        self.building.clear_color = color;
        self.building.vertices.clear();
        self.building.text.clear();
        self.polylines = 0;
    }

    fn draw_polyline(&mut self, points: &[DVec2], color: Rgb, closed: bool) {
        if points.len() < 2 {
            return;
        }
        for pair in points.windows(2) {
            self.push_segment(pair[0], pair[1], color);
        }
        if closed && points.len() > 2 {
            self.push_segment(points[points.len() - 1], points[0], color);
        }
        self.polylines += 1;
    }

    fn draw_text(&mut self, text: &str, font_size: u32, color: Rgb, center: DVec2) {
        self.building.text.push(TextItem {
            text: text.to_string(),
            font_size,
            color,
            center,
        });
    }

    fn present(&mut self) {
        self.presented = self.building.clone();
        self.frames_presented += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_loop_segments() {
        let mut batch = LineBatch::new(100, 100);
        let square = [
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(0.0, 1.0),
        ];
        batch.draw_polyline(&square, Rgb::WHITE, true);
        // Four edges, two vertices each
        assert_eq!(batch.pending().vertices.len(), 8);
        let last = &batch.pending().vertices[6..];
        assert_eq!(last[0].position, [0.0, 1.0]);
        assert_eq!(last[1].position, [0.0, 0.0]);
    }

    #[test]
    fn test_two_point_loop_is_single_segment() {
        let mut batch = LineBatch::new(100, 100);
        batch.draw_polyline(&[DVec2::ZERO, DVec2::new(5.0, 5.0)], Rgb::WHITE, true);
        assert_eq!(batch.pending().vertices.len(), 2);
    }

    #[test]
    fn test_degenerate_polyline_skipped() {
        let mut batch = LineBatch::new(100, 100);
        batch.draw_polyline(&[DVec2::ZERO], Rgb::WHITE, true);
        assert_eq!(batch.polyline_count(), 0);
        assert!(batch.pending().vertices.is_empty());
    }

    #[test]
    fn test_present_publishes_and_clear_resets() {
        let mut batch = LineBatch::new(100, 100);
        batch.clear(Rgb::BACKGROUND);
        batch.draw_polyline(&[DVec2::ZERO, DVec2::ONE], Rgb::WHITE, false);
        batch.draw_text("00", 30, Rgb::WHITE, DVec2::new(100.0, 45.0));
        batch.present();

        assert_eq!(batch.frames_presented(), 1);
        assert_eq!(batch.presented().vertices.len(), 2);
        assert_eq!(batch.presented().text[0].text, "00");
        assert_eq!(batch.presented().clear_color, Rgb::BACKGROUND);

        batch.clear(Rgb::BACKGROUND);
        assert!(batch.pending().vertices.is_empty());
        assert_eq!(batch.presented().vertices.len(), 2);
    }
}
