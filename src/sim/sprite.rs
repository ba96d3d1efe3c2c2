//! Vector sprites
//!
//! A sprite is a polygon in local space plus a pose. Drawing rotates every
//! local point by the pose angle, translates it by the pose position and
//! submits the result as a closed line loop.

use glam::DVec2;

use crate::platform::{Rgb, Surface};
use crate::rotate_degrees;

/// Position, velocity and orientation of a sprite
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    pub position: DVec2,
    /// Velocity in units per frame
    pub heading: DVec2,
    /// Degrees
    pub angle: f64,
}

impl Pose {
    pub fn new(position: DVec2, heading: DVec2, angle: f64) -> Self {
        Self {
            position,
            heading,
            angle,
        }
    }

    /// Euler step: one frame of travel along the heading
    #[inline]
    pub fn integrate(&mut self) {
        self.position += self.heading;
    }

    /// Current speed (`hypot(heading.x, heading.y)`)
    #[inline]
    pub fn speed(&self) -> f64 {
        self.heading.x.hypot(self.heading.y)
    }

    /// Local point to world space
    #[inline]
    pub fn transform_point(&self, local: DVec2) -> DVec2 {
        rotate_degrees(local, self.angle) + self.position
    }
}

/// Axis-aligned bounding rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect {
    /// Smallest rect containing every point; a zero rect at the origin when empty
    pub fn from_points(points: &[DVec2]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };
        points.iter().skip(1).fold(
            Self {
                min: *first,
                max: *first,
            },
            |rect, p| Self {
                min: rect.min.min(*p),
                max: rect.max.max(*p),
            },
        )
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// One drawable, movable outline
#[derive(Debug, Clone)]
pub struct VectorSprite {
    pub pose: Pose,
    pub color: Rgb,
    /// Invisible sprites still transform but submit nothing
    pub visible: bool,
    polygon: Vec<DVec2>,
    transformed: Vec<DVec2>,
    bounding_rect: Rect,
}

impl VectorSprite {
    pub fn new(pose: Pose, polygon: Vec<DVec2>) -> Self {
        let mut sprite = Self {
            pose,
            color: Rgb::WHITE,
            visible: true,
            transformed: Vec::with_capacity(polygon.len()),
            polygon,
            bounding_rect: Rect::default(),
        };
        sprite.transform();
        sprite
    }

    /// Build from a slice of `(x, y)` offsets
    pub fn from_points(pose: Pose, points: &[(f64, f64)]) -> Self {
        Self::new(pose, points.iter().map(|&(x, y)| DVec2::new(x, y)).collect())
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    /// Local-space outline
    pub fn polygon(&self) -> &[DVec2] {
        &self.polygon
    }

    /// World-space outline as of the last transform
    pub fn transformed(&self) -> &[DVec2] {
        &self.transformed
    }

    pub fn bounding_rect(&self) -> Rect {
        self.bounding_rect
    }

    /// Advance one frame along the heading
    pub fn advance(&mut self) {
        self.pose.integrate();
    }

    /// Recompute the world-space outline from the sprite's own pose
    pub fn transform(&mut self) -> &[DVec2] {
        let pose = self.pose;
        self.transform_with(&pose)
    }

    /// Recompute the world-space outline from an external pose
    pub fn transform_with(&mut self, pose: &Pose) -> &[DVec2] {
        self.transformed.clear();
        self.transformed
            .extend(self.polygon.iter().map(|p| pose.transform_point(*p)));
        self.bounding_rect = Rect::from_points(&self.transformed);
        &self.transformed
    }

    /// Transform and submit using the sprite's own pose and color
    pub fn draw(&mut self, surface: &mut dyn Surface) -> &[DVec2] {
        let pose = self.pose;
        let color = self.color;
        self.draw_with(&pose, color, surface)
    }

    /// Transform with `pose` and submit in `color`, unless invisible
    pub fn draw_with(&mut self, pose: &Pose, color: Rgb, surface: &mut dyn Surface) -> &[DVec2] {
        self.transform_with(pose);
        if self.visible && !self.transformed.is_empty() {
            surface.draw_polyline(&self.transformed, color, true);
        }
        &self.transformed
    }
}
