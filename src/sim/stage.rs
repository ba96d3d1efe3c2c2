//! The stage: every active sprite, in draw order
//!
//! Sprites are tagged with a group so whole families (the ship, its debris)
//! can be removed with one filtered query. Ship parts are anchored: they take
//! their pose from the [`Ship`] rather than carrying their own.

use glam::DVec2;

use super::ship::{Ship, ShipPart};
use super::sprite::VectorSprite;
use crate::platform::Surface;

/// Stable handle to a sprite on the stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteId(u32);

/// Family a sprite belongs to, for bulk removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteGroup {
    Ship,
    ShipDebris,
}

/// Where a sprite's pose comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Own pose, integrated each frame
    Free,
    /// Follows the ship's pose
    Ship(ShipPart),
}

/// A sprite registered on the stage
#[derive(Debug, Clone)]
pub struct StageSprite {
    pub id: SpriteId,
    pub group: SpriteGroup,
    pub anchor: Anchor,
    pub sprite: VectorSprite,
}

/// Owns the sprite collection and the screen dimensions
#[derive(Debug, Clone)]
pub struct Stage {
    pub title: String,
    pub width: u32,
    pub height: u32,
    sprites: Vec<StageSprite>,
    next_id: u32,
}

impl Stage {
    pub fn new(title: &str, width: u32, height: u32) -> Self {
        Self {
            title: title.to_string(),
            width,
            height,
            sprites: Vec::new(),
            next_id: 1,
        }
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    /// Append a sprite; it draws over everything added before it
    pub fn add_sprite(
        &mut self,
        group: SpriteGroup,
        anchor: Anchor,
        sprite: VectorSprite,
    ) -> SpriteId {
        let id = SpriteId(self.next_id);
        self.next_id += 1;
        self.sprites.push(StageSprite {
            id,
            group,
            anchor,
            sprite,
        });
        id
    }

    /// Remove a sprite; absent handles are ignored. Returns whether anything was removed.
    pub fn remove_sprite(&mut self, id: SpriteId) -> bool {
        match self.sprites.iter().position(|s| s.id == id) {
            Some(index) => {
                self.sprites.remove(index);
                true
            }
            None => {
                log::trace!("remove_sprite: {:?} not on stage", id);
                false
            }
        }
    }

    /// Remove every sprite in `group`, returning how many went
    pub fn remove_group(&mut self, group: SpriteGroup) -> usize {
        let before = self.sprites.len();
        self.sprites.retain(|s| s.group != group);
        before - self.sprites.len()
    }

    pub fn contains(&self, id: SpriteId) -> bool {
        self.sprites.iter().any(|s| s.id == id)
    }

    pub fn sprite(&self, id: SpriteId) -> Option<&StageSprite> {
        self.sprites.iter().find(|s| s.id == id)
    }

    pub fn sprites(&self) -> impl Iterator<Item = &StageSprite> {
        self.sprites.iter()
    }

    pub fn group_count(&self, group: SpriteGroup) -> usize {
        self.sprites.iter().filter(|s| s.group == group).count()
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Advance every sprite one frame, in collection order.
    ///
    /// The ship is integrated once, and only while its hull is on the stage.
    pub fn move_sprites(&mut self, ship: Option<&mut Ship>) {
        let mut ship = ship.filter(|ship| ship.is_on_stage(self));
        for entry in &mut self.sprites {
            match entry.anchor {
                Anchor::Free => entry.sprite.advance(),
                Anchor::Ship(ShipPart::Hull) => {
                    if let Some(ship) = ship.as_deref_mut() {
                        ship.advance();
                    }
                }
                Anchor::Ship(_) => {}
            }
        }
    }

    /// Draw every sprite in collection order
    pub fn draw_sprites(&mut self, ship: Option<&Ship>, surface: &mut dyn Surface) {
        for entry in &mut self.sprites {
            match (entry.anchor, ship) {
                (Anchor::Free, _) => {
                    entry.sprite.draw(surface);
                }
                (Anchor::Ship(part), Some(ship)) => {
                    let color = part.color(ship.accelerating);
                    if part == ShipPart::Hull {
                        entry.sprite.visible = ship.visible;
                    }
                    entry.sprite.draw_with(&ship.pose, color, surface);
                }
                // Orphaned part: keep its last transform, draw nothing
                (Anchor::Ship(_), None) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::renderer::LineBatch;
    use crate::sim::sprite::Pose;

    fn stage() -> Stage {
        Stage::new(STAGE_TITLE, STAGE_WIDTH, STAGE_HEIGHT)
    }

    fn dot(x: f64, y: f64, heading: DVec2) -> VectorSprite {
        VectorSprite::from_points(
            Pose::new(DVec2::new(x, y), heading, 0.0),
            &[(0.0, 0.0), (1.0, 0.0)],
        )
    }

    #[test]
    fn test_remove_absent_sprite_is_noop() {
        let mut stage = stage();
        let id = stage.add_sprite(
            SpriteGroup::ShipDebris,
            Anchor::Free,
            dot(0.0, 0.0, DVec2::ZERO),
        );
        assert!(stage.remove_sprite(id));
        assert!(!stage.remove_sprite(id));

        let keep = stage.add_sprite(
            SpriteGroup::ShipDebris,
            Anchor::Free,
            dot(1.0, 1.0, DVec2::ZERO),
        );
        assert!(!stage.remove_sprite(id));
        assert_eq!(stage.len(), 1);
        assert!(stage.contains(keep));
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut stage = stage();
        let a = stage.add_sprite(SpriteGroup::ShipDebris, Anchor::Free, dot(0.0, 0.0, DVec2::ZERO));
        stage.remove_sprite(a);
        let b = stage.add_sprite(SpriteGroup::ShipDebris, Anchor::Free, dot(0.0, 0.0, DVec2::ZERO));
        assert_ne!(a, b);
    }

    #[test]
    fn test_move_sprites_integrates_free_sprites() {
        let mut stage = stage();
        let id = stage.add_sprite(
            SpriteGroup::ShipDebris,
            Anchor::Free,
            dot(10.0, 10.0, DVec2::new(2.0, -1.0)),
        );
        stage.move_sprites(None);
        stage.move_sprites(None);
        let moved = stage.sprite(id).expect("still on stage");
        assert_eq!(moved.sprite.pose.position, DVec2::new(14.0, 8.0));
    }

    #[test]
    fn test_ship_moves_once_per_frame() {
        let mut stage = stage();
        let mut ship = Ship::spawn(&mut stage);
        ship.pose.heading = DVec2::new(1.0, 0.0);
        stage.move_sprites(Some(&mut ship));
        assert_eq!(ship.pose.position.x, 513.0);
        // Damped after the step
        assert!((ship.pose.heading.x - (1.0 + SHIP_DECELERATION)).abs() < 1e-12);
    }

    #[test]
    fn test_ship_off_stage_does_not_move() {
        let mut stage = stage();
        let mut ship = Ship::spawn(&mut stage);
        ship.pose.heading = DVec2::new(1.0, 0.0);
        ship.despawn(&mut stage);
        stage.move_sprites(Some(&mut ship));
        assert_eq!(ship.pose.position.x, 512.0);
    }

    #[test]
    fn test_parts_follow_ship_pose() {
        let mut stage = stage();
        let mut ship = Ship::spawn(&mut stage);
        ship.accelerating = true;
        let mut batch = LineBatch::new(STAGE_WIDTH, STAGE_HEIGHT);
        stage.draw_sprites(Some(&ship), &mut batch);
        assert_eq!(batch.polyline_count(), 6);

        // Every part follows the ship's pose
        ship.rotate_left();
        stage.draw_sprites(Some(&ship), &mut batch);
        for entry in stage.sprites() {
            let expected = ship.pose.transform_point(entry.sprite.polygon()[0]);
            assert!((entry.sprite.transformed()[0] - expected).length() < 1e-9);
        }
    }

    #[test]
    fn test_hidden_hull_skips_submission() {
        let mut stage = stage();
        let mut ship = Ship::spawn(&mut stage);
        ship.visible = false;
        let mut batch = LineBatch::new(STAGE_WIDTH, STAGE_HEIGHT);
        stage.draw_sprites(Some(&ship), &mut batch);
        assert_eq!(batch.polyline_count(), 5);
    }

    #[test]
    fn test_remove_group() {
        let mut stage = stage();
        let ship = Ship::spawn(&mut stage);
        stage.add_sprite(SpriteGroup::ShipDebris, Anchor::Free, dot(0.0, 0.0, DVec2::ZERO));
        stage.add_sprite(SpriteGroup::ShipDebris, Anchor::Free, dot(0.0, 0.0, DVec2::ZERO));
        assert_eq!(stage.remove_group(SpriteGroup::ShipDebris), 2);
        assert_eq!(stage.len(), 6);
        assert!(ship.is_on_stage(&stage));
        assert_eq!(stage.remove_group(SpriteGroup::ShipDebris), 0);
    }
}
