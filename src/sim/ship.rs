//! The lander ship
//!
//! The ship owns the only copy of its kinematic state. Its six outlines live
//! on the stage as anchored sprites that read the ship's pose whenever they
//! are moved or drawn, so the parts can never drift apart.

use glam::DVec2;
use rand::Rng;

use super::sprite::{Pose, VectorSprite};
use super::stage::{Anchor, SpriteGroup, SpriteId, Stage};
use super::state::GameEvent;
use crate::consts::*;
use crate::platform::Rgb;

/// Sound cue names
pub mod sounds {
    pub const EXPLODE: &str = "explode";
    pub const THRUST: &str = "thrust";
    pub const LOW_FUEL: &str = "lowfuel";
}

/// The separately drawn outlines that make up the ship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShipPart {
    ThrustJet,
    FuelBox,
    Rocket,
    LeftLeg,
    RightLeg,
    Hull,
}

impl ShipPart {
    /// Stage registration order (later parts paint over earlier ones)
    pub const ALL: [ShipPart; 6] = [
        ShipPart::ThrustJet,
        ShipPart::FuelBox,
        ShipPart::Rocket,
        ShipPart::LeftLeg,
        ShipPart::RightLeg,
        ShipPart::Hull,
    ];

    /// Local-space outline
    pub fn outline(&self) -> &'static [(f64, f64)] {
        match self {
            ShipPart::Hull => &[
                (6.0, -15.0),
                (15.0, -4.5),
                (15.0, 4.5),
                (6.0, 15.0),
                (-6.0, 15.0),
                (-15.0, 4.5),
                (-15.0, -4.5),
                (-6.0, -15.0),
            ],
            ShipPart::Rocket => &[(9.0, 18.0), (15.0, 30.0), (-15.0, 30.0), (-9.0, 18.0)],
            ShipPart::RightLeg => &[
                (19.5, 33.0),
                (30.0, 33.0),
                (24.0, 33.0),
                (15.0, 18.0),
                (24.0, 33.0),
            ],
            ShipPart::LeftLeg => &[
                (-19.5, 33.0),
                (-30.0, 33.0),
                (-24.0, 33.0),
                (-15.0, 18.0),
                (-24.0, 33.0),
            ],
            ShipPart::FuelBox => &[(15.0, 15.0), (15.0, 18.0), (-15.0, 18.0), (-15.0, 15.0)],
            ShipPart::ThrustJet => &[(15.0, 30.0), (0.0, 132.0), (-15.0, 30.0)],
        }
    }

    /// Draw color; the jet blends into the background unless firing
    pub fn color(&self, accelerating: bool) -> Rgb {
        match self {
            ShipPart::ThrustJet if !accelerating => Rgb::BACKGROUND,
            _ => Rgb::WHITE,
        }
    }
}

/// Segments the ship breaks into when it explodes
pub const DEBRIS_SEGMENTS: [[(f64, f64); 2]; 5] = [
    [(0.0, -10.0), (6.0, 10.0)],
    [(6.0, 10.0), (3.0, 7.0)],
    [(3.0, 7.0), (-3.0, 7.0)],
    [(-3.0, 7.0), (-6.0, 10.0)],
    [(-6.0, 10.0), (0.0, -10.0)],
];

/// Player ship: kinematic owner plus handles to its stage sprites
#[derive(Debug, Clone)]
pub struct Ship {
    pub pose: Pose,
    /// Thrust held this frame (lights the jet)
    pub accelerating: bool,
    /// Hull visibility; parts are unaffected
    pub visible: bool,
    parts: Vec<(ShipPart, SpriteId)>,
}

impl Ship {
    /// Create a ship at stage center and register its parts
    pub fn spawn(stage: &mut Stage) -> Self {
        let pose = Pose::new(stage.center(), DVec2::ZERO, 0.0);
        let parts = ShipPart::ALL
            .iter()
            .map(|&part| {
                let sprite = VectorSprite::from_points(pose, part.outline());
                (part, stage.add_sprite(SpriteGroup::Ship, Anchor::Ship(part), sprite))
            })
            .collect();
        log::debug!("Ship spawned at {:?}", pose.position);
        Self {
            pose,
            accelerating: false,
            visible: true,
            parts,
        }
    }

    /// Stage handle for a part
    pub fn part_id(&self, part: ShipPart) -> Option<SpriteId> {
        self.parts.iter().find(|(p, _)| *p == part).map(|(_, id)| *id)
    }

    pub fn part_ids(&self) -> impl Iterator<Item = SpriteId> + '_ {
        self.parts.iter().map(|(_, id)| *id)
    }

    /// Whether the hull is currently on the stage
    pub fn is_on_stage(&self, stage: &Stage) -> bool {
        self.part_id(ShipPart::Hull)
            .is_some_and(|id| stage.contains(id))
    }

    pub fn rotate_left(&mut self) {
        self.pose.angle += SHIP_TURN_ANGLE;
    }

    pub fn rotate_right(&mut self) {
        self.pose.angle -= SHIP_TURN_ANGLE;
    }

    /// Accelerate along the nose; saturates above the max velocity
    pub fn increase_thrust(&mut self, events: &mut Vec<GameEvent>) {
        events.push(GameEvent::LoopSound(sounds::THRUST));
        if self.pose.speed() > SHIP_MAX_VELOCITY {
            return;
        }
        let (sin, cos) = self.pose.angle.to_radians().sin_cos();
        let dx = -SHIP_ACCELERATION * sin;
        let dy = -SHIP_ACCELERATION * cos;
        self.change_velocity(dx, dy);
    }

    /// Passive velocity-proportional damping
    pub fn decrease_thrust(&mut self) {
        if self.pose.heading == DVec2::ZERO {
            return;
        }
        let dx = self.pose.heading.x * SHIP_DECELERATION;
        let dy = self.pose.heading.y * SHIP_DECELERATION;
        self.change_velocity(dx, dy);
    }

    fn change_velocity(&mut self, dx: f64, dy: f64) {
        self.pose.heading += DVec2::new(dx, dy);
    }

    /// Integrate position, then apply damping
    pub fn advance(&mut self) {
        self.pose.integrate();
        self.decrease_thrust();
    }

    /// Remove every part from the stage (tolerates parts already gone)
    pub fn despawn(&self, stage: &mut Stage) {
        for id in self.part_ids() {
            stage.remove_sprite(id);
        }
    }

    /// Break the ship into debris flying away from its center
    pub fn explode<R: Rng>(&self, stage: &mut Stage, rng: &mut R) -> Vec<SpriteId> {
        DEBRIS_SEGMENTS
            .iter()
            .map(|segment| self.add_debris(stage, rng, segment))
            .collect()
    }

    fn add_debris<R: Rng>(
        &self,
        stage: &mut Stage,
        rng: &mut R,
        segment: &[(f64, f64)],
    ) -> SpriteId {
        let pose = Pose::new(self.pose.position, DVec2::ZERO, self.pose.angle);
        let mut debris = VectorSprite::from_points(pose, segment);

        let offset = debris.bounding_rect().center() - self.pose.position;
        debris.pose.heading = DVec2::new(
            (offset.x + 0.1) / rng.random_range(DEBRIS_SPREAD_MIN..DEBRIS_SPREAD_MAX),
            (offset.y + 0.1) / rng.random_range(DEBRIS_SPREAD_MIN..DEBRIS_SPREAD_MAX),
        );
        stage.add_sprite(SpriteGroup::ShipDebris, Anchor::Free, debris)
    }
}
