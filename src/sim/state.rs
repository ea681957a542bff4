//! Agent state and core simulation types
//!
//! Everything that changes during a run lives on [`Agent`]. The run
//! controller is its only mutator.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::geom::{Aabb, Heading};
use crate::settings::RunConfig;

/// Upright capsule approximated by a box for collision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColliderShape {
    pub height: f32,
    pub radius: f32,
    /// Offset of the collider centre from the agent position
    pub center: Vec3,
}

impl ColliderShape {
    /// World-space bounds at `position`
    pub fn bounds_at(&self, position: Vec3) -> Aabb {
        Aabb::from_center_half_extents(
            position + self.center,
            Vec3::new(self.radius, self.height * 0.5, self.radius),
        )
    }

    /// World-space height of the collider bottom
    #[inline]
    pub fn bottom_at(&self, position: Vec3) -> f32 {
        position.y + self.center.y - self.height * 0.5
    }

    /// Half-height collider resting on the same bottom
    pub fn slid(&self) -> Self {
        let height = self.height / 2.0;
        let mut center = self.center;
        center.y -= height / 2.0;
        Self {
            height,
            radius: self.radius,
            center,
        }
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationCause {
    /// Long ground probe found nothing below
    FellOffCourse,
    /// Touched a collider on the obstacle mask
    ObstacleHit,
    /// Turn attempted with no junction under the agent
    NoJunction,
    /// Turn attempted in a direction the junction does not allow
    TurnNotPermitted,
}

/// Final numbers of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u32,
    pub cause: TerminationCause,
    pub elapsed_secs: f32,
    pub distance: f32,
    pub ticks: u64,
}

/// The player entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub position: Vec3,
    pub heading: Heading,
    /// Signed vertical velocity (units/s)
    pub vertical_velocity: f32,
    /// Forward speed, within `[initial_speed, max_speed]`
    pub speed: f32,
    /// Always `initial_gravity - speed`
    pub gravity: f32,
    /// Collider as currently shaped (nominal or slid)
    pub collider: ColliderShape,
    /// Collider captured when the current slide began
    pub nominal_collider: ColliderShape,
    /// Animation playback multiplier; drives slide duration
    pub animation_speed: f32,
    /// Accumulated, untruncated score
    pub score: f32,
    pub sliding: bool,
    /// Seconds until the collider is restored (0 when not sliding)
    pub slide_remaining: f32,
    pub alive: bool,
    /// Horizontal distance covered
    pub distance: f32,
    /// Seconds simulated while alive
    pub elapsed: f32,
    pub ticks: u64,
}

impl Agent {
    /// Fresh agent at `position` facing `heading`
    pub fn new(config: &RunConfig, position: Vec3, heading: Heading) -> Self {
        let collider = ColliderShape {
            height: config.collider_height,
            radius: config.collider_radius,
            center: config.collider_center,
        };
        Self {
            position,
            heading,
            vertical_velocity: 0.0,
            speed: config.initial_speed,
            gravity: config.initial_gravity - config.initial_speed,
            collider,
            nominal_collider: collider,
            animation_speed: config.initial_animation_speed,
            score: 0.0,
            sliding: false,
            slide_remaining: 0.0,
            alive: true,
            distance: 0.0,
            elapsed: 0.0,
            ticks: 0,
        }
    }

    /// Unit forward movement direction
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.heading.forward()
    }

    /// Current collider bounds
    pub fn bounds(&self) -> Aabb {
        self.collider.bounds_at(self.position)
    }

    /// Score as reported to listeners
    pub fn int_score(&self) -> u32 {
        crate::truncate_score(self.score)
    }
}
