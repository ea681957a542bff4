//! Ground and obstacle probes
//!
//! Grounding uses two downward rays, one just behind and one just ahead
//! of the agent, so standing across a ledge still counts as grounded.
//! The same probe with a long length doubles as the "still above the
//! course" check.

use glam::Vec3;

use super::geom::{Layer, LayerMask};
use super::state::Agent;
use super::world::CollisionWorld;
use crate::settings::RunConfig;

/// Probe geometry, split out of [`RunConfig`]
#[derive(Debug, Clone, Copy)]
pub struct GroundProbe {
    pub forward_offset: f32,
    pub epsilon: f32,
    pub mask: LayerMask,
}

impl GroundProbe {
    pub fn from_config(config: &RunConfig) -> Self {
        Self {
            forward_offset: config.probe_forward_offset,
            epsilon: config.probe_epsilon,
            mask: config.ground_mask,
        }
    }

    /// Ray origins behind and ahead of the agent, just above its bottom
    pub fn origins(&self, agent: &Agent) -> [Vec3; 2] {
        let mut base = agent.position;
        base.y = agent.collider.bottom_at(agent.position) + self.epsilon;
        let offset = agent.forward() * self.forward_offset;
        [base - offset, base + offset]
    }

    /// True if either ray hits the ground mask within `length`
    pub fn is_grounded(&self, world: &CollisionWorld, agent: &Agent, length: f32) -> bool {
        self.origins(agent)
            .iter()
            .any(|&origin| world.raycast_down(origin, length, self.mask).is_some())
    }
}

/// True iff a contact on `layer` counts as hitting an obstacle
#[inline]
pub fn detect_obstacle_collision(layer: Layer, obstacle_mask: LayerMask) -> bool {
    obstacle_mask.contains(layer)
}
