//! Kinematic character movement against static boxes
//!
//! Behaves like a character controller: solid boxes block the move,
//! ledges no higher than the step offset are climbed, downward motion
//! lands on the highest supporting top, and every surface touched is
//! reported as a [`Contact`]. Triggers never block.

use glam::Vec3;

use super::geom::{Aabb, Layer};
use super::state::ColliderShape;
use super::world::{ColliderId, CollisionWorld};

/// Tolerance that keeps resting contact from counting as overlap
pub const SKIN: f32 = 1e-3;

/// A surface touched during a move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub collider: ColliderId,
    pub layer: Layer,
    /// Surface normal facing the agent
    pub normal: Vec3,
}

/// Result of one [`move_character`] call
#[derive(Debug, Clone, Default)]
pub struct MoveResult {
    /// Contacts in the order they were touched
    pub contacts: Vec<Contact>,
    /// Landed on (or is resting on) a surface this move
    pub collided_below: bool,
    /// Hit a ceiling
    pub collided_above: bool,
    /// Horizontal motion was cut short by a wall
    pub blocked: bool,
}

impl MoveResult {
    fn touch(&mut self, collider: ColliderId, layer: Layer, normal: Vec3) {
        self.contacts.push(Contact {
            collider,
            layer,
            normal,
        });
    }
}

/// Move `position` by `displacement`, resolving against solids in `world`
///
/// Horizontal axes are resolved first (X then Z), then vertical.
pub fn move_character(
    world: &CollisionWorld,
    position: &mut Vec3,
    shape: &ColliderShape,
    displacement: Vec3,
    step_offset: f32,
) -> MoveResult {
    let mut result = MoveResult::default();

    if displacement.x != 0.0 {
        move_horizontal(world, position, shape, Vec3::X, displacement.x, step_offset, &mut result);
    }
    if displacement.z != 0.0 {
        move_horizontal(world, position, shape, Vec3::Z, displacement.z, step_offset, &mut result);
    }
    if displacement.y < 0.0 {
        move_down(world, position, shape, displacement.y, &mut result);
    } else if displacement.y > 0.0 {
        move_up(world, position, shape, displacement.y, &mut result);
    }

    result
}

fn swept(a: &Aabb, b: &Aabb) -> Aabb {
    Aabb::new(a.min.min(b.min), a.max.max(b.max))
}

fn move_horizontal(
    world: &CollisionWorld,
    position: &mut Vec3,
    shape: &ColliderShape,
    axis: Vec3,
    delta: f32,
    step_offset: f32,
    result: &mut MoveResult,
) {
    let start = shape.bounds_at(*position);
    let feet = start.min.y;
    let path = swept(&start, &start.translated(axis * delta));

    // Nearest wall face along the motion
    let mut travel = delta;
    let mut walls: Vec<(ColliderId, Layer, f32)> = Vec::new();
    for (id, collider) in world.solids() {
        let b = &collider.bounds;
        if !path.overlaps(b, SKIN) || b.max.y <= feet + step_offset {
            continue;
        }
        let gap = if delta > 0.0 {
            (b.min - start.max).dot(axis)
        } else {
            (b.max - start.min).dot(axis)
        };
        let gap = if delta > 0.0 { gap.max(0.0) } else { gap.min(0.0) };
        walls.push((id, collider.layer, gap));
        if gap.abs() < travel.abs() {
            travel = gap;
        }
    }

    let normal = -axis * delta.signum();
    for &(id, layer, gap) in &walls {
        if (gap - travel).abs() <= SKIN {
            result.touch(id, layer, normal);
            result.blocked = true;
        }
    }

    *position += axis * travel;

    // Climb onto the highest ledge within reach along the travelled path
    let end = shape.bounds_at(*position);
    let travelled = swept(&start, &end);
    let mut climb: Option<(ColliderId, Layer, f32)> = None;
    for (id, collider) in world.solids() {
        let b = &collider.bounds;
        if !travelled.overlaps(b, SKIN) || b.max.y > feet + step_offset {
            continue;
        }
        if climb.is_none_or(|(_, _, top)| b.max.y > top) {
            climb = Some((id, collider.layer, b.max.y));
        }
    }
    if let Some((id, layer, top)) = climb {
        position.y += top - feet;
        result.touch(id, layer, Vec3::Y);
        result.collided_below = true;
    }
}

fn move_down(
    world: &CollisionWorld,
    position: &mut Vec3,
    shape: &ColliderShape,
    delta: f32,
    result: &mut MoveResult,
) {
    let start = shape.bounds_at(*position);
    let bottom = start.min.y;
    let target = bottom + delta;

    let mut support: Option<(ColliderId, Layer, f32)> = None;
    for (id, collider) in world.solids() {
        let b = &collider.bounds;
        if !start.overlaps_xz(b, SKIN) {
            continue;
        }
        let top = b.max.y;
        if top > bottom + SKIN || top < target - SKIN {
            continue;
        }
        if support.is_none_or(|(_, _, best)| top > best) {
            support = Some((id, collider.layer, top));
        }
    }

    match support {
        Some((id, layer, top)) => {
            position.y += top - bottom;
            result.touch(id, layer, Vec3::Y);
            result.collided_below = true;
        }
        None => position.y += delta,
    }
}

fn move_up(
    world: &CollisionWorld,
    position: &mut Vec3,
    shape: &ColliderShape,
    delta: f32,
    result: &mut MoveResult,
) {
    let start = shape.bounds_at(*position);
    let head = start.max.y;
    let target = head + delta;

    let mut ceiling: Option<(ColliderId, Layer, f32)> = None;
    for (id, collider) in world.solids() {
        let b = &collider.bounds;
        if !start.overlaps_xz(b, SKIN) {
            continue;
        }
        let underside = b.min.y;
        if underside < head - SKIN || underside > target + SKIN {
            continue;
        }
        if ceiling.is_none_or(|(_, _, best)| underside < best) {
            ceiling = Some((id, collider.layer, underside));
        }
    }

    match ceiling {
        Some((id, layer, underside)) => {
            position.y += (underside - head).max(0.0);
            result.touch(id, layer, Vec3::NEG_Y);
            result.collided_above = true;
        }
        None => position.y += delta,
    }
}
