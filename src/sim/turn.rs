//! Turn resolution at track junctions

use glam::Vec3;

use super::geom::{Heading, LayerMask};
use super::tile::{TileId, TileType, Track};
use super::world::CollisionWorld;

/// Where and how to turn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTarget {
    pub tile: TileId,
    /// Pivot of the junction tile
    pub pivot: Vec3,
    pub heading: Heading,
}

/// Why a turn attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRejection {
    /// No turn marker near the agent
    NoJunction,
    /// A marker was found but its tile does not allow this direction
    NotPermitted { tile: TileId, kind: TileType },
}

/// Looks up junction tiles through the turn-marker layer
#[derive(Debug, Clone, Copy)]
pub struct TurnResolver<'a> {
    world: &'a CollisionWorld,
    track: &'a Track,
    mask: LayerMask,
    radius: f32,
}

impl<'a> TurnResolver<'a> {
    pub fn new(world: &'a CollisionWorld, track: &'a Track, mask: LayerMask, radius: f32) -> Self {
        Self {
            world,
            track,
            mask,
            radius,
        }
    }

    /// Junction tile under `position`, if any
    ///
    /// The first marker in collider order wins when several overlap.
    pub fn junction_at(&self, position: Vec3) -> Option<TileId> {
        self.world
            .overlap_sphere(position, self.radius, self.mask)
            .into_iter()
            .filter_map(|id| self.world.get(id).and_then(|c| c.tile))
            .find(|&tile| self.track.get(tile).is_some())
    }

    /// Resolve a turn of `turn_value` (-1 left, +1 right)
    pub fn try_turn(
        &self,
        position: Vec3,
        heading: Heading,
        turn_value: i32,
    ) -> Result<SnapTarget, TurnRejection> {
        let tile_id = self
            .junction_at(position)
            .ok_or(TurnRejection::NoJunction)?;
        let tile = self.track.get(tile_id).ok_or(TurnRejection::NoJunction)?;

        if !tile.kind.permits(turn_value) {
            return Err(TurnRejection::NotPermitted {
                tile: tile_id,
                kind: tile.kind,
            });
        }

        Ok(SnapTarget {
            tile: tile_id,
            pivot: tile.pivot,
            heading: heading.rotated(turn_value),
        })
    }
}

/// Position after snapping to `pivot`, keeping the current height
#[inline]
pub fn snap_position(current: Vec3, pivot: Vec3) -> Vec3 {
    Vec3::new(pivot.x, current.y, pivot.z)
}
