//! Static collision world
//!
//! A flat list of boxes, each on one layer. Turn markers additionally
//! carry the [`TileId`] of the tile they belong to, which replaces a
//! component lookup on the hit object.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::geom::{Aabb, Layer, LayerMask};
use super::tile::TileId;

/// Index of a collider in its [`CollisionWorld`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColliderId(pub u32);

/// A static collider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collider {
    pub bounds: Aabb,
    pub layer: Layer,
    /// Triggers are found by queries but never block movement
    pub trigger: bool,
    /// Owning tile, for turn markers
    pub tile: Option<TileId>,
}

/// Result of a downward raycast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub collider: ColliderId,
    pub point: Vec3,
    pub distance: f32,
}

/// Static geometry the agent moves through
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollisionWorld {
    colliders: Vec<Collider>,
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a solid box
    pub fn add_solid(&mut self, bounds: Aabb, layer: Layer) -> ColliderId {
        self.push(Collider {
            bounds,
            layer,
            trigger: false,
            tile: None,
        })
    }

    /// Add a turn-marker trigger owned by `tile`
    pub fn add_marker(&mut self, bounds: Aabb, layer: Layer, tile: TileId) -> ColliderId {
        self.push(Collider {
            bounds,
            layer,
            trigger: true,
            tile: Some(tile),
        })
    }

    fn push(&mut self, collider: Collider) -> ColliderId {
        let id = ColliderId(self.colliders.len() as u32);
        self.colliders.push(collider);
        id
    }

    pub fn get(&self, id: ColliderId) -> Option<&Collider> {
        self.colliders.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Solid colliders in id order
    pub fn solids(&self) -> impl Iterator<Item = (ColliderId, &Collider)> {
        self.colliders
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.trigger)
            .map(|(i, c)| (ColliderId(i as u32), c))
    }

    /// Cast a ray straight down from `origin`
    ///
    /// Returns the nearest box top on a layer in `mask` within `max_distance`.
    /// An origin already inside a box hits it at distance zero.
    pub fn raycast_down(&self, origin: Vec3, max_distance: f32, mask: LayerMask) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;
        for (i, collider) in self.colliders.iter().enumerate() {
            if !mask.contains(collider.layer) || !collider.bounds.contains_xz(origin) {
                continue;
            }
            let b = &collider.bounds;
            let distance = if origin.y >= b.max.y {
                origin.y - b.max.y
            } else if origin.y >= b.min.y {
                0.0
            } else {
                continue;
            };
            if distance > max_distance {
                continue;
            }
            if best.is_none_or(|hit| distance < hit.distance) {
                best = Some(RayHit {
                    collider: ColliderId(i as u32),
                    point: Vec3::new(origin.x, origin.y - distance, origin.z),
                    distance,
                });
            }
        }
        best
    }

    /// All colliders on `mask` touching a sphere, in id order
    pub fn overlap_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> Vec<ColliderId> {
        let r2 = radius * radius;
        self.colliders
            .iter()
            .enumerate()
            .filter(|(_, c)| mask.contains(c.layer) && c.bounds.distance_squared(center) <= r2)
            .map(|(i, _)| ColliderId(i as u32))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slab() -> Aabb {
        Aabb::new(Vec3::new(-2.0, -1.0, -2.0), Vec3::new(2.0, 0.0, 50.0))
    }

    #[test]
    fn test_raycast_hits_top_within_length() {
        let mut world = CollisionWorld::new();
        let id = world.add_solid(slab(), Layer(6));
        let mask = LayerMask::from_layers(&[6]);

        let hit = world.raycast_down(Vec3::new(0.0, 0.1, 0.0), 0.2, mask);
        assert_eq!(hit.map(|h| h.collider), Some(id));
        assert!((hit.map(|h| h.distance).unwrap_or(1.0) - 0.1).abs() < 1e-6);

        assert!(world.raycast_down(Vec3::new(0.0, 0.5, 0.0), 0.2, mask).is_none());
        assert!(world.raycast_down(Vec3::new(0.0, 0.5, 0.0), 20.0, mask).is_some());
    }

    #[test]
    fn test_raycast_respects_mask_and_footprint() {
        let mut world = CollisionWorld::new();
        world.add_solid(slab(), Layer(6));

        let other = LayerMask::from_layers(&[8]);
        assert!(world.raycast_down(Vec3::new(0.0, 0.1, 0.0), 1.0, other).is_none());

        let ground = LayerMask::from_layers(&[6]);
        assert!(world.raycast_down(Vec3::new(3.0, 0.1, 0.0), 1.0, ground).is_none());
    }

    #[test]
    fn test_raycast_picks_nearest() {
        let mut world = CollisionWorld::new();
        world.add_solid(slab(), Layer(6));
        let step = world.add_solid(
            Aabb::new(Vec3::new(-2.0, 0.0, 0.0), Vec3::new(2.0, 0.5, 2.0)),
            Layer(6),
        );
        let hit = world.raycast_down(Vec3::new(0.0, 1.0, 1.0), 5.0, LayerMask::from_layers(&[6]));
        assert_eq!(hit.map(|h| h.collider), Some(step));
    }

    #[test]
    fn test_overlap_sphere_finds_marker() {
        let mut world = CollisionWorld::new();
        world.add_solid(slab(), Layer(6));
        let marker = world.add_marker(
            Aabb::new(Vec3::new(-1.0, 0.0, 9.0), Vec3::new(1.0, 2.0, 11.0)),
            Layer(7),
            TileId(3),
        );
        let turn = LayerMask::from_layers(&[7]);

        let found = world.overlap_sphere(Vec3::new(0.0, 1.0, 10.0), 0.1, turn);
        assert_eq!(found, vec![marker]);
        assert_eq!(world.get(marker).and_then(|c| c.tile), Some(TileId(3)));

        assert!(world.overlap_sphere(Vec3::new(0.0, 1.0, 8.85), 0.1, turn).is_empty());
        assert_eq!(world.overlap_sphere(Vec3::new(0.0, 1.0, 8.95), 0.1, turn).len(), 1);
    }
}
