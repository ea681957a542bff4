//! Geometry primitives shared by the simulation
//!
//! Layers and masks mirror a 32-layer physics setup: a collider sits on
//! exactly one layer, a query filters by a bitmask of layers.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Physics layer index (0..32)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Layer(pub u8);

impl Layer {
    /// Single-bit mask for this layer
    #[inline]
    pub fn bit(self) -> u32 {
        1u32.checked_shl(self.0 as u32).unwrap_or(0)
    }
}

/// Bitmask over layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u32::MAX);

    /// Mask containing the given layers
    pub fn from_layers(layers: &[u8]) -> Self {
        Self(layers.iter().fold(0, |acc, &l| acc | Layer(l).bit()))
    }

    /// Bitmask intersection test (not equality)
    #[inline]
    pub fn contains(self, layer: Layer) -> bool {
        self.0 & layer.bit() != 0
    }

    #[inline]
    pub fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for LayerMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Axis-aligned box used for all static geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        Self::new(center - half, center + half)
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Footprint test on the XZ plane (edges inclusive)
    #[inline]
    pub fn contains_xz(&self, p: Vec3) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.z >= self.min.z && p.z <= self.max.z
    }

    /// Strict overlap, shrunk by `skin` so resting contact is not overlap
    pub fn overlaps(&self, other: &Aabb, skin: f32) -> bool {
        self.min.x < other.max.x - skin
            && self.max.x > other.min.x + skin
            && self.min.y < other.max.y - skin
            && self.max.y > other.min.y + skin
            && self.min.z < other.max.z - skin
            && self.max.z > other.min.z + skin
    }

    /// Overlap on the XZ plane only
    pub fn overlaps_xz(&self, other: &Aabb, skin: f32) -> bool {
        self.min.x < other.max.x - skin
            && self.max.x > other.min.x + skin
            && self.min.z < other.max.z - skin
            && self.max.z > other.min.z + skin
    }

    /// Squared distance from a point to the box (0 inside)
    pub fn distance_squared(&self, p: Vec3) -> f32 {
        let closest = p.clamp(self.min, self.max);
        (p - closest).length_squared()
    }

    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}

/// Cardinal heading, a whole number of 90° yaw steps from +Z
///
/// Stored as a quarter-turn count so repeated turns never accumulate
/// floating-point drift in the forward vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Heading(u8);

impl TryFrom<u8> for Heading {
    type Error = String;

    fn try_from(quarter_turns: u8) -> Result<Self, Self::Error> {
        if quarter_turns < 4 {
            Ok(Self(quarter_turns))
        } else {
            Err(format!("heading must be 0..=3 quarter turns, got {quarter_turns}"))
        }
    }
}

impl From<Heading> for u8 {
    fn from(heading: Heading) -> Self {
        heading.0
    }
}

impl Heading {
    /// Facing +Z
    pub const NORTH: Self = Self(0);
    /// Facing +X
    pub const EAST: Self = Self(1);
    /// Facing -Z
    pub const SOUTH: Self = Self(2);
    /// Facing -X
    pub const WEST: Self = Self(3);

    pub fn quarter_turns(self) -> u8 {
        self.0
    }

    /// Rotate by `90° * turn` around the vertical axis (+1 = right)
    pub fn rotated(self, turn: i32) -> Self {
        Self((self.0 as i32 + turn).rem_euclid(4) as u8)
    }

    /// Unit forward vector
    pub fn forward(self) -> Vec3 {
        match self.0 {
            0 => Vec3::Z,
            1 => Vec3::X,
            2 => Vec3::NEG_Z,
            _ => Vec3::NEG_X,
        }
    }

    /// Yaw in radians (same convention as `Quat::from_rotation_y`)
    pub fn yaw(self) -> f32 {
        self.0 as f32 * std::f32::consts::FRAC_PI_2
    }
}
