//! Track tile model
//!
//! Tiles are authored by whatever generates the course and never change
//! afterwards. The simulation only reads them, through a [`TileId`]
//! handed back by a turn-marker query.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Turn permitted at a tile's junction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileType {
    #[default]
    Straight,
    Left,
    Right,
    /// T-junction: either direction is allowed
    Sideways,
}

impl TileType {
    /// Whether a turn input of `turn_value` (-1 left, +1 right) is allowed
    pub fn permits(self, turn_value: i32) -> bool {
        match self {
            TileType::Left => turn_value == -1,
            TileType::Right => turn_value == 1,
            TileType::Sideways => turn_value == -1 || turn_value == 1,
            TileType::Straight => false,
        }
    }
}

/// Index of a tile in its [`Track`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u32);

/// A static track segment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileType,
    /// World position the agent snaps to when it turns here
    pub pivot: Vec3,
}

impl Tile {
    pub fn new(kind: TileType, pivot: Vec3) -> Self {
        Self { kind, pivot }
    }
}

/// Arena of tiles for one course
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Track {
    tiles: Vec<Tile>,
}

impl Track {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_tile(&mut self, tile: Tile) -> TileId {
        let id = TileId(self.tiles.len() as u32);
        self.tiles.push(tile);
        id
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_permissions() {
        assert!(TileType::Left.permits(-1));
        assert!(!TileType::Left.permits(1));
        assert!(TileType::Right.permits(1));
        assert!(!TileType::Right.permits(-1));
        assert!(TileType::Sideways.permits(-1));
        assert!(TileType::Sideways.permits(1));
        assert!(!TileType::Sideways.permits(0));
        assert!(!TileType::Straight.permits(1));
        assert!(!TileType::Straight.permits(-1));
    }

    #[test]
    fn test_track_lookup() {
        let mut track = Track::new();
        let a = track.add_tile(Tile::new(TileType::Left, Vec3::new(0.0, 0.0, 10.0)));
        let b = track.add_tile(Tile::new(TileType::Right, Vec3::new(5.0, 0.0, 10.0)));
        assert_ne!(a, b);
        assert_eq!(track.get(b).map(|t| t.kind), Some(TileType::Right));
        assert!(track.get(TileId(99)).is_none());
        assert_eq!(track.len(), 2);
    }
}
