//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Single mutator (the run controller) per agent
//! - Stable query order (by collider ID)
//! - No rendering, input-device or platform dependencies

pub mod collision;
pub mod events;
pub mod geom;
pub mod input;
pub mod locomotion;
pub mod probe;
pub mod state;
pub mod tick;
pub mod tile;
pub mod turn;
pub mod world;

pub use collision::{Contact, MoveResult, move_character};
pub use events::{EventBus, ListenerId, RunEvent};
pub use geom::{Aabb, Heading, Layer, LayerMask};
pub use input::{ActionBindings, ActionKind, InputAction};
pub use locomotion::LocomotionState;
pub use probe::{GroundProbe, detect_obstacle_collision};
pub use state::{Agent, ColliderShape, RunSummary, TerminationCause};
pub use tick::{RunController, RunControllerBuilder, TickOutcome};
pub use tile::{Tile, TileId, TileType, Track};
pub use turn::{SnapTarget, TurnRejection, TurnResolver};
pub use world::{Collider, ColliderId, CollisionWorld, RayHit};
