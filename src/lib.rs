//! Lane Runner - endless-runner movement simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (locomotion, turns, probes, run controller)
//! - `settings`: Data-driven tuning and policy configuration
//! - `error`: Construction-time configuration errors
//!
//! Everything outside the run itself (score submission, UI, scene reload)
//! is reached through [`sim::RunEvent`] listeners.

pub mod error;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::{JumpWhileSliding, RunConfig, TurnRejectPolicy};

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the demo (60 Hz, one tick per frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Forward speed defaults (units/s)
    pub const INITIAL_SPEED: f32 = 5.0;
    pub const MAX_SPEED: f32 = 30.0;
    /// Forward speed gained per second of running
    pub const SPEED_INCREASE_RATE: f32 = 0.1;

    /// Jump apex height parameter (feeds `sqrt(h * g * -3)`)
    pub const JUMP_HEIGHT: f32 = 1.0;
    /// Gravity before the speed coupling is applied
    pub const INITIAL_GRAVITY: f32 = -9.81;
    /// Jump velocity factor; keeps the original jump feel
    pub const JUMP_FACTOR: f32 = -3.0;

    /// Score accrued per second alive
    pub const SCORE_MULTIPLIER: f32 = 10.0;

    /// Slide pose clip length at 1x playback (seconds)
    pub const SLIDE_CLIP_LENGTH: f32 = 1.0;
    pub const INITIAL_ANIMATION_SPEED: f32 = 1.0;
    pub const MAX_ANIMATION_SPEED: f32 = 1.25;

    /// Landing tolerance for the short ground probe
    pub const GROUND_PROBE_LENGTH: f32 = 0.2;
    /// Long probe used to detect falling off the course
    pub const LIVENESS_PROBE_LENGTH: f32 = 20.0;
    /// Forward/backward offset of the two probe rays
    pub const PROBE_FORWARD_OFFSET: f32 = 0.2;
    /// Height above the collider bottom the rays start from
    pub const PROBE_EPSILON: f32 = 0.1;
    /// Radius of the turn-marker overlap query
    pub const TURN_QUERY_RADIUS: f32 = 0.1;

    /// Character collider defaults
    pub const COLLIDER_HEIGHT: f32 = 2.0;
    pub const COLLIDER_RADIUS: f32 = 0.5;
    /// Highest ledge the mover climbs without being blocked
    pub const STEP_OFFSET: f32 = 0.3;

    /// Default layer indices
    pub const GROUND_LAYER: u8 = 6;
    pub const TURN_LAYER: u8 = 7;
    pub const OBSTACLE_LAYER: u8 = 8;
}

/// Horizontal (XZ) part of a vector
#[inline]
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Truncate an accumulated score to the integer reported to listeners
#[inline]
pub fn truncate_score(score: f32) -> u32 {
    if score <= 0.0 { 0 } else { score as u32 }
}
