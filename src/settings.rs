//! Run tuning and policy settings
//!
//! Loaded from JSON; missing fields fall back to the defaults in
//! [`crate::consts`]. Validation runs before any controller is built.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::geom::LayerMask;

/// What an illegal turn at a junction does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TurnRejectPolicy {
    /// Any failed turn attempt ends the run
    #[default]
    EndRun,
    /// A wrong direction at a junction is ignored; no junction still ends the run
    IgnoreAtJunction,
}

impl TurnRejectPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRejectPolicy::EndRun => "end-run",
            TurnRejectPolicy::IgnoreAtJunction => "ignore-at-junction",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "end-run" | "endrun" => Some(TurnRejectPolicy::EndRun),
            "ignore-at-junction" | "ignore" => Some(TurnRejectPolicy::IgnoreAtJunction),
            _ => None,
        }
    }
}

/// What a jump does while a slide is in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum JumpWhileSliding {
    /// Restore the collider, clear the slide, then jump
    #[default]
    CancelSlide,
    /// Ignore the jump until the slide finishes
    Block,
    /// Jump with the slid collider; the slide timer keeps running
    Stack,
}

impl JumpWhileSliding {
    pub fn as_str(&self) -> &'static str {
        match self {
            JumpWhileSliding::CancelSlide => "cancel-slide",
            JumpWhileSliding::Block => "block",
            JumpWhileSliding::Stack => "stack",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cancel-slide" | "cancel" => Some(JumpWhileSliding::CancelSlide),
            "block" => Some(JumpWhileSliding::Block),
            "stack" => Some(JumpWhileSliding::Stack),
            _ => None,
        }
    }
}

/// All tunables for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    // === Locomotion ===
    pub initial_speed: f32,
    pub max_speed: f32,
    pub speed_increase_rate: f32,
    pub jump_height: f32,
    pub initial_gravity: f32,

    // === Scoring ===
    pub score_multiplier: f32,

    // === Animation ===
    pub slide_clip_length: f32,
    pub initial_animation_speed: f32,
    pub max_animation_speed: f32,

    // === Probes ===
    pub ground_probe_length: f32,
    pub liveness_probe_length: f32,
    pub probe_forward_offset: f32,
    pub probe_epsilon: f32,
    pub turn_query_radius: f32,

    // === Character collider ===
    pub collider_height: f32,
    pub collider_radius: f32,
    pub collider_center: Vec3,
    pub step_offset: f32,

    // === Layers ===
    pub ground_mask: LayerMask,
    pub turn_mask: LayerMask,
    pub obstacle_mask: LayerMask,

    // === Policies ===
    pub turn_reject_policy: TurnRejectPolicy,
    pub jump_while_sliding: JumpWhileSliding,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            initial_speed: INITIAL_SPEED,
            max_speed: MAX_SPEED,
            speed_increase_rate: SPEED_INCREASE_RATE,
            jump_height: JUMP_HEIGHT,
            initial_gravity: INITIAL_GRAVITY,

            score_multiplier: SCORE_MULTIPLIER,

            slide_clip_length: SLIDE_CLIP_LENGTH,
            initial_animation_speed: INITIAL_ANIMATION_SPEED,
            max_animation_speed: MAX_ANIMATION_SPEED,

            ground_probe_length: GROUND_PROBE_LENGTH,
            liveness_probe_length: LIVENESS_PROBE_LENGTH,
            probe_forward_offset: PROBE_FORWARD_OFFSET,
            probe_epsilon: PROBE_EPSILON,
            turn_query_radius: TURN_QUERY_RADIUS,

            collider_height: COLLIDER_HEIGHT,
            collider_radius: COLLIDER_RADIUS,
            collider_center: Vec3::ZERO,
            step_offset: STEP_OFFSET,

            ground_mask: LayerMask::from_layers(&[GROUND_LAYER]),
            turn_mask: LayerMask::from_layers(&[TURN_LAYER]),
            obstacle_mask: LayerMask::from_layers(&[OBSTACLE_LAYER]),

            turn_reject_policy: TurnRejectPolicy::default(),
            jump_while_sliding: JumpWhileSliding::default(),
        }
    }
}

impl RunConfig {
    /// Parse from JSON and validate
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file and validate
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded run config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("initial_speed", self.initial_speed)?;
        positive("max_speed", self.max_speed)?;
        if self.initial_speed > self.max_speed {
            return Err(ConfigError::invalid(
                "initial_speed",
                "must not exceed max_speed",
            ));
        }
        if !(self.speed_increase_rate >= 0.0) {
            return Err(ConfigError::invalid(
                "speed_increase_rate",
                "must be zero or positive",
            ));
        }
        positive("jump_height", self.jump_height)?;
        if !(self.initial_gravity < 0.0) {
            return Err(ConfigError::invalid("initial_gravity", "must be negative"));
        }
        if !(self.score_multiplier >= 0.0) {
            return Err(ConfigError::invalid(
                "score_multiplier",
                "must be zero or positive",
            ));
        }

        positive("slide_clip_length", self.slide_clip_length)?;
        positive("initial_animation_speed", self.initial_animation_speed)?;
        if self.max_animation_speed < self.initial_animation_speed {
            return Err(ConfigError::invalid(
                "max_animation_speed",
                "must be at least initial_animation_speed",
            ));
        }

        positive("ground_probe_length", self.ground_probe_length)?;
        positive("liveness_probe_length", self.liveness_probe_length)?;
        positive("turn_query_radius", self.turn_query_radius)?;
        if !(self.probe_forward_offset >= 0.0) || !(self.probe_epsilon >= 0.0) {
            return Err(ConfigError::invalid(
                "probe_forward_offset",
                "probe offsets must be zero or positive",
            ));
        }

        positive("collider_height", self.collider_height)?;
        positive("collider_radius", self.collider_radius)?;
        if !(self.step_offset >= 0.0) {
            return Err(ConfigError::invalid("step_offset", "must be zero or positive"));
        }

        let masks = [
            ("ground_mask", self.ground_mask),
            ("turn_mask", self.turn_mask),
            ("obstacle_mask", self.obstacle_mask),
        ];
        for (name, mask) in masks {
            if mask.is_empty() {
                return Err(ConfigError::invalid(name, "must contain at least one layer"));
            }
        }
        for (i, &(first, a)) in masks.iter().enumerate() {
            for &(second, b) in &masks[i + 1..] {
                if a.intersects(b) {
                    return Err(ConfigError::OverlappingMasks { first, second });
                }
            }
        }

        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    // Written as a negation so NaN is rejected too
    if !(value > 0.0) {
        return Err(ConfigError::invalid(field, "must be positive"));
    }
    Ok(())
}
