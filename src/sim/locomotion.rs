//! Locomotion: speed ramp, vertical integration, jump and slide
//!
//! Pure functions over [`Agent`]. Anything needing the collision world
//! (grounding, applying moves) is done by the run controller, which
//! passes the probe result in.

use serde::{Deserialize, Serialize};

use super::state::Agent;
use crate::consts::JUMP_FACTOR;
use crate::settings::{JumpWhileSliding, RunConfig};

/// Observable locomotion state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocomotionState {
    Grounded,
    Airborne,
    /// Grounded with the collider shortened
    Sliding,
}

impl LocomotionState {
    /// Airborne wins over a running slide timer
    pub fn of(agent: &Agent, grounded: bool) -> Self {
        if !grounded {
            LocomotionState::Airborne
        } else if agent.sliding {
            LocomotionState::Sliding
        } else {
            LocomotionState::Grounded
        }
    }
}

/// Take-off velocity for a jump under `gravity`
///
/// `sqrt(jump_height * gravity * -3)`; gravity is negative.
#[inline]
pub fn jump_velocity(jump_height: f32, gravity: f32) -> f32 {
    (jump_height * gravity * JUMP_FACTOR).sqrt()
}

/// Ramp forward speed, gravity and animation speed for one tick
pub fn ramp_speed(agent: &mut Agent, config: &RunConfig, dt: f32) {
    if agent.speed < config.max_speed {
        agent.speed = (agent.speed + config.speed_increase_rate * dt).min(config.max_speed);
        agent.gravity = config.initial_gravity - agent.speed;

        if agent.animation_speed < config.max_animation_speed {
            agent.animation_speed = (agent.animation_speed + (1.0 / agent.speed) * dt)
                .min(config.max_animation_speed);
        }
    }
}

/// Landing clamp then gravity integration
pub fn integrate_vertical(agent: &mut Agent, grounded: bool, dt: f32) {
    if grounded && agent.vertical_velocity < 0.0 {
        agent.vertical_velocity = 0.0;
    }
    agent.vertical_velocity += agent.gravity * dt;
}

/// Set jump velocity if allowed; returns whether the jump happened
pub fn jump(agent: &mut Agent, config: &RunConfig, grounded: bool) -> bool {
    if !grounded {
        return false;
    }
    if agent.sliding {
        match config.jump_while_sliding {
            JumpWhileSliding::Block => return false,
            JumpWhileSliding::CancelSlide => restore_collider(agent),
            JumpWhileSliding::Stack => {}
        }
    }
    agent.vertical_velocity = jump_velocity(config.jump_height, agent.gravity);
    true
}

/// Start a slide if allowed; returns whether it started
///
/// The duration is the slide clip length at the current playback speed.
pub fn slide(agent: &mut Agent, config: &RunConfig, grounded: bool) -> bool {
    if agent.sliding || !grounded {
        return false;
    }
    agent.nominal_collider = agent.collider;
    agent.collider = agent.collider.slid();
    agent.sliding = true;
    agent.slide_remaining = config.slide_clip_length / agent.animation_speed;
    true
}

/// Count down an active slide; returns true on the tick it ends
pub fn advance_slide(agent: &mut Agent, dt: f32) -> bool {
    if !agent.sliding {
        return false;
    }
    agent.slide_remaining -= dt;
    if agent.slide_remaining <= 0.0 {
        restore_collider(agent);
        return true;
    }
    false
}

/// Put the nominal collider back and clear the slide
pub fn restore_collider(agent: &mut Agent) {
    agent.collider = agent.nominal_collider;
    agent.sliding = false;
    agent.slide_remaining = 0.0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geom::Heading;
    use glam::Vec3;
    use proptest::prelude::*;

    fn agent(config: &RunConfig) -> Agent {
        Agent::new(config, Vec3::new(0.0, 1.0, 0.0), Heading::NORTH)
    }

    #[test]
    fn test_jump_formula() {
        let config = RunConfig::default();
        let mut a = agent(&config);
        assert!(jump(&mut a, &config, true));
        let expected = (config.jump_height * a.gravity * -3.0).sqrt();
        assert_eq!(a.vertical_velocity, expected);
        assert!(a.vertical_velocity > 0.0);
    }

    #[test]
    fn test_jump_airborne_is_noop() {
        let config = RunConfig::default();
        let mut a = agent(&config);
        a.vertical_velocity = -2.0;
        assert!(!jump(&mut a, &config, false));
        assert_eq!(a.vertical_velocity, -2.0);
    }

    #[test]
    fn test_slide_halves_and_restores() {
        let config = RunConfig::default();
        let mut a = agent(&config);
        let original = a.collider;

        assert!(slide(&mut a, &config, true));
        assert!(a.sliding);
        assert_eq!(a.collider.height, original.height / 2.0);
        assert_eq!(a.collider.center.y, original.center.y - original.height / 4.0);
        assert_eq!(a.slide_remaining, config.slide_clip_length / a.animation_speed);

        // Re-entry is ignored
        let remaining = a.slide_remaining;
        assert!(!slide(&mut a, &config, true));
        assert_eq!(a.slide_remaining, remaining);
        assert_eq!(a.collider.height, original.height / 2.0);

        assert!(!advance_slide(&mut a, 0.5));
        assert!(a.sliding);
        assert!(advance_slide(&mut a, 0.5));
        assert!(!a.sliding);
        assert_eq!(a.collider, original);
    }

    #[test]
    fn test_slide_needs_ground() {
        let config = RunConfig::default();
        let mut a = agent(&config);
        assert!(!slide(&mut a, &config, false));
        assert!(!a.sliding);
    }

    #[test]
    fn test_slide_duration_scales_with_animation_speed() {
        let config = RunConfig::default();
        let mut a = agent(&config);
        a.animation_speed = 1.25;
        slide(&mut a, &config, true);
        assert!((a.slide_remaining - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_jump_while_sliding_policies() {
        let mut config = RunConfig::default();

        config.jump_while_sliding = JumpWhileSliding::Block;
        let mut a = agent(&config);
        slide(&mut a, &config, true);
        assert!(!jump(&mut a, &config, true));
        assert!(a.sliding);

        config.jump_while_sliding = JumpWhileSliding::CancelSlide;
        let mut a = agent(&config);
        let original = a.collider;
        slide(&mut a, &config, true);
        assert!(jump(&mut a, &config, true));
        assert!(!a.sliding);
        assert_eq!(a.collider, original);

        config.jump_while_sliding = JumpWhileSliding::Stack;
        let mut a = agent(&config);
        slide(&mut a, &config, true);
        assert!(jump(&mut a, &config, true));
        assert!(a.sliding);
        assert_eq!(a.collider.height, original.height / 2.0);
    }

    #[test]
    fn test_sliding_off_the_ground_reads_airborne() {
        let mut config = RunConfig::default();
        config.jump_while_sliding = JumpWhileSliding::Stack;
        let mut a = agent(&config);
        slide(&mut a, &config, true);
        assert_eq!(LocomotionState::of(&a, true), LocomotionState::Sliding);

        assert!(jump(&mut a, &config, true));
        assert!(a.sliding);
        assert_eq!(LocomotionState::of(&a, false), LocomotionState::Airborne);

        restore_collider(&mut a);
        assert_eq!(LocomotionState::of(&a, true), LocomotionState::Grounded);
    }

    #[test]
    fn test_landing_clamp() {
        let config = RunConfig::default();
        let mut a = agent(&config);
        a.vertical_velocity = -5.0;
        integrate_vertical(&mut a, true, 0.1);
        assert!((a.vertical_velocity - a.gravity * 0.1).abs() < 1e-6);

        a.vertical_velocity = -5.0;
        integrate_vertical(&mut a, false, 0.1);
        assert!((a.vertical_velocity - (-5.0 + a.gravity * 0.1)).abs() < 1e-6);
    }

    #[test]
    fn test_ramp_stops_at_cap() {
        let config = RunConfig::default();
        let mut a = agent(&config);
        for _ in 0..1000 {
            ramp_speed(&mut a, &config, 1.0);
        }
        assert_eq!(a.speed, config.max_speed);
        assert_eq!(a.gravity, config.initial_gravity - config.max_speed);
        assert!(a.animation_speed <= config.max_animation_speed);
    }

    proptest! {
        #[test]
        fn prop_speed_monotonic_capped_and_gravity_coupled(
            dts in proptest::collection::vec(0.0001f32..2.0, 1..200)
        ) {
            let config = RunConfig::default();
            let mut a = agent(&config);
            let mut last = a.speed;
            for dt in dts {
                ramp_speed(&mut a, &config, dt);
                prop_assert!(a.speed >= last);
                prop_assert!(a.speed >= config.initial_speed);
                prop_assert!(a.speed <= config.max_speed);
                prop_assert_eq!(a.gravity, config.initial_gravity - a.speed);
                prop_assert!(a.animation_speed <= config.max_animation_speed);
                last = a.speed;
            }
        }
    }
}
