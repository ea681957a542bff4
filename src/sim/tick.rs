//! Run controller and the per-tick simulation order
//!
//! One [`RunController::tick`] per frame. Input actions arrive between
//! ticks through [`RunController::dispatch`], on the same thread, and
//! only while the controller is active.

use glam::Vec3;

use super::collision::{MoveResult, SKIN, move_character};
use super::events::{EventBus, ListenerId, RunEvent};
use super::geom::Heading;
use super::input::{ActionBindings, InputAction, turn_value};
use super::locomotion::{self, LocomotionState};
use super::probe::{GroundProbe, detect_obstacle_collision};
use super::state::{Agent, RunSummary, TerminationCause};
use super::tile::Track;
use super::turn::{SnapTarget, TurnRejection, TurnResolver, snap_position};
use super::world::CollisionWorld;
use crate::error::ConfigError;
use crate::horizontal;
use crate::settings::{RunConfig, TurnRejectPolicy};

/// What a call to [`RunController::tick`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Simulated normally
    Running,
    /// The run ended during this tick
    GameOver(TerminationCause),
    /// Nothing simulated: the run is over, the controller is inactive
    /// or `dt` was unusable
    Inactive,
}

/// Builds a [`RunController`], checking every collaborator up front
#[derive(Debug, Default)]
pub struct RunControllerBuilder<'w> {
    config: Option<RunConfig>,
    world: Option<&'w CollisionWorld>,
    track: Option<&'w Track>,
    spawn: Option<(Vec3, Heading)>,
}

impl<'w> RunControllerBuilder<'w> {
    pub fn config(mut self, config: RunConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn world(mut self, world: &'w CollisionWorld) -> Self {
        self.world = Some(world);
        self
    }

    pub fn track(mut self, track: &'w Track) -> Self {
        self.track = Some(track);
        self
    }

    /// Agent start position (collider origin, not feet)
    pub fn spawn(mut self, position: Vec3, heading: Heading) -> Self {
        self.spawn = Some((position, heading));
        self
    }

    /// Validate and build an active controller
    pub fn build(self) -> Result<RunController<'w>, ConfigError> {
        let world = self
            .world
            .ok_or(ConfigError::MissingCollaborator("collision world"))?;
        let track = self.track.ok_or(ConfigError::MissingCollaborator("track"))?;
        let (spawn, heading) = self.spawn.ok_or(ConfigError::MissingCollaborator("spawn"))?;
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let agent = Agent::new(&config, spawn, heading);
        let probe = GroundProbe::from_config(&config);
        if !probe.is_grounded(world, &agent, config.liveness_probe_length) {
            return Err(ConfigError::SpawnOffCourse(spawn.to_array()));
        }

        let bounds = agent.bounds();
        let solid_mask = config.ground_mask | config.obstacle_mask;
        if world
            .solids()
            .any(|(_, c)| solid_mask.contains(c.layer) && bounds.overlaps(&c.bounds, SKIN))
        {
            return Err(ConfigError::SpawnEmbedded(spawn.to_array()));
        }

        let mut controller = RunController {
            config,
            world,
            track,
            probe,
            agent,
            bindings: ActionBindings::default(),
            active: false,
            events: EventBus::new(),
            summary: None,
        };
        controller.activate();
        Ok(controller)
    }
}

/// Owns the agent and advances the run
#[derive(Debug)]
pub struct RunController<'w> {
    config: RunConfig,
    world: &'w CollisionWorld,
    track: &'w Track,
    probe: GroundProbe,
    agent: Agent,
    bindings: ActionBindings,
    active: bool,
    events: EventBus,
    summary: Option<RunSummary>,
}

impl<'w> RunController<'w> {
    pub fn builder() -> RunControllerBuilder<'w> {
        RunControllerBuilder::default()
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_alive(&self) -> bool {
        self.agent.alive
    }

    /// Final numbers, once the run has ended
    pub fn summary(&self) -> Option<RunSummary> {
        self.summary
    }

    pub fn bindings(&self) -> ActionBindings {
        self.bindings
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&RunEvent) + 'static) -> ListenerId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Short-probe grounding
    pub fn is_grounded(&self) -> bool {
        self.probe
            .is_grounded(self.world, &self.agent, self.config.ground_probe_length)
    }

    pub fn locomotion_state(&self) -> LocomotionState {
        LocomotionState::of(&self.agent, self.is_grounded())
    }

    /// Turn resolver over this run's world and track
    pub fn turn_resolver(&self) -> TurnResolver<'w> {
        TurnResolver::new(
            self.world,
            self.track,
            self.config.turn_mask,
            self.config.turn_query_radius,
        )
    }

    /// Bring the agent into the simulation and bind its input actions
    ///
    /// A finished run cannot be reactivated.
    pub fn activate(&mut self) {
        if self.active || !self.agent.alive {
            return;
        }
        self.bindings.subscribe_all();
        self.active = true;
        log::info!("Runner activated at {:?}", self.agent.position);
    }

    /// Take the agent out of the simulation and unbind its input actions
    pub fn deactivate(&mut self) {
        if !self.active {
            return;
        }
        self.bindings.unsubscribe_all();
        self.active = false;
        log::info!("Runner deactivated");
    }

    /// Advance the run by `dt` seconds
    ///
    /// A non-positive or non-finite `dt` simulates nothing.
    pub fn tick(&mut self, dt: f32) -> TickOutcome {
        if !self.active || !self.agent.alive {
            return TickOutcome::Inactive;
        }
        if !(dt.is_finite() && dt > 0.0) {
            log::warn!("Ignoring tick with dt = {dt}");
            return TickOutcome::Inactive;
        }

        // 1. Still above the course at all?
        if !self
            .probe
            .is_grounded(self.world, &self.agent, self.config.liveness_probe_length)
        {
            return self.game_over(TerminationCause::FellOffCourse);
        }

        // 2. Score
        self.agent.score += self.config.score_multiplier * dt;
        self.agent.elapsed += dt;
        self.agent.ticks += 1;
        let score = self.agent.int_score();
        self.events.emit(&RunEvent::ScoreChanged { score });

        // 3. Horizontal move; must precede the vertical pass
        let displacement = self.agent.forward() * self.agent.speed * dt;
        let before = self.agent.position;
        let result = self.apply_move(displacement);
        self.agent.distance += horizontal(self.agent.position - before).length();
        if let Some(cause) = self.check_contacts(&result) {
            return self.game_over(cause);
        }

        // 4-5. Landing clamp, then gravity
        let grounded = self.is_grounded();
        locomotion::integrate_vertical(&mut self.agent, grounded, dt);

        // 6. Vertical move
        let result = self.apply_move(Vec3::new(0.0, self.agent.vertical_velocity * dt, 0.0));
        if let Some(cause) = self.check_contacts(&result) {
            return self.game_over(cause);
        }

        // 7. Speed, gravity and animation ramp
        locomotion::ramp_speed(&mut self.agent, &self.config, dt);

        if locomotion::advance_slide(&mut self.agent, dt) {
            log::debug!("Slide finished, collider restored");
        }

        TickOutcome::Running
    }

    /// Deliver an input action; returns false if it was ignored
    ///
    /// `dt` is the current frame time, used by the immediate jump move.
    pub fn dispatch(&mut self, action: InputAction, dt: f32) -> bool {
        if !self.agent.alive || !self.bindings.is_bound(action.kind()) {
            return false;
        }
        match action {
            InputAction::Turn(axis) => self.turn(turn_value(axis)),
            InputAction::Jump => self.jump(dt),
            InputAction::Slide => self.slide(),
        }
    }

    fn turn(&mut self, turn: i32) -> bool {
        if turn == 0 {
            return false;
        }
        let resolved = self
            .turn_resolver()
            .try_turn(self.agent.position, self.agent.heading, turn);
        match resolved {
            Ok(snap) => {
                self.apply_turn(snap);
                true
            }
            Err(TurnRejection::NoJunction) => {
                self.game_over(TerminationCause::NoJunction);
                true
            }
            Err(TurnRejection::NotPermitted { tile, kind }) => match self.config.turn_reject_policy {
                TurnRejectPolicy::EndRun => {
                    self.game_over(TerminationCause::TurnNotPermitted);
                    true
                }
                TurnRejectPolicy::IgnoreAtJunction => {
                    log::debug!("Ignoring turn {turn} at {kind:?} tile {tile:?}");
                    false
                }
            },
        }
    }

    /// Snap onto the pivot with collision off, then face the new heading
    fn apply_turn(&mut self, snap: SnapTarget) {
        let heading = snap.heading.forward();
        self.events.emit(&RunEvent::TurnApplied { heading });

        self.agent.position = snap_position(self.agent.position, snap.pivot);
        self.agent.heading = snap.heading;
        log::debug!(
            "Turned at tile {:?} to {:?}, now at {:?}",
            snap.tile,
            heading,
            self.agent.position
        );
    }

    fn jump(&mut self, dt: f32) -> bool {
        let grounded = self.is_grounded();
        if !locomotion::jump(&mut self.agent, &self.config, grounded) {
            return false;
        }
        log::debug!("Jump at {:.2} u/s", self.agent.vertical_velocity);

        let result = self.apply_move(Vec3::new(0.0, self.agent.vertical_velocity, 0.0) * dt);
        if let Some(cause) = self.check_contacts(&result) {
            self.game_over(cause);
        }
        true
    }

    fn slide(&mut self) -> bool {
        let grounded = self.is_grounded();
        let started = locomotion::slide(&mut self.agent, &self.config, grounded);
        if started {
            log::debug!("Slide for {:.2}s", self.agent.slide_remaining);
        }
        started
    }

    fn apply_move(&mut self, displacement: Vec3) -> MoveResult {
        move_character(
            self.world,
            &mut self.agent.position,
            &self.agent.collider,
            displacement,
            self.config.step_offset,
        )
    }

    fn check_contacts(&self, result: &MoveResult) -> Option<TerminationCause> {
        result
            .contacts
            .iter()
            .any(|c| detect_obstacle_collision(c.layer, self.config.obstacle_mask))
            .then_some(TerminationCause::ObstacleHit)
    }

    /// End the run; later calls are no-ops
    fn game_over(&mut self, cause: TerminationCause) -> TickOutcome {
        if !self.agent.alive {
            return TickOutcome::Inactive;
        }
        self.agent.alive = false;

        let score = self.agent.int_score();
        let summary = RunSummary {
            score,
            cause,
            elapsed_secs: self.agent.elapsed,
            distance: self.agent.distance,
            ticks: self.agent.ticks,
        };
        self.summary = Some(summary);
        log::info!(
            "Game over ({cause:?}): score {score}, {:.1} units in {:.1}s",
            summary.distance,
            summary.elapsed_secs
        );

        self.events.emit(&RunEvent::GameOver {
            score,
            cause,
            summary,
        });
        self.deactivate();
        TickOutcome::GameOver(cause)
    }
}
