//! Lane Runner headless demo
//!
//! Builds a seeded course, drives the runner with a scripted autopilot
//! at a fixed 60 Hz and prints the run summary.
//!
//! Usage: `lane-runner [config.json] [seed]`

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use lane_runner::consts::*;
use lane_runner::sim::{
    Aabb, CollisionWorld, Heading, InputAction, Layer, RunController, RunEvent, TickOutcome,
    Tile, TileId, TileType, Track,
};
use lane_runner::{ConfigError, RunConfig};

/// Half width of a lane slab
const LANE_HALF_WIDTH: f32 = 2.0;
/// Longest demo run (5 minutes of simulated time)
const MAX_TICKS: u32 = 5 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HazardKind {
    /// Jump over it
    Low,
    /// Slide under it
    High,
}

#[derive(Debug, Clone, Copy)]
struct Hazard {
    segment: usize,
    bounds: Aabb,
    kind: HazardKind,
}

#[derive(Debug, Clone, Copy)]
struct Junction {
    tile: TileId,
    pivot: Vec3,
    turn: i32,
}

/// Generated course plus the plan the autopilot follows
struct Course {
    world: CollisionWorld,
    track: Track,
    hazards: Vec<Hazard>,
    junctions: Vec<Junction>,
}

/// Slab of ground from `a` to `b` along a cardinal heading
fn lane_slab(a: Vec3, b: Vec3, heading: Heading) -> Aabb {
    let side = heading.rotated(1).forward() * LANE_HALF_WIDTH;
    Aabb::new(a - side - Vec3::Y, b + side)
}

fn generate_course(seed: u64, segments: usize) -> Course {
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut world = CollisionWorld::new();
    let mut track = Track::new();
    let mut hazards = Vec::new();
    let mut junctions = Vec::new();

    let ground = Layer(GROUND_LAYER);
    let mut cursor = Vec3::new(0.0, 0.0, -5.0);
    let mut heading = Heading::NORTH;

    for segment in 0..segments {
        let fwd = heading.forward();
        let length: f32 = rng.random_range(40.0..70.0);
        let pivot = cursor + fwd * length;
        world.add_solid(lane_slab(cursor, pivot + fwd * LANE_HALF_WIDTH, heading), ground);

        // Hazards well clear of both ends so landings finish before the junction
        let mut along = rng.random_range(12.0..18.0);
        while along < length - 20.0 {
            let kind = if rng.random_bool(0.5) {
                HazardKind::Low
            } else {
                HazardKind::High
            };
            let near = cursor + fwd * along;
            let side = heading.rotated(1).forward() * LANE_HALF_WIDTH;
            let bounds = match kind {
                HazardKind::Low => Aabb::new(near - side, near + fwd * 0.5 + side + Vec3::Y * 0.5),
                HazardKind::High => Aabb::new(
                    near - side + Vec3::Y * 1.2,
                    near + fwd + side + Vec3::Y * 3.0,
                ),
            };
            world.add_solid(bounds, Layer(OBSTACLE_LAYER));
            hazards.push(Hazard {
                segment,
                bounds,
                kind,
            });
            along += rng.random_range(15.0..25.0);
        }

        // Last segment is a dead end
        if segment + 1 == segments {
            break;
        }

        let (kind, turn) = match rng.random_range(0..3) {
            0 => (TileType::Left, -1),
            1 => (TileType::Right, 1),
            _ => (TileType::Sideways, if rng.random_bool(0.5) { 1 } else { -1 }),
        };
        let tile = track.add_tile(Tile::new(kind, pivot));
        let half = Vec3::new(LANE_HALF_WIDTH, 0.0, LANE_HALF_WIDTH);
        world.add_solid(Aabb::new(pivot - half - Vec3::Y, pivot + half), ground);
        world.add_marker(
            Aabb::new(
                pivot - Vec3::new(LANE_HALF_WIDTH, 0.0, LANE_HALF_WIDTH),
                pivot + Vec3::new(LANE_HALF_WIDTH, 4.0, LANE_HALF_WIDTH),
            ),
            Layer(TURN_LAYER),
            tile,
        );
        junctions.push(Junction { tile, pivot, turn });

        heading = heading.rotated(turn);
        cursor = pivot + heading.forward() * LANE_HALF_WIDTH;
    }

    log::info!(
        "Generated course: {} tiles, {} colliders, {} hazards",
        track.len(),
        world.len(),
        hazards.len()
    );

    Course {
        world,
        track,
        hazards,
        junctions,
    }
}

/// Scripted player: turns at planned junctions, jumps or slides hazards
struct Autopilot {
    segment: usize,
}

impl Autopilot {
    fn act(&mut self, controller: &mut RunController<'_>, course: &Course, dt: f32) {
        let agent = controller.agent();
        let fwd = agent.forward();
        let pos = agent.position;
        let speed = agent.speed;
        let front = pos.dot(fwd) + agent.collider.radius;

        if let Some(junction) = course.junctions.get(self.segment) {
            let at_marker = controller.turn_resolver().junction_at(pos) == Some(junction.tile);
            if at_marker && (junction.pivot - pos).dot(fwd) <= 0.0 {
                controller.dispatch(InputAction::Turn(junction.turn as f32), dt);
                self.segment += 1;
                return;
            }
        }

        let next = course
            .hazards
            .iter()
            .filter(|h| h.segment == self.segment)
            .map(|h| {
                let half = (h.bounds.max - h.bounds.min) * 0.5;
                let near = h.bounds.center().dot(fwd) - (half * fwd.abs()).element_sum();
                (h.kind, near - front)
            })
            .filter(|&(_, gap)| gap >= 0.0)
            .min_by(|a, b| a.1.total_cmp(&b.1));

        match next {
            Some((HazardKind::Low, gap)) if gap <= speed * 0.12 + 0.2 => {
                controller.dispatch(InputAction::Jump, dt);
            }
            Some((HazardKind::High, gap)) if gap <= speed * 0.2 + 0.2 => {
                controller.dispatch(InputAction::Slide, dt);
            }
            _ => {}
        }
    }
}

fn run() -> Result<(), ConfigError> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);

    let course = generate_course(seed, 12);
    let mut controller = RunController::builder()
        .config(config)
        .world(&course.world)
        .track(&course.track)
        .spawn(Vec3::new(0.0, COLLIDER_HEIGHT / 2.0, 0.0), Heading::NORTH)
        .build()?;

    controller.subscribe(|event| {
        if let RunEvent::TurnApplied { heading } = event {
            log::info!("Turned, now heading {heading}");
        }
    });

    let mut autopilot = Autopilot { segment: 0 };
    for _ in 0..MAX_TICKS {
        autopilot.act(&mut controller, &course, SIM_DT);
        if controller.tick(SIM_DT) != TickOutcome::Running {
            break;
        }
    }

    match controller.summary() {
        Some(summary) => println!(
            "Run over ({:?}): score {}, {:.1} units in {:.1}s",
            summary.cause, summary.score, summary.distance, summary.elapsed_secs
        ),
        None => println!(
            "Still running after {:.0}s: score {}",
            controller.agent().elapsed,
            controller.agent().int_score()
        ),
    }
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("Lane Runner (headless) starting...");

    if let Err(e) = run() {
        log::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
