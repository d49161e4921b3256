//! Headless demo driver
//!
//! Runs one actor through a small tile level with seeded pseudo-random input
//! and prints a JSON summary.
//!
//! Usage: `platform-motion [tuning.json] [ticks] [seed]`

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;
    use serde::Serialize;

    use platform_motion::consts::SIM_DT;
    use platform_motion::sim::{Actor, FrameInput, GridWorld, JumpKind};
    use platform_motion::{MotionTuning, TickError};

    const LEVEL: &str = "
########################################
#......................................#
#......................................#
#..............####.........#####......#
#......................................#
#.........####..............#..........#
#...........................#..........#
#....P.................######..........#
#######.....############################
#######.....############################
";

    /// Turns held-button state into press/release edges
    #[derive(Default)]
    struct InputEdges {
        jump_held: bool,
    }

    impl InputEdges {
        fn frame(&mut self, axis: f32, jump_held: bool) -> FrameInput {
            let frame = FrameInput {
                horizontal_axis: axis,
                jump_pressed: jump_held && !self.jump_held,
                jump_released: !jump_held && self.jump_held,
            };
            self.jump_held = jump_held;
            frame
        }
    }

    /// Wanders left and right, hopping now and then
    struct RandomPilot {
        rng: Pcg32,
        axis: f32,
        axis_ticks: u32,
        jump_ticks: u32,
    }

    impl RandomPilot {
        fn new(seed: u64) -> Self {
            Self {
                rng: Pcg32::seed_from_u64(seed),
                axis: 0.0,
                axis_ticks: 0,
                jump_ticks: 0,
            }
        }

        /// (axis, jump held)
        fn poll(&mut self) -> (f32, bool) {
            if self.axis_ticks == 0 {
                self.axis = match self.rng.random_range(0..4) {
                    0 => 0.0,
                    1 => -1.0,
                    _ => 1.0,
                };
                self.axis_ticks = self.rng.random_range(20..120);
            }
            self.axis_ticks -= 1;

            if self.jump_ticks > 0 {
                self.jump_ticks -= 1;
            } else if self.rng.random_bool(0.03) {
                // Short taps make small hops, long holds full jumps
                self.jump_ticks = self.rng.random_range(3..30);
            }
            (self.axis, self.jump_ticks > 0)
        }
    }

    #[derive(Debug, Default, Serialize)]
    struct Summary {
        ticks: u64,
        final_position: [f32; 2],
        grounded: bool,
        jumps: u32,
        coyote_jumps: u32,
        landings: u32,
        max_height: f32,
    }

    pub fn run() {
        env_logger::init();
        log::info!("platform-motion demo starting...");

        let mut args = std::env::args().skip(1);
        let tuning = match args.next().filter(|a| a != "-") {
            Some(path) => match MotionTuning::load(&path) {
                Ok(tuning) => tuning,
                Err(e) => {
                    log::error!("Failed to load tuning from {path}: {e}");
                    std::process::exit(2);
                }
            },
            None => MotionTuning::default(),
        };
        let ticks: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(1200);
        let seed: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(7);

        let world = GridWorld::from_ascii(LEVEL, 1.0);
        // Spawn marker is a cell center; stand the actor on that cell's floor
        let spawn = world.spawn().unwrap_or(Vec2::new(2.5, 2.5))
            - Vec2::new(0.0, world.cell_size() * 0.5)
            + Vec2::new(0.0, tuning.bounds.size.y * 0.5)
            - tuning.bounds.center;

        let mut actor = match Actor::new(tuning, spawn) {
            Ok(actor) => actor,
            Err(e) => {
                log::error!("Invalid tuning: {e}");
                std::process::exit(2);
            }
        };
        log::info!("Level {}x{}, spawn at {spawn}, seed {seed}", world.width(), world.height());

        match simulate(&mut actor, &world, ticks, seed) {
            Ok(summary) => match serde_json::to_string_pretty(&summary) {
                Ok(json) => println!("{json}"),
                Err(e) => log::error!("Failed to encode summary: {e}"),
            },
            Err(e) => {
                log::error!("Simulation stopped: {e}");
                std::process::exit(1);
            }
        }
    }

    fn simulate(
        actor: &mut Actor,
        world: &GridWorld,
        ticks: u64,
        seed: u64,
    ) -> Result<Summary, TickError> {
        let mut pilot = RandomPilot::new(seed);
        let mut edges = InputEdges::default();
        let mut summary = Summary {
            max_height: actor.position().y,
            ..Default::default()
        };

        for i in 0..ticks {
            let (axis, jump_held) = pilot.poll();
            let input = edges.frame(axis, jump_held);
            let now = i as f64 * f64::from(SIM_DT);
            let out = actor.tick(world, &input, now, SIM_DT)?;

            if let Some(kind) = out.jump {
                summary.jumps += 1;
                if kind == JumpKind::Coyote {
                    summary.coyote_jumps += 1;
                }
                log::info!("tick {i}: jump ({kind:?}) from {}", out.position);
            }
            if out.landing_this_frame {
                summary.landings += 1;
                log::info!("tick {i}: landed at {}", out.position);
            }
            summary.max_height = summary.max_height.max(out.position.y);
            summary.ticks += 1;
        }

        let position = actor.position();
        summary.final_position = [position.x, position.y];
        summary.grounded = actor.grounded();
        Ok(summary)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is the product on wasm; hosts drive `sim::tick` themselves
}
