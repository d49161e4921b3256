//! Full-tick scenarios against tile levels

use glam::Vec2;
use platform_motion::MotionTuning;
use platform_motion::sim::{
    Actor, FrameInput, GridWorld, JumpKind, ObstacleRef, Obstacles, QueryError, TickOutput,
    resolve_move,
};

const DT: f32 = 1.0 / 60.0;

fn idle() -> FrameInput {
    FrameInput::default()
}

fn axis(x: f32) -> FrameInput {
    FrameInput {
        horizontal_axis: x,
        ..Default::default()
    }
}

fn press() -> FrameInput {
    FrameInput {
        jump_pressed: true,
        ..Default::default()
    }
}

fn release() -> FrameInput {
    FrameInput {
        jump_released: true,
        ..Default::default()
    }
}

/// Drives an actor with a monotonic tick clock
struct Driver {
    actor: Actor,
    ticks: u64,
}

impl Driver {
    fn new(position: Vec2) -> Self {
        Self::with_tuning(MotionTuning::default(), position)
    }

    fn with_tuning(tuning: MotionTuning, position: Vec2) -> Self {
        Self {
            actor: Actor::new(tuning, position).expect("valid tuning"),
            ticks: 0,
        }
    }

    fn now(&self) -> f64 {
        self.ticks as f64 * f64::from(DT)
    }

    fn step(&mut self, world: &GridWorld, input: FrameInput) -> TickOutput {
        let out = self
            .actor
            .tick(world, &input, self.now(), DT)
            .expect("tick succeeds");
        self.ticks += 1;
        out
    }
}

fn flat_room() -> GridWorld {
    GridWorld::from_ascii(
        "
#..........................#
#..........................#
#..........................#
#..........................#
#..........................#
#..........................#
#..........................#
#..........................#
############################
",
        1.0,
    )
}

fn ledge() -> GridWorld {
    GridWorld::from_ascii(
        "
..............
..............
..............
#####.........
#####.........
",
        1.0,
    )
}

#[test]
fn test_coyote_jump_after_walking_off_ledge() {
    let world = ledge();
    // 1x2 box resting on the ledge top at y = 2
    let mut driver = Driver::new(Vec2::new(3.0, 3.0));
    assert!(driver.step(&world, idle()).grounded);

    let mut left_ground = false;
    for _ in 0..200 {
        if !driver.step(&world, axis(1.0)).grounded {
            left_ground = true;
            break;
        }
    }
    assert!(left_ground, "actor should walk off the ledge");
    assert!(driver.actor.state().jump.last_grounded_at().is_some());

    let out = driver.step(&world, press());
    assert_eq!(out.jump, Some(JumpKind::Coyote));
    assert!(out.jumping_this_frame);

    // A second press before landing is denied
    driver.step(&world, release());
    let out = driver.step(&world, press());
    assert_eq!(out.jump, None);
    assert!(!out.grounded);
}

#[test]
fn test_coyote_window_closes() {
    let world = ledge();
    let mut driver = Driver::new(Vec2::new(3.0, 3.0));
    driver.step(&world, idle());
    while driver.step(&world, axis(1.0)).grounded {}

    // 0.1 s of coyote time is six ticks at 60 Hz; wait well past it
    for _ in 0..10 {
        driver.step(&world, idle());
    }
    let out = driver.step(&world, press());
    assert_eq!(out.jump, None);
}

/// Tick index (relative to the first drop tick) at which a dropped actor lands
fn landing_tick(world: &GridWorld, start: Vec2) -> u64 {
    let mut driver = Driver::new(start);
    for i in 0..600 {
        if driver.step(world, idle()).landing_this_frame {
            return i;
        }
    }
    panic!("actor never landed");
}

#[test]
fn test_buffered_jump_fires_on_landing() {
    let world = flat_room();
    let start = Vec2::new(10.0, 7.0);
    let land = landing_tick(&world, start);
    assert!(land > 5);

    // Press three ticks (0.05 s) before touchdown
    let mut driver = Driver::new(start);
    let mut jumped_at = None;
    for i in 0..=land {
        let input = if i == land - 3 { press() } else { idle() };
        let out = driver.step(&world, input);
        if let Some(kind) = out.jump {
            jumped_at = Some((i, kind));
        }
    }
    assert_eq!(jumped_at, Some((land, JumpKind::Buffered)));
}

#[test]
fn test_early_press_outside_buffer_is_dropped() {
    let world = flat_room();
    let start = Vec2::new(10.0, 7.0);
    let land = landing_tick(&world, start);
    assert!(land > 12);

    // Press twelve ticks (0.2 s) before touchdown, longer than the 0.1 s buffer
    let mut driver = Driver::new(start);
    for i in 0..land + 20 {
        let input = if i == land - 12 { press() } else { idle() };
        let out = driver.step(&world, input);
        assert_eq!(out.jump, None, "no jump expected at tick {i}");
    }
    assert!(driver.actor.grounded());
}

#[test]
fn test_landing_zeroes_fall_speed() {
    let world = flat_room();
    let mut driver = Driver::new(Vec2::new(10.0, 6.0));
    loop {
        let before = driver.actor.state().motion.vertical_speed;
        let out = driver.step(&world, idle());
        if out.landing_this_frame {
            assert!(before < 0.0);
            assert_eq!(driver.actor.state().motion.vertical_speed, 0.0);
            // Resting on the floor top at y = 1
            let bottom = out.position.y - 1.0;
            assert!((1.0..1.1).contains(&bottom), "bottom at {bottom}");
            break;
        }
        assert!(driver.ticks < 600);
    }
}

#[test]
fn test_release_mid_jump_uses_early_cancel_gravity() {
    let world = flat_room();
    let tuning = MotionTuning::default();
    let mut driver = Driver::new(Vec2::new(10.0, 2.0));
    driver.step(&world, idle());
    assert!(driver.step(&world, press()).jumping_this_frame);

    driver.step(&world, release());
    let state = *driver.actor.state();
    assert!(state.jump.ended_early);
    assert!(state.motion.vertical_speed > 0.0);

    driver.step(&world, idle());
    let after = driver.actor.state().motion;
    // Still far from the apex, so base gravity is the minimum fall speed
    let expected = tuning.min_fall_speed * tuning.jump_end_early_gravity_modifier * DT;
    assert!((state.motion.vertical_speed - after.vertical_speed - expected).abs() < 1e-3);
}

#[test]
fn test_held_jump_is_higher_than_tapped_jump() {
    let world = flat_room();

    let peak = |release_after: Option<u64>| {
        let mut driver = Driver::new(Vec2::new(10.0, 2.0));
        driver.step(&world, idle());
        driver.step(&world, press());
        let mut peak = 0.0_f32;
        for i in 0..60 {
            let input = if Some(i) == release_after { release() } else { idle() };
            peak = peak.max(driver.step(&world, input).position.y);
        }
        peak
    };

    assert!(peak(None) > peak(Some(1)) + 0.5);
}

#[test]
fn test_wall_stops_actor() {
    let world = flat_room();
    let mut driver = Driver::new(Vec2::new(20.0, 2.0));
    for _ in 0..300 {
        let out = driver.step(&world, axis(1.0));
        // Right wall starts at x = 27
        assert!(out.position.x + 0.5 <= 27.0 + 1e-4, "x = {}", out.position.x);
    }
    let state = driver.actor.state();
    assert!(state.contacts.current.right);
    assert_eq!(state.motion.horizontal_speed, 0.0);

    // Walking back out works
    let out = driver.step(&world, axis(-1.0));
    assert!(out.velocity.x < 0.0);
}

#[test]
fn test_ceiling_stops_jump() {
    let world = GridWorld::from_ascii(
        "
##########
..........
..........
..........
##########
",
        1.0,
    );
    // Floor top at y = 1, ceiling bottom at y = 4, box is 2 tall
    let mut driver = Driver::new(Vec2::new(5.0, 2.0));
    driver.step(&world, idle());
    driver.step(&world, press());
    let mut bonked = false;
    for _ in 0..120 {
        let out = driver.step(&world, idle());
        assert!(out.position.y + 1.0 <= 4.0 + 1e-4, "head at {}", out.position.y + 1.0);
        if driver.actor.state().contacts.current.up {
            bonked = true;
        }
    }
    assert!(bonked);
    assert!(driver.actor.grounded());
}

#[test]
fn test_idle_actor_does_not_drift() {
    let world = flat_room();
    let mut driver = Driver::new(Vec2::new(10.0, 2.0));
    for _ in 0..240 {
        let out = driver.step(&world, idle());
        assert_eq!(out.position, Vec2::new(10.0, 2.0));
        assert_eq!(driver.actor.state().motion.horizontal_speed, 0.0);
    }
}

#[test]
fn test_run_reaches_move_clamp() {
    let world = flat_room();
    let tuning = MotionTuning::default();
    let mut driver = Driver::new(Vec2::new(3.0, 2.0));
    driver.step(&world, idle());
    for _ in 0..10 {
        driver.step(&world, axis(1.0));
        assert!(driver.actor.state().motion.horizontal_speed <= tuning.move_clamp);
    }
    assert_eq!(driver.actor.state().motion.horizontal_speed, tuning.move_clamp);
}

/// Clear everywhere except exactly at one destination
struct BlockedAt {
    target: Vec2,
}

impl Obstacles for BlockedAt {
    fn ray_hit(&self, _: Vec2, _: Vec2, _: f32) -> Result<bool, QueryError> {
        Ok(false)
    }

    fn box_overlap(&self, center: Vec2, _: Vec2) -> Result<Option<ObstacleRef>, QueryError> {
        let hit = (center - self.target).length() < 1e-4;
        Ok(hit.then_some(ObstacleRef {
            id: 0,
            center: self.target,
        }))
    }
}

#[test]
fn test_blocked_destination_commits_last_clear_sample() {
    let tuning = MotionTuning::default();
    let start = Vec2::new(1.0, 1.0);
    let speed = Vec2::new(6.0, 3.0);
    let dt = 0.5;
    let world = BlockedAt {
        target: start + speed * dt,
    };
    let out = resolve_move(&world, start, speed, dt, &tuning).unwrap();
    let last_sample = start.lerp(world.target, 9.0 / 10.0);
    assert!((out.position - last_sample).length() < 1e-5);
    assert_ne!(out.position, start);
}

#[test]
fn test_actors_tick_in_parallel_on_shared_world() {
    let world = flat_room();
    let run = |x: f32, dir: f32| {
        let mut driver = Driver::new(Vec2::new(x, 5.0));
        for _ in 0..120 {
            driver.step(&world, axis(dir));
        }
        *driver.actor.state()
    };

    let (a, b) = std::thread::scope(|s| {
        let a = s.spawn(|| run(8.0, 1.0));
        let b = s.spawn(|| run(18.0, -1.0));
        (a.join().unwrap(), b.join().unwrap())
    });

    // Same result as ticking them one after another
    assert_eq!(a, run(8.0, 1.0));
    assert_eq!(b, run(18.0, -1.0));
    assert!(a.grounded() && b.grounded());
}
