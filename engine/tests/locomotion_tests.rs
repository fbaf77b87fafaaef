//! Locomotion Tests - Full Controller Against the Reference Physics
//!
//! Runs MotionStateMachine with SimBody stepping inside a StaticWorld, the
//! same loop the simulation binary uses: tick the controller, then step the
//! body and feed its contacts into the next tick.

use glam::{Vec2, Vec3};
use wallrun_engine::input::InputFrame;
use wallrun_engine::physics::{CharacterBody, ColliderTags, SimBody, StaticWorld};
use wallrun_engine::player::{
    ContactBatch, LocomotionConfig, LocomotionEvent, Mode, MotionStateMachine, TickReport,
};

const DT: f32 = 0.02;

/// Controller, body and pending contacts driven together.
struct Harness {
    world: StaticWorld,
    body: SimBody,
    controller: MotionStateMachine,
    contacts: ContactBatch,
    events: Vec<(u32, LocomotionEvent)>,
    tick: u32,
}

impl Harness {
    fn new(world: StaticWorld, body: SimBody) -> Self {
        Self::with_config(world, body, LocomotionConfig::default())
    }

    fn with_config(world: StaticWorld, body: SimBody, config: LocomotionConfig) -> Self {
        let controller = MotionStateMachine::spawn(config, &world, &body);
        Self {
            world,
            body,
            controller,
            contacts: ContactBatch::new(),
            events: Vec::new(),
            tick: 0,
        }
    }

    fn step(&mut self, input: &InputFrame) -> TickReport {
        let report = self
            .controller
            .tick(&self.world, &mut self.body, input, &self.contacts, DT);
        self.contacts = self.body.step(&self.world, DT).into();
        for event in &report.events {
            self.events.push((self.tick, *event));
        }
        self.tick += 1;
        report
    }

    /// Step until `done` holds or `max_ticks` pass. Returns whether it held.
    fn run_until(
        &mut self,
        max_ticks: u32,
        mut input: impl FnMut(u32) -> InputFrame,
        mut done: impl FnMut(&Self, &TickReport) -> bool,
    ) -> bool {
        for i in 0..max_ticks {
            let frame = input(i);
            let report = self.step(&frame);
            if done(self, &report) {
                return true;
            }
        }
        false
    }

    fn event_kinds(&self) -> Vec<LocomotionEvent> {
        self.events.iter().map(|(_, e)| *e).collect()
    }

    fn horizontal_speed(&self) -> f32 {
        let v = self.body.velocity();
        Vec2::new(v.x, v.z).length()
    }
}

fn input(axes: Vec2) -> InputFrame {
    InputFrame::from_axes(axes, 0.0, false, false, false, &LocomotionConfig::default().input)
}

fn floor_world() -> StaticWorld {
    let mut world = StaticWorld::new();
    world.add_floor(0.0, 100.0);
    world
}

/// Floor plus a long wall on the +X side occupying x in [1, 2].
fn wall_world() -> StaticWorld {
    let mut world = floor_world();
    world.add_box_with(
        Vec3::new(1.0, 0.0, -200.0),
        Vec3::new(2.0, 40.0, 20.0),
        ColliderTags::NONE,
        1,
    );
    world
}

/// Airborne next to the wall, drifting into it.
fn body_beside_wall() -> SimBody {
    let mut body = SimBody::new(Vec3::new(0.45, 8.0, 0.0), 0.5, 1.8);
    body.set_velocity(Vec3::new(1.5, 0.0, -6.0));
    body
}

fn start_wallrun(harness: &mut Harness) {
    let entered = harness.run_until(
        30,
        |_| input(Vec2::Y),
        |_, report| report.mode == Mode::Wallrunning,
    );
    assert!(entered, "never started wall-running: {:?}", harness.events);
}

// ============================================================================
// Walking
// ============================================================================

#[test]
fn test_idle_on_floor_stays_walking() {
    let mut h = Harness::new(floor_world(), SimBody::standing_on(0.0, 0.0, 0.0, 0.5, 1.8));
    assert_eq!(h.controller.mode(), Mode::Walking);

    for _ in 0..100 {
        let report = h.step(&InputFrame::idle(0.0));
        assert_eq!(report.mode, Mode::Walking);
    }
    assert!(h.events.is_empty());
    assert!((h.body.position().y - 0.9).abs() < 0.02);
    assert!(h.horizontal_speed() < 1e-4);
}

#[test]
fn test_walk_and_sprint_speeds() {
    let config = LocomotionConfig::default();
    let mut h = Harness::new(floor_world(), SimBody::standing_on(0.0, 0.0, 0.0, 0.5, 1.8));
    for _ in 0..150 {
        h.step(&input(Vec2::Y));
    }
    let walk = h.horizontal_speed();
    assert!(walk > 7.0 && walk <= config.ground.speed + 1e-3, "walk speed {walk}");
    // Forward is -Z at yaw 0
    assert!(h.body.velocity().z < 0.0);

    let sprint_frame = InputFrame::from_axes(Vec2::Y, 0.0, false, false, true, &config.input);
    for _ in 0..150 {
        h.step(&sprint_frame);
    }
    let sprint = h.horizontal_speed();
    assert!(sprint > walk + 3.0, "sprint {sprint} vs walk {walk}");
    assert!(sprint <= config.ground.run_speed + 1e-3);
}

#[test]
fn test_releasing_input_brakes_to_zero() {
    let mut h = Harness::new(floor_world(), SimBody::standing_on(0.0, 0.0, 0.0, 0.5, 1.8));
    for _ in 0..100 {
        h.step(&input(Vec2::Y));
    }
    let speed = h.horizontal_speed();
    let friction = h.controller.config().ground.friction;
    let max_ticks = (speed / (friction * DT)).ceil() as u32;

    for _ in 0..max_ticks {
        h.step(&InputFrame::idle(0.0));
    }
    assert_eq!(h.horizontal_speed(), 0.0);
    assert_eq!(h.controller.mode(), Mode::Walking);
}

#[test]
fn test_crouch_shrinks_capsule_and_stays_grounded() {
    let mut h = Harness::new(floor_world(), SimBody::standing_on(0.0, 0.0, 0.0, 0.5, 1.8));
    let mut crouch = InputFrame::idle(0.0);
    crouch.crouch_held = true;

    for _ in 0..30 {
        let report = h.step(&crouch);
        assert_eq!(report.mode, Mode::Walking);
    }
    assert!((h.body.height() - 0.6).abs() < 1e-4);
    assert!((h.controller.capsule().height - 0.6).abs() < 1e-4);

    for _ in 0..30 {
        h.step(&InputFrame::idle(0.0));
    }
    assert!((h.body.height() - 1.8).abs() < 1e-4);
}

// ============================================================================
// Jumping
// ============================================================================

#[test]
fn test_jump_and_land() {
    let mut h = Harness::new(floor_world(), SimBody::standing_on(0.0, 0.0, 0.0, 0.5, 1.8));
    h.step(&InputFrame::idle(0.0));

    let report = h.step(&InputFrame::idle(0.0).with_jump());
    assert_eq!(report.mode, Mode::Flying);
    assert_eq!(report.events, vec![LocomotionEvent::Jump]);

    let mut apex = 0.0f32;
    let landed = h.run_until(
        400,
        |_| InputFrame::idle(0.0),
        |h, report| {
            apex = apex.max(h.body.position().y);
            report.mode == Mode::Walking
        },
    );
    assert!(landed);
    // v^2 / 2g above the standing center
    assert!(apex > 0.9 + 12.0, "apex {apex}");
    assert_eq!(
        h.event_kinds(),
        vec![LocomotionEvent::Jump, LocomotionEvent::StartWalking]
    );
}

#[test]
fn test_double_jump_once_per_flight() {
    let mut h = Harness::new(floor_world(), SimBody::standing_on(0.0, 0.0, 0.0, 0.5, 1.8));
    h.step(&InputFrame::idle(0.0).with_jump());

    for _ in 0..20 {
        h.step(&InputFrame::idle(0.0));
    }
    let jump = InputFrame::idle(0.0).with_jump();
    let first = h.step(&jump);
    assert!(first.fired(LocomotionEvent::DoubleJump));
    assert!((h.body.velocity().y - 16.0).abs() < 0.5);

    for _ in 0..10 {
        let report = h.step(&jump);
        assert!(!report.fired(LocomotionEvent::DoubleJump));
    }

    let landed = h.run_until(600, |_| InputFrame::idle(0.0), |_, r| r.mode == Mode::Walking);
    assert!(landed);

    // A fresh flight grants a fresh double jump
    h.step(&InputFrame::idle(0.0).with_jump());
    for _ in 0..20 {
        h.step(&InputFrame::idle(0.0));
    }
    assert!(h.step(&jump).fired(LocomotionEvent::DoubleJump));
}

#[test]
fn test_no_input_air_is_ballistic() {
    let world = floor_world();
    let mut body = SimBody::new(Vec3::new(0.0, 30.0, 0.0), 0.5, 1.8);
    body.set_velocity(Vec3::new(3.0, 0.0, -2.0));
    let mut h = Harness::new(world, body);
    assert_eq!(h.controller.mode(), Mode::Flying);

    for _ in 0..10 {
        h.step(&InputFrame::idle(0.0));
    }
    let v = h.body.velocity();
    assert!((v.x - 3.0).abs() < 1e-4);
    assert!((v.z + 2.0).abs() < 1e-4);
    assert!((v.y + 9.81 * 10.0 * DT).abs() < 1e-3);
}

// ============================================================================
// Wall-running
// ============================================================================

#[test]
fn test_wallrun_holds_altitude_then_times_out() {
    let mut h = Harness::new(wall_world(), body_beside_wall());
    assert_eq!(h.controller.mode(), Mode::Flying);
    start_wallrun(&mut h);
    let start_tick = h.tick;
    let start_y = h.body.position().y;

    // First half of the run: gravity is cancelled
    for _ in 0..50 {
        let report = h.step(&input(Vec2::Y));
        assert_eq!(report.mode, Mode::Wallrunning);
    }
    assert!(h.body.position().y > start_y - 1.0, "sank to {}", h.body.position().y);
    assert!(h.horizontal_speed() > 10.0);

    let left = h.run_until(200, |_| input(Vec2::Y), |_, r| r.mode != Mode::Wallrunning);
    assert!(left);
    let duration = (h.tick - start_tick) as f32 * DT;
    assert!(duration <= 3.0 + DT, "wall-run lasted {duration}s");

    let kinds = h.event_kinds();
    let start = kinds.iter().position(|e| *e == LocomotionEvent::StartWallRun);
    let end = kinds.iter().position(|e| *e == LocomotionEvent::EndWallRun);
    assert!(start.is_some() && end.is_some() && start < end);
}

#[test]
fn test_wall_kick_pushes_away() {
    let mut h = Harness::new(wall_world(), body_beside_wall());
    start_wallrun(&mut h);
    for _ in 0..10 {
        h.step(&input(Vec2::Y));
    }

    let report = h.step(&input(Vec2::Y).with_jump());
    assert_eq!(report.mode, Mode::Flying);
    assert!(report.fired(LocomotionEvent::EndWallRun));
    assert!(!report.fired(LocomotionEvent::Jump));
    let v = h.body.velocity();
    assert!(v.x < -4.0, "vx {}", v.x);
    assert!(v.y > 14.0, "vy {}", v.y);

    // The kick leaves a double jump available
    assert!(h.controller.timers().can_double_jump());
    for _ in 0..5 {
        let report = h.step(&input(Vec2::Y));
        assert_eq!(report.mode, Mode::Flying);
    }
}

#[test]
fn test_wallrun_tilt_reported_and_reset() {
    let mut h = Harness::new(wall_world(), body_beside_wall());
    start_wallrun(&mut h);

    let report = h.step(&input(Vec2::Y));
    assert!(report.tilt > 0.0, "wall on the right should roll right");

    let mut crouch = input(Vec2::Y);
    crouch.crouch_held = true;
    h.step(&crouch);
    let report = h.step(&input(Vec2::Y));
    assert_eq!(report.mode, Mode::Flying);
    assert_eq!(report.tilt, 0.0);
}

#[test]
fn test_tagged_wall_never_runs() {
    let mut world = floor_world();
    world.add_box_with(
        Vec3::new(1.0, 0.0, -200.0),
        Vec3::new(2.0, 40.0, 20.0),
        ColliderTags {
            no_wallrun: true,
            ..Default::default()
        },
        1,
    );
    let mut h = Harness::new(world, body_beside_wall());

    for _ in 0..60 {
        let report = h.step(&input(Vec2::Y));
        assert_ne!(report.mode, Mode::Wallrunning);
    }
}

// ============================================================================
// Invariants and lifecycle
// ============================================================================

#[test]
fn test_events_mirror_subscribers() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let mut h = Harness::new(wall_world(), body_beside_wall());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = Rc::clone(&seen);
    h.controller.events_mut().subscribe(move |e| s.borrow_mut().push(e));

    start_wallrun(&mut h);
    h.step(&input(Vec2::Y).with_jump());
    h.run_until(600, |_| InputFrame::idle(0.0), |_, r| r.mode == Mode::Walking);

    assert_eq!(*seen.borrow(), h.event_kinds());
    assert_eq!(seen.borrow().last(), Some(&LocomotionEvent::StartWalking));
}

#[test]
fn test_timers_never_negative() {
    let mut h = Harness::new(wall_world(), body_beside_wall());
    for i in 0..400u32 {
        let jump = i % 37 == 0;
        let mut frame = input(Vec2::new(0.3, 1.0));
        frame.jump_pressed = jump;
        h.step(&frame);

        let t = h.controller.timers();
        assert!(t.wall_ban() >= 0.0);
        assert!(t.wall_stick() >= 0.0);
        assert!(t.ignore_ground() >= 0.0);
        assert!(t.jump_cooldown() >= 0.0);
        assert!(t.wallrun_remaining() >= 0.0);
    }
}

#[test]
fn test_respawn_after_fall() {
    let mut h = Harness::new(floor_world(), SimBody::new(Vec3::new(0.0, 20.0, 0.0), 0.5, 1.8));
    for _ in 0..20 {
        h.step(&InputFrame::idle(0.0));
    }
    assert!(h.body.velocity().y < -3.0);

    h.controller
        .respawn(&h.world, &mut h.body, Vec3::new(5.0, 0.9, 5.0));
    h.contacts = ContactBatch::new();
    assert_eq!(h.controller.mode(), Mode::Walking);
    assert_eq!(h.body.velocity(), Vec3::ZERO);

    let report = h.step(&InputFrame::idle(0.0));
    assert_eq!(report.mode, Mode::Walking);
    assert!(report.events.is_empty());
}

#[test]
fn test_config_from_json_drives_controller() {
    let config = LocomotionConfig::from_json(r#"{ "jump": { "up_speed": 8.0 } }"#).unwrap();
    let mut h = Harness::with_config(
        floor_world(),
        SimBody::standing_on(0.0, 0.0, 0.0, 0.5, 1.8),
        config,
    );
    h.step(&InputFrame::idle(0.0).with_jump());

    // The jump tick still starts grounded, so ground damping applies to its step.
    let damping = h.controller.config().ground.damping;
    assert_eq!(h.body.linear_damping(), damping);
    let expected = (8.0 - 9.81 * DT) * (1.0 - damping * DT);
    assert!((h.body.velocity().y - expected).abs() < 1e-3, "vy = {}", h.body.velocity().y);
}
