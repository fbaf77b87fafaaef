//! Motion State Machine
//!
//! Owns the per-character locomotion state and runs one fixed tick at a time:
//!
//! 1. Resize the capsule for crouching
//! 2. Fold the host's collision contacts (floor landing, wall-run entry, wall exit)
//! 3. Decay timers and recompute the banned wall normal
//! 4. Resolve grounded/mode from the ground sweep
//! 5. Set body damping for the mode
//! 6. Run the mode's acceleration model (including jumps and wall exits)
//!
//! Events fire synchronously at the transition that causes them.
//!
//! # Usage
//!
//! ```rust,ignore
//! use wallrun_engine::physics::{SimBody, StaticWorld};
//! use wallrun_engine::player::{ContactBatch, LocomotionConfig, MotionStateMachine};
//!
//! let mut controller = MotionStateMachine::spawn(LocomotionConfig::default(), &world, &body);
//! let mut contacts = ContactBatch::new();
//!
//! // Each fixed tick:
//! let report = controller.tick(&world, &mut body, &frame, &contacts, dt);
//! contacts = body.step(&world, dt).into();
//! ```

use glam::Vec3;

use crate::input::InputFrame;
use crate::physics::{CharacterBody, ColliderId, ForceMode, PhysicsQuery, QueryHit, angle_deg};

use super::acceleration::{
    AccelerationModel, AirModel, MotionContext, MotionDelta, WalkingModel, WallrunModel,
    double_jump_impulse, jump_impulse, push_off_impulse, wall_kick_impulse, wallrun_camera_tilt,
};
use super::config::LocomotionConfig;
use super::crouch::{CapsuleShape, CrouchController};
use super::events::{EventBus, LocomotionEvent};
use super::sensor::{ContactBatch, ContactVerdict, GroundWallSensor};
use super::timers::TimerBank;

/// Locomotion mode. Exactly one is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Walking,
    Flying,
    Wallrunning,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Mode::Walking => "walking",
            Mode::Flying => "flying",
            Mode::Wallrunning => "wallrunning",
        })
    }
}

/// Mutable per-character state, owned by [`MotionStateMachine`].
#[derive(Debug, Clone, PartialEq)]
pub struct MotionState {
    pub mode: Mode,
    /// Body velocity, kept current as impulses are applied during a tick
    pub velocity: Vec3,
    /// Capsule center
    pub position: Vec3,
    /// Normal of the last floor or wall touched
    pub ground_normal: Vec3,
    pub ground_contact: Option<ColliderId>,
    pub wall_contact: Option<ColliderId>,
    /// Normal of the wall just abandoned, zero when no wall is banned
    pub banned_ground_normal: Vec3,
    /// Touching floor (walking) or wall (wall-running)
    pub grounded: bool,
    /// Seconds spent in the current wall-run
    pub wallrun_elapsed: f32,
}

impl MotionState {
    fn new(position: Vec3) -> Self {
        Self {
            mode: Mode::Flying,
            velocity: Vec3::ZERO,
            position,
            ground_normal: Vec3::Y,
            ground_contact: None,
            wall_contact: None,
            banned_ground_normal: Vec3::ZERO,
            grounded: false,
            wallrun_elapsed: 0.0,
        }
    }
}

/// Summary of one tick for hosts that poll instead of subscribing.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Mode at the end of the tick
    pub mode: Mode,
    /// Camera roll sent to the tilt sinks this tick
    pub tilt: f32,
    /// Events fired this tick, in order
    pub events: Vec<LocomotionEvent>,
}

impl TickReport {
    pub fn fired(&self, event: LocomotionEvent) -> bool {
        self.events.contains(&event)
    }
}

/// First-person locomotion controller for one character.
#[derive(Debug)]
pub struct MotionStateMachine {
    config: LocomotionConfig,
    sensor: GroundWallSensor,
    walking: WalkingModel,
    air: AirModel,
    wallrun: WallrunModel,
    state: MotionState,
    timers: TimerBank,
    crouch: CrouchController,
    events: EventBus,
    fired: Vec<LocomotionEvent>,
}

impl MotionStateMachine {
    /// Create the controller for a character whose body already exists.
    ///
    /// The starting mode comes from a ground check at the body's position.
    pub fn spawn<Q, B>(config: LocomotionConfig, world: &Q, body: &B) -> Self
    where
        Q: PhysicsQuery,
        B: CharacterBody,
    {
        debug_assert!(config.validate().is_ok(), "invalid locomotion config");

        let mut machine = Self {
            sensor: GroundWallSensor::from_config(&config),
            walking: WalkingModel::from_config(&config),
            air: AirModel::from_config(&config),
            wallrun: WallrunModel::from_config(&config),
            state: MotionState::new(body.position()),
            timers: TimerBank::new(),
            crouch: CrouchController::new(&config.capsule),
            events: EventBus::new(),
            fired: Vec::new(),
            config,
        };
        machine.state.velocity = body.velocity();
        machine.initial_ground_check(world);
        machine
    }

    /// Put the character back at `position` with fresh state.
    ///
    /// Velocity and timers are cleared and the spawn ground check is re-run.
    /// Subscribers are kept.
    pub fn respawn<Q, B>(&mut self, world: &Q, body: &mut B, position: Vec3)
    where
        Q: PhysicsQuery,
        B: CharacterBody,
    {
        self.crouch.reset();
        body.set_capsule_height(self.config.capsule.standing_height);
        body.teleport(position);

        self.state = MotionState::new(body.position());
        self.timers.reset();
        self.fired.clear();
        self.initial_ground_check(world);
        log::info!("respawned at {:?} ({})", self.state.position, self.state.mode);
    }

    fn initial_ground_check<Q: PhysicsQuery>(&mut self, world: &Q) {
        match self.check_ground(world) {
            Some(hit) => {
                self.record_ground_hit(&hit);
                self.state.grounded = true;
                self.state.mode = Mode::Walking;
            }
            None => {
                self.state.grounded = false;
                self.state.mode = Mode::Flying;
            }
        }
    }

    // ---- accessors ----

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn state(&self) -> &MotionState {
        &self.state
    }

    pub fn timers(&self) -> &TimerBank {
        &self.timers
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn capsule(&self) -> CapsuleShape {
        self.crouch.shape()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Subscribe to events and tilt through the returned bus.
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    // ---- tick ----

    /// Advance the controller by one fixed step.
    ///
    /// `contacts` are the collision callbacks the host gathered since the
    /// previous tick. Forces are applied to `body`; the host integrates them
    /// in its next physics step.
    pub fn tick<Q, B>(
        &mut self,
        world: &Q,
        body: &mut B,
        input: &InputFrame,
        contacts: &ContactBatch,
        dt: f32,
    ) -> TickReport
    where
        Q: PhysicsQuery,
        B: CharacterBody,
    {
        self.fired.clear();
        let dt = dt.max(0.0);

        let capsule = self.crouch.update(dt, input.crouch_held);
        body.set_capsule_height(capsule.height);
        self.state.position = body.position();
        self.state.velocity = body.velocity();

        self.fold_contacts(world, contacts);

        let wallrunning = self.state.mode == Mode::Wallrunning;
        self.timers.decay(dt, wallrunning && !self.on_infinite_wall(world));
        if wallrunning {
            self.state.wallrun_elapsed += dt;
        }

        self.state.banned_ground_normal = if self.timers.wall_stick() == 0.0 && self.timers.wall_ban() > 0.0 {
            self.state.ground_normal
        } else {
            Vec3::ZERO
        };

        self.update_ground_and_mode(world);
        self.apply_damping(body);

        let tilt = match self.state.mode {
            Mode::Wallrunning => {
                let tilt = wallrun_camera_tilt(
                    input.forward(),
                    self.state.ground_normal,
                    self.state.wallrun_elapsed,
                    self.config.input.camera_tilt_ramp,
                );
                self.events.emit_tilt(tilt);
                self.wallrun_move(world, body, input, dt);
                tilt
            }
            Mode::Walking => {
                self.events.emit_tilt(0.0);
                self.walk(world, body, input, dt);
                0.0
            }
            Mode::Flying => {
                self.events.emit_tilt(0.0);
                self.air_move(body, input, dt);
                0.0
            }
        };

        log::trace!(
            "tick mode={} v={:?} normal={:?} remaining={:.3}",
            self.state.mode,
            self.state.velocity,
            self.state.ground_normal,
            self.timers.wallrun_remaining()
        );

        TickReport {
            mode: self.state.mode,
            tilt,
            events: self.fired.clone(),
        }
    }

    // ---- contacts and grounding ----

    fn fold_contacts<Q: PhysicsQuery>(&mut self, world: &Q, contacts: &ContactBatch) {
        let left_wall = self.state.mode == Mode::Wallrunning
            && self
                .state
                .wall_contact
                .is_some_and(|wall| contacts.exited.contains(&wall));
        if left_wall {
            log::debug!("lost contact with wall {:?}", self.state.wall_contact);
            self.state.grounded = false;
            self.timers.penalize_wall_stick(self.config.wall.stick_penalty);
            self.enter_flying(world, true);
        }

        let walking = self.state.mode == Mode::Walking;
        match self.sensor.fold_contacts(world, &contacts.samples, walking) {
            ContactVerdict::Floor(contact) => {
                self.state.ground_normal = contact.normal;
                self.state.ground_contact = Some(contact.collider);
                if !self.timers.is_ignoring_ground() {
                    self.state.grounded = true;
                    self.enter_walking();
                }
            }
            ContactVerdict::Wall(contact) => {
                self.state.grounded = true;
                self.state.ground_normal = contact.normal;
                self.state.wall_contact = Some(contact.collider);
                self.enter_wallrun(world);
            }
            ContactVerdict::None => {}
        }
    }

    fn update_ground_and_mode<Q: PhysicsQuery>(&mut self, world: &Q) {
        if self.state.mode == Mode::Wallrunning {
            if self.timers.is_ignoring_ground() {
                return;
            }
            if let Some(hit) = self.check_ground(world) {
                self.record_ground_hit(&hit);
                self.state.grounded = true;
                self.enter_walking();
            }
            return;
        }

        if self.timers.is_ignoring_ground() {
            self.state.grounded = false;
            if self.state.mode == Mode::Walking {
                self.enter_flying(world, true);
            }
            return;
        }

        match self.check_ground(world) {
            Some(hit) => {
                self.record_ground_hit(&hit);
                self.state.grounded = true;
                self.enter_walking();
            }
            None => {
                self.state.grounded = false;
                self.enter_flying(world, false);
            }
        }
    }

    fn check_ground<Q: PhysicsQuery>(&self, world: &Q) -> Option<QueryHit> {
        self.sensor
            .check_ground(world, self.state.position, self.crouch.shape())
    }

    fn record_ground_hit(&mut self, hit: &QueryHit) {
        self.state.ground_normal = hit.normal;
        self.state.ground_contact = Some(hit.collider);
    }

    fn on_infinite_wall<Q: PhysicsQuery>(&self, world: &Q) -> bool {
        self.state
            .wall_contact
            .is_some_and(|wall| world.collider_tags(wall).infinite_wallrun)
    }

    /// Distance to the wall being run on, infinite if it is lost.
    ///
    /// A successful probe refreshes the ground normal.
    fn wall_distance<Q: PhysicsQuery>(&mut self, world: &Q) -> f32 {
        match self.sensor.vector_to_wall(
            world,
            self.state.position,
            self.crouch.shape(),
            self.state.ground_normal,
            self.state.wall_contact,
        ) {
            Some(probe) => {
                self.state.ground_normal = probe.normal;
                probe.offset.length()
            }
            None => f32::INFINITY,
        }
    }

    fn can_run_on_this_wall(&self) -> bool {
        angle_deg(self.state.banned_ground_normal, self.state.ground_normal)
            > self.config.sensing.wall_reentry_angle
            || self.timers.wall_ban() == 0.0
    }

    fn apply_damping<B: CharacterBody>(&self, body: &mut B) {
        let damping = if self.state.mode == Mode::Walking && self.state.grounded {
            self.config.ground.damping
        } else {
            self.config.air.damping
        };
        body.set_linear_damping(damping);
    }

    // ---- transitions ----

    fn fire(&mut self, event: LocomotionEvent) {
        log::debug!("event {}", event);
        self.fired.push(event);
        self.events.emit(event);
    }

    fn set_mode(&mut self, mode: Mode) {
        log::debug!("mode {} -> {}", self.state.mode, mode);
        self.state.mode = mode;
    }

    fn enter_walking(&mut self) {
        match self.state.mode {
            Mode::Walking => return,
            Mode::Wallrunning => {
                self.timers.end_wallrun();
                self.fire(LocomotionEvent::EndWallRun);
            }
            Mode::Flying => {}
        }
        self.fire(LocomotionEvent::StartWalking);
        self.set_mode(Mode::Walking);
    }

    /// Switch to flying.
    ///
    /// Without `explicit`, a wall-run survives while the wall is still
    /// within stick distance. The ground sweep is the only non-explicit
    /// caller and it returns early while wall-running, so today every exit
    /// from a wall-run is explicit and this branch only guards future callers.
    fn enter_flying<Q: PhysicsQuery>(&mut self, world: &Q, explicit: bool) {
        match self.state.mode {
            Mode::Flying => return,
            Mode::Wallrunning => {
                if !explicit && self.wall_distance(world) < self.config.wall.stick_distance {
                    return;
                }
                self.timers.end_wallrun();
                self.fire(LocomotionEvent::EndWallRun);
            }
            Mode::Walking => {}
        }
        self.timers.ban_wall(self.config.wall.ban_time);
        self.timers.grant_double_jump();
        self.set_mode(Mode::Flying);
    }

    fn enter_wallrun<Q: PhysicsQuery>(&mut self, world: &Q) {
        if self.state.mode == Mode::Wallrunning {
            return;
        }

        let min_height = self.config.wall.min_height;
        let clear_of_ground = self
            .sensor
            .vector_to_ground(world, self.state.position)
            .is_none_or(|offset| offset.length() > min_height);

        if clear_of_ground && self.can_run_on_this_wall() && self.timers.wall_stick() == 0.0 {
            self.fire(LocomotionEvent::StartWallRun);
            self.timers.start_wallrun(self.config.wall.run_time);
            self.timers.grant_double_jump();
            self.state.wallrun_elapsed = 0.0;
            self.set_mode(Mode::Wallrunning);
        } else {
            self.enter_flying(world, true);
        }
    }

    // ---- per-mode movement ----

    fn context(&self, body_gravity: Vec3, input: &InputFrame, dt: f32) -> MotionContext {
        MotionContext {
            velocity: self.state.velocity,
            wish: input.wish_direction,
            ground_normal: self.state.ground_normal,
            gravity: body_gravity,
            dt,
            right: input.right(),
            forward: input.forward(),
            sprint: input.sprint_held,
            crouch: input.crouch_held,
            wall_offset: Vec3::ZERO,
            wallrun_remaining: self.timers.wallrun_remaining(),
        }
    }

    fn apply<B: CharacterBody>(&mut self, body: &mut B, delta: MotionDelta) {
        for (force, mode) in delta.forces() {
            body.add_force(force, mode);
            if mode == ForceMode::VelocityChange {
                self.state.velocity += force;
            }
        }
    }

    fn walk<Q, B>(&mut self, world: &Q, body: &mut B, input: &InputFrame, dt: f32)
    where
        Q: PhysicsQuery,
        B: CharacterBody,
    {
        if input.jump_pressed && self.try_jump(world, body) {
            return;
        }
        let ctx = self.context(body.gravity(), input, dt);
        let delta = self.walking.accelerate(&ctx);
        self.apply(body, delta);
    }

    /// Ground jump. A no-op returning `false` unless walking with the jump
    /// cooldown elapsed.
    fn try_jump<Q, B>(&mut self, world: &Q, body: &mut B) -> bool
    where
        Q: PhysicsQuery,
        B: CharacterBody,
    {
        if self.state.mode != Mode::Walking || !self.timers.can_jump() {
            return false;
        }
        let impulse = jump_impulse(self.state.velocity, self.config.jump.up_speed);
        self.apply(body, MotionDelta::velocity_change(impulse));

        self.timers.ignore_ground_for(self.config.jump.ignore_ground_after_jump);
        self.timers.start_jump_cooldown(self.config.jump.cooldown);
        log::debug!("jump, vy={:.2}", self.state.velocity.y);
        self.fire(LocomotionEvent::Jump);
        self.enter_flying(world, true);
        true
    }

    fn air_move<B: CharacterBody>(&mut self, body: &mut B, input: &InputFrame, dt: f32) {
        if input.jump_pressed && !input.crouch_held && self.timers.consume_double_jump() {
            let impulse = double_jump_impulse(
                self.state.velocity,
                input.wish_direction,
                self.config.jump.up_speed,
                self.config.jump.dash_speed,
            );
            self.apply(body, MotionDelta::velocity_change(impulse));
            self.timers.ignore_ground_for(self.config.jump.ignore_ground_after_jump);
            log::debug!("double jump, v={:?}", self.state.velocity);
            self.fire(LocomotionEvent::DoubleJump);
        }

        let ctx = self.context(body.gravity(), input, dt);
        let delta = self.air.accelerate(&ctx);
        self.apply(body, delta);
    }

    fn wallrun_move<Q, B>(&mut self, world: &Q, body: &mut B, input: &InputFrame, dt: f32)
    where
        Q: PhysicsQuery,
        B: CharacterBody,
    {
        if input.jump_pressed {
            let impulse = wall_kick_impulse(
                self.state.velocity,
                self.state.ground_normal,
                self.config.jump.up_speed,
                self.config.jump.dash_speed,
            );
            self.apply(body, MotionDelta::velocity_change(impulse));
            log::debug!("wall kick off {:?}", self.state.wall_contact);
            self.timers.end_wallrun();
            self.enter_flying(world, true);
            return;
        }

        if self.timers.wallrun_remaining() <= 0.0 || input.crouch_held {
            let impulse = push_off_impulse(self.state.ground_normal, self.config.wall.push_off_speed);
            self.apply(body, MotionDelta::velocity_change(impulse));
            log::debug!(
                "wall-run over ({})",
                if input.crouch_held { "crouch" } else { "timeout" }
            );
            self.enter_flying(world, true);
            return;
        }

        let Some(probe) = self.sensor.vector_to_wall(
            world,
            self.state.position,
            self.crouch.shape(),
            self.state.ground_normal,
            self.state.wall_contact,
        ) else {
            log::debug!("wall lost mid-run");
            self.timers.penalize_wall_stick(self.config.wall.stick_penalty);
            self.enter_flying(world, true);
            return;
        };
        self.state.ground_normal = probe.normal;

        let mut ctx = self.context(body.gravity(), input, dt);
        ctx.ground_normal = probe.normal;
        ctx.wall_offset = probe.offset;
        let delta = self.wallrun.accelerate(&ctx);
        self.apply(body, delta);
    }
}
