//! Acceleration models
//!
//! One strategy per locomotion mode. Models are pure: they read a
//! [`MotionContext`] snapshot and return a [`MotionDelta`] for the caller to
//! apply to the body. Actions that also change mode (jumps, wall kicks,
//! push-offs) are exposed as free functions returning the impulse only; the
//! state machine owns the transition.

use glam::Vec3;

use crate::physics::{
    DIRECTION_EPSILON, ForceMode, angle_deg, horizontal, move_towards, rotate_to_plane,
    with_horizontal,
};

use super::config::LocomotionConfig;

/// Input components below this are treated as absent on an air axis.
const AXIS_INPUT_EPSILON: f32 = 0.001;

/// Minimum correction before the wall-run force saturates to full strength.
const WALLRUN_SATURATION: f32 = 0.2;

/// Slope correction is skipped on surfaces steeper than this normal.y.
const SLOPE_NORMAL_MIN_Y: f32 = 0.01;

/// Forces and impulses produced by a model for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionDelta {
    /// Continuous acceleration, integrated over the step
    pub acceleration: Vec3,
    /// Instantaneous velocity change
    pub velocity_change: Vec3,
}

impl MotionDelta {
    pub const ZERO: Self = Self {
        acceleration: Vec3::ZERO,
        velocity_change: Vec3::ZERO,
    };

    pub fn acceleration(acceleration: Vec3) -> Self {
        Self {
            acceleration,
            velocity_change: Vec3::ZERO,
        }
    }

    pub fn velocity_change(velocity_change: Vec3) -> Self {
        Self {
            acceleration: Vec3::ZERO,
            velocity_change,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.acceleration == Vec3::ZERO && self.velocity_change == Vec3::ZERO
    }

    /// Non-zero parts paired with their force modes, in application order.
    pub fn forces(&self) -> impl Iterator<Item = (Vec3, ForceMode)> {
        [
            (self.velocity_change, ForceMode::VelocityChange),
            (self.acceleration, ForceMode::Acceleration),
        ]
        .into_iter()
        .filter(|(v, _)| *v != Vec3::ZERO)
    }
}

/// Snapshot a model reads for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionContext {
    pub velocity: Vec3,
    /// World-space wish direction, zero below the deadzone
    pub wish: Vec3,
    pub ground_normal: Vec3,
    pub gravity: Vec3,
    pub dt: f32,
    /// Heading axes (horizontal, unit length)
    pub right: Vec3,
    pub forward: Vec3,
    pub sprint: bool,
    pub crouch: bool,
    /// Capsule top to wall hit point; only meaningful while wall-running
    pub wall_offset: Vec3,
    /// Only meaningful while wall-running
    pub wallrun_remaining: f32,
}

impl MotionContext {
    /// Context with no input, flat ground and default heading.
    pub fn at_rest(velocity: Vec3, gravity: Vec3, dt: f32) -> Self {
        Self {
            velocity,
            wish: Vec3::ZERO,
            ground_normal: Vec3::Y,
            gravity,
            dt,
            right: Vec3::X,
            forward: Vec3::NEG_Z,
            sprint: false,
            crouch: false,
            wall_offset: Vec3::ZERO,
            wallrun_remaining: 0.0,
        }
    }
}

/// Per-mode acceleration strategy.
pub trait AccelerationModel {
    fn accelerate(&self, ctx: &MotionContext) -> MotionDelta;
}

/// Ground movement: friction braking without input, proportional
/// acceleration toward the wish velocity with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkingModel {
    pub speed: f32,
    pub run_speed: f32,
    pub acceleration: f32,
    pub friction: f32,
    pub stop_speed: f32,
    pub deadzone: f32,
}

impl WalkingModel {
    pub fn from_config(config: &LocomotionConfig) -> Self {
        Self {
            speed: config.ground.speed,
            run_speed: config.ground.run_speed,
            acceleration: config.ground.acceleration,
            friction: config.ground.friction,
            stop_speed: config.ground.stop_speed,
            deadzone: config.input.deadzone,
        }
    }
}

impl AccelerationModel for WalkingModel {
    fn accelerate(&self, ctx: &MotionContext) -> MotionDelta {
        let horiz = horizontal(ctx.velocity);
        let wish_mag = ctx.wish.length();

        if wish_mag < self.deadzone {
            let mut braked = move_towards(horiz, Vec3::ZERO, self.friction * ctx.dt);
            if braked.length() < self.stop_speed {
                braked = Vec3::ZERO;
            }
            return MotionDelta::velocity_change(braked - horiz);
        }

        let max_speed = if ctx.sprint { self.run_speed } else { self.speed };
        let target = ctx.wish / wish_mag * max_speed;
        let mut force = (target - horiz) * self.acceleration;

        let n = ctx.ground_normal;
        if n.y > SLOPE_NORMAL_MIN_Y {
            force += horizontal(n * ctx.gravity.y / n.y);
        }
        MotionDelta::acceleration(force)
    }
}

/// Air strafing with per-axis caps and fast-fall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirModel {
    pub speed: f32,
    pub acceleration: f32,
    pub fast_fall_acceleration: f32,
    pub fast_fall_max_speed: f32,
}

impl AirModel {
    pub fn from_config(config: &LocomotionConfig) -> Self {
        Self {
            speed: config.air.speed,
            acceleration: config.air.acceleration,
            fast_fall_acceleration: config.air.fast_fall_acceleration,
            fast_fall_max_speed: config.air.fast_fall_max_speed,
        }
    }

    /// Velocity change along one heading axis, capped at `max_axis_speed`.
    fn accel_axis(&self, velocity: Vec3, axis: Vec3, input: f32, max_axis_speed: f32, dt: f32) -> Vec3 {
        if input.abs() < AXIS_INPUT_EPSILON {
            return Vec3::ZERO;
        }
        let axis = horizontal(axis);
        if axis.length_squared() < DIRECTION_EPSILON {
            return Vec3::ZERO;
        }
        let axis = axis.normalize() * input.signum();

        let current = horizontal(velocity).dot(axis);
        let mut accel = self.acceleration * dt;
        if current + accel > max_axis_speed {
            accel = (max_axis_speed - current).max(0.0);
        }
        axis * accel
    }
}

impl AccelerationModel for AirModel {
    fn accelerate(&self, ctx: &MotionContext) -> MotionDelta {
        let mut delta = MotionDelta::ZERO;

        if ctx.crouch && ctx.velocity.y > -self.fast_fall_max_speed {
            delta.acceleration.y -= self.fast_fall_acceleration;
        }

        let keep_speed = horizontal(ctx.velocity).length();

        let local = Vec3::new(ctx.wish.dot(ctx.right), 0.0, ctx.wish.dot(ctx.forward));
        let mag = local.length();
        if mag < DIRECTION_EPSILON {
            return delta;
        }
        let local = local / mag;

        let has_strafe = local.x.abs() > AXIS_INPUT_EPSILON;
        let has_forward = local.z.abs() > AXIS_INPUT_EPSILON;
        let strafe_cap = if has_strafe && has_forward {
            self.speed * 0.5
        } else {
            self.speed
        };

        let mut velocity = ctx.velocity;
        velocity += self.accel_axis(velocity, ctx.right, local.x, strafe_cap, ctx.dt);
        velocity += self.accel_axis(velocity, ctx.forward, local.z, self.speed, ctx.dt);

        let steered = horizontal(velocity);
        if keep_speed > DIRECTION_EPSILON && steered.length() > keep_speed {
            velocity = with_horizontal(velocity, steered.normalize() * keep_speed);
        }

        delta.velocity_change = velocity - ctx.velocity;
        delta
    }
}

/// Running along a wall plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallrunModel {
    pub speed: f32,
    pub climb_speed: f32,
    pub acceleration: f32,
    pub run_time: f32,
    pub stickiness: f32,
    pub stick_distance: f32,
}

impl WallrunModel {
    pub fn from_config(config: &LocomotionConfig) -> Self {
        Self {
            speed: config.wall.speed,
            climb_speed: config.wall.climb_speed,
            acceleration: config.wall.acceleration,
            run_time: config.wall.run_time,
            stickiness: config.wall.stickiness,
            stick_distance: config.wall.stick_distance,
        }
    }

    /// Fraction of gravity cancelled with `remaining` seconds left.
    ///
    /// Full until the last third of the run, then linear down to zero.
    pub fn anti_gravity_factor(&self, remaining: f32) -> f32 {
        let taper = self.run_time / 3.0;
        if taper <= 0.0 {
            return 0.0;
        }
        (remaining / taper).clamp(0.0, 1.0)
    }
}

impl AccelerationModel for WallrunModel {
    fn accelerate(&self, ctx: &MotionContext) -> MotionDelta {
        let plane_normal = (-ctx.wall_offset)
            .try_normalize()
            .unwrap_or(ctx.ground_normal);

        let mut target = rotate_to_plane(ctx.wish, plane_normal) * self.speed;
        target.y = target.y.clamp(-self.climb_speed, self.climb_speed);

        let mut force = target - ctx.velocity;
        if force.length() > WALLRUN_SATURATION {
            force = force.normalize() * self.acceleration;
        }
        if ctx.velocity.y < 0.0 && target.y > 0.0 {
            force.y = 2.0 * self.acceleration;
        }

        let anti_gravity = -ctx.gravity * self.anti_gravity_factor(ctx.wallrun_remaining);

        let stick = if ctx.wall_offset.length() > self.stick_distance {
            Vec3::ZERO
        } else {
            ctx.wall_offset * self.stickiness
        };

        MotionDelta::acceleration(force + anti_gravity + stick)
    }
}

/// Vertical velocity change that tops vertical speed up to `up_speed`.
///
/// Never slows an already faster rise.
pub fn jump_impulse(velocity: Vec3, up_speed: f32) -> Vec3 {
    Vec3::new(0.0, (up_speed - velocity.y).max(0.0), 0.0)
}

/// Horizontal speed after a double-jump dash toward `wish`.
///
/// With `h` the current horizontal speed and `d` the dash speed:
/// - `h <= d`: `d`
/// - aligned (`dot > 0`): `d + (h - d) * dot`, keeping momentum in line with the wish
/// - reversing (`dot <= 0`): `d` lerped toward `d * d / h` by `-dot`
///
/// The reversal branch only runs with `h > d > 0` so it cannot divide by
/// a vanishing speed.
pub fn dash_magnitude(horizontal_velocity: Vec3, wish_dir: Vec3, dash_speed: f32) -> f32 {
    let h = horizontal_velocity.length();
    if h <= dash_speed || h < DIRECTION_EPSILON {
        return dash_speed;
    }
    let dot = wish_dir.dot(horizontal_velocity / h);
    if dot > 0.0 {
        dash_speed + (h - dash_speed) * dot
    } else {
        let floor = dash_speed * dash_speed / h;
        dash_speed + (floor - dash_speed) * -dot
    }
}

/// Velocity change for a double jump: jump impulse plus a horizontal dash.
///
/// Without wish input only the vertical part is applied.
pub fn double_jump_impulse(velocity: Vec3, wish: Vec3, up_speed: f32, dash_speed: f32) -> Vec3 {
    let mut change = jump_impulse(velocity, up_speed);
    let Some(wish_dir) = horizontal(wish).try_normalize() else {
        return change;
    };
    let horiz = horizontal(velocity);
    let dashed = wish_dir * dash_magnitude(horiz, wish_dir, dash_speed);
    change += dashed - horiz;
    change
}

/// Velocity change for jumping off a wall.
pub fn wall_kick_impulse(velocity: Vec3, wall_normal: Vec3, up_speed: f32, dash_speed: f32) -> Vec3 {
    let away = horizontal(wall_normal.normalize_or_zero() * dash_speed);
    jump_impulse(velocity, up_speed) + away
}

/// Velocity change for dropping off a wall (timeout or crouch).
pub fn push_off_impulse(wall_normal: Vec3, push_off_speed: f32) -> Vec3 {
    wall_normal * push_off_speed
}

/// Normalized camera roll while wall-running, in `[-1, 1]`.
///
/// Positive rolls toward the right. The value follows the side the wall is
/// on, scales with how vertical the wall is and ramps from half to full
/// strength over `ramp_time` seconds of running.
pub fn wallrun_camera_tilt(forward: Vec3, wall_normal: Vec3, elapsed: f32, ramp_time: f32) -> f32 {
    let Some(normal_h) = horizontal(wall_normal).try_normalize() else {
        return 0.0;
    };
    let side = horizontal(forward).normalize_or_zero().cross(normal_h).y;
    let steepness = (angle_deg(wall_normal, Vec3::Y) / 90.0).min(1.0);
    let ramp = if ramp_time > 0.0 {
        0.5 + 0.5 * (elapsed / ramp_time).clamp(0.0, 1.0)
    } else {
        1.0
    };
    (side * steepness * ramp).clamp(-1.0, 1.0)
}
