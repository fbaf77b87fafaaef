//! Locomotion tuning
//!
//! All speeds, accelerations, thresholds and timer lengths used by the
//! controller. `Default` carries the shipped tuning; designers can override
//! any subset from a JSON file since every section is `#[serde(default)]`.
//!
//! # Example
//!
//! ```ignore
//! use wallrun_engine::player::LocomotionConfig;
//!
//! let config = LocomotionConfig::load(std::path::Path::new("tuning/wallrun.json"))?;
//! let faster = LocomotionConfig {
//!     ground: GroundConfig { run_speed: 20.0, ..config.ground },
//!     ..config
//! };
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use static_assertions::const_assert;

use crate::physics::ALL_LAYERS;

/// Default floor/wall classification threshold in degrees from world-up.
pub const DEFAULT_WALL_FLOOR_BARRIER: f32 = 40.0;

/// Contacts steeper than this (overhangs, ceilings) never count as walls.
pub const DEFAULT_WALL_CEILING_LIMIT: f32 = 120.0;

/// Minimum angle between a wall and the banned wall for a quick re-entry.
pub const DEFAULT_WALL_REENTRY_ANGLE: f32 = 10.0;

/// Maximum normal change while following a wall before it counts as lost.
pub const DEFAULT_WALL_FOLLOW_ANGLE: f32 = 70.0;

const_assert!(DEFAULT_WALL_FLOOR_BARRIER < DEFAULT_WALL_CEILING_LIMIT);
const_assert!(DEFAULT_WALL_FOLLOW_ANGLE < 90.0);

/// Walking on floor-like surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    /// Walking speed in m/s
    pub speed: f32,
    /// Sprinting speed in m/s
    pub run_speed: f32,
    /// Proportional gain toward the target velocity (1/s)
    pub acceleration: f32,
    /// Braking rate with no input (m/s per second)
    pub friction: f32,
    /// Below this horizontal speed braking hard-stops to zero (m/s)
    pub stop_speed: f32,
    /// Linear damping while grounded
    pub damping: f32,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            speed: 10.0,
            run_speed: 16.0,
            acceleration: 14.0,
            friction: 15.0,
            stop_speed: 0.08,
            damping: 2.0,
        }
    }
}

/// Air control while flying.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirConfig {
    /// Per-axis speed cap in m/s
    pub speed: f32,
    /// Per-axis acceleration in m/s^2
    pub acceleration: f32,
    /// Linear damping while airborne or wall-running
    pub damping: f32,
    /// Extra downward acceleration while crouching in the air (m/s^2)
    pub fast_fall_acceleration: f32,
    /// Fast-fall stops adding speed past this falling speed (m/s)
    pub fast_fall_max_speed: f32,
}

impl Default for AirConfig {
    fn default() -> Self {
        Self {
            speed: 6.0,
            acceleration: 20.0,
            damping: 0.0,
            fast_fall_acceleration: 20.0,
            fast_fall_max_speed: 10.0,
        }
    }
}

/// Jump, double jump and their debounce windows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    /// Vertical speed a jump tops the character up to (m/s)
    pub up_speed: f32,
    /// Horizontal dash speed for double jumps and wall kicks (m/s)
    pub dash_speed: f32,
    /// Time after a ground jump before the next one is allowed (s)
    pub cooldown: f32,
    /// Ground detection is suppressed for this long after jumping (s)
    pub ignore_ground_after_jump: f32,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            up_speed: 16.0,
            dash_speed: 6.0,
            cooldown: 0.2,
            ignore_ground_after_jump: 0.10,
        }
    }
}

/// Wall-running.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallrunConfig {
    /// Speed along the wall plane in m/s
    pub speed: f32,
    /// Vertical speed cap while climbing or sliding (m/s)
    pub climb_speed: f32,
    /// Corrective acceleration toward the target velocity (m/s^2)
    pub acceleration: f32,
    /// Duration of a wall-run before gravity takes over (s)
    pub run_time: f32,
    /// Gain of the force pulling the character onto the wall (1/s^2)
    pub stickiness: f32,
    /// Walls farther than this are treated as lost (m)
    pub stick_distance: f32,
    /// How long the wall just left stays banned (s)
    pub ban_time: f32,
    /// Re-entry lockout after losing the wall (s)
    pub stick_penalty: f32,
    /// Push away from the wall on timeout or crouch drop (m/s)
    pub push_off_speed: f32,
    /// Wall-runs never start this close to the ground (m)
    pub min_height: f32,
}

impl Default for WallrunConfig {
    fn default() -> Self {
        Self {
            speed: 18.0,
            climb_speed: 4.0,
            acceleration: 50.0,
            run_time: 3.0,
            stickiness: 20.0,
            stick_distance: 1.0,
            ban_time: 4.0,
            stick_penalty: 0.2,
            push_off_speed: 3.0,
            min_height: 0.2,
        }
    }
}

/// Ground and wall sensing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Floor/wall threshold in degrees from up
    pub wall_floor_barrier: f32,
    /// Upper limit for wall-like contacts in degrees from up
    pub wall_ceiling_limit: f32,
    /// See [`DEFAULT_WALL_REENTRY_ANGLE`]
    pub wall_reentry_angle: f32,
    /// See [`DEFAULT_WALL_FOLLOW_ANGLE`]
    pub wall_follow_angle: f32,
    /// Extra sweep distance below the capsule (m)
    pub ground_check_distance: f32,
    /// Sweep sphere radius as a fraction of the capsule radius
    pub ground_cast_radius_scale: f32,
    /// Layers considered ground by the sweep
    pub ground_mask: u32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            wall_floor_barrier: DEFAULT_WALL_FLOOR_BARRIER,
            wall_ceiling_limit: DEFAULT_WALL_CEILING_LIMIT,
            wall_reentry_angle: DEFAULT_WALL_REENTRY_ANGLE,
            wall_follow_angle: DEFAULT_WALL_FOLLOW_ANGLE,
            ground_check_distance: 0.8,
            ground_cast_radius_scale: 0.9,
            ground_mask: ALL_LAYERS,
        }
    }
}

/// Capsule dimensions and crouch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapsuleConfig {
    pub radius: f32,
    pub standing_height: f32,
    pub crouch_height: f32,
    /// Height change rate while crouching or standing up (m/s)
    pub crouch_rate: f32,
}

impl Default for CapsuleConfig {
    fn default() -> Self {
        Self {
            radius: 0.5,
            standing_height: 1.8,
            crouch_height: 0.6,
            crouch_rate: 10.0,
        }
    }
}

/// Input shaping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Stick/key magnitude below which input counts as none
    pub deadzone: f32,
    /// Forward input needed for sprint to take effect
    pub run_forward_threshold: f32,
    /// Seconds for the wall-run camera tilt to reach full strength
    pub camera_tilt_ramp: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            deadzone: 0.1,
            run_forward_threshold: 0.5,
            camera_tilt_ramp: 0.5,
        }
    }
}

/// Complete locomotion tuning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    pub ground: GroundConfig,
    pub air: AirConfig,
    pub jump: JumpConfig,
    pub wall: WallrunConfig,
    pub sensing: SensorConfig,
    pub capsule: CapsuleConfig,
    pub input: InputConfig,
}

/// Errors from loading or validating a tuning file.
#[derive(Debug)]
pub enum ConfigError {
    /// Standard I/O error.
    Io(std::io::Error),
    /// JSON serialization/deserialization error.
    Json(serde_json::Error),
    /// A value is outside its meaningful range.
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {e}"),
            ConfigError::Json(e) => write!(f, "JSON error: {e}"),
            ConfigError::Invalid(msg) => write!(f, "invalid locomotion config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl LocomotionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a tuning file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded locomotion config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Check every value for its meaningful range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("ground.speed", self.ground.speed),
            ("ground.run_speed", self.ground.run_speed),
            ("ground.acceleration", self.ground.acceleration),
            ("ground.friction", self.ground.friction),
            ("ground.stop_speed", self.ground.stop_speed),
            ("ground.damping", self.ground.damping),
            ("air.speed", self.air.speed),
            ("air.acceleration", self.air.acceleration),
            ("air.damping", self.air.damping),
            ("air.fast_fall_acceleration", self.air.fast_fall_acceleration),
            ("air.fast_fall_max_speed", self.air.fast_fall_max_speed),
            ("jump.up_speed", self.jump.up_speed),
            ("jump.dash_speed", self.jump.dash_speed),
            ("jump.cooldown", self.jump.cooldown),
            ("jump.ignore_ground_after_jump", self.jump.ignore_ground_after_jump),
            ("wall.speed", self.wall.speed),
            ("wall.climb_speed", self.wall.climb_speed),
            ("wall.acceleration", self.wall.acceleration),
            ("wall.stickiness", self.wall.stickiness),
            ("wall.stick_distance", self.wall.stick_distance),
            ("wall.ban_time", self.wall.ban_time),
            ("wall.stick_penalty", self.wall.stick_penalty),
            ("wall.push_off_speed", self.wall.push_off_speed),
            ("wall.min_height", self.wall.min_height),
            ("sensing.ground_check_distance", self.sensing.ground_check_distance),
            ("input.deadzone", self.input.deadzone),
            ("input.camera_tilt_ramp", self.input.camera_tilt_ramp),
        ];
        if let Some((name, value)) = non_negative.iter().find(|(_, v)| !(*v >= 0.0)) {
            return Err(ConfigError::Invalid(format!("{name} must be >= 0, got {value}")));
        }

        if !(self.wall.run_time > 0.0) {
            return Err(ConfigError::Invalid("wall.run_time must be > 0".into()));
        }
        let s = &self.sensing;
        if !(0.0 < s.wall_floor_barrier && s.wall_floor_barrier < s.wall_ceiling_limit && s.wall_ceiling_limit <= 180.0) {
            return Err(ConfigError::Invalid(format!(
                "expected 0 < wall_floor_barrier ({}) < wall_ceiling_limit ({}) <= 180",
                s.wall_floor_barrier, s.wall_ceiling_limit
            )));
        }
        if !(s.ground_cast_radius_scale > 0.0 && s.ground_cast_radius_scale <= 1.0) {
            return Err(ConfigError::Invalid("sensing.ground_cast_radius_scale must be in (0, 1]".into()));
        }
        let c = &self.capsule;
        if !(c.radius > 0.0 && c.crouch_height > 0.0 && c.crouch_height <= c.standing_height) {
            return Err(ConfigError::Invalid(format!(
                "capsule radius {} / crouch height {} / standing height {} are inconsistent",
                c.radius, c.crouch_height, c.standing_height
            )));
        }
        Ok(())
    }
}
