//! Cooldown and debounce timers
//!
//! Every countdown the controller uses lives in one [`TimerBank`] that is
//! decayed exactly once per fixed tick. Timers only ever count down toward
//! zero; they are set to positive values by explicit actions (jumping,
//! leaving a wall, entering a wall-run).

/// Countdown state for one character.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerBank {
    /// Time the wall just left stays banned (s)
    wall_ban: f32,
    /// Lockout after losing a wall mid-run (s)
    wall_stick: f32,
    /// Post-jump window in which ground hits are ignored (s)
    ignore_ground: f32,
    /// Time until the next ground jump is allowed (s)
    jump_cooldown: f32,
    /// Time left on the current wall-run (s)
    wallrun_remaining: f32,
    can_jump: bool,
    can_double_jump: bool,
}

impl Default for TimerBank {
    fn default() -> Self {
        Self {
            wall_ban: 0.0,
            wall_stick: 0.0,
            ignore_ground: 0.0,
            jump_cooldown: 0.0,
            wallrun_remaining: 0.0,
            can_jump: true,
            can_double_jump: true,
        }
    }
}

impl TimerBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every timer down by `dt`, clamping at zero.
    ///
    /// The wall-run clock only runs when `wallrun_clock_running` is set
    /// (wall-running on a surface without the infinite-wallrun tag).
    pub fn decay(&mut self, dt: f32, wallrun_clock_running: bool) {
        let dt = dt.max(0.0);
        self.wall_ban = (self.wall_ban - dt).max(0.0);
        self.wall_stick = (self.wall_stick - dt).max(0.0);
        self.ignore_ground = (self.ignore_ground - dt).max(0.0);

        if self.jump_cooldown > 0.0 {
            self.jump_cooldown = (self.jump_cooldown - dt).max(0.0);
            if self.jump_cooldown == 0.0 {
                self.can_jump = true;
            }
        }

        if wallrun_clock_running {
            self.wallrun_remaining = (self.wallrun_remaining - dt).max(0.0);
        }
    }

    /// Reset to the spawn state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // ---- wall ban ----

    pub fn wall_ban(&self) -> f32 {
        self.wall_ban
    }

    pub fn ban_wall(&mut self, duration: f32) {
        self.wall_ban = duration.max(0.0);
    }

    // ---- wall stick ----

    pub fn wall_stick(&self) -> f32 {
        self.wall_stick
    }

    pub fn penalize_wall_stick(&mut self, duration: f32) {
        self.wall_stick = duration.max(0.0);
    }

    // ---- ignore ground ----

    pub fn ignore_ground(&self) -> f32 {
        self.ignore_ground
    }

    pub fn is_ignoring_ground(&self) -> bool {
        self.ignore_ground > 0.0
    }

    pub fn ignore_ground_for(&mut self, duration: f32) {
        self.ignore_ground = duration.max(0.0);
    }

    // ---- jump ----

    pub fn can_jump(&self) -> bool {
        self.can_jump
    }

    pub fn jump_cooldown(&self) -> f32 {
        self.jump_cooldown
    }

    /// Block ground jumps until `duration` has elapsed.
    pub fn start_jump_cooldown(&mut self, duration: f32) {
        self.jump_cooldown = duration.max(0.0);
        self.can_jump = self.jump_cooldown == 0.0;
    }

    pub fn can_double_jump(&self) -> bool {
        self.can_double_jump
    }

    pub fn grant_double_jump(&mut self) {
        self.can_double_jump = true;
    }

    /// Use up the double jump. Returns `false` if it was already spent.
    pub fn consume_double_jump(&mut self) -> bool {
        std::mem::replace(&mut self.can_double_jump, false)
    }

    // ---- wall-run ----

    pub fn wallrun_remaining(&self) -> f32 {
        self.wallrun_remaining
    }

    pub fn start_wallrun(&mut self, duration: f32) {
        self.wallrun_remaining = duration.max(0.0);
    }

    pub fn end_wallrun(&mut self) {
        self.wallrun_remaining = 0.0;
    }
}
