//! Ball Blitz - a pop-the-moving-target arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, physics, hit testing, round state machine)
//! - `render`: Canvas 2D presenter drawing (wasm only)

pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod render;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions (16:9 internal resolution)
    pub const PLAYFIELD_WIDTH: f32 = 960.0;
    pub const PLAYFIELD_HEIGHT: f32 = 540.0;

    /// Primary targets per level: BASE_BALLS + (level - 1) * BALLS_PER_LEVEL
    pub const BASE_BALLS: u32 = 3;
    pub const BALLS_PER_LEVEL: u32 = 1;
    /// Primaries the player may miss per level without losing a life
    pub const ALLOWED_MISSES: u32 = 1;
    /// Clearing this level ends the run with a victory
    pub const FINAL_LEVEL: u32 = 10;
    pub const STARTING_LIVES: u32 = 3;

    /// Speed ramp, pixels/second: SPEED_BASE + (level - 1) * SPEED_STEP
    pub const SPEED_BASE: f32 = 84.0;
    pub const SPEED_STEP: f32 = 15.0;

    /// Ball radii
    pub const PRIMARY_RADIUS: f32 = 28.0;
    pub const BONUS_RADIUS: f32 = 20.0;
    /// Bonus balls move a bit faster than primaries at the same level
    pub const BONUS_SPEED_FACTOR: f32 = 1.2;

    /// A ball is retired after this many wall reflections
    pub const WALL_HIT_LIMIT: u32 = 3;

    /// Bonus pickups: per-tick spawn chance while running, hard-capped per run
    pub const BONUS_PROB_PER_TICK: f64 = 0.00125;
    pub const BONUS_SPAWN_CAP: u32 = 3;
    pub const BONUS_INCREMENT: u32 = 1;
    pub const BONUS_MAX: u32 = 3;

    /// Terminal reward: min(REWARD_CAP, REWARD_BASE + bonus_count) dollars
    pub const REWARD_BASE: u32 = 5;
    pub const REWARD_CAP: u32 = 8;
}
