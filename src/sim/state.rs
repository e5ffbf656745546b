//! Game state and core simulation types
//!
//! Everything the round state machine owns lives here, serializable as one value.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the player to start a run
    Idle,
    /// Active gameplay
    Running,
    /// Run ended by clearing the final level
    Victory,
    /// Run ended by exhausting lives
    Defeat,
}

/// Ball kinds with distinct scoring and retirement rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallKind {
    /// Counts toward level clear and score
    Primary,
    /// Rare pickup; raises the end-of-run reward, never counts as a miss
    Bonus,
}

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub kind: BallKind,
    /// Wall reflections so far; the ball retires at the configured limit
    pub wall_hits: u32,
}

impl Ball {
    /// Whether the point lies inside this ball's disc
    pub fn contains(&self, point: Vec2) -> bool {
        self.pos.distance_squared(point) <= self.radius * self.radius
    }
}

/// Gameplay configuration, fixed at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub width: f32,
    pub height: f32,
    pub base_balls: u32,
    pub balls_per_level: u32,
    pub allowed_misses: u32,
    pub final_level: u32,
    pub starting_lives: u32,
    pub speed_base: f32,
    pub speed_step: f32,
    pub primary_radius: f32,
    pub bonus_radius: f32,
    pub bonus_speed_factor: f32,
    pub wall_hit_limit: u32,
    pub bonus_prob_per_tick: f64,
    pub bonus_spawn_cap: u32,
    pub bonus_increment: u32,
    pub bonus_max: u32,
    pub reward_base: u32,
    pub reward_cap: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
            base_balls: BASE_BALLS,
            balls_per_level: BALLS_PER_LEVEL,
            allowed_misses: ALLOWED_MISSES,
            final_level: FINAL_LEVEL,
            starting_lives: STARTING_LIVES,
            speed_base: SPEED_BASE,
            speed_step: SPEED_STEP,
            primary_radius: PRIMARY_RADIUS,
            bonus_radius: BONUS_RADIUS,
            bonus_speed_factor: BONUS_SPEED_FACTOR,
            wall_hit_limit: WALL_HIT_LIMIT,
            bonus_prob_per_tick: BONUS_PROB_PER_TICK,
            bonus_spawn_cap: BONUS_SPAWN_CAP,
            bonus_increment: BONUS_INCREMENT,
            bonus_max: BONUS_MAX,
            reward_base: REWARD_BASE,
            reward_cap: REWARD_CAP,
        }
    }
}

impl Config {
    /// Primary targets spawned for a level (non-decreasing in level)
    pub fn primary_count(&self, level: u32) -> u32 {
        self.base_balls + (level - 1) * self.balls_per_level
    }

    /// Speed magnitude for a level, pixels/second (non-decreasing in level)
    pub fn level_speed(&self, level: u32) -> f32 {
        self.speed_base + (level - 1) as f32 * self.speed_step
    }

    /// Terminal reward in dollars for a run that banked `bonus_count` pickups
    pub fn reward(&self, bonus_count: u32) -> u32 {
        (self.reward_base + bonus_count).min(self.reward_cap)
    }
}

/// Terminal summary handed to the presenter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub victory: bool,
    pub score: u32,
    pub level: u32,
    pub bonus_count: u32,
    /// Final discount in dollars
    pub reward: u32,
    /// Promo code for the reward tier
    pub code: String,
}

/// Complete game state (serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed
    pub seed: u64,
    /// Sim RNG (spawn placement, bonus scheduling)
    pub rng: Pcg32,
    pub config: Config,
    pub phase: GamePhase,
    /// Current level, 1-based
    pub level: u32,
    pub score: u32,
    pub lives: u32,
    /// Bonus pickups banked this run, clamped at `config.bonus_max`
    pub bonus_count: u32,
    /// Bonus balls ever spawned this run (spawn cap bookkeeping)
    pub bonus_seen: u32,
    /// Primaries popped this level
    pub popped: u32,
    /// Primaries missed this level
    pub missed: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Live roster in spawn order (tail is visually front-most)
    pub balls: Vec<Ball>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a fresh idle state with the default configuration
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, Config::default())
    }

    /// Create a fresh idle state with an explicit configuration
    pub fn with_config(seed: u64, config: Config) -> Self {
        let lives = config.starting_lives;
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            config,
            phase: GamePhase::Idle,
            level: 1,
            score: 0,
            lives,
            bonus_count: 0,
            bonus_seen: 0,
            popped: 0,
            missed: 0,
            time_ticks: 0,
            balls: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Primary targets this level
    pub fn primary_count(&self) -> u32 {
        self.config.primary_count(self.level)
    }

    /// Terminal summary, available once the run has ended
    pub fn summary(&self) -> Option<RunSummary> {
        let victory = match self.phase {
            GamePhase::Victory => true,
            GamePhase::Defeat => false,
            _ => return None,
        };
        let reward = self.config.reward(self.bonus_count);
        Some(RunSummary {
            victory,
            score: self.score,
            // level is bumped past the final level on victory
            level: self.level.min(self.config.final_level),
            bonus_count: self.bonus_count,
            reward,
            code: format!("SAVE{reward}"),
        })
    }
}
