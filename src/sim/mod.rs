//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Roster kept in spawn order (tail is front-most)
//! - No rendering or platform dependencies

pub mod hit;
pub mod spawn;
pub mod state;
pub mod tick;

pub use hit::hit_test;
pub use spawn::{maybe_spawn_bonus, spawn_level};
pub use state::{Ball, BallKind, Config, GamePhase, GameState, RunSummary};
pub use tick::{TickInput, tick};
