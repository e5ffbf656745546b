//! Level and bonus spawning
//!
//! Difficulty curve: primary count and speed both ramp linearly with level.
//! Bonus pickups are rare and hard-capped per run.

use glam::Vec2;
use rand::Rng;

use super::state::{Ball, BallKind, GamePhase, GameState};

/// Spawn one ball of the given kind at a uniform position inset by its own
/// radius, with a uniformly random heading.
fn make_ball(state: &mut GameState, kind: BallKind) -> Ball {
    let config = &state.config;
    let (radius, speed) = match kind {
        BallKind::Primary => (config.primary_radius, config.level_speed(state.level)),
        BallKind::Bonus => (
            config.bonus_radius,
            config.level_speed(state.level) * config.bonus_speed_factor,
        ),
    };
    let (width, height) = (config.width, config.height);

    let x = state.rng.random_range(radius..=width - radius);
    let y = state.rng.random_range(radius..=height - radius);
    let angle = state.rng.random_range(0.0..std::f32::consts::TAU);
    let vel = Vec2::new(angle.cos(), angle.sin()) * speed;

    let id = state.next_entity_id();
    Ball {
        id,
        pos: Vec2::new(x, y),
        vel,
        radius,
        kind,
        wall_hits: 0,
    }
}

/// Clear the roster and spawn the primary targets for the current level.
/// Resets the per-level popped/missed counters.
pub fn spawn_level(state: &mut GameState) {
    state.balls.clear();
    state.popped = 0;
    state.missed = 0;

    let count = state.primary_count();
    for _ in 0..count {
        let ball = make_ball(state, BallKind::Primary);
        state.balls.push(ball);
    }

    log::debug!(
        "Spawned level {}: {} primaries at {:.0} px/s",
        state.level,
        count,
        state.config.level_speed(state.level)
    );
}

/// Roll the per-tick bonus chance. Bonus balls stop appearing once the run's
/// spawn cap is reached, no matter the level.
pub fn maybe_spawn_bonus(state: &mut GameState) {
    if state.phase != GamePhase::Running {
        return;
    }
    if state.bonus_seen >= state.config.bonus_spawn_cap {
        return;
    }
    if state.rng.random_bool(state.config.bonus_prob_per_tick) {
        let ball = make_ball(state, BallKind::Bonus);
        state.balls.push(ball);
        state.bonus_seen += 1;
        log::debug!("Bonus spawned ({}/{})", state.bonus_seen, state.config.bonus_spawn_cap);
    }
}
