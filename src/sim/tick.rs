//! Fixed timestep simulation tick
//!
//! One tick applies, in order: the pointer pop (if any), the physics step with
//! wall reflection and retirement, the bonus spawn roll, and round resolution.

use glam::Vec2;

use super::hit::hit_test;
use super::spawn::{maybe_spawn_bonus, spawn_level};
use super::state::{BallKind, GamePhase, GameState};

/// Input commands for a single tick. One-shot flags are cleared by the driver
/// after the substep loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Pointer-down position in playfield space
    pub pointer: Option<Vec2>,
    /// Begin a run (only honored while idle)
    pub start: bool,
    /// Return to idle from any phase
    pub reset: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.reset {
        reset(state);
        return;
    }

    match state.phase {
        GamePhase::Idle => {
            if input.start {
                start(state);
            }
        }
        GamePhase::Running => {
            if let Some(point) = input.pointer {
                apply_pop(state, point);
            }
            state.time_ticks += 1;
            advance_balls(state, dt);
            maybe_spawn_bonus(state);
            resolve_round(state);
        }
        // Terminal phases ignore everything except reset
        GamePhase::Victory | GamePhase::Defeat => {}
    }
}

/// Restore the constructed initial state (same seed and config)
pub fn reset(state: &mut GameState) {
    *state = GameState::with_config(state.seed, state.config.clone());
}

fn start(state: &mut GameState) {
    state.level = 1;
    state.score = 0;
    state.lives = state.config.starting_lives;
    state.bonus_count = 0;
    state.bonus_seen = 0;
    spawn_level(state);
    state.phase = GamePhase::Running;
    log::info!("Run started (seed {})", state.seed);
}

/// Resolve a pointer-down against the roster. A click that hits nothing is
/// ignored: no score change, no life loss.
fn apply_pop(state: &mut GameState, point: Vec2) {
    let Some(idx) = hit_test(&state.balls, point) else {
        return;
    };
    let ball = state.balls.remove(idx);
    match ball.kind {
        BallKind::Primary => {
            state.score += 1;
            state.popped += 1;
        }
        BallKind::Bonus => {
            state.bonus_count =
                (state.bonus_count + state.config.bonus_increment).min(state.config.bonus_max);
            log::info!("Bonus banked: ${}", state.bonus_count);
        }
    }
}

/// Integrate positions, reflect off walls, and retire balls that have bounced
/// too often. A retired primary is a miss; a retired bonus counts as nothing.
fn advance_balls(state: &mut GameState, dt: f32) {
    let (width, height) = (state.config.width, state.config.height);
    let limit = state.config.wall_hit_limit;
    let mut missed = 0;

    state.balls.retain_mut(|ball| {
        ball.pos += ball.vel * dt;

        if ball.pos.x - ball.radius < 0.0 {
            ball.pos.x = ball.radius;
            ball.vel.x = -ball.vel.x;
            ball.wall_hits += 1;
        } else if ball.pos.x + ball.radius > width {
            ball.pos.x = width - ball.radius;
            ball.vel.x = -ball.vel.x;
            ball.wall_hits += 1;
        }
        if ball.pos.y - ball.radius < 0.0 {
            ball.pos.y = ball.radius;
            ball.vel.y = -ball.vel.y;
            ball.wall_hits += 1;
        } else if ball.pos.y + ball.radius > height {
            ball.pos.y = height - ball.radius;
            ball.vel.y = -ball.vel.y;
            ball.wall_hits += 1;
        }

        if ball.wall_hits >= limit {
            if ball.kind == BallKind::Primary {
                missed += 1;
            }
            return false;
        }
        true
    });

    state.missed += missed;
}

/// Check whether every primary this level has been popped or missed, and if
/// so advance the level, spend a life, or end the run.
fn resolve_round(state: &mut GameState) {
    let total = state.primary_count();
    let resolved = state.popped + state.missed;
    debug_assert!(resolved <= total);
    if resolved < total {
        return;
    }

    if state.popped + state.config.allowed_misses >= total {
        log::info!(
            "Level {} cleared ({} popped, {} missed)",
            state.level,
            state.popped,
            state.missed
        );
        state.level += 1;
        if state.level > state.config.final_level {
            state.phase = GamePhase::Victory;
            state.balls.clear();
            log::info!("Victory! score {}, bonus ${}", state.score, state.bonus_count);
        } else {
            spawn_level(state);
        }
    } else {
        state.lives -= 1;
        log::info!(
            "Level {} failed ({} popped, {} missed), lives left: {}",
            state.level,
            state.popped,
            state.missed,
            state.lives
        );
        if state.lives == 0 {
            state.phase = GamePhase::Defeat;
            state.balls.clear();
        } else {
            // retry the same level
            spawn_level(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::state::Ball;

    fn running_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        // keep scenario ticks free of random bonus spawns
        state.config.bonus_prob_per_tick = 0.0;
        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Running);
        state
    }

    /// Park the roster at known, non-overlapping positions with zero velocity
    fn park_roster(state: &mut GameState) -> Vec<Vec2> {
        state
            .balls
            .iter_mut()
            .enumerate()
            .map(|(i, ball)| {
                ball.pos = Vec2::new(60.0 + 70.0 * i as f32, 270.0);
                ball.vel = Vec2::ZERO;
                ball.pos
            })
            .collect()
    }

    fn pointer_tick(state: &mut GameState, point: Vec2) {
        let input = TickInput {
            pointer: Some(point),
            ..Default::default()
        };
        tick(state, &input, SIM_DT);
    }

    /// Aim a ball at the nearest wall fast enough to reflect this tick
    fn doom_ball(ball: &mut Ball, limit: u32) {
        ball.wall_hits = limit - 1;
        ball.pos.x = ball.radius + 0.5;
        ball.pos.y = 270.0;
        ball.vel = Vec2::new(-300.0, 0.0);
    }

    /// Pop every primary currently on the roster, clearing the level
    fn clear_current_level(state: &mut GameState) {
        let points = park_roster(state);
        for point in points {
            pointer_tick(state, point);
        }
    }

    #[test]
    fn test_start_spawns_level_one() {
        let state = running_state(1);
        assert_eq!(state.level, 1);
        assert_eq!(state.balls.len(), 3);
        assert_eq!(state.popped + state.missed, 0);

        // start while already running is ignored
        let mut state = state;
        state.score = 5;
        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.score, 5);
        assert_eq!(state.balls.len(), 3);
    }

    #[test]
    fn test_pop_primary_scores_once() {
        let mut state = running_state(2);
        let points = park_roster(&mut state);

        pointer_tick(&mut state, points[0]);
        assert_eq!(state.score, 1);
        assert_eq!(state.popped, 1);
        assert_eq!(state.balls.len(), 2);

        // same spot again: the ball is gone, nothing double-counts
        pointer_tick(&mut state, points[0]);
        assert_eq!(state.score, 1);
        assert_eq!(state.popped, 1);
        assert_eq!(state.balls.len(), 2);
    }

    #[test]
    fn test_missed_click_costs_nothing() {
        let mut state = running_state(3);
        park_roster(&mut state);
        pointer_tick(&mut state, Vec2::new(900.0, 50.0));
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, state.config.starting_lives);
        assert_eq!(state.balls.len(), 3);
    }

    #[test]
    fn test_click_while_idle_is_ignored() {
        let mut state = GameState::new(4);
        pointer_tick(&mut state, Vec2::new(100.0, 100.0));
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_wall_retirement_is_a_single_miss() {
        let mut state = running_state(5);
        park_roster(&mut state);
        let limit = state.config.wall_hit_limit;
        doom_ball(&mut state.balls[0], limit);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.missed, 1);
        assert_eq!(state.popped, 0);
        assert_eq!(state.score, 0);
        assert_eq!(state.balls.len(), 2);
    }

    #[test]
    fn test_wall_reflection_clamps_and_counts() {
        let mut state = running_state(6);
        park_roster(&mut state);
        state.balls[0].pos = Vec2::new(state.balls[0].radius + 0.5, 270.0);
        state.balls[0].vel = Vec2::new(-300.0, 0.0);

        tick(&mut state, &TickInput::default(), SIM_DT);
        let ball = &state.balls[0];
        assert_eq!(ball.wall_hits, 1);
        assert!(ball.vel.x > 0.0);
        assert!(ball.pos.x >= ball.radius);
    }

    #[test]
    fn test_level_clears_with_one_miss() {
        // 3 primaries, allowed_misses = 1: pop 2, miss 1 -> next level
        let mut state = running_state(7);
        let points = park_roster(&mut state);
        pointer_tick(&mut state, points[0]);
        pointer_tick(&mut state, points[1]);

        let limit = state.config.wall_hit_limit;
        doom_ball(&mut state.balls[0], limit);
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.level, 2);
        assert_eq!(state.lives, state.config.starting_lives);
        assert_eq!(state.balls.len(), 4);
        // fresh per-level counters
        assert_eq!(state.popped + state.missed, 0);
    }

    #[test]
    fn test_two_misses_lose_a_life_and_retry() {
        // pop 1, miss 2 -> life lost, same level respawned
        let mut state = running_state(8);
        let points = park_roster(&mut state);
        pointer_tick(&mut state, points[0]);

        let limit = state.config.wall_hit_limit;
        doom_ball(&mut state.balls[0], limit);
        doom_ball(&mut state.balls[1], limit);
        state.balls[1].pos.y = 400.0;
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.lives, state.config.starting_lives - 1);
        assert_eq!(state.level, 1);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.balls.len(), 3);
    }

    #[test]
    fn test_three_failed_rounds_end_in_defeat() {
        let mut state = running_state(9);
        let limit = state.config.wall_hit_limit;

        for expected_lives in [2, 1, 0] {
            park_roster(&mut state);
            for (i, ball) in state.balls.iter_mut().enumerate() {
                doom_ball(ball, limit);
                ball.pos.y = 100.0 + 60.0 * i as f32;
            }
            tick(&mut state, &TickInput::default(), SIM_DT);
            assert_eq!(state.lives, expected_lives);
        }

        assert_eq!(state.phase, GamePhase::Defeat);
        assert_eq!(state.lives, 0);
        assert!(state.balls.is_empty());

        // ticking a terminal state changes nothing
        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_bonus_pop_banks_and_caps() {
        let mut state = running_state(10);
        park_roster(&mut state);

        for _ in 0..state.config.bonus_max + 1 {
            let id = state.next_entity_id();
            let radius = state.config.bonus_radius;
            state.balls.push(Ball {
                id,
                pos: Vec2::new(800.0, 100.0),
                vel: Vec2::ZERO,
                radius,
                kind: BallKind::Bonus,
                wall_hits: 0,
            });
            pointer_tick(&mut state, Vec2::new(800.0, 100.0));
        }

        // a 4th popped bonus cannot push the bank past the cap
        assert_eq!(state.bonus_count, state.config.bonus_max);
        // bonus pops never touch score or the round counters
        assert_eq!(state.score, 0);
        assert_eq!(state.popped, 0);
    }

    #[test]
    fn test_victory_after_final_level() {
        let mut state = running_state(11);
        let final_level = state.config.final_level;

        for level in 1..=final_level {
            assert_eq!(state.level, level);
            clear_current_level(&mut state);
        }

        assert_eq!(state.phase, GamePhase::Victory);
        let summary = state.summary().unwrap();
        assert!(summary.victory);
        assert_eq!(summary.level, final_level);
        assert_eq!(summary.reward, 5);
        assert_eq!(summary.code, "SAVE5");
    }

    #[test]
    fn test_reward_reflects_banked_bonuses() {
        let mut state = running_state(12);
        state.bonus_count = 3;
        let final_level = state.config.final_level;
        for _ in 1..=final_level {
            clear_current_level(&mut state);
        }
        let summary = state.summary().unwrap();
        assert_eq!(summary.reward, 8);
        assert_eq!(summary.code, "SAVE8");
    }

    #[test]
    fn test_reset_round_trip_from_any_phase() {
        let fresh = GameState::new(13);
        let reset_input = TickInput {
            reset: true,
            ..Default::default()
        };

        // from Running
        let mut state = GameState::new(13);
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
            SIM_DT,
        );
        for _ in 0..100 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        tick(&mut state, &reset_input, SIM_DT);
        assert_eq!(state, fresh);

        // from Defeat
        let mut state = GameState::new(13);
        state.phase = GamePhase::Defeat;
        state.lives = 0;
        state.score = 42;
        tick(&mut state, &reset_input, SIM_DT);
        assert_eq!(state, fresh);

        // from Victory
        let mut state = GameState::new(13);
        state.phase = GamePhase::Victory;
        state.level = state.config.final_level + 1;
        tick(&mut state, &reset_input, SIM_DT);
        assert_eq!(state, fresh);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state1, &start, SIM_DT);
        tick(&mut state2, &start, SIM_DT);

        for i in 0..600u64 {
            let input = TickInput {
                pointer: (i % 37 == 0).then(|| Vec2::new(480.0, 270.0)),
                ..Default::default()
            };
            tick(&mut state1, &input, SIM_DT);
            tick(&mut state2, &input, SIM_DT);
        }

        assert_eq!(state1, state2);
    }

    #[test]
    fn test_running_invariants_hold_over_time() {
        let mut state = GameState::new(31337);
        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &start, SIM_DT);

        let mut last_lives = state.lives;
        let mut last_bonus = state.bonus_count;
        for i in 0..5000u64 {
            // poke the field now and then, sometimes hitting something
            let input = TickInput {
                pointer: (i % 11 == 0)
                    .then(|| Vec2::new((i % 960) as f32, (i % 540) as f32)),
                ..Default::default()
            };
            tick(&mut state, &input, SIM_DT);

            if state.phase != GamePhase::Running {
                break;
            }
            assert!(state.popped + state.missed <= state.primary_count());
            assert!(state.lives <= last_lives);
            assert!(state.bonus_count >= last_bonus);
            assert!(state.bonus_count <= state.config.bonus_max);
            assert!(state.bonus_seen <= state.config.bonus_spawn_cap);
            last_lives = state.lives;
            last_bonus = state.bonus_count;
        }
    }
}
