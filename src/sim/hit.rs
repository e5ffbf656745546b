//! Pointer hit testing
//!
//! The roster is kept in spawn order, so scanning from the tail prefers the
//! visually front-most ball. Bonus balls win over primaries when both contain
//! the point: they are rarer and disappear on their own, so the player's
//! intent is assumed to be the pickup.

use glam::Vec2;

use super::state::{Ball, BallKind};

/// Find the ball a click at `point` should pop, if any.
///
/// Returns the roster index of the topmost Bonus ball containing the point,
/// falling back to the topmost Primary. Callers remove the ball and apply
/// scoring.
pub fn hit_test(balls: &[Ball], point: Vec2) -> Option<usize> {
    let mut primary = None;
    for (i, ball) in balls.iter().enumerate().rev() {
        if !ball.contains(point) {
            continue;
        }
        if ball.kind == BallKind::Bonus {
            return Some(i);
        }
        if primary.is_none() {
            primary = Some(i);
        }
    }
    primary
}
