//! Circle placement by rejection sampling
//!
//! Candidates are drawn uniformly inside the spawn margin and rejected while
//! they overlap an existing circle or the player. The retry budget is finite
//! so a crowded arena fails loudly instead of hanging.

use glam::Vec2;
use rand::Rng;

use super::collision::{circles_overlap, touches_player};
use super::state::{Circle, Color, Player};
use crate::consts::*;
use crate::error::SpawnError;

/// Place one new circle clear of `existing` and `player`
pub fn spawn_circle<R: Rng>(
    rng: &mut R,
    existing: &[Circle],
    player: &Player,
    speed_multiplier: f32,
    id: u32,
) -> Result<Circle, SpawnError> {
    let radius = rng.random_range(CIRCLE_MIN_RADIUS..=CIRCLE_MAX_RADIUS) as f32;
    let color = Color::rgb(rng.random(), rng.random(), rng.random());

    let max_x = ARENA_WIDTH as u32 - SPAWN_MARGIN;
    let max_y = ARENA_HEIGHT as u32 - SPAWN_MARGIN;

    for _ in 0..MAX_SPAWN_ATTEMPTS {
        let pos = Vec2::new(
            rng.random_range(SPAWN_MARGIN..=max_x) as f32,
            rng.random_range(SPAWN_MARGIN..=max_y) as f32,
        );

        let clear_of_circles = existing
            .iter()
            .all(|other| !circles_overlap(pos, radius, other.pos, other.radius));
        if clear_of_circles && !touches_player(pos, radius, player) {
            return Ok(Circle {
                id,
                pos,
                radius,
                color,
                vel: random_velocity(rng, speed_multiplier),
            });
        }
    }

    log::warn!(
        "Could not place circle r={} among {} others",
        radius,
        existing.len()
    );
    Err(SpawnError::NoSpace {
        attempts: MAX_SPAWN_ATTEMPTS,
    })
}

/// Each axis independently ±base speed, scaled by difficulty
fn random_velocity<R: Rng>(rng: &mut R, speed_multiplier: f32) -> Vec2 {
    let mut axis = || {
        let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        sign * CIRCLE_BASE_SPEED * speed_multiplier
    };
    let vx = axis();
    let vy = axis();
    Vec2::new(vx, vy)
}

/// Spawn a full set of circles for a new session
pub fn spawn_wave<R: Rng>(
    rng: &mut R,
    player: &Player,
    speed_multiplier: f32,
) -> Result<Vec<Circle>, SpawnError> {
    let count = rng.random_range(MIN_CIRCLES..=MAX_CIRCLES);
    let mut circles = Vec::with_capacity(count);
    for id in 1..=count as u32 {
        let circle = spawn_circle(rng, &circles, player, speed_multiplier, id)?;
        circles.push(circle);
    }
    Ok(circles)
}
