//! Collision detection and response
//!
//! Response is deliberately simple: walls reflect one velocity component,
//! overlapping circles reverse both of theirs. Overlap is re-tested every
//! tick, so circles that stay overlapped keep flipping.

use glam::Vec2;

use super::state::{Circle, Player};
use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};

/// Two circles overlap (touching does not count)
#[inline]
pub fn circles_overlap(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    let rs = a_radius + b_radius;
    a_pos.distance_squared(b_pos) < rs * rs
}

/// A circle reaches the player (touching counts)
#[inline]
pub fn touches_player(pos: Vec2, radius: f32, player: &Player) -> bool {
    let rs = radius + player.radius;
    pos.distance_squared(player.pos) <= rs * rs
}

/// Reflect a circle off the arena walls, snapping it back inside
///
/// Returns true if any wall was hit.
pub fn bounce_off_walls(circle: &mut Circle) -> bool {
    let r = circle.radius;
    let mut hit = false;

    if circle.pos.x - r <= 0.0 {
        circle.pos.x = r;
        circle.vel.x = -circle.vel.x;
        hit = true;
    } else if circle.pos.x + r >= ARENA_WIDTH {
        circle.pos.x = ARENA_WIDTH - r;
        circle.vel.x = -circle.vel.x;
        hit = true;
    }

    if circle.pos.y - r <= 0.0 {
        circle.pos.y = r;
        circle.vel.y = -circle.vel.y;
        hit = true;
    } else if circle.pos.y + r >= ARENA_HEIGHT {
        circle.pos.y = ARENA_HEIGHT - r;
        circle.vel.y = -circle.vel.y;
        hit = true;
    }

    hit
}

/// Reverse both circles' velocities if they overlap
///
/// Returns true if they were flipped.
pub fn flip_if_overlapping(a: &mut Circle, b: &mut Circle) -> bool {
    if circles_overlap(a.pos, a.radius, b.pos, b.radius) {
        a.vel = -a.vel;
        b.vel = -b.vel;
        true
    } else {
        false
    }
}
