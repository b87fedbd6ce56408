//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;

use super::collision::{bounce_off_walls, flip_if_overlapping, touches_player};
use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Demo mode - steer toward the nearest circle instead of reading keys
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if state.phase == GamePhase::Won {
        return events;
    }

    state.time_ticks += 1;

    // Move player
    let input = if input.autopilot {
        autopilot_input(state)
    } else {
        input.clone()
    };
    let speed = state.player.speed;
    if input.left {
        state.player.pos.x -= speed;
    }
    if input.right {
        state.player.pos.x += speed;
    }
    if input.up {
        state.player.pos.y -= speed;
    }
    if input.down {
        state.player.pos.y += speed;
    }
    state.player.clamp_to_arena();

    // Move circles, bounce, eat. Circle i is tested against circles that have
    // not moved yet this tick.
    let mut i = 0;
    while i < state.circles.len() {
        {
            let circle = &mut state.circles[i];
            circle.pos += circle.vel;
            bounce_off_walls(circle);
        }

        let (head, tail) = state.circles.split_at_mut(i + 1);
        let current = &mut head[i];
        for other in tail.iter_mut() {
            flip_if_overlapping(current, other);
        }

        if touches_player(current.pos, current.radius, &state.player) {
            let eaten = state.circles.remove(i);
            state.score += 1;
            log::debug!("Ate circle {} (score {})", eaten.id, state.score);
            events.push(GameEvent::CircleEaten {
                id: eaten.id,
                score: state.score,
            });
            continue;
        }

        i += 1;
    }

    if state.circles.is_empty() {
        state.phase = GamePhase::Won;
        let time_secs = state.elapsed_secs();
        log::info!("All circles eaten in {:.2}s", time_secs);
        events.push(GameEvent::Won { time_secs });
    }

    events
}

/// Steer toward the nearest circle
fn autopilot_input(state: &GameState) -> TickInput {
    let player = state.player.pos;
    let nearest = state.circles.iter().min_by(|a, b| {
        a.pos
            .distance_squared(player)
            .partial_cmp(&b.pos.distance_squared(player))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let Some(target) = nearest else {
        return TickInput::default();
    };

    // Lead the target by one tick so fast circles are not trailed forever
    let delta: Vec2 = target.pos + target.vel - player;
    let deadzone = state.player.speed / 2.0;
    TickInput {
        up: delta.y < -deadzone,
        down: delta.y > deadzone,
        left: delta.x < -deadzone,
        right: delta.x > deadzone,
        autopilot: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::{Circle, Color};

    fn circle(id: u32, x: f32, y: f32, r: f32, vx: f32, vy: f32) -> Circle {
        Circle {
            id,
            pos: Vec2::new(x, y),
            radius: r,
            color: Color::BLACK,
            vel: Vec2::new(vx, vy),
        }
    }

    #[test]
    fn test_player_moves_and_clamps() {
        let mut state = GameState::empty(1, 1.0);
        state.circles.push(circle(1, 900.0, 700.0, 10.0, 0.0, 0.0));

        let input = TickInput {
            right: true,
            down: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.player.pos, Vec2::new(105.0, 105.0));

        let input = TickInput {
            left: true,
            up: true,
            ..Default::default()
        };
        for _ in 0..100 {
            tick(&mut state, &input);
        }
        assert_eq!(state.player.pos, Vec2::new(PLAYER_RADIUS, PLAYER_RADIUS));
    }

    #[test]
    fn test_last_circle_eaten_wins_same_tick() {
        let mut state = GameState::empty(1, 1.0);
        // Moves 5px left into reach of the player at (100, 100)
        state.circles.push(circle(1, 138.0, 100.0, 10.0, -5.0, 0.0));

        let events = tick(&mut state, &TickInput::default());

        assert!(state.circles.is_empty());
        assert_eq!(state.score, 1);
        assert_eq!(state.phase, GamePhase::Won);
        assert_eq!(
            events,
            vec![
                GameEvent::CircleEaten { id: 1, score: 1 },
                GameEvent::Won {
                    time_secs: 1.0 / 60.0
                }
            ]
        );
    }

    #[test]
    fn test_won_state_is_frozen() {
        let mut state = GameState::empty(1, 1.0);
        state.circles.push(circle(1, 130.0, 100.0, 10.0, 0.0, 0.0));
        tick(&mut state, &TickInput::default());
        assert!(state.is_won());

        let ticks = state.time_ticks;
        let pos = state.player.pos;
        let events = tick(
            &mut state,
            &TickInput {
                right: true,
                ..Default::default()
            },
        );
        assert!(events.is_empty());
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.player.pos, pos);
    }

    #[test]
    fn test_circles_bounce_off_each_other() {
        let mut state = GameState::empty(1, 1.0);
        state.circles.push(circle(1, 500.0, 400.0, 20.0, 5.0, 5.0));
        state.circles.push(circle(2, 535.0, 400.0, 20.0, -5.0, 5.0));

        tick(&mut state, &TickInput::default());

        // Circle 1 moved to (505, 405), circle 2 had not moved yet: overlap
        assert_eq!(state.circles[0].vel, Vec2::new(-5.0, -5.0));
        // Circle 2 was flipped and then advanced with its new velocity
        assert_eq!(state.circles[1].vel, Vec2::new(5.0, -5.0));
        assert_eq!(state.circles[1].pos, Vec2::new(540.0, 395.0));
    }

    #[test]
    fn test_triple_overlap_double_flips() {
        let mut state = GameState::empty(1, 1.0);
        state.circles.push(circle(1, 500.0, 400.0, 20.0, 0.0, 0.0));
        state.circles.push(circle(2, 520.0, 400.0, 20.0, 1.0, 0.0));
        state.circles.push(circle(3, 510.0, 420.0, 20.0, 0.0, 0.0));

        tick(&mut state, &TickInput::default());

        // Circle 1 overlaps both others: flipped twice, back to original
        assert_eq!(state.circles[0].vel, Vec2::ZERO);
        // Circle 2 flipped by circle 1, then again by circle 3
        assert_eq!(state.circles[1].vel, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_circle_bounces_off_wall() {
        let mut state = GameState::empty(1, 1.0);
        state.circles.push(circle(1, 992.0, 400.0, 10.0, 5.0, 0.0));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.circles[0].pos.x, ARENA_WIDTH - 10.0);
        assert_eq!(state.circles[0].vel.x, -5.0);
    }

    #[test]
    fn test_elapsed_time_tracks_ticks() {
        let mut state = GameState::empty(1, 1.0);
        state.circles.push(circle(1, 900.0, 700.0, 10.0, 0.0, 0.0));
        for _ in 0..120 {
            tick(&mut state, &TickInput::default());
        }
        assert!((state.elapsed_secs() - 2.0).abs() < 1e-9);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_autopilot_clears_a_wave() {
        let mut state = GameState::new(2024, 1.0).unwrap();
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let limit = 60 * 60 * 10;
        let mut eaten = 0;
        for _ in 0..limit {
            eaten += tick(&mut state, &input)
                .iter()
                .filter(|e| matches!(e, GameEvent::CircleEaten { .. }))
                .count();
            if state.is_won() {
                break;
            }
        }
        assert!(state.is_won(), "autopilot did not finish the wave");
        assert_eq!(eaten, state.initial_circles);
        assert_eq!(state.score as usize, state.initial_circles);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(99999, 1.0).unwrap();
        let mut b = GameState::new(99999, 1.0).unwrap();
        let inputs = [
            TickInput {
                right: true,
                ..Default::default()
            },
            TickInput {
                down: true,
                left: true,
                ..Default::default()
            },
            TickInput::default(),
        ];
        for _ in 0..50 {
            for input in &inputs {
                tick(&mut a, input);
                tick(&mut b, input);
            }
        }
        assert_eq!(a.circles, b.circles);
        assert_eq!(a.player, b.player);
        assert_eq!(a.score, b.score);
    }
}
