//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{bounce_off_walls, circles_overlap, flip_if_overlapping, touches_player};
pub use spawn::{spawn_circle, spawn_wave};
pub use state::{Circle, Color, GameEvent, GamePhase, GameState, Player};
pub use tick::{TickInput, tick};
