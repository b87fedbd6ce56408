//! Game state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::spawn::spawn_wave;
use crate::consts::*;
use crate::error::SpawnError;

/// RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const DARK: Color = Color::rgb(40, 40, 40);
    pub const ACCENT: Color = Color::rgb(0, 180, 0);
    pub const RED: Color = Color::rgb(220, 40, 40);
    /// Player body
    pub const PLAYER: Color = Color::rgb(255, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Normalized sRGB RGBA for GPU upload
    pub fn to_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            1.0,
        ]
    }

    /// `#rrggbb` for DOM styling
    pub fn to_css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Circles remain
    Playing,
    /// Every circle has been eaten
    Won,
}

/// The player-controlled circle
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    /// Pixels per tick per held direction
    pub speed: f32,
    pub color: Color,
    /// Carried for completeness; nothing damages the player
    pub health: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            radius: PLAYER_RADIUS,
            speed: PLAYER_SPEED,
            color: Color::PLAYER,
            health: PLAYER_HEALTH,
        }
    }
}

impl Player {
    /// Keep the whole body inside the arena
    pub fn clamp_to_arena(&mut self) {
        self.pos.x = self.pos.x.clamp(self.radius, ARENA_WIDTH - self.radius);
        self.pos.y = self.pos.y.clamp(self.radius, ARENA_HEIGHT - self.radius);
    }
}

/// A food circle
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub color: Color,
    /// Pixels per tick
    pub vel: Vec2,
}

/// Things that happened during a tick (consumed by audio and the app)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A circle touched the player and was removed
    CircleEaten { id: u32, score: u32 },
    /// The last circle was eaten
    Won { time_secs: f64 },
}

/// Complete state of one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub player: Player,
    /// Live circles in spawn order
    pub circles: Vec<Circle>,
    /// Circles eaten so far
    pub score: u32,
    /// Simulation tick counter (stops advancing once won)
    pub time_ticks: u64,
    /// Difficulty multiplier applied to circle speed at spawn
    pub speed_multiplier: f32,
    /// Circles spawned at session start
    pub initial_circles: usize,
}

impl GameState {
    /// Create a session with a freshly spawned wave
    pub fn new(seed: u64, speed_multiplier: f32) -> Result<Self, SpawnError> {
        let mut state = Self::empty(seed, speed_multiplier);
        let player = state.player.clone();
        state.circles = spawn_wave(&mut state.rng, &player, speed_multiplier)?;
        state.initial_circles = state.circles.len();
        log::info!(
            "New game: seed={}, circles={}, speed x{}",
            seed,
            state.initial_circles,
            speed_multiplier
        );
        Ok(state)
    }

    /// A session with no circles (tests and scripted setups add their own)
    pub fn empty(seed: u64, speed_multiplier: f32) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            player: Player::default(),
            circles: Vec::new(),
            score: 0,
            time_ticks: 0,
            speed_multiplier,
            initial_circles: 0,
        }
    }

    /// Seconds of play so far
    pub fn elapsed_secs(&self) -> f64 {
        self.time_ticks as f64 / TICKS_PER_SECOND as f64
    }

    pub fn is_won(&self) -> bool {
        self.phase == GamePhase::Won
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_spawns_wave() {
        let state = GameState::new(7, 1.0).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert!((MIN_CIRCLES..=MAX_CIRCLES).contains(&state.circles.len()));
        assert_eq!(state.initial_circles, state.circles.len());
        assert_eq!(state.score, 0);
        assert_eq!(state.player.pos, Vec2::new(100.0, 100.0));
        assert_eq!(state.player.health, 100);
    }

    #[test]
    fn test_same_seed_same_wave() {
        let a = GameState::new(42, 1.25).unwrap();
        let b = GameState::new(42, 1.25).unwrap();
        assert_eq!(a.circles, b.circles);
    }

    #[test]
    fn test_player_clamp() {
        let mut player = Player {
            pos: Vec2::new(-40.0, 900.0),
            ..Player::default()
        };
        player.clamp_to_arena();
        assert_eq!(player.pos, Vec2::new(25.0, ARENA_HEIGHT - 25.0));
    }

    #[test]
    fn test_elapsed_secs() {
        let mut state = GameState::empty(1, 1.0);
        state.time_ticks = 90;
        assert!((state.elapsed_secs() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_color_css() {
        assert_eq!(Color::ACCENT.to_css(), "#00b400");
        assert_eq!(Color::WHITE.to_f32(), [1.0, 1.0, 1.0, 1.0]);
    }
}
