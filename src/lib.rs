//! Circle Eater - eat every bouncing circle in the arena
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, spawning, win detection)
//! - `app`: Top-level screen state machine driven by input events
//! - `ui`: Input model, widgets and per-screen state
//! - `settings` / `leaderboard`: Persisted player preferences and run history
//! - `persistence`: Storage backends (files on native, LocalStorage on web)
//! - `renderer`: WebGPU rendering pipeline (web only)
//! - `platform`: Browser/native platform glue

pub mod app;
pub mod audio;
pub mod error;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use app::{App, AppEvent};
pub use error::{SpawnError, StoreError};
pub use leaderboard::{Leaderboard, RecordOutcome, RunRecord};
pub use settings::{Difficulty, Settings};

/// Game configuration constants
pub mod consts {
    /// Simulation rate; speeds are tuned in pixels per tick at this rate
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Largest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Arena dimensions (logical pixels)
    pub const ARENA_WIDTH: f32 = 1000.0;
    pub const ARENA_HEIGHT: f32 = 800.0;

    /// Player defaults
    pub const PLAYER_START_X: f32 = 100.0;
    pub const PLAYER_START_Y: f32 = 100.0;
    pub const PLAYER_RADIUS: f32 = 25.0;
    /// Pixels per tick per held direction
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_HEALTH: u32 = 100;

    /// Food circle defaults
    pub const CIRCLE_MIN_RADIUS: u32 = 10;
    pub const CIRCLE_MAX_RADIUS: u32 = 30;
    /// Per-axis speed before the difficulty multiplier (pixels per tick)
    pub const CIRCLE_BASE_SPEED: f32 = 5.0;
    pub const MIN_CIRCLES: usize = 5;
    pub const MAX_CIRCLES: usize = 20;
    /// Spawn positions keep this distance from every arena edge
    pub const SPAWN_MARGIN: u32 = 50;
    /// Rejection-sampling cap per circle
    pub const MAX_SPAWN_ATTEMPTS: u32 = 10_000;

    /// Tolerance used when comparing run times against the best time
    pub const RECORD_EPSILON: f64 = 1e-9;
    /// Timestamp format stored with every run
    pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// Longest display name accepted by the name entry dialog
    pub const MAX_NAME_LEN: usize = 16;
    /// Caret blink period in the name entry dialog (seconds)
    pub const CARET_BLINK_SECS: f32 = 0.4;
    /// Rows shown at once on the leaderboard screen
    pub const LEADERBOARD_VISIBLE_ROWS: usize = 8;

    /// Storage keys
    pub const SETTINGS_KEY: &str = "settings.json";
    pub const LEADERBOARD_KEY: &str = "leaderboard.json";
}

/// Round to three decimal places (volume storage precision)
#[inline]
pub fn round3(value: f32) -> f32 {
    (value * 1000.0).round() / 1000.0
}
