//! Screens and the pieces they are built from
//!
//! Each screen owns its widget layout and transient state, consumes
//! `InputEvent`s and describes itself as a `View`. Screens never switch
//! themselves; they return a `Nav` and the app performs the transition.

pub mod game_screen;
pub mod input;
pub mod leaderboard_view;
pub mod menu;
pub mod name_entry;
pub mod settings_screen;
pub mod view;
pub mod widgets;

pub use game_screen::{GameScreen, WinSnapshot};
pub use input::{InputEvent, Key, MouseButton};
pub use leaderboard_view::LeaderboardScreen;
pub use menu::MainMenu;
pub use name_entry::NameEntry;
pub use settings_screen::SettingsScreen;
pub use view::{Align, Element, SceneView, TextSize, View};
pub use widgets::{Button, Rect, Slider, SliderResponse};

use glam::Vec2;

use crate::app::AppEvent;
use crate::audio::SoundEffect;
use crate::persistence::Storage;
use crate::settings::Settings;

/// Screen a handler asks to switch to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    MainMenu,
    Play,
    Leaderboard,
    Settings,
    NameEntry,
    Quit,
}

/// Shared state handed to screens while they process input
pub struct Ctx<'a> {
    pub settings: &'a mut Settings,
    pub storage: &'a dyn Storage,
    pub events: &'a mut Vec<AppEvent>,
}

impl Ctx<'_> {
    pub fn sound(&mut self, effect: SoundEffect) {
        self.events.push(AppEvent::Sound(effect));
    }

    pub fn click(&mut self) {
        self.sound(SoundEffect::ButtonClick);
    }

    /// Persist the settings and tell the front-end to re-apply them
    pub fn settings_changed(&mut self) {
        if let Err(e) = self.settings.save(self.storage) {
            log::warn!("Failed to save settings: {}", e);
        }
        self.events.push(AppEvent::SettingsChanged);
    }
}

/// Arena center, the anchor most layouts hang off
pub fn screen_center() -> Vec2 {
    use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};
    Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0)
}
