//! Top-level state machine
//!
//! `App` owns the settings, the storage backend and the active screen. A
//! front-end feeds it `InputEvent`s, calls `update` once per frame, draws
//! `view()` and executes the drained `AppEvent`s (sounds, music, fullscreen,
//! quit).

use std::mem;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::audio::{AudioSink, SoundEffect};
use crate::leaderboard::Leaderboard;
use crate::persistence::Storage;
use crate::settings::Settings;
use crate::ui::{
    Ctx, GameScreen, InputEvent, LeaderboardScreen, MainMenu, NameEntry, Nav, SettingsScreen,
    View,
};

/// Side effects for the front-end to carry out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    Sound(SoundEffect),
    StartMusic,
    StopMusic,
    /// Settings were changed and saved; re-apply volume and fullscreen
    SettingsChanged,
    /// The app is done; close the window / stop the loop
    Quit,
}

impl AppEvent {
    /// Route audio cues to a sink. Returns false for events that are not audio.
    pub fn apply_audio(&self, sink: &mut dyn AudioSink, settings: &Settings) -> bool {
        match *self {
            AppEvent::Sound(effect) => sink.play(effect),
            AppEvent::StartMusic => sink.start_music(),
            AppEvent::StopMusic => sink.stop_music(),
            AppEvent::SettingsChanged => sink.apply_settings(settings),
            AppEvent::Quit => return false,
        }
        true
    }
}

/// The active screen
pub enum Screen {
    MainMenu(MainMenu),
    Playing(GameScreen),
    Leaderboard(LeaderboardScreen),
    Settings(SettingsScreen),
    /// Name dialog over the settings screen it was opened from
    NameEntry {
        entry: NameEntry,
        settings: SettingsScreen,
    },
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::MainMenu(_) => "menu",
            Screen::Playing(_) => "playing",
            Screen::Leaderboard(_) => "leaderboard",
            Screen::Settings(_) => "settings",
            Screen::NameEntry { .. } => "name entry",
        }
    }
}

pub struct App {
    storage: Box<dyn Storage>,
    settings: Settings,
    screen: Screen,
    /// Seeds each new session
    seeds: Pcg32,
    mouse: Vec2,
    events: Vec<AppEvent>,
    quit: bool,
    autopilot: bool,
}

impl App {
    /// Load settings from `storage` and open the main menu
    pub fn new(storage: Box<dyn Storage>, seed: u64) -> Self {
        let settings = Settings::load(storage.as_ref());
        log::info!(
            "Starting as '{}' ({}, fullscreen {})",
            settings.last_name,
            settings.difficulty.as_str(),
            settings.fullscreen
        );
        Self {
            storage,
            settings,
            screen: Screen::MainMenu(MainMenu::new()),
            seeds: Pcg32::seed_from_u64(seed),
            mouse: Vec2::ZERO,
            events: Vec::new(),
            quit: false,
            autopilot: false,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn is_quit(&self) -> bool {
        self.quit
    }

    /// New sessions start with the autopilot steering
    pub fn set_autopilot(&mut self, on: bool) {
        self.autopilot = on;
    }

    /// Take the side effects queued since the last call
    pub fn drain_events(&mut self) -> Vec<AppEvent> {
        mem::take(&mut self.events)
    }

    pub fn handle_event(&mut self, event: InputEvent) {
        if self.quit {
            return;
        }

        match event {
            InputEvent::MouseMove { pos }
            | InputEvent::MouseDown { pos, .. }
            | InputEvent::MouseUp { pos, .. } => self.mouse = pos,
            _ => {}
        }

        let mut ctx = Ctx {
            settings: &mut self.settings,
            storage: self.storage.as_ref(),
            events: &mut self.events,
        };

        let nav = if event == InputEvent::Quit {
            match &self.screen {
                Screen::MainMenu(_) => Some(Nav::Quit),
                Screen::NameEntry { entry, .. } => {
                    entry.accept(&mut ctx);
                    Some(Nav::Settings)
                }
                _ => Some(Nav::MainMenu),
            }
        } else {
            match &mut self.screen {
                Screen::MainMenu(menu) => menu.handle_event(&event, &mut ctx),
                Screen::Playing(game) => game.handle_event(&event, &mut ctx),
                Screen::Leaderboard(board) => board.handle_event(&event, &mut ctx),
                Screen::Settings(settings) => settings.handle_event(&event, &mut ctx),
                Screen::NameEntry { entry, .. } => entry.handle_event(&event, &mut ctx),
            }
        };

        if let Some(nav) = nav {
            self.navigate(nav);
        }
    }

    /// Advance timers and the simulation by `dt` seconds of wall time
    pub fn update(&mut self, dt: f32) {
        let mut ctx = Ctx {
            settings: &mut self.settings,
            storage: self.storage.as_ref(),
            events: &mut self.events,
        };
        match &mut self.screen {
            Screen::Playing(game) => game.update(dt, &mut ctx),
            Screen::NameEntry { entry, .. } => entry.update(dt),
            _ => {}
        }
    }

    pub fn view(&self) -> View {
        match &self.screen {
            Screen::MainMenu(menu) => menu.view(self.mouse),
            Screen::Playing(game) => game.view(&self.settings.last_name),
            Screen::Leaderboard(board) => board.view(self.mouse),
            Screen::Settings(settings) => settings.view(&self.settings, self.mouse),
            Screen::NameEntry { entry, settings } => {
                entry.view_over(settings.view(&self.settings, self.mouse))
            }
        }
    }

    fn navigate(&mut self, nav: Nav) {
        let previous = mem::replace(&mut self.screen, Screen::MainMenu(MainMenu::new()));
        if matches!(previous, Screen::Playing(_)) {
            self.events.push(AppEvent::StopMusic);
        }

        self.screen = match (nav, previous) {
            (Nav::MainMenu, _) => Screen::MainMenu(MainMenu::new()),
            (Nav::Play, _) => self.start_session(),
            (Nav::Leaderboard, _) => {
                Screen::Leaderboard(LeaderboardScreen::new(Leaderboard::load(self.storage())))
            }
            (Nav::Settings, Screen::NameEntry { mut settings, .. }) => {
                settings.sync(&self.settings);
                Screen::Settings(settings)
            }
            (Nav::Settings, _) => Screen::Settings(SettingsScreen::new(&self.settings)),
            (Nav::NameEntry, previous) => {
                let settings = match previous {
                    Screen::Settings(settings) => settings,
                    _ => SettingsScreen::new(&self.settings),
                };
                Screen::NameEntry {
                    entry: NameEntry::new(&self.settings.last_name),
                    settings,
                }
            }
            (Nav::Quit, _) => {
                log::info!("Quit requested");
                self.quit = true;
                self.events.push(AppEvent::Quit);
                Screen::MainMenu(MainMenu::new())
            }
        };
        log::debug!("Screen -> {}", self.screen.name());
    }

    fn start_session(&mut self) -> Screen {
        let seed: u64 = self.seeds.random();
        match GameScreen::new(seed, &self.settings, self.autopilot) {
            Ok(game) => {
                self.events.push(AppEvent::StartMusic);
                Screen::Playing(game)
            }
            Err(e) => {
                log::error!("Could not start a game: {}", e);
                Screen::MainMenu(MainMenu::new())
            }
        }
    }
}
