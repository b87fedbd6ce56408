//! Settings screen
//!
//! Every change is saved immediately and announced with
//! `AppEvent::SettingsChanged` so the front-end can re-apply audio and
//! fullscreen.

use glam::Vec2;

use super::input::{InputEvent, Key};
use super::view::{Align, TextSize, View};
use super::widgets::{Button, Slider, SliderResponse};
use super::{Ctx, Nav};
use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::round3;
use crate::settings::Settings;
use crate::sim::Color;

const NAME_Y: f32 = 140.0;
const FULL_Y: f32 = NAME_Y + 70.0;
const DIFF_Y: f32 = FULL_Y + 110.0;
const MASTER_Y: f32 = DIFF_Y + 90.0;
const SFX_Y: f32 = MASTER_Y + 70.0;
const RESET_Y: f32 = SFX_Y + 140.0;
const BACK_Y: f32 = RESET_Y + 70.0;

const MARGIN_X: f32 = 80.0;
const SLIDER_W: f32 = ARENA_WIDTH - 2.0 * MARGIN_X - 60.0;
const LABEL_TO_CTRL_GAP: f32 = 28.0;

const FOOTER: &str = "Esc/Enter = Back  •  F = Toggle Fullscreen  •  D = Cycle Difficulty";

pub struct SettingsScreen {
    change_name: Button,
    toggle_fullscreen: Button,
    difficulty: Button,
    reset: Button,
    back: Button,
    master: Slider,
    sfx: Slider,
}

impl SettingsScreen {
    pub fn new(settings: &Settings) -> Self {
        let cx = ARENA_WIDTH / 2.0;
        let wide = Vec2::new(260.0, 54.0);
        let slider_left = cx - SLIDER_W / 2.0;
        Self {
            change_name: Button::new("Change Name", Vec2::new(cx, NAME_Y + 36.0), wide),
            toggle_fullscreen: Button::new(
                "Toggle Fullscreen",
                Vec2::new(cx, FULL_Y + 36.0),
                Vec2::new(280.0, 54.0),
            ),
            difficulty: Button::new("Difficulty", Vec2::new(cx, DIFF_Y), wide),
            reset: Button::new("Reset to Defaults", Vec2::new(cx, RESET_Y), wide),
            back: Button::new("Back", Vec2::new(cx, BACK_Y), Vec2::new(180.0, 50.0)),
            master: Slider::new(
                slider_left,
                MASTER_Y + LABEL_TO_CTRL_GAP,
                SLIDER_W,
                settings.master_volume,
            ),
            sfx: Slider::new(
                slider_left,
                SFX_Y + LABEL_TO_CTRL_GAP,
                SLIDER_W,
                settings.sfx_volume,
            ),
        }
    }

    /// Re-read slider positions after settings changed elsewhere
    pub fn sync(&mut self, settings: &Settings) {
        self.master.set_value(settings.master_volume);
        self.sfx.set_value(settings.sfx_volume);
    }

    pub fn handle_event(&mut self, event: &InputEvent, ctx: &mut Ctx) -> Option<Nav> {
        // Sliders get the event first so a drag is never mistaken for a click
        let master = self.master.handle_event(event);
        if master.handled() {
            self.slider_changed(master, ctx, |s, v| s.set_master_volume(v), self.master.value);
            return None;
        }
        let sfx = self.sfx.handle_event(event);
        if sfx.handled() {
            self.slider_changed(sfx, ctx, |s, v| s.set_sfx_volume(v), self.sfx.value);
            return None;
        }

        match *event {
            InputEvent::KeyDown(Key::Escape | Key::Enter) => {
                ctx.click();
                Some(Nav::MainMenu)
            }
            InputEvent::KeyDown(k) if k.is_char('f') => {
                self.toggle_fullscreen(ctx);
                None
            }
            InputEvent::KeyDown(k) if k.is_char('d') => {
                self.cycle_difficulty(ctx);
                None
            }
            _ if self.change_name.clicked(event) => {
                ctx.click();
                Some(Nav::NameEntry)
            }
            _ if self.toggle_fullscreen.clicked(event) => {
                self.toggle_fullscreen(ctx);
                None
            }
            _ if self.difficulty.clicked(event) => {
                self.cycle_difficulty(ctx);
                None
            }
            _ if self.reset.clicked(event) => {
                ctx.settings.reset_to_defaults();
                self.sync(ctx.settings);
                log::info!("Settings reset to defaults");
                ctx.settings_changed();
                ctx.click();
                None
            }
            _ if self.back.clicked(event) => {
                ctx.click();
                Some(Nav::MainMenu)
            }
            _ => None,
        }
    }

    fn slider_changed(
        &self,
        response: SliderResponse,
        ctx: &mut Ctx,
        apply: impl FnOnce(&mut Settings, f32),
        value: f32,
    ) {
        if matches!(response, SliderResponse::Grabbed | SliderResponse::Released) {
            ctx.click();
        }
        if response != SliderResponse::Released {
            apply(ctx.settings, round3(value));
            ctx.settings_changed();
        }
    }

    fn toggle_fullscreen(&self, ctx: &mut Ctx) {
        ctx.settings.toggle_fullscreen();
        log::info!("Fullscreen {}", ctx.settings.fullscreen);
        ctx.settings_changed();
        ctx.click();
    }

    fn cycle_difficulty(&self, ctx: &mut Ctx) {
        ctx.settings.cycle_difficulty();
        log::info!("Difficulty {}", ctx.settings.difficulty.as_str());
        ctx.settings_changed();
        ctx.click();
    }

    pub fn view(&self, settings: &Settings, mouse: Vec2) -> View {
        let mut view = View::new();
        let cx = ARENA_WIDTH / 2.0;

        view.colored_text(
            "Settings",
            Vec2::new(cx, 60.0),
            TextSize::Title,
            Align::Center,
            Color::ACCENT,
        );

        view.text(
            format!("Name: {}", settings.last_name),
            Vec2::new(MARGIN_X, NAME_Y),
            TextSize::Normal,
            Align::Left,
        );
        view.button(&self.change_name, mouse);

        let fullscreen = if settings.fullscreen { "On" } else { "Off" };
        view.text(
            format!("Fullscreen: {}", fullscreen),
            Vec2::new(MARGIN_X, FULL_Y),
            TextSize::Normal,
            Align::Left,
        );
        view.button(&self.toggle_fullscreen, mouse);

        let difficulty = Button {
            label: format!("Difficulty: {}", settings.difficulty.as_str()),
            ..self.difficulty.clone()
        };
        view.button(&difficulty, mouse);
        view.colored_text(
            "(Press D to cycle difficulty)",
            Vec2::new(cx, DIFF_Y + 32.0 + TextSize::Small.px() as f32 / 2.0),
            TextSize::Small,
            Align::Center,
            Color::DARK,
        );

        for (label, y, slider) in [
            ("Master Volume", MASTER_Y, &self.master),
            ("SFX Volume", SFX_Y, &self.sfx),
        ] {
            view.text(label, Vec2::new(MARGIN_X, y), TextSize::Normal, Align::Left);
            view.slider(slider);
            view.colored_text(
                format!("{}%", (slider.value * 100.0) as u32),
                Vec2::new(slider.track.right() + 12.0, slider.track.y - 8.0),
                TextSize::Small,
                Align::Left,
                Color::DARK,
            );
        }

        view.button(&self.reset, mouse);
        view.button(&self.back, mouse);

        view.colored_text(
            FOOTER,
            Vec2::new(cx, ARENA_HEIGHT - 26.0 - TextSize::Small.px() as f32 / 2.0),
            TextSize::Small,
            Align::Center,
            Color::DARK,
        );
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppEvent;
    use crate::persistence::MemoryStorage;
    use crate::settings::Difficulty;
    use crate::ui::input::MouseButton;

    struct Harness {
        storage: MemoryStorage,
        settings: Settings,
        events: Vec<AppEvent>,
        screen: SettingsScreen,
    }

    impl Harness {
        fn new() -> Self {
            let settings = Settings::default();
            Self {
                screen: SettingsScreen::new(&settings),
                storage: MemoryStorage::new(),
                settings,
                events: Vec::new(),
            }
        }

        fn send(&mut self, event: InputEvent) -> Option<Nav> {
            let mut ctx = Ctx {
                settings: &mut self.settings,
                storage: &self.storage,
                events: &mut self.events,
            };
            self.screen.handle_event(&event, &mut ctx)
        }

        fn click(&mut self, x: f32, y: f32) -> Option<Nav> {
            self.send(InputEvent::MouseDown {
                pos: Vec2::new(x, y),
                button: MouseButton::Left,
            })
        }
    }

    #[test]
    fn test_layout_matches_rows() {
        let h = Harness::new();
        assert_eq!(h.screen.master.track.x, 110.0);
        assert_eq!(h.screen.master.track.w, 780.0);
        assert_eq!(h.screen.master.track.y, 438.0);
        assert_eq!(h.screen.sfx.track.y, 508.0);
    }

    #[test]
    fn test_keys_toggle_and_save() {
        let mut h = Harness::new();
        h.send(InputEvent::KeyDown(Key::Char('f')));
        h.send(InputEvent::KeyDown(Key::Char('D')));
        assert!(h.settings.fullscreen);
        assert_eq!(h.settings.difficulty, Difficulty::Hard);
        assert_eq!(Settings::load(&h.storage), h.settings);
        assert_eq!(
            h.events
                .iter()
                .filter(|e| **e == AppEvent::SettingsChanged)
                .count(),
            2
        );
    }

    #[test]
    fn test_slider_drag_updates_volume() {
        let mut h = Harness::new();
        // Click a quarter of the way along the master track
        h.click(110.0 + 195.0, 443.0);
        assert_eq!(h.settings.master_volume, 0.25);

        h.send(InputEvent::MouseMove {
            pos: Vec2::new(2000.0, 0.0),
        });
        assert_eq!(h.settings.master_volume, 1.0);
        h.send(InputEvent::MouseUp {
            pos: Vec2::new(2000.0, 0.0),
            button: MouseButton::Left,
        });

        // Further moves do nothing once released
        h.send(InputEvent::MouseMove {
            pos: Vec2::new(110.0, 443.0),
        });
        assert_eq!(h.settings.master_volume, 1.0);
        assert_eq!(Settings::load(&h.storage).master_volume, 1.0);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut h = Harness::new();
        h.settings.last_name = "Zed".to_string();
        h.settings.master_volume = 0.1;
        h.screen.sync(&h.settings);

        h.click(500.0, RESET_Y);
        assert_eq!(h.settings, Settings::default());
        assert_eq!(h.screen.master.value, 0.8);
    }

    #[test]
    fn test_navigation() {
        let mut h = Harness::new();
        assert_eq!(h.click(500.0, NAME_Y + 36.0), Some(Nav::NameEntry));
        assert_eq!(h.click(500.0, BACK_Y), Some(Nav::MainMenu));
        assert_eq!(h.send(InputEvent::KeyDown(Key::Escape)), Some(Nav::MainMenu));
    }

    #[test]
    fn test_view_labels() {
        let mut settings = Settings::default();
        settings.difficulty = Difficulty::Easy;
        let view = SettingsScreen::new(&settings).view(&settings, Vec2::ZERO);
        assert!(view.contains_text("Difficulty: Easy"));
        assert!(view.contains_text("Name: Player"));
        assert!(view.contains_text("Fullscreen: Off"));
        assert!(view.contains_text("80%"));
        assert!(view.contains_text("90%"));
    }
}
