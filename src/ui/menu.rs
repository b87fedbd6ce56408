//! Main menu

use glam::Vec2;

use super::input::{InputEvent, Key};
use super::view::{Align, TextSize, View};
use super::widgets::{BUTTON_SIZE, Button};
use super::{Ctx, Nav, screen_center};
use crate::sim::Color;

const HINT: &str =
    "ENTER/SPACE = Play   •   L = Leaderboard   •   S = Settings   •   ESC = Quit";

pub struct MainMenu {
    play: Button,
    leaderboard: Button,
    settings: Button,
    quit: Button,
}

impl Default for MainMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl MainMenu {
    pub fn new() -> Self {
        let c = screen_center();
        Self {
            play: Button::new("Play", c, BUTTON_SIZE),
            leaderboard: Button::new(
                "Leaderboard",
                c + Vec2::new(0.0, 90.0),
                Vec2::new(260.0, 64.0),
            ),
            settings: Button::new(
                "Settings",
                c + Vec2::new(0.0, 180.0),
                Vec2::new(220.0, 64.0),
            ),
            quit: Button::new("Quit", c + Vec2::new(0.0, 270.0), BUTTON_SIZE),
        }
    }

    pub fn handle_event(&mut self, event: &InputEvent, ctx: &mut Ctx) -> Option<Nav> {
        let nav = match *event {
            InputEvent::KeyDown(Key::Enter | Key::Space) => Nav::Play,
            InputEvent::KeyDown(Key::Escape) => Nav::Quit,
            InputEvent::KeyDown(k) if k.is_char('l') => Nav::Leaderboard,
            InputEvent::KeyDown(k) if k.is_char('s') => Nav::Settings,
            _ if self.play.clicked(event) => Nav::Play,
            _ if self.leaderboard.clicked(event) => Nav::Leaderboard,
            _ if self.settings.clicked(event) => Nav::Settings,
            _ if self.quit.clicked(event) => Nav::Quit,
            _ => return None,
        };
        ctx.click();
        Some(nav)
    }

    pub fn view(&self, mouse: Vec2) -> View {
        let c = screen_center();
        let mut view = View::new();
        view.colored_text(
            "Circle Eater",
            c - Vec2::new(0.0, 180.0),
            TextSize::Title,
            Align::Center,
            Color::ACCENT,
        );
        view.text(
            "Eat all circles as fast as you can!",
            c - Vec2::new(0.0, 130.0),
            TextSize::Normal,
            Align::Center,
        );
        for button in [&self.play, &self.leaderboard, &self.settings, &self.quit] {
            view.button(button, mouse);
        }
        view.colored_text(
            HINT,
            c + Vec2::new(0.0, 360.0),
            TextSize::Small,
            Align::Center,
            Color::DARK,
        );
        view
    }
}
