//! Display-name dialog, drawn over the settings screen

use glam::Vec2;

use super::input::{InputEvent, Key};
use super::view::{Align, Element, TextSize, View};
use super::widgets::Rect;
use super::{Ctx, Nav, screen_center};
use crate::consts::{CARET_BLINK_SECS, MAX_NAME_LEN};
use crate::sim::Color;

const PROMPT: &str = "Enter your display name:";
const HINT: &str = "Enter = OK    •    Esc = Cancel";
const BOX_SIZE: Vec2 = Vec2::new(520.0, 160.0);
const DIALOG_SHADE_ALPHA: f32 = 0.55;

pub struct NameEntry {
    text: String,
    /// Name in effect when the dialog opened
    previous: String,
    caret_visible: bool,
    caret_timer: f32,
}

impl NameEntry {
    pub fn new(current: &str) -> Self {
        Self {
            text: current.chars().take(MAX_NAME_LEN).collect(),
            previous: current.to_string(),
            caret_visible: true,
            caret_timer: 0.0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The name Enter would commit
    pub fn resolved(&self) -> String {
        let trimmed = self.text.trim();
        if trimmed.is_empty() {
            self.previous.clone()
        } else {
            trimmed.to_string()
        }
    }

    /// Commit the typed name
    pub fn accept(&self, ctx: &mut Ctx) {
        let name = self.resolved();
        if name != ctx.settings.last_name {
            log::info!("Display name set to '{}'", name);
            ctx.settings.last_name = name;
            ctx.settings_changed();
        }
    }

    pub fn handle_event(&mut self, event: &InputEvent, ctx: &mut Ctx) -> Option<Nav> {
        let InputEvent::KeyDown(key) = *event else {
            return None;
        };
        match key {
            Key::Enter => {
                ctx.click();
                self.accept(ctx);
                return Some(Nav::Settings);
            }
            Key::Escape => {
                ctx.click();
                return Some(Nav::Settings);
            }
            Key::Backspace => {
                self.text.pop();
            }
            _ => match key.text() {
                Some(c) if self.text.chars().count() < MAX_NAME_LEN => self.text.push(c),
                _ => {}
            },
        }
        None
    }

    /// Advance the caret blink
    pub fn update(&mut self, dt: f32) {
        self.caret_timer += dt;
        if self.caret_timer >= CARET_BLINK_SECS {
            self.caret_visible = !self.caret_visible;
            self.caret_timer = 0.0;
        }
    }

    pub fn caret_visible(&self) -> bool {
        self.caret_visible
    }

    /// Draw the dialog on top of `base`
    pub fn view_over(&self, mut base: View) -> View {
        let rect = Rect::from_center(screen_center(), BOX_SIZE);

        base.push(Element::Shade {
            alpha: DIALOG_SHADE_ALPHA,
        });
        base.push(Element::Panel {
            rect,
            fill: Color::WHITE,
            border: Color::DARK,
        });
        base.text(
            PROMPT,
            Vec2::new(rect.x + 24.0, rect.y + 16.0),
            TextSize::Normal,
            Align::Left,
        );

        let text_pos = Vec2::new(rect.x + 24.0, rect.y + 64.0);
        base.colored_text(
            self.text.clone(),
            text_pos,
            TextSize::Big,
            Align::Left,
            Color::ACCENT,
        );
        if self.caret_visible {
            // Rough advance for the big font; the DOM overlay re-measures
            let advance = self.text.chars().count() as f32 * TextSize::Big.px() as f32 * 0.55;
            let height = TextSize::Big.px() as f32;
            base.push(Element::Bar {
                rect: Rect::new(text_pos.x + advance + 6.0, text_pos.y + 6.0, 3.0, height - 12.0),
                color: Color::ACCENT,
            });
        }

        base.colored_text(
            HINT,
            Vec2::new(rect.center().x, rect.bottom() - 34.0 + TextSize::Small.px() as f32 / 2.0),
            TextSize::Small,
            Align::Center,
            Color::DARK,
        );
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppEvent;
    use crate::persistence::MemoryStorage;
    use crate::settings::Settings;

    fn type_keys(entry: &mut NameEntry, settings: &mut Settings, keys: &[Key]) -> Option<Nav> {
        let storage = MemoryStorage::new();
        let mut events: Vec<AppEvent> = Vec::new();
        let mut ctx = Ctx {
            settings,
            storage: &storage,
            events: &mut events,
        };
        let mut nav = None;
        for key in keys {
            nav = entry.handle_event(&InputEvent::KeyDown(*key), &mut ctx);
        }
        nav
    }

    fn chars(s: &str) -> Vec<Key> {
        s.chars().map(Key::Char).collect()
    }

    #[test]
    fn test_type_and_accept() {
        let mut settings = Settings::default();
        let mut entry = NameEntry::new(&settings.last_name);

        let mut keys = vec![Key::Backspace; 6];
        keys.extend(chars("Ann"));
        keys.push(Key::Space);
        keys.push(Key::Enter);
        let nav = type_keys(&mut entry, &mut settings, &keys);

        assert_eq!(nav, Some(Nav::Settings));
        assert_eq!(settings.last_name, "Ann");
    }

    #[test]
    fn test_escape_keeps_previous() {
        let mut settings = Settings::default();
        let mut entry = NameEntry::new("Bob");
        let mut keys = chars("by");
        keys.push(Key::Escape);
        assert_eq!(type_keys(&mut entry, &mut settings, &keys), Some(Nav::Settings));
        assert_eq!(settings.last_name, "Player");
    }

    #[test]
    fn test_blank_name_falls_back() {
        let mut settings = Settings::default();
        settings.last_name = "Bob".to_string();
        let mut entry = NameEntry::new("Bob");
        let keys = [
            Key::Backspace,
            Key::Backspace,
            Key::Backspace,
            Key::Space,
            Key::Enter,
        ];
        type_keys(&mut entry, &mut settings, &keys);
        assert_eq!(settings.last_name, "Bob");
    }

    #[test]
    fn test_length_limit() {
        let mut settings = Settings::default();
        let mut entry = NameEntry::new("");
        type_keys(&mut entry, &mut settings, &chars("abcdefghijklmnopqrstuvwxyz"));
        assert_eq!(entry.text(), "abcdefghijklmnop");
    }

    #[test]
    fn test_caret_blinks() {
        let mut entry = NameEntry::new("x");
        assert!(entry.caret_visible());
        entry.update(0.2);
        assert!(entry.caret_visible());
        entry.update(0.25);
        assert!(!entry.caret_visible());
        entry.update(0.4);
        assert!(entry.caret_visible());
    }

    #[test]
    fn test_dialog_overlay() {
        let view = NameEntry::new("Ann").view_over(View::new());
        assert!(view.contains_text(PROMPT));
        assert!(view.contains_text("Ann"));
        assert!(view.elements.iter().any(|e| matches!(e, Element::Panel { .. })));
    }
}
