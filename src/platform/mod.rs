//! Platform glue
//!
//! Translates browser input into `InputEvent`s and draws `View` overlays.
//! The translation and HTML generation are plain functions so they can be
//! tested natively; only `dom` touches `web_sys`.

pub mod html;

#[cfg(target_arch = "wasm32")]
pub mod dom;

use glam::Vec2;

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::ui::{Key, MouseButton};

/// Map a `KeyboardEvent.key` value to a game key
pub fn key_from_browser(key: &str) -> Option<Key> {
    let mapped = match key {
        "ArrowUp" | "Up" => Key::Up,
        "ArrowDown" | "Down" => Key::Down,
        "ArrowLeft" | "Left" => Key::Left,
        "ArrowRight" | "Right" => Key::Right,
        "Enter" => Key::Enter,
        "Escape" | "Esc" => Key::Escape,
        " " | "Spacebar" => Key::Space,
        "Backspace" => Key::Backspace,
        "Home" => Key::Home,
        "End" => Key::End,
        other => {
            // Named keys ("Shift", "F5", ...) are longer than one character
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Char(c),
                _ => return None,
            }
        }
    };
    Some(mapped)
}

/// Map `MouseEvent.button`
pub fn mouse_button_from_browser(button: i16) -> Option<MouseButton> {
    match button {
        0 => Some(MouseButton::Left),
        1 => Some(MouseButton::Middle),
        2 => Some(MouseButton::Right),
        _ => None,
    }
}

/// Wheel delta to whole notches (positive scrolls down)
pub fn wheel_notches(delta_y: f64) -> i32 {
    if delta_y > 0.0 {
        1
    } else if delta_y < 0.0 {
        -1
    } else {
        0
    }
}

/// Where the arena sits inside a display area of `display` CSS pixels
///
/// The arena is scaled uniformly and centered (letterboxed).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub offset: Vec2,
    pub scale: f32,
}

impl Viewport {
    pub fn fit(display: Vec2) -> Self {
        let scale = (display.x / ARENA_WIDTH).min(display.y / ARENA_HEIGHT).max(f32::EPSILON);
        let size = Vec2::new(ARENA_WIDTH, ARENA_HEIGHT) * scale;
        Self {
            offset: (display - size) / 2.0,
            scale,
        }
    }

    /// Display position to arena coordinates
    pub fn to_arena(&self, client: Vec2) -> Vec2 {
        (client - self.offset) / self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(key_from_browser("ArrowLeft"), Some(Key::Left));
        assert_eq!(key_from_browser(" "), Some(Key::Space));
        assert_eq!(key_from_browser("Escape"), Some(Key::Escape));
        assert_eq!(key_from_browser("l"), Some(Key::Char('l')));
        assert_eq!(key_from_browser("ü"), Some(Key::Char('ü')));
        assert_eq!(key_from_browser("Shift"), None);
        assert_eq!(key_from_browser(""), None);
    }

    #[test]
    fn test_mouse_and_wheel() {
        assert_eq!(mouse_button_from_browser(0), Some(MouseButton::Left));
        assert_eq!(mouse_button_from_browser(4), None);
        assert_eq!(wheel_notches(120.0), 1);
        assert_eq!(wheel_notches(-3.0), -1);
        assert_eq!(wheel_notches(0.0), 0);
    }

    #[test]
    fn test_viewport_letterbox() {
        // Wider than 5:4: bars left and right
        let vp = Viewport::fit(Vec2::new(1200.0, 400.0));
        assert_eq!(vp.scale, 0.5);
        assert_eq!(vp.offset, Vec2::new(350.0, 0.0));
        assert_eq!(vp.to_arena(Vec2::new(350.0, 0.0)), Vec2::ZERO);
        assert_eq!(vp.to_arena(Vec2::new(850.0, 400.0)), Vec2::new(1000.0, 800.0));

        let exact = Viewport::fit(Vec2::new(1000.0, 800.0));
        assert_eq!(exact.to_arena(Vec2::new(12.0, 34.0)), Vec2::new(12.0, 34.0));
    }
}
