//! Platform-neutral input events
//!
//! Front-ends translate their native events into these and queue them; the
//! app drains the queue once per frame.

use glam::Vec2;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Escape,
    Space,
    Backspace,
    Home,
    End,
    /// Any other printable character, as typed
    Char(char),
}

impl Key {
    /// Case-insensitive shortcut match
    pub fn is_char(&self, c: char) -> bool {
        matches!(self, Key::Char(k) if k.eq_ignore_ascii_case(&c))
    }

    /// Text this key inserts into a text field
    pub fn text(&self) -> Option<char> {
        match self {
            Key::Space => Some(' '),
            Key::Char(c) if !c.is_control() => Some(*c),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// One queued input event. Positions are in arena coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    MouseDown { pos: Vec2, button: MouseButton },
    MouseUp { pos: Vec2, button: MouseButton },
    MouseMove { pos: Vec2 },
    /// Wheel notches; negative scrolls up
    Wheel { notches: i32 },
    /// Window close request
    Quit,
}

impl InputEvent {
    /// Left-button press position, if this is one
    pub fn left_click(&self) -> Option<Vec2> {
        match self {
            InputEvent::MouseDown {
                pos,
                button: MouseButton::Left,
            } => Some(*pos),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcut_matching() {
        assert!(Key::Char('L').is_char('l'));
        assert!(Key::Char('s').is_char('s'));
        assert!(!Key::Enter.is_char('e'));
    }

    #[test]
    fn test_key_text() {
        assert_eq!(Key::Space.text(), Some(' '));
        assert_eq!(Key::Char('é').text(), Some('é'));
        assert_eq!(Key::Char('\u{7}').text(), None);
        assert_eq!(Key::Backspace.text(), None);
    }

    #[test]
    fn test_left_click() {
        let pos = Vec2::new(3.0, 4.0);
        let down = InputEvent::MouseDown {
            pos,
            button: MouseButton::Left,
        };
        assert_eq!(down.left_click(), Some(pos));
        let right = InputEvent::MouseDown {
            pos,
            button: MouseButton::Right,
        };
        assert_eq!(right.left_click(), None);
    }
}
