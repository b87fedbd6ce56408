//! Declarative per-frame draw list
//!
//! Screens describe what should be on screen; front-ends decide how. The web
//! build draws `scene` with the SDF pipeline and `elements` as a DOM overlay.

use glam::Vec2;

use super::widgets::{Button, Rect, Slider};
use crate::sim::{Circle, Color, Player};

/// Font size classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    /// 22px
    Small,
    /// 28px
    Normal,
    /// 48px
    Big,
    /// 56px
    Title,
    /// 24px monospace (table rows)
    Mono,
}

impl TextSize {
    pub fn px(&self) -> u32 {
        match self {
            TextSize::Small => 22,
            TextSize::Normal => 28,
            TextSize::Big => 48,
            TextSize::Title => 56,
            TextSize::Mono => 24,
        }
    }
}

/// Horizontal anchor of a text position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// One thing to draw on top of the scene
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text {
        text: String,
        /// Top-left for `Align::Left`, center for `Align::Center`
        pos: Vec2,
        size: TextSize,
        align: Align,
        color: Color,
    },
    Button {
        label: String,
        rect: Rect,
        hovered: bool,
        disabled: bool,
    },
    Slider {
        track: Rect,
        value: f32,
    },
    /// Filled box with a border (dialogs)
    Panel { rect: Rect, fill: Color, border: Color },
    /// Solid filled rectangle (caret)
    Bar { rect: Rect, color: Color },
    /// Translucent full-screen dimming
    Shade { alpha: f32 },
}

/// The arena contents for the GPU pass
#[derive(Debug, Clone, PartialEq)]
pub struct SceneView {
    pub player: Player,
    pub circles: Vec<Circle>,
    /// Frozen win frame: drawn blurred
    pub blurred: bool,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub background: Color,
    pub scene: Option<SceneView>,
    pub elements: Vec<Element>,
}

impl Default for View {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            scene: None,
            elements: Vec::new(),
        }
    }
}

impl View {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&mut self, text: impl Into<String>, pos: Vec2, size: TextSize, align: Align) {
        self.colored_text(text, pos, size, align, Color::BLACK);
    }

    pub fn colored_text(
        &mut self,
        text: impl Into<String>,
        pos: Vec2,
        size: TextSize,
        align: Align,
        color: Color,
    ) {
        self.elements.push(Element::Text {
            text: text.into(),
            pos,
            size,
            align,
            color,
        });
    }

    pub fn button(&mut self, button: &Button, mouse: Vec2) {
        self.button_with_state(button, mouse, false);
    }

    pub fn button_with_state(&mut self, button: &Button, mouse: Vec2, disabled: bool) {
        self.elements.push(Element::Button {
            label: button.label.clone(),
            rect: button.rect,
            hovered: !disabled && button.contains(mouse),
            disabled,
        });
    }

    pub fn slider(&mut self, slider: &Slider) {
        self.elements.push(Element::Slider {
            track: slider.track,
            value: slider.value,
        });
    }

    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// All text in draw order (handy for assertions and the native log)
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text { text, .. } => Some(text.as_str()),
            Element::Button { label, .. } => Some(label.as_str()),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }
}
