//! Hit-testable widgets

use glam::Vec2;

use super::input::{InputEvent, MouseButton};

/// Axis-aligned rectangle in arena coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(center.x - size.x / 2.0, center.y - size.y / 2.0, size.x, size.y)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Half-open on the right and bottom edges
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }
}

/// Default button size
pub const BUTTON_SIZE: Vec2 = Vec2::new(240.0, 64.0);

/// A clickable, labelled rectangle
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub label: String,
    pub rect: Rect,
}

impl Button {
    pub fn new(label: impl Into<String>, center: Vec2, size: Vec2) -> Self {
        Self {
            label: label.into(),
            rect: Rect::from_center(center, size),
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        self.rect.contains(p)
    }

    /// True if `event` is a left click on this button
    pub fn clicked(&self, event: &InputEvent) -> bool {
        event.left_click().is_some_and(|p| self.contains(p))
    }
}

/// Radius of the slider's drag handle
pub const SLIDER_HANDLE_RADIUS: f32 = 10.0;
/// Height of the slider track
pub const SLIDER_TRACK_HEIGHT: f32 = 10.0;

/// What a slider did with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderResponse {
    Ignored,
    /// Drag started (value jumped to the pointer)
    Grabbed,
    /// Value changed while dragging
    Moved,
    /// Drag ended
    Released,
}

impl SliderResponse {
    pub fn handled(&self) -> bool {
        *self != SliderResponse::Ignored
    }
}

/// Horizontal 0..1 slider
#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    pub track: Rect,
    pub value: f32,
    pub dragging: bool,
}

impl Slider {
    pub fn new(left: f32, top: f32, width: f32, value: f32) -> Self {
        Self {
            track: Rect::new(left, top, width, SLIDER_TRACK_HEIGHT),
            value: value.clamp(0.0, 1.0),
            dragging: false,
        }
    }

    pub fn handle_pos(&self) -> Vec2 {
        Vec2::new(
            self.track.x + (self.value * self.track.w).trunc(),
            self.track.center().y,
        )
    }

    fn set_value_from_x(&mut self, x: f32) {
        self.value = ((x - self.track.x) / self.track.w).clamp(0.0, 1.0);
    }

    pub fn set_value(&mut self, value: f32) {
        self.value = value.clamp(0.0, 1.0);
    }

    pub fn handle_event(&mut self, event: &InputEvent) -> SliderResponse {
        match *event {
            InputEvent::MouseDown {
                pos,
                button: MouseButton::Left,
            } => {
                let grab = SLIDER_HANDLE_RADIUS + 4.0;
                let near_handle = pos.distance_squared(self.handle_pos()) <= grab * grab;
                if near_handle || self.track.contains(pos) {
                    self.dragging = true;
                    self.set_value_from_x(pos.x);
                    SliderResponse::Grabbed
                } else {
                    SliderResponse::Ignored
                }
            }
            InputEvent::MouseUp {
                button: MouseButton::Left,
                ..
            } if self.dragging => {
                self.dragging = false;
                SliderResponse::Released
            }
            InputEvent::MouseMove { pos } if self.dragging => {
                self.set_value_from_x(pos.x);
                SliderResponse::Moved
            }
            _ => SliderResponse::Ignored,
        }
    }
}
