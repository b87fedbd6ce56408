//! `View` elements as absolutely positioned HTML
//!
//! Coordinates are arena pixels; the overlay container is scaled with a CSS
//! transform to match the canvas.

use std::fmt::Write;

use crate::sim::Color;
use crate::ui::{Align, Element, TextSize, View};

const BUTTON_FILL: Color = Color::WHITE;
const BUTTON_HOVER_FILL: Color = Color::rgb(235, 235, 235);
const BUTTON_DISABLED_FILL: Color = Color::rgb(200, 200, 200);
const BUTTON_DISABLED_TEXT: Color = Color::rgb(120, 120, 120);
const BUTTON_DISABLED_BORDER: Color = Color::rgb(160, 160, 160);
const SLIDER_TRACK: Color = Color::rgb(210, 210, 210);

/// Escape text for element content
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn font(size: TextSize) -> String {
    let family = match size {
        TextSize::Mono => "Consolas, monospace",
        _ => "sans-serif",
    };
    format!("font:{}px {}", size.px(), family)
}

/// Render all overlay elements of `view`
pub fn render(view: &View) -> String {
    let mut html = String::new();
    for element in &view.elements {
        // Writing to a String cannot fail
        let _ = render_element(&mut html, element);
    }
    html
}

fn render_element(out: &mut String, element: &Element) -> std::fmt::Result {
    match element {
        Element::Text {
            text,
            pos,
            size,
            align,
            color,
        } => {
            let anchor = match align {
                Align::Left => "",
                Align::Center => "transform:translate(-50%,-50%);",
            };
            write!(
                out,
                r#"<div style="position:absolute;left:{}px;top:{}px;{}{};color:{};white-space:pre">{}</div>"#,
                pos.x,
                pos.y,
                anchor,
                font(*size),
                color.to_css(),
                escape(text)
            )
        }
        Element::Button {
            label,
            rect,
            hovered,
            disabled,
        } => {
            let (fill, text, border) = if *disabled {
                (BUTTON_DISABLED_FILL, BUTTON_DISABLED_TEXT, BUTTON_DISABLED_BORDER)
            } else if *hovered {
                (BUTTON_HOVER_FILL, Color::BLACK, Color::DARK)
            } else {
                (BUTTON_FILL, Color::BLACK, Color::DARK)
            };
            write!(
                out,
                r#"<div style="position:absolute;left:{}px;top:{}px;width:{}px;height:{}px;box-sizing:border-box;background:{};color:{};border:3px solid {};border-radius:18px;display:flex;align-items:center;justify-content:center;{}">{}</div>"#,
                rect.x,
                rect.y,
                rect.w,
                rect.h,
                fill.to_css(),
                text.to_css(),
                border.to_css(),
                font(TextSize::Normal),
                escape(label)
            )
        }
        Element::Slider { track, value } => {
            let fill_w = (value * track.w).trunc();
            let hx = track.x + fill_w;
            let hy = track.y + track.h / 2.0;
            write!(
                out,
                r#"<div style="position:absolute;left:{}px;top:{}px;width:{}px;height:{}px;background:{};border-radius:5px"></div>"#,
                track.x,
                track.y,
                track.w,
                track.h,
                SLIDER_TRACK.to_css()
            )?;
            write!(
                out,
                r#"<div style="position:absolute;left:{}px;top:{}px;width:{}px;height:{}px;background:{};border-radius:5px"></div>"#,
                track.x,
                track.y,
                fill_w,
                track.h,
                Color::ACCENT.to_css()
            )?;
            write!(
                out,
                r#"<div style="position:absolute;left:{}px;top:{}px;width:14px;height:14px;background:{};border:3px solid {};border-radius:50%"></div>"#,
                hx - 10.0,
                hy - 10.0,
                Color::WHITE.to_css(),
                Color::DARK.to_css()
            )
        }
        Element::Panel { rect, fill, border } => write!(
            out,
            r#"<div style="position:absolute;left:{}px;top:{}px;width:{}px;height:{}px;box-sizing:border-box;background:{};border:3px solid {};border-radius:18px"></div>"#,
            rect.x,
            rect.y,
            rect.w,
            rect.h,
            fill.to_css(),
            border.to_css()
        ),
        Element::Bar { rect, color } => write!(
            out,
            r#"<div style="position:absolute;left:{}px;top:{}px;width:{}px;height:{}px;background:{}"></div>"#,
            rect.x,
            rect.y,
            rect.w,
            rect.h,
            color.to_css()
        ),
        Element::Shade { alpha } => write!(
            out,
            r#"<div style="position:absolute;left:0;top:0;width:100%;height:100%;background:rgba(0,0,0,{:.2})"></div>"#,
            alpha
        ),
    }
}
