//! Browser DOM overlay

use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use super::Viewport;
use super::html;
use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::ui::View;

/// Container the UI elements are rendered into, stacked over the canvas
pub struct Overlay {
    root: Element,
    /// Last markup written (skip DOM writes for unchanged frames)
    last: String,
}

impl Overlay {
    pub fn attach(document: &Document, id: &str) -> Result<Self, JsValue> {
        let root = document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("missing #{}", id)))?;
        Ok(Self {
            root,
            last: String::new(),
        })
    }

    /// Scale the arena-sized container onto the displayed canvas
    pub fn fit(&self, viewport: &Viewport) {
        let style = format!(
            "position:absolute;left:0;top:0;width:{}px;height:{}px;transform-origin:0 0;transform:translate({}px,{}px) scale({});pointer-events:none;overflow:hidden",
            ARENA_WIDTH, ARENA_HEIGHT, viewport.offset.x, viewport.offset.y, viewport.scale
        );
        let _ = self.root.set_attribute("style", &style);
    }

    pub fn draw(&mut self, view: &View) {
        let markup = html::render(view);
        if markup != self.last {
            self.root.set_inner_html(&markup);
            self.last = markup;
        }
    }
}

/// Enter or leave browser fullscreen for `target`
pub fn set_fullscreen(document: &Document, target: &Element, on: bool) {
    let active = document.fullscreen_element().is_some();
    if on && !active {
        if let Err(e) = target.request_fullscreen() {
            log::warn!("Fullscreen request rejected: {:?}", e);
        }
    } else if !on && active {
        document.exit_fullscreen();
    }
}
