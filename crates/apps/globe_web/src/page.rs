//! Decorative page behavior around the globe: nav button styling, the
//! scrolling marquee and the interaction overlay.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::EventListener;
use gloo_render::{AnimationFrame, request_animation_frame};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement, Window};

pub const NAV_BUTTON_SELECTOR: &str = ".nav-prime-btn";
pub const OVERLAY_ID: &str = "overlay-layer";
pub const MARQUEE_SPEED_PX: f64 = 0.25;

/// The nav button switches style once the page scrolls past 60% of the viewport.
pub fn nav_scrolled(scroll_y: f64, inner_height: f64) -> bool {
    scroll_y > inner_height * 0.6
}

/// Horizontal offset of the marquee strip.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Marquee {
    offset: f64,
    content_width: f64,
    speed: f64,
}

impl Marquee {
    pub fn new(content_width: f64, speed: f64) -> Self {
        Self {
            offset: 0.0,
            content_width,
            speed,
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Moves one frame left, wrapping once a full content width has passed.
    pub fn step(&mut self) -> f64 {
        self.offset -= self.speed;
        if self.offset.abs() >= self.content_width {
            self.offset = 0.0;
        }
        self.offset
    }
}

pub fn update_nav_button(window: &Window, document: &Document) -> Result<(), JsValue> {
    let Some(button) = document.query_selector(NAV_BUTTON_SELECTOR)? else {
        return Ok(());
    };
    let scrolled = nav_scrolled(window.scroll_y()?, window.inner_height()?.as_f64().unwrap_or(0.0));
    button.class_list().toggle_with_force("scrolled", scrolled)?;
    Ok(())
}

/// Keeps the nav button style in sync with scrolling.
pub fn bind_nav_button(window: &Window, document: &Document) -> EventListener {
    let win = window.clone();
    let doc = document.clone();
    EventListener::new(document, "scroll", move |_| {
        if let Err(err) = update_nav_button(&win, &doc) {
            tracing::warn!(?err, "nav button update failed");
        }
    })
}

pub fn set_overlay_pointer_events(document: &Document, value: &str) -> Result<(), JsValue> {
    let overlay = document
        .get_element_by_id(OVERLAY_ID)
        .ok_or_else(|| JsValue::from_str("missing #overlay-layer"))?
        .dyn_into::<HtmlElement>()?;
    overlay.style().set_property("pointer-events", value)
}

/// Clones the first marquee block once and scrolls the strip every frame.
pub fn start_marquee(document: &Document) -> Result<Rc<RefCell<Option<AnimationFrame>>>, JsValue> {
    let inner = document
        .query_selector(".marquee-inner")?
        .ok_or_else(|| JsValue::from_str("missing .marquee-inner"))?
        .dyn_into::<HtmlElement>()?;
    let content = document
        .query_selector(".marquee-content")?
        .ok_or_else(|| JsValue::from_str("missing .marquee-content"))?
        .dyn_into::<HtmlElement>()?;

    let marquee = Marquee::new(f64::from(content.offset_width()), MARQUEE_SPEED_PX);
    let clone = content.clone_node_with_deep(true)?;
    inner.append_child(&clone)?;

    let handle = Rc::new(RefCell::new(None));
    schedule_marquee(inner, Rc::new(RefCell::new(marquee)), Rc::clone(&handle));
    Ok(handle)
}

fn schedule_marquee(
    inner: HtmlElement,
    marquee: Rc<RefCell<Marquee>>,
    handle: Rc<RefCell<Option<AnimationFrame>>>,
) {
    let next = Rc::clone(&handle);
    let frame = request_animation_frame(move |_| {
        next.borrow_mut().take();
        let offset = marquee.borrow_mut().step();
        let _ = inner
            .style()
            .set_property("transform", &format!("translateX({offset}px)"));
        schedule_marquee(inner, marquee, next);
    });
    *handle.borrow_mut() = Some(frame);
}

#[cfg(test)]
mod tests {
    use super::{Marquee, nav_scrolled};

    #[test]
    fn nav_threshold_is_strict() {
        assert!(!nav_scrolled(600.0, 1000.0));
        assert!(nav_scrolled(600.5, 1000.0));
        assert!(!nav_scrolled(0.0, 1000.0));
    }

    #[test]
    fn marquee_wraps_at_content_width() {
        let mut m = Marquee::new(1.0, 0.25);
        assert_eq!(m.step(), -0.25);
        assert_eq!(m.step(), -0.5);
        assert_eq!(m.step(), -0.75);
        assert_eq!(m.step(), 0.0);
        assert_eq!(m.offset(), 0.0);
    }
}
