//! Browser entry points for the interactive globe.
//!
//! One [`GlobeController`] lives in a thread-local for the lifetime of the
//! page; DOM listeners and the animation-frame loop reach it through
//! [`with_app`].

pub mod canvas;
pub mod config;
pub mod globe_controller;
pub mod page;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

use foundation::time::Millis;
use gloo_events::EventListener;
use gloo_net::http::Request;
use gloo_render::{AnimationFrame, request_animation_frame};
use tracing::{debug, error, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Event, MouseEvent, TouchEvent, Window};

use crate::canvas::{CanvasSurface, DomLabel, PointerMapping};
use crate::config::GlobeConfig;
use crate::globe_controller::GlobeController;

pub const CANVAS_ID: &str = "globe";
pub const LABEL_ID: &str = "countryLabel";

static INITIALIZED: AtomicBool = AtomicBool::new(false);

struct App {
    controller: GlobeController<CanvasSurface, DomLabel>,
    scale_factor: f64,
    frame: Option<AnimationFrame>,
    // Dropping a listener unbinds it.
    _listeners: Vec<EventListener>,
}

thread_local! {
    static STATE: RefCell<Option<App>> = const { RefCell::new(None) };
    static MARQUEE: RefCell<Option<Rc<RefCell<Option<AnimationFrame>>>>> = const { RefCell::new(None) };
}

fn with_app<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&mut App) -> R,
{
    STATE
        .try_with(|state| state.borrow_mut().as_mut().map(f))
        .ok()
        .flatten()
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

fn now_ms() -> Millis {
    Millis(
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0),
    )
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    let window = window()?;
    let document = document()?;
    page::bind_nav_button(&window, &document).forget();
    if document.ready_state() == "complete" {
        start_marquee_logged();
    } else {
        EventListener::once(&window, "load", |_| start_marquee_logged()).forget();
    }
    Ok(())
}

/// Fetches the world data and starts the globe. `config_json` may override
/// any field of [`GlobeConfig`].
#[wasm_bindgen]
pub fn init_globe(config_json: Option<String>) -> Result<(), JsValue> {
    let config = GlobeConfig::from_json_str(config_json.as_deref().unwrap_or(""))
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    spawn_local(async move {
        if let Err(err) = init_globe_inner(config).await {
            error!(?err, "globe init failed");
        }
    });
    Ok(())
}

/// Lets pointer events pass through the overlay to the globe.
#[wasm_bindgen]
pub fn enable_interaction() -> Result<(), JsValue> {
    page::set_overlay_pointer_events(&document()?, "none")
}

#[wasm_bindgen]
pub fn disable_interaction() -> Result<(), JsValue> {
    page::set_overlay_pointer_events(&document()?, "auto")
}

#[wasm_bindgen]
pub fn start_marquee() -> Result<(), JsValue> {
    if MARQUEE.with(|m| m.borrow().is_some()) {
        return Ok(());
    }
    let handle = page::start_marquee(&document()?)?;
    MARQUEE.with(|m| *m.borrow_mut() = Some(handle));
    Ok(())
}

fn start_marquee_logged() {
    if let Err(err) = start_marquee() {
        debug!(?err, "marquee not started");
    }
}

async fn fetch_text(url: &str) -> Result<String, JsValue> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    if !resp.ok() {
        return Err(JsValue::from_str(&format!("HTTP {} for {url}", resp.status())));
    }
    resp.text()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

async fn init_globe_inner(config: GlobeConfig) -> Result<(), JsValue> {
    let window = window()?;
    let document = document()?;
    let surface = CanvasSurface::from_document(&document, CANVAS_ID)?;
    let label = DomLabel::from_document(&document, LABEL_ID)?;

    let topology = fetch_text(&config.world_url).await?;
    let names = fetch_text(&config.names_url).await?;
    let loaded = formats::load_world(&topology, &names, &config.load_options())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let mut controller = GlobeController::new(&config, loaded, surface, label, now_ms());
    fit_to_viewport(&document, &mut controller, config.scale_factor);
    let listeners = bind_listeners(&window, controller.surface().canvas());

    STATE.with(|state| {
        *state.borrow_mut() = Some(App {
            controller,
            scale_factor: config.scale_factor,
            frame: None,
            _listeners: listeners,
        });
    });
    schedule_frame();
    info!("globe started");
    Ok(())
}

fn fit_to_viewport(
    document: &Document,
    controller: &mut GlobeController<CanvasSurface, DomLabel>,
    scale_factor: f64,
) {
    let Some(root) = document.document_element() else {
        return;
    };
    let width = f64::from(root.client_width()) * scale_factor;
    let height = f64::from(root.client_height()) * scale_factor;
    controller.surface().set_size(width as u32, height as u32);
    controller.resize(width, height);
}

fn schedule_frame() {
    let handle = request_animation_frame(|timestamp| {
        let running = with_app(|app| {
            app.frame.take();
            app.controller.frame(Millis(timestamp));
            app.controller.events_mut().drain();
        });
        if running.is_some() {
            schedule_frame();
        }
    });
    with_app(|app| app.frame = Some(handle));
}

fn client_point(event: &Event) -> Option<(f64, f64)> {
    if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
        return Some((f64::from(mouse.client_x()), f64::from(mouse.client_y())));
    }
    let touch = event.dyn_ref::<TouchEvent>()?.touches().get(0)?;
    Some((f64::from(touch.client_x()), f64::from(touch.client_y())))
}

/// Runs `f` with the pointer's client position and the canvas mapping.
fn with_pointer<F>(event: &Event, f: F)
where
    F: FnOnce(&mut GlobeController<CanvasSurface, DomLabel>, PointerMapping, [f64; 2]),
{
    let Some((x, y)) = client_point(event) else {
        return;
    };
    with_app(|app| {
        let mapping = app.controller.surface().pointer_mapping();
        f(&mut app.controller, mapping, [x, y]);
    });
}

fn bind_listeners(window: &Window, canvas: &web_sys::HtmlCanvasElement) -> Vec<EventListener> {
    let mut listeners = Vec::new();

    for kind in ["mousedown", "touchstart"] {
        listeners.push(EventListener::new(canvas, kind, |event| {
            with_pointer(event, |c, m, at| c.on_drag_start(m.drag_point(at)));
        }));
    }
    for kind in ["mousemove", "touchmove"] {
        listeners.push(EventListener::new(window, kind, |event| {
            with_pointer(event, |c, m, at| {
                c.on_drag(m.drag_point(at));
            });
        }));
        listeners.push(EventListener::new(canvas, kind, |event| {
            with_pointer(event, |c, m, at| c.on_pointer_move(m.pick_point(at), now_ms()));
        }));
    }
    for kind in ["mouseup", "touchend", "touchcancel"] {
        listeners.push(EventListener::new(window, kind, |_| {
            with_app(|app| app.controller.on_drag_end(now_ms()));
        }));
    }
    listeners.push(EventListener::new(window, "resize", |_| {
        let Ok(document) = document() else {
            return;
        };
        with_app(|app| {
            let scale_factor = app.scale_factor;
            fit_to_viewport(&document, &mut app.controller, scale_factor);
        });
    }));

    listeners
}
