use std::f64::consts::TAU;

use layers::{FillStyle, Label, Rgb, Shape, Surface};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement};

/// `<canvas>` 2D context as a [`Surface`].
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn from_document(document: &Document, id: &str) -> Result<Self, JsValue> {
        let canvas = document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("missing #{id}")))?
            .dyn_into::<HtmlCanvasElement>()?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn set_size(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    pub fn pointer_mapping(&self) -> PointerMapping {
        let rect = self.canvas.get_bounding_client_rect();
        PointerMapping {
            origin: [rect.left(), rect.top()],
            css_size: [rect.width(), rect.height()],
            canvas_size: [
                f64::from(self.canvas.width()),
                f64::from(self.canvas.height()),
            ],
        }
    }
}

/// Client coordinates relative to the canvas box.
///
/// Drags work in CSS pixels so rotation speed does not depend on the backing
/// store size; hit tests work in canvas pixels to match the projection.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerMapping {
    pub origin: [f64; 2],
    pub css_size: [f64; 2],
    pub canvas_size: [f64; 2],
}

impl PointerMapping {
    /// Offset from the canvas' top-left corner in CSS pixels.
    pub fn drag_point(&self, client: [f64; 2]) -> [f64; 2] {
        [client[0] - self.origin[0], client[1] - self.origin[1]]
    }

    /// Position in canvas pixels.
    pub fn pick_point(&self, client: [f64; 2]) -> [f64; 2] {
        let [x, y] = self.drag_point(client);
        let axis = |i: usize| {
            if self.css_size[i] > 0.0 {
                self.canvas_size[i] / self.css_size[i]
            } else {
                1.0
            }
        };
        [x * axis(0), y * axis(1)]
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self) {
        self.ctx.clear_rect(
            0.0,
            0.0,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        );
    }

    fn fill(&mut self, shape: &Shape, style: FillStyle) {
        let ctx = &self.ctx;
        ctx.begin_path();
        match shape {
            Shape::Disc { center, radius } => {
                if ctx.arc(center[0], center[1], *radius, 0.0, TAU).is_err() {
                    return;
                }
            }
            Shape::Rings(rings) => {
                for ring in rings {
                    let Some((first, rest)) = ring.split_first() else {
                        continue;
                    };
                    ctx.move_to(first[0], first[1]);
                    for p in rest {
                        ctx.line_to(p[0], p[1]);
                    }
                    ctx.close_path();
                }
            }
        }
        ctx_set_fill_style(ctx, &style.color.to_css());
        ctx.set_global_alpha(style.alpha);
        ctx.fill();
        ctx.set_global_alpha(1.0);
    }
}

/// Country label element.
pub struct DomLabel {
    element: HtmlElement,
}

impl DomLabel {
    pub fn from_document(document: &Document, id: &str) -> Result<Self, JsValue> {
        let element = document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("missing #{id}")))?
            .dyn_into::<HtmlElement>()?;
        Ok(Self { element })
    }
}

impl Label for DomLabel {
    fn set_text(&mut self, text: &str) {
        self.element.set_text_content(Some(text));
    }

    fn set_color(&mut self, color: Rgb) {
        let _ = self.element.style().set_property("color", &color.to_css());
    }
}

fn ctx_set_fill_style(ctx: &CanvasRenderingContext2d, value: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("fillStyle"),
        &JsValue::from_str(value),
    );
}
