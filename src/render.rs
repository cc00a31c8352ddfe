//! Card frame rendering.
//!
//! A frame is always composed in the same order: the face image, then the card's
//! perspective tilt, then the glare overlay translated by the drag offset.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::geometry::{GlarePath, perspective_transform};
use crate::model::CardState;
use crate::theme::{self, Rgba};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no global window")]
    NoWindow,
    #[error("canvas has no 2d context")]
    NoContext,
    #[error("js error: {0}")]
    Js(String),
}

impl From<JsValue> for RenderError {
    fn from(value: JsValue) -> Self {
        let msg = value
            .as_string()
            .or_else(|| {
                value
                    .dyn_ref::<js_sys::Error>()
                    .map(|e| String::from(e.message()))
            })
            .unwrap_or_else(|| format!("{:?}", value));
        RenderError::Js(msg)
    }
}

/// Glare layer geometry and paint; built once per card size.
#[derive(Clone, Debug, PartialEq)]
pub struct GlareOverlay {
    pub path: GlarePath,
    pub width: f64,
    pub height: f64,
    pub alpha: f64,
    pub start: Rgba,
    pub end: Rgba,
}

impl GlareOverlay {
    pub fn new(width: f64, height: f64, alpha: f64) -> Self {
        Self {
            path: GlarePath::new(width, height),
            width,
            height,
            alpha,
            start: theme::YELLOW.lighting(theme::YELLOW, theme::WHITE),
            end: theme::PURPLE.lighting(theme::YELLOW, theme::WHITE),
        }
    }

    /// Horizontal translation of the layer for this state.
    pub fn translation(&self, state: &CardState) -> f64 {
        state.offset_x
    }

    fn draw(&self, ctx: &CanvasRenderingContext2d, state: &CardState) -> Result<(), RenderError> {
        let gradient = ctx.create_linear_gradient(0.0, 0.0, self.width, self.height);
        gradient.add_color_stop(0.0, &self.start.to_css())?;
        gradient.add_color_stop(1.0, &self.end.to_css())?;
        isolated(ctx, |ctx| {
            ctx.translate(self.translation(state), 0.0)?;
            ctx.set_global_composite_operation("color-dodge")?;
            ctx.set_global_alpha(self.alpha);
            ctx.set_fill_style_canvas_gradient(&gradient);
            let [first, rest @ ..] = &self.path.vertices;
            ctx.begin_path();
            ctx.move_to(first.0, first.1);
            for (x, y) in rest {
                ctx.line_to(*x, *y);
            }
            ctx.close_path();
            ctx.fill();
            Ok(())
        })
    }
}

/// Drawing state stack of a 2d context.
trait StateStack {
    fn push_state(&self);
    fn pop_state(&self);
}

impl StateStack for CanvasRenderingContext2d {
    fn push_state(&self) {
        self.save();
    }

    fn pop_state(&self) {
        self.restore();
    }
}

/// Runs `body` inside a saved state; the state is restored whether or not `body` fails.
fn isolated<C, T, F>(ctx: &C, body: F) -> Result<T, RenderError>
where
    C: StateStack,
    F: FnOnce(&C) -> Result<T, RenderError>,
{
    ctx.push_state();
    let out = body(ctx);
    ctx.pop_state();
    out
}

pub struct CardRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    image: Option<HtmlImageElement>,
    overlay: GlareOverlay,
    camera_distance_px: f64,
}

impl CardRenderer {
    /// Sizes the canvas backing store to `width × height` device pixels.
    pub fn new(
        canvas: HtmlCanvasElement,
        width: f64,
        height: f64,
        glare_alpha: f64,
        camera_distance_px: f64,
    ) -> Result<Self, RenderError> {
        canvas.set_width(width.round().max(0.0) as u32);
        canvas.set_height(height.round().max(0.0) as u32);
        let ctx = canvas
            .get_context("2d")?
            .ok_or(RenderError::NoContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| RenderError::NoContext)?;
        Ok(Self {
            canvas,
            ctx,
            image: None,
            overlay: GlareOverlay::new(width, height, glare_alpha),
            camera_distance_px,
        })
    }

    pub fn set_image(&mut self, image: HtmlImageElement) {
        self.image = Some(image);
    }

    pub fn image(&self) -> Option<&HtmlImageElement> {
        self.image.as_ref()
    }

    pub fn render(&self, state: &CardState) -> Result<(), RenderError> {
        if !self.canvas.is_connected() {
            return Ok(());
        }
        let (w, h) = (self.overlay.width, self.overlay.height);
        let ctx = &self.ctx;
        ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
        ctx.clear_rect(0.0, 0.0, w, h);

        // Face
        match &self.image {
            Some(img) if img.complete() && img.natural_width() > 0 => {
                ctx.draw_image_with_html_image_element_and_dw_and_dh(img, 0.0, 0.0, w, h)?;
            }
            _ => {
                ctx.set_fill_style_str(&theme::FACE_FALLBACK.to_css());
                ctx.fill_rect(0.0, 0.0, w, h);
            }
        }

        // Tilt
        self.canvas.style().set_property(
            "transform",
            &perspective_transform(self.camera_distance_px, state.rotation_x, state.rotation_y),
        )?;

        // Glare
        self.overlay.draw(ctx, state)
    }
}
