use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{
    Event, EventTarget, HtmlCanvasElement, HtmlElement, HtmlImageElement, MouseEvent, Touch,
    TouchEvent, TouchList,
};
use yew::prelude::*;

use crate::config::CardConfig;
use crate::model::{CardAction, CardState};
use crate::render::{CardRenderer, RenderError};
use crate::state::{Pointer, TouchState};
use crate::util::{clog, cwarn};

fn current_density() -> f64 {
    web_sys::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0)
}

/// Registered DOM listeners, removed again on drop.
#[derive(Default)]
struct Listeners {
    entries: Vec<(EventTarget, &'static str, Closure<dyn FnMut(Event)>)>,
}

impl Listeners {
    fn add<F>(&mut self, target: &EventTarget, name: &'static str, f: F) -> Result<(), RenderError>
    where
        F: FnMut(Event) + 'static,
    {
        let cb = Closure::wrap(Box::new(f) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(name, cb.as_ref().unchecked_ref())?;
        self.entries.push((target.clone(), name, cb));
        Ok(())
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        for (target, name, cb) in &self.entries {
            let _ = target.remove_event_listener_with_callback(name, cb.as_ref().unchecked_ref());
        }
    }
}

/// Everything the mounted listeners share with the component.
#[derive(Clone)]
struct CardHandles {
    host: HtmlElement,
    canvas: HtmlCanvasElement,
    config: Rc<CardConfig>,
    card: UseReducerDispatcher<CardState>,
    renderer: Rc<RefCell<Option<CardRenderer>>>,
    latest: Rc<RefCell<CardState>>,
    touch: Rc<RefCell<TouchState>>,
    density: Rc<RefCell<f64>>,
}

impl CardHandles {
    /// Client coordinates to card-local device pixels.
    fn local_point(&self, client_x: i32, client_y: i32) -> (f64, f64) {
        let rect = self.host.get_bounding_client_rect();
        let density = *self.density.borrow();
        (
            (client_x as f64 - rect.left()) * density,
            (client_y as f64 - rect.top()) * density,
        )
    }

    fn dispatch(&self, action: Option<CardAction>) {
        if let Some(action) = action {
            clog(&format!("card: {:?}", action));
            self.card.dispatch(action);
        }
    }

    fn redraw(&self) {
        if let Some(r) = &*self.renderer.borrow() {
            if let Err(e) = r.render(&self.latest.borrow()) {
                cwarn(&format!("card render failed: {}", e));
            }
        }
    }

    /// (Re)creates the renderer for the current density, keeping the loaded image.
    /// On failure the previous renderer stays in place.
    fn build_renderer(&self) -> Result<(f64, f64), RenderError> {
        let (w, h) = self.config.card_size().to_px(*self.density.borrow());
        let built = CardRenderer::new(
            self.canvas.clone(),
            w,
            h,
            self.config.glare_alpha,
            self.config.camera_distance_px,
        );
        replace_on_ok(&mut self.renderer.borrow_mut(), built, |prev, next| {
            if let Some(img) = prev.image() {
                next.set_image(img.clone());
            }
        })?;
        clog(&format!("card renderer ready: {}x{} px", w, h));
        Ok((w, h))
    }
}

/// Puts `built` into `slot` only if it succeeded; `carry` moves state over from the old value.
fn replace_on_ok<T, E>(
    slot: &mut Option<T>,
    built: Result<T, E>,
    carry: impl FnOnce(&T, &mut T),
) -> Result<(), E> {
    let mut next = built?;
    if let Some(prev) = slot.as_ref() {
        carry(prev, &mut next);
    }
    *slot = Some(next);
    Ok(())
}

fn find_touch(list: &TouchList, id: i32) -> Option<Touch> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .find(|t| t.identifier() == id)
}

fn consume(e: &Event) {
    e.prevent_default();
    e.stop_propagation();
}

fn mount(handles: CardHandles) -> Result<Listeners, RenderError> {
    let window = web_sys::window().ok_or(RenderError::NoWindow)?;
    let mut listeners = Listeners::default();

    handles.build_renderer()?;

    // Face image
    let image = HtmlImageElement::new()?;
    {
        let h = handles.clone();
        listeners.add(&image, "load", move |_e| h.redraw())?;
    }
    {
        let src = handles.config.image_src.clone();
        listeners.add(&image, "error", move |_e| {
            cwarn(&format!("card image failed to load: {}", src));
        })?;
    }
    image.set_src(&handles.config.image_src);
    if let Some(r) = handles.renderer.borrow_mut().as_mut() {
        r.set_image(image);
    }
    handles.redraw();

    // Touch
    {
        let h = handles.clone();
        listeners.add(&handles.host, "touchstart", move |e| {
            let Some(te) = e.dyn_ref::<TouchEvent>() else {
                return;
            };
            if let Some(t) = te.changed_touches().item(0) {
                let (x, y) = h.local_point(t.client_x(), t.client_y());
                let action = h.touch.borrow_mut().begin(Pointer::Touch(t.identifier()), x, y);
                h.dispatch(action);
            }
            consume(&e);
        })?;
    }
    {
        let h = handles.clone();
        listeners.add(&handles.host, "touchmove", move |e| {
            let Some(te) = e.dyn_ref::<TouchEvent>() else {
                return;
            };
            let active = h.touch.borrow().active;
            if let Some(Pointer::Touch(id)) = active {
                if let Some(t) = find_touch(&te.changed_touches(), id) {
                    let (x, y) = h.local_point(t.client_x(), t.client_y());
                    let action = h.touch.borrow_mut().advance(Pointer::Touch(id), x, y);
                    h.dispatch(action);
                }
            }
            consume(&e);
        })?;
    }
    for name in ["touchend", "touchcancel"] {
        let h = handles.clone();
        listeners.add(&handles.host, name, move |e| {
            let Some(te) = e.dyn_ref::<TouchEvent>() else {
                return;
            };
            let active = h.touch.borrow().active;
            if let Some(Pointer::Touch(id)) = active {
                if find_touch(&te.changed_touches(), id).is_some() {
                    h.touch.borrow_mut().end(Pointer::Touch(id));
                }
            }
        })?;
    }

    // Mouse
    {
        let h = handles.clone();
        listeners.add(&handles.host, "mousedown", move |e| {
            let Some(me) = e.dyn_ref::<MouseEvent>() else {
                return;
            };
            if me.button() != 0 {
                return;
            }
            let (x, y) = h.local_point(me.client_x(), me.client_y());
            let action = h.touch.borrow_mut().begin(Pointer::Mouse, x, y);
            h.dispatch(action);
            consume(&e);
        })?;
    }
    {
        let h = handles.clone();
        listeners.add(&window, "mousemove", move |e| {
            let Some(me) = e.dyn_ref::<MouseEvent>() else {
                return;
            };
            if h.touch.borrow().active != Some(Pointer::Mouse) {
                return;
            }
            let (x, y) = h.local_point(me.client_x(), me.client_y());
            let action = h.touch.borrow_mut().advance(Pointer::Mouse, x, y);
            h.dispatch(action);
            consume(&e);
        })?;
    }
    {
        let h = handles.clone();
        listeners.add(&window, "mouseup", move |_e| {
            h.touch.borrow_mut().end(Pointer::Mouse);
        })?;
    }

    // Density changes (zoom, moving between displays)
    {
        let h = handles.clone();
        listeners.add(&window, "resize", move |_e| {
            let density = current_density();
            if (density - *h.density.borrow()).abs() < f64::EPSILON {
                return;
            }
            let previous = h.density.replace(density);
            h.touch.borrow_mut().rescale(density / previous);
            match h.build_renderer() {
                Ok((width, height)) => h.dispatch(Some(CardAction::Resize { width, height })),
                Err(e) => cwarn(&format!("card resize failed: {}", e)),
            }
            h.redraw();
        })?;
    }

    Ok(listeners)
}

#[function_component(GlareCard)]
pub fn glare_card() -> Html {
    let config = use_memo((), |_| CardConfig::load());
    let host_ref = use_node_ref();
    let canvas_ref = use_node_ref();
    let density = use_mut_ref(current_density);
    let (width_px, height_px) = config.card_size().to_px(*density.borrow());
    let card = use_reducer_eq(move || CardState::new(width_px, height_px));
    let renderer = use_mut_ref(|| None::<CardRenderer>);
    let latest = use_mut_ref(|| (*card).clone());
    let touch_state = use_mut_ref(TouchState::default);

    // Mount: renderer, image and input listeners
    {
        let host_ref = host_ref.clone();
        let canvas_ref = canvas_ref.clone();
        let handles_cfg = config.clone();
        let dispatcher = card.dispatcher();
        let renderer = renderer.clone();
        let latest = latest.clone();
        let touch_state = touch_state.clone();
        let density = density.clone();
        use_effect_with((), move |_| {
            crate::util::set_debug_log(handles_cfg.debug_log);
            let handles = match (host_ref.cast::<HtmlElement>(), canvas_ref.cast::<HtmlCanvasElement>()) {
                (Some(host), Some(canvas)) => Some(CardHandles {
                    host,
                    canvas,
                    config: handles_cfg,
                    card: dispatcher,
                    renderer,
                    latest,
                    touch: touch_state,
                    density,
                }),
                _ => {
                    cwarn("card host elements not mounted");
                    None
                }
            };
            let listeners = handles.and_then(|h| match mount(h.clone()) {
                Ok(l) => Some((l, h)),
                Err(e) => {
                    cwarn(&format!("card setup failed: {}", e));
                    None
                }
            });
            move || {
                if let Some((listeners, handles)) = listeners {
                    drop(listeners);
                    handles.renderer.borrow_mut().take();
                }
            }
        });
    }

    // Every state transition: remember it and draw the new frame
    {
        let renderer = renderer.clone();
        let latest = latest.clone();
        use_effect_with((*card).clone(), move |state| {
            *latest.borrow_mut() = state.clone();
            if let Some(r) = &*renderer.borrow() {
                if let Err(e) = r.render(state) {
                    cwarn(&format!("card render failed: {}", e));
                }
            }
            || ()
        });
    }

    let host_style = format!(
        "position:relative;width:{}px;height:{}px;touch-action:none;user-select:none;",
        config.width_dp, config.height_dp
    );
    html! {
        <div ref={host_ref} class="glare-card" style={host_style}>
            <canvas
                ref={canvas_ref}
                style="display:block;width:100%;height:100%;transform-origin:center;"
            />
        </div>
    }
}
