//! DOM implementation of the core `Host` contract.
//!
//! The engine lives in an `Rc<RefCell<..>>`; every browser callback (listeners, animation
//! frames, timeouts, the resize observer) holds a `Weak` to it and re-enters through
//! [`dispatch`]. Once the engine is dropped the callbacks turn into no-ops.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::{Array, Reflect};
use log::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    AddEventListenerOptions, Event, EventTarget, HtmlElement, KeyboardEvent, ResizeObserver,
    ResizeObserverEntry, ScrollToOptions, Window,
};

use vizij_scroll_core::{
    Bounds, Capabilities, Host, ScrollBehavior, ScrollEngine, StyleUpdate, TimerToken,
};

pub type DomEngine = ScrollEngine<DomHost>;
pub type SharedEngine = Rc<RefCell<DomEngine>>;
type WeakEngine = Weak<RefCell<DomEngine>>;

/// Run `f` against the engine if it is still alive and not already borrowed.
fn dispatch(engine: &WeakEngine, f: impl FnOnce(&mut DomEngine)) {
    let Some(shared) = engine.upgrade() else {
        return;
    };
    let Ok(mut guard) = shared.try_borrow_mut() else {
        warn!("scroll engine busy; dropping callback");
        return;
    };
    f(&mut guard);
}

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

struct SizeObserver {
    observer: ResizeObserver,
    _callback: Closure<dyn FnMut(Array, JsValue)>,
}

pub struct DomHost {
    window: Window,
    engine: WeakEngine,
    frame: Option<Closure<dyn FnMut(f64)>>,
    frame_request: Option<i32>,
    listeners: Vec<Listener>,
    size_observer: Option<SizeObserver>,
}

impl DomHost {
    pub fn new(window: Window) -> Result<Self, JsValue> {
        if window.document().is_none() {
            return Err(JsValue::from_str("window has no document"));
        }
        Ok(Self {
            window,
            engine: Weak::new(),
            frame: None,
            frame_request: None,
            listeners: Vec::new(),
            size_observer: None,
        })
    }

    /// Wire the browser callbacks of `engine`'s host back into `engine`.
    pub fn bind(engine: &SharedEngine, container: &HtmlElement) -> Result<(), JsValue> {
        let weak = Rc::downgrade(engine);

        let frame = {
            let weak = weak.clone();
            Closure::wrap(Box::new(move |_now: f64| {
                dispatch(&weak, |engine| {
                    engine.host_mut().frame_request = None;
                    engine.tick();
                    if engine.is_ticking() {
                        engine.host_mut().request_frame();
                    }
                });
            }) as Box<dyn FnMut(f64)>)
        };

        let mut guard = engine.borrow_mut();
        let window: EventTarget = guard.host().window.clone().into();
        let host = guard.host_mut();
        host.engine = weak.clone();
        host.frame = Some(frame);

        host.listen(&window, "scroll", &weak, |engine, _| engine.handle_scroll())?;
        host.listen(&window, "resize", &weak, |engine, _| engine.handle_resize())?;
        host.listen(&window, "keydown", &weak, |engine, event| {
            if let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) {
                engine.handle_key_down(&key);
            }
        })?;
        host.listen(container.as_ref(), "focusin", &weak, |engine, event| {
            if let Some(node) = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlElement>().ok())
            {
                engine.handle_focus_in(&node);
            }
        })?;
        Ok(())
    }

    fn listen(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        engine: &WeakEngine,
        handler: fn(&mut DomEngine, &Event),
    ) -> Result<(), JsValue> {
        let engine = engine.clone();
        let callback = Closure::wrap(Box::new(move |event: Event| {
            dispatch(&engine, |e| handler(e, &event));
        }) as Box<dyn FnMut(Event)>);

        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            callback.as_ref().unchecked_ref(),
            &options,
        )?;
        self.listeners.push(Listener {
            target: target.clone(),
            kind,
            callback,
        });
        Ok(())
    }

    fn request_frame(&mut self) {
        if self.frame_request.is_some() {
            return;
        }
        let Some(frame) = &self.frame else {
            return;
        };
        match self
            .window
            .request_animation_frame(frame.as_ref().unchecked_ref())
        {
            Ok(id) => self.frame_request = Some(id),
            Err(e) => warn!("requestAnimationFrame failed: {e:?}"),
        }
    }

    fn cancel_frame(&mut self) {
        if let Some(id) = self.frame_request.take() {
            if let Err(e) = self.window.cancel_animation_frame(id) {
                warn!("cancelAnimationFrame failed: {e:?}");
            }
        }
    }

    fn size_observer(&mut self) -> Option<&ResizeObserver> {
        if self.size_observer.is_none() {
            let engine = self.engine.clone();
            let callback = Closure::wrap(Box::new(move |entries: Array, _observer: JsValue| {
                dispatch(&engine, |engine| {
                    for entry in entries.iter() {
                        let Ok(entry) = entry.dyn_into::<ResizeObserverEntry>() else {
                            continue;
                        };
                        if let Ok(node) = entry.target().dyn_into::<HtmlElement>() {
                            engine.handle_element_resize(&node);
                        }
                    }
                });
            }) as Box<dyn FnMut(Array, JsValue)>);
            match ResizeObserver::new(callback.as_ref().unchecked_ref()) {
                Ok(observer) => {
                    self.size_observer = Some(SizeObserver {
                        observer,
                        _callback: callback,
                    })
                }
                Err(e) => warn!("ResizeObserver unavailable: {e:?}"),
            }
        }
        self.size_observer.as_ref().map(|o| &o.observer)
    }
}

impl Host for DomHost {
    type Node = HtmlElement;

    fn scroll_position(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
    }

    fn bounding_box(&self, node: &HtmlElement) -> Option<Bounds> {
        if !node.is_connected() {
            return None;
        }
        let rect = node.get_bounding_client_rect();
        Some(Bounds::new(rect.top(), rect.left(), rect.width(), rect.height()))
    }

    fn contains(&self, ancestor: &HtmlElement, node: &HtmlElement) -> bool {
        ancestor.contains(Some(node.as_ref()))
    }

    fn find_by_id(&self, root: &HtmlElement, id: &str) -> Option<HtmlElement> {
        if root.id() == id {
            return Some(root.clone());
        }
        // Scoped to `root`: an earlier node with the same id elsewhere must not shadow it.
        let candidates = root.query_selector_all("[id]").ok()?;
        (0..candidates.length())
            .filter_map(|i| candidates.get(i))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .find(|el| el.id() == id)
    }

    fn apply_style(&mut self, node: &HtmlElement, style: &StyleUpdate) {
        if style.is_empty() {
            return;
        }
        let css = node.style();
        for (property, value) in style.declarations() {
            if let Err(e) = css.set_property(property, &value) {
                warn!("failed to set {property}: {e:?}");
            }
        }
    }

    fn request_scroll(&mut self, position: f64, behavior: ScrollBehavior) {
        let options = ScrollToOptions::new();
        options.set_top(position);
        options.set_behavior(match behavior {
            ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
        });
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn set_ticker(&mut self, active: bool) {
        if active {
            self.request_frame();
        } else {
            self.cancel_frame();
        }
    }

    fn schedule_timer(&mut self, token: TimerToken, delay_ms: u32) {
        let engine = self.engine.clone();
        let callback = Closure::once_into_js(move || {
            dispatch(&engine, |engine| engine.handle_timer(token));
        });
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        if let Err(e) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay)
        {
            warn!("setTimeout failed for {token:?}: {e:?}");
        }
    }

    fn observe_size(&mut self, node: &HtmlElement) {
        if let Some(observer) = self.size_observer() {
            observer.observe(node);
        }
    }

    fn unobserve_size(&mut self, node: &HtmlElement) {
        if let Some(o) = &self.size_observer {
            o.observer.unobserve(node);
        }
    }

    fn detach(&mut self) {
        self.cancel_frame();
        for listener in self.listeners.drain(..) {
            if let Err(e) = listener.target.remove_event_listener_with_callback(
                listener.kind,
                listener.callback.as_ref().unchecked_ref(),
            ) {
                warn!("failed to remove {} listener: {e:?}", listener.kind);
            }
        }
        if let Some(o) = self.size_observer.take() {
            o.observer.disconnect();
        }
        self.frame = None;
    }
}

/// Feature detection against the live window.
pub struct DomCapabilities {
    window: Window,
}

impl DomCapabilities {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Capabilities for DomCapabilities {
    fn has_touch_support(&self) -> bool {
        Reflect::has(&self.window, &JsValue::from_str("ontouchstart")).unwrap_or(false)
            || self.window.navigator().max_touch_points() > 0
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.window
            .match_media("(prefers-reduced-motion: reduce)")
            .ok()
            .flatten()
            .is_some_and(|query| query.matches())
    }
}
