//! wasm-bindgen surface for the Vizij smooth-scroll engine.
//!
//! ```js
//! const scroll = new NativeSmoothScroll();
//! scroll.init(document.querySelector('.page'), { lerp: 0.1 });
//! const hero = scroll.addElement(heroNode, { sticky: true, stickyElement: heroTitle });
//! scroll.scrollTo('#contact', { align: 'middle' });
//! scroll.scrollToElement(hero);
//! ```

mod dom_host;
mod logging;

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Reflect;
use log::warn;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use vizij_scroll_core::{
    ElementId, ElementOptions, ElementRef, ScrollConfig, ScrollEngine, ScrollOptions,
    ScrollTarget,
};

pub use dom_host::{DomCapabilities, DomHost};
use dom_host::{DomEngine, SharedEngine};
pub use logging::init_logging;

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn parse_scroll_options(options: JsValue) -> Result<ScrollOptions, JsError> {
    if jsvalue_is_undefined_or_null(&options) {
        return Ok(ScrollOptions::default());
    }
    swb::from_value(options).map_err(|e| JsError::new(&format!("scroll options error: {e}")))
}

/// `{ sticky?: boolean, stickyElement?: HTMLElement }`. Nodes do not go through serde.
fn parse_element_options(options: &JsValue) -> Result<ElementOptions<HtmlElement>, JsError> {
    if jsvalue_is_undefined_or_null(options) {
        return Ok(ElementOptions::default());
    }
    let field = |name: &str| {
        Reflect::get(options, &JsValue::from_str(name))
            .map_err(|e| JsError::new(&format!("element options error: {e:?}")))
    };
    let sticky = field("sticky")?.as_bool().unwrap_or(false);
    let sticky_node = field("stickyElement")?;
    let sticky_node = if jsvalue_is_undefined_or_null(&sticky_node) {
        None
    } else {
        let node = sticky_node.dyn_into::<HtmlElement>().map_err(|_| {
            JsError::new("element options error: stickyElement is not an HTMLElement")
        })?;
        Some(node)
    };
    Ok(ElementOptions {
        sticky,
        sticky_node,
    })
}

/// Numbers are document offsets, strings are element ids, nodes are looked up inside the
/// tracked elements.
fn parse_scroll_target(target: JsValue) -> Result<ScrollTarget<HtmlElement>, JsError> {
    if let Some(position) = target.as_f64() {
        return Ok(ScrollTarget::Position(position));
    }
    if let Some(id) = target.as_string() {
        return Ok(ScrollTarget::Id(id));
    }
    target
        .dyn_into::<HtmlElement>()
        .map(ScrollTarget::Node)
        .map_err(|_| JsError::new("scrollTo: expected a number, an id or an HTMLElement"))
}

#[wasm_bindgen]
pub struct NativeSmoothScroll {
    engine: Option<SharedEngine>,
}

impl Default for NativeSmoothScroll {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeSmoothScroll {
    fn with_engine<R>(&self, op: &str, f: impl FnOnce(&mut DomEngine) -> R) -> Option<R> {
        let Some(engine) = &self.engine else {
            warn!("{op}: smooth scroll is not initialized");
            return None;
        };
        let Ok(mut engine) = engine.try_borrow_mut() else {
            warn!("{op}: scroll engine busy");
            return None;
        };
        Some(f(&mut engine))
    }
}

#[wasm_bindgen]
impl NativeSmoothScroll {
    /// Create an unbound instance. Call `init` before anything else.
    #[wasm_bindgen(constructor)]
    pub fn new() -> NativeSmoothScroll {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        NativeSmoothScroll { engine: None }
    }

    /// Bind to `container`, whose height is managed from now on. `options` is
    /// `{ lerp?, isEnabled?, isResizeObserverEnabled? }` or undefined/null for defaults.
    /// Calling `init` again tears the previous binding down first.
    pub fn init(&mut self, container: HtmlElement, options: JsValue) -> Result<(), JsError> {
        let cfg: ScrollConfig = if jsvalue_is_undefined_or_null(&options) {
            ScrollConfig::default()
        } else {
            swb::from_value(options).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        let window = web_sys::window().ok_or_else(|| JsError::new("init: no global window"))?;

        if let Some(previous) = self.engine.take() {
            warn!("init: already initialized, destructing the previous binding");
            previous.borrow_mut().destruct();
        }

        let caps = DomCapabilities::new(window.clone());
        let host = DomHost::new(window).map_err(|e| JsError::new(&format!("init: {e:?}")))?;
        let engine = ScrollEngine::new(host, container.clone(), cfg, &caps)
            .map_err(|e| JsError::new(&format!("config error: {e}")))?;
        let engine = Rc::new(RefCell::new(engine));
        if let Err(e) = DomHost::bind(&engine, &container) {
            engine.borrow_mut().destruct();
            return Err(JsError::new(&format!("init: {e:?}")));
        }
        self.engine = Some(engine);
        Ok(())
    }

    /// Track `node`. Returns an element handle, or undefined when not initialized.
    #[wasm_bindgen(js_name = addElement)]
    pub fn add_element(&self, node: HtmlElement, options: JsValue) -> Result<Option<u32>, JsError> {
        let options = parse_element_options(&options)?;
        Ok(self
            .with_engine("addElement", |engine| engine.add_element(node, options))
            .flatten()
            .map(|id| id.0))
    }

    /// Stop tracking an element, given its handle or its node. Returns false when nothing
    /// matched, including numbers that are not valid handles.
    #[wasm_bindgen(js_name = removeElement)]
    pub fn remove_element(&self, target: JsValue) -> Result<bool, JsError> {
        let element = if let Some(value) = target.as_f64() {
            let Some(handle) = ElementId::from_js_number(value) else {
                warn!("removeElement: {value} is not an element handle");
                return Ok(false);
            };
            ElementRef::Handle(handle)
        } else {
            let node = target
                .dyn_into::<HtmlElement>()
                .map_err(|_| JsError::new("removeElement: expected a handle or an HTMLElement"))?;
            ElementRef::Node(node)
        };
        Ok(self
            .with_engine("removeElement", |engine| engine.remove_element(element))
            .unwrap_or(false))
    }

    #[wasm_bindgen(js_name = setIsEnabled)]
    pub fn set_is_enabled(&self, value: bool) {
        self.with_engine("setIsEnabled", |engine| engine.set_is_enabled(value));
    }

    #[wasm_bindgen(getter, js_name = isEnabled)]
    pub fn is_enabled(&self) -> bool {
        self.engine
            .as_ref()
            .and_then(|engine| engine.try_borrow().ok().map(|e| e.is_enabled()))
            .unwrap_or(false)
    }

    /// Re-measure every element, e.g. after content changed size.
    pub fn invalidate(&self) {
        self.with_engine("invalidate", DomEngine::invalidate);
    }

    /// Scroll to a document offset, an element id (`'contact'` or `'#contact'`) or a node
    /// inside a tracked element. Returns true when a scroll was issued.
    #[wasm_bindgen(js_name = scrollTo)]
    pub fn scroll_to(&self, target: JsValue, options: JsValue) -> Result<bool, JsError> {
        let target = parse_scroll_target(target)?;
        let options = parse_scroll_options(options)?;
        Ok(self
            .with_engine("scrollTo", |engine| engine.scroll_to(target, options))
            .unwrap_or(false))
    }

    /// Scroll to a tracked element by handle.
    #[wasm_bindgen(js_name = scrollToElement)]
    pub fn scroll_to_element(&self, handle: u32, options: JsValue) -> Result<bool, JsError> {
        let options = parse_scroll_options(options)?;
        Ok(self
            .with_engine("scrollToElement", |engine| {
                engine.scroll_to(ElementId(handle), options)
            })
            .unwrap_or(false))
    }

    /// Measured height of a tracked element.
    #[wasm_bindgen(js_name = elementHeight)]
    pub fn element_height(&self, handle: u32) -> Option<f64> {
        self.with_engine("elementHeight", |engine| {
            engine.element(ElementId(handle)).map(|e| e.height())
        })
        .flatten()
    }

    /// Measured document-space top of a tracked element.
    #[wasm_bindgen(js_name = elementTop)]
    pub fn element_top(&self, handle: u32) -> Option<f64> {
        self.with_engine("elementTop", |engine| {
            engine.element(ElementId(handle)).map(|e| e.top())
        })
        .flatten()
    }

    #[wasm_bindgen(js_name = elementNode)]
    pub fn element_node(&self, handle: u32) -> Option<HtmlElement> {
        self.with_engine("elementNode", |engine| {
            engine
                .element(ElementId(handle))
                .and_then(|e| e.node().cloned())
        })
        .flatten()
    }

    /// Remove every listener, hand all elements back in natural layout and unbind.
    pub fn destruct(&mut self) {
        match self.engine.take() {
            Some(engine) => engine.borrow_mut().destruct(),
            None => warn!("destruct: smooth scroll is not initialized"),
        }
    }
}

/// ABI version for JS wrappers.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
