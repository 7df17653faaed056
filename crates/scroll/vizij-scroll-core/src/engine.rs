//! ScrollEngine: owns the tracked elements and drives them from the interpolation loop.
//!
//! Methods:
//! - new, add_element, remove_element, set_is_enabled, invalidate, scroll_to, destruct
//! - host event entry points: handle_scroll, handle_resize, handle_element_resize,
//!   handle_key_down, handle_focus_in, handle_timer, tick

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::config::ScrollConfig;
use crate::debounce::Debounce;
use crate::element::{ChildTarget, ElementOptions, TrackedElement};
use crate::error::ScrollError;
use crate::host::{Capabilities, Host, ScrollBehavior, TimerKind, TimerToken};
use crate::ids::ElementId;
use crate::math::lerp;
use crate::position::{align_offset, Align};
use crate::style::{Extent, StyleUpdate};

/// Options for [`ScrollEngine::scroll_to`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrollOptions {
    pub align: Align,
    /// Skip the request when the target already sits inside the viewport.
    pub should_ignore_when_visible: bool,
}

impl ScrollOptions {
    pub fn aligned(align: Align) -> Self {
        Self {
            align,
            ..Self::default()
        }
    }
}

/// Something `scroll_to` can resolve to a document-space position.
#[derive(Clone, Debug, PartialEq)]
pub enum ScrollTarget<N> {
    /// Literal document-space offset.
    Position(f64),
    /// A tracked element handle.
    Element(ElementId),
    /// A node inside one of the tracked subtrees.
    Node(N),
    /// Identifier of a node inside one of the tracked subtrees.
    Id(String),
}

impl<N> From<f64> for ScrollTarget<N> {
    fn from(position: f64) -> Self {
        ScrollTarget::Position(position)
    }
}

impl<N> From<ElementId> for ScrollTarget<N> {
    fn from(id: ElementId) -> Self {
        ScrollTarget::Element(id)
    }
}

impl<N> From<&str> for ScrollTarget<N> {
    fn from(id: &str) -> Self {
        ScrollTarget::Id(id.to_string())
    }
}

/// Element handle or raw node, for [`ScrollEngine::remove_element`].
#[derive(Clone, Debug, PartialEq)]
pub enum ElementRef<N> {
    Handle(ElementId),
    Node(N),
}

impl<N> From<ElementId> for ElementRef<N> {
    fn from(id: ElementId) -> Self {
        ElementRef::Handle(id)
    }
}

/// Real and interpolated scroll offsets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollState {
    pub current: f64,
    pub target: f64,
}

impl ScrollState {
    fn synced(position: f64) -> Self {
        Self {
            current: position,
            target: position,
        }
    }

    #[inline]
    fn distance(&self) -> f64 {
        (self.current - self.target).abs()
    }
}

/// Resolved `scroll_to` target: raw top and aligned anchor, both in document space.
#[derive(Clone, Copy, Debug)]
struct ResolvedTarget {
    top: f64,
    anchor: f64,
}

#[derive(Debug)]
pub struct ScrollEngine<H: Host> {
    cfg: ScrollConfig,
    host: H,
    container: H::Node,
    next_id: ElementId,
    elements: Vec<TrackedElement<H::Node>>,

    enabled: bool,
    scroll: ScrollState,
    viewport_height: f64,
    tabbing: bool,
    ticking: bool,
    destroyed: bool,

    resize: Debounce,
    tab: Debounce,
}

impl<H: Host> ScrollEngine<H> {
    /// Bind an engine to `container`. The enabled state comes from `cfg.is_enabled`, or
    /// from `caps` when not set explicitly.
    pub fn new(
        host: H,
        container: H::Node,
        cfg: ScrollConfig,
        caps: &dyn Capabilities,
    ) -> Result<Self, ScrollError> {
        cfg.validate()?;
        let enabled = cfg.resolve_enabled(caps);
        let scroll = ScrollState::synced(host.scroll_position().max(0.0));
        let viewport_height = host.viewport_height();
        debug!(
            "scroll engine init: enabled={enabled} lerp={} viewport={viewport_height}",
            cfg.lerp
        );

        Ok(Self {
            resize: Debounce::new(cfg.resize_debounce_ms),
            tab: Debounce::new(cfg.tab_debounce_ms),
            cfg,
            host,
            container,
            next_id: ElementId(0),
            elements: Vec::new(),
            enabled,
            scroll,
            viewport_height,
            tabbing: false,
            ticking: false,
            destroyed: false,
        })
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.cfg
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn container(&self) -> &H::Node {
        &self.container
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    #[inline]
    pub fn is_tabbing(&self) -> bool {
        self.tabbing
    }

    /// Whether the engine is currently subscribed to the per-frame hook.
    #[inline]
    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    #[inline]
    pub fn scroll_state(&self) -> ScrollState {
        self.scroll
    }

    /// Interpolated position the elements are currently projected with.
    #[inline]
    pub fn current_position(&self) -> f64 {
        self.scroll.current
    }

    #[inline]
    pub fn target_position(&self) -> f64 {
        self.scroll.target
    }

    #[inline]
    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    pub fn element(&self, id: ElementId) -> Option<&TrackedElement<H::Node>> {
        self.elements.iter().find(|e| e.id() == id)
    }

    /// Tracked elements in registration order.
    pub fn elements(&self) -> impl Iterator<Item = &TrackedElement<H::Node>> {
        self.elements.iter()
    }

    /// Handle of the element tracking `node`, if any.
    pub fn find_element(&self, node: &H::Node) -> Option<ElementId> {
        self.elements
            .iter()
            .find(|e| e.node() == Some(node))
            .map(|e| e.id())
    }

    /// Track `node`. Returns `None` once the engine has been destructed.
    pub fn add_element(
        &mut self,
        node: H::Node,
        options: ElementOptions<H::Node>,
    ) -> Option<ElementId> {
        if self.destroyed {
            return None;
        }
        let id = self.next_id;
        self.next_id = id.next();
        if self.cfg.is_resize_observer_enabled {
            self.host.observe_size(&node);
        }
        self.elements.push(TrackedElement::new(id, node, options));
        debug!("added element {id:?} ({} tracked)", self.elements.len());

        self.invalidate();
        Some(id)
    }

    /// Stop tracking an element and destroy it. Returns false when nothing matched.
    pub fn remove_element(&mut self, element: impl Into<ElementRef<H::Node>>) -> bool {
        if self.destroyed {
            return false;
        }
        let idx = match element.into() {
            ElementRef::Handle(id) => self.elements.iter().position(|e| e.id() == id),
            ElementRef::Node(node) => self.elements.iter().position(|e| e.node() == Some(&node)),
        };
        let Some(idx) = idx else {
            return false;
        };

        let mut removed = self.elements.remove(idx);
        if let Some(node) = removed.node() {
            // the node may be re-used by the caller; hand it back in natural layout
            self.host.apply_style(node, &StyleUpdate::natural());
            if self.cfg.is_resize_observer_enabled {
                self.host.unobserve_size(node);
            }
        }
        removed.destruct();
        debug!("removed element {:?} ({} tracked)", removed.id(), self.elements.len());

        self.invalidate();
        true
    }

    pub fn set_is_enabled(&mut self, value: bool) {
        if self.destroyed || value == self.enabled {
            return;
        }
        self.enabled = value;
        debug!("smooth scroll {}", if value { "enabled" } else { "disabled" });

        self.scroll = ScrollState::synced(self.host.scroll_position().max(0.0));
        if value {
            self.invalidate();
        } else {
            self.stop_ticker();
            self.tab.cancel();
            self.tabbing = false;
            for element in self.elements.iter_mut() {
                element.reset_styles(&mut self.host);
            }
            self.host
                .apply_style(&self.container, &StyleUpdate::height(Extent::Auto));
        }
    }

    /// Full reset → measure → apply pass over every element, then a forced update.
    ///
    /// The three phases run over the whole collection: one element leaving the flow
    /// would shift the natural position of the elements after it.
    pub fn invalidate(&mut self) {
        if self.destroyed {
            return;
        }
        let real_position = self.host.scroll_position().max(0.0);

        for element in self.elements.iter_mut() {
            element.reset_styles(&mut self.host);
        }
        for element in self.elements.iter_mut() {
            element.measure(&self.host, real_position);
        }

        if !self.enabled {
            self.host
                .apply_style(&self.container, &StyleUpdate::height(Extent::Auto));
            return;
        }

        for element in self.elements.iter() {
            element.apply_styles(&mut self.host);
        }

        let height: f64 = self.elements.iter().map(|e| e.height()).sum();
        self.host
            .apply_style(&self.container, &StyleUpdate::height(Extent::Px(height)));
        debug!(
            "invalidate: {} elements, container height {height}",
            self.elements.len()
        );

        self.update(true);
    }

    /// Scroll the real viewport so `target` lands on the `options.align` anchor.
    /// Returns true when a scroll request was issued.
    pub fn scroll_to(
        &mut self,
        target: impl Into<ScrollTarget<H::Node>>,
        options: ScrollOptions,
    ) -> bool {
        if self.destroyed {
            return false;
        }
        let target = target.into();
        let Some(resolved) = self.resolve_target(&target, options.align) else {
            debug!("scroll_to: unresolved target {target:?}");
            return false;
        };

        let real_position = self.host.scroll_position();
        if options.should_ignore_when_visible
            && resolved.top >= real_position
            && resolved.top < real_position + self.viewport_height
        {
            return false;
        }

        let position = resolved.anchor - align_offset(0.0, self.viewport_height, options.align);
        let behavior = if self.enabled {
            ScrollBehavior::Instant
        } else {
            ScrollBehavior::Smooth
        };
        debug!("scroll_to {position} ({behavior:?})");
        self.host.request_scroll(position, behavior);
        true
    }

    /// Document-space top of a tracked element: measured when enabled, live otherwise.
    fn element_top(&self, element: &TrackedElement<H::Node>) -> Option<f64> {
        if self.enabled {
            element.bounds().map(|b| b.top)
        } else {
            element
                .live_top(&self.host)
                .map(|top| top + self.host.scroll_position())
        }
    }

    fn resolve_target(
        &self,
        target: &ScrollTarget<H::Node>,
        align: Align,
    ) -> Option<ResolvedTarget> {
        match target {
            ScrollTarget::Position(position) => Some(ResolvedTarget {
                top: *position,
                anchor: *position,
            }),
            ScrollTarget::Element(id) => {
                let element = self.element(*id)?;
                let top = self.element_top(element)?;
                let height = if self.enabled {
                    element.height()
                } else {
                    element
                        .node()
                        .and_then(|n| self.host.bounding_box(n))
                        .map_or(0.0, |b| b.height)
                };
                Some(ResolvedTarget {
                    top,
                    anchor: align_offset(top, height, align),
                })
            }
            ScrollTarget::Node(node) => self.resolve_child(ChildTarget::Node(node), align),
            ScrollTarget::Id(id) => self.resolve_child(ChildTarget::Id(id), align),
        }
    }

    fn resolve_child(
        &self,
        child: ChildTarget<'_, H::Node>,
        align: Align,
    ) -> Option<ResolvedTarget> {
        self.elements.iter().find_map(|element| {
            let anchor = element.get_relative_child_position(&self.host, child, align)?;
            let top = element.get_relative_child_position(&self.host, child, Align::Top)?;
            let base = self.element_top(element)?;
            Some(ResolvedTarget {
                top: base + top,
                anchor: base + anchor,
            })
        })
    }

    /// Push the interpolated position into every element.
    fn update(&mut self, force: bool) {
        let viewport_height = self.viewport_height;
        let position = self.scroll.current;
        let update_visibility = !self.tabbing;
        for element in self.elements.iter_mut() {
            element.update(
                &mut self.host,
                viewport_height,
                position,
                force,
                update_visibility,
            );
        }
    }

    /// One animation frame. Returns true when the interpolated position moved.
    pub fn tick(&mut self) -> bool {
        if self.destroyed || !self.enabled {
            self.stop_ticker();
            return false;
        }
        if self.scroll.distance() <= self.cfg.settle_threshold {
            // settled: leave the frame hook until the next scroll event
            self.stop_ticker();
            return false;
        }

        self.scroll.current = lerp(self.scroll.current, self.scroll.target, self.cfg.lerp);
        trace!(
            "tick current={} target={}",
            self.scroll.current,
            self.scroll.target
        );
        self.update(false);
        true
    }

    fn start_ticker(&mut self) {
        if !self.ticking {
            self.ticking = true;
            self.host.set_ticker(true);
        }
    }

    fn stop_ticker(&mut self) {
        if self.ticking {
            self.ticking = false;
            self.host.set_ticker(false);
        }
    }

    /// Native scroll event: only the target moves; no measurement happens here.
    pub fn handle_scroll(&mut self) {
        if self.destroyed {
            return;
        }
        self.scroll.target = self.host.scroll_position().max(0.0);
        if self.enabled && self.scroll.distance() > self.cfg.settle_threshold {
            self.start_ticker();
        }
    }

    /// Window resize: debounced re-measure.
    pub fn handle_resize(&mut self) {
        if self.destroyed {
            return;
        }
        let generation = self.resize.trigger();
        self.host.schedule_timer(
            TimerToken {
                kind: TimerKind::Resize,
                generation,
            },
            self.resize.delay_ms(),
        );
    }

    /// Size change reported for a tracked node. Ignored unless size observation is on.
    pub fn handle_element_resize(&mut self, node: &H::Node) {
        if !self.cfg.is_resize_observer_enabled || self.find_element(node).is_none() {
            return;
        }
        self.handle_resize();
    }

    /// Key press anywhere in the document. Tab starts (or extends) a tabbing session:
    /// culled elements become visible so focus navigation can reach them. Ignored while
    /// disabled, since nothing is culled then.
    pub fn handle_key_down(&mut self, key: &str) {
        if self.destroyed || !self.enabled || key != "Tab" {
            return;
        }
        if !self.tabbing {
            for element in self.elements.iter() {
                element.reset_visibility(&mut self.host);
            }
            self.tabbing = true;
            debug!("tabbing session started");
        }
        let generation = self.tab.trigger();
        self.host.schedule_timer(
            TimerToken {
                kind: TimerKind::Tabbing,
                generation,
            },
            self.tab.delay_ms(),
        );
    }

    /// Focus moved to `node`. Keeps the focused node in view when it lives in a
    /// tracked subtree of the container.
    pub fn handle_focus_in(&mut self, node: &H::Node) {
        if self.destroyed || !self.host.contains(&self.container, node) {
            return;
        }
        self.scroll_to(
            ScrollTarget::Node(node.clone()),
            ScrollOptions {
                align: Align::Middle,
                should_ignore_when_visible: true,
            },
        );
    }

    /// Delayed callback scheduled through [`Host::schedule_timer`]. Stale tokens are ignored.
    pub fn handle_timer(&mut self, token: TimerToken) {
        if self.destroyed {
            return;
        }
        match token.kind {
            TimerKind::Resize => {
                if self.resize.fire(token.generation) {
                    self.viewport_height = self.host.viewport_height();
                    debug!("resize: viewport height {}", self.viewport_height);
                    self.invalidate();
                }
            }
            TimerKind::Tabbing => {
                if self.tab.fire(token.generation) {
                    self.tabbing = false;
                    debug!("tabbing session ended");
                    if self.enabled {
                        self.update(true);
                    }
                }
            }
        }
    }

    /// Tear down: leave the frame hook, drop subscriptions, destroy every element.
    /// Elements are handed back in natural layout. Idempotent.
    pub fn destruct(&mut self) {
        if self.destroyed {
            return;
        }
        self.stop_ticker();
        self.resize.cancel();
        self.tab.cancel();

        for element in self.elements.iter_mut() {
            element.reset_styles(&mut self.host);
            if self.cfg.is_resize_observer_enabled {
                if let Some(node) = element.node() {
                    self.host.unobserve_size(node);
                }
            }
            element.destruct();
        }
        self.elements.clear();
        self.host
            .apply_style(&self.container, &StyleUpdate::height(Extent::Auto));
        self.host.detach();
        self.tabbing = false;
        self.destroyed = true;
        debug!("scroll engine destructed");
    }
}
