//! TrackedElement: one content block projected onto the viewport.
//!
//! Lifecycle: created by the engine on `add_element`, measured on every invalidate
//! pass, updated once per frame while the interpolated scroll position moves, and
//! destroyed on removal or engine teardown. A destroyed element ignores every call.

use log::warn;

use crate::bounds::Bounds;
use crate::host::Host;
use crate::ids::ElementId;
use crate::math::{clamp, normalize};
use crate::position::{relative_position, sticky_position, Align};
use crate::style::{StyleUpdate, Visibility};

/// Per-element options.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementOptions<N> {
    /// Clamp the block inside the viewport band while it is partially visible.
    pub sticky: bool,
    /// Companion node inside the block, styled in tandem with it.
    pub sticky_node: Option<N>,
}

impl<N> Default for ElementOptions<N> {
    fn default() -> Self {
        Self {
            sticky: false,
            sticky_node: None,
        }
    }
}

/// What to look for inside a tracked subtree.
#[derive(Debug)]
pub enum ChildTarget<'a, N> {
    Node(&'a N),
    /// Identifier, with or without a leading `#`.
    Id(&'a str),
}

// Manual impls: a derive would require `N: Copy`.
impl<N> Clone for ChildTarget<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N> Copy for ChildTarget<'_, N> {}

#[derive(Debug)]
enum ElementState<N> {
    Active { node: N, bounds: Option<Bounds> },
    Destroyed,
}

#[derive(Debug)]
pub struct TrackedElement<N> {
    id: ElementId,
    state: ElementState<N>,
    options: ElementOptions<N>,
    /// Last offset written to the render primitive.
    position: f64,
    progress: f64,
}

impl<N: Clone + PartialEq + std::fmt::Debug> TrackedElement<N> {
    pub fn new(id: ElementId, node: N, options: ElementOptions<N>) -> Self {
        Self {
            id,
            state: ElementState::Active { node, bounds: None },
            options,
            position: 0.0,
            progress: 0.0,
        }
    }

    #[inline]
    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn node(&self) -> Option<&N> {
        match &self.state {
            ElementState::Active { node, .. } => Some(node),
            ElementState::Destroyed => None,
        }
    }

    pub fn bounds(&self) -> Option<&Bounds> {
        match &self.state {
            ElementState::Active { bounds, .. } => bounds.as_ref(),
            ElementState::Destroyed => None,
        }
    }

    /// Measured height, 0 until measured.
    pub fn height(&self) -> f64 {
        self.bounds().map_or(0.0, |b| b.height)
    }

    /// Measured document-space top, 0 until measured.
    pub fn top(&self) -> f64 {
        self.bounds().map_or(0.0, |b| b.top)
    }

    /// Offset last handed to the render primitive.
    #[inline]
    pub fn render_offset(&self) -> f64 {
        self.position
    }

    /// Culling progress from the last update: 0 at the leading edge, 1 at the trailing edge.
    #[inline]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    #[inline]
    pub fn is_sticky(&self) -> bool {
        self.options.sticky
    }

    pub fn is_destroyed(&self) -> bool {
        matches!(self.state, ElementState::Destroyed)
    }

    fn sticky_companion(&self) -> Option<&N> {
        if self.options.sticky {
            self.options.sticky_node.as_ref()
        } else {
            None
        }
    }

    /// Back to natural in-flow layout so measurement reads true layout.
    pub fn reset_styles<H: Host<Node = N>>(&mut self, host: &mut H) {
        let ElementState::Active { node, .. } = &self.state else {
            return;
        };
        host.apply_style(node, &StyleUpdate::natural());
        if let Some(companion) = self.sticky_companion() {
            host.apply_style(companion, &StyleUpdate::sticky_pinned());
        }
        self.position = 0.0;
        self.progress = 0.0;
    }

    /// Switch to the simulated fixed layer driven by `update`.
    pub fn apply_styles<H: Host<Node = N>>(&self, host: &mut H) {
        let ElementState::Active { node, .. } = &self.state else {
            return;
        };
        host.apply_style(node, &StyleUpdate::fixed_layer());
        if let Some(companion) = self.sticky_companion() {
            host.apply_style(companion, &StyleUpdate::sticky_released());
        }
    }

    pub fn reset_visibility<H: Host<Node = N>>(&self, host: &mut H) {
        if let ElementState::Active { node, .. } = &self.state {
            host.apply_style(node, &StyleUpdate::visibility(Visibility::Visible));
        }
    }

    /// Store the node's box in document space. Only valid while in natural layout.
    pub fn measure<H: Host<Node = N>>(&mut self, host: &H, scroll_position: f64) {
        let ElementState::Active { node, bounds } = &mut self.state else {
            return;
        };
        *bounds = host
            .bounding_box(node)
            .map(|b| b.to_document_space(scroll_position));
        if bounds.is_none() {
            warn!("element {:?} is detached; skipping it until re-measured", self.id);
        }
    }

    /// Project the element for the given interpolated scroll position.
    ///
    /// Returns true when a style write was issued.
    pub fn update<H: Host<Node = N>>(
        &mut self,
        host: &mut H,
        viewport_height: f64,
        scroll_position: f64,
        force: bool,
        update_visibility: bool,
    ) -> bool {
        let ElementState::Active {
            node,
            bounds: Some(bounds),
        } = &self.state
        else {
            return false;
        };

        let raw_position = (bounds.top - scroll_position).round();
        let min_position = -bounds.height;
        let max_position = viewport_height;

        let base = if self.options.sticky {
            sticky_position(raw_position, bounds.height, viewport_height)
        } else {
            raw_position
        };
        let position = clamp(min_position, max_position, base);

        self.progress = clamp(
            0.0,
            1.0,
            normalize(max_position, min_position, raw_position),
        );

        if !force && self.position == position {
            return false;
        }

        let visibility = if update_visibility && (self.progress == 0.0 || self.progress == 1.0) {
            Visibility::Hidden
        } else {
            Visibility::Visible
        };
        host.apply_style(node, &StyleUpdate::transform(position, visibility));
        self.position = position;
        true
    }

    /// Viewport-relative top of the live node.
    pub fn live_top<H: Host<Node = N>>(&self, host: &H) -> Option<f64> {
        self.node()
            .and_then(|node| host.bounding_box(node))
            .map(|b| b.top)
    }

    /// Aligned offset of `target` relative to this element's own top, when `target`
    /// lives in this element's subtree.
    pub fn get_relative_child_position<H: Host<Node = N>>(
        &self,
        host: &H,
        target: ChildTarget<'_, N>,
        align: Align,
    ) -> Option<f64> {
        let node = self.node()?;
        let found = match target {
            ChildTarget::Node(candidate) => {
                if candidate == node || host.contains(node, candidate) {
                    Some(candidate.clone())
                } else {
                    None
                }
            }
            ChildTarget::Id(id) => {
                let id = id.strip_prefix('#').unwrap_or(id);
                if id.is_empty() {
                    None
                } else {
                    host.find_by_id(node, id)
                }
            }
        }?;

        let own = host.bounding_box(node)?;
        let child = host.bounding_box(&found)?;
        Some(relative_position(&child, &own, align))
    }

    /// Release the node and bounds. Later calls are no-ops.
    pub fn destruct(&mut self) {
        self.state = ElementState::Destroyed;
        self.options.sticky_node = None;
    }
}
