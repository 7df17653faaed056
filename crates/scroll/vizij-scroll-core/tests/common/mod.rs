#![allow(dead_code)]
//! Recording fake host shared by the integration tests.
//!
//! Layout model: the container (node 0) stacks its direct children ("blocks") in
//! registration order. A block in natural layout sits below every earlier block that is
//! still in flow; a block on the fixed layer sits at its translation and no longer takes
//! space. Nested nodes sit at a fixed offset inside their parent.

use vizij_scroll_core::{
    Bounds, Extent, Host, Positioning, ScrollBehavior, StyleUpdate, TimerToken, Visibility,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

pub const CONTAINER: NodeId = NodeId(0);

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedStyle {
    pub position: Option<Positioning>,
    pub translate_y: f64,
    pub visibility: Option<Visibility>,
    pub height: Option<Extent>,
}

impl ResolvedStyle {
    pub fn is_fixed(&self) -> bool {
        self.position == Some(Positioning::Fixed)
    }

    pub fn is_hidden(&self) -> bool {
        self.visibility == Some(Visibility::Hidden)
    }
}

#[derive(Clone, Debug)]
pub struct FakeNode {
    pub parent: Option<NodeId>,
    pub id_attr: Option<String>,
    pub offset: f64,
    pub height: f64,
    pub attached: bool,
    pub style: ResolvedStyle,
}

#[derive(Debug)]
pub struct FakeHost {
    pub nodes: Vec<FakeNode>,
    pub scroll: f64,
    pub viewport: f64,
    pub writes: Vec<(NodeId, StyleUpdate)>,
    pub scroll_requests: Vec<(f64, ScrollBehavior)>,
    pub ticker: bool,
    pub ticker_changes: usize,
    pub timers: Vec<(TimerToken, u32)>,
    pub observed: Vec<NodeId>,
    pub detached: bool,
}

impl FakeHost {
    pub fn new(viewport: f64) -> Self {
        Self {
            nodes: vec![FakeNode {
                parent: None,
                id_attr: None,
                offset: 0.0,
                height: 0.0,
                attached: true,
                style: ResolvedStyle::default(),
            }],
            scroll: 0.0,
            viewport,
            writes: Vec::new(),
            scroll_requests: Vec::new(),
            ticker: false,
            ticker_changes: 0,
            timers: Vec::new(),
            observed: Vec::new(),
            detached: false,
        }
    }

    /// Direct child of the container with the given height.
    pub fn add_block(&mut self, height: f64) -> NodeId {
        self.push_node(Some(CONTAINER), None, 0.0, height)
    }

    pub fn add_child(
        &mut self,
        parent: NodeId,
        offset: f64,
        height: f64,
        id: Option<&str>,
    ) -> NodeId {
        self.push_node(Some(parent), id.map(str::to_string), offset, height)
    }

    /// Node outside the container.
    pub fn add_outside(&mut self, height: f64) -> NodeId {
        self.push_node(None, None, 0.0, height)
    }

    fn push_node(
        &mut self,
        parent: Option<NodeId>,
        id_attr: Option<String>,
        offset: f64,
        height: f64,
    ) -> NodeId {
        self.nodes.push(FakeNode {
            parent,
            id_attr,
            offset,
            height,
            attached: true,
            style: ResolvedStyle::default(),
        });
        NodeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> &FakeNode {
        &self.nodes[id.0]
    }

    pub fn style(&self, id: NodeId) -> &ResolvedStyle {
        &self.nodes[id.0].style
    }

    pub fn set_height(&mut self, id: NodeId, height: f64) {
        self.nodes[id.0].height = height;
    }

    pub fn detach_node(&mut self, id: NodeId) {
        self.nodes[id.0].attached = false;
    }

    pub fn writes_for(&self, id: NodeId) -> Vec<&StyleUpdate> {
        self.writes
            .iter()
            .filter(|(n, _)| *n == id)
            .map(|(_, s)| s)
            .collect()
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }

    pub fn take_timers(&mut self) -> Vec<(TimerToken, u32)> {
        std::mem::take(&mut self.timers)
    }

    pub fn last_container_height(&self) -> Option<Extent> {
        self.writes
            .iter()
            .rev()
            .find(|(n, s)| *n == CONTAINER && s.height.is_some())
            .and_then(|(_, s)| s.height)
    }

    fn is_block(&self, id: NodeId) -> bool {
        self.nodes[id.0].parent == Some(CONTAINER)
    }

    /// Document-space top of a block in natural layout.
    fn natural_block_top(&self, id: NodeId) -> f64 {
        self.nodes[1..id.0]
            .iter()
            .filter(|n| n.parent == Some(CONTAINER) && n.attached && !n.style.is_fixed())
            .map(|n| n.height)
            .sum()
    }

    fn viewport_top(&self, id: NodeId) -> f64 {
        let node = &self.nodes[id.0];
        if id == CONTAINER {
            return -self.scroll;
        }
        match node.parent {
            Some(CONTAINER) => {
                if node.style.is_fixed() {
                    node.style.translate_y
                } else {
                    self.natural_block_top(id) - self.scroll
                }
            }
            Some(parent) => self.viewport_top(parent) + node.offset,
            None => node.offset - self.scroll,
        }
    }

    fn is_attached(&self, id: NodeId) -> bool {
        let node = &self.nodes[id.0];
        node.attached && node.parent.map_or(true, |p| self.is_attached(p))
    }
}

impl Host for FakeHost {
    type Node = NodeId;

    fn scroll_position(&self) -> f64 {
        self.scroll
    }

    fn viewport_height(&self) -> f64 {
        self.viewport
    }

    fn bounding_box(&self, node: &NodeId) -> Option<Bounds> {
        if node.0 >= self.nodes.len() || !self.is_attached(*node) {
            return None;
        }
        let height = self.nodes[node.0].height;
        Some(Bounds::new(self.viewport_top(*node), 0.0, 1024.0, height))
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        let mut cur = Some(*node);
        while let Some(id) = cur {
            if id == *ancestor {
                return true;
            }
            cur = self.nodes.get(id.0).and_then(|n| n.parent);
        }
        false
    }

    fn find_by_id(&self, root: &NodeId, id: &str) -> Option<NodeId> {
        (0..self.nodes.len())
            .map(NodeId)
            .find(|n| self.nodes[n.0].id_attr.as_deref() == Some(id) && self.contains(root, n))
    }

    fn apply_style(&mut self, node: &NodeId, style: &StyleUpdate) {
        let resolved = &mut self.nodes[node.0].style;
        if let Some(p) = style.position {
            resolved.position = Some(p);
        }
        if let Some(y) = style.translate_y {
            resolved.translate_y = y;
        }
        if let Some(v) = style.visibility {
            resolved.visibility = Some(v);
        }
        if let Some(h) = style.height {
            resolved.height = Some(h);
        }
        self.writes.push((*node, style.clone()));
    }

    fn request_scroll(&mut self, position: f64, behavior: ScrollBehavior) {
        self.scroll_requests.push((position, behavior));
    }

    fn set_ticker(&mut self, active: bool) {
        self.ticker = active;
        self.ticker_changes += 1;
    }

    fn schedule_timer(&mut self, token: TimerToken, delay_ms: u32) {
        self.timers.push((token, delay_ms));
    }

    fn observe_size(&mut self, node: &NodeId) {
        self.observed.push(*node);
    }

    fn unobserve_size(&mut self, node: &NodeId) {
        self.observed.retain(|n| n != node);
    }

    fn detach(&mut self) {
        self.detached = true;
    }
}

pub fn approx(a: f64, b: f64, eps: f64) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}
