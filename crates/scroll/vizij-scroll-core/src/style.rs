//! Style writes requested from the render primitive.
//!
//! A [`StyleUpdate`] only carries the properties that change; hosts apply the `Some`
//! fields and leave everything else untouched (same contract as a partial `set` call).

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Positioning {
    Relative,
    Fixed,
    Sticky,
}

impl Positioning {
    pub fn as_css(self) -> &'static str {
        match self {
            Positioning::Relative => "relative",
            Positioning::Fixed => "fixed",
            Positioning::Sticky => "sticky",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

impl Visibility {
    pub fn as_css(self) -> &'static str {
        match self {
            Visibility::Visible => "visible",
            Visibility::Hidden => "hidden",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WillChange {
    Auto,
    Transform,
}

impl WillChange {
    pub fn as_css(self) -> &'static str {
        match self {
            WillChange::Auto => "auto",
            WillChange::Transform => "transform",
        }
    }
}

/// Explicit block size, or back to the layout default.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extent {
    Auto,
    Px(f64),
}

/// Partial set of visual properties for one node.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Positioning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    /// Vertical translation in px.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translate_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub will_change: Option<WillChange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Extent>,
}

impl StyleUpdate {
    /// In-flow layout with no transform, used while measuring.
    pub fn natural() -> Self {
        Self {
            position: Some(Positioning::Relative),
            translate_y: Some(0.0),
            will_change: Some(WillChange::Auto),
            visibility: Some(Visibility::Visible),
            ..Self::default()
        }
    }

    /// Simulated layer anchored to the viewport origin.
    pub fn fixed_layer() -> Self {
        Self {
            position: Some(Positioning::Fixed),
            top: Some(0.0),
            left: Some(0.0),
            will_change: Some(WillChange::Transform),
            ..Self::default()
        }
    }

    /// Companion node pinned by the platform's own sticky positioning.
    pub fn sticky_pinned() -> Self {
        Self {
            position: Some(Positioning::Sticky),
            top: Some(0.0),
            ..Self::default()
        }
    }

    /// Companion node handed back to the engine's transform math.
    pub fn sticky_released() -> Self {
        Self {
            position: Some(Positioning::Relative),
            top: Some(0.0),
            ..Self::default()
        }
    }

    pub fn transform(translate_y: f64, visibility: Visibility) -> Self {
        Self {
            translate_y: Some(translate_y),
            visibility: Some(visibility),
            ..Self::default()
        }
    }

    pub fn visibility(visibility: Visibility) -> Self {
        Self {
            visibility: Some(visibility),
            ..Self::default()
        }
    }

    pub fn height(height: Extent) -> Self {
        Self {
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// CSS `(property, value)` pairs for DOM-like hosts.
    pub fn declarations(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::with_capacity(7);
        if let Some(p) = self.position {
            out.push(("position", p.as_css().to_string()));
        }
        if let Some(top) = self.top {
            out.push(("top", px(top)));
        }
        if let Some(left) = self.left {
            out.push(("left", px(left)));
        }
        if let Some(y) = self.translate_y {
            out.push(("transform", format!("translate3d(0px, {}, 0px)", px(y))));
        }
        if let Some(w) = self.will_change {
            out.push(("will-change", w.as_css().to_string()));
        }
        if let Some(v) = self.visibility {
            out.push(("visibility", v.as_css().to_string()));
        }
        match self.height {
            Some(Extent::Px(h)) => out.push(("height", px(h))),
            Some(Extent::Auto) => out.push(("height", "auto".to_string())),
            None => {}
        }
        out
    }
}

fn px(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}px", v as i64)
    } else {
        format!("{v}px")
    }
}
