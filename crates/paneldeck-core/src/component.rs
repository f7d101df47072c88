//! Placed widget instances.

use kurbo::{Rect, Size};
use paneldeck_sync::{ProjectRef, WidgetKind, format_topic};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifier of one component, unique within its panel for the panel's
/// lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(pub u64);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Base cell size for widgets, in density-independent units.
pub const DEFAULT_CELL: f64 = 96.0;

/// Default box size for a freshly spawned widget of a kind.
pub fn default_size(kind: WidgetKind) -> Size {
    match kind {
        WidgetKind::Slider => Size::new(DEFAULT_CELL * 2.0, DEFAULT_CELL),
        WidgetKind::Text => Size::new(DEFAULT_CELL * 1.5, DEFAULT_CELL),
        _ => Size::new(DEFAULT_CELL, DEFAULT_CELL),
    }
}

/// Default display label for a freshly spawned widget.
pub fn default_label(kind: WidgetKind) -> &'static str {
    match kind {
        WidgetKind::Text => "Label",
        WidgetKind::Image => "Image",
        WidgetKind::Button => "Button",
        WidgetKind::Slider => "Slider",
        WidgetKind::Led => "Led",
        WidgetKind::Thermometer => "Thermometer",
        WidgetKind::Camera => "Camera",
    }
}

/// One placed widget: position, size, identity and its bound topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Panel-unique id, stable for the component's lifetime.
    pub id: ComponentId,
    /// Widget kind.
    pub kind: WidgetKind,
    /// 1-based ordinal, unique among components of the same kind.
    pub index: u32,
    /// Bounding box in canvas-local coordinates.
    pub bounds: Rect,
    /// User-editable display text.
    pub label: String,
    /// Topic this component publishes to or displays from.
    pub bound_topic: String,
    /// Type-specific extras (color, ranges, ...).
    pub properties: HashMap<String, String>,
}

impl Component {
    /// Build a component for a project, deriving its bound topic from the
    /// project identity and the component's kind, index and direction.
    pub fn new(
        id: ComponentId,
        kind: WidgetKind,
        index: u32,
        bounds: Rect,
        project: &ProjectRef,
    ) -> Self {
        Self {
            id,
            kind,
            index,
            bounds,
            label: default_label(kind).to_string(),
            bound_topic: format_topic(project, kind, index, kind.direction()),
            properties: HashMap::new(),
        }
    }

    /// Re-derive the bound topic, e.g. after the project was renamed.
    /// Deriving twice for an unchanged component is a no-op.
    pub fn rebind_topic(&mut self, project: &ProjectRef) {
        self.bound_topic = format_topic(project, self.kind, self.index, self.kind.direction());
    }
}
