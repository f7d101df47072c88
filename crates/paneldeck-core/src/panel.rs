//! Panel document: the authoritative collection of placed components.

use crate::component::{Component, ComponentId};
use crate::geometry::{GeometryError, clamp_to_canvas, validate_box};
use kurbo::{Point, Rect, Size};
use paneldeck_sync::{ProjectRef, WidgetKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Panel operation errors.
#[derive(Debug, Error)]
pub enum PanelError {
    #[error("component {0} not found")]
    NotFound(ComponentId),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type for panel operations.
pub type PanelResult<T> = Result<T, PanelError>;

/// The ordered set of components placed on one project's canvas, plus the
/// counters that keep ids and per-kind indices unique.
///
/// Components are kept in placement order (later entries render in front).
/// Persistence of the record is external; the type serializes for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Panel {
    /// Owning project; component topics derive from it.
    pub project: ProjectRef,
    /// Canvas width in canvas-local units.
    pub width: f64,
    /// Canvas height in canvas-local units.
    pub height: f64,
    components: Vec<Component>,
    /// Next fresh component id. Rebuilt from the components on load.
    #[serde(skip)]
    next_id: u64,
    /// Last issued index per kind; monotonic, freed indices are never
    /// reissued within a session. Rebuilt from the components on load.
    #[serde(skip)]
    next_index: HashMap<WidgetKind, u32>,
}

impl Panel {
    /// Create an empty panel for a project.
    pub fn new(project: ProjectRef, width: f64, height: f64) -> Self {
        Self {
            project,
            width,
            height,
            components: Vec::new(),
            next_id: 0,
            next_index: HashMap::new(),
        }
    }

    /// Canvas dimensions.
    pub fn canvas_size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Components in placement order (back to front).
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Number of placed components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the panel has no components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Look up a component by id.
    pub fn get(&self, id: ComponentId) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Mutable lookup by id.
    pub fn get_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.components.iter_mut().find(|c| c.id == id)
    }

    /// Look up a component by its kind and index.
    pub fn find_by_address(&self, kind: WidgetKind, index: u32) -> Option<&Component> {
        self.components
            .iter()
            .find(|c| c.kind == kind && c.index == index)
    }

    /// Look up a component by exact bound topic.
    pub fn find_by_topic(&self, topic: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.bound_topic == topic)
    }

    /// Frontmost component whose box contains the point.
    pub fn component_at(&self, point: Point) -> Option<&Component> {
        self.components
            .iter()
            .rev()
            .find(|c| c.bounds.contains(point))
    }

    /// Bounding boxes of every component except `exclude`, in placement
    /// order. This is the neighbor set snapping and guides run against.
    pub fn neighbor_boxes(&self, exclude: Option<ComponentId>) -> Vec<Rect> {
        self.components
            .iter()
            .filter(|c| Some(c.id) != exclude)
            .map(|c| c.bounds)
            .collect()
    }

    /// Place a new component of `kind` at `bounds`, allocating a fresh id
    /// and the next index for that kind and deriving its bound topic. The
    /// box is validated and clamped into the canvas.
    pub fn spawn(&mut self, kind: WidgetKind, bounds: Rect) -> PanelResult<ComponentId> {
        validate_box(bounds)?;
        let bounds = clamp_to_canvas(bounds, self.canvas_size());

        self.next_id += 1;
        let id = ComponentId(self.next_id);
        let index = self.allocate_index(kind);
        let component = Component::new(id, kind, index, bounds, &self.project);
        self.components.push(component);
        Ok(id)
    }

    /// Place a new component with its kind's default size centered on a
    /// point, as the palette's tap-to-place path does.
    pub fn spawn_centered(&mut self, kind: WidgetKind, center: Point) -> PanelResult<ComponentId> {
        let bounds = crate::geometry::center_anchored(center, crate::component::default_size(kind));
        self.spawn(kind, bounds)
    }

    /// Move or resize a component. The new box is validated and clamped.
    pub fn update_bounds(&mut self, id: ComponentId, bounds: Rect) -> PanelResult<Rect> {
        validate_box(bounds)?;
        let clamped = clamp_to_canvas(bounds, self.canvas_size());
        let component = self.get_mut(id).ok_or(PanelError::NotFound(id))?;
        component.bounds = clamped;
        Ok(clamped)
    }

    /// Remove a component, returning it. Its index is not reissued.
    pub fn remove(&mut self, id: ComponentId) -> Option<Component> {
        let pos = self.components.iter().position(|c| c.id == id)?;
        Some(self.components.remove(pos))
    }

    /// Next index for a kind: one past the last index ever issued for it.
    fn allocate_index(&mut self, kind: WidgetKind) -> u32 {
        let counter = self.next_index.entry(kind).or_insert(0);
        *counter += 1;
        *counter
    }

    /// Rebuild the id and index counters from the stored components, so a
    /// loaded panel never reissues a persisted id or index.
    pub fn seed_counters(&mut self) {
        self.next_id = self.components.iter().map(|c| c.id.0).max().unwrap_or(0);
        self.next_index.clear();
        for c in &self.components {
            let counter = self.next_index.entry(c.kind).or_insert(0);
            *counter = (*counter).max(c.index);
        }
    }

    /// Serialize the panel record to JSON.
    pub fn to_json(&self) -> PanelResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| PanelError::Serialization(e.to_string()))
    }

    /// Load a panel record from JSON, rebuilding the counters.
    pub fn from_json(json: &str) -> PanelResult<Self> {
        let mut panel: Panel =
            serde_json::from_str(json).map_err(|e| PanelError::Serialization(e.to_string()))?;
        panel.seed_counters();
        Ok(panel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> Panel {
        Panel::new(ProjectRef::with_id("abc123", "My Panel"), 800.0, 600.0)
    }

    fn cell(x: f64, y: f64) -> Rect {
        Rect::from_origin_size((x, y), (96.0, 96.0))
    }

    #[test]
    fn test_spawn_assigns_sequential_indices() {
        let mut p = panel();
        let a = p.spawn(WidgetKind::Button, cell(0.0, 0.0)).unwrap();
        let b = p.spawn(WidgetKind::Button, cell(100.0, 0.0)).unwrap();
        let c = p.spawn(WidgetKind::Button, cell(200.0, 0.0)).unwrap();
        assert_eq!(p.get(a).unwrap().index, 1);
        assert_eq!(p.get(b).unwrap().index, 2);
        assert_eq!(p.get(c).unwrap().index, 3);
        // A different kind counts from 1 independently.
        let led = p.spawn(WidgetKind::Led, cell(300.0, 0.0)).unwrap();
        assert_eq!(p.get(led).unwrap().index, 1);
    }

    #[test]
    fn test_freed_index_is_never_reissued() {
        let mut p = panel();
        p.spawn(WidgetKind::Button, cell(0.0, 0.0)).unwrap();
        let b = p.spawn(WidgetKind::Button, cell(100.0, 0.0)).unwrap();
        p.spawn(WidgetKind::Button, cell(200.0, 0.0)).unwrap();

        assert_eq!(p.remove(b).unwrap().index, 2);
        let d = p.spawn(WidgetKind::Button, cell(300.0, 0.0)).unwrap();
        // Index 2 is free but must not come back.
        assert_eq!(p.get(d).unwrap().index, 4);
    }

    #[test]
    fn test_spawn_derives_topic() {
        let mut p = panel();
        let id = p.spawn(WidgetKind::Slider, cell(0.0, 0.0)).unwrap();
        assert_eq!(
            p.get(id).unwrap().bound_topic,
            "my_panel/abc123/slider/1/cmd"
        );
    }

    #[test]
    fn test_spawn_clamps_into_canvas() {
        let mut p = panel();
        let id = p
            .spawn(WidgetKind::Button, cell(-50.0, 580.0))
            .unwrap();
        let bounds = p.get(id).unwrap().bounds;
        assert_eq!(bounds.origin(), Point::new(0.0, 504.0));
    }

    #[test]
    fn test_spawn_rejects_invalid_geometry() {
        let mut p = panel();
        let bad = Rect::new(0.0, 0.0, f64::NAN, 96.0);
        assert!(matches!(
            p.spawn(WidgetKind::Button, bad),
            Err(PanelError::Geometry(_))
        ));
        assert!(p.is_empty());
    }

    #[test]
    fn test_update_bounds_missing_component() {
        let mut p = panel();
        assert!(matches!(
            p.update_bounds(ComponentId(42), cell(0.0, 0.0)),
            Err(PanelError::NotFound(_))
        ));
    }

    #[test]
    fn test_component_at_prefers_frontmost() {
        let mut p = panel();
        let back = p.spawn(WidgetKind::Button, cell(0.0, 0.0)).unwrap();
        let front = p.spawn(WidgetKind::Led, cell(48.0, 48.0)).unwrap();

        assert_eq!(p.component_at(Point::new(60.0, 60.0)).unwrap().id, front);
        assert_eq!(p.component_at(Point::new(10.0, 10.0)).unwrap().id, back);
        assert!(p.component_at(Point::new(500.0, 500.0)).is_none());
    }

    #[test]
    fn test_neighbor_boxes_excludes_subject() {
        let mut p = panel();
        let a = p.spawn(WidgetKind::Button, cell(0.0, 0.0)).unwrap();
        p.spawn(WidgetKind::Led, cell(100.0, 0.0)).unwrap();
        assert_eq!(p.neighbor_boxes(Some(a)).len(), 1);
        assert_eq!(p.neighbor_boxes(None).len(), 2);
    }

    #[test]
    fn test_spawn_centered_uses_default_size() {
        let mut p = panel();
        let id = p
            .spawn_centered(WidgetKind::Button, Point::new(148.0, 148.0))
            .unwrap();
        assert_eq!(p.get(id).unwrap().bounds, cell(100.0, 100.0));
    }

    #[test]
    fn test_json_round_trip_seeds_counters() {
        let mut p = panel();
        p.spawn(WidgetKind::Button, cell(0.0, 0.0)).unwrap();
        let b = p.spawn(WidgetKind::Button, cell(100.0, 0.0)).unwrap();
        p.remove(b);

        let json = p.to_json().unwrap();
        let mut loaded = Panel::from_json(&json).unwrap();
        assert_eq!(loaded.len(), 1);

        // Counters seed from the surviving max, so new indices and ids stay
        // clear of everything persisted.
        let c = loaded.spawn(WidgetKind::Button, cell(200.0, 0.0)).unwrap();
        assert_eq!(loaded.get(c).unwrap().index, 2);
        assert!(c.0 > 1);
    }
}
