//! Runtime canvas: the panel document plus live interaction state.
//!
//! The canvas owns the panel, at most one live drag session, and the guide
//! set for the current tick. Pointer events arrive in canvas-local
//! coordinates from the interactive surface; all canvas access is expected
//! to be serialized by the host (one event queue or one lock), since drag
//! commits and message dispatch both touch the panel.

use crate::component::ComponentId;
use crate::drag::{DragError, DragOutcome, DragPhase, DragSession, DragSubject};
use crate::guide::{Guide, guide_epsilon};
use crate::panel::{Panel, PanelResult};
use crate::snap::snap_threshold;
use kurbo::{Point, Rect, Size};
use paneldeck_sync::{WidgetKind, report_filter};

/// Canvas interaction mode. Edit mode places and arranges components; run
/// mode sends and receives live values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    Edit,
    /// Panels open in run mode.
    #[default]
    Run,
}

/// The editable surface for one project's panel.
#[derive(Debug, Clone)]
pub struct Canvas {
    /// The panel document being edited.
    pub panel: Panel,
    mode: EditorMode,
    /// Display density multiplier for snap/guide thresholds.
    density: f64,
    /// Delete region registered by the host, in canvas coordinates.
    delete_zone: Option<Rect>,
    session: Option<DragSession>,
    guides: Vec<Guide>,
}

impl Canvas {
    /// Create a canvas over a panel, in run mode.
    pub fn new(panel: Panel) -> Self {
        Self {
            panel,
            mode: EditorMode::default(),
            density: 1.0,
            delete_zone: None,
            session: None,
            guides: Vec::new(),
        }
    }

    /// Current interaction mode.
    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// Switch interaction mode. Entering run mode cancels any live drag and
    /// returns the project's report filter for the host to subscribe.
    pub fn set_mode(&mut self, mode: EditorMode) -> Option<String> {
        let entering_run = mode == EditorMode::Run && self.mode == EditorMode::Edit;
        self.mode = mode;
        if entering_run {
            if self.session.is_some() {
                self.cancel_drag();
            }
            return Some(report_filter(&self.panel.project));
        }
        None
    }

    /// Set the display density used to scale snap and guide thresholds.
    pub fn set_density(&mut self, density: f64) {
        self.density = density;
    }

    /// Register (or clear) the delete region drops are tested against.
    pub fn set_delete_zone(&mut self, zone: Option<Rect>) {
        self.delete_zone = zone;
    }

    /// Guides computed on the last pointer tick.
    pub fn guides(&self) -> &[Guide] {
        &self.guides
    }

    /// Phase of the live drag, or `Idle` when none.
    pub fn drag_phase(&self) -> DragPhase {
        self.session
            .as_ref()
            .map_or(DragPhase::Idle, DragSession::phase)
    }

    /// Arm a drag session on pointer-down. Fails fast if a session is
    /// already live or the canvas is not in edit mode.
    pub fn begin_drag(&mut self, subject: DragSubject, pointer: Point) -> Result<(), DragError> {
        if self.mode != EditorMode::Edit {
            return Err(DragError::NotEditing);
        }
        if self.session.is_some() {
            return Err(DragError::SessionActive);
        }
        self.session = Some(DragSession::arm(subject, pointer, &self.panel)?);
        Ok(())
    }

    /// Pointer-move tick: recompute and publish the guide set.
    pub fn drag_to(&mut self, pointer: Point) -> &[Guide] {
        if let Some(session) = self.session.as_mut() {
            self.guides = session.move_to(pointer, &self.panel, guide_epsilon(self.density));
        }
        &self.guides
    }

    /// Pointer release: resolve the live session. Guides are cleared
    /// unconditionally. Returns `None` when no session was live.
    pub fn drop_at(&mut self, pointer: Point) -> Option<DragOutcome> {
        self.guides.clear();
        let mut session = self.session.take()?;
        Some(session.drop_at(
            pointer,
            &mut self.panel,
            self.delete_zone,
            snap_threshold(self.density),
        ))
    }

    /// Abort the live session (pointer left the surface, gesture cancelled
    /// by the platform). Guides are cleared unconditionally.
    pub fn cancel_drag(&mut self) -> Option<DragOutcome> {
        self.guides.clear();
        let mut session = self.session.take()?;
        Some(session.cancel())
    }

    // --- Property edits (edit mode sheet) ---

    /// Rename a component's label.
    pub fn set_label(&mut self, id: ComponentId, label: impl Into<String>) -> bool {
        match self.panel.get_mut(id) {
            Some(component) => {
                component.label = label.into();
                true
            }
            None => false,
        }
    }

    /// Resize a component in place, keeping its origin and re-clamping into
    /// the canvas.
    pub fn resize(&mut self, id: ComponentId, size: Size) -> PanelResult<Rect> {
        let origin = self
            .panel
            .get(id)
            .map(|c| c.bounds.origin())
            .ok_or(crate::panel::PanelError::NotFound(id))?;
        self.panel
            .update_bounds(id, Rect::from_origin_size(origin, size))
    }

    /// Set a type-specific property (color, range, ...).
    pub fn set_property(
        &mut self,
        id: ComponentId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> bool {
        match self.panel.get_mut(id) {
            Some(component) => {
                component.properties.insert(key.into(), value.into());
                true
            }
            None => false,
        }
    }

    // --- Run-mode interactions ---

    /// Button press: the publish a tapped button emits. `None` outside run
    /// mode or for a non-button component.
    pub fn press(&self, id: ComponentId) -> Option<(String, String)> {
        if self.mode != EditorMode::Run {
            return None;
        }
        let component = self.panel.get(id)?;
        if component.kind != WidgetKind::Button {
            return None;
        }
        Some((component.bound_topic.clone(), "1".to_string()))
    }

    /// Slider change: the publish a moved slider emits, value truncated to
    /// an integer string. `None` outside run mode or for a non-slider.
    pub fn slide(&self, id: ComponentId, value: f64) -> Option<(String, String)> {
        if self.mode != EditorMode::Run {
            return None;
        }
        let component = self.panel.get(id)?;
        if component.kind != WidgetKind::Slider {
            return None;
        }
        Some((component.bound_topic.clone(), format!("{}", value as i64)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paneldeck_sync::{ProjectRef, WidgetKind};

    fn canvas() -> Canvas {
        let panel = Panel::new(ProjectRef::with_id("abc123", "My Panel"), 800.0, 600.0);
        let mut canvas = Canvas::new(panel);
        canvas.set_mode(EditorMode::Edit);
        canvas
    }

    fn cell(x: f64, y: f64) -> Rect {
        Rect::from_origin_size((x, y), (96.0, 96.0))
    }

    #[test]
    fn test_run_mode_rejects_drags() {
        let mut c = canvas();
        c.set_mode(EditorMode::Run);
        let err = c
            .begin_drag(DragSubject::Spawn(WidgetKind::Button), Point::new(0.0, 0.0))
            .unwrap_err();
        assert_eq!(err, DragError::NotEditing);
        assert!(c.panel.is_empty());
    }

    #[test]
    fn test_second_session_is_rejected() {
        let mut c = canvas();
        c.begin_drag(DragSubject::Spawn(WidgetKind::Button), Point::new(50.0, 50.0))
            .unwrap();
        let err = c
            .begin_drag(DragSubject::Spawn(WidgetKind::Led), Point::new(60.0, 60.0))
            .unwrap_err();
        assert_eq!(err, DragError::SessionActive);
        // The first session is still the live one.
        assert_eq!(c.drag_phase(), DragPhase::Armed);
    }

    #[test]
    fn test_drop_clears_guides_and_session() {
        let mut c = canvas();
        let a = c.panel.spawn(WidgetKind::Button, cell(100.0, 100.0)).unwrap();
        c.panel.spawn(WidgetKind::Button, cell(400.0, 400.0)).unwrap();

        c.begin_drag(DragSubject::Existing(a), Point::new(148.0, 148.0))
            .unwrap();
        // Align centers with the stationary button to light a guide.
        c.drag_to(Point::new(448.0, 300.0));
        assert!(!c.guides().is_empty());

        let outcome = c.drop_at(Point::new(448.0, 300.0)).unwrap();
        assert!(matches!(outcome, DragOutcome::Moved { .. }));
        assert!(c.guides().is_empty());
        assert_eq!(c.drag_phase(), DragPhase::Idle);
    }

    #[test]
    fn test_cancel_clears_guides_and_session() {
        let mut c = canvas();
        let a = c.panel.spawn(WidgetKind::Button, cell(100.0, 100.0)).unwrap();
        c.panel.spawn(WidgetKind::Button, cell(400.0, 400.0)).unwrap();

        c.begin_drag(DragSubject::Existing(a), Point::new(148.0, 148.0))
            .unwrap();
        c.drag_to(Point::new(448.0, 300.0));
        let outcome = c.cancel_drag().unwrap();
        assert!(matches!(outcome, DragOutcome::Cancelled { .. }));
        assert!(c.guides().is_empty());
        assert_eq!(c.drag_phase(), DragPhase::Idle);
        // Position unchanged.
        assert_eq!(c.panel.get(a).unwrap().bounds.origin(), Point::new(100.0, 100.0));
    }

    #[test]
    fn test_entering_run_returns_report_filter() {
        let mut c = canvas();
        let filter = c.set_mode(EditorMode::Run).unwrap();
        assert_eq!(filter, "my_panel/abc123/+/+/rep");
        // Re-entering run mode is not a transition.
        assert!(c.set_mode(EditorMode::Run).is_none());
    }

    #[test]
    fn test_entering_run_cancels_live_drag() {
        let mut c = canvas();
        c.begin_drag(DragSubject::Spawn(WidgetKind::Button), Point::new(50.0, 50.0))
            .unwrap();
        c.set_mode(EditorMode::Run);
        assert_eq!(c.drag_phase(), DragPhase::Idle);
        assert!(c.panel.is_empty());
    }

    #[test]
    fn test_resize_reclamps() {
        let mut c = canvas();
        let id = c.panel.spawn(WidgetKind::Image, cell(700.0, 100.0)).unwrap();
        let bounds = c.resize(id, Size::new(200.0, 96.0)).unwrap();
        // Origin pulled left so the wider box still fits.
        assert_eq!(bounds.origin(), Point::new(600.0, 100.0));
        assert_eq!(bounds.size(), Size::new(200.0, 96.0));
    }

    #[test]
    fn test_property_edits() {
        let mut c = canvas();
        let id = c.panel.spawn(WidgetKind::Led, cell(0.0, 0.0)).unwrap();
        assert!(c.set_label(id, "Pump state"));
        assert!(c.set_property(id, "color", "#00ff00"));
        let component = c.panel.get(id).unwrap();
        assert_eq!(component.label, "Pump state");
        assert_eq!(component.properties["color"], "#00ff00");
        assert!(!c.set_label(ComponentId(99), "nope"));
    }

    #[test]
    fn test_press_and_slide_only_in_run_mode() {
        let mut c = canvas();
        let button = c.panel.spawn(WidgetKind::Button, cell(0.0, 0.0)).unwrap();
        let slider = c.panel.spawn(WidgetKind::Slider, cell(0.0, 200.0)).unwrap();

        // Edit mode: widgets are inert.
        assert!(c.press(button).is_none());
        assert!(c.slide(slider, 40.0).is_none());

        c.set_mode(EditorMode::Run);
        assert_eq!(
            c.press(button).unwrap(),
            ("my_panel/abc123/button/1/cmd".to_string(), "1".to_string())
        );
        assert_eq!(
            c.slide(slider, 42.7).unwrap(),
            ("my_panel/abc123/slider/1/cmd".to_string(), "42".to_string())
        );
        // Kind mismatch.
        assert!(c.press(slider).is_none());
        assert!(c.slide(button, 1.0).is_none());
    }
}
