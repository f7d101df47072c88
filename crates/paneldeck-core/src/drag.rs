//! Drag session state machine.
//!
//! One pointer interaction over the canvas: press arms a session for either
//! an existing component or a pending palette spawn, movement ticks produce
//! alignment guides for the hypothetical landing box, and release resolves
//! into a delete, a move, a creation, or a cancel. At most one session is
//! live per canvas at a time; the canvas enforces that.

use crate::component::{Component, ComponentId, default_size};
use crate::geometry::center_anchored;
use crate::guide::{Guide, compute_guides};
use crate::panel::{Panel, PanelError};
use crate::snap::snap_to_neighbors;
use kurbo::{Point, Rect, Size};
use paneldeck_sync::WidgetKind;
use thiserror::Error;

/// Pointer travel (in canvas units) before an armed press becomes a drag.
pub const DRAG_DEAD_ZONE: f64 = 4.0;

/// Drag session errors.
#[derive(Debug, Error, PartialEq)]
pub enum DragError {
    #[error("a drag session is already active")]
    SessionActive,
    #[error("drag subject {0} is not on the panel")]
    MissingSubject(ComponentId),
    #[error("canvas is not in edit mode")]
    NotEditing,
}

/// What a session is dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSubject {
    /// An existing component being relocated.
    Existing(ComponentId),
    /// A pending creation from the palette.
    Spawn(WidgetKind),
}

/// Lifecycle phase of a drag interaction. `Idle` is reported by the canvas
/// when no session is live; a session itself starts `Armed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Armed,
    Moving,
    Resolving,
    Committed,
    Cancelled,
}

/// How a resolved session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    /// A new component was placed.
    Created(ComponentId),
    /// An existing component changed position.
    Moved {
        id: ComponentId,
        from: Rect,
        to: Rect,
    },
    /// An existing component was dropped on the delete region.
    Deleted(Component),
    /// A pending creation was dropped on the delete region.
    Discarded,
    /// The gesture was aborted; `restore` carries the pre-drag box an
    /// existing subject's visual should return to. The panel was never
    /// mutated.
    Cancelled {
        restore: Option<(ComponentId, Rect)>,
    },
}

/// State of one live drag interaction.
#[derive(Debug, Clone)]
pub struct DragSession {
    subject: DragSubject,
    phase: DragPhase,
    press_point: Point,
    pointer: Point,
    /// Size of the box travelling under the pointer.
    size: Size,
    /// Pre-drag bounds of an existing subject, for cancel restore.
    origin_bounds: Option<Rect>,
}

impl DragSession {
    /// Arm a session on pointer-down. An existing subject must currently be
    /// on the panel; its size and pre-drag bounds are captured here.
    pub fn arm(subject: DragSubject, pointer: Point, panel: &Panel) -> Result<Self, DragError> {
        let (size, origin_bounds) = match subject {
            DragSubject::Existing(id) => {
                let component = panel.get(id).ok_or(DragError::MissingSubject(id))?;
                (component.bounds.size(), Some(component.bounds))
            }
            DragSubject::Spawn(kind) => (default_size(kind), None),
        };
        Ok(Self {
            subject,
            phase: DragPhase::Armed,
            press_point: pointer,
            pointer,
            size,
            origin_bounds,
        })
    }

    /// What this session is dragging.
    pub fn subject(&self) -> DragSubject {
        self.subject
    }

    /// Current phase.
    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// The box the subject would occupy if dropped at the current pointer.
    pub fn hypothetical_bounds(&self) -> Rect {
        center_anchored(self.pointer, self.size)
    }

    /// Pointer-move tick. Leaves `Armed` once the pointer travels past the
    /// dead zone; while `Moving`, returns the guide set for the hypothetical
    /// landing box of an existing subject (palette spawns draw no guides).
    pub fn move_to(&mut self, pointer: Point, panel: &Panel, epsilon: f64) -> Vec<Guide> {
        self.pointer = pointer;
        if self.phase == DragPhase::Armed && self.press_point.distance(pointer) > DRAG_DEAD_ZONE {
            self.phase = DragPhase::Moving;
        }
        if self.phase != DragPhase::Moving {
            return Vec::new();
        }
        match self.subject {
            DragSubject::Existing(id) => compute_guides(
                self.hypothetical_bounds(),
                &panel.neighbor_boxes(Some(id)),
                epsilon,
            ),
            DragSubject::Spawn(_) => Vec::new(),
        }
    }

    /// Resolve the session on pointer release.
    ///
    /// A release inside the delete region removes an existing subject or
    /// discards a pending one. Anywhere else the landing box is snapped
    /// against the other components, clamped into the canvas, and committed
    /// to the panel. A subject that vanished mid-drag degrades to a cancel,
    /// and a release that never left the dead zone leaves an existing
    /// subject untouched.
    pub fn drop_at(
        &mut self,
        pointer: Point,
        panel: &mut Panel,
        delete_zone: Option<Rect>,
        threshold: f64,
    ) -> DragOutcome {
        self.pointer = pointer;
        if self.phase == DragPhase::Armed && self.press_point.distance(pointer) > DRAG_DEAD_ZONE {
            self.phase = DragPhase::Moving;
        }
        // A release inside the dead zone is a tap, not a drag: an existing
        // component stays where it is. A palette tap still places.
        if self.phase == DragPhase::Armed && matches!(self.subject, DragSubject::Existing(_)) {
            return self.cancel();
        }
        self.phase = DragPhase::Resolving;

        if !pointer.is_finite() {
            return self.cancel();
        }

        if delete_zone.is_some_and(|zone| zone.contains(pointer)) {
            return match self.subject {
                DragSubject::Existing(id) => match panel.remove(id) {
                    Some(component) => {
                        self.phase = DragPhase::Committed;
                        DragOutcome::Deleted(component)
                    }
                    None => self.cancel(),
                },
                DragSubject::Spawn(_) => {
                    self.phase = DragPhase::Committed;
                    DragOutcome::Discarded
                }
            };
        }

        let target = center_anchored(pointer, self.size);
        let (exclude, probe) = match self.subject {
            DragSubject::Existing(id) => (Some(id), target),
            // Palette drops grab the spawn box at its top-left corner, so
            // the snap probe leads the pointer by half the box size.
            DragSubject::Spawn(_) => (None, center_anchored(target.origin(), self.size)),
        };
        let snap = snap_to_neighbors(probe, &panel.neighbor_boxes(exclude), threshold);
        let origin = Point::new(
            if snap.snapped_x { snap.origin.x } else { target.x0 },
            if snap.snapped_y { snap.origin.y } else { target.y0 },
        );
        let resolved = Rect::from_origin_size(origin, self.size);

        match self.subject {
            DragSubject::Existing(id) => match panel.update_bounds(id, resolved) {
                Ok(to) => {
                    self.phase = DragPhase::Committed;
                    DragOutcome::Moved {
                        id,
                        from: self.origin_bounds.unwrap_or(to),
                        to,
                    }
                }
                Err(PanelError::NotFound(_)) => self.cancel(),
                Err(e) => {
                    log::warn!("drag drop rejected: {e}");
                    self.cancel()
                }
            },
            DragSubject::Spawn(kind) => match panel.spawn(kind, resolved) {
                Ok(id) => {
                    self.phase = DragPhase::Committed;
                    DragOutcome::Created(id)
                }
                Err(e) => {
                    log::warn!("drag spawn rejected: {e}");
                    self.cancel()
                }
            },
        }
    }

    /// Abort the gesture. The panel is left untouched; the outcome carries
    /// the pre-drag box an existing subject's visual should snap back to.
    pub fn cancel(&mut self) -> DragOutcome {
        self.phase = DragPhase::Cancelled;
        let restore = match self.subject {
            DragSubject::Existing(id) => self.origin_bounds.map(|bounds| (id, bounds)),
            DragSubject::Spawn(_) => None,
        };
        DragOutcome::Cancelled { restore }
    }
}
