//! Paneldeck Core Library
//!
//! Canvas engine for composing control panels: free-form component
//! placement with snap-to-neighbor and alignment guides, the drag session
//! state machine, and the inbound-message refresh path that keeps widgets
//! showing live values.

pub mod canvas;
pub mod component;
pub mod drag;
pub mod geometry;
pub mod guide;
pub mod panel;
pub mod refresh;
pub mod snap;

pub use canvas::{Canvas, EditorMode};
pub use component::{Component, ComponentId, DEFAULT_CELL, default_label, default_size};
pub use drag::{
    DRAG_DEAD_ZONE, DragError, DragOutcome, DragPhase, DragSession, DragSubject,
};
pub use geometry::{GeometryError, box_at, center_anchored, clamp_to_canvas, validate_box};
pub use guide::{GUIDE_EPSILON, Guide, compute_guides, guide_epsilon};
pub use panel::{Panel, PanelError, PanelResult};
pub use refresh::{DisplayValue, Refresh, apply_message, hydrate, interpret};
pub use snap::{SNAP_THRESHOLD, SnapResult, resolve_snap, snap_threshold, snap_to_neighbors};
