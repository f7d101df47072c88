//! Alignment guide computation.
//!
//! Guides are the thin hint lines drawn while a component is dragged: one
//! per near-alignment between the moving box and a neighbor, at a much
//! tighter threshold than snapping. The set is recomputed from scratch on
//! every pointer tick and cleared when the drag resolves.

use kurbo::{Point, Rect};

/// Guide distance threshold in density-independent units.
pub const GUIDE_EPSILON: f64 = 2.0;

/// Epsilon scaled for a display density.
pub fn guide_epsilon(density: f64) -> f64 {
    GUIDE_EPSILON * density
}

/// One axis-aligned guide segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guide {
    pub from: Point,
    pub to: Point,
}

impl Guide {
    /// Vertical guide at `x` spanning `[y0, y1]`.
    pub fn vertical(x: f64, y0: f64, y1: f64) -> Self {
        Self {
            from: Point::new(x, y0),
            to: Point::new(x, y1),
        }
    }

    /// Horizontal guide at `y` spanning `[x0, x1]`.
    pub fn horizontal(y: f64, x0: f64, x1: f64) -> Self {
        Self {
            from: Point::new(x0, y),
            to: Point::new(x1, y),
        }
    }

    /// Whether this guide runs vertically.
    pub fn is_vertical(&self) -> bool {
        self.from.x == self.to.x
    }
}

/// Compute the guide set for a moving box against stationary neighbors.
///
/// An X-alignment produces a vertical guide spanning the union of both
/// boxes' vertical extents; a Y-alignment the mirror. Simultaneous matches
/// each contribute their own guide; nothing is deduplicated.
pub fn compute_guides(moving: Rect, neighbors: &[Rect], epsilon: f64) -> Vec<Guide> {
    let mut guides = Vec::new();

    for target in neighbors {
        let y0 = moving.y0.min(target.y0);
        let y1 = moving.y1.max(target.y1);
        let x0 = moving.x0.min(target.x0);
        let x1 = moving.x1.max(target.x1);
        let t_cx = target.center().x;
        let t_cy = target.center().y;
        let m_cx = moving.center().x;
        let m_cy = moving.center().y;

        // X matches produce vertical guides at the matched edge.
        if (moving.x0 - target.x0).abs() < epsilon {
            guides.push(Guide::vertical(target.x0, y0, y1));
        }
        if (moving.x0 - target.x1).abs() < epsilon {
            guides.push(Guide::vertical(target.x1, y0, y1));
        }
        if (moving.x1 - target.x0).abs() < epsilon {
            guides.push(Guide::vertical(target.x0, y0, y1));
        }
        if (moving.x1 - target.x1).abs() < epsilon {
            guides.push(Guide::vertical(target.x1, y0, y1));
        }
        if (m_cx - t_cx).abs() < epsilon {
            guides.push(Guide::vertical(t_cx, y0, y1));
        }

        // Y matches produce horizontal guides.
        if (moving.y0 - target.y0).abs() < epsilon {
            guides.push(Guide::horizontal(target.y0, x0, x1));
        }
        if (moving.y0 - target.y1).abs() < epsilon {
            guides.push(Guide::horizontal(target.y1, x0, x1));
        }
        if (moving.y1 - target.y0).abs() < epsilon {
            guides.push(Guide::horizontal(target.y0, x0, x1));
        }
        if (moving.y1 - target.y1).abs() < epsilon {
            guides.push(Guide::horizontal(target.y1, x0, x1));
        }
        if (m_cy - t_cy).abs() < epsilon {
            guides.push(Guide::horizontal(t_cy, x0, x1));
        }
    }

    guides
}
