//! Snap-to-neighbor resolution for dropped components.
//!
//! Each axis is resolved independently. For every stationary neighbor the
//! moving box has five candidate alignments per axis (left-left, left-right,
//! right-left, right-right, center-center); the closest candidate under the
//! threshold wins that axis, and an axis with no candidate under threshold
//! keeps its raw coordinate.

use kurbo::{Point, Rect};

/// Snap distance threshold in density-independent units.
pub const SNAP_THRESHOLD: f64 = 16.0;

/// Threshold scaled for a display density.
pub fn snap_threshold(density: f64) -> f64 {
    SNAP_THRESHOLD * density
}

/// Result of a snap query.
#[derive(Debug, Clone, Copy)]
pub struct SnapResult {
    /// Resolved top-left origin; unsnapped axes carry the raw coordinate.
    pub origin: Point,
    /// Whether the X axis snapped.
    pub snapped_x: bool,
    /// Whether the Y axis snapped.
    pub snapped_y: bool,
}

impl SnapResult {
    /// Result with no snapping.
    pub fn none(origin: Point) -> Self {
        Self {
            origin,
            snapped_x: false,
            snapped_y: false,
        }
    }

    /// Whether either axis snapped.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// Snap a moving box against a set of stationary neighbors.
///
/// Ties at exactly equal distance go to the first neighbor in canvas order
/// (the comparison is strict, so a later equal candidate never replaces an
/// earlier one). Snapped coordinates are exact: a left edge snapped to a
/// neighbor's right edge lands on it precisely.
pub fn snap_to_neighbors(moving: Rect, neighbors: &[Rect], threshold: f64) -> SnapResult {
    let w = moving.width();
    let h = moving.height();

    let mut snap_x = moving.x0;
    let mut snap_y = moving.y0;
    let mut snapped_x = false;
    let mut snapped_y = false;
    let mut min_dx = threshold;
    let mut min_dy = threshold;

    for target in neighbors {
        let t_cx = target.center().x;
        let t_cy = target.center().y;
        let m_cx = moving.center().x;
        let m_cy = moving.center().y;

        // X axis: candidate pairs are (distance, implied left edge).
        let x_candidates = [
            ((moving.x0 - target.x0).abs(), target.x0),
            ((moving.x0 - target.x1).abs(), target.x1),
            ((moving.x1 - target.x0).abs(), target.x0 - w),
            ((moving.x1 - target.x1).abs(), target.x1 - w),
            ((m_cx - t_cx).abs(), t_cx - w / 2.0),
        ];
        for (dist, left) in x_candidates {
            if dist < min_dx {
                min_dx = dist;
                snap_x = left;
                snapped_x = true;
            }
        }

        // Y axis.
        let y_candidates = [
            ((moving.y0 - target.y0).abs(), target.y0),
            ((moving.y0 - target.y1).abs(), target.y1),
            ((moving.y1 - target.y0).abs(), target.y0 - h),
            ((moving.y1 - target.y1).abs(), target.y1 - h),
            ((m_cy - t_cy).abs(), t_cy - h / 2.0),
        ];
        for (dist, top) in y_candidates {
            if dist < min_dy {
                min_dy = dist;
                snap_y = top;
                snapped_y = true;
            }
        }
    }

    SnapResult {
        origin: Point::new(snap_x, snap_y),
        snapped_x,
        snapped_y,
    }
}

/// Top-level snap query: the snapped origin, or `None` when neither axis
/// came under threshold.
pub fn resolve_snap(moving: Rect, neighbors: &[Rect], threshold: f64) -> Option<Point> {
    let result = snap_to_neighbors(moving, neighbors, threshold);
    result.is_snapped().then_some(result.origin)
}
