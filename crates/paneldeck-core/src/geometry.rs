//! Geometry helpers over component bounding boxes.
//!
//! Boxes are plain [`kurbo::Rect`] values in canvas-local coordinates,
//! origin top-left: `x0`/`x1` are the left and right edges, `y0`/`y1` the
//! top and bottom.

use kurbo::{Point, Rect, Size};
use thiserror::Error;

/// Geometry validation errors.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("bounds are not finite")]
    NonFinite,
    #[error("negative size: {width}x{height}")]
    NegativeSize { width: f64, height: f64 },
}

/// Box with the given top-left origin and size.
pub fn box_at(origin: Point, size: Size) -> Rect {
    Rect::from_origin_size(origin, size)
}

/// Box of the given size centered on a point. Used to anchor a dragged box
/// under the pointer.
pub fn center_anchored(center: Point, size: Size) -> Rect {
    Rect::from_center_size(center, size)
}

/// Reject boxes a drop must never produce: non-finite coordinates or a
/// negative width/height.
pub fn validate_box(rect: Rect) -> Result<(), GeometryError> {
    if !(rect.x0.is_finite() && rect.y0.is_finite() && rect.x1.is_finite() && rect.y1.is_finite()) {
        return Err(GeometryError::NonFinite);
    }
    let (w, h) = (rect.width(), rect.height());
    if w < 0.0 || h < 0.0 {
        return Err(GeometryError::NegativeSize {
            width: w,
            height: h,
        });
    }
    Ok(())
}

/// Clamp a box into the canvas: the origin lands in
/// `[0, W-w] x [0, H-h]`, so the box stays fully visible. A box larger than
/// the canvas pins to the top-left.
pub fn clamp_to_canvas(rect: Rect, canvas: Size) -> Rect {
    let x = rect.x0.clamp(0.0, (canvas.width - rect.width()).max(0.0));
    let y = rect.y0.clamp(0.0, (canvas.height - rect.height()).max(0.0));
    Rect::from_origin_size((x, y), rect.size())
}
