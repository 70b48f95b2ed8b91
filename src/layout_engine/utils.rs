use crate::layout_engine::geometry::{Point, Rect};

/// Footprint of a window once `padding` is split evenly around it. The
/// center stays where it was.
pub fn padded_frame(frame: Rect, padding: f64) -> Rect {
    if padding == 0.0 { frame } else { frame.inflate(padding / 2.0) }
}

/// Inverse of [`padded_frame`]: the window inside a padded cell.
pub fn unpadded_frame(cell: Rect, padding: f64) -> Rect {
    if padding == 0.0 { cell } else { cell.inflate(-padding / 2.0) }
}

/// Top-left corner that centers a `w × h` box on `center`.
pub fn centered_origin(center: Point, w: f64, h: f64) -> Point {
    Point::new(center.x - w / 2.0, center.y - h / 2.0)
}
