use crate::surface::{Rect, Size};
use robot_toast_util::Side;

/// Where inside the toast the pointer grabbed it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grab {
    pub dx: f32,
    pub dy: f32,
}

impl Grab {
    pub fn new(pointer_x: f32, pointer_y: f32, rect: Rect) -> Self {
        Self {
            dx: pointer_x - rect.x,
            dy: pointer_y - rect.y,
        }
    }

    /// Top-left corner for a pointer position, kept fully inside the viewport.
    pub fn place(&self, pointer_x: f32, pointer_y: f32, size: Size, viewport: Size) -> (f32, f32) {
        clamp_to_viewport(pointer_x - self.dx, pointer_y - self.dy, size, viewport)
    }
}

/// Clamp a top-left corner so the box stays on screen. A box larger than the
/// viewport pins to zero.
pub fn clamp_to_viewport(left: f32, top: f32, size: Size, viewport: Size) -> (f32, f32) {
    let max_x = viewport.width - size.width;
    let max_y = viewport.height - size.height;
    (left.min(max_x).max(0.0), top.min(max_y).max(0.0))
}

/// Resting place after a drop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snap {
    pub edge: Side,
    pub left: f32,
    pub top: f32,
}

/// Snap to the nearer horizontal edge, keeping the vertical drop position
/// within `margin` of the top and bottom.
pub fn snap(rect: Rect, viewport: Size, margin: f32) -> Snap {
    let edge = if rect.center_x() < viewport.width / 2.0 {
        Side::Left
    } else {
        Side::Right
    };
    let left = match edge {
        Side::Left => margin,
        Side::Right => viewport.width - rect.width - margin,
    };
    let top = rect.y.min(viewport.height - rect.height - margin).max(margin);
    Snap { edge, left, top }
}
