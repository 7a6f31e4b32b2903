use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in image pixel coordinates.
///
/// This is the shape the external box detector reports: `(x, y)` is the
/// top-left corner. Values are kept as `f32` because reconstructed boxes are
/// derived from measured spacings and need not fall on integer pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoxRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center of the rectangle.
    #[inline]
    pub fn center(&self) -> Point2<f32> {
        Point2::new(self.center_x(), self.center_y())
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width * 0.5
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        self.y + self.height * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn center_is_midpoint() {
        let r = BoxRect::new(10.0, 20.0, 200.0, 60.0);
        assert_relative_eq!(r.center_x(), 110.0);
        assert_relative_eq!(r.center_y(), 50.0);
        assert_relative_eq!(r.center().x, 110.0);
        assert_relative_eq!(r.center().y, 50.0);
    }
}
