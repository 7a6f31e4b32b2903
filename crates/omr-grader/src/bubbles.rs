use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::types::{BubbleCircle, BubbleSet, QuestionBox};

/// Geometry of the four answer bubbles inside a question box.
///
/// The defaults were measured on the reference sheet. `shrink` pulls the
/// bubbles closer together than the detected box width suggests because the
/// printed bubble row is narrower than the box the detector finds around it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BubbleGeometry {
    /// Left margin as a fraction of box width.
    pub margin_frac: f32,
    /// Horizontal span correction applied to `width - 2 * margin`.
    pub shrink: f32,
    /// Bubble-center offset from the box top, in pixels.
    pub center_dy: f32,
    /// Bubble radius in pixels.
    pub radius: f32,
    /// Extra horizontal shift for the first rows of the sheet, which render
    /// with a different left margin than the rest.
    pub shifted_rows_dx: f32,
    /// Question numbers `1..=shifted_rows` receive the shift.
    pub shifted_rows: u32,
}

impl Default for BubbleGeometry {
    fn default() -> Self {
        Self {
            margin_frac: 0.15,
            shrink: 0.7,
            center_dy: 29.0,
            radius: 12.0,
            shifted_rows_dx: 8.0,
            shifted_rows: 9,
        }
    }
}

/// Project the four bubble centers of one question box.
///
/// Pure geometry: centers are equally spaced starting at `x + margin`,
/// spanning `(width - 2 * margin) * shrink`, at a fixed vertical offset from
/// the box top. No branching beyond the first-rows shift.
pub fn locate_bubbles(qbox: &QuestionBox, geom: &BubbleGeometry) -> BubbleSet {
    let margin = qbox.rect.width * geom.margin_frac;
    let span = (qbox.rect.width - 2.0 * margin) * geom.shrink;
    let step = span / 3.0;
    let dx = if (1..=geom.shifted_rows).contains(&qbox.number) {
        geom.shifted_rows_dx
    } else {
        0.0
    };
    let y = qbox.rect.y + geom.center_dy;

    let circles = std::array::from_fn(|i| BubbleCircle {
        center: Point2::new(qbox.rect.x + margin + dx + i as f32 * step, y),
        radius: geom.radius,
    });

    BubbleSet {
        question: qbox.number,
        circles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use omr_grader_core::BoxRect;

    fn qbox(number: u32) -> QuestionBox {
        QuestionBox {
            number,
            rect: BoxRect::new(100.0, 50.0, 200.0, 60.0),
            detected: true,
            source_index: Some(0),
        }
    }

    #[test]
    fn centers_are_evenly_spaced_over_the_shrunk_span() {
        let set = locate_bubbles(&qbox(20), &BubbleGeometry::default());
        // margin 30, span (200 - 60) * 0.7 = 98, step 98 / 3
        let step = 98.0 / 3.0;
        for (i, c) in set.circles.iter().enumerate() {
            assert_relative_eq!(c.center.x, 130.0 + step * i as f32, epsilon = 1e-4);
            assert_relative_eq!(c.center.y, 79.0);
            assert_relative_eq!(c.radius, 12.0);
        }
        let xs: Vec<f32> = set.circles.iter().map(|c| c.center.x).collect();
        assert!(xs.windows(2).all(|w| w[0] < w[1]), "left-to-right order");
    }

    #[test]
    fn first_rows_are_shifted_right() {
        let geom = BubbleGeometry::default();
        let plain = locate_bubbles(&qbox(10), &geom);
        let shifted = locate_bubbles(&qbox(9), &geom);
        for (a, b) in plain.circles.iter().zip(&shifted.circles) {
            assert_relative_eq!(b.center.x, a.center.x + geom.shifted_rows_dx);
            assert_relative_eq!(b.center.y, a.center.y);
        }
    }
}
