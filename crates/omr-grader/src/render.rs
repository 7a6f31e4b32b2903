//! Review-image rendering.

use std::collections::BTreeMap;

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut};

use crate::types::{BubbleSet, QuestionBox};

/// Chosen bubble fill.
const MARK_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
/// Outline of the unchosen bubbles.
const BUBBLE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
/// Flag drawn across boxes the detector missed, for human review.
const RECONSTRUCTED_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Draw the grading overlay onto `canvas`.
///
/// For every checked question the chosen bubble is filled and the other three
/// outlined; reconstructed boxes additionally get a diagonal line so a human
/// reviewer can spot answers whose geometry was inferred rather than
/// detected. Questions beyond `check_n` are left untouched.
pub fn annotate(
    canvas: &mut RgbImage,
    boxes: &[QuestionBox],
    sets: &[BubbleSet],
    marked: &BTreeMap<u32, usize>,
    check_n: u32,
) {
    for set in sets.iter().filter(|s| s.question <= check_n) {
        let chosen = marked.get(&set.question).copied();
        for (i, circle) in set.circles.iter().enumerate() {
            let center = (
                circle.center.x.round() as i32,
                circle.center.y.round() as i32,
            );
            let radius = circle.radius.round() as i32;
            if chosen == Some(i) {
                draw_filled_circle_mut(canvas, center, radius, MARK_COLOR);
            } else {
                // two passes for a 2 px outline
                draw_hollow_circle_mut(canvas, center, radius, BUBBLE_COLOR);
                draw_hollow_circle_mut(canvas, center, radius + 1, BUBBLE_COLOR);
            }
        }
    }

    for qbox in boxes
        .iter()
        .filter(|b| !b.detected && b.number <= check_n)
    {
        let r = qbox.rect;
        draw_line_segment_mut(
            canvas,
            (r.x, r.y),
            (r.x + r.width, r.y + r.height),
            RECONSTRUCTED_COLOR,
        );
    }
}
