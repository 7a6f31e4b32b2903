use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use omr_grader_core::GrayImageView;

use crate::types::{BubbleSet, LetterOrder};

/// Reading used for bubbles whose sampling patch fell outside the image.
const MAX_BRIGHTNESS: f32 = 255.0;

/// Settings for the darkness gate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionParams {
    /// Half-size of the square sampling patch; 6 samples a 12x12 px window.
    pub patch_half: i32,
    /// The darkest bubble must fall below `average * threshold_factor`.
    pub threshold_factor: f32,
    /// Minimum intensity gap between the darkest bubble and its runner-up.
    pub min_margin: f32,
    /// Absolute cutoff applied when only one bubble has a valid reading.
    pub single_abs_threshold: f32,
    /// Bubble-position-to-letter mapping direction.
    pub letter_order: LetterOrder,
}

impl Default for DecisionParams {
    fn default() -> Self {
        Self {
            patch_half: 6,
            threshold_factor: 0.85,
            min_margin: 15.0,
            single_abs_threshold: 150.0,
            letter_order: LetterOrder::default(),
        }
    }
}

/// Mean intensities of one question's four bubbles, in left-to-right bubble
/// order. `None` marks a patch that fell outside the image.
pub type BubbleReadings = [Option<f32>; 4];

/// Sample the mean grayscale intensity around each bubble center.
pub fn read_bubbles(
    image: &GrayImageView<'_>,
    set: &BubbleSet,
    patch_half: i32,
) -> BubbleReadings {
    std::array::from_fn(|i| {
        let c = set.circles[i].center;
        image.mean_patch(c.x.round() as i32, c.y.round() as i32, patch_half)
    })
}

/// Apply the darkness gate and return the 0-based marked bubble position.
///
/// The darkest bubble is accepted only when it is both well below the average
/// of all four readings and clearly separated from the runner-up; anything
/// short of that is "no answer", never a guess. With a single valid reading
/// the relative rule is meaningless and an absolute brightness cutoff applies
/// instead. Missing readings count as maximally bright. Ties break toward the
/// left-most bubble, which the stable sort gives for free.
pub fn pick_marked(readings: &BubbleReadings, params: &DecisionParams) -> Option<usize> {
    let valid: Vec<(usize, f32)> = readings
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|value| (i, value)))
        .collect();

    match valid.as_slice() {
        [] => None,
        [(position, value)] => (*value < params.single_abs_threshold).then_some(*position),
        _ => {
            let values: Vec<f32> = readings
                .iter()
                .map(|v| v.unwrap_or(MAX_BRIGHTNESS))
                .collect();
            let avg = values.iter().sum::<f32>() / values.len() as f32;

            let mut order: Vec<usize> = (0..values.len()).collect();
            order.sort_by(|&a, &b| {
                values[a]
                    .partial_cmp(&values[b])
                    .unwrap_or(Ordering::Equal)
            });
            let darkest = order[0];
            let runner_up = order[1];

            let below_average = values[darkest] < avg * params.threshold_factor;
            let separated = values[runner_up] - values[darkest] > params.min_margin;
            (below_average && separated).then_some(darkest)
        }
    }
}
