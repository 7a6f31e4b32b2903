use std::cmp::Ordering;
use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use omr_grader_core::{BoxRect, SheetTemplate};

use crate::columns::ColumnAssignment;
use crate::types::QuestionBox;

/// Geometry fallbacks used when detections are too sparse to measure.
///
/// The defaults describe the reference sheet: the detector reports boxes of
/// roughly 230x70 px with a 72 px vertical pitch.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructParams {
    /// Vertical box pitch used when a column has fewer than two detections.
    pub fallback_spacing: f32,
    /// Box size assumed when a column has no detections at all.
    pub nominal_width: f32,
    pub nominal_height: f32,
    /// Left/right margin of the nominal column layout.
    pub horizontal_margin: f32,
    /// Top edge of the first row in the nominal column layout.
    pub top_margin: f32,
}

impl Default for ReconstructParams {
    fn default() -> Self {
        Self {
            fallback_spacing: 72.0,
            nominal_width: 230.0,
            nominal_height: 70.0,
            horizontal_margin: 40.0,
            top_margin: 120.0,
        }
    }
}

/// Median vertical gap between consecutive detected boxes in one column.
fn column_spacing(assignment: &ColumnAssignment, column: usize, params: &ReconstructParams) -> f32 {
    let Some(col) = assignment.columns.get(column) else {
        return params.fallback_spacing;
    };
    if col.boxes.len() < 2 {
        return params.fallback_spacing;
    }

    let mut ys: Vec<f32> = col.boxes.iter().map(|(raw, _)| raw.rect.y).collect();
    ys.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mut gaps: Vec<f32> = ys.windows(2).map(|w| w[1] - w[0]).collect();
    gaps.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mid = gaps.len() / 2;
    if gaps.len() % 2 == 0 {
        (gaps[mid - 1] + gaps[mid]) * 0.5
    } else {
        gaps[mid]
    }
}

/// Extrapolation anchor for a column: its top-most detected box, or a nominal
/// column origin derived from the template and image width when the column
/// has no detections at all.
fn column_anchor(
    assignment: &ColumnAssignment,
    column: usize,
    template: &SheetTemplate,
    params: &ReconstructParams,
    image_width: f32,
) -> (u32, BoxRect) {
    if let Some((raw, number)) = assignment
        .columns
        .get(column)
        .and_then(|col| col.boxes.first())
    {
        return (*number, raw.rect);
    }

    let cols = template.columns();
    let span = (image_width - 2.0 * params.horizontal_margin - params.nominal_width).max(0.0);
    let step = if cols > 1 { span / (cols as f32 - 1.0) } else { 0.0 };
    // column 0 is the right-most printed column
    let x = params.horizontal_margin + span - column as f32 * step;
    (
        template.first_question(column),
        BoxRect::new(x, params.top_margin, params.nominal_width, params.nominal_height),
    )
}

/// Fill in a box for every expected question the detector missed.
///
/// Columns are processed independently and missing numbers in ascending
/// order, so earlier reconstructions can anchor later ones. Placement falls
/// through three tiers:
///
/// 1. directly below the previous question's box (same column, known either
///    from detection or an earlier reconstruction), offset by the column's
///    median spacing;
/// 2. directly above the next question's detected box;
/// 3. extrapolated from the column's anchor by `spacing x distance`.
///
/// The returned set is always total: exactly one [`QuestionBox`] per number
/// `1..=N`, `detected` true iff the box originated from the detector. Zero
/// detections degrade to a fully reconstructed nominal sheet, never an error.
pub fn complete_boxes(
    assignment: &ColumnAssignment,
    template: &SheetTemplate,
    params: &ReconstructParams,
    image_width: f32,
) -> Vec<QuestionBox> {
    let mut known: BTreeMap<u32, BoxRect> = BTreeMap::new();
    let mut sources: BTreeMap<u32, usize> = BTreeMap::new();
    for col in &assignment.columns {
        for &(raw, number) in &col.boxes {
            known.insert(number, raw.rect);
            sources.insert(number, raw.index);
        }
    }

    let mut reconstructed = 0usize;
    for column in 0..template.columns() {
        let spacing = column_spacing(assignment, column, params);
        let (anchor_number, anchor_rect) =
            column_anchor(assignment, column, template, params, image_width);
        let range = template.column_questions(column);

        for q in range.clone() {
            if known.contains_key(&q) {
                continue;
            }
            // Neighbors only count within the same printed column; the
            // numbering wraps between columns but the geometry does not.
            let prev = (q > range.start).then(|| known.get(&(q - 1))).flatten();
            let rect = if let Some(prev) = prev {
                BoxRect::new(prev.x, prev.y + spacing, prev.width, prev.height)
            } else if let Some(next) = (q + 1 < range.end)
                .then(|| known.get(&(q + 1)))
                .flatten()
            {
                BoxRect::new(next.x, next.y - spacing, next.width, next.height)
            } else {
                let steps = q as f32 - anchor_number as f32;
                BoxRect::new(
                    anchor_rect.x,
                    anchor_rect.y + steps * spacing,
                    anchor_rect.width,
                    anchor_rect.height,
                )
            };
            known.insert(q, rect);
            reconstructed += 1;
        }
    }

    if reconstructed > 0 {
        debug!(
            "reconstructed {reconstructed} of {} question boxes",
            template.questions
        );
    }

    (1..=template.questions)
        .map(|q| QuestionBox {
            number: q,
            rect: known[&q],
            detected: sources.contains_key(&q),
            source_index: sources.get(&q).copied(),
        })
        .collect()
}
