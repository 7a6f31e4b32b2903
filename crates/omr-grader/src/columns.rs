use std::cmp::Ordering;

use log::debug;

use omr_grader_core::SheetTemplate;

use crate::types::RawBox;

/// Boxes of one printed column with their assigned question numbers, ordered
/// top to bottom.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColumnBoxes {
    pub boxes: Vec<(RawBox, u32)>,
}

/// Detector output grouped into printed columns, right-most column first.
///
/// There is always one entry per template column; with no detections every
/// column is simply empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColumnAssignment {
    pub columns: Vec<ColumnBoxes>,
}

impl ColumnAssignment {
    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(|c| c.boxes.is_empty())
    }

    /// Total number of assigned boxes.
    pub fn len(&self) -> usize {
        self.columns.iter().map(|c| c.boxes.len()).sum()
    }
}

fn by_center_x_desc(a: &RawBox, b: &RawBox) -> Ordering {
    b.rect
        .center_x()
        .partial_cmp(&a.rect.center_x())
        .unwrap_or(Ordering::Equal)
}

fn by_center_y_asc(a: &RawBox, b: &RawBox) -> Ordering {
    a.rect
        .center_y()
        .partial_cmp(&b.rect.center_y())
        .unwrap_or(Ordering::Equal)
}

/// Group detected boxes into the template's columns and number each box.
///
/// Boxes are sorted by horizontal center, right-most first, and split into
/// contiguous chunks of the per-column counts (the template's fixed counts
/// when the total matches, otherwise an even split with the remainder given
/// to the right-most columns). Each chunk is then sorted top to bottom and
/// numbered consecutively, continuing across columns so column `c + 1` starts
/// right after the last number of column `c`.
///
/// An empty box list yields an assignment with every column empty; it is not
/// an error.
pub fn assign_columns(boxes: &[RawBox], template: &SheetTemplate) -> ColumnAssignment {
    let mut sorted: Vec<RawBox> = boxes.to_vec();
    sorted.sort_by(by_center_x_desc);

    let counts = template.counts_for_total(sorted.len());
    debug!(
        "column assignment: {} boxes over {} columns ({counts:?})",
        sorted.len(),
        counts.len()
    );

    let mut columns = Vec::with_capacity(counts.len());
    let mut start = 0usize;
    let mut next_number = 1u32;
    for &count in &counts {
        let end = (start + count).min(sorted.len());
        let mut chunk: Vec<RawBox> = sorted[start..end].to_vec();
        start = end;
        chunk.sort_by(by_center_y_asc);

        let boxes = chunk
            .into_iter()
            .map(|raw| {
                let numbered = (raw, next_number);
                next_number += 1;
                numbered
            })
            .collect();
        columns.push(ColumnBoxes { boxes });
    }

    ColumnAssignment { columns }
}
