use std::collections::BTreeMap;

use image::RgbImage;
use log::{debug, info};

use omr_grader_core::{GrayImageView, SheetTemplate};

use crate::bubbles::locate_bubbles;
use crate::columns::assign_columns;
use crate::decide::{pick_marked, read_bubbles};
use crate::params::GraderParams;
use crate::reconstruct::complete_boxes;
use crate::render;
use crate::report::AnswerMap;
use crate::types::{BubbleSet, QuestionBox, RawBox};

/// Everything one grading run produced, ready for serialization and review
/// rendering.
#[derive(Clone, Debug)]
pub struct GradeReport {
    /// Answer per checked question; `None` when no confident mark was found.
    pub answers: AnswerMap,
    /// Complete question-box set, detected and reconstructed.
    pub boxes: Vec<QuestionBox>,
    /// Bubble geometry per question.
    pub bubbles: Vec<BubbleSet>,
    /// Marked 0-based bubble position per question, for the renderer.
    pub marked: BTreeMap<u32, usize>,
    /// Effective check-first-N bound.
    pub checked: u32,
}

/// One-sheet grading pipeline.
///
/// Stateless between invocations: each call to [`SheetGrader::grade`]
/// processes one sheet independently, so instances can be shared across a
/// worker pool without coordination.
pub struct SheetGrader {
    template: SheetTemplate,
    params: GraderParams,
}

impl SheetGrader {
    pub fn new(template: SheetTemplate, params: GraderParams) -> Self {
        Self { template, params }
    }

    /// Grader for the reference sheet with default parameters.
    pub fn with_defaults() -> Self {
        Self::new(SheetTemplate::default(), GraderParams::default())
    }

    pub fn template(&self) -> &SheetTemplate {
        &self.template
    }

    pub fn params(&self) -> &GraderParams {
        &self.params
    }

    /// Run the full pipeline on one sheet.
    ///
    /// `raw` is the external detector's output, treated as an unordered set.
    /// Only questions `1..=check_n` are evaluated for answers; the rest get
    /// boxes and bubbles but no entry in the answer map. Never fails: zero or
    /// garbage detections degrade to a fully reconstructed sheet with every
    /// checked question unanswered.
    pub fn grade(&self, image: &GrayImageView<'_>, raw: &[RawBox], check_n: u32) -> GradeReport {
        let assignment = assign_columns(raw, &self.template);
        let boxes = complete_boxes(
            &assignment,
            &self.template,
            &self.params.reconstruct,
            image.width as f32,
        );
        let bubbles: Vec<BubbleSet> = boxes
            .iter()
            .map(|b| locate_bubbles(b, &self.params.bubble))
            .collect();

        let checked = check_n.min(self.template.questions);
        let mut answers = AnswerMap::default();
        let mut marked = BTreeMap::new();
        for set in bubbles.iter().filter(|s| s.question <= checked) {
            let readings = read_bubbles(image, set, self.params.decision.patch_half);
            let pick = pick_marked(&readings, &self.params.decision);
            if let Some(position) = pick {
                marked.insert(set.question, position);
                debug!("question {}: bubble {position} marked", set.question);
            }
            answers.insert(
                set.question,
                pick.map(|p| self.params.decision.letter_order.letter(p)),
            );
        }

        info!(
            "graded sheet: {} detected, {} reconstructed, {} of {checked} answered",
            raw.len(),
            boxes.iter().filter(|b| !b.detected).count(),
            marked.len()
        );

        GradeReport {
            answers,
            boxes,
            bubbles,
            marked,
            checked,
        }
    }

    /// Draw the review overlay for a finished report.
    ///
    /// The canvas is only written here, after all decisions are final.
    pub fn annotate(&self, canvas: &mut RgbImage, report: &GradeReport) {
        render::annotate(
            canvas,
            &report.boxes,
            &report.bubbles,
            &report.marked,
            report.checked,
        );
    }
}
