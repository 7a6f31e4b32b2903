//! Grading pipeline for scanned multiple-choice answer sheets.
//!
//! Input: one rectified sheet image plus the candidate answer-box rectangles
//! found by an external box detector. The pipeline runs five stages in order:
//!
//! 1. [`assign_columns`] groups the rectangles into the sheet's printed
//!    columns and numbers them (right-most column first, top to bottom).
//! 2. [`complete_boxes`] synthesizes a box for every question the detector
//!    missed, from neighboring geometry.
//! 3. [`locate_bubbles`] projects the four answer-bubble centers inside each
//!    box.
//! 4. The darkness gate ([`pick_marked`]) decides which bubble, if any, is
//!    confidently filled.
//! 5. [`annotate`] draws the review overlay and [`AnswerMap`] serializes the
//!    machine-readable result.
//!
//! [`SheetGrader`] wires the stages together for the common case. Every stage
//! degrades gracefully: zero detections still produce a complete answer map
//! and review image.

mod bubbles;
mod columns;
mod decide;
mod grader;
mod params;
mod reconstruct;
mod render;
mod report;
mod types;

pub use bubbles::{locate_bubbles, BubbleGeometry};
pub use columns::{assign_columns, ColumnAssignment, ColumnBoxes};
pub use decide::{pick_marked, read_bubbles, BubbleReadings, DecisionParams};
pub use grader::{GradeReport, SheetGrader};
pub use params::GraderParams;
pub use reconstruct::{complete_boxes, ReconstructParams};
pub use render::annotate;
pub use report::{load_answer_map, save_answer_map, AnswerMap, ReportError};
pub use types::{BubbleCircle, BubbleSet, Letter, LetterOrder, QuestionBox, RawBox};
