use std::fmt;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use omr_grader_core::BoxRect;

/// One rectangle reported by the external box detector.
///
/// `index` is the detector's original position in its output array. It is
/// opaque and carries no spatial meaning; ordering is imposed by the column
/// assigner, never assumed from the detector.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawBox {
    pub rect: BoxRect,
    pub index: usize,
}

/// One question's box after numbering and reconstruction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuestionBox {
    /// Question number, 1-based.
    pub number: u32,
    pub rect: BoxRect,
    /// True when the rect came from the detector, false when synthesized.
    pub detected: bool,
    /// Detector index, present only for detected boxes.
    pub source_index: Option<usize>,
}

/// One candidate answer circle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BubbleCircle {
    pub center: Point2<f32>,
    pub radius: f32,
}

/// The four bubbles of one question, ordered left to right in image space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BubbleSet {
    pub question: u32,
    pub circles: [BubbleCircle; 4],
}

/// Answer letter on the printed sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Letter {
    A,
    B,
    C,
    D,
}

impl Letter {
    pub const ALL: [Letter; 4] = [Letter::A, Letter::B, Letter::C, Letter::D];

    pub fn as_str(self) -> &'static str {
        match self {
            Letter::A => "A",
            Letter::B => "B",
            Letter::C => "C",
            Letter::D => "D",
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction in which bubble positions map to letters.
///
/// The printed sheet revisions observed in production disagree on this: some
/// label the left-most bubble A, others D. It is therefore a single declared
/// configuration selected once, never inferred per call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LetterOrder {
    /// Left-most bubble is A.
    #[default]
    LeftToRight,
    /// Left-most bubble is D (legacy sheet revisions).
    RightToLeft,
}

impl LetterOrder {
    /// Letter for a 0-based bubble position counted left to right.
    pub fn letter(self, position: usize) -> Letter {
        debug_assert!(position < 4);
        let index = match self {
            LetterOrder::LeftToRight => position,
            LetterOrder::RightToLeft => 3 - position,
        };
        Letter::ALL[index]
    }
}
