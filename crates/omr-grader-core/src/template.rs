use std::ops::Range;

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum TemplateError {
    #[error("template needs at least one column")]
    NoColumns,
    #[error("column counts sum to {sum}, expected {questions} questions")]
    CountMismatch { sum: u32, questions: u32 },
}

/// Fixed layout of one printed answer sheet.
///
/// Columns are indexed right to left: column 0 is the right-most printed
/// column and holds question 1. The per-column counts together with that
/// ordering fully define the numbering before any box is assigned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetTemplate {
    /// Total number of questions on the sheet.
    pub questions: u32,
    /// Questions per column, right-most column first.
    pub column_counts: Vec<u32>,
}

impl Default for SheetTemplate {
    /// The reference sheet: 55 questions over 4 columns.
    fn default() -> Self {
        Self {
            questions: 55,
            column_counts: vec![15, 15, 15, 10],
        }
    }
}

impl SheetTemplate {
    /// Answer bubbles per question, lettered A-D.
    pub const BUBBLES_PER_QUESTION: usize = 4;

    /// Validated constructor: the counts must cover every question.
    pub fn new(questions: u32, column_counts: Vec<u32>) -> Result<Self, TemplateError> {
        if column_counts.is_empty() {
            return Err(TemplateError::NoColumns);
        }
        let sum: u32 = column_counts.iter().sum();
        if sum != questions {
            return Err(TemplateError::CountMismatch { sum, questions });
        }
        Ok(Self {
            questions,
            column_counts,
        })
    }

    /// Layout for `questions` spread as evenly as possible over `columns`,
    /// with the remainder going to the earliest (right-most) columns.
    pub fn evenly_divided(questions: u32, columns: u32) -> Result<Self, TemplateError> {
        if columns == 0 {
            return Err(TemplateError::NoColumns);
        }
        let base = questions / columns;
        let rem = questions % columns;
        let counts = (0..columns).map(|c| base + u32::from(c < rem)).collect();
        Self::new(questions, counts)
    }

    pub fn columns(&self) -> usize {
        self.column_counts.len()
    }

    /// Per-column box counts for an arbitrary detected total.
    ///
    /// When the total matches the template the fixed counts apply; otherwise
    /// the total is divided as evenly as possible, remainder first. This is
    /// the documented deterministic policy for non-canonical box counts.
    pub fn counts_for_total(&self, total: usize) -> Vec<usize> {
        if total == self.questions as usize {
            return self.column_counts.iter().map(|&c| c as usize).collect();
        }
        let cols = self.columns();
        let base = total / cols;
        let rem = total % cols;
        (0..cols).map(|c| base + usize::from(c < rem)).collect()
    }

    /// First question number of the given column (1-based numbers).
    pub fn first_question(&self, column: usize) -> u32 {
        1 + self.column_counts[..column].iter().sum::<u32>()
    }

    /// Question numbers expected in the given column.
    pub fn column_questions(&self, column: usize) -> Range<u32> {
        let first = self.first_question(column);
        first..first + self.column_counts[column]
    }
}
