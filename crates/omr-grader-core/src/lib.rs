//! Core types and utilities for answer-sheet grading.
//!
//! This crate is intentionally small: pixel rectangles, the sheet layout
//! template, and grayscale patch sampling. It does *not* depend on any image
//! codec, drawing library, or on the external box detector.

mod image;
mod logger;
mod rect;
mod template;

pub use image::GrayImageView;
pub use rect::BoxRect;
pub use template::{SheetTemplate, TemplateError};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
