//! Core data model: documents, ranges and mappings.
//!
//! Everything here is created fresh for one diff computation and is
//! immutable once built. Line numbers and columns are 0-based and all ranges
//! are half-open.

mod document;
mod mapping;
mod range;

pub use document::{Document, Line, Side};
pub use mapping::{LineRangeMapping, MovedText, RangeMapping};
pub use range::{LineRange, OffsetRange, Position, TextRange};
