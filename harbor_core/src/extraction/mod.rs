//! Pattern-based keyword extraction.
//!
//! A [`PatternTable`] is compiled once from [`PatternDef`]s and shared by
//! reference; the [`Extractor`] applies it to free text and returns the
//! distinct matched terms per category.

pub mod extractor;
pub mod patterns;

pub use extractor::{ExtractedKeywords, Extractor, MatchMode};
pub use patterns::{BuildError, PatternDef, PatternTable, default_patterns};
