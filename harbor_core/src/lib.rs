#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

pub mod desk;
pub mod error;
pub mod extraction;
pub mod keyword;
pub mod store;

pub use desk::{
    AnalysisReport, BatchItem, BatchOutcome, DeskConfig, DuplicatePolicy, KeywordDesk, SyncMode,
};
pub use error::{Error, Result};
pub use extraction::{
    BuildError, ExtractedKeywords, Extractor, MatchMode, PatternDef, PatternTable,
    default_patterns,
};
pub use keyword::{Category, Keyword, NewKeyword, normalize_term, sort_newest_first};
pub use store::KeywordStore;
