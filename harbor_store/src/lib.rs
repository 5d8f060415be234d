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

//! `KeywordStore` backends.
//!
//! - [`RestKeywordStore`] talks to a hosted REST data service (PostgREST dialect).
//! - [`DatabaseKeywordStore`] talks SQL directly through sea-orm.

mod database;
mod rest;

pub use database::DatabaseKeywordStore;
pub use rest::{RestKeywordStore, parse_timestamp};
