//! Keyword records and categories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

use crate::error::Error;

/// Label partitioning keywords for filtering and display.
///
/// The first five variants are produced by the pattern extractor; `Other` is
/// only accepted from manual entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Vessel,
    Port,
    Cargo,
    Documentation,
    Safety,
    Other,
}

impl Category {
    /// Categories the pattern table may declare, in display order.
    pub const EXTRACTABLE: [Self; 5] = [
        Self::Vessel,
        Self::Port,
        Self::Cargo,
        Self::Documentation,
        Self::Safety,
    ];

    pub const ALL: [Self; 6] = [
        Self::Vessel,
        Self::Port,
        Self::Cargo,
        Self::Documentation,
        Self::Safety,
        Self::Other,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Vessel => "vessel",
            Self::Port => "port",
            Self::Cargo => "cargo",
            Self::Documentation => "documentation",
            Self::Safety => "safety",
            Self::Other => "other",
        }
    }

    /// Human-readable label shown next to the category picker.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Vessel => "Vessel Related",
            Self::Port => "Port Operations",
            Self::Cargo => "Cargo Handling",
            Self::Documentation => "Documentation",
            Self::Safety => "Safety & Security",
            Self::Other => "Other",
        }
    }

    #[must_use]
    pub const fn is_extractable(&self) -> bool {
        !matches!(self, Self::Other)
    }

    /// Parse a category read back from the store.
    ///
    /// Rows written by other clients may carry labels outside the enumeration;
    /// those are folded into `Other` instead of failing the whole listing.
    #[must_use]
    pub fn from_stored(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| {
            warn!("Unknown stored category {s:?}, treating as other");
            Self::Other
        })
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vessel" => Ok(Self::Vessel),
            "port" => Ok(Self::Port),
            "cargo" => Ok(Self::Cargo),
            "documentation" => Ok(Self::Documentation),
            "safety" => Ok(Self::Safety),
            "other" => Ok(Self::Other),
            _ => Err(Error::Validation(format!("unknown category: {s}"))),
        }
    }
}

/// A stored keyword. Immutable once created; only deletion is exposed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Keyword {
    pub id: i64,
    pub term: String,
    pub category: Category,
    pub created_at: DateTime<Utc>,
}

/// Insert payload. `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewKeyword {
    pub term: String,
    pub category: Category,
}

impl NewKeyword {
    /// Build an insert payload, normalizing the term to lowercase.
    #[must_use]
    pub fn new(term: &str, category: Category) -> Self {
        Self {
            term: normalize_term(term),
            category,
        }
    }
}

/// Case-fold a term the way it is stored.
#[must_use]
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Listing order: newest `created_at` first, ties broken by higher id.
pub fn sort_newest_first(keywords: &mut [Keyword]) {
    keywords.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
