//! Keyword desk: the add / delete / analyze workflows over a [`KeywordStore`].
//!
//! The desk owns the display state a front end renders: the last listing, a
//! loading flag, the current error message and the last analysis result.
//! Every workflow takes `&mut self`, so one desk never runs two actions at
//! once.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::extraction::{ExtractedKeywords, Extractor, MatchMode, PatternTable};
use crate::keyword::{Category, Keyword, NewKeyword, sort_newest_first};
use crate::store::KeywordStore;

const LOAD_FAILED: &str = "Failed to load keywords.";
const ADD_FAILED: &str = "Failed to add keyword. Please try again.";
const DELETE_FAILED: &str = "Failed to delete keyword.";
const ANALYZE_FAILED: &str = "Failed to analyze text. Please try again.";

/// Whether the bulk path checks for an existing term before inserting.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Insert every extracted term; repeated analyses create repeated rows.
    #[default]
    Allow,
    /// Run the same existence check as the manual path and skip known terms.
    SkipExisting,
}

/// How the displayed list is brought up to date after a mutation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Re-list the whole collection.
    #[default]
    Relist,
    /// Apply the change to the local list, re-listing only when that is not possible.
    Local,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeskConfig {
    #[serde(default)]
    pub match_mode: MatchMode,
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
    #[serde(default)]
    pub sync_mode: SyncMode,
}

/// Result of one insert inside a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    Inserted(Keyword),
    /// Term already stored; nothing written.
    Skipped,
    Failed(String),
}

impl BatchOutcome {
    #[must_use]
    pub const fn keyword(&self) -> Option<&Keyword> {
        match self {
            Self::Inserted(keyword) => Some(keyword),
            Self::Skipped | Self::Failed(_) => None,
        }
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub category: Category,
    pub term: String,
    pub outcome: BatchOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisReport {
    pub found: ExtractedKeywords,
    pub items: Vec<BatchItem>,
}

impl AnalysisReport {
    #[must_use]
    pub fn inserted(&self) -> usize {
        self.count(|o| matches!(o, BatchOutcome::Inserted(_)))
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, BatchOutcome::Skipped))
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(BatchOutcome::is_failed)
    }

    fn count(&self, pred: impl Fn(&BatchOutcome) -> bool) -> usize {
        self.items.iter().filter(|item| pred(&item.outcome)).count()
    }
}

enum LocalChange {
    Inserted(Vec<Keyword>),
    Deleted(i64),
    /// The store may hold writes the desk did not observe.
    Unknown,
}

pub struct KeywordDesk<S> {
    store: S,
    extractor: Extractor,
    config: DeskConfig,
    keywords: Vec<Keyword>,
    found: ExtractedKeywords,
    loading: bool,
    error: Option<String>,
}

impl<S: KeywordStore> KeywordDesk<S> {
    /// Create a desk. Nothing is listed until [`refresh`](Self::refresh).
    pub fn new(store: S, table: Arc<PatternTable>, config: DeskConfig) -> Self {
        info!(
            "Creating KeywordDesk: match_mode={:?}, duplicate_policy={:?}, sync_mode={:?}",
            config.match_mode, config.duplicate_policy, config.sync_mode
        );
        Self {
            store,
            extractor: Extractor::new(table, config.match_mode),
            config,
            keywords: Vec::new(),
            found: ExtractedKeywords::default(),
            loading: true,
            error: None,
        }
    }

    #[must_use]
    pub fn keywords(&self) -> &[Keyword] {
        &self.keywords
    }

    /// Terms found by the last [`analyze`](Self::analyze).
    #[must_use]
    pub const fn found(&self) -> &ExtractedKeywords {
        &self.found
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// User-facing message for the last failed action, cleared when a new action starts.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn config(&self) -> &DeskConfig {
        &self.config
    }

    /// Re-list the collection.
    ///
    /// On failure the previous list is kept and the error message is set.
    /// The loading flag clears either way.
    pub async fn refresh(&mut self) -> Result<&[Keyword]> {
        let result = self.store.list().await;
        self.loading = false;
        match result {
            Ok(keywords) => {
                debug!("Listed {} keywords", keywords.len());
                self.keywords = keywords;
                Ok(&self.keywords)
            }
            Err(e) => {
                error!("Error fetching keywords: {e}");
                self.error = Some(LOAD_FAILED.to_string());
                Err(e)
            }
        }
    }

    /// Manual add: rejects blank and already-stored terms before inserting.
    pub async fn add_keyword(&mut self, term: &str, category: Category) -> Result<Keyword> {
        self.error = None;

        let new = NewKeyword::new(term, category);
        if new.term.is_empty() {
            let err = Error::Validation("keyword term is required".to_string());
            self.error = Some(err.to_string());
            return Err(err);
        }

        match self.store.exists(&new.term).await {
            Ok(false) => {}
            Ok(true) => {
                let err = Error::DuplicateTerm(term.trim().to_string());
                warn!("Rejected duplicate keyword: {}", new.term);
                self.error = Some(err.to_string());
                return Err(err);
            }
            Err(e) => {
                error!("Error adding keyword: {e}");
                self.error = Some(ADD_FAILED.to_string());
                return Err(e);
            }
        }

        let keyword = match self.store.insert(&new).await {
            Ok(keyword) => keyword,
            Err(Error::DuplicateTerm(_)) => {
                let err = Error::DuplicateTerm(term.trim().to_string());
                warn!("Store rejected duplicate keyword: {}", new.term);
                self.error = Some(err.to_string());
                return Err(err);
            }
            Err(e) => {
                error!("Error adding keyword: {e}");
                self.error = Some(ADD_FAILED.to_string());
                return Err(e);
            }
        };

        info!("Added keyword {} ({})", keyword.term, keyword.category);
        self.sync(LocalChange::Inserted(vec![keyword.clone()])).await;
        Ok(keyword)
    }

    pub async fn delete_keyword(&mut self, id: i64) -> Result<()> {
        self.error = None;

        if let Err(e) = self.store.delete(id).await {
            error!("Error deleting keyword: {e}");
            self.error = Some(DELETE_FAILED.to_string());
            return Err(e);
        }

        info!("Deleted keyword {id}");
        self.sync(LocalChange::Deleted(id)).await;
        Ok(())
    }

    /// Extract terms from `text` and store every one of them.
    ///
    /// Per-term failures are reported in the returned items and do not stop
    /// the remaining inserts.
    pub async fn analyze(&mut self, text: &str) -> AnalysisReport {
        self.error = None;

        let found = self.extractor.extract(text);
        info!(
            "Extracted {} terms in {} categories",
            found.term_count(),
            found.categories().count()
        );
        self.found = found.clone();

        let items = self.insert_batch(found.pairs()).await;
        let report = AnalysisReport { found, items };
        if report.failed() > 0 {
            warn!("{} of {} inserts failed", report.failed(), report.items.len());
            self.error = Some(ANALYZE_FAILED.to_string());
        }
        report
    }

    /// Insert terms one at a time, in order, then bring the list up to date.
    pub async fn insert_batch<I>(&mut self, pairs: I) -> Vec<BatchItem>
    where
        I: IntoIterator<Item = (Category, String)>,
    {
        let mut items = Vec::new();
        for (category, term) in pairs {
            let new = NewKeyword::new(&term, category);
            let outcome = self.insert_one(&new).await;
            items.push(BatchItem {
                category,
                term: new.term,
                outcome,
            });
        }

        let change = if items.iter().any(|item| item.outcome.is_failed()) {
            LocalChange::Unknown
        } else {
            LocalChange::Inserted(
                items
                    .iter()
                    .filter_map(|item| item.outcome.keyword().cloned())
                    .collect(),
            )
        };
        self.sync(change).await;
        items
    }

    async fn insert_one(&self, new: &NewKeyword) -> BatchOutcome {
        if new.term.is_empty() {
            return BatchOutcome::Failed("keyword term is required".to_string());
        }

        if self.config.duplicate_policy == DuplicatePolicy::SkipExisting {
            match self.store.exists(&new.term).await {
                Ok(false) => {}
                Ok(true) => {
                    debug!("Skipping existing keyword {}", new.term);
                    return BatchOutcome::Skipped;
                }
                Err(e) => {
                    warn!("Existence check for {} failed: {e}", new.term);
                    return BatchOutcome::Failed(e.to_string());
                }
            }
        }

        match self.store.insert(new).await {
            Ok(keyword) => BatchOutcome::Inserted(keyword),
            Err(Error::DuplicateTerm(_)) => BatchOutcome::Skipped,
            Err(e) => {
                warn!("Insert of {} failed: {e}", new.term);
                BatchOutcome::Failed(e.to_string())
            }
        }
    }

    async fn sync(&mut self, change: LocalChange) {
        if self.config.sync_mode == SyncMode::Local && self.apply_local(change) {
            return;
        }
        if self.refresh().await.is_err() {
            debug!("Keeping stale keyword list after failed refresh");
        }
    }

    fn apply_local(&mut self, change: LocalChange) -> bool {
        match change {
            LocalChange::Inserted(keywords) => {
                self.keywords.extend(keywords);
                sort_newest_first(&mut self.keywords);
                true
            }
            LocalChange::Deleted(id) => {
                self.keywords.retain(|k| k.id != id);
                true
            }
            LocalChange::Unknown => false,
        }
    }
}
