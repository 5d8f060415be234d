use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::keyword::{Keyword, NewKeyword};

/// Client for the persisted `keywords` collection.
///
/// Term uniqueness is an application-level check made through [`exists`];
/// the backing store is not required to enforce it.
///
/// [`exists`]: KeywordStore::exists
#[async_trait]
pub trait KeywordStore: Send + Sync {
    /// All keywords, newest `created_at` first.
    async fn list(&self) -> Result<Vec<Keyword>>;

    /// Whether a keyword with exactly this (lowercase) term is stored.
    async fn exists(&self, term: &str) -> Result<bool>;

    async fn insert(&self, keyword: &NewKeyword) -> Result<Keyword>;

    /// Delete by id. A missing id is not an error.
    async fn delete(&self, id: i64) -> Result<()>;
}

#[async_trait]
impl<S: KeywordStore + ?Sized> KeywordStore for Box<S> {
    async fn list(&self) -> Result<Vec<Keyword>> {
        (**self).list().await
    }

    async fn exists(&self, term: &str) -> Result<bool> {
        (**self).exists(term).await
    }

    async fn insert(&self, keyword: &NewKeyword) -> Result<Keyword> {
        (**self).insert(keyword).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        (**self).delete(id).await
    }
}

#[async_trait]
impl<S: KeywordStore + ?Sized> KeywordStore for Arc<S> {
    async fn list(&self) -> Result<Vec<Keyword>> {
        (**self).list().await
    }

    async fn exists(&self, term: &str) -> Result<bool> {
        (**self).exists(term).await
    }

    async fn insert(&self, keyword: &NewKeyword) -> Result<Keyword> {
        (**self).insert(keyword).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        (**self).delete(id).await
    }
}
