use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use harbor_core::{Category, Error, Keyword, KeywordStore, NewKeyword, Result};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

/// Keyword store backed by a hosted PostgREST-style data service.
///
/// Every request carries the access key both as `apikey` and as a bearer token.
pub struct RestKeywordStore {
    client: Client,
    base_url: String,
    api_key: String,
    table: String,
}

#[derive(Debug, Deserialize)]
struct KeywordRow {
    id: i64,
    term: String,
    category: String,
    created_at: String,
}

impl RestKeywordStore {
    pub fn new(base_url: &str, api_key: String, timeout: Duration) -> Result<Self> {
        info!("Creating RestKeywordStore");
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::unavailable)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            table: "keywords".to_string(),
        })
    }

    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.client
            .request(method, self.table_url())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn list_request(&self) -> RequestBuilder {
        self.request(Method::GET)
            .query(&[("select", "*"), ("order", "created_at.desc,id.desc")])
    }

    fn exists_request(&self, term: &str) -> RequestBuilder {
        self.request(Method::GET).query(&[
            ("select", "id".to_string()),
            ("term", format!("eq.{term}")),
            ("limit", "1".to_string()),
        ])
    }

    fn insert_request(&self, keyword: &NewKeyword) -> RequestBuilder {
        self.request(Method::POST)
            .header("Prefer", "return=representation")
            .json(&json!([{
                "term": keyword.term,
                "category": keyword.category.as_str(),
            }]))
    }

    fn delete_request(&self, id: i64) -> RequestBuilder {
        self.request(Method::DELETE).query(&[("id", format!("eq.{id}"))])
    }

    async fn send(request: RequestBuilder) -> Result<Response> {
        request.send().await.map_err(Error::unavailable)
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(Error::StoreUnavailable(format!("{status}: {body}")))
    }
}

fn row_to_keyword(row: KeywordRow) -> Result<Keyword> {
    Ok(Keyword {
        id: row.id,
        term: row.term,
        category: Category::from_stored(&row.category),
        created_at: parse_timestamp(&row.created_at)?,
    })
}

/// Parse a timestamp column, with or without a UTC offset.
///
/// Offset-less values (plain `timestamp` columns) are taken as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| Error::StoreUnavailable(format!("invalid timestamp {value:?}: {e}")))
}

#[async_trait]
impl KeywordStore for RestKeywordStore {
    async fn list(&self) -> Result<Vec<Keyword>> {
        let response = Self::check_status(Self::send(self.list_request()).await?).await?;
        let rows = response
            .json::<Vec<KeywordRow>>()
            .await
            .map_err(Error::unavailable)?;

        debug!("Fetched {} keyword rows", rows.len());
        rows.into_iter().map(row_to_keyword).collect()
    }

    async fn exists(&self, term: &str) -> Result<bool> {
        let response = Self::check_status(Self::send(self.exists_request(term)).await?).await?;
        let rows = response
            .json::<Vec<serde_json::Value>>()
            .await
            .map_err(Error::unavailable)?;

        Ok(!rows.is_empty())
    }

    async fn insert(&self, keyword: &NewKeyword) -> Result<Keyword> {
        let response = Self::send(self.insert_request(keyword)).await?;
        if response.status() == StatusCode::CONFLICT {
            return Err(Error::DuplicateTerm(keyword.term.clone()));
        }
        let response = Self::check_status(response).await?;
        let row = response
            .json::<Vec<KeywordRow>>()
            .await
            .map_err(Error::unavailable)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::StoreUnavailable("insert returned no row".to_string()))?;

        debug!("Inserted keyword {} with id {}", row.term, row.id);
        row_to_keyword(row)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        Self::check_status(Self::send(self.delete_request(id)).await?).await?;
        debug!("Deleted keyword {id}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn store() -> RestKeywordStore {
        RestKeywordStore::new(
            "https://example.supabase.co/",
            "anon-key".to_string(),
            Duration::from_secs(5),
        )
        .expect("client should build")
    }

    fn query(request: &reqwest::Request) -> HashMap<String, String> {
        request.url().query_pairs().into_owned().collect()
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_list_request_orders_newest_first() {
        let request = store().list_request().build().expect("request should build");

        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.url().path(), "/rest/v1/keywords");
        let query = query(&request);
        assert_eq!(query["select"], "*");
        assert_eq!(query["order"], "created_at.desc,id.desc");
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_requests_carry_credentials() {
        let request = store().list_request().build().expect("request should build");

        assert_eq!(request.headers()["apikey"], "anon-key");
        assert_eq!(request.headers()["authorization"], "Bearer anon-key");
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_exists_request_filters_on_term() {
        let request = store()
            .exists_request("bill of lading")
            .build()
            .expect("request should build");

        let query = query(&request);
        assert_eq!(query["term"], "eq.bill of lading");
        assert_eq!(query["select"], "id");
        assert_eq!(query["limit"], "1");
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_insert_request_asks_for_representation() {
        let keyword = NewKeyword::new("Manifest", Category::Documentation);
        let request = store()
            .insert_request(&keyword)
            .build()
            .expect("request should build");

        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.headers()["prefer"], "return=representation");
        let body = request
            .body()
            .and_then(reqwest::Body::as_bytes)
            .expect("body should be buffered");
        let value: serde_json::Value = serde_json::from_slice(body).expect("body should be JSON");
        assert_eq!(
            value,
            json!([{ "term": "manifest", "category": "documentation" }])
        );
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_delete_request_targets_id() {
        let request = store().delete_request(17).build().expect("request should build");

        assert_eq!(request.method(), Method::DELETE);
        assert_eq!(query(&request)["id"], "eq.17");
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_custom_table_name() {
        let request = store()
            .with_table("maritime_terms")
            .list_request()
            .build()
            .expect("request should build");

        assert_eq!(request.url().path(), "/rest/v1/maritime_terms");
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_rows_convert_to_keywords() {
        let rows: Vec<KeywordRow> = serde_json::from_str(
            r#"[
                {"id": 2, "term": "quay", "category": "port", "created_at": "2024-03-01T10:00:00.123456+00:00"},
                {"id": 1, "term": "fog", "category": "weather", "created_at": "2024-03-01T09:00:00"}
            ]"#,
        )
        .expect("rows should deserialize");

        let keywords: Vec<Keyword> = rows
            .into_iter()
            .map(row_to_keyword)
            .collect::<Result<_>>()
            .expect("rows should convert");

        assert_eq!(keywords[0].category, Category::Port);
        assert_eq!(keywords[1].category, Category::Other);
        assert!(keywords[0].created_at > keywords[1].created_at);
    }

    #[test]
    fn test_parse_timestamp_variants() {
        assert!(parse_timestamp("2024-03-01T10:00:00Z").is_ok());
        assert!(parse_timestamp("2024-03-01T10:00:00.5+02:00").is_ok());
        assert!(parse_timestamp("2024-03-01T10:00:00.123").is_ok());
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(Error::StoreUnavailable(_))
        ));
    }
}
