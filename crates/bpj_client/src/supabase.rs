use async_trait::async_trait;
use bpj_core::{Error, JournalPost, JournalSource, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use url::Url;

use crate::config::ApiConfig;

pub const TABLE: &str = "journal_posts";
pub const LIST_COLUMNS: &str = "id,title,description,summary,created_at,date";
pub const ARTICLE_COLUMNS: &str =
    "id,title,description,summary,content_lite,image_url,created_at,date";
pub const DEFAULT_LIMIT: usize = 12;

/// Client for the PostgREST endpoint that hosts the journal.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    client: Client,
    config: ApiConfig,
}

impl SupabaseClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", self.config.key())
            .header("Authorization", format!("Bearer {}", self.config.key()))
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(Error::Api {
            status: status.as_u16(),
            body,
        })
    }

    async fn get_rows(&self, url: Url) -> Result<Vec<Value>> {
        tracing::debug!("GET {}", url);
        let response = self.authorized(self.client.get(url)).send().await?;
        let body: Value = Self::check(response).await?.json().await?;
        Ok(match body {
            Value::Array(rows) => rows,
            _ => Vec::new(),
        })
    }

    fn posts_from_rows(rows: Vec<Value>) -> Vec<JournalPost> {
        rows.into_iter()
            .filter_map(|row| match serde_json::from_value::<JournalPost>(row) {
                Ok(post) => Some(post),
                Err(e) => {
                    tracing::warn!("Skipping malformed journal row: {}", e);
                    None
                }
            })
            .collect()
    }

    /// Latest posts, newest first.
    pub async fn fetch_posts(&self, limit: usize) -> Result<Vec<JournalPost>> {
        let mut url = self.config.rest_url(TABLE)?;
        url.query_pairs_mut()
            .append_pair("select", LIST_COLUMNS)
            .append_pair("order", "created_at.desc")
            .append_pair("limit", &limit.to_string());
        Ok(Self::posts_from_rows(self.get_rows(url).await?))
    }

    pub async fn fetch_post(&self, id: &str) -> Result<Option<JournalPost>> {
        let mut url = self.config.rest_url(TABLE)?;
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{}", id))
            .append_pair("select", ARTICLE_COLUMNS)
            .append_pair("limit", "1");
        Ok(Self::posts_from_rows(self.get_rows(url).await?).into_iter().next())
    }

    /// Column names of `table`, read from the OpenAPI description the
    /// endpoint serves at its root.
    pub async fn table_columns(&self, table: &str) -> Result<Vec<String>> {
        let url = self.config.rest_url("")?;
        let response = self
            .authorized(self.client.get(url))
            .header("Accept", "application/openapi+json")
            .send()
            .await?;
        let description: Value = Self::check(response).await?.json().await?;

        let definitions = description
            .get("definitions")
            .or_else(|| description.get("components").and_then(|c| c.get("schemas")));
        Ok(definitions
            .and_then(|d| d.get(table))
            .and_then(|t| t.get("properties"))
            .and_then(Value::as_object)
            .map(|props| props.keys().cloned().collect())
            .unwrap_or_default())
    }

    /// `id` and one text column of the latest rows.
    pub async fn fetch_text_rows(&self, column: &str, limit: usize) -> Result<Vec<Value>> {
        let mut url = self.config.rest_url(TABLE)?;
        url.query_pairs_mut()
            .append_pair("select", &format!("id,{}", column))
            .append_pair("order", "created_at.desc")
            .append_pair("limit", &limit.to_string());
        self.get_rows(url).await
    }

    pub async fn update_text(&self, id: &str, column: &str, text: &str) -> Result<()> {
        let mut url = self.config.rest_url(TABLE)?;
        url.query_pairs_mut().append_pair("id", &format!("eq.{}", id));
        let mut payload = serde_json::Map::new();
        payload.insert(column.to_string(), Value::String(text.to_string()));

        tracing::debug!("PATCH {}", url);
        let response = self
            .authorized(self.client.patch(url))
            .json(&payload)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[async_trait]
impl JournalSource for SupabaseClient {
    fn name(&self) -> &str {
        "supabase"
    }

    async fn latest_posts(&self, limit: usize) -> Result<Vec<JournalPost>> {
        self.fetch_posts(limit).await
    }

    async fn post_by_id(&self, id: &str) -> Result<Option<JournalPost>> {
        self.fetch_post(id).await
    }
}

/// Latest posts from the data API. Missing configuration and request failures
/// both give an empty list.
///
/// This is the hosted-only read path; [`Journal`](crate::Journal) is the one
/// that merges in the bundled posts.
pub async fn fetch_journal_posts(config: Option<&ApiConfig>, limit: usize) -> Vec<JournalPost> {
    let Some(config) = config else {
        return Vec::new();
    };
    let result = match SupabaseClient::new(config.clone()) {
        Ok(client) => client.fetch_posts(limit).await,
        Err(e) => Err(e),
    };
    result.unwrap_or_else(|e| {
        tracing::warn!("Journal fetch failed: {}", e);
        Vec::new()
    })
}

/// A single post from the data API, `None` on missing configuration or error.
/// Hosted-only, like [`fetch_journal_posts`].
pub async fn fetch_article(config: Option<&ApiConfig>, id: &str) -> Option<JournalPost> {
    let config = config?;
    let client = SupabaseClient::new(config.clone()).ok()?;
    client.fetch_post(id).await.unwrap_or_else(|e| {
        tracing::warn!("Article fetch failed for {}: {}", id, e);
        None
    })
}
