//! Comment store backed by a Supabase `comments` table.
//!
//! Talks to the PostgREST endpoint directly:
//!
//! | Call     | Request                                                     |
//! |----------|-------------------------------------------------------------|
//! | insert   | `POST /rest/v1/comments` with `Prefer: return=representation` |
//! | list     | `GET /rest/v1/comments?select=*&order=created_at.desc`      |
//!
//! Expected columns: `id` (`uuid` or `bigint` identity), `name`, `email`,
//! `message` (all `text`) and `created_at` (`timestamptz`, defaulting to
//! `now()`). `id` and `created_at` are filled in by the database.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, warn};

use super::CommentStore;
use crate::config::SupabaseConfig;
use crate::error::{CommentError, CommentResult};
use crate::models::{Comment, NewComment};

const TABLE: &str = "comments";

/// REST client for the managed comment table.
#[derive(Clone)]
pub struct SupabaseStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseStore {
    /// Create a store for a project URL and anon key
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &SupabaseConfig) -> Self {
        Self::new(&config.url, &config.anon_key)
    }

    fn endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, TABLE)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

/// Turn a non-2xx answer into a store error.
async fn check(response: Response) -> CommentResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    warn!(status = status.as_u16(), %message, "comment store rejected request");
    Err(CommentError::Store {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl CommentStore for SupabaseStore {
    async fn insert(&self, comment: NewComment) -> CommentResult<Comment> {
        debug!(endpoint = %self.endpoint(), "inserting comment");

        let request = self
            .client
            .post(self.endpoint())
            .header("Prefer", "return=representation")
            .json(&[comment]);
        let response = check(self.authorized(request).send().await?).await?;

        let mut rows: Vec<Comment> = response.json().await?;
        rows.pop()
            .ok_or_else(|| CommentError::UnexpectedResponse("insert returned no rows".into()))
    }

    async fn list(&self) -> CommentResult<Vec<Comment>> {
        let request = self
            .client
            .get(self.endpoint())
            .query(&[("select", "*"), ("order", "created_at.desc")]);
        let response = check(self.authorized(request).send().await?).await?;

        let comments: Vec<Comment> = response.json().await?;
        debug!(count = comments.len(), "loaded comments");
        Ok(comments)
    }
}
