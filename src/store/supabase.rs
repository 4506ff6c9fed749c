use super::{DirectoryStore, StoreError, StoreResult};
use crate::config::StoreConfig;
use crate::constants::{CATEGORIES_TABLE, HELPERS_TABLE, REST_PATH, SUPABASE_ANON_KEY_VAR};
use crate::error::Result;
use crate::types::{FilterPredicate, Helper, HelperDraft};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// PostgREST client for the Supabase project holding the `helpers` and
/// `categories` tables.
///
/// The project URL comes from `config.toml`; the anon key comes from the
/// SUPABASE_ANON_KEY environment variable so it never lands in the file.
pub struct SupabaseStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct CategoryRow {
    name: String,
}

impl SupabaseStore {
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        let api_key = std::env::var(SUPABASE_ANON_KEY_VAR)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}/{}", self.base_url, REST_PATH, table)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", self.api_key.as_str())
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    async fn rejection(response: reqwest::Response) -> StoreError {
        let status = response.status();
        let message = response.text().await.unwrap_or_default();
        if status == StatusCode::CONFLICT {
            StoreError::Conflict
        } else {
            StoreError::Rejected {
                status: status.as_u16(),
                message,
            }
        }
    }
}

/// Query-string pairs for the filtered helper listing. PostgREST spells the
/// substring filter as `or=(first_name.ilike.*term*,last_name.ilike.*term*)`
/// with `*` as the wildcard.
fn helpers_query(predicate: &FilterPredicate) -> Vec<(String, String)> {
    let mut query = vec![("select".to_string(), "*".to_string())];
    if let Some(category) = &predicate.category {
        query.push(("category".to_string(), format!("eq.{}", category)));
    }
    if let Some(term) = &predicate.search_term {
        query.push((
            "or".to_string(),
            format!("(first_name.ilike.*{}*,last_name.ilike.*{}*)", term, term),
        ));
    }
    query
}

#[async_trait]
impl DirectoryStore for SupabaseStore {
    async fn list_helpers(&self, predicate: &FilterPredicate) -> StoreResult<Vec<Helper>> {
        let response = self
            .authorize(self.client.get(self.table_url(HELPERS_TABLE)))
            .query(&helpers_query(predicate))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        Ok(response.json().await?)
    }

    async fn list_categories(&self) -> StoreResult<Vec<String>> {
        let response = self
            .authorize(self.client.get(self.table_url(CATEGORIES_TABLE)))
            .query(&[("select", "name")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        let rows: Vec<CategoryRow> = response.json().await?;
        Ok(rows.into_iter().map(|row| row.name).collect())
    }

    async fn insert_category(&self, name: &str) -> StoreResult<()> {
        let response = self
            .authorize(self.client.post(self.table_url(CATEGORIES_TABLE)))
            .header("Prefer", "return=minimal")
            .json(&json!({ "name": name }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        Ok(())
    }

    async fn insert_helper(&self, draft: &HelperDraft) -> StoreResult<Option<Helper>> {
        let response = self
            .authorize(self.client.post(self.table_url(HELPERS_TABLE)))
            .header("Prefer", "return=representation")
            .json(draft)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        // PostgREST echoes the inserted rows as a JSON array. An empty body
        // still counts as a successful insert.
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        let mut rows: Vec<Helper> = serde_json::from_str(&body)?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.remove(0))
        })
    }
}
