use std::time::Duration;

use async_trait::async_trait;
use eps_config::catalog::CatalogConfig;
use eps_core::error::CatalogError;
use eps_core::source::CatalogSource;
use eps_types::{CatalogPage, Cursor, Field, VocabularyEntry};
use serde::Deserialize;
use serde_json::json;

/// Upper bound on candidates fetched for search and autocomplete
const QUERY_LIMIT: usize = 50;

/// Vocabulary collection served by the Appwrite databases REST API
#[derive(Clone)]
pub struct AppwriteSource {
    client: reqwest::Client,
    documents_url: String,
    project_id: String,
    api_key: String,
    page_size: usize,
}

impl AppwriteSource {
    pub fn new(config: &CatalogConfig, request_timeout: Duration) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: reqwest::Client, config: &CatalogConfig) -> Self {
        Self {
            client,
            documents_url: config.documents_url(),
            project_id: config.project_id.clone(),
            api_key: config.api_key.clone(),
            page_size: config.page_size.max(1),
        }
    }

    /// List documents matching `queries`
    async fn list_documents(&self, queries: Vec<String>) -> Result<Vec<VocabularyEntry>, CatalogError> {
        let params: Vec<(&str, String)> = queries.into_iter().map(|q| ("queries[]", q)).collect();

        let mut request = self
            .client
            .get(&self.documents_url)
            .header("X-Appwrite-Project", &self.project_id)
            .query(&params);
        if !self.api_key.is_empty() {
            request = request.header("X-Appwrite-Key", &self.api_key);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(CatalogError::Server {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let list = parse_documents(&body)?;
        tracing::debug!(
            "Fetched {} documents ({} total)",
            list.documents.len(),
            list.total
        );
        Ok(list.documents)
    }
}

#[async_trait]
impl CatalogSource for AppwriteSource {
    async fn fetch_page(&self, cursor: Option<&Cursor>) -> Result<CatalogPage, CatalogError> {
        let mut queries = vec![limit(self.page_size)];
        if let Some(cursor) = cursor {
            queries.push(cursor_after(cursor));
        }

        let entries = self.list_documents(queries).await?;
        Ok(CatalogPage::from_entries(entries, self.page_size))
    }

    async fn query_substring(
        &self,
        text: &str,
        field: Field,
    ) -> Result<Vec<VocabularyEntry>, CatalogError> {
        self.list_documents(vec![search(field, text), limit(QUERY_LIMIT)])
            .await
    }

    async fn query_prefix(
        &self,
        text: &str,
        field: Field,
    ) -> Result<Vec<VocabularyEntry>, CatalogError> {
        self.list_documents(vec![starts_with(field, text), limit(QUERY_LIMIT)])
            .await
    }
}

#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    total: u64,
    documents: Vec<VocabularyEntry>,
}

fn limit(n: usize) -> String {
    json!({ "method": "limit", "values": [n] }).to_string()
}

fn cursor_after(cursor: &Cursor) -> String {
    json!({ "method": "cursorAfter", "values": [cursor.as_str()] }).to_string()
}

fn search(field: Field, text: &str) -> String {
    json!({ "method": "search", "attribute": field.as_str(), "values": [text] }).to_string()
}

fn starts_with(field: Field, text: &str) -> String {
    json!({ "method": "startsWith", "attribute": field.as_str(), "values": [text] }).to_string()
}

fn parse_documents(body: &str) -> Result<DocumentList, CatalogError> {
    serde_json::from_str(body).map_err(|e| CatalogError::Decode(e.to_string()))
}

/// Appwrite reports failures as `{ "message": .., "code": .. }`
fn error_message(body: &str) -> String {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());

    if message.is_empty() {
        "empty response".to_string()
    } else {
        message
    }
}

fn transport_error(e: reqwest::Error) -> CatalogError {
    if e.is_decode() {
        CatalogError::Decode(e.to_string())
    } else {
        CatalogError::Network(e.to_string())
    }
}
