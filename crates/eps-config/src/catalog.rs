use std::env;

use serde::{Deserialize, Serialize};

fn default_endpoint() -> String {
    "https://cloud.appwrite.io/v1".to_string()
}

fn default_page_size() -> usize {
    20
}

/// Remote vocabulary collection
#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CatalogConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    pub collection_id: String,
    /// Server key, left empty for public collections
    pub api_key: String,
    /// Documents requested per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            project_id: String::new(),
            database_id: String::new(),
            collection_id: String::new(),
            api_key: String::new(),
            page_size: default_page_size(),
        }
    }
}

impl CatalogConfig {
    pub fn new() -> Self {
        let page_size = env::var("CATALOG_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|size| *size > 0)
            .unwrap_or_else(default_page_size);

        Self {
            endpoint: env::var("APPWRITE_ENDPOINT").unwrap_or_else(|_| default_endpoint()),
            project_id: env::var("APPWRITE_PROJECT_ID").unwrap_or_default(),
            database_id: env::var("APPWRITE_DATABASE_ID").unwrap_or_default(),
            collection_id: env::var("APPWRITE_COLLECTION_ID").unwrap_or_default(),
            api_key: env::var("APPWRITE_API_KEY").unwrap_or_default(),
            page_size,
        }
    }

    pub fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.endpoint.trim_end_matches('/'),
            self.database_id,
            self.collection_id
        )
    }
}
