use async_trait::async_trait;
use eps_types::{CatalogPage, Cursor, Field, VocabularyEntry};

use crate::error::CatalogError;

/// Remote vocabulary collection
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the page following `cursor`, or the first page when `None`
    async fn fetch_page(&self, cursor: Option<&Cursor>) -> Result<CatalogPage, CatalogError>;

    /// Best-effort server side search, callers re-filter the candidates
    async fn query_substring(
        &self,
        text: &str,
        field: Field,
    ) -> Result<Vec<VocabularyEntry>, CatalogError>;

    /// Candidates for autocomplete
    async fn query_prefix(
        &self,
        text: &str,
        field: Field,
    ) -> Result<Vec<VocabularyEntry>, CatalogError>;
}
