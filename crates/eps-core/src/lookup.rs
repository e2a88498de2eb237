use std::sync::Arc;

use eps_translator::{Language, Translator, TranslateError};
use eps_types::{Field, VocabularyEntry};

use crate::error::SearchError;
use crate::language::translation_direction;
use crate::preprocess::{DefaultPreprocessor, Preprocessor, fold};
use crate::source::CatalogSource;

#[derive(Debug, Clone, PartialEq)]
pub enum LookupOrigin {
    Catalog,
    /// Synthesized from a machine translation, not part of the catalog
    Translation { provider: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LookupResult {
    pub entries: Vec<VocabularyEntry>,
    pub origin: LookupOrigin,
}

impl LookupResult {
    fn empty() -> Self {
        Self {
            entries: Vec::new(),
            origin: LookupOrigin::Catalog,
        }
    }
}

/// Explicit search: remote catalog first, translation when it has nothing
pub struct Lookup {
    source: Arc<dyn CatalogSource>,
    translator: Option<Arc<dyn Translator>>,
}

impl Lookup {
    pub fn new(source: Arc<dyn CatalogSource>, translator: Option<Arc<dyn Translator>>) -> Self {
        Self { source, translator }
    }

    pub async fn search(&self, query: &str, field: Field) -> Result<LookupResult, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(LookupResult::empty());
        }

        let candidates = self.source.query_substring(query, field).await?;

        let needle = DefaultPreprocessor.process(query);
        let entries: Vec<_> = candidates
            .into_iter()
            .filter(|e| fold(e.field(field)).contains(&needle))
            .collect();

        if !entries.is_empty() {
            tracing::debug!("Lookup '{}' found {} catalog entries", query, entries.len());
            return Ok(LookupResult {
                entries,
                origin: LookupOrigin::Catalog,
            });
        }

        tracing::info!("No catalog match for '{}', falling back to translation", query);
        self.translate(query).await
    }

    /// Translate `query` into the other catalog language and wrap the pair
    /// as a single ad-hoc entry
    pub async fn translate(&self, query: &str) -> Result<LookupResult, SearchError> {
        let (from, to) = translation_direction(query)?;

        let translator = self
            .translator
            .as_ref()
            .ok_or(TranslateError::NotConfigured)?;
        let translation = translator.translate(query, from, to).await?;

        let entry = match from {
            Language::Bangla => VocabularyEntry::new(query, translation.text),
            Language::Korean => VocabularyEntry::new(translation.text, query),
        };

        Ok(LookupResult {
            entries: vec![entry],
            origin: LookupOrigin::Translation {
                provider: translation.provider,
            },
        })
    }
}
