//! Instant substring search over the pages loaded so far.

use std::sync::Arc;
use std::time::Duration;

use eps_types::VocabularyEntry;
use tokio::sync::watch;

use crate::catalog::CatalogCache;
use crate::debounce::Debouncer;
use crate::preprocess::{DefaultPreprocessor, Preprocessor, fold};

/// Entries whose Bangla or Korean side contains `query`, case-insensitive.
/// An empty query matches nothing.
pub fn filter_entries(entries: &[VocabularyEntry], query: &str) -> Vec<VocabularyEntry> {
    let query = DefaultPreprocessor.process(query);
    if query.is_empty() {
        return Vec::new();
    }

    entries
        .iter()
        .filter(|e| fold(&e.bangla).contains(&query) || fold(&e.korean).contains(&query))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalResults {
    /// Folded query these results answer
    pub query: String,
    pub matches: Vec<VocabularyEntry>,
    /// How many loaded entries were searched
    pub searched: usize,
    /// The catalog has pages that were not searched
    pub more_available: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Idle,
    Found(usize),
    /// Nothing matched in the loaded pages; `more_available` tells whether
    /// unloaded pages might still hold a match
    NoMatchInLoaded { more_available: bool },
}

impl LocalResults {
    pub fn status(&self) -> SearchStatus {
        if self.query.is_empty() {
            SearchStatus::Idle
        } else if self.matches.is_empty() {
            SearchStatus::NoMatchInLoaded {
                more_available: self.more_available,
            }
        } else {
            SearchStatus::Found(self.matches.len())
        }
    }
}

/// Debounced local filter bound to one catalog
pub struct LocalSearch {
    catalog: Arc<CatalogCache>,
    query: String,
    debouncer: Debouncer,
    results_tx: watch::Sender<LocalResults>,
}

impl LocalSearch {
    pub fn new(catalog: Arc<CatalogCache>, delay: Duration) -> Self {
        let (results_tx, _) = watch::channel(LocalResults::default());
        Self {
            catalog,
            query: String::new(),
            debouncer: Debouncer::new(delay),
            results_tx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<LocalResults> {
        self.results_tx.subscribe()
    }

    pub fn results(&self) -> LocalResults {
        self.results_tx.borrow().clone()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Feed the raw search box value. Empty input clears results at once,
    /// anything else is evaluated after the debounce window.
    pub async fn set_query(&mut self, raw: &str) {
        self.query = DefaultPreprocessor.process(raw);

        if self.query.is_empty() {
            self.clear().await;
            return;
        }

        let catalog = Arc::clone(&self.catalog);
        let results_tx = self.results_tx.clone();
        let query = self.query.clone();

        self.debouncer.arm(move |ticket| async move {
            let results = evaluate(&catalog, &query).await;
            if ticket.is_current() {
                publish(&catalog, &results_tx, results).await;
            }
        });
    }

    pub async fn clear(&mut self) {
        self.query.clear();
        self.debouncer.cancel();
        publish(&self.catalog, &self.results_tx, LocalResults::default()).await;
    }

    /// Re-run the current query against the catalog right away, used when
    /// new pages arrive
    pub async fn refilter(&mut self) {
        if self.query.is_empty() {
            return;
        }
        // A pending timer would only repeat this evaluation
        self.debouncer.cancel();
        let results = evaluate(&self.catalog, &self.query).await;
        publish(&self.catalog, &self.results_tx, results).await;
    }

    /// Stop any pending evaluation, the view is going away
    pub fn cancel(&mut self) {
        self.debouncer.cancel();
    }
}

async fn evaluate(catalog: &CatalogCache, query: &str) -> LocalResults {
    catalog
        .with_state(|state| LocalResults {
            query: query.to_string(),
            matches: filter_entries(&state.entries, query),
            searched: state.entries.len(),
            more_available: state.has_more,
        })
        .await
}

async fn publish(
    catalog: &CatalogCache,
    results_tx: &watch::Sender<LocalResults>,
    results: LocalResults,
) {
    tracing::debug!(
        "Local search '{}': {} matches in {} entries",
        results.query,
        results.matches.len(),
        results.searched
    );
    // Results on screen replace the raw catalog, paging it would be wasted work
    catalog.set_search_active(!results.matches.is_empty()).await;
    results_tx.send_replace(results);
}
