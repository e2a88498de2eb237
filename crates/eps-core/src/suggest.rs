//! Autocomplete suggestions while typing.
//!
//! Input re-arms a debounce timer. When it fires, the remote prefix query is
//! dispatched as its own task: later input never cancels it, but its
//! response is applied only if the input still equals the query it was
//! issued for (last query wins, not last response).

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use eps_types::{Field, VocabularyEntry};
use tokio::sync::watch;

use crate::debounce::Debouncer;
use crate::preprocess::fold;
use crate::source::CatalogSource;

pub const DEFAULT_MAX_SUGGESTIONS: usize = 5;

/// Current value of the input box
#[derive(Debug, Clone, PartialEq, Eq)]
struct SuggestionInput {
    field: Field,
    text: String,
    /// Set by picking a suggestion, so requests typed for the same text go stale
    picked: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Suggestions {
    /// Raw input the items were computed for
    pub query: String,
    pub items: Vec<VocabularyEntry>,
}

impl Suggestions {
    pub fn is_visible(&self) -> bool {
        !self.items.is_empty()
    }
}

/// Keep true completions of `query`, shortest first then most frequent,
/// at most `max` of them
pub fn rank_suggestions(
    candidates: Vec<VocabularyEntry>,
    query: &str,
    field: Field,
    max: usize,
) -> Vec<VocabularyEntry> {
    let prefix = fold(query);
    let mut seen = HashSet::new();

    let mut matches: Vec<VocabularyEntry> = candidates
        .into_iter()
        .filter(|e| fold(e.field(field)).starts_with(&prefix))
        .filter(|e| seen.insert(e.dedup_key()))
        .collect();

    matches.sort_by(|a, b| {
        let len_a = a.field(field).chars().count();
        let len_b = b.field(field).chars().count();
        len_a
            .cmp(&len_b)
            .then_with(|| compare_frequency(a.frequency, b.frequency))
    });
    matches.truncate(max);
    matches
}

/// Ascending, entries without a frequency last
fn compare_frequency(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub struct SuggestionEngine {
    source: Arc<dyn CatalogSource>,
    max_results: usize,
    debouncer: Debouncer,
    input_tx: watch::Sender<SuggestionInput>,
    results_tx: watch::Sender<Suggestions>,
    /// Value set by picking a suggestion; an identical echo of it is ignored
    suppress_next: Option<String>,
}

impl SuggestionEngine {
    pub fn new(source: Arc<dyn CatalogSource>, field: Field, delay: Duration) -> Self {
        let (input_tx, _) = watch::channel(SuggestionInput {
            field,
            text: String::new(),
            picked: false,
        });
        let (results_tx, _) = watch::channel(Suggestions::default());

        Self {
            source,
            max_results: DEFAULT_MAX_SUGGESTIONS,
            debouncer: Debouncer::new(delay),
            input_tx,
            results_tx,
            suppress_next: None,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<Suggestions> {
        self.results_tx.subscribe()
    }

    pub fn suggestions(&self) -> Suggestions {
        self.results_tx.borrow().clone()
    }

    pub fn input(&self) -> String {
        self.input_tx.borrow().text.clone()
    }

    pub fn field(&self) -> Field {
        self.input_tx.borrow().field
    }

    /// Switch the language being typed; anything shown or in flight is stale
    pub fn set_field(&mut self, field: Field) {
        if self.field() == field {
            return;
        }
        self.debouncer.cancel();
        self.suppress_next = None;
        self.input_tx.send_modify(|input| input.field = field);
        self.results_tx.send_replace(Suggestions::default());
    }

    /// Feed the raw input box value
    pub fn set_input(&mut self, text: impl Into<String>) {
        let text = text.into();

        if let Some(picked) = self.suppress_next.take() {
            if picked == text {
                tracing::debug!("Ignoring echo of picked suggestion '{}'", text);
                return;
            }
        }

        let field = self.field();
        self.input_tx.send_replace(SuggestionInput {
            field,
            text: text.clone(),
            picked: false,
        });

        if text.trim().is_empty() {
            self.debouncer.cancel();
            self.results_tx.send_replace(Suggestions::default());
            return;
        }

        let source = Arc::clone(&self.source);
        let input_rx = self.input_tx.subscribe();
        let results_tx = self.results_tx.clone();
        let max_results = self.max_results;

        self.debouncer.arm(move |_| async move {
            // Detached so the next keystroke re-arming the timer cannot abort it
            tokio::spawn(fetch_suggestions(
                source,
                SuggestionInput {
                    field,
                    text,
                    picked: false,
                },
                max_results,
                input_rx,
                results_tx,
            ));
        });
    }

    /// Take suggestion `index`: the input becomes its text and the next
    /// debounce cycle for that value is suppressed
    pub fn select(&mut self, index: usize) -> Option<VocabularyEntry> {
        let picked = self.results_tx.borrow().items.get(index).cloned()?;
        let field = self.field();
        let text = picked.field(field).to_string();

        self.debouncer.cancel();
        self.input_tx.send_replace(SuggestionInput {
            field,
            text: text.clone(),
            picked: true,
        });
        self.results_tx.send_replace(Suggestions::default());
        self.suppress_next = Some(text);

        Some(picked)
    }

    /// Drop the pending timer, the view is going away
    pub fn cancel(&mut self) {
        self.debouncer.cancel();
    }
}

async fn fetch_suggestions(
    source: Arc<dyn CatalogSource>,
    input: SuggestionInput,
    max_results: usize,
    input_rx: watch::Receiver<SuggestionInput>,
    results_tx: watch::Sender<Suggestions>,
) {
    let query = input.text.trim();
    tracing::debug!("Fetching suggestions for '{}' ({})", query, input.field);

    let result = source.query_prefix(query, input.field).await;

    if *input_rx.borrow() != input {
        tracing::debug!("Discarding stale suggestions for '{}'", input.text);
        return;
    }

    let items = match result {
        Ok(candidates) => rank_suggestions(candidates, query, input.field, max_results),
        Err(e) => {
            tracing::warn!("Error fetching suggestions: {}", e);
            Vec::new()
        }
    };

    results_tx.send_replace(Suggestions {
        query: input.text,
        items,
    });
}
