//! In-memory collaborators for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use eps_translator::{Language, TranslateError, Translation, Translator};
use eps_types::{CatalogPage, Cursor, Field, VocabularyEntry};

use crate::clock::Clock;
use crate::error::{CatalogError, StorageError};
use crate::source::CatalogSource;
use crate::storage::KvStore;

pub fn entry(bangla: &str, korean: &str) -> VocabularyEntry {
    VocabularyEntry::new(bangla, korean)
}

/// Page of entries whose ids are `ids`, cursor on the last one
pub fn page(ids: &[&str], has_more: bool) -> CatalogPage {
    let entries: Vec<_> = ids
        .iter()
        .map(|id| VocabularyEntry::new(format!("bn-{id}"), format!("ko-{id}")).with_id(*id))
        .collect();
    CatalogPage {
        cursor: entries.last().map(|e| Cursor(e.identity())),
        entries,
        has_more,
    }
}

#[derive(Default)]
pub struct FakeSource {
    pages: Mutex<VecDeque<Result<CatalogPage, CatalogError>>>,
    cursors: Mutex<Vec<Option<Cursor>>>,
    fetch_calls: AtomicUsize,
    fetch_delay: Duration,
    call_delays: Vec<Duration>,
    prefix: HashMap<String, (Duration, Vec<VocabularyEntry>)>,
    prefix_queries: Mutex<Vec<String>>,
    substring: Option<Result<Vec<VocabularyEntry>, CatalogError>>,
    substring_calls: AtomicUsize,
}

impl FakeSource {
    pub fn with_pages(pages: Vec<CatalogPage>) -> Self {
        Self::with_results(pages.into_iter().map(Ok).collect())
    }

    pub fn with_results(results: Vec<Result<CatalogPage, CatalogError>>) -> Self {
        Self {
            pages: Mutex::new(results.into()),
            ..Self::default()
        }
    }

    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }

    /// Delay per fetch call, by call order
    pub fn with_call_delays(mut self, delays: Vec<Duration>) -> Self {
        self.call_delays = delays;
        self
    }

    /// Answer prefix queries for `query` after `delay`
    pub fn with_prefix(mut self, query: &str, delay: Duration, entries: Vec<VocabularyEntry>) -> Self {
        self.prefix.insert(query.to_string(), (delay, entries));
        self
    }

    pub fn with_substring(mut self, result: Result<Vec<VocabularyEntry>, CatalogError>) -> Self {
        self.substring = Some(result);
        self
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn requested_cursors(&self) -> Vec<Option<Cursor>> {
        self.cursors.lock().unwrap().clone()
    }

    pub fn prefix_queries(&self) -> Vec<String> {
        self.prefix_queries.lock().unwrap().clone()
    }

    pub fn substring_calls(&self) -> usize {
        self.substring_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for FakeSource {
    async fn fetch_page(&self, cursor: Option<&Cursor>) -> Result<CatalogPage, CatalogError> {
        let call = self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.cursors.lock().unwrap().push(cursor.cloned());

        // Pages are handed out in call order, not completion order
        let result = self
            .pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(CatalogPage::default()));

        let delay = self.call_delays.get(call).copied().unwrap_or(self.fetch_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn query_substring(
        &self,
        _text: &str,
        _field: Field,
    ) -> Result<Vec<VocabularyEntry>, CatalogError> {
        self.substring_calls.fetch_add(1, Ordering::SeqCst);
        self.substring.clone().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn query_prefix(
        &self,
        text: &str,
        _field: Field,
    ) -> Result<Vec<VocabularyEntry>, CatalogError> {
        self.prefix_queries.lock().unwrap().push(text.to_string());

        let Some((delay, entries)) = self.prefix.get(text).cloned() else {
            return Ok(Vec::new());
        };
        tokio::time::sleep(delay).await;
        Ok(entries)
    }
}

/// Echoes the text back with a marker, or fails with a fixed message
pub struct FakeTranslator {
    pub fail_with: Option<String>,
    pub calls: Mutex<Vec<(String, Language, Language)>>,
}

impl FakeTranslator {
    pub fn ok() -> Self {
        Self {
            fail_with: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Translator for FakeTranslator {
    async fn translate(
        &self,
        text: &str,
        from: Language,
        to: Language,
    ) -> Result<Translation, TranslateError> {
        self.calls.lock().unwrap().push((text.to_string(), from, to));

        if let Some(message) = &self.fail_with {
            return Err(TranslateError::api(message.clone()));
        }

        Ok(Translation {
            text: format!("{text}@{to}"),
            from,
            to,
            provider: "fake".to_string(),
        })
    }
}

pub struct ManualClock(AtomicI64);

impl ManualClock {
    pub fn at(millis: i64) -> Self {
        Self(AtomicI64::new(millis))
    }

    pub fn set(&self, millis: i64) {
        self.0.store(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Store whose reads and writes can be made to fail
#[derive(Default)]
pub struct FlakyStore {
    pub values: Mutex<HashMap<String, Vec<u8>>>,
    pub fail_reads: bool,
    pub fail_writes: std::sync::atomic::AtomicBool,
    pub writes: AtomicUsize,
}

#[async_trait]
impl KvStore for FlakyStore {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        if self.fail_reads {
            return Err(std::io::Error::other("disk unavailable").into());
        }
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn write(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(std::io::Error::other("disk full").into());
        }
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
