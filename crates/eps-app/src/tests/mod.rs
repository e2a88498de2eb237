//! End-to-end flows through the event loop with in-memory collaborators.

mod connectivity_tests;

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use eps_config::Config;
use eps_core::clock::SystemClock;
use eps_core::error::{CatalogError, StorageError};
use eps_core::favorites::FavoritesStore;
use eps_core::source::CatalogSource;
use eps_core::storage::{KvStore, MemoryStore};
use eps_translator::{Language, TranslateError, Translation, Translator};
use eps_types::{AppEvent, CatalogPage, Cursor, Field, VocabularyEntry};
use kanal::{AsyncReceiver, AsyncSender};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::events::event_loop;
use crate::state::AppState;

pub fn word(id: &str, bangla: &str, korean: &str) -> VocabularyEntry {
    VocabularyEntry::new(bangla, korean).with_id(id)
}

#[derive(Default)]
pub struct FakeCatalog {
    pages: Mutex<VecDeque<CatalogPage>>,
    prefix: HashMap<String, Vec<VocabularyEntry>>,
    substring: Vec<VocabularyEntry>,
    pub fetch_calls: AtomicUsize,
}

impl FakeCatalog {
    pub fn with_pages(pages: Vec<(Vec<VocabularyEntry>, bool)>) -> Self {
        let pages = pages
            .into_iter()
            .map(|(entries, has_more)| CatalogPage {
                cursor: entries.last().map(|e| Cursor(e.identity())),
                entries,
                has_more,
            })
            .collect();
        Self {
            pages: Mutex::new(pages),
            ..Self::default()
        }
    }

    pub fn with_prefix(mut self, query: &str, entries: Vec<VocabularyEntry>) -> Self {
        self.prefix.insert(query.to_string(), entries);
        self
    }

    pub fn with_substring(mut self, entries: Vec<VocabularyEntry>) -> Self {
        self.substring = entries;
        self
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn fetch_page(&self, _cursor: Option<&Cursor>) -> Result<CatalogPage, CatalogError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.pages.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn query_substring(
        &self,
        _text: &str,
        _field: Field,
    ) -> Result<Vec<VocabularyEntry>, CatalogError> {
        Ok(self.substring.clone())
    }

    async fn query_prefix(
        &self,
        text: &str,
        _field: Field,
    ) -> Result<Vec<VocabularyEntry>, CatalogError> {
        Ok(self.prefix.get(text).cloned().unwrap_or_default())
    }
}

/// Answers every request with the same text
pub struct FixedTranslator(pub &'static str);

#[async_trait]
impl Translator for FixedTranslator {
    async fn translate(
        &self,
        _text: &str,
        from: Language,
        to: Language,
    ) -> Result<Translation, TranslateError> {
        Ok(Translation {
            text: self.0.to_string(),
            from,
            to,
            provider: "fixed".to_string(),
        })
    }
}

pub struct BrokenStore;

#[async_trait]
impl KvStore for BrokenStore {
    async fn read(&self, _key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Err(std::io::Error::other("permission denied").into())
    }

    async fn write(&self, _key: &str, _value: &[u8]) -> Result<(), StorageError> {
        Err(std::io::Error::other("permission denied").into())
    }
}

pub struct Harness {
    pub commands: AsyncSender<AppEvent>,
    pub output: AsyncReceiver<AppEvent>,
    pub source: Arc<FakeCatalog>,
    pub storage: Arc<MemoryStore>,
    pub cancel: CancellationToken,
    pub task: JoinHandle<anyhow::Result<()>>,
}

pub fn test_config(load_on_start: bool) -> Config {
    let mut config = Config::default();
    config.load_on_start = load_on_start;
    config.assume_online = true;
    config
}

pub async fn start(
    config: Config,
    source: FakeCatalog,
    translator: Option<Arc<dyn Translator>>,
) -> Harness {
    let storage = Arc::new(MemoryStore::new());
    let favorites = FavoritesStore::load(
        Arc::clone(&storage) as Arc<dyn KvStore>,
        "favorites",
        Arc::new(SystemClock),
    )
    .await;
    start_with(config, source, translator, favorites, storage)
}

pub fn start_with(
    config: Config,
    source: FakeCatalog,
    translator: Option<Arc<dyn Translator>>,
    favorites: FavoritesStore,
    storage: Arc<MemoryStore>,
) -> Harness {
    let source = Arc::new(source);
    let state = Arc::new(AppState::new(
        config,
        favorites,
        Arc::clone(&source) as Arc<dyn CatalogSource>,
        translator,
    ));

    let (commands, commands_rx) = kanal::bounded_async(64);
    let (output_tx, output) = kanal::bounded_async(256);
    let cancel = CancellationToken::new();
    let task = tokio::spawn(event_loop(state, commands_rx, output_tx, cancel.clone()));

    Harness {
        commands,
        output,
        source,
        storage,
        cancel,
        task,
    }
}

impl Harness {
    pub async fn send(&self, event: AppEvent) {
        self.commands.send(event).await.unwrap();
    }

    /// Skip output until `pick` accepts an event
    pub async fn wait_for<T>(&self, mut pick: impl FnMut(AppEvent) -> Option<T>) -> T {
        loop {
            let event = timeout(Duration::from_secs(5), self.output.recv())
                .await
                .expect("no matching output")
                .unwrap();
            if let Some(found) = pick(event) {
                return found;
            }
        }
    }

    pub async fn status_containing(&self, needle: &str) -> String {
        self.wait_for(|event| match event {
            AppEvent::Status(text) | AppEvent::Error(text) if text.contains(needle) => Some(text),
            _ => None,
        })
        .await
    }
}
