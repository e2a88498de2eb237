//! Locally accumulated view of the remote vocabulary collection.
//!
//! Pages are appended in fetch order and deduplicated by
//! [`VocabularyEntry::dedup_key`]. Fetch failures never escape: they are
//! recorded in [`CatalogState::load_error`] and whatever was loaded before
//! stays available.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use eps_types::{CatalogPage, Cursor, DedupKey, VocabularyEntry};
use tokio::sync::{RwLock, watch};

use crate::error::CatalogError;
use crate::source::CatalogSource;

#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    /// Fetch order, no two entries share a dedup key
    pub entries: Vec<VocabularyEntry>,
    pub cursor: Option<Cursor>,
    pub has_more: bool,
    /// The three in-flight flags are filled in by [`CatalogCache::snapshot`]
    pub is_loading_initial: bool,
    pub is_loading_more: bool,
    pub is_refreshing: bool,
    pub is_offline: bool,
    /// Search results, not the raw catalog, are on screen
    pub search_active: bool,
    /// At least one initial page has arrived
    pub initialized: bool,
    pub load_error: Option<CatalogError>,
    /// Bumped on every change to `entries`
    pub revision: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded { added: usize },
    Skipped(SkipReason),
    Failed(CatalogError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyLoading,
    Offline,
    SearchActive,
    /// No initial page yet, nothing to continue from
    NotLoaded,
    /// The last page said there is nothing more
    Exhausted,
    /// A reload replaced the entries while this page was in flight
    Superseded,
}

#[derive(Clone, Copy)]
enum ReloadMode {
    Initial,
    Refresh,
}

struct Inner {
    state: CatalogState,
    seen: HashSet<DedupKey>,
    /// Bumped by every reload so page results from before it can be dropped
    epoch: u64,
}

/// Clears an in-flight flag when the fetch completes or its future is dropped
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct CatalogCache {
    source: Arc<dyn CatalogSource>,
    inner: RwLock<Inner>,
    revision_tx: watch::Sender<u64>,
    loading_initial: AtomicBool,
    loading_more: AtomicBool,
    refreshing: AtomicBool,
}

impl CatalogCache {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        let (revision_tx, _) = watch::channel(0);
        Self {
            source,
            inner: RwLock::new(Inner {
                state: CatalogState::default(),
                seen: HashSet::new(),
                epoch: 0,
            }),
            revision_tx,
            loading_initial: AtomicBool::new(false),
            loading_more: AtomicBool::new(false),
            refreshing: AtomicBool::new(false),
        }
    }

    /// Fetch the first page and replace whatever was loaded
    pub async fn load_initial(&self) -> LoadOutcome {
        self.reload(ReloadMode::Initial).await
    }

    /// Same as [`load_initial`](Self::load_initial), flagged as a refresh
    pub async fn refresh(&self) -> LoadOutcome {
        self.reload(ReloadMode::Refresh).await
    }

    /// Append the next page. At most one page fetch is in flight at a time.
    pub async fn load_more(&self) -> LoadOutcome {
        let (cursor, epoch, in_flight) = {
            let inner = self.inner.write().await;
            let state = &inner.state;

            let skip = if self.loading_more.load(Ordering::Acquire) {
                Some(SkipReason::AlreadyLoading)
            } else if state.is_offline {
                Some(SkipReason::Offline)
            } else if state.search_active {
                Some(SkipReason::SearchActive)
            } else if !state.initialized {
                Some(SkipReason::NotLoaded)
            } else if !state.has_more {
                Some(SkipReason::Exhausted)
            } else {
                None
            };

            if let Some(reason) = skip {
                tracing::debug!("load_more skipped: {:?}", reason);
                return LoadOutcome::Skipped(reason);
            }

            self.loading_more.store(true, Ordering::Release);
            (inner.state.cursor.clone(), inner.epoch, InFlight(&self.loading_more))
        };

        tracing::debug!("Fetching next page after {:?}", cursor);
        let result = self.source.fetch_page(cursor.as_ref()).await;

        let mut inner = self.inner.write().await;
        drop(in_flight);

        if inner.epoch != epoch {
            tracing::debug!("Dropping page fetched before a reload");
            return LoadOutcome::Skipped(SkipReason::Superseded);
        }

        match result {
            Ok(page) => {
                let added = inner.append(page);
                inner.state.load_error = None;
                if added > 0 {
                    self.bump_revision(&mut inner);
                }
                tracing::info!(
                    "Loaded {} new entries ({} total)",
                    added,
                    inner.state.entries.len()
                );
                LoadOutcome::Loaded { added }
            }
            Err(e) => {
                tracing::warn!("Failed to load more vocabulary: {}", e);
                inner.state.load_error = Some(e.clone());
                LoadOutcome::Failed(e)
            }
        }
    }

    async fn reload(&self, mode: ReloadMode) -> LoadOutcome {
        let in_flight = {
            let _inner = self.inner.write().await;
            if self.loading_initial.load(Ordering::Acquire)
                || self.refreshing.load(Ordering::Acquire)
            {
                return LoadOutcome::Skipped(SkipReason::AlreadyLoading);
            }
            let flag = match mode {
                ReloadMode::Initial => &self.loading_initial,
                ReloadMode::Refresh => &self.refreshing,
            };
            flag.store(true, Ordering::Release);
            InFlight(flag)
        };

        let result = self.source.fetch_page(None).await;

        let mut inner = self.inner.write().await;
        drop(in_flight);

        match result {
            Ok(page) => {
                inner.epoch += 1;
                inner.seen.clear();
                inner.state.entries.clear();
                inner.state.cursor = None;

                let added = inner.append(page);
                inner.state.initialized = true;
                inner.state.is_offline = false;
                inner.state.load_error = None;
                self.bump_revision(&mut inner);

                tracing::info!("Loaded initial page with {} entries", added);
                LoadOutcome::Loaded { added }
            }
            Err(e) => {
                // Keep the stale entries on screen
                tracing::warn!("Failed to load vocabulary: {}", e);
                inner.state.load_error = Some(e.clone());
                LoadOutcome::Failed(e)
            }
        }
    }

    /// Connectivity observer input
    pub async fn set_offline(&self, offline: bool) {
        let mut inner = self.inner.write().await;
        if inner.state.is_offline != offline {
            tracing::info!("Catalog is now {}", if offline { "offline" } else { "online" });
        }
        inner.state.is_offline = offline;
    }

    pub async fn set_search_active(&self, active: bool) {
        self.inner.write().await.state.search_active = active;
    }

    pub async fn snapshot(&self) -> CatalogState {
        let mut state = self.inner.read().await.state.clone();
        state.is_loading_initial = self.loading_initial.load(Ordering::Acquire);
        state.is_loading_more = self.loading_more.load(Ordering::Acquire);
        state.is_refreshing = self.refreshing.load(Ordering::Acquire);
        state
    }

    /// Borrow the state without cloning the entries. The in-flight flags
    /// are not filled in here, use [`snapshot`](Self::snapshot) for those.
    pub async fn with_state<R>(&self, f: impl FnOnce(&CatalogState) -> R) -> R {
        f(&self.inner.read().await.state)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.state.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Notified with the new revision whenever `entries` changes
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision_tx.subscribe()
    }

    fn bump_revision(&self, inner: &mut Inner) {
        inner.state.revision += 1;
        self.revision_tx.send_replace(inner.state.revision);
    }
}

impl Inner {
    /// Append unseen entries and advance the cursor, returns how many were new
    fn append(&mut self, page: CatalogPage) -> usize {
        let before = self.state.entries.len();

        for entry in page.entries {
            if self.seen.insert(entry.dedup_key()) {
                self.state.entries.push(entry);
            }
        }

        // An empty page keeps the cursor, there is nothing to continue from
        if page.cursor.is_some() {
            self.state.cursor = page.cursor;
        }
        self.state.has_more = page.has_more;

        self.state.entries.len() - before
    }
}
