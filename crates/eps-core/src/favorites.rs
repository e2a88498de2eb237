//! Persisted favorites with a calendar-day grouped view.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Datelike, DateTime, Local, NaiveDate, TimeZone, Utc};
use eps_types::{FavoriteEntry, PairKey, VocabularyEntry};

use crate::clock::Clock;
use crate::error::StorageError;
use crate::storage::KvStore;

#[derive(Debug, Clone, PartialEq)]
pub enum ToggleOutcome {
    Added(FavoriteEntry),
    Removed(FavoriteEntry),
}

/// Favorites favorited on the same local calendar day, newest first
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBucket {
    pub label: String,
    pub day: NaiveDate,
    pub items: Vec<FavoriteEntry>,
    pub count: usize,
}

pub struct FavoritesStore {
    storage: Arc<dyn KvStore>,
    key: String,
    clock: Arc<dyn Clock>,
    favorites: Vec<FavoriteEntry>,
    index: HashSet<PairKey>,
    warning: Option<StorageError>,
}

impl FavoritesStore {
    /// Read the persisted set. A missing, unreadable or corrupt payload
    /// starts an empty store and leaves a warning behind.
    pub async fn load(
        storage: Arc<dyn KvStore>,
        key: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let key = key.into();

        let (persisted, warning) = match read_favorites(storage.as_ref(), &key).await {
            Ok(favorites) => (favorites, None),
            Err(e) => {
                tracing::warn!("Failed to load favorites '{}', starting empty: {}", key, e);
                (Vec::new(), Some(e))
            }
        };

        let mut store = Self {
            storage,
            key,
            clock,
            favorites: Vec::with_capacity(persisted.len()),
            index: HashSet::new(),
            warning,
        };

        for favorite in persisted {
            if store.index.insert(favorite.key()) {
                store.favorites.push(favorite);
            }
        }

        tracing::info!("Loaded {} favorites", store.favorites.len());
        store
    }

    /// The load failure, if any, reported once
    pub fn take_warning(&mut self) -> Option<StorageError> {
        self.warning.take()
    }

    pub fn contains(&self, entry: &VocabularyEntry) -> bool {
        self.index.contains(&entry.pair_key())
    }

    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    /// Favorites in the order they were added
    pub fn entries(&self) -> &[FavoriteEntry] {
        &self.favorites
    }

    /// Remove the entry if favorited, otherwise add it stamped with the
    /// current time. The whole set is written before returning; on a write
    /// error the in-memory change stays and the error is returned.
    pub async fn toggle(&mut self, entry: &VocabularyEntry) -> Result<ToggleOutcome, StorageError> {
        let outcome = match self.take(&entry.pair_key()) {
            Some(removed) => ToggleOutcome::Removed(removed),
            None => {
                let favorite = FavoriteEntry {
                    entry: entry.clone(),
                    timestamp: self.clock.now_millis(),
                };
                self.index.insert(favorite.key());
                self.favorites.push(favorite.clone());
                ToggleOutcome::Added(favorite)
            }
        };

        self.persist().await?;
        Ok(outcome)
    }

    /// Returns whether anything was removed. Nothing is written when the
    /// entry was not a favorite.
    pub async fn remove(&mut self, entry: &VocabularyEntry) -> Result<bool, StorageError> {
        if self.take(&entry.pair_key()).is_none() {
            return Ok(false);
        }
        self.persist().await?;
        Ok(true)
    }

    /// Buckets relative to the local calendar day
    pub fn categorize(&self) -> Vec<CategoryBucket> {
        self.categorize_at(&Local::now())
    }

    pub fn categorize_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<CategoryBucket> {
        let tz = now.timezone();
        let today = now.date_naive();
        let yesterday = today.pred_opt();

        let mut sorted = self.favorites.clone();
        sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let mut buckets: Vec<CategoryBucket> = Vec::new();
        for favorite in sorted {
            let day = DateTime::<Utc>::from_timestamp_millis(favorite.timestamp)
                .unwrap_or_default()
                .with_timezone(&tz)
                .date_naive();

            match buckets.last_mut() {
                Some(bucket) if bucket.day == day => {
                    bucket.items.push(favorite);
                    bucket.count += 1;
                }
                _ => buckets.push(CategoryBucket {
                    label: day_label(day, today, yesterday),
                    day,
                    items: vec![favorite],
                    count: 1,
                }),
            }
        }

        buckets
    }

    fn take(&mut self, key: &PairKey) -> Option<FavoriteEntry> {
        if !self.index.remove(key) {
            return None;
        }
        let position = self.favorites.iter().position(|f| &f.key() == key)?;
        Some(self.favorites.remove(position))
    }

    async fn persist(&self) -> Result<(), StorageError> {
        let payload = serde_json::to_vec(&self.favorites).map_err(StorageError::Encode)?;
        self.storage.write(&self.key, &payload).await.inspect_err(|e| {
            tracing::warn!("Failed to save favorites '{}': {}", self.key, e);
        })
    }
}

async fn read_favorites(
    storage: &dyn KvStore,
    key: &str,
) -> Result<Vec<FavoriteEntry>, StorageError> {
    match storage.read(key).await? {
        Some(bytes) => serde_json::from_slice(&bytes).map_err(StorageError::Decode),
        None => Ok(Vec::new()),
    }
}

fn day_label(day: NaiveDate, today: NaiveDate, yesterday: Option<NaiveDate>) -> String {
    if day == today {
        "Today".to_string()
    } else if Some(day) == yesterday {
        "Yesterday".to_string()
    } else if day.year() == today.year() {
        day.format("%B %-d").to_string()
    } else {
        day.format("%B %-d, %Y").to_string()
    }
}
