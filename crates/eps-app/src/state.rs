use std::sync::Arc;

use anyhow::Context;
use eps_config::Config;
use eps_core::clock::SystemClock;
use eps_core::favorites::FavoritesStore;
use eps_core::source::CatalogSource;
use eps_core::storage::FileStore;
use eps_lang_bangla_korean::BanglaKoreanTranslator;
use eps_remote::AppwriteSource;
use eps_translator::Translator;
use tokio::sync::RwLock;

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    /// Single process-wide favorites set, every screen edits this one
    pub favorites: Arc<RwLock<FavoritesStore>>,
    pub source: Arc<dyn CatalogSource>,
    pub translator: Option<Arc<dyn Translator>>,
}

impl AppState {
    pub fn new(
        config: Config,
        favorites: FavoritesStore,
        source: Arc<dyn CatalogSource>,
        translator: Option<Arc<dyn Translator>>,
    ) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            favorites: Arc::new(RwLock::new(favorites)),
            source,
            translator,
        }
    }

    /// Wire the real collaborators described by `config`
    pub async fn init(config: Config) -> anyhow::Result<Self> {
        if config.catalog.project_id.is_empty() {
            tracing::warn!("APPWRITE_PROJECT_ID is not set, catalog requests will be rejected");
        }

        let source = AppwriteSource::new(&config.catalog, config.network.request_timeout())
            .context("Failed to build catalog client")?;

        let translator: Option<Arc<dyn Translator>> = if config.translator.enabled {
            let translator = BanglaKoreanTranslator::new(
                config.translator.api_url.clone(),
                config.network.request_timeout(),
            )
            .context("Failed to build translation client")?;
            Some(Arc::new(translator))
        } else {
            tracing::warn!("Translator disabled, lookups without a catalog match will fail");
            None
        };

        let storage = FileStore::new(config.favorites.data_path());
        let favorites = FavoritesStore::load(
            Arc::new(storage),
            config.favorites.storage_key.clone(),
            Arc::new(SystemClock),
        )
        .await;

        Ok(Self::new(config, favorites, Arc::new(source), translator))
    }
}
