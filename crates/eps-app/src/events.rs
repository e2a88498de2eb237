use std::sync::Arc;
use std::time::Duration;

use eps_core::catalog::CatalogCache;
use eps_core::favorites::FavoritesStore;
use eps_core::lookup::Lookup;
use eps_core::search::LocalSearch;
use eps_core::suggest::SuggestionEngine;
use eps_types::{AppEvent, DisplayResult, VocabularyEntry};
use kanal::{AsyncReceiver, AsyncSender};
use tokio_util::sync::CancellationToken;

use crate::command::HELP;
use crate::state::AppState;

pub mod catalog;
pub mod favorites;
pub mod lookup;
pub mod search;
pub mod suggest;

use catalog::{LoadKind, handle_connectivity, handle_list, spawn_load};
use favorites::{handle_remove_favorite, handle_show_favorites, handle_toggle_favorite};
use lookup::handle_lookup;
use search::show_local_results;
use suggest::{handle_pick, show_suggestions};

/// Per-screen components. The catalog lives as long as the event loop,
/// favorites are shared through [`AppState`].
pub struct Session {
    pub catalog: Arc<CatalogCache>,
    pub search: LocalSearch,
    pub suggest: SuggestionEngine,
    pub lookup: Lookup,
    /// Entries of the last printed list, `fav <n>` points into it
    pub listed: Vec<VocabularyEntry>,
    /// Favorites in the order `favs` numbered them
    pub favorites_view: Vec<VocabularyEntry>,
}

impl Session {
    pub async fn new(state: &AppState) -> Self {
        let config = state.config.read().await;
        let delay = Duration::from_millis(config.search.debounce_ms);

        let catalog = Arc::new(CatalogCache::new(Arc::clone(&state.source)));
        let search = LocalSearch::new(Arc::clone(&catalog), delay);
        let suggest =
            SuggestionEngine::new(Arc::clone(&state.source), config.search.default_field, delay)
                .with_max_results(config.search.max_suggestions);
        let lookup = Lookup::new(Arc::clone(&state.source), state.translator.clone());

        Self {
            catalog,
            search,
            suggest,
            lookup,
            listed: Vec::new(),
            favorites_view: Vec::new(),
        }
    }

    /// Stop pending debounce timers
    pub fn cancel(&mut self) {
        self.search.cancel();
        self.suggest.cancel();
    }
}

/// App's main loop
pub async fn event_loop(
    state: Arc<AppState>,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let mut session = Session::new(&state).await;
    let mut revisions = session.catalog.subscribe();
    let mut local_results = session.search.subscribe();
    let mut suggestions = session.suggest.subscribe();

    let warning = state.favorites.write().await.take_warning();
    if let Some(e) = warning {
        app_to_ui_tx
            .send(AppEvent::Error(format!(
                "Favorites could not be loaded, starting empty: {e}"
            )))
            .await?;
    }

    if state.config.read().await.load_on_start {
        spawn_load(&session.catalog, LoadKind::Initial, app_to_ui_tx.clone());
    }

    tracing::info!("Event loop started");
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Event loop cancelled");
                break;
            }
            event = ui_to_app_rx.recv() => {
                let event = event?;
                if matches!(event, AppEvent::Quit) {
                    tracing::info!("Quit requested");
                    break;
                }
                handle_events(&state, &mut session, &app_to_ui_tx, event).await?;
            }
            Ok(()) = revisions.changed() => {
                let revision = *revisions.borrow_and_update();
                tracing::debug!("Catalog revision {}", revision);
                session.search.refilter().await;
            }
            Ok(()) = local_results.changed() => {
                let results = local_results.borrow_and_update().clone();
                show_local_results(&state, &mut session, &app_to_ui_tx, results).await?;
            }
            Ok(()) = suggestions.changed() => {
                let current = suggestions.borrow_and_update().clone();
                show_suggestions(&session, &app_to_ui_tx, current).await?;
            }
        }
    }

    session.cancel();
    Ok(())
}

async fn handle_events(
    state: &AppState,
    session: &mut Session,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    event: AppEvent,
) -> anyhow::Result<()> {
    tracing::debug!("Handling {:?}", event);
    match event {
        AppEvent::LoadMore => spawn_load(&session.catalog, LoadKind::More, app_to_ui_tx.clone()),
        AppEvent::Refresh => spawn_load(&session.catalog, LoadKind::Refresh, app_to_ui_tx.clone()),
        AppEvent::ListCatalog => handle_list(state, session, app_to_ui_tx).await?,
        AppEvent::LocalSearch(text) => session.search.set_query(&text).await,
        AppEvent::ClearSearch => session.search.clear().await,
        AppEvent::SuggestInput { field, text } => {
            session.suggest.set_field(field);
            session.suggest.set_input(text);
        }
        AppEvent::PickSuggestion(index) => {
            handle_pick(state, session, index, app_to_ui_tx).await?
        }
        AppEvent::Lookup { field, text } => {
            handle_lookup(state, session, field, text, app_to_ui_tx).await?
        }
        AppEvent::ToggleFavorite(index) => {
            handle_toggle_favorite(state, session, index, app_to_ui_tx).await?
        }
        AppEvent::RemoveFavorite(index) => {
            handle_remove_favorite(state, session, index, app_to_ui_tx).await?
        }
        AppEvent::ShowFavorites => handle_show_favorites(state, session, app_to_ui_tx).await?,
        AppEvent::ConnectivityChanged(online) => {
            handle_connectivity(session, online, app_to_ui_tx).await?
        }
        AppEvent::Help => app_to_ui_tx.send(AppEvent::Status(HELP.to_string())).await?,
        AppEvent::Quit => {}
        AppEvent::ShowEntries { .. }
        | AppEvent::ShowSuggestions(_)
        | AppEvent::ShowFavoriteGroups(_)
        | AppEvent::Status(_)
        | AppEvent::Error(_) => {
            // Output events, rendered by the UI loop
        }
    }

    Ok(())
}

pub(crate) fn display_entries(
    entries: &[VocabularyEntry],
    favorites: &FavoritesStore,
) -> Vec<DisplayResult> {
    entries
        .iter()
        .map(|entry| DisplayResult {
            bangla: entry.bangla.clone(),
            korean: entry.korean.clone(),
            favorite: favorites.contains(entry),
            time: None,
        })
        .collect()
}
