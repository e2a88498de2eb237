use std::sync::Arc;

use eps_core::catalog::{CatalogCache, LoadOutcome, SkipReason};
use eps_types::AppEvent;
use kanal::AsyncSender;

use crate::events::{Session, display_entries};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    Initial,
    More,
    Refresh,
}

/// Run a catalog load in the background and report how it went. The cache
/// itself drops overlapping requests.
pub fn spawn_load(catalog: &Arc<CatalogCache>, kind: LoadKind, app_to_ui_tx: AsyncSender<AppEvent>) {
    let catalog = Arc::clone(catalog);

    tokio::spawn(async move {
        let outcome = match kind {
            LoadKind::Initial => catalog.load_initial().await,
            LoadKind::More => catalog.load_more().await,
            LoadKind::Refresh => catalog.refresh().await,
        };
        tracing::debug!("{:?} load finished: {:?}", kind, outcome);

        let total = catalog.len().await;
        if let Err(e) = app_to_ui_tx.send(describe_outcome(kind, &outcome, total)).await {
            tracing::error!("Failed to report catalog load: {}", e);
        }
    });
}

pub fn describe_outcome(kind: LoadKind, outcome: &LoadOutcome, total: usize) -> AppEvent {
    match outcome {
        LoadOutcome::Loaded { added } => AppEvent::Status(match kind {
            LoadKind::More => format!("Loaded {added} more entries ({total} total)"),
            LoadKind::Initial | LoadKind::Refresh => format!("Catalog loaded, {total} entries"),
        }),
        LoadOutcome::Skipped(reason) => AppEvent::Status(
            match reason {
                SkipReason::AlreadyLoading => "Already loading".to_string(),
                SkipReason::Offline => format!("Offline, showing {total} cached entries"),
                SkipReason::SearchActive => {
                    "Search results are shown, `clear` to keep paging the catalog".to_string()
                }
                SkipReason::NotLoaded => "Catalog is not loaded yet, try `refresh`".to_string(),
                SkipReason::Exhausted => format!("All {total} entries are loaded"),
                SkipReason::Superseded => "Catalog was reloaded, page dropped".to_string(),
            },
        ),
        LoadOutcome::Failed(e) if e.is_network() => AppEvent::Error(format!(
            "No internet connection, showing {total} cached entries"
        )),
        LoadOutcome::Failed(e) => AppEvent::Error(format!("Failed to load catalog: {e}")),
    }
}

/// Print the active search results, or the loaded catalog
pub async fn handle_list(
    state: &AppState,
    session: &mut Session,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let results = session.search.results();
    let (title, entries) = if !results.matches.is_empty() {
        (
            format!("{} matches for '{}'", results.matches.len(), results.query),
            results.matches,
        )
    } else {
        let snapshot = session.catalog.snapshot().await;
        let mut title = format!("Catalog, {} entries", snapshot.entries.len());
        if snapshot.has_more {
            title.push_str(", `more` for the next page");
        }
        if snapshot.is_offline {
            title.push_str(" (offline)");
        }
        (title, snapshot.entries)
    };

    if entries.is_empty() {
        app_to_ui_tx
            .send(AppEvent::Status("Nothing loaded yet".to_string()))
            .await?;
        return Ok(());
    }

    let display = display_entries(&entries, &*state.favorites.read().await);
    session.listed = entries;
    app_to_ui_tx
        .send(AppEvent::ShowEntries {
            title,
            entries: display,
        })
        .await?;
    Ok(())
}

pub async fn handle_connectivity(
    session: &mut Session,
    online: bool,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    session.catalog.set_offline(!online).await;

    let status = if online {
        "Back online"
    } else {
        "Offline, showing cached entries"
    };
    app_to_ui_tx.send(AppEvent::Status(status.to_string())).await?;

    // Nothing was ever loaded, try again now that the network is back
    if online && !session.catalog.with_state(|s| s.initialized).await {
        spawn_load(&session.catalog, LoadKind::Initial, app_to_ui_tx.clone());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use eps_core::error::CatalogError;

    fn status(event: AppEvent) -> String {
        match event {
            AppEvent::Status(text) | AppEvent::Error(text) => text,
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn network_failures_mention_cached_entries() {
        let event = describe_outcome(
            LoadKind::More,
            &LoadOutcome::Failed(CatalogError::Network("dns".to_string())),
            40,
        );
        assert!(matches!(event, AppEvent::Error(_)));
        assert_eq!(status(event), "No internet connection, showing 40 cached entries");
    }

    #[test]
    fn server_failures_carry_the_cause() {
        let event = describe_outcome(
            LoadKind::Initial,
            &LoadOutcome::Failed(CatalogError::Server {
                status: 500,
                message: "boom".to_string(),
            }),
            0,
        );
        assert_eq!(status(event), "Failed to load catalog: Server error (500): boom");
    }

    #[test]
    fn skipped_loads_are_explained() {
        let event = describe_outcome(LoadKind::More, &LoadOutcome::Skipped(SkipReason::Exhausted), 7);
        assert_eq!(status(event), "All 7 entries are loaded");

        let event = describe_outcome(LoadKind::More, &LoadOutcome::Loaded { added: 3 }, 23);
        assert_eq!(status(event), "Loaded 3 more entries (23 total)");
    }
}
