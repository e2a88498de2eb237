use eps_core::error::SearchError;
use eps_core::lookup::LookupOrigin;
use eps_types::{AppEvent, Field};
use kanal::AsyncSender;

use crate::events::{Session, display_entries};
use crate::state::AppState;

/// Submit from the search card: catalog search, translation when it has nothing
pub async fn handle_lookup(
    state: &AppState,
    session: &mut Session,
    field: Field,
    text: String,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    tracing::info!("Lookup '{}' in {}", text, field);

    let result = match session.lookup.search(&text, field).await {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!("Lookup '{}' failed: {}", text, e);
            app_to_ui_tx.send(AppEvent::Error(lookup_error(&e))).await?;
            return Ok(());
        }
    };

    if result.entries.is_empty() {
        app_to_ui_tx
            .send(AppEvent::Status("Nothing to look up".to_string()))
            .await?;
        return Ok(());
    }

    let title = match &result.origin {
        LookupOrigin::Catalog => format!("{} results for '{}'", result.entries.len(), text.trim()),
        LookupOrigin::Translation { provider } => {
            format!("Not in the catalog, translated by {provider}")
        }
    };

    let display = display_entries(&result.entries, &*state.favorites.read().await);
    session.listed = result.entries;

    app_to_ui_tx
        .send(AppEvent::ShowEntries {
            title,
            entries: display,
        })
        .await?;
    Ok(())
}

fn lookup_error(e: &SearchError) -> String {
    match e {
        SearchError::Catalog(c) if c.is_network() => {
            "No internet connection, check your connection and try again".to_string()
        }
        SearchError::Translation(t) => format!("Translation error: {t}"),
        other => other.to_string(),
    }
}
