use eps_core::search::{LocalResults, SearchStatus};
use eps_types::AppEvent;
use kanal::AsyncSender;

use crate::events::{Session, display_entries};
use crate::state::AppState;

/// Publish a fresh local search evaluation
pub async fn show_local_results(
    state: &AppState,
    session: &mut Session,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    results: LocalResults,
) -> anyhow::Result<()> {
    let event = match results.status() {
        SearchStatus::Idle => AppEvent::Status("Search cleared".to_string()),
        SearchStatus::Found(count) => {
            let entries = display_entries(&results.matches, &*state.favorites.read().await);
            session.listed = results.matches;
            AppEvent::ShowEntries {
                title: format!(
                    "{count} matches for '{}' in {} loaded entries",
                    results.query, results.searched
                ),
                entries,
            }
        }
        SearchStatus::NoMatchInLoaded {
            more_available: true,
        } => AppEvent::Status(format!(
            "No match for '{}' in the {} loaded entries, `more` loads further pages",
            results.query, results.searched
        )),
        SearchStatus::NoMatchInLoaded {
            more_available: false,
        } => AppEvent::Status(format!("No match for '{}'", results.query)),
    };

    app_to_ui_tx.send(event).await?;
    Ok(())
}
