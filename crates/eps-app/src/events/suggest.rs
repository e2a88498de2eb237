use eps_core::suggest::Suggestions;
use eps_types::{AppEvent, Field};
use kanal::AsyncSender;

use crate::events::{Session, display_entries};
use crate::state::AppState;

pub async fn show_suggestions(
    session: &Session,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    suggestions: Suggestions,
) -> anyhow::Result<()> {
    let field = session.suggest.field();
    let items = suggestions
        .items
        .iter()
        .map(|entry| {
            let other = match field {
                Field::Bangla => &entry.korean,
                Field::Korean => &entry.bangla,
            };
            format!("{} ({})", entry.field(field), other)
        })
        .collect();

    app_to_ui_tx.send(AppEvent::ShowSuggestions(items)).await?;
    Ok(())
}

pub async fn handle_pick(
    state: &AppState,
    session: &mut Session,
    index: usize,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let Some(entry) = session.suggest.select(index) else {
        app_to_ui_tx
            .send(AppEvent::Error(format!("No suggestion {}", index + 1)))
            .await?;
        return Ok(());
    };

    tracing::info!("Picked suggestion '{}'", entry.field(session.suggest.field()));
    let entries = vec![entry];
    let display = display_entries(&entries, &*state.favorites.read().await);
    session.listed = entries;

    app_to_ui_tx
        .send(AppEvent::ShowEntries {
            title: "Selected".to_string(),
            entries: display,
        })
        .await?;
    Ok(())
}
