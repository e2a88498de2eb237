use chrono::{DateTime, Local, Utc};
use eps_core::favorites::{CategoryBucket, ToggleOutcome};
use eps_types::{AppEvent, DisplayGroup, DisplayResult};
use kanal::AsyncSender;

use crate::events::Session;
use crate::state::AppState;

pub async fn handle_toggle_favorite(
    state: &AppState,
    session: &mut Session,
    index: usize,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let Some(entry) = session.listed.get(index).cloned() else {
        app_to_ui_tx
            .send(AppEvent::Error(format!("No entry {} in the last list", index + 1)))
            .await?;
        return Ok(());
    };

    // Held across the write so rewrites land in mutation order
    let result = state.favorites.write().await.toggle(&entry).await;

    let event = match result {
        Ok(ToggleOutcome::Added(f)) => {
            AppEvent::Status(format!("Added {} / {} to favorites", f.entry.bangla, f.entry.korean))
        }
        Ok(ToggleOutcome::Removed(f)) => AppEvent::Status(format!(
            "Removed {} / {} from favorites",
            f.entry.bangla, f.entry.korean
        )),
        Err(e) => AppEvent::Error(format!("Failed to save favorites: {e}")),
    };
    app_to_ui_tx.send(event).await?;
    Ok(())
}

pub async fn handle_remove_favorite(
    state: &AppState,
    session: &mut Session,
    index: usize,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let Some(entry) = session.favorites_view.get(index).cloned() else {
        app_to_ui_tx
            .send(AppEvent::Error(format!(
                "No favorite {}, `favs` lists them",
                index + 1
            )))
            .await?;
        return Ok(());
    };

    let result = state.favorites.write().await.remove(&entry).await;

    let event = match result {
        Ok(true) => AppEvent::Status(format!(
            "Removed {} / {} from favorites",
            entry.bangla, entry.korean
        )),
        Ok(false) => AppEvent::Status("Already removed".to_string()),
        Err(e) => AppEvent::Error(format!("Failed to save favorites: {e}")),
    };
    app_to_ui_tx.send(event).await?;
    Ok(())
}

pub async fn handle_show_favorites(
    state: &AppState,
    session: &mut Session,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let buckets = state.favorites.read().await.categorize();

    if buckets.is_empty() {
        session.favorites_view.clear();
        app_to_ui_tx
            .send(AppEvent::Status("No favorites yet".to_string()))
            .await?;
        return Ok(());
    }

    session.favorites_view = buckets
        .iter()
        .flat_map(|bucket| bucket.items.iter().map(|f| f.entry.clone()))
        .collect();

    let groups = buckets.into_iter().map(display_group).collect();
    app_to_ui_tx.send(AppEvent::ShowFavoriteGroups(groups)).await?;
    Ok(())
}

fn display_group(bucket: CategoryBucket) -> DisplayGroup {
    DisplayGroup {
        label: bucket.label,
        count: bucket.count,
        items: bucket
            .items
            .into_iter()
            .map(|f| DisplayResult {
                time: Some(time_of_day(f.timestamp)),
                bangla: f.entry.bangla,
                korean: f.entry.korean,
                favorite: true,
            })
            .collect(),
    }
}

fn time_of_day(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp)
        .unwrap_or_default()
        .with_timezone(&Local)
        .format("%H:%M")
        .to_string()
}
