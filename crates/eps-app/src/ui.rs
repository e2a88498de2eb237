use std::fmt::Write;

use eps_types::{AppEvent, DisplayResult};
use kanal::AsyncReceiver;
use tokio_util::sync::CancellationToken;

/// Print output events to stdout until cancelled
pub async fn ui_loop(
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            event = app_to_ui_rx.recv() => {
                if let Some(text) = render(&event?) {
                    println!("{text}");
                }
            }
        }
    }
    Ok(())
}

pub fn render(event: &AppEvent) -> Option<String> {
    match event {
        AppEvent::ShowEntries { title, entries } => {
            let mut out = format!("{title}\n");
            for (i, entry) in entries.iter().enumerate() {
                push_row(&mut out, i + 1, entry);
            }
            Some(out.trim_end().to_string())
        }
        AppEvent::ShowSuggestions(items) if items.is_empty() => None,
        AppEvent::ShowSuggestions(items) => {
            let mut out = "Suggestions (`pick <n>`):\n".to_string();
            for (i, item) in items.iter().enumerate() {
                let _ = writeln!(out, "  {}. {}", i + 1, item);
            }
            Some(out.trim_end().to_string())
        }
        AppEvent::ShowFavoriteGroups(groups) => {
            let mut out = String::new();
            let mut position = 0;
            for group in groups {
                let _ = writeln!(out, "{} ({})", group.label, group.count);
                for entry in &group.items {
                    position += 1;
                    push_row(&mut out, position, entry);
                }
            }
            Some(out.trim_end().to_string())
        }
        AppEvent::Status(text) => Some(text.clone()),
        AppEvent::Error(text) => Some(format!("error: {text}")),
        _ => None,
    }
}

fn push_row(out: &mut String, position: usize, entry: &DisplayResult) {
    let _ = write!(out, "  {}. {} | {}", position, entry.bangla, entry.korean);
    if entry.favorite {
        out.push_str(" *");
    }
    if let Some(time) = &entry.time {
        let _ = write!(out, "  {time}");
    }
    out.push('\n');
}
