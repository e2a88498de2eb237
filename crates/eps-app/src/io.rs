use std::future::Future;
use std::io::BufRead;
use std::sync::Arc;
use std::time::Duration;

use eps_remote::ConnectivityProbe;
use eps_types::AppEvent;
use kanal::AsyncSender;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::command::parse_command;
use crate::state::AppState;

pub async fn watcher_io(
    state: Arc<AppState>,
    cancel: CancellationToken,
    ui_to_app_tx: AsyncSender<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    spawn_stdin_reader(ui_to_app_tx.clone(), app_to_ui_tx);

    let (assume_online, endpoint, interval, timeout) = {
        let config = state.config.read().await;
        (
            config.assume_online,
            config.catalog.endpoint.clone(),
            config.network.probe_interval(),
            config.network.probe_timeout(),
        )
    };

    let probe = if assume_online {
        None
    } else {
        ConnectivityProbe::for_endpoint(&endpoint, timeout)
    };

    let Some(probe) = probe else {
        if !assume_online {
            tracing::warn!("Cannot probe '{}', connectivity is not watched", endpoint);
        }
        cancel.cancelled().await;
        return Ok(());
    };

    tracing::info!("Watching connectivity to {}", probe.target());
    watch_connectivity(move || probe_once(probe.clone()), interval, cancel, ui_to_app_tx).await
}

async fn probe_once(probe: ConnectivityProbe) -> bool {
    probe.check().await
}

/// Poll `check` every `period` and report changes. The first observation
/// is reported only when it is offline, online is the starting assumption.
pub async fn watch_connectivity<F, Fut>(
    mut check: F,
    period: Duration,
    cancel: CancellationToken,
    ui_to_app_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last: Option<bool> = None;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Connectivity watcher stopping");
                break;
            }
            _ = ticker.tick() => {
                let online = check().await;
                if last == Some(online) {
                    continue;
                }
                if last.is_some() || !online {
                    tracing::info!("Connectivity changed: online={}", online);
                    ui_to_app_tx.send(AppEvent::ConnectivityChanged(online)).await?;
                }
                last = Some(online);
            }
        }
    }

    Ok(())
}

/// Blocking stdin reads run on a plain thread so they never hold up
/// runtime shutdown
fn spawn_stdin_reader(ui_to_app_tx: AsyncSender<AppEvent>, app_to_ui_tx: AsyncSender<AppEvent>) {
    let commands = ui_to_app_tx.to_sync();
    let output = app_to_ui_tx.to_sync();

    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    tracing::error!("Failed to read stdin: {}", e);
                    break;
                }
            };

            let sent = match parse_command(&line) {
                Ok(Some(event)) => commands.send(event).is_ok(),
                Ok(None) => true,
                Err(e) => output.send(AppEvent::Error(e.to_string())).is_ok(),
            };
            if !sent {
                return;
            }
        }

        tracing::info!("Stdin closed");
        let _ = commands.send(AppEvent::Quit);
    });
}
