use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use eps_types::AppEvent;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::io::watch_connectivity;

fn scripted(results: Vec<bool>) -> impl FnMut() -> std::future::Ready<bool> {
    let results = Arc::new(Mutex::new(VecDeque::from(results)));
    move || {
        let next = results.lock().unwrap().pop_front().unwrap_or(true);
        std::future::ready(next)
    }
}

async fn next_change(rx: &kanal::AsyncReceiver<AppEvent>) -> bool {
    match timeout(Duration::from_secs(60), rx.recv()).await {
        Ok(Ok(AppEvent::ConnectivityChanged(online))) => online,
        Ok(Ok(other)) => panic!("Wrong event type: {other:?}"),
        Ok(Err(e)) => panic!("Channel error: {}", e),
        Err(_) => panic!("Timeout - no connectivity change"),
    }
}

#[tokio::test(start_paused = true)]
async fn only_changes_are_reported() {
    let (tx, rx) = kanal::unbounded_async();
    let cancel = CancellationToken::new();

    let watcher = tokio::spawn(watch_connectivity(
        scripted(vec![true, true, false, false, true, true]),
        Duration::from_secs(1),
        cancel.clone(),
        tx,
    ));

    assert!(!next_change(&rx).await);
    assert!(next_change(&rx).await);

    cancel.cancel();
    watcher.await.unwrap().unwrap();
    assert!(rx.is_empty());
}

#[tokio::test(start_paused = true)]
async fn starting_offline_is_reported() {
    let (tx, rx) = kanal::unbounded_async();
    let cancel = CancellationToken::new();

    let watcher = tokio::spawn(watch_connectivity(
        scripted(vec![false]),
        Duration::from_secs(1),
        cancel.clone(),
        tx,
    ));

    assert!(!next_change(&rx).await);
    assert!(next_change(&rx).await);

    cancel.cancel();
    watcher.await.unwrap().unwrap();
}
