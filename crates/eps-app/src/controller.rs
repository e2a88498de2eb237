use std::sync::Arc;

use eps_types::AppEvent;
use kanal::{AsyncReceiver, AsyncSender};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::event_loop;
use crate::io::watcher_io;
use crate::state::AppState;
use crate::ui::ui_loop;

const COMMAND_CAPACITY: usize = 64;
// Suggestion refreshes and page outcomes can burst while the terminal catches up
const OUTPUT_CAPACITY: usize = 256;

/// Command and output queues shared by the three tasks
pub struct ChannelSet {
    commands: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    output: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            commands: kanal::bounded_async(COMMAND_CAPACITY),
            output: kanal::bounded_async(OUTPUT_CAPACITY),
        }
    }

    pub fn command_sender(&self) -> AsyncSender<AppEvent> {
        self.commands.0.clone()
    }

    pub fn command_receiver(&self) -> AsyncReceiver<AppEvent> {
        self.commands.1.clone()
    }

    pub fn output_sender(&self) -> AsyncSender<AppEvent> {
        self.output.0.clone()
    }

    pub fn output_receiver(&self) -> AsyncReceiver<AppEvent> {
        self.output.1.clone()
    }
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns the channels and the root cancellation token
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            channels: ChannelSet::new(),
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Start the event loop, the renderer and the input watchers.
    /// Each task gets a child token so `shutdown` stops all of them.
    pub fn spawn_tasks(&self) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();
        let channels = &self.channels;

        tasks.spawn(event_loop(
            Arc::clone(&self.state),
            channels.command_receiver(),
            channels.output_sender(),
            self.cancel_token.child_token(),
        ));

        tasks.spawn(ui_loop(
            channels.output_receiver(),
            self.cancel_token.child_token(),
        ));

        tasks.spawn(watcher_io(
            Arc::clone(&self.state),
            self.cancel_token.child_token(),
            channels.command_sender(),
            channels.output_sender(),
        ));

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
