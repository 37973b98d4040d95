use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::{AppEvent, event_loop};
use crate::io::spawn_console_reader;
use crate::state::AppState;
use crate::ui::ui_loop;

/// Centralized channel management
pub struct ChannelSet {
    pub app_to_shell: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub shell_to_app: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            app_to_shell: kanal::bounded_async(64),
            shell_to_app: kanal::bounded_async(64),
        }
    }
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Runs the console shell until `:quit`, EOF or Ctrl+C
    pub async fn run(&self) -> anyhow::Result<()> {
        let ChannelSet {
            app_to_shell: (app_to_shell_tx, app_to_shell_rx),
            shell_to_app: (shell_to_app_tx, shell_to_app_rx),
        } = ChannelSet::new();

        tracing::info!(
            endpoints = self.state.resolver.endpoints().len(),
            timeout_seconds = self.state.config.network.timeout_seconds,
            mode = %self.state.resolver.mode(),
            "console shell started"
        );

        // Detached: a thread blocked on stdin must not hold up shutdown
        spawn_console_reader(shell_to_app_tx)?;

        let mut tasks = self.spawn_tasks(shell_to_app_rx, app_to_shell_tx, app_to_shell_rx);

        let cancel = self.cancel_token.clone();
        tokio::spawn(async move {
            tokio::select! {
                result = tokio::signal::ctrl_c() => {
                    if let Err(e) = result {
                        tracing::error!("failed to listen for ctrl+c: {e}");
                    }
                    tracing::info!("Shutdown requested");
                    cancel.cancel();
                }
                _ = cancel.cancelled() => {}
            }
        });

        while let Some(result) = tasks.join_next().await {
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::error!("task exited: {e}");
                    self.shutdown();
                }
                Err(e) => {
                    tracing::error!("task panicked: {e}");
                    self.shutdown();
                }
            }
        }

        Ok(())
    }

    pub fn spawn_tasks(
        &self,
        shell_to_app_rx: AsyncReceiver<AppEvent>,
        app_to_shell_tx: AsyncSender<AppEvent>,
        app_to_shell_rx: AsyncReceiver<AppEvent>,
    ) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        // Event loop owns the only render sender, so the UI loop ends after it
        tasks.spawn(event_loop(
            self.state.clone(),
            shell_to_app_rx,
            app_to_shell_tx,
            self.cancel_token.clone(),
        ));

        tasks.spawn(ui_loop(app_to_shell_rx));

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
