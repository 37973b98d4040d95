use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use translite_translator::{Endpoint, Mode, Resolver, Source};
use uuid::Uuid;

use crate::state::AppState;

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Captured selection, already trimmed and non-empty
    TextInput(String),
    SelectMode(Mode),
    ListServers,
    /// `None` tests whatever the current mode points at
    TestServer(Option<usize>),
    ShowMode,
    Quit,

    // Render side
    TranslationPending {
        request_id: Uuid,
    },
    ShowTranslation {
        request_id: Uuid,
        text: String,
        source: Source,
    },
    ShowServers {
        endpoints: Vec<Endpoint>,
        mode: Mode,
    },
    Notify(String),
}

/// App's main loop. Each translation runs on its own task; the loop keeps the handles.
///
/// `:quit` lets in-flight requests finish rendering. Cancellation (Ctrl+C)
/// aborts them, also while a `:quit` drain is still waiting.
pub async fn event_loop(
    state: Arc<AppState>,
    shell_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_shell_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                log_join_error(joined);
            }
            event = shell_to_app_rx.recv() => {
                let Ok(event) = event else {
                    tracing::debug!("shell channel closed");
                    break;
                };

                if matches!(event, AppEvent::Quit) {
                    break;
                }

                handle_event(&state, &mut in_flight, &app_to_shell_tx, event).await?;
            }
        }
    }

    let mut aborted = false;
    loop {
        tokio::select! {
            _ = cancel.cancelled(), if !aborted => {
                tracing::debug!(pending = in_flight.len(), "aborting in-flight requests");
                in_flight.abort_all();
                aborted = true;
            }
            joined = in_flight.join_next() => match joined {
                Some(joined) => log_join_error(joined),
                None => break,
            },
        }
    }

    cancel.cancel();
    Ok(())
}

fn log_join_error(joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined
        && !e.is_cancelled()
    {
        tracing::error!("request task panicked: {e}");
    }
}

async fn handle_event(
    state: &AppState,
    in_flight: &mut JoinSet<()>,
    app_to_shell_tx: &AsyncSender<AppEvent>,
    event: AppEvent,
) -> anyhow::Result<()> {
    let resolver = &state.resolver;

    match event {
        AppEvent::TextInput(text) => {
            let request_id = Uuid::new_v4();
            tracing::debug!(%request_id, chars = text.chars().count(), "translation requested");
            app_to_shell_tx
                .send(AppEvent::TranslationPending { request_id })
                .await?;

            in_flight.spawn(translate_request(
                Arc::clone(resolver),
                request_id,
                text,
                app_to_shell_tx.clone(),
            ));
        }
        AppEvent::SelectMode(mode) => {
            let message = match resolver.set_mode(mode) {
                Ok(()) => format!("Switched to: {}", resolver.describe_mode()),
                Err(e) => {
                    tracing::error!("rejected mode change: {e}");
                    format!("Error: {e}")
                }
            };
            app_to_shell_tx.send(AppEvent::Notify(message)).await?;
        }
        AppEvent::ShowMode => {
            app_to_shell_tx
                .send(AppEvent::Notify(format!(
                    "Current mode: {} ({})",
                    resolver.describe_mode(),
                    resolver.mode()
                )))
                .await?;
        }
        AppEvent::ListServers => {
            app_to_shell_tx
                .send(AppEvent::ShowServers {
                    endpoints: resolver.endpoints().to_vec(),
                    mode: resolver.mode(),
                })
                .await?;
        }
        AppEvent::TestServer(index) => {
            let resolver = Arc::clone(resolver);
            let tx = app_to_shell_tx.clone();
            in_flight.spawn(async move {
                let message = test_server(&resolver, index).await;
                if let Err(e) = tx.send(AppEvent::Notify(message)).await {
                    tracing::error!("failed to send test result: {e}");
                }
            });
        }
        AppEvent::Notify(message) => {
            // Shell-side messages (bad console input) are relayed to the renderer
            app_to_shell_tx.send(AppEvent::Notify(message)).await?;
        }
        AppEvent::Quit
        | AppEvent::TranslationPending { .. }
        | AppEvent::ShowTranslation { .. }
        | AppEvent::ShowServers { .. } => {
            // Render-side events, nothing to do here
        }
    }

    Ok(())
}

async fn translate_request(
    resolver: Arc<Resolver>,
    request_id: Uuid,
    text: String,
    tx: AsyncSender<AppEvent>,
) {
    let outcome = resolver.translate(&text).await;
    tracing::info!(%request_id, source = %outcome.source, "translation finished");

    let event = AppEvent::ShowTranslation {
        request_id,
        text: outcome.text,
        source: outcome.source,
    };
    if let Err(e) = tx.send(event).await {
        tracing::error!("failed to send translation: {e}");
    }
}

pub async fn test_server(resolver: &Resolver, index: Option<usize>) -> String {
    let (target, result) = match index {
        Some(index) => (index, resolver.test_endpoint(index).await),
        None => resolver.test_current().await,
    };

    let name = resolver
        .endpoints()
        .get(target)
        .map(|endpoint| endpoint.display_name.clone())
        .unwrap_or_else(|| format!("Server {target}"));

    match result {
        Ok(true) => format!("{name}: reachable"),
        Ok(false) => format!("{name}: unreachable"),
        Err(e) => format!("Error: {e}"),
    }
}
