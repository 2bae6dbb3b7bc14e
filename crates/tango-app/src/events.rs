use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use tango_types::AppEvent;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

pub mod generate;

use generate::handle_generate;

/// Dispatches requests; each one runs as its own task
pub async fn event_loop(
    state: Arc<AppState>,
    request_rx: AsyncReceiver<AppEvent>,
    response_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let mut in_flight: JoinSet<anyhow::Result<()>> = JoinSet::new();

    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Event loop cancelled with {} requests in flight", in_flight.len());
                return Ok(());
            }
            event = request_rx.recv() => event,
        };

        match event {
            Ok(AppEvent::Request { id, line }) => {
                tracing::debug!("Request {} received", id);
                in_flight.spawn(handle_generate(
                    state.clone(),
                    id,
                    line,
                    response_tx.clone(),
                ));
            }
            Ok(AppEvent::InputClosed) | Err(_) => break,
            Ok(AppEvent::Response { .. }) => {}
        }

        while let Some(done) = in_flight.try_join_next() {
            log_finished(done);
        }
    }

    // Input is done; let outstanding requests answer
    let pending = in_flight.len();
    tokio::select! {
        _ = cancel.cancelled() => {
            tracing::info!("Event loop cancelled while draining {} requests", pending);
        }
        _ = async {
            while let Some(done) = in_flight.join_next().await {
                log_finished(done);
            }
        } => {
            tracing::debug!("All requests answered");
        }
    }

    Ok(())
}

fn log_finished(done: Result<anyhow::Result<()>, JoinError>) {
    match done {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!("request task failed: {e:#}"),
        Err(e) => tracing::error!("request task panicked: {e}"),
    }
}
