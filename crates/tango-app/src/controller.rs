use std::future::Future;
use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use tango_types::AppEvent;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::event_loop;
use crate::io::{read_requests, write_responses};
use crate::state::AppState;

/// Centralized channel management
pub struct ChannelSet {
    pub requests: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub responses: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new(capacity: usize) -> Self {
        Self {
            requests: kanal::bounded_async(capacity),
            responses: kanal::bounded_async(capacity),
        }
    }
}

/// Task spawning and lifecycle for serve mode
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

    /// Serve until the input ends and every answer is written, or until
    /// `shutdown` resolves, which drops in-flight requests
    pub async fn run<R, W>(
        self,
        input: R,
        output: W,
        shutdown: impl Future<Output = ()>,
    ) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let ChannelSet {
            requests: (request_tx, request_rx),
            responses: (response_tx, response_rx),
        } = ChannelSet::new(self.state.config.serve.channel_capacity);

        let mut tasks: JoinSet<anyhow::Result<()>> = JoinSet::new();

        tasks.spawn(read_requests(
            input,
            request_tx,
            self.cancel_token.child_token(),
        ));

        tasks.spawn(event_loop(
            self.state.clone(),
            request_rx,
            response_tx,
            self.cancel_token.child_token(),
        ));

        tasks.spawn(write_responses(output, response_rx));

        let mut shutdown = std::pin::pin!(shutdown);
        let mut failed = false;

        loop {
            tokio::select! {
                _ = &mut shutdown, if !self.cancel_token.is_cancelled() => {
                    tracing::info!("Shutdown requested");
                    self.cancel_token.cancel();
                }
                joined = tasks.join_next() => match joined {
                    None => break,
                    Some(Ok(Ok(()))) => {}
                    Some(Ok(Err(e))) => {
                        tracing::error!("serve task failed: {e:#}");
                        failed = true;
                        self.cancel_token.cancel();
                    }
                    Some(Err(e)) => {
                        tracing::error!("serve task panicked: {e}");
                        failed = true;
                        self.cancel_token.cancel();
                    }
                },
            }
        }

        if failed {
            anyhow::bail!("serve mode stopped after a task failure");
        }

        Ok(())
    }
}
