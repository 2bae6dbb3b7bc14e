use anyhow::Context;
use kanal::{AsyncReceiver, AsyncSender};
use serde::Serialize;
use tango_types::{ApiResponse, AppEvent};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

#[derive(Serialize)]
struct ResponseLine<'a> {
    id: u64,
    #[serde(flatten)]
    response: &'a ApiResponse,
}

/// Turn input lines into numbered request events
pub async fn read_requests<R>(
    input: R,
    request_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let mut lines = input.lines();
    let mut next_id = 0u64;

    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Request reader stopping");
                return Ok(());
            }
            line = lines.next_line() => line.context("Failed to read request line")?,
        };

        let Some(line) = line else {
            tracing::info!("Input closed after {} requests", next_id);
            let _ = request_tx.send(AppEvent::InputClosed).await;
            return Ok(());
        };

        if line.is_empty() {
            continue;
        }

        next_id += 1;
        if request_tx
            .send(AppEvent::Request { id: next_id, line })
            .await
            .is_err()
        {
            tracing::debug!("Event loop gone, request reader stopping");
            return Ok(());
        }
    }
}

/// Write one JSON line per response until every sender is gone
pub async fn write_responses<W>(
    mut output: W,
    response_rx: AsyncReceiver<AppEvent>,
) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    while let Ok(event) = response_rx.recv().await {
        let AppEvent::Response { id, response } = event else {
            continue;
        };

        let mut line = serde_json::to_string(&ResponseLine {
            id,
            response: &response,
        })?;
        line.push('\n');

        output
            .write_all(line.as_bytes())
            .await
            .context("Failed to write response")?;
        output.flush().await?;
    }

    tracing::debug!("Response writer finished");
    Ok(())
}
