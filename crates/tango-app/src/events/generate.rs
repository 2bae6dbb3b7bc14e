use std::sync::Arc;

use kanal::AsyncSender;
use tango_core::{handle_request, respond};
use tango_types::AppEvent;

use crate::state::AppState;

/// A line starting with `{` is a JSON request body, anything else is a bare theme
pub async fn handle_generate(
    state: Arc<AppState>,
    id: u64,
    line: String,
    response_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let response = if line.trim_start().starts_with('{') {
        handle_request(&state.service, &line).await
    } else {
        respond(state.service.generate(&line).await)
    };

    tracing::info!("Request {} answered with status {}", id, response.status);

    response_tx
        .send(AppEvent::Response { id, response })
        .await?;

    Ok(())
}
