use tango_types::{ApiResponse, GenerateRequest, VocabList};

use crate::error::GenerationError;
use crate::service::GenerationService;

pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

/// Map a generation outcome onto the response boundary
pub fn respond(result: Result<VocabList, GenerationError>) -> ApiResponse {
    match result {
        Ok(vocabulary) => ApiResponse::ok(vocabulary),
        Err(e) => ApiResponse::error(e.status_code(), e.user_message()),
    }
}

/// Full request boundary: JSON body in, status and JSON body out
pub async fn handle_request(service: &GenerationService, body: &str) -> ApiResponse {
    let request: GenerateRequest = match serde_json::from_str(body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!("Invalid request body: {}", e);
            return ApiResponse::error(400, INVALID_BODY_MESSAGE);
        }
    };

    respond(service.generate(&request.theme).await)
}
