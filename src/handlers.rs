use serde::Serialize;
use tracing::{debug, warn};

use crate::conversations::{ChatRequest, ChatResponse, ErrorFrame};
use crate::error::ChatError;
use crate::state::AppState;

/// Process one inbound chat frame and return the frame to send back.
///
/// Failures become an `ErrorFrame` so the connection keeps serving.
pub async fn handle_message(state: &AppState, client_uid: &str, text: &str) -> String {
    match process_frame(state, text).await {
        Ok(response) => {
            debug!("Replying to {} in {}", client_uid, response.detected_source);
            encode_frame(&response)
        }
        Err(e) => {
            warn!("Chat message from {} failed: {}", client_uid, e);
            encode_frame(&ErrorFrame::from(&e))
        }
    }
}

/// Binary frames carry the same JSON as text frames, encoded as UTF-8
pub async fn handle_binary_message(state: &AppState, client_uid: &str, data: &[u8]) -> String {
    match std::str::from_utf8(data) {
        Ok(text) => handle_message(state, client_uid, text).await,
        Err(e) => {
            let err = ChatError::InvalidMessage(format!("binary frame is not UTF-8: {}", e));
            warn!("Chat message from {} failed: {}", client_uid, err);
            encode_frame(&ErrorFrame::from(&err))
        }
    }
}

async fn process_frame(state: &AppState, text: &str) -> Result<ChatResponse, ChatError> {
    let request: ChatRequest =
        serde_json::from_str(text).map_err(|e| ChatError::InvalidMessage(e.to_string()))?;
    state.pipeline.handle(request).await
}

fn encode_frame<T: Serialize>(frame: &T) -> String {
    serde_json::to_string(frame)
        .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string())
}
