//! Chat API endpoints.

use axum::{extract::State, Json};
use serde::Serialize;

use super::{success, ApiResult};
use crate::models::{ChatMessage, OutgoingMessage, SendMessageRequest};
use crate::AppState;

/// Room snapshot returned on join.
#[derive(Debug, Serialize)]
pub struct ChatRoomView {
    pub room: String,
    pub connected: bool,
    pub messages: Vec<ChatMessage>,
}

/// POST /api/chat/join - Connect and start collecting messages.
pub async fn join_chat(State(state): State<AppState>) -> ApiResult<ChatRoomView> {
    let messages = state.chat.join();
    success(ChatRoomView {
        room: state.chat.name().to_string(),
        connected: state.chat.is_joined(),
        messages,
    })
}

/// POST /api/chat/leave - Stop collecting and disconnect.
pub async fn leave_chat(State(state): State<AppState>) -> ApiResult<()> {
    state.chat.leave();
    success(())
}

/// GET /api/chat/messages - Messages collected so far.
pub async fn list_messages(State(state): State<AppState>) -> ApiResult<Vec<ChatMessage>> {
    success(state.chat.messages())
}

/// POST /api/chat/messages - Send as the current user; the echo arrives later.
pub async fn send_message(
    State(state): State<AppState>,
    Json(request): Json<SendMessageRequest>,
) -> ApiResult<OutgoingMessage> {
    let sender = state.session.current().await;
    success(state.chat.send(&request.content, sender.as_ref())?)
}
