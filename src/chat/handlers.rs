//! REST API handlers for the support chat widget

use super::models::*;
use crate::cart::{helpers::*, state::SharedState};
use crate::error::{AppError, Result};
use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Creates routes for chat-related operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/chat", get(get_chat))
        .route("/chat/open", post(open_chat))
        .route("/chat/close", post(close_chat))
        .route("/chat/messages", post(submit_message))
}

fn respond(view: ChatView, session_id: &str, is_new: bool) -> Response {
    with_session_cookie(Json(view).into_response(), session_id, is_new)
}

/// Endpoint: GET /chat
async fn get_chat(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let (session_id, is_new) = resolve_session_id(&headers);
    let view = state.session(&session_id).chat.view();
    respond(view, &session_id, is_new)
}

/// Endpoint: POST /chat/open
async fn open_chat(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let (session_id, is_new) = resolve_session_id(&headers);
    let view = {
        let mut session = state.session(&session_id);
        session.chat.open();
        session.chat.view()
    };
    respond(view, &session_id, is_new)
}

/// Endpoint: POST /chat/close
async fn close_chat(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let (session_id, is_new) = resolve_session_id(&headers);
    let view = {
        let mut session = state.session(&session_id);
        session.chat.close();
        session.chat.view()
    };
    respond(view, &session_id, is_new)
}

/// Endpoint: POST /chat/messages
/// Appends the user's message; the bot answers later on its own timer.
async fn submit_message(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<SubmitMessageInput>,
) -> Result<Response> {
    let (session_id, is_new) = resolve_session_id(&headers);
    let view = {
        let session = state.session(&session_id);
        session
            .chat
            .submit(&payload.text)
            .map(|_| session.chat.view())
    };

    let Some(view) = view else {
        // The 400 carries no cookie; a session minted for it is unreachable.
        if is_new {
            state.end_session(&session_id);
        }
        return Err(AppError::BadRequest("message is empty".into()));
    };

    tracing::debug!(session = %session_id, "Chat message received");
    Ok(respond(view, &session_id, is_new))
}
