//! POST /get: answers a question from the indexed PDFs.

use axum::{
    Form,
    extract::State,
    http::header,
    response::IntoResponse,
};
use tracing::info;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::chat::chat_request::ChatForm,
};

/// Handler: POST /get
///
/// Returns the model answer as `text/plain`, unchanged.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/get --data-urlencode 'msg=What color is the sky?'
/// ```
pub async fn chat(
    State(state): State<AppState>,
    Form(form): Form<ChatForm>,
) -> AppResult<impl IntoResponse> {
    if form.msg.trim().is_empty() {
        return Err(AppError::EmptyMessage);
    }
    info!(msg_len = form.msg.len(), "POST /get");

    let answer = state.chain.answer(&form.msg).await?;

    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], answer))
}
