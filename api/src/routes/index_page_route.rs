//! GET /: the chat page.

use axum::response::Html;

const CHAT_PAGE: &str = include_str!("../../templates/chat.html");

pub async fn index_page() -> Html<&'static str> {
    Html(CHAT_PAGE)
}
