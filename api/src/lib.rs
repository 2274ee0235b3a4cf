//! HTTP front end: chat page and question endpoint.

pub mod core;
pub mod error_handler;
mod routes;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use crate::core::app_state::{AppState, DEFAULT_API_ADDRESS, api_address_from_env};
pub use crate::error_handler::{AppError, AppResult};

use crate::routes::{chat::chat_route::chat, index_page_route::index_page};

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/get", post(chat))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Binds `addr` and serves until Ctrl+C.
///
/// # Errors
/// [`AppError::Bind`] if the address is unavailable, [`AppError::Server`] on I/O failure.
pub async fn start(state: AppState, addr: &str) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| AppError::Bind {
            addr: addr.to_string(),
            source,
        })?;
    info!("listening on http://{addr}");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ai_llm_service::{
        AiLlmError, LlmProvider, ProviderError, ProviderErrorKind,
        error_handler::HttpError,
    };
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use contextor::{ChatFuture, ChatModel, RagChain};
    use doc_ingest::{Chunk, DocumentMetadata};
    use rag_store::test_support::KeywordEmbedder;
    use rag_store::{IndexEntry, Retriever, VectorIndex};
    use tower::ServiceExt;

    use super::*;

    enum Reply {
        Text(&'static str),
        Unauthorized,
        Timeout,
    }

    struct FixedChat(Reply);

    impl ChatModel for FixedChat {
        fn complete<'a>(&'a self, _system: &'a str, user: &'a str) -> ChatFuture<'a> {
            Box::pin(async move {
                let kind = match &self.0 {
                    Reply::Text(t) => {
                        assert!(user.contains("Question:"));
                        return Ok(t.to_string());
                    }
                    Reply::Unauthorized => ProviderErrorKind::Unauthorized(HttpError {
                        status: StatusCode::FORBIDDEN,
                        url: "http://gemini.test".into(),
                        snippet: "API key not valid".into(),
                    }),
                    Reply::Timeout => ProviderErrorKind::Timeout,
                };
                Err(AiLlmError::from(ProviderError::new(LlmProvider::Gemini, kind)))
            })
        }
    }

    fn app(reply: Reply) -> Router {
        let entries = ["The sky is blue.", "Grass is green."]
            .iter()
            .enumerate()
            .map(|(i, t)| {
                IndexEntry::new(
                    Chunk {
                        text: t.to_string(),
                        metadata: DocumentMetadata {
                            source: "data/colors.pdf".into(),
                            page: 0,
                        },
                        chunk_index: i,
                    },
                    KeywordEmbedder::vector(t),
                )
            })
            .collect();
        let index = VectorIndex::new("keyword-test", KeywordEmbedder::DIM, entries).unwrap();
        let retriever = Retriever::new(Arc::new(index), Arc::new(KeywordEmbedder), 3).unwrap();
        let chain = RagChain::new(retriever, Arc::new(FixedChat(reply)));
        router(AppState::new(chain))
    }

    fn post_form(body: &'static str) -> Request<Body> {
        Request::post("/get")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_string(resp: axum::response::Response) -> String {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn index_serves_the_chat_page() {
        let resp = app(Reply::Text("x"))
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let ct = resp.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
        assert!(ct.starts_with("text/html"));
        let html = body_string(resp).await;
        assert!(html.contains("/get"));
        assert!(html.contains("msg"));
    }

    #[tokio::test]
    async fn question_returns_plain_text_answer() {
        let resp = app(Reply::Text("The sky is blue."))
            .oneshot(post_form("msg=What+color+is+the+sky%3F"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(body_string(resp).await, "The sky is blue.");
    }

    #[tokio::test]
    async fn blank_message_is_rejected_with_json_error() {
        let resp = app(Reply::Text("unused"))
            .oneshot(post_form("msg=+++"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(body["error"], "EMPTY_MESSAGE");
    }

    #[tokio::test]
    async fn empty_message_field_is_rejected() {
        let resp = app(Reply::Text("unused"))
            .oneshot(post_form("msg="))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(body["error"], "EMPTY_MESSAGE");
    }

    #[tokio::test]
    async fn missing_field_is_a_client_error() {
        let resp = app(Reply::Text("unused"))
            .oneshot(post_form("question=hi"))
            .await
            .unwrap();
        assert!(resp.status().is_client_error());
    }

    #[tokio::test]
    async fn rejected_credential_maps_to_bad_gateway() {
        let resp = app(Reply::Unauthorized)
            .oneshot(post_form("msg=sky"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let body: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(body["error"], "UPSTREAM_ERROR");
    }

    #[tokio::test]
    async fn upstream_timeout_maps_to_gateway_timeout() {
        let resp = app(Reply::Timeout)
            .oneshot(post_form("msg=sky"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let resp = app(Reply::Text("x"))
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
