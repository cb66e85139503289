use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use yubot_core::{ReplyEngine, context_window};

/// Name of the session credential cookie.
pub const SESSION_COOKIE: &str = "yubot_session";

/// Separator between entries of the turn payload.
const TURN_SEPARATOR: char = ';';

/// Shared state for the HTTP transport.
pub struct AppState {
    pub engine: Arc<dyn ReplyEngine>,
}

/// Structured record returned from `POST /message`.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub context: String,
    pub reply: String,
    pub history: Vec<String>,
}

#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/message", post(message))
        .with_state(state)
}

/// Bootstrap a session: mint a token, register it with the engine, bind it
/// to the client, render the chat page.
async fn home(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<impl IntoResponse, StatusCode> {
    let token = Uuid::new_v4().simple().to_string();

    state.engine.register(&token).await.map_err(|e| {
        warn!("Engine registration failed for {token}: {e}");
        StatusCode::BAD_GATEWAY
    })?;

    info!("Bootstrapped session {token}");

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .path("/")
        .build();

    Ok((jar.add(cookie), Html(include_str!("../assets/index.html"))))
}

/// One turn: the client resends its recent history, the last two entries
/// become the context, and the engine's reply goes straight back.
async fn message(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    body: String,
) -> Result<Json<MessageResponse>, StatusCode> {
    let Some(token) = jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) else {
        warn!("Turn request without a session credential");
        return Err(StatusCode::BAD_REQUEST);
    };

    let history = split_turns(&body);
    let context = context_window(&history);

    let reply = state.engine.reply(&context, &token).await.map_err(|e| {
        warn!("Engine reply failed for {token}: {e}");
        StatusCode::BAD_GATEWAY
    })?;

    info!("Reply for {token}: {reply}");

    Ok(Json(MessageResponse {
        context,
        reply,
        history,
    }))
}

fn split_turns(body: &str) -> Vec<String> {
    body.split(TURN_SEPARATOR).map(str::to_owned).collect()
}

/// Bind and run the HTTP transport.
pub async fn serve(state: Arc<AppState>, bind_addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("HTTP transport listening on {bind_addr}");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, header};
    use tower::ServiceExt;

    struct EchoEngine;

    #[async_trait]
    impl ReplyEngine for EchoEngine {
        async fn register(&self, _id: &str) -> anyhow::Result<()> {
            Ok(())
        }

        async fn reply(&self, context: &str, _id: &str) -> anyhow::Result<String> {
            Ok(format!("echo:{context}"))
        }
    }

    struct DownEngine;

    #[async_trait]
    impl ReplyEngine for DownEngine {
        async fn register(&self, _id: &str) -> anyhow::Result<()> {
            anyhow::bail!("down")
        }

        async fn reply(&self, _context: &str, _id: &str) -> anyhow::Result<String> {
            anyhow::bail!("down")
        }
    }

    fn test_router(engine: Arc<dyn ReplyEngine>) -> Router {
        router(Arc::new(AppState { engine }))
    }

    #[test]
    fn split_turns_preserves_entries() {
        assert_eq!(
            split_turns("こんにちは;元気です"),
            vec!["こんにちは".to_string(), "元気です".to_string()]
        );
        assert_eq!(split_turns("solo"), vec!["solo".to_string()]);
    }

    #[tokio::test]
    async fn home_sets_a_session_cookie() {
        let app = test_router(Arc::new(EchoEngine));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(set_cookie.starts_with(SESSION_COOKIE));
        assert!(set_cookie.contains("HttpOnly"));
    }

    #[tokio::test]
    async fn message_round_trips_the_turn_payload() {
        let app = test_router(Arc::new(EchoEngine));

        let request = Request::builder()
            .method("POST")
            .uri("/message")
            .header(header::COOKIE, format!("{SESSION_COOKIE}=tok123"))
            .body(Body::from("こんにちは;元気です"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["context"], "こんにちは [SEP] 元気です");
        assert_eq!(value["reply"], "echo:こんにちは [SEP] 元気です");
        assert_eq!(
            value["history"],
            serde_json::json!(["こんにちは", "元気です"])
        );
    }

    #[tokio::test]
    async fn message_without_credential_is_rejected() {
        let app = test_router(Arc::new(EchoEngine));

        let request = Request::builder()
            .method("POST")
            .uri("/message")
            .body(Body::from("hi"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn engine_failure_maps_to_bad_gateway() {
        let app = test_router(Arc::new(DownEngine));

        let request = Request::builder()
            .method("POST")
            .uri("/message")
            .header(header::COOKIE, format!("{SESSION_COOKIE}=tok123"))
            .body(Body::from("hi"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
