//! Axum-based mock of the auth service's token endpoints
//!
//! Each test starts its own server on an ephemeral port, so tests do not
//! share state.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::{Value, json};
use std::{
    collections::HashSet,
    sync::atomic::{AtomicUsize, Ordering},
    sync::{Arc, Mutex},
};

/// How the mock answers `POST /auth/refresh`.
#[derive(Clone, Copy, Debug, Default)]
pub enum RefreshMode {
    /// Issue `access-<n>` where n counts issued tokens starting at 1.
    #[default]
    Issue,
    /// 200 with a body lacking `new_access_token`.
    NoToken,
    /// Answer with the given status.
    Fail(StatusCode),
    /// 200 with a body that is not JSON.
    Garbage,
}

/// How the mock answers `POST /auth/isTokenValid`.
#[derive(Clone, Copy, Debug, Default)]
pub enum ValidateMode {
    /// `{"valid": true}` for accepted tokens, `{"valid": false}` otherwise.
    #[default]
    Judge,
    /// Answer with the given status.
    Fail(StatusCode),
    /// 200 with a body that is not JSON.
    Garbage,
}

#[derive(Clone, Default)]
pub struct MockAuthState {
    pub valid_tokens: Arc<Mutex<HashSet<String>>>,
    pub validate_mode: Arc<Mutex<ValidateMode>>,
    pub refresh_mode: Arc<Mutex<RefreshMode>>,
    pub validate_calls: Arc<AtomicUsize>,
    pub refresh_bodies: Arc<Mutex<Vec<Value>>>,
    issued: Arc<AtomicUsize>,
}

pub struct MockAuthServer {
    pub base_url: String,
    pub state: MockAuthState,
}

impl MockAuthServer {
    pub async fn start() -> Self {
        let state = MockAuthState::default();
        let app = Router::new()
            .route("/auth/isTokenValid", post(is_token_valid))
            .route("/auth/refresh", post(refresh))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock auth server");
        let addr = listener.local_addr().expect("Mock server has no address");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Mock auth server failed");
        });

        MockAuthServer {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub fn accept_token(&self, token: &str) {
        self.state
            .valid_tokens
            .lock()
            .unwrap()
            .insert(token.to_string());
    }

    pub fn set_validate_mode(&self, mode: ValidateMode) {
        *self.state.validate_mode.lock().unwrap() = mode;
    }

    pub fn set_refresh_mode(&self, mode: RefreshMode) {
        *self.state.refresh_mode.lock().unwrap() = mode;
    }

    pub fn validate_calls(&self) -> usize {
        self.state.validate_calls.load(Ordering::SeqCst)
    }

    pub fn refresh_bodies(&self) -> Vec<Value> {
        self.state.refresh_bodies.lock().unwrap().clone()
    }
}

/// A base URL nothing listens on.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Listener has no address");
    drop(listener);
    format!("http://{addr}")
}

async fn is_token_valid(State(state): State<MockAuthState>, Json(body): Json<Value>) -> Response {
    state.validate_calls.fetch_add(1, Ordering::SeqCst);
    let mode = *state.validate_mode.lock().unwrap();

    match mode {
        ValidateMode::Judge => {
            let token = body.get("token").and_then(Value::as_str).unwrap_or_default();
            let valid = state.valid_tokens.lock().unwrap().contains(token);
            Json(json!({ "valid": valid })).into_response()
        }
        ValidateMode::Fail(status) => {
            (status, Json(json!({ "detail": "validation failed" }))).into_response()
        }
        ValidateMode::Garbage => (StatusCode::OK, "<html>oops</html>").into_response(),
    }
}

async fn refresh(State(state): State<MockAuthState>, Json(body): Json<Value>) -> Response {
    state.refresh_bodies.lock().unwrap().push(body);
    let mode = *state.refresh_mode.lock().unwrap();

    match mode {
        RefreshMode::Issue => {
            let n = state.issued.fetch_add(1, Ordering::SeqCst) + 1;
            Json(json!({
                "new_access_token": format!("access-{n}"),
                "refreshed_token_type": "bearer"
            }))
            .into_response()
        }
        RefreshMode::NoToken => Json(json!({ "refreshed_token_type": "bearer" })).into_response(),
        RefreshMode::Fail(status) => {
            (status, Json(json!({ "detail": "refresh failed" }))).into_response()
        }
        RefreshMode::Garbage => (StatusCode::OK, "<html>oops</html>").into_response(),
    }
}
