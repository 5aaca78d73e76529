//! Exposes an in-process key/value store for use in integration tests.

use std::collections::HashMap;
use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Form, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use serde::Deserialize;
use tokio::runtime::Runtime;

/// An in-process key/value store for use in integration tests.
///
/// The store speaks the same `/set`, `/get` and `/del` protocol as a real
/// remote and keeps a journal of every operation it serves, in arrival
/// order. It owns its runtime so that plain test functions can drive it
/// with blocking requests. It listens on a random available port on
/// localhost.
#[derive(Debug)]
pub struct TestServer {
    _runtime: Runtime,
    socket: SocketAddr,
    state: ServerState,
}

impl TestServer {
    pub fn spawn() -> Self {
        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        let listener = TcpListener::bind(addr).unwrap();
        listener.set_nonblocking(true).unwrap();
        let socket = listener.local_addr().unwrap();

        let state = ServerState::default();
        let router = Router::new()
            .route("/set", post(handle_set))
            .route("/get", get(handle_get))
            .route("/del", delete(handle_del))
            .with_state(state.clone());

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.spawn(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            _runtime: runtime,
            socket,
            state,
        }
    }

    /// Returns the base URL pointing to this store.
    ///
    /// This URL uses `localhost` as hostname.
    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.socket.port())
    }

    /// Returns the operations served so far as `(operation, key)` pairs.
    pub fn journal(&self) -> Vec<(String, String)> {
        self.state.journal.lock().unwrap().clone()
    }
}

#[derive(Clone, Debug, Default)]
struct ServerState {
    values: Arc<Mutex<HashMap<String, String>>>,
    journal: Arc<Mutex<Vec<(String, String)>>>,
}

#[derive(Debug, Deserialize)]
struct SetForm {
    key: Option<String>,
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct KeyQuery {
    key: Option<String>,
}

async fn handle_set(
    State(state): State<ServerState>,
    Form(form): Form<SetForm>,
) -> (StatusCode, String) {
    let (Some(key), Some(value)) = (form.key, form.value) else {
        return (
            StatusCode::BAD_REQUEST,
            "Key or value parameter is missing".to_owned(),
        );
    };

    state
        .journal
        .lock()
        .unwrap()
        .push(("SET".to_owned(), key.clone()));
    state.values.lock().unwrap().insert(key.clone(), value);
    (StatusCode::OK, format!("SET success for key {key}"))
}

async fn handle_get(
    State(state): State<ServerState>,
    Query(query): Query<KeyQuery>,
) -> (StatusCode, String) {
    let Some(key) = query.key else {
        return (
            StatusCode::BAD_REQUEST,
            "Key parameter is missing".to_owned(),
        );
    };

    state
        .journal
        .lock()
        .unwrap()
        .push(("GET".to_owned(), key.clone()));
    match state.values.lock().unwrap().get(&key) {
        Some(value) => (StatusCode::OK, format!("GET result for key {key}: {value}")),
        None => (StatusCode::NOT_FOUND, "Key not found".to_owned()),
    }
}

async fn handle_del(
    State(state): State<ServerState>,
    Query(query): Query<KeyQuery>,
) -> (StatusCode, String) {
    let Some(key) = query.key else {
        return (
            StatusCode::BAD_REQUEST,
            "Key parameter is missing".to_owned(),
        );
    };

    state
        .journal
        .lock()
        .unwrap()
        .push(("DELETE".to_owned(), key.clone()));
    match state.values.lock().unwrap().remove(&key) {
        Some(_) => (StatusCode::OK, format!("DEL success for key {key}")),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error deleting key".to_owned(),
        ),
    }
}
