//! In-process mock GraphQL endpoint for integration tests.

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{any, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// A running mock server. `/graphql` answers every request with a fixed
/// status and body; `/echo` answers `{"data": <request json>}`.
pub struct MockServer {
    pub base: String,
    captured: Arc<Mutex<Vec<HeaderMap>>>,
}

impl MockServer {
    pub fn graphql_url(&self) -> String {
        format!("{}/graphql", self.base)
    }

    pub fn echo_url(&self) -> String {
        format!("{}/echo", self.base)
    }

    /// Headers of the most recent request.
    pub fn last_headers(&self) -> HeaderMap {
        self.captured
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request captured")
    }

    pub fn request_count(&self) -> usize {
        self.captured.lock().unwrap().len()
    }
}

pub async fn start(body: &'static str) -> MockServer {
    start_with_status(StatusCode::OK, body).await
}

pub async fn start_with_status(status: StatusCode, body: &'static str) -> MockServer {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let graphql_state = captured.clone();
    let echo_state = captured.clone();

    let app = Router::new()
        .route(
            "/graphql",
            any(move |headers: HeaderMap| {
                let state = graphql_state.clone();
                async move {
                    state.lock().unwrap().push(headers);
                    (status, [(CONTENT_TYPE, "application/json")], body)
                }
            }),
        )
        .route(
            "/echo",
            post(move |headers: HeaderMap, Json(payload): Json<Value>| {
                let state = echo_state.clone();
                async move {
                    state.lock().unwrap().push(headers);
                    Json(json!({ "data": payload }))
                }
            }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockServer {
        base: format!("http://{addr}"),
        captured,
    }
}

/// An address nothing is listening on.
pub async fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/graphql")
}
