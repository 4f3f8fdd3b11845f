//! A local stand-in for the ECS endpoint, served by axum on 127.0.0.1.

#![allow(dead_code)]

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const REQUEST_ID: &str = "7f4c2a1e-test-request";

/// One request as the server saw it.
#[derive(Debug, Clone)]
pub struct Call {
    pub target: String,
    pub content_type: String,
    pub authorization: String,
    pub host: String,
    pub body: Value,
}

type Reply = dyn Fn(&str, &Value) -> (StatusCode, Value) + Send + Sync;

struct Shared {
    calls: Mutex<Vec<Call>>,
    reply: Box<Reply>,
    delay: Option<Duration>,
}

pub struct FakeEcs {
    pub url: String,
    shared: Arc<Shared>,
}

impl FakeEcs {
    /// Serve `reply(target, body)` for every POST.
    pub async fn start(
        reply: impl Fn(&str, &Value) -> (StatusCode, Value) + Send + Sync + 'static,
    ) -> Self {
        Self::start_with(Box::new(reply), None).await
    }

    /// Like [`FakeEcs::start`] but waits `delay` before answering.
    pub async fn slow(delay: Duration) -> Self {
        Self::start_with(
            Box::new(|_: &str, _: &Value| (StatusCode::OK, serde_json::json!({}))),
            Some(delay),
        )
        .await
    }

    async fn start_with(reply: Box<Reply>, delay: Option<Duration>) -> Self {
        let shared = Arc::new(Shared {
            calls: Mutex::new(Vec::new()),
            reply,
            delay,
        });
        let app = Router::new()
            .route("/", post(handle))
            .with_state(shared.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            url: format!("http://{addr}"),
            shared,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.shared.calls.lock().unwrap().clone()
    }
}

async fn handle(State(shared): State<Arc<Shared>>, headers: HeaderMap, body: String) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };
    let target = header("x-amz-target");
    let body: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    let (status, reply) = (shared.reply)(&target, &body);
    shared.calls.lock().unwrap().push(Call {
        target,
        content_type: header("content-type"),
        authorization: header("authorization"),
        host: header("host"),
        body,
    });
    if let Some(delay) = shared.delay {
        tokio::time::sleep(delay).await;
    }
    (
        status,
        [
            ("content-type", "application/x-amz-json-1.1"),
            ("x-amzn-requestid", REQUEST_ID),
        ],
        reply.to_string(),
    )
        .into_response()
}
