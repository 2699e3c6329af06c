#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use time::macros::datetime;
use time::OffsetDateTime;
use tower::ServiceExt;

use proximity_post::app::clock::{ManualClock, SequentialIds};
use proximity_post::config::AppConfig;
use proximity_post::AppState;

pub const START: OffsetDateTime = datetime!(2024-05-01 12:00 UTC);

pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub clock: Arc<ManualClock>,
}

pub struct TestResponse {
    pub status: StatusCode,
    body_bytes: bytes::Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body_bytes).unwrap_or(Value::Null)
    }

    pub fn error_message(&self) -> String {
        self.json()["error"].as_str().unwrap_or("").to_string()
    }
}

impl TestApp {
    /// An empty store with the clock frozen at `START`.
    pub fn empty() -> Self {
        Self::with_env(&[("SEED_DEMO_POSTS", "false")])
    }

    /// The demo fixture loaded at `START`.
    pub fn seeded() -> Self {
        Self::with_env(&[("SEED_DEMO_POSTS", "true")])
    }

    pub fn with_env(vars: &[(&str, &str)]) -> Self {
        let env: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        let config = AppConfig::from_lookup(|key| env.get(key).cloned())
            .expect("failed to build AppConfig");

        let clock = Arc::new(ManualClock::new(START));
        let state = AppState::from_config(&config, clock.clone(), Arc::new(SequentialIds::default()))
            .expect("failed to build AppState");
        let router = proximity_post::http::router(state.clone());

        TestApp {
            router,
            state,
            clock,
        }
    }

    pub fn advance(&self, by: time::Duration) {
        self.clock.advance(by);
    }

    pub async fn request(&self, method: Method, path: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder()
            .method(method)
            .uri(path)
            .header("host", "localhost");

        let request = if let Some(body) = body {
            builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap()
        } else {
            builder.body(Body::empty()).unwrap()
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot failed");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to collect body")
            .to_bytes();

        TestResponse { status, body_bytes }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Method::GET, path, None).await
    }

    pub async fn post_json(&self, path: &str, body: Value) -> TestResponse {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request(Method::POST, path, None).await
    }

    /// Creates a text post at the given coordinates and returns its id.
    pub async fn create_text_post(&self, text: &str, latitude: f64, longitude: f64) -> String {
        let response = self
            .post_json(
                "/v1/posts",
                serde_json::json!({
                    "media_kind": "text",
                    "text_body": text,
                    "latitude": latitude,
                    "longitude": longitude,
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.error_message());
        response.json()["id"]
            .as_str()
            .expect("post id missing")
            .to_string()
    }
}
