//! Shared test harness for entity service testing
//!
//! Provides the `Widget` record, a call-counting service wrapper and a fake
//! REST backend built on axum (bound to `127.0.0.1:0`).
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod service_harness;
//! use service_harness::*;
//! ```

#![allow(dead_code)]

pub mod entity_service_tests;

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use indexmap::IndexMap;
use serde_json::{Map, Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use storedesk::prelude::*;

// ---------------------------------------------------------------------------
// Widget: a record exercising every FieldValue variant the pipeline reads
// ---------------------------------------------------------------------------

storedesk::impl_entity!(Widget, "widgets", "widget", {
    name: String,
    price: f64,
    #[serde(default)]
    stock: i64,
    #[serde(default)]
    active: bool,
    #[serde(default)]
    created_at: String,
});

pub fn widget_payload(name: &str, price: f64, stock: i64, active: bool) -> Value {
    json!({
        "name": name,
        "price": price,
        "stock": stock,
        "active": active,
        "created_at": "2024-05-01T09:00:00Z",
    })
}

pub fn widget(id: &str, name: &str, price: f64) -> Widget {
    Widget {
        id: RecordId::new(id),
        name: name.to_string(),
        price,
        stock: 1,
        active: true,
        created_at: "2024-05-01".to_string(),
    }
}

// ---------------------------------------------------------------------------
// CountingService: counts upstream calls, optionally slow
// ---------------------------------------------------------------------------

/// Wraps a service and counts `list` calls reaching it
pub struct CountingService<S> {
    inner: S,
    lists: Arc<AtomicUsize>,
    delay: Duration,
}

impl<S> CountingService<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            lists: Arc::new(AtomicUsize::new(0)),
            delay: Duration::ZERO,
        }
    }

    /// Answer every `list` `delay` after reading the inner service, so
    /// concurrent callers overlap and the answer can be outdated on arrival
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn counter(&self) -> Arc<AtomicUsize> {
        self.lists.clone()
    }
}

#[async_trait]
impl<R, S> EntityService<R> for CountingService<S>
where
    R: Entity,
    S: EntityService<R>,
{
    async fn list(&self) -> Result<Vec<R>> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        let records = self.inner.list().await;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        records
    }

    async fn get(&self, id: &str) -> Result<Option<R>> {
        self.inner.get(id).await
    }

    async fn create(&self, payload: Value) -> Result<R> {
        self.inner.create(payload).await
    }

    async fn update(&self, id: &str, payload: Value) -> Result<R> {
        self.inner.update(id, payload).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.inner.delete(id).await
    }
}

// ---------------------------------------------------------------------------
// FakeBackend: axum server speaking the backend's dialect
// ---------------------------------------------------------------------------

/// Token the fake backend accepts
pub const GOOD_TOKEN: &str = "good-token";

/// State of the fake backend
///
/// Records are stored with backend field names (`title`, `createdAt`) and
/// numeric ids; lists are wrapped in `{"data": [...]}`.
#[derive(Clone, Default)]
pub struct FakeBackend {
    records: Arc<Mutex<IndexMap<String, Value>>>,
    next_id: Arc<AtomicUsize>,
    pub requests: Arc<AtomicUsize>,
    pub last_authorization: Arc<Mutex<Option<String>>>,
    pub last_body: Arc<Mutex<Option<Value>>>,
}

impl FakeBackend {
    pub fn seed(&self, record: Value) {
        let id = record["id"].to_string().trim_matches('"').to_string();
        self.records.lock().unwrap().insert(id, record);
    }

    pub fn authorization(&self) -> Option<String> {
        self.last_authorization.lock().unwrap().clone()
    }

    pub fn body(&self) -> Option<Value> {
        self.last_body.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Record the request and reject tokens other than [`GOOD_TOKEN`]
    fn check(&self, headers: &HeaderMap) -> Option<Response> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        *self.last_authorization.lock().unwrap() = auth.clone();

        match auth {
            Some(value) if value != format!("Bearer {}", GOOD_TOKEN) => Some(
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"detail": "Invalid token"})),
                )
                    .into_response(),
            ),
            _ => None,
        }
    }
}

async fn list_widgets(State(backend): State<FakeBackend>, headers: HeaderMap) -> Response {
    if let Some(rejection) = backend.check(&headers) {
        return rejection;
    }
    let records: Vec<Value> = backend.records.lock().unwrap().values().cloned().collect();
    Json(json!({ "data": records })).into_response()
}

async fn create_widget(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(rejection) = backend.check(&headers) {
        return rejection;
    }
    *backend.last_body.lock().unwrap() = Some(body.clone());

    if body["title"].as_str().is_none_or(|t| t.trim().is_empty()) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"errors": [{"field": "title", "message": "Title is required"}]})),
        )
            .into_response();
    }

    let id = backend.next_id.fetch_add(1, Ordering::SeqCst) + 1;
    let mut record = body.as_object().cloned().unwrap_or_default();
    record.insert("id".to_string(), json!(id));
    let record = Value::Object(record);
    backend
        .records
        .lock()
        .unwrap()
        .insert(id.to_string(), record.clone());

    (StatusCode::CREATED, Json(record)).into_response()
}

async fn get_widget(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Some(rejection) = backend.check(&headers) {
        return rejection;
    }
    match backend.records.lock().unwrap().get(&id) {
        Some(record) => Json(json!({ "data": record })).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response(),
    }
}

async fn update_widget(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Some(rejection) = backend.check(&headers) {
        return rejection;
    }
    *backend.last_body.lock().unwrap() = Some(body.clone());

    let mut records = backend.records.lock().unwrap();
    let Some(Value::Object(record)) = records.get_mut(&id) else {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response();
    };
    let changes: Map<String, Value> = body.as_object().cloned().unwrap_or_default();
    for (key, value) in changes {
        if key != "id" {
            record.insert(key, value);
        }
    }
    Json(Value::Object(record.clone())).into_response()
}

async fn delete_widget(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Some(rejection) = backend.check(&headers) {
        return rejection;
    }
    match backend.records.lock().unwrap().shift_remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response(),
    }
}

async fn broken() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response()
}

/// Start a fake backend; returns its base URL and state
pub async fn spawn_backend() -> (String, FakeBackend) {
    let backend = FakeBackend::default();
    let app = Router::new()
        .route("/widgets", get(list_widgets).post(create_widget))
        .route(
            "/widgets/{id}",
            get(get_widget).put(update_widget).delete(delete_widget),
        )
        .route("/broken", get(broken))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), backend)
}

/// Endpoint matching the fake backend's field names
pub fn widget_endpoint() -> EndpointConfig {
    EndpointConfig::new("/widgets")
        .field("title", "name")
        .field("createdAt", "created_at")
}

/// HTTP widget service over a fresh fake backend, signed in
pub async fn http_widgets() -> HttpEntityService<Widget> {
    let (base_url, _backend) = spawn_backend().await;
    let session = Session::in_memory();
    session.login(GOOD_TOKEN).unwrap();
    let client = ApiClient::new(base_url, session).unwrap();
    HttpEntityService::new(client, widget_endpoint())
}
