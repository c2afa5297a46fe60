//! In-process stand-in for the promotions service used by the HTTP tests.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
    time::Duration,
};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header::CONTENT_TYPE, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};
use shared::protocol::PromotionPayload;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone)]
struct StoredPromotion {
    id: i64,
    payload: PromotionPayload,
}

impl StoredPromotion {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.payload.name,
            "type": self.payload.kind,
            "description": self.payload.description,
            "promotion_value": self.payload.promotion_value.parse::<i64>().ok(),
            "promotion_percent": self.payload.promotion_percent.parse::<f64>().ok(),
            "status": self.payload.status,
            "expiry": self.payload.expiry,
            "created_at": "2024-11-01",
            "last_updated_at": "2024-11-02",
        })
    }
}

#[derive(Default)]
struct Store {
    next_id: i64,
    records: BTreeMap<i64, StoredPromotion>,
    requests: Vec<RecordedRequest>,
    retrieve_delays: HashMap<i64, Duration>,
    fail_deletes: bool,
}

#[derive(Clone, Default)]
pub struct FakeServer {
    store: Arc<Mutex<Store>>,
}

impl FakeServer {
    pub async fn seed(&self, payload: PromotionPayload) -> i64 {
        let mut store = self.store.lock().await;
        store.next_id += 1;
        let id = store.next_id;
        store.records.insert(id, StoredPromotion { id, payload });
        id
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.store.lock().await.requests.clone()
    }

    pub async fn contains(&self, id: i64) -> bool {
        self.store.lock().await.records.contains_key(&id)
    }

    pub async fn delay_retrieve(&self, id: i64, delay: Duration) {
        self.store.lock().await.retrieve_delays.insert(id, delay);
    }

    pub async fn fail_deletes(&self) {
        self.store.lock().await.fail_deletes = true;
    }

    async fn record(&self, method: Method, uri: &Uri, headers: &HeaderMap, body: &Bytes) {
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        self.store.lock().await.requests.push(RecordedRequest {
            method,
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            content_type,
            body: String::from_utf8_lossy(body).into_owned(),
        });
    }
}

fn message(status: StatusCode, text: impl Into<String>) -> Response {
    (status, Json(json!({ "message": text.into() }))).into_response()
}

fn not_found(id: &str) -> Response {
    message(
        StatusCode::NOT_FOUND,
        format!("Promotion with id '{id}' was not found."),
    )
}

fn parse_payload(body: &Bytes) -> Result<PromotionPayload, Response> {
    let payload: PromotionPayload = serde_json::from_slice(body).map_err(|err| {
        message(
            StatusCode::BAD_REQUEST,
            format!("Invalid Promotion: body of request contained bad or no data - {err}"),
        )
    })?;
    if !payload.promotion_value.is_empty() && payload.promotion_value.parse::<i64>().is_err() {
        return Err(message(
            StatusCode::BAD_REQUEST,
            "Invalid Promotion: promotion_value must be a number",
        ));
    }
    Ok(payload)
}

async fn list(
    State(server): State<FakeServer>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    server.record(method, &uri, &headers, &Bytes::new()).await;
    let active_only = params.get("status").map(String::as_str) == Some("true");
    let store = server.store.lock().await;
    let listing: Vec<Value> = store
        .records
        .values()
        .rev()
        .filter(|record| !active_only || record.payload.status)
        .map(StoredPromotion::to_json)
        .collect();
    Json(listing).into_response()
}

async fn create(
    State(server): State<FakeServer>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    server.record(method, &uri, &headers, &body).await;
    let payload = match parse_payload(&body) {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    let id = server.seed(payload).await;
    let store = server.store.lock().await;
    match store.records.get(&id) {
        Some(record) => (StatusCode::CREATED, Json(record.to_json())).into_response(),
        None => message(StatusCode::INTERNAL_SERVER_ERROR, "lost record"),
    }
}

async fn retrieve(
    State(server): State<FakeServer>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Response {
    server.record(method, &uri, &headers, &Bytes::new()).await;
    let Ok(id) = raw_id.parse::<i64>() else {
        return not_found(&raw_id);
    };
    let delay = server.store.lock().await.retrieve_delays.get(&id).copied();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    let store = server.store.lock().await;
    match store.records.get(&id) {
        Some(record) => Json(record.to_json()).into_response(),
        None => not_found(&raw_id),
    }
}

async fn update(
    State(server): State<FakeServer>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Response {
    server.record(method, &uri, &headers, &body).await;
    let Ok(id) = raw_id.parse::<i64>() else {
        return not_found(&raw_id);
    };
    let payload = match parse_payload(&body) {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    let mut store = server.store.lock().await;
    match store.records.get_mut(&id) {
        Some(record) => {
            record.payload = payload;
            Json(record.to_json()).into_response()
        }
        None => not_found(&raw_id),
    }
}

async fn delete(
    State(server): State<FakeServer>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Response {
    server.record(method, &uri, &headers, &Bytes::new()).await;
    let mut store = server.store.lock().await;
    if store.fail_deletes {
        return message(StatusCode::INTERNAL_SERVER_ERROR, "database unavailable");
    }
    if let Ok(id) = raw_id.parse::<i64>() {
        store.records.remove(&id);
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn toggle_active(
    State(server): State<FakeServer>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Response {
    server.record(method.clone(), &uri, &headers, &Bytes::new()).await;
    let Ok(id) = raw_id.parse::<i64>() else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let mut store = server.store.lock().await;
    match store.records.get_mut(&id) {
        Some(record) => {
            record.payload.status = method == Method::PUT;
            Json(record.to_json()).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn health(
    State(server): State<FakeServer>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    server.record(method, &uri, &headers, &Bytes::new()).await;
    Json(json!({ "status": 200, "message": "Healthy" })).into_response()
}

pub async fn spawn_fake_server() -> (String, FakeServer) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let server = FakeServer::default();
    let app = Router::new()
        .route("/health", get(health))
        .route("/promotions", get(list).post(create))
        .route("/promotions/:id", get(retrieve).put(update).delete(delete))
        .route(
            "/promotions/:id/activate",
            put(toggle_active).delete(toggle_active),
        )
        .with_state(server.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), server)
}
