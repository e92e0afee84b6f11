#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

use endpoint_console::access::ScopeSet;
use endpoint_console::config::Config;
use endpoint_console::form::{EndpointPayload, FormKind};
use endpoint_console::gateway::{EndpointGateway, GatewayError, GatewayTarget};
use endpoint_console::models::{ApiResponse, EndpointRecord};

/// A gateway call as seen by the stub, with the payload already serialized.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create(Value),
    Update(String, Value),
    Fetch(String),
}

/// In-memory backend standing in for the endpoint API.
#[derive(Default)]
pub struct StubGateway {
    records: Mutex<HashMap<String, EndpointRecord>>,
    calls: Mutex<Vec<Call>>,
    failing: AtomicBool,
}

impl StubGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn insert(&self, record: EndpointRecord) {
        self.records
            .lock()
            .unwrap()
            .insert(record.uid.clone(), record);
    }

    pub fn fail_requests(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Payload of the last create or update call.
    pub fn last_payload(&self) -> Option<Value> {
        self.calls().into_iter().rev().find_map(|c| match c {
            Call::Create(body) | Call::Update(_, body) => Some(body),
            Call::Fetch(_) => None,
        })
    }

    fn check(&self) -> Result<(), GatewayError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(GatewayError::Status {
                status: 500,
                message: "backend unavailable".to_string(),
            });
        }
        Ok(())
    }

    fn apply(record: &mut EndpointRecord, payload: &EndpointPayload) {
        record.name = payload.name.clone();
        record.url = payload.url.clone();
        record.description = payload.description.clone();
        record.owner_id = payload.owner_id.clone();
        record.support_email = Some(payload.support_email.clone()).filter(|s| !s.is_empty());
        record.slack_webhook_url =
            Some(payload.slack_webhook_url.clone()).filter(|s| !s.is_empty());
        record.http_timeout = payload.http_timeout.map(|t| t as u64);
        record.rate_limit = payload.rate_limit;
        record.rate_limit_duration = payload.rate_limit_duration;
        record.authentication = payload.authentication.clone();
        record.advanced_signatures = payload.advanced_signatures;
    }
}

#[async_trait]
impl EndpointGateway for StubGateway {
    async fn create(
        &self,
        payload: &EndpointPayload,
    ) -> Result<ApiResponse<EndpointRecord>, GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Create(serde_json::to_value(payload).unwrap()));
        self.check()?;

        let mut record = EndpointRecord {
            uid: Uuid::now_v7().to_string(),
            ..Default::default()
        };
        Self::apply(&mut record, payload);
        self.insert(record.clone());

        Ok(ApiResponse {
            message: "Endpoint created successfully".to_string(),
            data: record,
        })
    }

    async fn update(
        &self,
        endpoint_id: &str,
        payload: &EndpointPayload,
    ) -> Result<ApiResponse<EndpointRecord>, GatewayError> {
        self.calls.lock().unwrap().push(Call::Update(
            endpoint_id.to_string(),
            serde_json::to_value(payload).unwrap(),
        ));
        self.check()?;

        let mut records = self.records.lock().unwrap();
        let record = records.get_mut(endpoint_id).ok_or(GatewayError::Status {
            status: 404,
            message: "endpoint not found".to_string(),
        })?;
        Self::apply(record, payload);

        Ok(ApiResponse {
            message: "Endpoint updated successfully".to_string(),
            data: record.clone(),
        })
    }

    async fn fetch_by_id(
        &self,
        endpoint_id: &str,
    ) -> Result<ApiResponse<EndpointRecord>, GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Fetch(endpoint_id.to_string()));
        self.check()?;

        let record = self
            .records
            .lock()
            .unwrap()
            .get(endpoint_id)
            .cloned()
            .ok_or(GatewayError::Status {
                status: 404,
                message: "endpoint not found".to_string(),
            })?;

        Ok(ApiResponse {
            message: "Endpoint fetched successfully".to_string(),
            data: record,
        })
    }
}

/// Record with every optional section populated.
pub fn full_record(uid: &str) -> EndpointRecord {
    serde_json::from_value(json!({
        "uid": uid,
        "name": "billing-hook",
        "url": "https://billing.example.com/hooks",
        "description": "Billing events",
        "owner_id": "owner-42",
        "support_email": "ops@example.com",
        "slack_webhook_url": "https://hooks.slack.com/services/T000/B000",
        "http_timeout": 30,
        "rate_limit": 100,
        "rate_limit_duration": "1m0s",
        "authentication": {
            "type": "api_key",
            "api_key": { "header_name": "X-Key", "header_value": "abc" }
        },
        "advanced_signatures": true,
        "secrets": [
            { "uid": "old", "value": "expired-secret", "expires_at": "2024-01-01T00:00:00Z" },
            { "uid": "cur", "value": "active-secret" }
        ]
    }))
    .expect("valid endpoint record")
}

/// Record with no optional section populated.
pub fn bare_record(uid: &str) -> EndpointRecord {
    EndpointRecord {
        uid: uid.to_string(),
        name: "plain".to_string(),
        url: "https://plain.example.com/hook".to_string(),
        ..Default::default()
    }
}

pub fn test_config(form_kind: FormKind) -> Config {
    Config {
        api_url: "http://127.0.0.1:0".to_string(),
        target: GatewayTarget::Project {
            project_id: "test-project".to_string(),
            api_key: None,
        },
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        form_kind,
        granted_scopes: vec!["Endpoints|MANAGE".to_string()],
        request_timeout: Duration::from_secs(5),
        log_level: "warn".to_string(),
    }
}

/// A running test server backed by a stub gateway.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub gateway: Arc<StubGateway>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn get_json(&self, path: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn get_html(&self, path: &str) -> (String, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        (resp.text().await.unwrap_or_default(), status)
    }

    pub async fn post_form(&self, path: &str, data: &[(&str, &str)]) -> (String, StatusCode) {
        let body: String = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(data)
            .finish();
        let resp = self
            .client
            .post(self.url(path))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .expect("post form failed");
        let status = resp.status();
        (resp.text().await.unwrap_or_default(), status)
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(FormKind::InApp, &["Endpoints|MANAGE"]).await
}

pub async fn spawn_app_with(form_kind: FormKind, scopes: &[&str]) -> TestApp {
    let gateway = StubGateway::new();
    let app = endpoint_console::build_app(
        test_config(form_kind),
        gateway.clone(),
        Arc::new(ScopeSet::new(scopes.iter().copied())),
    );

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
        gateway,
    }
}

// ── Fake endpoint API ───────────────────────────────────────────

/// A request as received by the fake endpoint API.
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Value,
}

/// Backend answering every request with a canned reply, recording what it saw.
pub struct FakeEndpointApi {
    pub addr: SocketAddr,
    received: Mutex<Vec<ReceivedRequest>>,
    reply: Mutex<(StatusCode, String)>,
}

impl FakeEndpointApi {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn reply_with(&self, status: StatusCode, body: impl Into<String>) {
        *self.reply.lock().unwrap() = (status, body.into());
    }

    pub fn received(&self) -> Vec<ReceivedRequest> {
        self.received.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> ReceivedRequest {
        self.received().pop().expect("no request received")
    }
}

async fn record_request(
    State(api): State<Arc<FakeEndpointApi>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    api.received.lock().unwrap().push(ReceivedRequest {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(String::from),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    let (status, body) = api.reply.lock().unwrap().clone();
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

pub async fn spawn_endpoint_api() -> Arc<FakeEndpointApi> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");

    let api = Arc::new(FakeEndpointApi {
        addr: listener.local_addr().unwrap(),
        received: Mutex::new(Vec::new()),
        reply: Mutex::new((
            StatusCode::OK,
            json!({
                "message": "Endpoint saved",
                "data": { "uid": "ep-1", "name": "orders", "url": "https://orders.example.com" }
            })
            .to_string(),
        )),
    });

    let app = Router::new()
        .fallback(record_request)
        .with_state(api.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    api
}
