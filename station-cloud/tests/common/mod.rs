//! Shared harness: seeded in-memory store, a local mock of the Chapa API
//! and helpers to drive the router.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use http::{HeaderMap, Request, StatusCode, header};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use shared::models::{Citizen, Role, User};
use station_cloud::auth::create_token;
use station_cloud::db::MemoryStore;
use station_cloud::payment::ChapaClient;
use station_cloud::{AppState, Config, api};
use tower::ServiceExt;

pub const STATION: &str = "s-1";
pub const OTHER_STATION: &str = "s-2";
pub const REGISTRAR: &str = "u-registrar";
pub const ADMIN: &str = "u-admin";
pub const OTHER_REGISTRAR: &str = "u-other";
pub const CITIZEN: &str = "c-1";
pub const OTHER_CITIZEN: &str = "c-3";

pub const JWT_SECRET: &str = "integration-jwt-secret";
pub const WEBHOOK_SECRET: &str = "integration-webhook-secret";
pub const CHAPA_KEY: &str = "CHASECK_TEST-integration";

/// Canned mock answer
#[derive(Debug, Clone)]
pub struct Canned {
    pub status: u16,
    pub body: String,
    pub delay: Option<Duration>,
}

impl Canned {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Debug)]
pub struct Script {
    pub initialize: Canned,
    pub verify: Canned,
    pub init_requests: Vec<Value>,
    pub verify_refs: Vec<String>,
    pub auth_headers: Vec<String>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            initialize: Canned::json(
                200,
                json!({
                    "status": "success",
                    "message": "Hosted Link",
                    "data": { "checkout_url": "https://pay.example/abc" }
                }),
            ),
            verify: Canned::json(
                200,
                json!({
                    "status": "success",
                    "message": "Payment details",
                    "data": { "status": "success", "amount": 500, "currency": "ETB" }
                }),
            ),
            init_requests: Vec::new(),
            verify_refs: Vec::new(),
            auth_headers: Vec::new(),
        }
    }
}

type Shared = Arc<Mutex<Script>>;

/// Local stand-in for `https://api.chapa.co/v1`
pub struct MockChapa {
    pub base_url: String,
    pub script: Shared,
}

impl MockChapa {
    pub fn set_initialize(&self, canned: Canned) {
        self.script.lock().unwrap().initialize = canned;
    }

    pub fn set_verify(&self, canned: Canned) {
        self.script.lock().unwrap().verify = canned;
    }

    pub fn init_requests(&self) -> Vec<Value> {
        self.script.lock().unwrap().init_requests.clone()
    }

    pub fn verify_calls(&self) -> usize {
        self.script.lock().unwrap().verify_refs.len()
    }

    pub fn auth_headers(&self) -> Vec<String> {
        self.script.lock().unwrap().auth_headers.clone()
    }
}

async fn reply(canned: Canned) -> Response {
    if let Some(delay) = canned.delay {
        tokio::time::sleep(delay).await;
    }
    let status = StatusCode::from_u16(canned.status).unwrap();
    (status, [(header::CONTENT_TYPE, "application/json")], canned.body).into_response()
}

fn record_auth(script: &Shared, headers: &HeaderMap) {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    script.lock().unwrap().auth_headers.push(auth);
}

async fn initialize(State(script): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    record_auth(&script, &headers);
    let canned = {
        let mut s = script.lock().unwrap();
        s.init_requests.push(body);
        s.initialize.clone()
    };
    reply(canned).await
}

async fn verify(
    State(script): State<Shared>,
    headers: HeaderMap,
    Path(tx_ref): Path<String>,
) -> Response {
    record_auth(&script, &headers);
    let canned = {
        let mut s = script.lock().unwrap();
        s.verify_refs.push(tx_ref);
        s.verify.clone()
    };
    reply(canned).await
}

pub async fn spawn_mock_chapa() -> MockChapa {
    let script: Shared = Arc::new(Mutex::new(Script::default()));
    let app = Router::new()
        .route("/transaction/initialize", post(initialize))
        .route("/transaction/verify/{tx_ref}", get(verify))
        .with_state(script.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockChapa {
        base_url: format!("http://{addr}"),
        script,
    }
}

pub fn config(chapa_base_url: &str) -> Config {
    Config {
        database_url: "postgres://unused".into(),
        http_port: 0,
        environment: "development".into(),
        chapa_base_url: chapa_base_url.to_string(),
        chapa_secret_key: CHAPA_KEY.into(),
        chapa_encryption_key: None,
        chapa_webhook_secret: Some(WEBHOOK_SECRET.into()),
        app_base_url: "https://app.test".into(),
        jwt_secret: JWT_SECRET.into(),
        gateway_timeout: Duration::from_secs(2),
        currency: "ETB".into(),
        normal_price: Decimal::from(300),
        urgent_price: Decimal::from(600),
    }
}

pub async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    for (id, role, station) in [
        (REGISTRAR, Role::StationRegistrar, Some(STATION)),
        (ADMIN, Role::StationAdmin, Some(STATION)),
        (OTHER_REGISTRAR, Role::StationRegistrar, Some(OTHER_STATION)),
    ] {
        store
            .add_user(User {
                id: id.into(),
                username: id.into(),
                role,
                station_id: station.map(str::to_string),
            })
            .await;
    }
    for (id, station) in [(CITIZEN, STATION), (OTHER_CITIZEN, OTHER_STATION)] {
        store
            .add_citizen(Citizen {
                id: id.into(),
                station_id: station.into(),
                first_name: "Abebe".into(),
                last_name: "Kebede".into(),
                phone_number: "0911000000".into(),
                is_verified: true,
            })
            .await;
    }
    store
}

/// Router over a seeded store and the real Chapa client pointed at `mock`
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub mock: MockChapa,
}

impl TestApp {
    pub async fn new() -> Self {
        let mock = spawn_mock_chapa().await;
        let config = config(&mock.base_url);
        let store = seeded_store().await;
        let gateway =
            ChapaClient::new(&config.chapa_base_url, &config.chapa_secret_key, config.gateway_timeout)
                .unwrap();
        let state = AppState::from_parts(store.clone(), Arc::new(gateway), &config);
        Self {
            router: api::create_router(state),
            store,
            mock,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }
}

pub fn bearer(user_id: &str, role: Role) -> String {
    format!("Bearer {}", create_token(user_id, role, JWT_SECRET).unwrap())
}

pub fn get_as(uri: &str, user: Option<(&str, Role)>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some((id, role)) = user {
        builder = builder.header(header::AUTHORIZATION, bearer(id, role));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, user: Option<(&str, Role)>, body: Value) -> Request<Body> {
    let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some((id, role)) = user {
        builder = builder.header(header::AUTHORIZATION, bearer(id, role));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}
