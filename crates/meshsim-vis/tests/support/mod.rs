//! In-process stand-in for the simulation engine.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use meshsim_vis::{AppState, EngineClient, Orchestrator, Viewport};
use serde_json::Value;
use tokio::net::TcpListener;
use url::Url;

pub const RING5: &str = "\
nodes:
  - id: A
    neighbors: [B, E]
  - id: B
    neighbors: [A, C]
  - id: C
    neighbors: [B, D]
  - id: D
    neighbors: [C, E]
  - id: E
    neighbors: [D, A]
";

/// Scripted engine behavior plus a record of what the client sent.
#[derive(Default)]
pub struct MockEngine {
    pub topologies: Option<Vec<String>>,
    pub files: HashMap<String, String>,
    pub nodes: Option<Vec<String>>,
    /// Status and body for `/configure`; success when unset
    pub configure_failure: Option<(StatusCode, String)>,
    /// Status for `/nodes`; success when unset
    pub nodes_failure: Option<StatusCode>,
    /// Text frames sent to each event channel subscriber
    pub events: Vec<String>,

    pub configured: Mutex<Vec<Value>>,
    pub sent: Mutex<Vec<Value>>,
    pub node_requests: AtomicUsize,
}

impl MockEngine {
    pub fn ring5() -> Self {
        Self {
            topologies: Some(vec!["line3.yaml".into(), "ring5.yaml".into()]),
            files: HashMap::from([("ring5.yaml".to_string(), RING5.to_string())]),
            nodes: Some(["A", "B", "C", "D", "E"].map(String::from).to_vec()),
            ..Self::default()
        }
    }

    pub fn with_nodes(ids: &[&str]) -> Self {
        Self {
            nodes: Some(ids.iter().map(|s| s.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn configured(&self) -> Vec<Value> {
        self.configured.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<Value> {
        self.sent.lock().unwrap().clone()
    }

    pub fn node_requests(&self) -> usize {
        self.node_requests.load(Ordering::SeqCst)
    }
}

/// A running mock engine and a client wired to it.
pub struct Harness {
    pub engine: Arc<MockEngine>,
    pub base: Url,
    pub state: Arc<AppState>,
    pub orchestrator: Orchestrator,
}

impl Harness {
    pub async fn start(engine: MockEngine) -> Self {
        let engine = Arc::new(engine);
        let app = Router::new()
            .route("/topologies", get(topologies))
            .route("/configure", post(configure))
            .route("/nodes", get(nodes))
            .route("/topo-files/{name}", get(topology_file))
            .route("/send", post(send))
            .route("/ws", get(events))
            .with_state(engine.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let base = Url::parse(&format!("http://{addr}")).unwrap();
        let state = AppState::new(Viewport::default());
        let client = EngineClient::new(base.clone(), Duration::from_secs(5)).unwrap();
        let orchestrator = Orchestrator::new(client, state.clone());

        Self {
            engine,
            base,
            state,
            orchestrator,
        }
    }

    pub async fn log_lines(&self) -> Vec<String> {
        let scene = self.state.scene.read().await;
        scene.log.lines().into_iter().map(String::from).collect()
    }
}

async fn topologies(State(engine): State<Arc<MockEngine>>) -> Json<Option<Vec<String>>> {
    Json(engine.topologies.clone())
}

async fn configure(State(engine): State<Arc<MockEngine>>, Json(body): Json<Value>) -> Response {
    engine.configured.lock().unwrap().push(body);
    match &engine.configure_failure {
        Some((status, text)) => (*status, text.clone()).into_response(),
        None => StatusCode::OK.into_response(),
    }
}

async fn nodes(State(engine): State<Arc<MockEngine>>) -> Response {
    engine.node_requests.fetch_add(1, Ordering::SeqCst);
    match engine.nodes_failure {
        Some(status) => status.into_response(),
        None => Json(engine.nodes.clone()).into_response(),
    }
}

async fn topology_file(State(engine): State<Arc<MockEngine>>, Path(name): Path<String>) -> Response {
    match engine.files.get(&name) {
        Some(text) => text.clone().into_response(),
        None => (StatusCode::NOT_FOUND, "404 page not found").into_response(),
    }
}

async fn send(State(engine): State<Arc<MockEngine>>, Json(body): Json<Value>) -> Response {
    let known = |key: &str| {
        let id = body.get(key).and_then(Value::as_str).unwrap_or_default();
        engine.nodes.iter().flatten().any(|n| n == id)
    };
    let accepted = known("from") && known("to");
    engine.sent.lock().unwrap().push(body);
    if accepted {
        StatusCode::OK.into_response()
    } else {
        (StatusCode::BAD_REQUEST, "invalid node ID").into_response()
    }
}

async fn events(ws: WebSocketUpgrade, State(engine): State<Arc<MockEngine>>) -> Response {
    ws.on_upgrade(move |socket| replay(socket, engine))
}

async fn replay(mut socket: WebSocket, engine: Arc<MockEngine>) {
    for text in &engine.events {
        if socket.send(Message::Text(text.clone().into())).await.is_err() {
            return;
        }
    }
    let _ = socket.send(Message::Binary(vec![0u8, 1, 2].into())).await;
    let _ = socket.send(Message::Close(None)).await;
}
