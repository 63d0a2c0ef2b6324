//! in-process stand-ins for the upstream services.

use std::{collections::HashMap, net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{
        Path, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::Response,
    routing::get,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// serves `router` on a random local port.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

    addr
}

/// an address nothing is listening on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// a crafty panel listing `ids`, serving the stats in `stats`.
///
/// listed servers without stats make their stats endpoint fail.
#[derive(Clone)]
pub struct MockPanel {
    token: String,
    ids: Arc<Vec<String>>,
    stats: Arc<HashMap<String, Value>>,
}

impl MockPanel {
    pub fn new(token: &str, ids: &[&str], stats: HashMap<&str, Value>) -> Self {
        Self {
            token: token.to_string(),
            ids: Arc::new(ids.iter().map(ToString::to_string).collect()),
            stats: Arc::new(
                stats
                    .into_iter()
                    .map(|(id, stat)| (id.to_string(), stat))
                    .collect(),
            ),
        }
    }

    pub fn router(self) -> Router {
        Router::new()
            .route("/api/v2/servers", get(list_servers))
            .route("/api/v2/servers/{id}/stats", get(server_stats))
            .with_state(self)
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<(), StatusCode> {
        let expected = format!("Bearer {}", self.token);
        match headers.get(AUTHORIZATION) {
            Some(value) if value.as_bytes() == expected.as_bytes() => Ok(()),
            _ => Err(StatusCode::UNAUTHORIZED),
        }
    }
}

async fn list_servers(
    State(panel): State<MockPanel>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    panel.authorize(&headers)?;

    let data: Vec<Value> = panel
        .ids
        .iter()
        .map(|id| json!({ "server_id": id, "server_name": format!("server {id}") }))
        .collect();

    Ok(Json(json!({ "status": "ok", "data": data })))
}

async fn server_stats(
    State(panel): State<MockPanel>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    panel.authorize(&headers)?;

    let stat = panel
        .stats
        .get(&id)
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(json!({ "status": "ok", "data": stat })))
}

/// a websocket endpoint at `/ws` that sends `messages`, then waits for the client to leave.
pub fn mock_analytics(messages: Vec<Message>) -> Router {
    Router::new()
        .route("/ws", get(analytics_socket))
        .with_state(Arc::new(messages))
}

async fn analytics_socket(
    ws: WebSocketUpgrade,
    State(messages): State<Arc<Vec<Message>>>,
) -> Response {
    ws.on_upgrade(move |socket| send_all(socket, messages))
}

/// a websocket endpoint at `/ws` that drops the connection right after the upgrade,
/// without a close frame.
pub fn dropping_analytics() -> Router {
    Router::new().route("/ws", get(dropping_socket))
}

async fn dropping_socket(ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(|socket| async move { drop(socket) })
}

async fn send_all(mut socket: WebSocket, messages: Arc<Vec<Message>>) {
    for message in messages.iter() {
        if socket.send(message.clone()).await.is_err() {
            return;
        }
    }

    while let Some(Ok(_)) = socket.recv().await {}
}
