//! WebSocket message loop for the agent messaging surface. Each client text frame is
//! one `AgentMessage`; we reply with exactly one `AgentReply` per frame.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};

use crate::logic::handle_agent_payload;
use crate::state::AppState;

#[instrument(level = "info", skip(ws, state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "superlearn_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "superlearn_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        debug!(target: "superlearn_backend", len = txt.len(), "WS received");
        let reply = handle_agent_payload(&state, &txt).await;

        let out = serde_json::to_string(&reply).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "superlearn_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "superlearn_backend", "WebSocket disconnected");
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use futures_util::{SinkExt, StreamExt};
  use serde_json::{json, Value};
  use tokio::net::TcpListener;
  use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};

  use super::*;
  use crate::config::{AgentConfig, Settings};
  use crate::routes::build_router;

  async fn spawn_server() -> String {
    let state = AppState::new(Settings::default(), AgentConfig::default(), None).unwrap();
    let app = build_router(Arc::new(state));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      let _ = axum::serve(listener, app).await;
    });
    format!("ws://{addr}/ws")
  }

  async fn next_frame<S>(ws: &mut S) -> WsMessage
  where
    S: StreamExt<Item = Result<WsMessage, tokio_tungstenite::tungstenite::Error>> + Unpin,
  {
    tokio::time::timeout(Duration::from_secs(5), ws.next())
      .await
      .expect("frame within deadline")
      .expect("stream open")
      .expect("valid frame")
  }

  async fn next_json<S>(ws: &mut S) -> Value
  where
    S: StreamExt<Item = Result<WsMessage, tokio_tungstenite::tungstenite::Error>> + Unpin,
  {
    match next_frame(ws).await {
      WsMessage::Text(txt) => serde_json::from_str(&txt).unwrap(),
      other => panic!("expected text frame, got {other:?}"),
    }
  }

  #[tokio::test]
  async fn one_reply_per_text_frame() {
    let (mut ws, _) = connect_async(spawn_server().await).await.unwrap();

    let quiz = json!({"type": "quiz", "topic": "blockchain", "difficulty": "easy", "num_questions": 1});
    ws.send(WsMessage::Text(quiz.to_string())).await.unwrap();
    let v = next_json(&mut ws).await;
    assert_eq!(v["type"], "quiz");
    assert_eq!(v["questions"].as_array().unwrap().len(), 1);
    assert_eq!(v["questions"][0]["question"], "What is a blockchain?");

    ws.send(WsMessage::Text("not json".into())).await.unwrap();
    let v = next_json(&mut ws).await;
    assert_eq!(v["type"], "error");
  }

  #[tokio::test]
  async fn ping_is_answered_with_pong() {
    let (mut ws, _) = connect_async(spawn_server().await).await.unwrap();
    ws.send(WsMessage::Ping(vec![7, 7])).await.unwrap();
    match next_frame(&mut ws).await {
      WsMessage::Pong(payload) => assert_eq!(payload, vec![7, 7]),
      other => panic!("expected pong, got {other:?}"),
    }
  }
}
