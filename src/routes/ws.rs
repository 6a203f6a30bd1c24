//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to the assessment state. We reply with a single JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug, warn};

use crate::protocol::{evaluation_out, quiz_out, ClientWsMessage, ServerWsMessage};
use crate::error::AssessmentError;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "mindspace_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "mindspace_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let reply = handle_text(&txt, &state).await;
        if let Err(e) = socket.send(Message::Text(reply)).await {
          error!(target: "mindspace_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "mindspace_backend", "WebSocket disconnected");
}

/// Parse, dispatch, serialize: one reply per text frame.
pub(crate) async fn handle_text(txt: &str, state: &AppState) -> String {
  let reply_msg = match serde_json::from_str::<ClientWsMessage>(txt) {
    Ok(incoming) => {
      debug!(target: "mindspace_backend", "WS received: {:?}", &incoming);
      handle_client_ws(incoming, state).await
    }
    Err(e) => ServerWsMessage::Error { code: "invalid_json".into(), message: format!("Invalid JSON: {}", e) },
  };

  serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
    serde_json::json!({ "type": "error", "code": "serialization", "message": format!("Serialization error: {}", e) }).to_string()
  })
}

fn error_reply(e: &AssessmentError) -> ServerWsMessage {
  let out = e.to_out();
  ServerWsMessage::Error { code: out.error, message: out.message }
}

#[instrument(level = "info", skip(state))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::NewQuiz { sample_size } => match state.create_quiz(sample_size).await {
      Ok(quiz) => {
        info!(target: "assessment", id = %quiz.id, questions = quiz.questions.len(), "WS quiz served");
        ServerWsMessage::Quiz { quiz: quiz_out(&quiz) }
      }
      Err(e) => {
        warn!(target: "assessment", error = %e, "WS quiz request rejected");
        error_reply(&e)
      }
    },

    ClientWsMessage::SubmitAnswers { quiz_id, answers } => match state.submit_answers(&quiz_id, &answers).await {
      Ok(evaluation) => {
        info!(target: "assessment", %quiz_id, total = evaluation.total_score, tier = %evaluation.tier.label, "WS quiz evaluated");
        ServerWsMessage::Evaluation { evaluation: evaluation_out(&quiz_id, evaluation) }
      }
      Err(e) => {
        warn!(target: "assessment", %quiz_id, error = %e, "WS answers rejected");
        error_reply(&e)
      }
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::AppConfig;
  use serde_json::Value;

  fn state() -> AppState {
    AppState::new(AppConfig::default()).expect("state")
  }

  #[tokio::test]
  async fn ping_gets_pong() {
    let reply: Value = serde_json::from_str(&handle_text(r#"{"type":"ping"}"#, &state()).await).unwrap();
    assert_eq!(reply["type"], "pong");
  }

  #[tokio::test]
  async fn quiz_round_trip_over_messages() {
    let state = state();
    let reply: Value =
      serde_json::from_str(&handle_text(r#"{"type":"new_quiz","sampleSize":4}"#, &state).await).unwrap();
    assert_eq!(reply["type"], "quiz");
    let quiz = &reply["quiz"];
    let questions = quiz["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 4);

    let answers: serde_json::Map<String, Value> =
      questions.iter().map(|q| (q["id"].as_str().unwrap().to_string(), Value::from(3))).collect();
    let submit = serde_json::json!({ "type": "submit_answers", "quizId": quiz["id"], "answers": answers });
    let reply: Value = serde_json::from_str(&handle_text(&submit.to_string(), &state).await).unwrap();
    assert_eq!(reply["type"], "evaluation");
    assert_eq!(reply["evaluation"]["totalScore"], 12);
    assert_eq!(reply["evaluation"]["tier"]["label"], "Moderate Stress");
  }

  #[tokio::test]
  async fn errors_carry_codes() {
    let state = state();
    let reply: Value = serde_json::from_str(&handle_text("not json", &state).await).unwrap();
    assert_eq!(reply["code"], "invalid_json");

    let reply: Value =
      serde_json::from_str(&handle_text(r#"{"type":"new_quiz","sampleSize":-3}"#, &state).await).unwrap();
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["code"], "invalid_sample_size");

    let reply: Value = serde_json::from_str(
      &handle_text(r#"{"type":"submit_answers","quizId":"nope","answers":{}}"#, &state).await,
    )
    .unwrap();
    assert_eq!(reply["code"], "unknown_quiz");
  }
}
