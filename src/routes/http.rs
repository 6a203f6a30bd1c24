//! HTTP endpoint handlers. These are thin wrappers that forward to the assessment state.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;
use axum::{extract::{State, Query}, Json, response::IntoResponse};
use tracing::{info, instrument, warn};

use crate::error::ApiError;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_get_questions(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(QuestionsOut { questions: state.engine.questions().to_vec() })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_policy(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(PolicyOut { tiers: state.engine.policy().ranges().to_vec() })
}

#[instrument(level = "info", skip(state), fields(sample_size = ?q.sample_size))]
pub async fn http_get_quiz(
  State(state): State<Arc<AppState>>,
  Query(q): Query<QuizQuery>,
) -> Result<Json<QuizOut>, ApiError> {
  let quiz = state.create_quiz(q.sample_size).await.map_err(|e| {
    warn!(target: "assessment", error = %e, "HTTP quiz request rejected");
    ApiError(e)
  })?;
  info!(target: "assessment", id = %quiz.id, questions = quiz.questions.len(), "HTTP quiz served");
  Ok(Json(quiz_out(&quiz)))
}

#[instrument(level = "info", skip(state, body), fields(quiz_id = %body.quiz_id, answered = body.answers.len()))]
pub async fn http_post_answers(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AnswersIn>,
) -> Result<Json<EvaluationOut>, ApiError> {
  let evaluation = state.submit_answers(&body.quiz_id, &body.answers).await.map_err(|e| {
    warn!(target: "assessment", quiz_id = %body.quiz_id, error = %e, "HTTP answers rejected");
    ApiError(e)
  })?;
  info!(target: "assessment", quiz_id = %body.quiz_id, total = evaluation.total_score, tier = %evaluation.tier.label, "HTTP quiz evaluated");
  Ok(Json(evaluation_out(&body.quiz_id, evaluation)))
}
