//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::assessment::Answers;
use crate::domain::{Evaluation, Question, Quiz, ScoringRange};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    NewQuiz {
        #[serde(default, rename = "sampleSize")]
        sample_size: Option<i64>,
    },
    SubmitAnswers {
        #[serde(rename = "quizId")]
        quiz_id: String,
        answers: Answers,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Quiz { quiz: QuizOut },
    Evaluation { evaluation: EvaluationOut },
    Error { code: String, message: String },
}

/// DTO used by both WS and HTTP for quiz delivery.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOut {
    pub id: String,
    pub title: String,
    pub description: String,
    pub questions: Vec<Question>,
    pub scoring_ranges: Vec<ScoringRange>,
}

pub fn quiz_out(q: &Quiz) -> QuizOut {
    QuizOut {
        id: q.id.clone(),
        title: q.title.clone(),
        description: q.description.clone(),
        questions: q.questions.clone(),
        scoring_ranges: q.scoring.ranges().to_vec(),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationOut {
    pub quiz_id: String,
    pub total_score: u32,
    pub max_score: u32,
    pub answered: usize,
    pub tier: ScoringRange,
}

pub fn evaluation_out(quiz_id: &str, e: Evaluation) -> EvaluationOut {
    EvaluationOut {
        quiz_id: quiz_id.to_string(),
        total_score: e.total_score,
        max_score: e.max_score,
        answered: e.answered,
        tier: e.tier,
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuery {
    pub sample_size: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswersIn {
    pub quiz_id: String,
    pub answers: Answers,
}

#[derive(Serialize)]
pub struct QuestionsOut {
    pub questions: Vec<Question>,
}

#[derive(Serialize)]
pub struct PolicyOut {
    pub tiers: Vec<ScoringRange>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorOut {
    pub error: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_use_snake_case_tags() {
        let msg: ClientWsMessage = serde_json::from_str(r#"{"type":"new_quiz","sampleSize":5}"#).unwrap();
        assert!(matches!(msg, ClientWsMessage::NewQuiz { sample_size: Some(5) }));

        let msg: ClientWsMessage = serde_json::from_str(r#"{"type":"new_quiz"}"#).unwrap();
        assert!(matches!(msg, ClientWsMessage::NewQuiz { sample_size: None }));

        let msg: ClientWsMessage =
            serde_json::from_str(r#"{"type":"submit_answers","quizId":"abc","answers":{"q1":3}}"#).unwrap();
        match msg {
            ClientWsMessage::SubmitAnswers { quiz_id, answers } => {
                assert_eq!(quiz_id, "abc");
                assert_eq!(answers.get("q1"), Some(&3));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn server_errors_serialize_with_code() {
        let out = serde_json::to_value(ServerWsMessage::Error { code: "unknown_quiz".into(), message: "gone".into() }).unwrap();
        assert_eq!(out, serde_json::json!({"type": "error", "code": "unknown_quiz", "message": "gone"}));
    }
}
