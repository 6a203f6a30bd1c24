//! Application state: the assessment engine and the in-memory store of quizzes
//! that have been handed out but not yet evaluated.
//!
//! A quiz lives in the store from `create_quiz` until a successful
//! `submit_answers`. Rejected answer sets leave it in place so the client can
//! resubmit. The store is bounded; the oldest pending quiz is dropped first.

use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
};
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::assessment::{Answers, StressAssessment};
use crate::bank::{all_questions, default_policy};
use crate::config::AppConfig;
use crate::domain::{Evaluation, Quiz};
use crate::error::{AssessmentError, StartupError};

#[derive(Default)]
struct PendingQuizzes {
    by_id: HashMap<String, Quiz>,
    order: VecDeque<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<StressAssessment>,
    pending: Arc<RwLock<PendingQuizzes>>,
}

impl AppState {
    /// Build state from config: pick the policy, self-check bank and policy.
    #[instrument(level = "info", skip_all)]
    pub fn new(cfg: AppConfig) -> Result<Self, StartupError> {
        let policy = match cfg.policy_override() {
            Some(p) => {
                info!(target: "mindspace_backend", tiers = p.ranges().len(), "Using configured scoring tiers");
                p
            }
            None => default_policy(),
        };

        let engine = StressAssessment::new(all_questions(), policy, cfg.quiz)?;
        let s = engine.settings();
        info!(
            target: "assessment",
            bank_size = engine.questions().len(),
            default_sample_size = s.default_sample_size,
            max_sample_size = s.max_sample_size,
            max_pending = s.max_pending,
            "Assessment engine ready"
        );

        Ok(Self {
            engine: Arc::new(engine),
            pending: Arc::new(RwLock::new(PendingQuizzes::default())),
        })
    }

    /// Sample a new quiz and keep it until it is answered.
    #[instrument(level = "info", skip(self))]
    pub async fn create_quiz(&self, sample_size: Option<i64>) -> Result<Quiz, AssessmentError> {
        let quiz = self.engine.create_quiz(sample_size)?;
        let cap = self.engine.settings().max_pending;

        let mut pending = self.pending.write().await;
        while pending.order.len() >= cap {
            if let Some(old) = pending.order.pop_front() {
                pending.by_id.remove(&old);
                warn!(target: "assessment", dropped = %old, cap, "Pending quiz store full; dropped oldest quiz");
            }
        }
        pending.order.push_back(quiz.id.clone());
        pending.by_id.insert(quiz.id.clone(), quiz.clone());
        Ok(quiz)
    }

    /// Evaluate answers for a pending quiz; the quiz is discarded once scored.
    #[instrument(level = "info", skip(self, answers), fields(%quiz_id, answered = answers.len()))]
    pub async fn submit_answers(&self, quiz_id: &str, answers: &Answers) -> Result<Evaluation, AssessmentError> {
        let mut pending = self.pending.write().await;
        let quiz = pending
            .by_id
            .get(quiz_id)
            .ok_or_else(|| AssessmentError::UnknownQuiz { id: quiz_id.to_string() })?;

        let evaluation = self.engine.evaluate(quiz, answers)?;

        pending.by_id.remove(quiz_id);
        pending.order.retain(|id| id != quiz_id);
        Ok(evaluation)
    }

    /// Number of quizzes awaiting answers.
    #[allow(dead_code)]
    pub async fn pending_len(&self) -> usize {
        self.pending.read().await.by_id.len()
    }
}
