//! Error types for startup self-checks, configuration and the assessment flow,
//! plus the HTTP mapping used by the axum handlers.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use thiserror::Error;
use tracing::error;

use crate::protocol::ErrorOut;

/// Faults in the built-in question bank.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BankError {
  #[error("question bank is empty")]
  Empty,

  #[error("question {id} has an empty prompt")]
  EmptyPrompt { id: String },

  #[error("question {id} has no options")]
  NoOptions { id: String },

  #[error("question id {id} appears more than once")]
  DuplicateId { id: String },

  #[error("question {id} repeats option value {value}")]
  DuplicateOptionValue { id: String, value: u32 },
}

/// Faults in a scoring policy.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PolicyError {
  #[error("scoring policy has no ranges")]
  Empty,

  #[error("scoring policy must start at 0, first range starts at {min}")]
  DoesNotStartAtZero { min: u32 },

  #[error("range {label} is inverted ({min} > {max})")]
  Inverted { label: String, min: u32, max: u32 },

  #[error("scores {from}..={to} are not covered by any range")]
  Gap { from: u32, to: u32 },

  #[error("range {label} overlaps its predecessor at {at}")]
  Overlap { label: String, at: u32 },
}

#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("failed to read config file {path}: {source}")]
  Read {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse config file {path}: {source}")]
  Parse {
    path: String,
    #[source]
    source: toml::de::Error,
  },
}

/// Anything that prevents the service from starting.
#[derive(Error, Debug)]
pub enum StartupError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error("question bank self-check failed: {0}")]
  Bank(#[from] BankError),

  #[error("scoring policy does not cover sample size {sample_size}: {source}")]
  Policy {
    sample_size: usize,
    #[source]
    source: PolicyError,
  },

  #[error("invalid quiz settings: {0}")]
  Settings(String),
}

/// Failures of a single assessment request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssessmentError {
  #[error("sample size {requested} is outside 0..={max}")]
  InvalidSampleSize { requested: i64, max: usize },

  #[error("missing answers for {} question(s): {}", missing.len(), missing.join(", "))]
  IncompleteAssessment { missing: Vec<String> },

  #[error("question {id} is not part of this quiz")]
  UnknownQuestion { id: String },

  #[error("{value} is not a valid option for question {question_id}")]
  InvalidAnswer { question_id: String, value: u32 },

  #[error("quiz {id} not found or already evaluated")]
  UnknownQuiz { id: String },

  #[error("score {score} matched no scoring range")]
  ClassificationGap { score: u32 },
}

impl AssessmentError {
  /// Stable machine-readable code sent to clients.
  pub fn code(&self) -> &'static str {
    match self {
      AssessmentError::InvalidSampleSize { .. } => "invalid_sample_size",
      AssessmentError::IncompleteAssessment { .. } => "incomplete_assessment",
      AssessmentError::UnknownQuestion { .. } => "unknown_question",
      AssessmentError::InvalidAnswer { .. } => "invalid_answer",
      AssessmentError::UnknownQuiz { .. } => "unknown_quiz",
      AssessmentError::ClassificationGap { .. } => "classification_gap",
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      AssessmentError::InvalidSampleSize { .. }
      | AssessmentError::IncompleteAssessment { .. }
      | AssessmentError::UnknownQuestion { .. }
      | AssessmentError::InvalidAnswer { .. } => StatusCode::BAD_REQUEST,
      AssessmentError::UnknownQuiz { .. } => StatusCode::NOT_FOUND,
      AssessmentError::ClassificationGap { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  /// Client-facing body. Internal faults are logged and replaced by a generic message.
  pub fn to_out(&self) -> ErrorOut {
    let message = match self {
      AssessmentError::ClassificationGap { .. } => {
        error!(target: "assessment", error = %self, "Scoring policy gap; check tier configuration");
        "The assessment could not be scored. Please try again later.".to_string()
      }
      other => other.to_string(),
    };
    ErrorOut { error: self.code().to_string(), message }
  }
}

#[derive(Debug)]
pub struct ApiError(pub AssessmentError);

impl From<AssessmentError> for ApiError {
  fn from(e: AssessmentError) -> Self {
    ApiError(e)
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    (self.0.status(), Json(self.0.to_out())).into_response()
  }
}
