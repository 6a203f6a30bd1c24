//! Stress assessment engine: sampling questions, scoring answers and
//! classifying the total.
//!
//! Everything here is synchronous and free of shared mutable state; the only
//! long-lived data is the immutable question bank and scoring policy.

use std::collections::{HashMap, HashSet};

use rand::{seq::SliceRandom, Rng};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::bank::{max_option_value, validate_bank};
use crate::config::QuizSettings;
use crate::domain::{Evaluation, Question, Quiz, ScoringPolicy};
use crate::error::{AssessmentError, StartupError};

/// Answers keyed by question id; each value is the chosen option value.
pub type Answers = HashMap<String, u32>;

/// Draw `count` distinct questions uniformly at random.
#[allow(dead_code)]
pub fn sample(questions: &[Question], count: usize) -> Result<Vec<Question>, AssessmentError> {
  sample_with_rng(questions, count, &mut rand::thread_rng())
}

/// Same as [`sample`] with a caller-supplied RNG.
///
/// Runs a partial Fisher–Yates shuffle over a copy of the bank, so only
/// `count` swaps are performed and every subset is equally likely.
pub fn sample_with_rng<R: Rng + ?Sized>(
  questions: &[Question],
  count: usize,
  rng: &mut R,
) -> Result<Vec<Question>, AssessmentError> {
  if count > questions.len() {
    return Err(AssessmentError::InvalidSampleSize {
      requested: i64::try_from(count).unwrap_or(i64::MAX),
      max: questions.len(),
    });
  }
  let mut pool: Vec<&Question> = questions.iter().collect();
  let (chosen, _) = pool.partial_shuffle(rng, count);
  Ok(chosen.iter().map(|q| (*q).clone()).collect())
}

/// Sum the chosen values of a fully answered quiz.
///
/// Rejects answer sets that miss a quiz question, name a question outside the
/// quiz, or pick a value the question does not offer.
pub fn score(questions: &[Question], answers: &Answers) -> Result<u32, AssessmentError> {
  let in_quiz: HashSet<&str> = questions.iter().map(|q| q.id.as_str()).collect();
  if let Some(stray) = answers.keys().find(|id| !in_quiz.contains(id.as_str())) {
    return Err(AssessmentError::UnknownQuestion { id: stray.clone() });
  }

  let missing: Vec<String> = questions
    .iter()
    .filter(|q| !answers.contains_key(&q.id))
    .map(|q| q.id.clone())
    .collect();
  if !missing.is_empty() {
    return Err(AssessmentError::IncompleteAssessment { missing });
  }

  let mut total = 0u32;
  for q in questions {
    let value = answers[&q.id];
    if !q.accepts(value) {
      return Err(AssessmentError::InvalidAnswer { question_id: q.id.clone(), value });
    }
    total += value;
  }
  Ok(total)
}

/// Bank + policy + settings, checked once at startup.
#[derive(Debug)]
pub struct StressAssessment {
  bank: &'static [Question],
  policy: ScoringPolicy,
  settings: QuizSettings,
}

impl StressAssessment {
  /// Fails when the bank is malformed, the settings are inconsistent, or the
  /// policy leaves some achievable score unclassified.
  pub fn new(bank: &'static [Question], policy: ScoringPolicy, settings: QuizSettings) -> Result<Self, StartupError> {
    validate_bank(bank)?;

    if settings.max_sample_size > bank.len() {
      return Err(StartupError::Settings(format!(
        "max_sample_size {} exceeds bank size {}",
        settings.max_sample_size,
        bank.len()
      )));
    }
    if settings.max_pending == 0 {
      return Err(StartupError::Settings("max_pending must be at least 1".into()));
    }
    if settings.default_sample_size > settings.max_sample_size {
      return Err(StartupError::Settings(format!(
        "default_sample_size {} exceeds max_sample_size {}",
        settings.default_sample_size, settings.max_sample_size
      )));
    }

    // Ranges start at 0 and are contiguous, so covering the largest quiz
    // covers every smaller one too.
    let max_score = u32::try_from(settings.max_sample_size)
      .ok()
      .and_then(|n| n.checked_mul(max_option_value(bank)))
      .unwrap_or(u32::MAX);
    policy
      .validate_coverage(max_score)
      .map_err(|source| StartupError::Policy { sample_size: settings.max_sample_size, source })?;

    Ok(Self { bank, policy, settings })
  }

  pub fn questions(&self) -> &[Question] {
    self.bank
  }

  pub fn policy(&self) -> &ScoringPolicy {
    &self.policy
  }

  pub fn settings(&self) -> &QuizSettings {
    &self.settings
  }

  /// Resolve the requested size against the configured default and bound.
  pub fn resolve_sample_size(&self, requested: Option<i64>) -> Result<usize, AssessmentError> {
    let Some(requested) = requested else {
      return Ok(self.settings.default_sample_size);
    };
    usize::try_from(requested)
      .ok()
      .filter(|n| *n <= self.settings.max_sample_size)
      .ok_or(AssessmentError::InvalidSampleSize { requested, max: self.settings.max_sample_size })
  }

  #[instrument(level = "debug", skip(self))]
  pub fn create_quiz(&self, sample_size: Option<i64>) -> Result<Quiz, AssessmentError> {
    self.create_quiz_with_rng(sample_size, &mut rand::thread_rng())
  }

  pub fn create_quiz_with_rng<R: Rng + ?Sized>(&self, sample_size: Option<i64>, rng: &mut R) -> Result<Quiz, AssessmentError> {
    let count = self.resolve_sample_size(sample_size)?;
    let questions = sample_with_rng(self.bank, count, rng)?;
    let quiz = Quiz {
      id: Uuid::new_v4().to_string(),
      title: self.settings.title.clone(),
      description: self.settings.description.clone(),
      questions,
      scoring: self.policy.clone(),
    };
    debug!(target: "assessment", id = %quiz.id, count, "Quiz sampled");
    Ok(quiz)
  }

  #[instrument(level = "debug", skip(self, quiz, answers), fields(id = %quiz.id, answered = answers.len()))]
  pub fn evaluate(&self, quiz: &Quiz, answers: &Answers) -> Result<Evaluation, AssessmentError> {
    let total_score = score(&quiz.questions, answers)?;
    let tier = self.policy.classify(total_score)?.clone();
    debug!(target: "assessment", id = %quiz.id, total_score, tier = %tier.label, "Quiz scored");
    Ok(Evaluation { total_score, max_score: quiz.max_score(), answered: answers.len(), tier })
  }
}
