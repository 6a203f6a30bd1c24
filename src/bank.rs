//! Built-in question bank and default scoring tiers.
//!
//! The bank is constructed once per process and is read-only afterwards.

use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::domain::{AnswerOption, Question, ScoringPolicy, ScoringRange};
use crate::error::BankError;

/// Frequency scale shared by every built-in question.
const FREQUENCY_SCALE: [(u32, &str); 5] = [
  (0, "Never"),
  (1, "Rarely"),
  (2, "Sometimes"),
  (3, "Often"),
  (4, "Very often"),
];

const PROMPTS: [&str; 50] = [
  // academic
  "How often do you feel overwhelmed by your coursework?",
  "How often do you worry about upcoming exams?",
  "How often do you feel you are falling behind in your classes?",
  "How often do deadlines keep you awake at night?",
  "How often do you feel pressure to get perfect grades?",
  "How often do you find it hard to concentrate while studying?",
  "How often do you procrastinate because a task feels too big?",
  "How often do you feel unprepared for class?",
  "How often do you doubt your ability to finish your degree?",
  "How often do you feel anxious when speaking up in class?",
  // sleep & body
  "How often do you have trouble falling asleep?",
  "How often do you wake up feeling tired?",
  "How often do you get headaches or muscle tension?",
  "How often do you skip meals because you are busy or stressed?",
  "How often do you notice your heart racing for no clear reason?",
  "How often do you feel physically exhausted during the day?",
  "How often do you rely on caffeine to get through the day?",
  "How often do you have stomach problems when you are worried?",
  "How often do you skip exercise because you have no energy?",
  "How often do you sleep fewer than six hours a night?",
  // emotions
  "How often do you feel irritable or short-tempered?",
  "How often do you feel sad or down for no specific reason?",
  "How often do you feel nervous or on edge?",
  "How often do you feel unable to control the important things in your life?",
  "How often do you feel that difficulties are piling up too high to overcome?",
  "How often do you cry or feel close to tears?",
  "How often do you feel hopeless about the future?",
  "How often do you feel restless and unable to sit still?",
  "How often do small problems feel like big ones?",
  "How often do you find it hard to relax?",
  // social
  "How often do you feel lonely, even around other people?",
  "How often do you avoid social situations to get away from stress?",
  "How often do you have conflicts with roommates or family?",
  "How often do you feel you have no one to talk to about problems?",
  "How often do you compare yourself negatively to your peers?",
  "How often do you feel pressure from your family's expectations?",
  "How often do you worry about what others think of you?",
  "How often do you withdraw from friends when things get hard?",
  "How often does social media leave you feeling worse about yourself?",
  "How often do relationship problems distract you from your work?",
  // life & future
  "How often do you worry about money or paying for school?",
  "How often do you feel anxious about finding a job after graduation?",
  "How often do you feel you have too many responsibilities?",
  "How often do you feel you have no time for yourself?",
  "How often do part-time work commitments clash with your studies?",
  "How often do you feel uncertain about your career direction?",
  "How often do you feel stuck in your current situation?",
  "How often do unexpected events throw off your whole week?",
  "How often do you feel you cannot keep up with daily chores?",
  "How often do you feel guilty when you take a break?",
];

static QUESTIONS: Lazy<Vec<Question>> = Lazy::new(|| {
  PROMPTS
    .iter()
    .enumerate()
    .map(|(i, prompt)| Question {
      id: format!("q{}", i + 1),
      prompt: (*prompt).to_string(),
      options: FREQUENCY_SCALE
        .iter()
        .map(|(value, label)| AnswerOption { value: *value, label: (*label).to_string() })
        .collect(),
    })
    .collect()
});

/// The full bank in authored order.
pub fn all_questions() -> &'static [Question] {
  &QUESTIONS
}

/// Highest option value found anywhere in `questions`.
pub fn max_option_value(questions: &[Question]) -> u32 {
  questions.iter().map(Question::max_value).max().unwrap_or(0)
}

/// Startup self-check for a question bank.
pub fn validate_bank(questions: &[Question]) -> Result<(), BankError> {
  if questions.is_empty() {
    return Err(BankError::Empty);
  }

  let mut ids = HashSet::new();
  for q in questions {
    if q.prompt.trim().is_empty() {
      return Err(BankError::EmptyPrompt { id: q.id.clone() });
    }
    if q.options.is_empty() {
      return Err(BankError::NoOptions { id: q.id.clone() });
    }
    if !ids.insert(q.id.as_str()) {
      return Err(BankError::DuplicateId { id: q.id.clone() });
    }
    let mut values = HashSet::new();
    for o in &q.options {
      if !values.insert(o.value) {
        return Err(BankError::DuplicateOptionValue { id: q.id.clone(), value: o.value });
      }
    }
  }
  Ok(())
}

/// Default tiers. The top tier reaches 40 so that a full 10-question quiz on
/// the 0..=4 scale is always classifiable.
pub fn default_policy() -> ScoringPolicy {
  ScoringPolicy::new(vec![
    ScoringRange {
      min: 0,
      max: 7,
      label: "Low Stress".into(),
      description: "You seem to be handling things well. Keep up the habits that help you stay balanced.".into(),
      tag: "low".into(),
    },
    ScoringRange {
      min: 8,
      max: 13,
      label: "Moderate Stress".into(),
      description: "You are carrying a noticeable amount of stress. Try short breaks, regular sleep and talking to someone you trust.".into(),
      tag: "moderate".into(),
    },
    ScoringRange {
      min: 14,
      max: 40,
      label: "High Stress".into(),
      description: "Your stress level is high. Consider reaching out to campus counselling or a mental health professional.".into(),
      tag: "high".into(),
    },
  ])
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn built_in_bank_passes_self_check() {
    assert_eq!(all_questions().len(), 50);
    assert_eq!(validate_bank(all_questions()), Ok(()));
    assert_eq!(max_option_value(all_questions()), 4);
  }

  #[test]
  fn default_policy_covers_ten_question_quiz() {
    assert_eq!(default_policy().validate_coverage(10 * 4), Ok(()));
  }

  #[test]
  fn self_check_rejects_malformed_questions() {
    assert_eq!(validate_bank(&[]), Err(BankError::Empty));

    let mut q = all_questions()[0].clone();
    q.options.clear();
    assert_eq!(validate_bank(&[q]), Err(BankError::NoOptions { id: "q1".into() }));

    let q = all_questions()[0].clone();
    assert_eq!(
      validate_bank(&[q.clone(), q]),
      Err(BankError::DuplicateId { id: "q1".into() })
    );

    let mut q = all_questions()[1].clone();
    q.options[1].value = 0;
    assert_eq!(
      validate_bank(&[q]),
      Err(BankError::DuplicateOptionValue { id: "q2".into(), value: 0 })
    );

    let mut q = all_questions()[2].clone();
    q.prompt = "  ".into();
    assert_eq!(validate_bank(&[q]), Err(BankError::EmptyPrompt { id: "q3".into() }));
  }
}
