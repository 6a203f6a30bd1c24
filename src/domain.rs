//! Domain models: questions and their options, quizzes, and the scoring policy
//! that maps a total score onto a stress tier.

use serde::{Deserialize, Serialize};

use crate::error::{AssessmentError, PolicyError};

/// One selectable answer. Selection is by `value`, never by position.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnswerOption {
  pub value: u32,
  pub label: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
  pub id: String,
  pub prompt: String,
  pub options: Vec<AnswerOption>,
}

impl Question {
  /// Highest value any option of this question can contribute.
  pub fn max_value(&self) -> u32 {
    self.options.iter().map(|o| o.value).max().unwrap_or(0)
  }

  pub fn accepts(&self, value: u32) -> bool {
    self.options.iter().any(|o| o.value == value)
  }
}

/// A contiguous, inclusive score interval mapped to a severity tier.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoringRange {
  pub min: u32,
  pub max: u32,
  pub label: String,
  pub description: String,
  /// Presentation hint for the client (colour/icon). Not used by scoring.
  #[serde(default)]
  pub tag: String,
}

impl ScoringRange {
  pub fn contains(&self, score: u32) -> bool {
    self.min <= score && score <= self.max
  }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ScoringPolicy {
  ranges: Vec<ScoringRange>,
}

impl ScoringPolicy {
  pub fn new(ranges: Vec<ScoringRange>) -> Self {
    Self { ranges }
  }

  pub fn ranges(&self) -> &[ScoringRange] {
    &self.ranges
  }

  /// Linear scan; the first range containing `score` wins.
  pub fn classify(&self, score: u32) -> Result<&ScoringRange, AssessmentError> {
    self
      .ranges
      .iter()
      .find(|r| r.contains(score))
      .ok_or(AssessmentError::ClassificationGap { score })
  }

  /// Ranges must be non-empty, start at 0, follow each other without gaps or
  /// overlaps, and reach at least `max_score`.
  pub fn validate_coverage(&self, max_score: u32) -> Result<(), PolicyError> {
    let first = self.ranges.first().ok_or(PolicyError::Empty)?;
    if first.min != 0 {
      return Err(PolicyError::DoesNotStartAtZero { min: first.min });
    }

    let mut expected_min = 0u32;
    for r in &self.ranges {
      if r.min > r.max {
        return Err(PolicyError::Inverted { label: r.label.clone(), min: r.min, max: r.max });
      }
      if r.min > expected_min {
        return Err(PolicyError::Gap { from: expected_min, to: r.min - 1 });
      }
      if r.min < expected_min {
        return Err(PolicyError::Overlap { label: r.label.clone(), at: r.min });
      }
      expected_min = match r.max.checked_add(1) {
        Some(next) => next,
        // u32::MAX reached, nothing can lie beyond it.
        None => return Ok(()),
      };
    }

    let covered_to = expected_min - 1;
    if covered_to < max_score {
      return Err(PolicyError::Gap { from: expected_min, to: max_score });
    }
    Ok(())
  }
}

/// One assessment instance handed out to a client.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Quiz {
  pub id: String,
  pub title: String,
  pub description: String,
  pub questions: Vec<Question>,
  pub scoring: ScoringPolicy,
}

impl Quiz {
  pub fn max_score(&self) -> u32 {
    self.questions.iter().map(Question::max_value).sum()
  }
}

/// Final result of a fully answered quiz.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Evaluation {
  pub total_score: u32,
  pub max_score: u32,
  pub answered: usize,
  pub tier: ScoringRange,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn range(min: u32, max: u32, label: &str) -> ScoringRange {
    ScoringRange { min, max, label: label.into(), description: String::new(), tag: String::new() }
  }

  fn three_tiers() -> ScoringPolicy {
    ScoringPolicy::new(vec![range(0, 7, "low"), range(8, 13, "moderate"), range(14, 40, "high")])
  }

  #[test]
  fn classify_picks_the_containing_range() {
    let policy = three_tiers();
    assert_eq!(policy.classify(0).map(|r| r.label.as_str()), Ok("low"));
    assert_eq!(policy.classify(7).map(|r| r.label.as_str()), Ok("low"));
    assert_eq!(policy.classify(8).map(|r| r.label.as_str()), Ok("moderate"));
    assert_eq!(policy.classify(14).map(|r| r.label.as_str()), Ok("high"));
    assert_eq!(policy.classify(40).map(|r| r.label.as_str()), Ok("high"));
  }

  #[test]
  fn classify_reports_gap_outside_ranges() {
    let policy = three_tiers();
    assert_eq!(policy.classify(41), Err(AssessmentError::ClassificationGap { score: 41 }));
  }

  #[test]
  fn coverage_accepts_contiguous_policy() {
    assert_eq!(three_tiers().validate_coverage(40), Ok(()));
    assert_eq!(three_tiers().validate_coverage(20), Ok(()));
  }

  #[test]
  fn coverage_rejects_short_top_range() {
    let policy = ScoringPolicy::new(vec![range(0, 7, "low"), range(8, 13, "moderate"), range(14, 20, "high")]);
    assert_eq!(policy.validate_coverage(40), Err(PolicyError::Gap { from: 21, to: 40 }));
  }

  #[test]
  fn coverage_rejects_holes_and_overlaps() {
    let holed = ScoringPolicy::new(vec![range(0, 7, "low"), range(9, 40, "high")]);
    assert_eq!(holed.validate_coverage(40), Err(PolicyError::Gap { from: 8, to: 8 }));

    let overlapping = ScoringPolicy::new(vec![range(0, 7, "low"), range(7, 40, "high")]);
    assert_eq!(
      overlapping.validate_coverage(40),
      Err(PolicyError::Overlap { label: "high".into(), at: 7 })
    );
  }

  #[test]
  fn coverage_rejects_bad_shapes() {
    assert_eq!(ScoringPolicy::new(vec![]).validate_coverage(0), Err(PolicyError::Empty));
    let late = ScoringPolicy::new(vec![range(1, 40, "x")]);
    assert_eq!(late.validate_coverage(40), Err(PolicyError::DoesNotStartAtZero { min: 1 }));
    let inverted = ScoringPolicy::new(vec![range(0, 5, "a"), range(9, 6, "b")]);
    assert!(matches!(inverted.validate_coverage(5), Err(PolicyError::Inverted { .. })));
  }

  #[test]
  fn coverage_tolerates_unbounded_top() {
    let policy = ScoringPolicy::new(vec![range(0, 7, "low"), range(8, u32::MAX, "high")]);
    assert_eq!(policy.validate_coverage(u32::MAX), Ok(()));
  }
}
