//! Loading service configuration (quiz settings + optional scoring tiers) from TOML.
//!
//! See `AppConfig` and `QuizSettings` for the expected schema. Every key is
//! optional; a missing file path means built-in defaults.

use serde::Deserialize;
use tracing::info;

use crate::domain::{ScoringPolicy, ScoringRange};
use crate::error::ConfigError;

pub const CONFIG_PATH_ENV: &str = "ASSESSMENT_CONFIG_PATH";

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
  #[serde(default)]
  pub quiz: QuizSettings,
  /// Replaces the built-in tiers when present.
  #[serde(default)]
  pub tiers: Option<Vec<ScoringRange>>,
}

impl AppConfig {
  pub fn policy_override(&self) -> Option<ScoringPolicy> {
    self.tiers.clone().map(ScoringPolicy::new)
  }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct QuizSettings {
  pub title: String,
  pub description: String,
  /// Used when a request does not name a sample size.
  pub default_sample_size: usize,
  /// Largest sample size a request may ask for.
  pub max_sample_size: usize,
  /// Quizzes kept awaiting answers before the oldest is dropped.
  pub max_pending: usize,
}

impl Default for QuizSettings {
  fn default() -> Self {
    Self {
      title: "Stress Assessment".into(),
      description: "Answer each question based on how you have felt over the last month. There are no right or wrong answers.".into(),
      default_sample_size: 10,
      max_sample_size: 10,
      max_pending: 1024,
    }
  }
}

/// Parse a TOML document into `AppConfig`.
pub fn parse_config(path: &str, raw: &str) -> Result<AppConfig, ConfigError> {
  toml::from_str::<AppConfig>(raw).map_err(|source| ConfigError::Parse { path: path.to_string(), source })
}

/// Load `AppConfig` from ASSESSMENT_CONFIG_PATH, or defaults when unset.
/// Read and parse failures are returned so startup can abort.
pub fn load_config_from_env() -> Result<AppConfig, ConfigError> {
  let Ok(path) = std::env::var(CONFIG_PATH_ENV) else {
    info!(target: "mindspace_backend", "No {CONFIG_PATH_ENV} set; using built-in quiz settings");
    return Ok(AppConfig::default());
  };
  let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read { path: path.clone(), source })?;
  let cfg = parse_config(&path, &raw)?;
  info!(target: "mindspace_backend", %path, custom_tiers = cfg.tiers.is_some(), "Loaded assessment config (TOML)");
  Ok(cfg)
}
