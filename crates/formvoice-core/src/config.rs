//! Dialogue configuration: timing and phrasing.
//!
//! All fields have defaults so partial JSON settings files deserialize.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder replaced by the field identity in [`DialogueConfig::prompt_template`].
pub const FIELD_PLACEHOLDER: &str = "{field}";

/// Default pause between applying an answer and prompting the next field.
pub const DEFAULT_ADVANCE_DWELL_MS: u64 = 500;

/// Default simulated "thinking" time before a demo answer is spoken.
pub const DEFAULT_DEMO_THINK_DELAY_MS: u64 = 800;

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("prompt template must contain {{field}}")]
    MissingFieldPlaceholder,

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("invalid settings file: {0}")]
    Parse(String),
}

/// Timing and phrasing of the dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueConfig {
    /// Dwell between an applied answer and the next prompt, in milliseconds.
    pub advance_dwell_ms: u64,

    /// Simulated respondent thinking time in demo mode, in milliseconds.
    pub demo_think_delay_ms: u64,

    /// Question asked for each field; `{field}` is replaced by its identity.
    pub prompt_template: String,

    /// Spoken after the last field has been answered.
    pub completion_message: String,

    /// Demo answer for fields missing from the answer table.
    pub default_answer: String,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            advance_dwell_ms: DEFAULT_ADVANCE_DWELL_MS,
            demo_think_delay_ms: DEFAULT_DEMO_THINK_DELAY_MS,
            prompt_template: "What is your {field}?".to_string(),
            completion_message: "That was the last field. Say 'Download' to save.".to_string(),
            default_answer: "Test Answer".to_string(),
        }
    }
}

impl DialogueConfig {
    /// Defaults with both delays set to zero, for deterministic tests.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            advance_dwell_ms: 0,
            demo_think_delay_ms: 0,
            ..Self::default()
        }
    }

    /// Parse a JSON settings document, filling gaps with defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.prompt_template.contains(FIELD_PLACEHOLDER) {
            return Err(ConfigError::MissingFieldPlaceholder);
        }
        if self.completion_message.trim().is_empty() {
            return Err(ConfigError::Empty("completion_message"));
        }
        if self.default_answer.trim().is_empty() {
            return Err(ConfigError::Empty("default_answer"));
        }
        Ok(())
    }

    #[must_use]
    pub const fn advance_dwell(&self) -> Duration {
        Duration::from_millis(self.advance_dwell_ms)
    }

    #[must_use]
    pub const fn demo_think_delay(&self) -> Duration {
        Duration::from_millis(self.demo_think_delay_ms)
    }

    /// The question spoken for the field named `identity`.
    #[must_use]
    pub fn prompt_for(&self, identity: &str) -> String {
        self.prompt_template.replace(FIELD_PLACEHOLDER, identity)
    }
}
