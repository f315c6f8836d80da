//! Dialogue modes, turn states and the read-only session view.

use serde::{Deserialize, Serialize};

/// A mode a session can be run in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Listens for a real answer after every prompt.
    Manual,
    /// Like manual; entered by a spoken "start" and cleared on completion.
    #[default]
    Auto,
    /// Fully scripted replay: canned answers are spoken instead of listening.
    Demo,
}

impl RunMode {
    /// Parse a mode label (`"manual"`, `"auto"`, `"demo"`).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manual" => Some(Self::Manual),
            "auto" => Some(Self::Auto),
            "demo" => Some(Self::Demo),
            _ => None,
        }
    }
}

/// The mode label shown to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DialogueMode {
    /// No session running.
    #[default]
    Idle,
    Manual,
    Auto,
    Demo,
}

impl From<RunMode> for DialogueMode {
    fn from(mode: RunMode) -> Self {
        match mode {
            RunMode::Manual => Self::Manual,
            RunMode::Auto => Self::Auto,
            RunMode::Demo => Self::Demo,
        }
    }
}

/// Where the current turn stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    /// No session started since the document was loaded.
    #[default]
    Idle,
    /// The question for the current field is being spoken.
    Prompting,
    /// Waiting for the answer (live capture or scripted reply).
    AwaitingResponse,
    /// Writing the answer into the field and the document.
    Applying,
    /// Answer applied; about to move to the next field.
    Advancing,
    /// Every field has been visited.
    Completed,
}

impl TurnState {
    /// Whether a turn is in progress (a field is being worked on).
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(
            self,
            Self::Prompting | Self::AwaitingResponse | Self::Applying | Self::Advancing
        )
    }
}

/// Read-only view of the dialogue, as surfaced to the presentation layer.
///
/// `cursor` is `None` before the first start, the index of the current
/// field while running, and equal to `field_count` once completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DialogueSession {
    pub mode: DialogueMode,
    pub cursor: Option<usize>,
    pub turn_state: TurnState,
    pub input_active: bool,
    pub output_active: bool,
    pub field_count: usize,
    /// Most recent captured or scripted answer, for display.
    pub last_transcript: Option<String>,
}

impl DialogueSession {
    /// `true` when the session has visited every field.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.turn_state == TurnState::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_mode_parse_is_case_insensitive() {
        assert_eq!(RunMode::parse("Demo"), Some(RunMode::Demo));
        assert_eq!(RunMode::parse(" manual "), Some(RunMode::Manual));
        assert_eq!(RunMode::parse("idle"), None);
    }

    #[test]
    fn running_states() {
        assert!(TurnState::Prompting.is_running());
        assert!(TurnState::Advancing.is_running());
        assert!(!TurnState::Idle.is_running());
        assert!(!TurnState::Completed.is_running());
    }

    #[test]
    fn default_view_is_not_started() {
        let view = DialogueSession::default();
        assert_eq!(view.mode, DialogueMode::Idle);
        assert_eq!(view.cursor, None);
        assert!(!view.input_active && !view.output_active);
    }
}
