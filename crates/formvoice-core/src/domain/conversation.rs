//! Spoken utterances and the append-only conversation log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeakerRole {
    /// The form-filling agent (prompts, announcements).
    Agent,
    /// The person answering, or the scripted stand-in during a demo.
    #[serde(alias = "user")]
    Respondent,
}

impl SpeakerRole {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Agent => "agent",
            Self::Respondent => "user",
        }
    }
}

impl std::fmt::Display for SpeakerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logged utterance. Never modified once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Utterance {
    pub speaker_role: SpeakerRole,
    pub text: String,
    pub occurred_at: DateTime<Utc>,
}

/// Append-only, ordered record of what was said during a session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationLog {
    entries: Vec<Utterance>,
}

impl ConversationLog {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append an utterance stamped with the current time.
    pub fn append(&mut self, role: SpeakerRole, text: impl Into<String>) -> &Utterance {
        self.entries.push(Utterance {
            speaker_role: role,
            text: text.into(),
            occurred_at: Utc::now(),
        });
        // Just pushed, so the log is non-empty.
        &self.entries[self.entries.len() - 1]
    }

    /// Drop every entry. Only done when a session (re)starts.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn entries(&self) -> &[Utterance] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Role/text pairs without timestamps, for comparing transcripts.
    #[must_use]
    pub fn transcript(&self) -> Vec<(SpeakerRole, String)> {
        self.entries
            .iter()
            .map(|u| (u.speaker_role, u.text.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_order() {
        let mut log = ConversationLog::new();
        log.append(SpeakerRole::Agent, "What is your Grain?");
        log.append(SpeakerRole::Respondent, "Wheat");

        assert_eq!(
            log.transcript(),
            vec![
                (SpeakerRole::Agent, "What is your Grain?".to_string()),
                (SpeakerRole::Respondent, "Wheat".to_string()),
            ]
        );
    }

    #[test]
    fn timestamps_are_monotonic() {
        let mut log = ConversationLog::new();
        log.append(SpeakerRole::Agent, "one");
        log.append(SpeakerRole::Agent, "two");
        let entries = log.entries();
        assert!(entries[0].occurred_at <= entries[1].occurred_at);
    }

    #[test]
    fn clear_empties_the_log() {
        let mut log = ConversationLog::new();
        log.append(SpeakerRole::Agent, "hello");
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn role_serializes_lowercase_and_accepts_user_alias() {
        let json = serde_json::to_string(&SpeakerRole::Agent).unwrap();
        assert_eq!(json, "\"agent\"");
        let role: SpeakerRole = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, SpeakerRole::Respondent);
    }
}
