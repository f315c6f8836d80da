//! Canonical outbound events for presentation layers.
//!
//! # Wire Format
//!
//! Events are serialized with a `type` tag:
//!
//! ```json
//! { "type": "field_captured", "index": 0, "identity": "Grain", "value": "Wheat" }
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::{DialogueSession, Utterance};

/// Everything a presentation layer needs to mirror the dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The session view changed (mode, cursor, turn state, channel flags).
    StateChanged {
        session: DialogueSession,
    },

    /// An utterance was appended to the conversation log.
    UtteranceLogged {
        utterance: Utterance,
    },

    /// The conversation log was emptied by a session (re)start.
    TranscriptCleared,

    /// A new document was loaded and catalogued.
    DocumentLoaded {
        name: String,
        #[serde(rename = "fieldCount")]
        field_count: usize,
    },

    /// An answer was written into a field.
    FieldCaptured {
        index: usize,
        identity: String,
        value: String,
    },

    /// The document was re-serialized after a field update.
    DocumentUpdated {
        bytes: Vec<u8>,
    },

    /// A download snapshot is ready for delivery.
    DownloadReady {
        #[serde(rename = "fileName")]
        file_name: String,
        bytes: Vec<u8>,
    },

    /// Every field has been visited.
    SessionCompleted,

    /// A recoverable problem worth showing to the user.
    Notice {
        message: String,
    },

    /// A failure that blocked the requested action.
    Error {
        message: String,
    },
}

impl SessionEvent {
    pub fn notice(message: impl Into<String>) -> Self {
        Self::Notice {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let event = SessionEvent::FieldCaptured {
            index: 0,
            identity: "Grain".into(),
            value: "Wheat".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "field_captured");
        assert_eq!(json["identity"], "Grain");
    }

    #[test]
    fn download_ready_uses_camel_case_file_name() {
        let event = SessionEvent::DownloadReady {
            file_name: "filled_a.json".into(),
            bytes: vec![],
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["fileName"], "filled_a.json");
    }
}
