//! Inbound events: engine results, timer expiries and user commands.

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};

use formvoice_core::{
    CaptureOutcome, DialogueError, DialogueSession, FieldDescriptor, LoadedDocument, RequestId,
    RunMode, SpeechOutcome, Utterance,
};

use crate::timer::TimerId;

/// Sender half of the dialogue event channel.
pub type EventSender = mpsc::UnboundedSender<DialogueEvent>;

/// One discrete event for the orchestrator to handle.
#[derive(Debug)]
pub enum DialogueEvent {
    /// A speak request ended.
    Output {
        id: RequestId,
        outcome: SpeechOutcome,
    },

    /// A listen request ended.
    Input {
        id: RequestId,
        outcome: CaptureOutcome,
    },

    /// A scheduled delay elapsed.
    TimerFired { id: TimerId },

    /// A command from the presentation layer.
    Command(DialogueCommand),
}

/// Commands accepted from the presentation layer.
#[derive(Debug)]
pub enum DialogueCommand {
    /// Catalog a new document, discarding the current session.
    LoadDocument {
        document: LoadedDocument,
        reply: Option<oneshot::Sender<Result<usize, DialogueError>>>,
    },

    /// Start (or restart) a session in the preferred mode.
    Start,

    /// Restart from the first field in the given mode.
    Restart(RunMode),

    /// Start or stop listening.
    ToggleInput,

    /// Deliver the document as filled so far.
    Download,

    /// Switch mode, re-prompting the current field if a turn is running.
    SetMode(RunMode),

    /// Read the session view, transcript and fields.
    Inspect(oneshot::Sender<SessionSnapshot>),

    /// Cancel everything in flight and leave the event loop.
    Shutdown,
}

/// Point-in-time copy of everything the presentation layer displays.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session: DialogueSession,
    pub transcript: Vec<Utterance>,
    pub fields: Vec<FieldDescriptor>,
}
