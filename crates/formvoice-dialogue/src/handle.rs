//! Cloneable command handle for a running dialogue loop.

use tokio::sync::oneshot;

use formvoice_core::{DialogueError, LoadedDocument, RunMode};

use crate::event::{DialogueCommand, DialogueEvent, EventSender, SessionSnapshot};

/// Sends [`DialogueCommand`]s to a [`DialogueOrchestrator`](crate::DialogueOrchestrator)
/// running on its own task.
#[derive(Clone)]
pub struct DialogueHandle {
    tx: EventSender,
}

impl DialogueHandle {
    #[must_use]
    pub const fn new(tx: EventSender) -> Self {
        Self { tx }
    }

    fn send(&self, command: DialogueCommand) -> Result<(), DialogueError> {
        self.tx
            .send(DialogueEvent::Command(command))
            .map_err(|_| DialogueError::ChannelClosed)
    }

    /// Load a document and wait for the number of fields found.
    pub async fn load_document(&self, document: LoadedDocument) -> Result<usize, DialogueError> {
        let (reply, rx) = oneshot::channel();
        self.send(DialogueCommand::LoadDocument {
            document,
            reply: Some(reply),
        })?;
        rx.await.map_err(|_| DialogueError::ChannelClosed)?
    }

    pub fn start(&self) -> Result<(), DialogueError> {
        self.send(DialogueCommand::Start)
    }

    pub fn restart(&self, mode: RunMode) -> Result<(), DialogueError> {
        self.send(DialogueCommand::Restart(mode))
    }

    pub fn toggle_input(&self) -> Result<(), DialogueError> {
        self.send(DialogueCommand::ToggleInput)
    }

    pub fn download(&self) -> Result<(), DialogueError> {
        self.send(DialogueCommand::Download)
    }

    pub fn set_mode(&self, mode: RunMode) -> Result<(), DialogueError> {
        self.send(DialogueCommand::SetMode(mode))
    }

    /// Read the current session view, transcript and fields.
    pub async fn inspect(&self) -> Result<SessionSnapshot, DialogueError> {
        let (reply, rx) = oneshot::channel();
        self.send(DialogueCommand::Inspect(reply))?;
        rx.await.map_err(|_| DialogueError::ChannelClosed)
    }

    pub fn shutdown(&self) -> Result<(), DialogueError> {
        self.send(DialogueCommand::Shutdown)
    }
}
