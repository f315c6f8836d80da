//! Dialogue-level errors surfaced to callers.
//!
//! Only a document that cannot be parsed blocks the dialogue outright; every
//! other failure is absorbed where it happens and reported as an event.

use thiserror::Error;

use crate::ports::DocumentParseError;

#[derive(Debug, Error)]
pub enum DialogueError {
    /// The document could not be catalogued. No session can start.
    #[error(transparent)]
    DocumentParse(#[from] DocumentParseError),

    /// A session was requested before any document was loaded.
    #[error("No document loaded")]
    NoDocument,

    /// The dialogue event loop is no longer running.
    #[error("Dialogue loop has shut down")]
    ChannelClosed,
}
