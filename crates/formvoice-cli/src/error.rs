//! CLI-specific error types and exit code mapping.

use thiserror::Error;

use formvoice_core::{ConfigError, DialogueError, DocumentParseError};
use formvoice_dialogue::AnswerTableError;

#[derive(Debug, Error)]
pub enum CliError {
    /// Argument parsing error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Settings file or override is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The form document or answer table could not be used.
    #[error("Document error: {0}")]
    Document(String),

    /// The dialogue stopped unexpectedly.
    #[error("Dialogue error: {0}")]
    Dialogue(String),
}

impl CliError {
    /// Map error to an exit code (sysexits.h where one fits).
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Document(_) => 65, // EX_DATAERR
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
            Self::Dialogue(_) => 1,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<DocumentParseError> for CliError {
    fn from(err: DocumentParseError) -> Self {
        Self::Document(err.to_string())
    }
}

impl From<AnswerTableError> for CliError {
    fn from(err: AnswerTableError) -> Self {
        Self::Document(err.to_string())
    }
}

impl From<DialogueError> for CliError {
    fn from(err: DialogueError) -> Self {
        match err {
            DialogueError::DocumentParse(e) => e.into(),
            other => Self::Dialogue(other.to_string()),
        }
    }
}
