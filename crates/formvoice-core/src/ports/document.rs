//! Document collaborator ports.
//!
//! Extraction, mutation and serialization of the underlying document are
//! thin adapters around a format library; the dialogue only sees these
//! traits. [`DocumentSink`] is the fire-and-forget channel the dialogue
//! pushes captured answers into.

use thiserror::Error;

use crate::domain::{FieldSpec, LoadedDocument};

/// The document has no usable form structure.
#[derive(Debug, Error)]
pub enum DocumentParseError {
    /// The bytes could not be read as a document at all.
    #[error("Malformed document: {0}")]
    Malformed(String),

    /// The document parsed but contains no form.
    #[error("Document has no recognizable form structure")]
    NoFormStructure,

    /// Two fields share the same name.
    #[error("Duplicate field name: {0}")]
    DuplicateField(String),
}

/// Writing a value into a field failed.
#[derive(Debug, Error)]
pub enum FieldMutationError {
    #[error("Field not found: {0}")]
    NotFound(String),

    #[error("Field '{identity}' has unsupported kind '{kind}'")]
    UnsupportedKind { identity: String, kind: String },

    #[error("Failed to update document: {0}")]
    Document(String),
}

/// Serializing the document failed.
#[derive(Debug, Error)]
#[error("Failed to serialize document: {0}")]
pub struct DocumentSerializeError(pub String);

/// Lists the fillable fields of a document in document order.
#[cfg_attr(test, mockall::automock)]
pub trait FieldSource: Send + Sync {
    fn extract_fields(
        &self,
        document: &LoadedDocument,
    ) -> Result<Vec<FieldSpec>, DocumentParseError>;
}

/// Sets one field's value and returns the re-serialized document bytes.
pub trait DocumentMutator: Send + Sync {
    fn set_field_value(
        &self,
        document: &LoadedDocument,
        identity: &str,
        text: &str,
    ) -> Result<Vec<u8>, FieldMutationError>;
}

/// Produces the bytes delivered to the user on download.
pub trait DocumentSerializer: Send + Sync {
    fn serialize(&self, document: &LoadedDocument) -> Result<Vec<u8>, DocumentSerializeError>;
}

/// Non-blocking sink for document work requested by the dialogue.
///
/// Requests are applied in submission order. Failures are the sink's to log;
/// they never flow back into the dialogue.
pub trait DocumentSink: Send + Sync {
    /// Make `document` the target of subsequent updates.
    fn replace(&self, document: LoadedDocument);

    /// Queue a field update.
    fn submit_field(&self, identity: &str, text: &str);

    /// Queue a serialization of the document as it stands after every
    /// update submitted so far.
    fn request_snapshot(&self);
}
