//! Internal error type for form documents.
//!
//! Converts to the port errors of `formvoice-core` at the adapter boundary.

use thiserror::Error;

use formvoice_core::{DocumentParseError, DocumentSerializeError, FieldMutationError};

#[derive(Debug, Error)]
pub enum FormError {
    #[error("invalid JSON: {0}")]
    Json(#[source] serde_json::Error),

    #[error("no `fields` array")]
    NotAForm,
}

impl From<FormError> for DocumentParseError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::Json(e) => Self::Malformed(e.to_string()),
            FormError::NotAForm => Self::NoFormStructure,
        }
    }
}

impl From<FormError> for FieldMutationError {
    fn from(err: FormError) -> Self {
        Self::Document(err.to_string())
    }
}

impl From<FormError> for DocumentSerializeError {
    fn from(err: FormError) -> Self {
        Self(err.to_string())
    }
}
