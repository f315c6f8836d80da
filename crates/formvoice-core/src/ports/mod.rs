//! Port definitions (trait abstractions) for external collaborators.
//!
//! Ports define what the dialogue engine expects from infrastructure:
//! speech engines, document adapters and event delivery. They contain no
//! implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - Speech engines are single-utterance / single-shot and report their
//!   result through a boxed callback, never by blocking the caller
//! - Document ports work on [`LoadedDocument`](crate::domain::LoadedDocument)
//!   bytes; the format is the adapter's business

mod document;
mod event_emitter;
mod speech;

pub use document::{
    DocumentMutator, DocumentParseError, DocumentSerializeError, DocumentSerializer,
    DocumentSink, FieldMutationError, FieldSource,
};
pub use event_emitter::{ChannelEmitter, NoopEmitter, SessionEventEmitter};
pub use speech::{
    CaptureCallback, CaptureOutcome, RecognitionError, RequestId, SpeechCallback, SpeechOutcome,
    SpeechRecognizer, SpeechRequest, SpeechSynthesizer, SynthesisError,
};

#[cfg(test)]
pub use document::MockFieldSource;
