//! Core domain types and port definitions for formvoice.
//!
//! `formvoice` drives a spoken, field-by-field data-collection dialogue over
//! a document's fillable fields. This crate holds everything the dialogue
//! engine and its adapters agree on:
//!
//! - [`domain`] - field catalog, utterances, conversation log, session view
//! - [`ports`] - speech engine and document collaborator traits
//! - [`events`] - the outbound [`SessionEvent`] union for presentation layers
//! - [`config`] - dialogue timing and phrasing
//!
//! No runtime adapters live here; concrete engines and documents are wired in
//! at the composition root.

#![deny(unused_crate_dependencies)]

pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod ports;

pub use config::{ConfigError, DialogueConfig};
pub use domain::{
    ConversationLog, DialogueMode, DialogueSession, FieldCatalog, FieldDescriptor, FieldKind,
    FieldSpec, LoadedDocument, RunMode, SpeakerRole, TurnState, Utterance,
};
pub use error::DialogueError;
pub use events::SessionEvent;
pub use ports::{
    CaptureCallback, CaptureOutcome, ChannelEmitter, DocumentMutator, DocumentParseError,
    DocumentSerializeError, DocumentSerializer, DocumentSink, FieldMutationError, FieldSource,
    NoopEmitter, RecognitionError, RequestId, SessionEventEmitter, SpeechCallback, SpeechOutcome,
    SpeechRecognizer, SpeechRequest, SpeechSynthesizer, SynthesisError,
};
