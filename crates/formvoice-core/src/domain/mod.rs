//! Domain types for the form dialogue.
//!
//! These types model the document's fields, the spoken exchange and the
//! session state, independent of any speech engine or document format.

mod conversation;
mod document;
mod field;
mod session;

pub use conversation::{ConversationLog, SpeakerRole, Utterance};
pub use document::LoadedDocument;
pub use field::{FieldCatalog, FieldDescriptor, FieldKind, FieldSpec};
pub use session::{DialogueMode, DialogueSession, RunMode, TurnState};
