//! Turn-taking dialogue engine for spoken form filling.
//!
//! The engine walks a document's fields in order, asks for each one, takes a
//! live or scripted answer, writes it back and moves on:
//!
//! ```text
//!   Idle → Prompting(i) → AwaitingResponse(i) → Applying(i) → Advancing(i) ─┐
//!            ▲                                                              │
//!            └──────────────────────── i + 1 < N ───────────────────────────┤
//!                                                         i + 1 = N → Completed
//! ```
//!
//! Speech engines and timers report back as [`DialogueEvent`]s on one
//! channel. [`DialogueOrchestrator::handle_event`] is the single dispatch
//! point; it checks every result against the request that is still current
//! before acting on it.

#![deny(unused_crate_dependencies)]

pub mod command;
pub mod demo;
pub mod event;
pub mod handle;
pub mod input;
pub mod orchestrator;
pub mod output;
pub mod timer;
pub mod writer;

// Re-export key types for convenience
pub use command::VoiceCommand;
pub use demo::{AnswerTableError, DemoScriptProvider, MockAnswerTable};
pub use event::{DialogueCommand, DialogueEvent, EventSender, SessionSnapshot};
pub use handle::DialogueHandle;
pub use input::SpeechInputChannel;
pub use orchestrator::{DialogueDeps, DialogueOrchestrator};
pub use output::SpeechOutputChannel;
pub use timer::{DelayTimer, TimerId};
pub use writer::DocumentWriter;

#[cfg(test)]
use mockall as _;
