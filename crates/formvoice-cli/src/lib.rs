//! Console front end for formvoice.
//!
//! Wires the dialogue engine to a JSON form document, a stdout
//! "synthesizer" and a stdin "recognizer", so a form can be filled by typing
//! answers or watched in demo mode.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tokio_test as _;

// Used by the binary only
use anyhow as _;
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod speech;

// Re-export primary types for convenient access
pub use bootstrap::{load_answers, read_document, resolve_config};
pub use commands::{Commands, RunArgs};
pub use error::CliError;
pub use parser::Cli;
pub use speech::{ConsoleSynthesizer, StdinRecognizer};
