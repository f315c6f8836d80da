//! JSON form documents for formvoice.
//!
//! A form document is a JSON object with an ordered `fields` array:
//!
//! ```json
//! {
//!   "title": "Grain delivery receipt",
//!   "fields": [
//!     { "name": "Grain", "kind": "text", "value": "" },
//!     { "name": "Paid", "kind": "checkbox", "value": "" }
//!   ]
//! }
//! ```
//!
//! [`JsonFormCodec`] implements the document ports from `formvoice-core`.
//! Keys it does not know about are carried through unchanged.

#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tempfile as _;

mod codec;
mod error;
mod format;

pub use codec::JsonFormCodec;
pub use format::{FormDocument, FormField};

// Re-export the ports for convenience
pub use formvoice_core::{DocumentMutator, DocumentSerializer, FieldSource};
