//! The in-memory document handed to the dialogue.

use serde::{Deserialize, Serialize};

/// A document as loaded from disk or upload: its display name and raw bytes.
///
/// The bytes are opaque to the dialogue; only the document adapters behind
/// [`FieldSource`](crate::ports::FieldSource) and friends interpret them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedDocument {
    /// File name the document was loaded under (e.g. `grain-receipt.json`).
    pub name: String,
    /// Raw serialized document.
    pub bytes: Vec<u8>,
}

impl LoadedDocument {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// File name offered when the filled document is downloaded.
    #[must_use]
    pub fn filled_name(&self) -> String {
        format!("filled_{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_name_prefixes_original() {
        let doc = LoadedDocument::new("receipt.json", b"{}".to_vec());
        assert_eq!(doc.filled_name(), "filled_receipt.json");
    }
}
