//! Fillable fields and the ordered catalog built from a document.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::LoadedDocument;
use crate::ports::{DocumentParseError, FieldSource};

/// The kind of a fillable field, as reported by the document adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// A free-text field that accepts a verbatim answer.
    Text,
    /// Any other widget (checkbox, radio group, signature...).
    #[default]
    Unknown,
}

impl FieldKind {
    /// Classify an adapter-specific type label.
    ///
    /// Accepts plain labels (`"text"`) as well as widget class names such as
    /// `"PDFTextField"`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let lower = label.to_ascii_lowercase();
        if lower == "text" || lower.ends_with("textfield") {
            Self::Text
        } else {
            Self::Unknown
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field as extracted from a document, before it enters a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub identity: String,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn new(identity: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            identity: identity.into(),
            kind,
        }
    }

    /// Shorthand for a text field.
    pub fn text(identity: impl Into<String>) -> Self {
        Self::new(identity, FieldKind::Text)
    }
}

/// A catalogued field together with the last value captured for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Name of the field in the source document, unique within a catalog.
    pub identity: String,
    pub kind: FieldKind,
    /// Last captured answer; empty until the field has been visited.
    pub captured_value: String,
}

/// Ordered, fixed list of fields extracted from one document.
///
/// Order and membership are frozen at construction. Only the captured value
/// of each field can change afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCatalog {
    fields: Vec<FieldDescriptor>,
}

impl FieldCatalog {
    /// Build a catalog, preserving the order of `specs`.
    ///
    /// Fails if two specs share an identity.
    pub fn new(specs: Vec<FieldSpec>) -> Result<Self, DocumentParseError> {
        let mut seen = HashSet::with_capacity(specs.len());
        let mut fields = Vec::with_capacity(specs.len());

        for spec in specs {
            if !seen.insert(spec.identity.clone()) {
                return Err(DocumentParseError::DuplicateField(spec.identity));
            }
            fields.push(FieldDescriptor {
                identity: spec.identity,
                kind: spec.kind,
                captured_value: String::new(),
            });
        }

        Ok(Self { fields })
    }

    /// Extract the fields of `document` through `source` and catalog them.
    pub fn extract(
        source: &dyn FieldSource,
        document: &LoadedDocument,
    ) -> Result<Self, DocumentParseError> {
        Self::new(source.extract_fields(document)?)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn at(&self, index: usize) -> Option<&FieldDescriptor> {
        self.fields.get(index)
    }

    /// Overwrite the captured value of the field at `index`.
    ///
    /// Returns the field's identity, or `None` if `index` is out of range.
    pub fn set_captured_value(&mut self, index: usize, text: impl Into<String>) -> Option<&str> {
        let field = self.fields.get_mut(index)?;
        field.captured_value = text.into();
        Some(field.identity.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter()
    }

    /// Identities in catalog order.
    pub fn identities(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.identity.as_str())
    }
}
