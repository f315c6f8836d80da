//! Serde model of a JSON form document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use formvoice_core::FieldKind;

use crate::error::FormError;

/// Top-level form document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDocument {
    pub fields: Vec<FormField>,

    /// Any other top-level keys (title, metadata...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One field entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,

    /// Widget label, e.g. `text`, `checkbox` or `PDFTextField`.
    #[serde(default = "default_kind")]
    pub kind: String,

    #[serde(default)]
    pub value: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_kind() -> String {
    "text".to_string()
}

impl FormField {
    #[must_use]
    pub fn field_kind(&self) -> FieldKind {
        FieldKind::from_label(&self.kind)
    }
}

impl FormDocument {
    /// Parse raw bytes. A JSON value without a `fields` array is not a form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormError> {
        let value: Value = serde_json::from_slice(bytes).map_err(FormError::Json)?;

        if !value.get("fields").is_some_and(Value::is_array) {
            return Err(FormError::NotAForm);
        }

        serde_json::from_value(value).map_err(FormError::Json)
    }

    /// Pretty-printed JSON.
    pub fn to_bytes(&self) -> Result<Vec<u8>, FormError> {
        serde_json::to_vec_pretty(self).map_err(FormError::Json)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_defaults_to_text() {
        let doc = FormDocument::from_bytes(br#"{ "fields": [ { "name": "A" } ] }"#).unwrap();
        assert_eq!(doc.fields[0].field_kind(), FieldKind::Text);
        assert_eq!(doc.fields[0].value, "");
    }

    #[test]
    fn unknown_keys_survive_a_round_trip() {
        let json = br#"{ "title": "Receipt", "fields": [ { "name": "A", "page": 2 } ] }"#;
        let doc = FormDocument::from_bytes(json).unwrap();
        let reparsed = FormDocument::from_bytes(&doc.to_bytes().unwrap()).unwrap();

        assert_eq!(reparsed.extra["title"], "Receipt");
        assert_eq!(reparsed.fields[0].extra["page"], 2);
    }

    #[test]
    fn object_without_fields_is_not_a_form() {
        assert!(matches!(
            FormDocument::from_bytes(br#"{ "pages": [] }"#),
            Err(FormError::NotAForm)
        ));
        assert!(matches!(
            FormDocument::from_bytes(br#"{ "fields": {} }"#),
            Err(FormError::NotAForm)
        ));
    }

    #[test]
    fn invalid_json_is_a_json_error() {
        assert!(matches!(
            FormDocument::from_bytes(b"%PDF-1.7"),
            Err(FormError::Json(_))
        ));
    }
}
