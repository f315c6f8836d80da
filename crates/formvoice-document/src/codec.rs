//! Field extraction, mutation and serialization for JSON forms.

use formvoice_core::{
    DocumentMutator, DocumentParseError, DocumentSerializeError, DocumentSerializer, FieldKind,
    FieldMutationError, FieldSource, FieldSpec, LoadedDocument,
};

use crate::format::FormDocument;

/// Adapter between JSON form documents and the dialogue's document ports.
///
/// Only text fields are offered to the dialogue; other widgets stay in the
/// document untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormCodec;

impl JsonFormCodec {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl FieldSource for JsonFormCodec {
    fn extract_fields(
        &self,
        document: &LoadedDocument,
    ) -> Result<Vec<FieldSpec>, DocumentParseError> {
        let form = FormDocument::from_bytes(&document.bytes)?;

        let specs: Vec<FieldSpec> = form
            .fields
            .iter()
            .filter(|field| {
                let fillable = field.field_kind() == FieldKind::Text;
                if !fillable {
                    tracing::debug!(name = %field.name, kind = %field.kind, "Skipping non-text field");
                }
                fillable
            })
            .map(|field| FieldSpec::text(field.name.as_str()))
            .collect();

        tracing::debug!(
            document = %document.name,
            total = form.fields.len(),
            text = specs.len(),
            "Extracted form fields"
        );
        Ok(specs)
    }
}

impl DocumentMutator for JsonFormCodec {
    fn set_field_value(
        &self,
        document: &LoadedDocument,
        identity: &str,
        text: &str,
    ) -> Result<Vec<u8>, FieldMutationError> {
        let mut form = FormDocument::from_bytes(&document.bytes)?;

        let field = form
            .field_mut(identity)
            .ok_or_else(|| FieldMutationError::NotFound(identity.to_string()))?;
        if field.field_kind() != FieldKind::Text {
            return Err(FieldMutationError::UnsupportedKind {
                identity: identity.to_string(),
                kind: field.kind.clone(),
            });
        }
        field.value = text.to_string();

        Ok(form.to_bytes()?)
    }
}

impl DocumentSerializer for JsonFormCodec {
    fn serialize(&self, document: &LoadedDocument) -> Result<Vec<u8>, DocumentSerializeError> {
        // Re-encode so the download is normalized even if nothing was filled.
        let form = FormDocument::from_bytes(&document.bytes)?;
        Ok(form.to_bytes()?)
    }
}
