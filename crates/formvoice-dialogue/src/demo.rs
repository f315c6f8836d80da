//! Scripted answers for demo mode.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnswerTableError {
    #[error("invalid answer table: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Canned answers keyed by field identity.
///
/// Serialized as a flat JSON object: `{ "Grain": "Wheat", "Grade": "1" }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MockAnswerTable(BTreeMap<String, String>);

impl MockAnswerTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with_answer(mut self, identity: impl Into<String>, answer: impl Into<String>) -> Self {
        self.insert(identity, answer);
        self
    }

    pub fn insert(&mut self, identity: impl Into<String>, answer: impl Into<String>) {
        self.0.insert(identity.into(), answer.into());
    }

    #[must_use]
    pub fn get(&self, identity: &str) -> Option<&str> {
        self.0.get(identity).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn from_json(json: &str) -> Result<Self, AnswerTableError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Answers for the sample grain delivery receipt.
    #[must_use]
    pub fn grain_receipt() -> Self {
        [
            ("Vehicle weight", "15000"),
            ("Unload weight", "5000"),
            ("Dockage", "200"),
            ("Net weight", "9800"),
            (
                "Producers name and address surname first and farm name if applicable",
                "Doe, John - Green Acres Farm",
            ),
            ("Date of issue yyyymmdd", "20251119"),
            ("Delivery date yyyymmdd", "20251118"),
            ("Delivery location", "Saskatoon Elevator"),
            ("Contract reference if applicable", "CTR-2025-001"),
            ("Scale ticket no", "ST-998877"),
            ("Grain", "Wheat"),
            ("Price per net tonne", "350"),
            ("Dockage_2", "200"),
            ("Grade", "1"),
            ("Total purchase price", "3430"),
            ("Levy deductible", "30"),
            ("Net amount payable", "3400"),
            (
                "Net weight in words if applicableProducers copy NOT NEGOTIABLE",
                "Nine thousand eight hundred",
            ),
            ("undefined_3", "Authorized Signature"),
            ("undefined_4", "No additional notes"),
        ]
        .into_iter()
        .fold(Self::new(), |table, (identity, answer)| {
            table.with_answer(identity, answer)
        })
    }
}

/// Resolves the scripted answer for a field. Stateless apart from its table.
#[derive(Debug, Clone)]
pub struct DemoScriptProvider {
    table: MockAnswerTable,
    default_answer: String,
}

impl DemoScriptProvider {
    pub fn new(table: MockAnswerTable, default_answer: impl Into<String>) -> Self {
        Self {
            table,
            default_answer: default_answer.into(),
        }
    }

    /// The canned answer for `identity`, or the default when unmapped.
    #[must_use]
    pub fn answer_for(&self, identity: &str) -> &str {
        self.table.get(identity).unwrap_or(&self.default_answer)
    }

    #[must_use]
    pub const fn table(&self) -> &MockAnswerTable {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmapped_identity_gets_the_default() {
        let provider =
            DemoScriptProvider::new(MockAnswerTable::new().with_answer("A", "foo"), "Test Answer");
        assert_eq!(provider.answer_for("A"), "foo");
        assert_eq!(provider.answer_for("B"), "Test Answer");
    }

    #[test]
    fn lookups_are_repeatable() {
        let provider = DemoScriptProvider::new(MockAnswerTable::grain_receipt(), "Test Answer");
        assert_eq!(provider.answer_for("Grain"), provider.answer_for("Grain"));
        assert_eq!(provider.answer_for("Grain"), "Wheat");
    }

    #[test]
    fn grain_receipt_covers_the_sample_form() {
        let table = MockAnswerTable::grain_receipt();
        assert_eq!(table.len(), 20);
        assert_eq!(table.get("Net amount payable"), Some("3400"));
    }

    #[test]
    fn parses_a_flat_json_object() {
        let table = MockAnswerTable::from_json(r#"{ "Grade": "2", "Grain": "Barley" }"#).unwrap();
        assert_eq!(table.get("Grain"), Some("Barley"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn rejects_non_string_answers() {
        assert!(MockAnswerTable::from_json(r#"{ "Grade": 2 }"#).is_err());
    }
}
