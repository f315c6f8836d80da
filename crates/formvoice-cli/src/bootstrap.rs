//! CLI bootstrap: settings, documents and answer tables from disk.

use std::fs;
use std::path::Path;

use formvoice_core::{DialogueConfig, LoadedDocument};
use formvoice_dialogue::MockAnswerTable;

use crate::error::CliError;
use crate::parser::Cli;

/// Build the dialogue settings: defaults, then the `--config` file, then
/// flag/environment overrides.
pub fn resolve_config(cli: &Cli) -> Result<DialogueConfig, CliError> {
    let mut config = match &cli.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;
            DialogueConfig::from_json(&json)?
        }
        None => DialogueConfig::default(),
    };

    if let Some(ms) = cli.advance_dwell_ms {
        config.advance_dwell_ms = ms;
    }
    if let Some(ms) = cli.demo_think_ms {
        config.demo_think_delay_ms = ms;
    }

    config.validate()?;
    tracing::debug!(?config, "Resolved dialogue settings");
    Ok(config)
}

/// Read a document from disk, named after its file name.
pub fn read_document(path: &Path) -> Result<LoadedDocument, CliError> {
    let bytes =
        fs::read(path).map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CliError::Arguments(format!("not a file path: {}", path.display())))?;
    Ok(LoadedDocument::new(name, bytes))
}

/// Load a scripted answer table, or the built-in grain receipt answers.
pub fn load_answers(path: Option<&Path>) -> Result<MockAnswerTable, CliError> {
    let Some(path) = path else {
        return Ok(MockAnswerTable::grain_receipt());
    };
    let json =
        fs::read_to_string(path).map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
    let table = MockAnswerTable::from_json(&json)?;
    tracing::debug!(path = %path.display(), answers = table.len(), "Loaded answer table");
    Ok(table)
}
