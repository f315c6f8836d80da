//! `formvoice config`: print the effective settings.

use formvoice_core::DialogueConfig;

use crate::error::CliError;

pub fn execute(config: &DialogueConfig) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(config)
        .map_err(|e| CliError::Config(e.to_string()))?;
    println!("{json}");
    Ok(())
}
