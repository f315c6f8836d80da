//! `formvoice fields`: list the fields a session would ask for.

use std::path::Path;

use formvoice_core::FieldCatalog;
use formvoice_document::JsonFormCodec;

use crate::bootstrap::read_document;
use crate::error::CliError;

pub fn execute(path: &Path) -> Result<(), CliError> {
    let document = read_document(path)?;
    let catalog = FieldCatalog::extract(&JsonFormCodec::new(), &document)?;

    if catalog.is_empty() {
        println!("No fillable text fields in {}.", document.name);
        return Ok(());
    }

    println!("{} fillable fields in {}:", catalog.count(), document.name);
    for (index, field) in catalog.iter().enumerate() {
        println!("{:>4}  {}", index + 1, field.identity);
    }
    Ok(())
}
