//! Fetch a single document in structured form.

use crate::ShowFormat;
use anyhow::{Context, Result};
use lectern_core::{Config, DocumentCollection};
use std::path::Path;

/// Fetch one document by id and render it in the requested format.
pub fn show_document(config_path: &Path, id: &str, format: ShowFormat) -> Result<()> {
    let config = Config::from_file(config_path).context("Failed to load configuration")?;
    let collection = DocumentCollection::load(&config).context("Failed to load collection")?;

    let document = collection
        .get_by_id(id)
        .with_context(|| format!("Document '{}' not found", id))?;

    match format {
        ShowFormat::Json => {
            println!("{}", serde_json::to_string_pretty(document)?);
        }
        ShowFormat::Markdown => {
            let fm = serde_yaml::to_string(&document.front_matter)?;
            let body = document.raw_body.clone().unwrap_or_default();
            println!("---\n{}---\n{}", fm, body);
        }
        ShowFormat::Frontmatter => {
            let fm = serde_yaml::to_string(&document.front_matter)?;
            println!("---\n{}---", fm);
        }
    }

    Ok(())
}
