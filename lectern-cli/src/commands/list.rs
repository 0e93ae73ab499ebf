//! List documents in default order.

use anyhow::{Context, Result};
use lectern_core::{Config, Document, DocumentCollection};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct ListEntry<'a> {
    id: &'a str,
    title: &'a str,
    publish_date: String,
    categories: &'a [String],
    tags: &'a [String],
}

impl<'a> ListEntry<'a> {
    fn from_document(doc: &'a Document) -> Self {
        Self {
            id: &doc.id,
            title: &doc.title,
            publish_date: doc.publish_date.to_rfc3339(),
            categories: &doc.categories,
            tags: &doc.tags,
        }
    }
}

/// List documents, optionally restricted to one category.
pub fn list_documents(config_path: &Path, category: Option<&str>, json: bool) -> Result<()> {
    let config = Config::from_file(config_path).context("Failed to load configuration")?;
    let collection = DocumentCollection::load(&config).context("Failed to load collection")?;

    let documents: Vec<&Document> = match category {
        Some(category) => collection.filter_by_category(category).collect(),
        None => collection.list_all().collect(),
    };

    if json {
        let entries: Vec<ListEntry> = documents.iter().map(|d| ListEntry::from_document(d)).collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for doc in &documents {
            println!(
                "{}  {}  [{}]",
                doc.publish_date.format("%Y-%m-%d"),
                doc.id,
                doc.categories.join(", ")
            );
        }
        println!("{} document(s)", documents.len());
    }

    Ok(())
}
