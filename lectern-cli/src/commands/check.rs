//! Load the collection and surface diagnostics.

use anyhow::{Context, Result};
use lectern_core::{validate, Config, Diagnostic, DiagnosticSeverity, DocumentCollection};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct CheckSummary<'a> {
    documents: usize,
    errors: usize,
    warnings: usize,
    infos: usize,
    diagnostics: &'a [Diagnostic],
}

/// Run load + validation and report every diagnostic.
///
/// Exits with an error when any error-severity diagnostic exists, so the
/// command is usable as a content CI gate.
pub fn check_collection(config_path: &Path, json: bool) -> Result<()> {
    let config = Config::from_file(config_path).context("Failed to load configuration")?;
    let collection = DocumentCollection::load(&config).context("Failed to load collection")?;

    let mut diagnostics = collection.diagnostics().to_vec();
    diagnostics.extend(validate(&collection));

    let errors = count(&diagnostics, DiagnosticSeverity::Error);
    let warnings = count(&diagnostics, DiagnosticSeverity::Warning);
    let infos = count(&diagnostics, DiagnosticSeverity::Info);

    let summary = CheckSummary {
        documents: collection.len(),
        errors,
        warnings,
        infos,
        diagnostics: &diagnostics,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Check complete: {} documents, {} errors, {} warnings, {} info",
            summary.documents, errors, warnings, infos
        );
        for diag in &diagnostics {
            let id = diag
                .doc_id
                .as_deref()
                .map(|s| format!(" [{}]", s))
                .unwrap_or_default();
            let source = diag
                .source_path
                .as_deref()
                .map(|s| format!(" ({})", s))
                .unwrap_or_default();
            println!(
                "- {:?} {}{}{}: {}",
                diag.severity, diag.code, id, source, diag.message
            );
            if let Some(ctx) = &diag.context {
                println!("  context: {}", ctx);
            }
        }
    }

    if errors > 0 {
        anyhow::bail!("{} error(s) found", errors);
    }

    Ok(())
}

fn count(diagnostics: &[Diagnostic], severity: DiagnosticSeverity) -> usize {
    diagnostics.iter().filter(|d| d.severity == severity).count()
}
