//! Post-load validation over a document collection.
//!
//! Load-time problems (malformed front matter, duplicate ids, broken quiz
//! markup) are reported by the loader itself; this pass checks the content
//! of successfully loaded documents. Findings are reported, never
//! auto-corrected.

use crate::collection::DocumentCollection;
use crate::models::{Diagnostic, DiagnosticSeverity};

/// Validate every loaded document, returning the findings.
pub fn validate(collection: &DocumentCollection) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for doc in collection.list_all() {
        if doc.categories.is_empty() {
            diagnostics.push(Diagnostic {
                code: "doc.no_categories".to_string(),
                message: "Document has no categories".to_string(),
                severity: DiagnosticSeverity::Warning,
                doc_id: Some(doc.id.clone()),
                source_path: doc.source_path.clone(),
                context: None,
            });
        }

        for quiz in doc.quizzes() {
            if quiz.choices.is_empty() {
                diagnostics.push(Diagnostic {
                    code: "quiz.empty_choices".to_string(),
                    message: "Quiz has no choices".to_string(),
                    severity: DiagnosticSeverity::Error,
                    doc_id: Some(doc.id.clone()),
                    source_path: doc.source_path.clone(),
                    context: Some(quiz.prompt.clone()),
                });
                continue;
            }

            if quiz.answer_index >= quiz.choices.len() {
                diagnostics.push(Diagnostic {
                    code: "quiz.invalid_answer".to_string(),
                    message: format!(
                        "Answer index {} does not reference any of the {} choices",
                        quiz.answer_index,
                        quiz.choices.len()
                    ),
                    severity: DiagnosticSeverity::Error,
                    doc_id: Some(doc.id.clone()),
                    source_path: doc.source_path.clone(),
                    context: Some(quiz.prompt.clone()),
                });
            }
        }
    }

    diagnostics
}
