//! Quiz assembly from a collapsed answer region.
//!
//! When the parser closes a `<details>` answer region, the choices
//! (ordered list), optional code sample, and prompt paragraph are the
//! blocks immediately preceding it. The first paragraph inside the region
//! is the 1-based number of the correct choice; the rest is the
//! explanation revealed on demand.

use crate::models::{BodyBlock, Diagnostic, DiagnosticSeverity, QuizQuestion};

/// Accumulated paragraphs from inside a `<details>` region.
#[derive(Debug, Default)]
pub(super) struct AnswerRegion {
    pub(super) paragraphs: Vec<String>,
}

/// Fold an answer region and the preceding blocks into a quiz question.
pub(super) fn assemble(
    region: AnswerRegion,
    blocks: &mut Vec<BodyBlock>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let Some(BodyBlock::List {
        ordered: true,
        items,
    }) = blocks.last().cloned()
    else {
        diagnostics.push(Diagnostic {
            code: "quiz.malformed".to_string(),
            message: "Answer region is not preceded by an ordered list of choices".to_string(),
            severity: DiagnosticSeverity::Error,
            doc_id: None,
            source_path: None,
            context: region.paragraphs.first().cloned(),
        });
        // Keep the answer text visible as plain paragraphs
        for text in region.paragraphs {
            blocks.push(BodyBlock::Paragraph { text });
        }
        return;
    };
    blocks.pop();

    let code_sample = match blocks.last() {
        Some(BodyBlock::CodeSample(_)) => {
            let Some(BodyBlock::CodeSample(sample)) = blocks.pop() else {
                unreachable!()
            };
            Some(sample)
        }
        _ => None,
    };

    let prompt = match blocks.last() {
        Some(BodyBlock::Paragraph { .. }) => {
            let Some(BodyBlock::Paragraph { text }) = blocks.pop() else {
                unreachable!()
            };
            text
        }
        _ => {
            diagnostics.push(Diagnostic {
                code: "quiz.missing_prompt".to_string(),
                message: "Quiz has no prompt paragraph before its choices".to_string(),
                severity: DiagnosticSeverity::Warning,
                doc_id: None,
                source_path: None,
                context: items.first().cloned(),
            });
            String::new()
        }
    };

    let (answer_index, explanation) = split_answer(&region, items.len(), diagnostics, &prompt);

    blocks.push(BodyBlock::Quiz(QuizQuestion {
        prompt,
        code_sample,
        choices: items,
        answer_index,
        explanation,
    }));
}

/// Split the region into the answer number and the explanation text.
///
/// A missing or unparseable number yields the out-of-range sentinel
/// `choices.len()`, which validation reports as an invalid reference
/// instead of guessing a correction.
fn split_answer(
    region: &AnswerRegion,
    choice_count: usize,
    diagnostics: &mut Vec<Diagnostic>,
    prompt: &str,
) -> (usize, String) {
    let mut paragraphs = region.paragraphs.iter();

    if let Some(first) = paragraphs.next() {
        if let Some(number) = parse_answer_number(first) {
            let explanation = paragraphs.cloned().collect::<Vec<_>>().join("\n\n");
            return (number - 1, explanation);
        }
    }

    diagnostics.push(Diagnostic {
        code: "quiz.missing_answer".to_string(),
        message: "Answer region does not start with a choice number".to_string(),
        severity: DiagnosticSeverity::Error,
        doc_id: None,
        source_path: None,
        context: Some(prompt.to_string()),
    });

    (choice_count, region.paragraphs.join("\n\n"))
}

/// Parse the leading 1-based choice number ("3" or "3.").
fn parse_answer_number(text: &str) -> Option<usize> {
    let trimmed = text.trim().trim_end_matches('.');
    match trimmed.parse::<usize>() {
        Ok(n) if n >= 1 => Some(n),
        _ => None,
    }
}

pub(super) fn unterminated_diagnostic() -> Diagnostic {
    Diagnostic {
        code: "quiz.unterminated_answer".to_string(),
        message: "Answer region is never closed with </details>".to_string(),
        severity: DiagnosticSeverity::Error,
        doc_id: None,
        source_path: None,
        context: None,
    }
}

pub(super) fn nested_diagnostic() -> Diagnostic {
    Diagnostic {
        code: "quiz.nested_answer".to_string(),
        message: "Answer region opened inside another answer region".to_string(),
        severity: DiagnosticSeverity::Error,
        doc_id: None,
        source_path: None,
        context: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_answer_number() {
        assert_eq!(parse_answer_number("3"), Some(3));
        assert_eq!(parse_answer_number(" 3. "), Some(3));
        assert_eq!(parse_answer_number("0"), None);
        assert_eq!(parse_answer_number("three"), None);
        assert_eq!(parse_answer_number(""), None);
    }

    #[test]
    fn test_assemble_pops_prompt_and_choices() {
        let mut blocks = vec![
            BodyBlock::Paragraph {
                text: "Intro text.".into(),
            },
            BodyBlock::Paragraph {
                text: "Which one?".into(),
            },
            BodyBlock::List {
                ordered: true,
                items: vec!["a".into(), "b".into()],
            },
        ];
        let mut diagnostics = Vec::new();
        let region = AnswerRegion {
            paragraphs: vec!["2".into(), "Because b.".into()],
        };

        assemble(region, &mut blocks, &mut diagnostics);

        assert!(diagnostics.is_empty());
        assert_eq!(blocks.len(), 2);
        match &blocks[1] {
            BodyBlock::Quiz(quiz) => {
                assert_eq!(quiz.prompt, "Which one?");
                assert_eq!(quiz.answer_index, 1);
                assert_eq!(quiz.explanation, "Because b.");
            }
            other => panic!("Expected quiz, got {:?}", other),
        }
    }

    #[test]
    fn test_assemble_rejects_unordered_choices() {
        let mut blocks = vec![BodyBlock::List {
            ordered: false,
            items: vec!["a".into()],
        }];
        let mut diagnostics = Vec::new();

        assemble(AnswerRegion::default(), &mut blocks, &mut diagnostics);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, "quiz.malformed");
        assert!(matches!(blocks[0], BodyBlock::List { .. }));
    }
}
