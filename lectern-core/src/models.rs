//! Content model structs for documents, body blocks, and diagnostics.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Front matter metadata from a post file.
///
/// The `date` field keeps the authored string verbatim so that
/// re-serializing a loaded document preserves the stored form byte for
/// byte; the parsed instant lives on [`Document::publish_date`].
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FrontMatter {
    pub title: String,

    pub date: String,

    #[serde(default)]
    pub categories: Vec<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub math: bool,
}

/// A single post in the collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique id, derived from the filename date and title
    /// (e.g., "2024-11-14-java-inheritance")
    pub id: String,

    /// Display title
    pub title: String,

    /// Publication instant, including the authored timezone offset
    pub publish_date: DateTime<FixedOffset>,

    /// Ordered categories (e.g., ["Programming", "Java"])
    pub categories: Vec<String>,

    /// Tags for cross-cutting topics (may be empty)
    pub tags: Vec<String>,

    /// Whether math notation rendering is requested downstream
    pub math: bool,

    /// Original front matter, kept verbatim for round-tripping
    pub front_matter: FrontMatter,

    /// Structured body content
    pub body: Vec<BodyBlock>,

    /// Raw markdown body (without front matter) for export features
    pub raw_body: Option<String>,

    /// Source path relative to the content root
    pub source_path: Option<String>,
}

impl Document {
    /// All quiz questions in this document, in body order.
    pub fn quizzes(&self) -> impl Iterator<Item = &QuizQuestion> {
        self.body.iter().filter_map(|block| match block {
            BodyBlock::Quiz(q) => Some(q),
            _ => None,
        })
    }

    /// Whether the document belongs to the given category (exact match).
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}

/// One structural unit of document content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BodyBlock {
    Paragraph { text: String },
    Heading { level: u8, text: String },
    CodeSample(CodeSample),
    Table(Table),
    Callout(Callout),
    List { ordered: bool, items: Vec<String> },
    Quiz(QuizQuestion),
}

/// A fenced code block with a language tag and an optional display filename.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CodeSample {
    pub language: String,

    /// Display filename from a trailing `{: file="..." }` attribute line
    #[serde(default)]
    pub filename: Option<String>,

    pub text: String,
}

/// A markdown table, flattened to cell text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Kind of callout, matching the `{: .prompt-* }` attribute classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalloutKind {
    Tip,
    Info,
    Warning,
    Danger,
    /// Plain blockquote without a prompt class
    Quote,
}

impl CalloutKind {
    pub fn from_class(s: &str) -> Option<Self> {
        match s {
            "prompt-tip" => Some(CalloutKind::Tip),
            "prompt-info" => Some(CalloutKind::Info),
            "prompt-warning" => Some(CalloutKind::Warning),
            "prompt-danger" => Some(CalloutKind::Danger),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CalloutKind::Tip => "tip",
            CalloutKind::Info => "info",
            CalloutKind::Warning => "warning",
            CalloutKind::Danger => "danger",
            CalloutKind::Quote => "quote",
        }
    }
}

/// A highlighted aside rendered from a blockquote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Callout {
    pub kind: CalloutKind,
    pub text: String,
}

/// A multiple-choice quiz question with a collapsed answer region.
///
/// Choices are displayed as numbered options starting at 1;
/// `answer_index` is the 0-based index of the correct choice. The
/// explanation is the disclosure text hidden until the reader expands the
/// answer; it is authored content, never computed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuizQuestion {
    pub prompt: String,

    #[serde(default)]
    pub code_sample: Option<CodeSample>,

    pub choices: Vec<String>,

    pub answer_index: usize,

    pub explanation: String,
}

impl QuizQuestion {
    /// The correct choice text, or `None` when `answer_index` is out of
    /// range (an invalid reference left for validation to report).
    pub fn correct_choice(&self) -> Option<&str> {
        self.choices.get(self.answer_index).map(String::as_str)
    }

    /// 1-based display number of the correct choice.
    pub fn answer_number(&self) -> usize {
        self.answer_index + 1
    }
}

/// Severity of a load/validation diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Info,
}

/// A single load or validation finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable machine-readable code (e.g., "quiz.invalid_answer")
    pub code: String,

    pub message: String,

    pub severity: DiagnosticSeverity,

    /// Offending document id, when known
    #[serde(default)]
    pub doc_id: Option<String>,

    /// Source path relative to the content root
    #[serde(default)]
    pub source_path: Option<String>,

    /// Extra context (e.g., the quiz prompt)
    #[serde(default)]
    pub context: Option<String>,
}
