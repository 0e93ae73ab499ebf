//! Markdown body parsing into structured body blocks.
//!
//! Posts use a small set of conventions on top of plain markdown:
//!
//! - a fenced code block may be followed by a `{: file="Main.java" }`
//!   attribute line naming the file the snippet is from;
//! - a blockquote may be followed by a `{: .prompt-tip }` attribute line
//!   selecting the callout kind;
//! - a quiz question is a prompt paragraph, an optional code sample, an
//!   ordered list of choices, and a collapsible
//!   `<details><summary>Answer</summary>` region holding the 1-based
//!   answer number and the explanation.

mod quiz;

use crate::models::{BodyBlock, Callout, CalloutKind, CodeSample, Diagnostic, Table};
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use std::sync::OnceLock;

use quiz::AnswerRegion;

fn file_attr_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"^\{:\s*file=["']([^"']+)["']\s*\}$"#).unwrap())
}

fn prompt_attr_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\{:\s*\.(prompt-[a-z]+)\s*\}$").unwrap())
}

fn line_break_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^<br\s*/?>$").unwrap())
}

/// Markdown body parser.
pub struct BodyParser {
    options: Options,
}

impl Default for BodyParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BodyParser {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        Self { options }
    }

    /// Parse a markdown body into blocks.
    ///
    /// Returns the blocks plus any structural diagnostics (malformed quiz
    /// sections). Diagnostics carry no document context here; the loader
    /// fills in id and source path.
    pub fn parse(&self, markdown: &str) -> (Vec<BodyBlock>, Vec<Diagnostic>) {
        let parser = Parser::new_ext(markdown, self.options);
        let events: Vec<Event> = parser.collect();

        let mut blocks: Vec<BodyBlock> = Vec::new();
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        // While inside a <details> answer region, parsed blocks are
        // diverted here instead of the main block list.
        let mut answer: Option<AnswerRegion> = None;

        let mut i = 0;
        while i < events.len() {
            match &events[i] {
                Event::Start(Tag::Paragraph) => {
                    let text = collect_inline(&events, &mut i, TagEnd::Paragraph);
                    self.push_paragraph(text, &mut blocks, &mut answer);
                }
                Event::Start(Tag::Heading { level, .. }) => {
                    let level = *level as u8;
                    let text = collect_inline(&events, &mut i, TagEnd::Heading(events_level(level)));
                    emit(
                        BodyBlock::Heading { level, text },
                        &mut blocks,
                        &mut answer,
                    );
                }
                Event::Start(Tag::CodeBlock(kind)) => {
                    let language = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .unwrap_or_default()
                            .to_string(),
                        CodeBlockKind::Indented => String::new(),
                    };
                    let mut text = String::new();
                    i += 1;
                    while i < events.len() {
                        match &events[i] {
                            Event::End(TagEnd::CodeBlock) => break,
                            Event::Text(t) => text.push_str(t),
                            _ => {}
                        }
                        i += 1;
                    }
                    i += 1;
                    emit(
                        BodyBlock::CodeSample(CodeSample {
                            language,
                            filename: None,
                            text,
                        }),
                        &mut blocks,
                        &mut answer,
                    );
                }
                Event::Start(Tag::BlockQuote(_)) => {
                    let mut text = collect_quote(&events, &mut i);
                    // An attribute line without a preceding blank line is
                    // lazily pulled into the quote paragraph, so the kind
                    // may arrive as the final line of the quote itself.
                    let mut kind = CalloutKind::Quote;
                    if let Some(idx) = text.rfind('\n') {
                        let tagged = prompt_attr_regex()
                            .captures(text[idx + 1..].trim())
                            .and_then(|caps| CalloutKind::from_class(&caps[1]));
                        if let Some(k) = tagged {
                            kind = k;
                            text.truncate(idx);
                        }
                    }
                    emit(
                        BodyBlock::Callout(Callout { kind, text }),
                        &mut blocks,
                        &mut answer,
                    );
                }
                Event::Start(Tag::List(start)) => {
                    let ordered = start.is_some();
                    let items = collect_list_items(&events, &mut i);
                    emit(
                        BodyBlock::List { ordered, items },
                        &mut blocks,
                        &mut answer,
                    );
                }
                Event::Start(Tag::Table(_)) => {
                    let table = collect_table(&events, &mut i);
                    emit(BodyBlock::Table(table), &mut blocks, &mut answer);
                }
                Event::Start(Tag::HtmlBlock) => {
                    let mut html = String::new();
                    i += 1;
                    while i < events.len() {
                        match &events[i] {
                            Event::End(TagEnd::HtmlBlock) => break,
                            Event::Html(t) => html.push_str(t),
                            Event::Text(t) => html.push_str(t),
                            _ => {}
                        }
                        i += 1;
                    }
                    i += 1;
                    self.handle_html_block(&html, &mut blocks, &mut answer, &mut diagnostics);
                }
                _ => {
                    i += 1;
                }
            }
        }

        // Unterminated answer region: keep its content as plain blocks
        if let Some(region) = answer.take() {
            diagnostics.push(quiz::unterminated_diagnostic());
            for text in region.paragraphs {
                blocks.push(BodyBlock::Paragraph { text });
            }
        }

        (blocks, diagnostics)
    }

    fn push_paragraph(
        &self,
        text: String,
        blocks: &mut Vec<BodyBlock>,
        answer: &mut Option<AnswerRegion>,
    ) {
        if let Some(region) = answer.as_mut() {
            region.paragraphs.push(text);
            return;
        }

        // Kramdown-style attribute lines bind to the previous block
        if let Some(caps) = file_attr_regex().captures(text.trim()) {
            if let Some(BodyBlock::CodeSample(sample)) = blocks.last_mut() {
                if sample.filename.is_none() {
                    sample.filename = Some(caps[1].to_string());
                    return;
                }
            }
        }
        if let Some(caps) = prompt_attr_regex().captures(text.trim()) {
            if let Some(BodyBlock::Callout(callout)) = blocks.last_mut() {
                if callout.kind == CalloutKind::Quote {
                    if let Some(kind) = CalloutKind::from_class(&caps[1]) {
                        callout.kind = kind;
                        return;
                    }
                }
            }
        }

        blocks.push(BodyBlock::Paragraph { text });
    }

    fn handle_html_block(
        &self,
        html: &str,
        blocks: &mut Vec<BodyBlock>,
        answer: &mut Option<AnswerRegion>,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let opens = html.contains("<details");
        let closes = html.contains("</details>");

        if opens && closes {
            // Compact form with no blank lines: the whole region arrives as
            // one raw HTML block, so the inner lines never reach the
            // markdown parser.
            let mut region = AnswerRegion::default();
            for line in html.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('<') {
                    continue;
                }
                region.paragraphs.push(line.to_string());
            }
            quiz::assemble(region, blocks, diagnostics);
        } else if opens {
            if answer.is_some() {
                diagnostics.push(quiz::nested_diagnostic());
            }
            *answer = Some(AnswerRegion::default());
        } else if closes {
            match answer.take() {
                Some(region) => quiz::assemble(region, blocks, diagnostics),
                None => tracing::debug!("Ignoring stray </details> block"),
            }
        } else {
            tracing::debug!("Ignoring raw HTML block in body");
        }
    }
}

fn events_level(level: u8) -> pulldown_cmark::HeadingLevel {
    use pulldown_cmark::HeadingLevel::*;
    match level {
        1 => H1,
        2 => H2,
        3 => H3,
        4 => H4,
        5 => H5,
        _ => H6,
    }
}

/// Flatten inline events until the given end tag, mapping breaks to `\n`.
fn collect_inline(events: &[Event], i: &mut usize, end: TagEnd) -> String {
    let mut out = String::new();
    *i += 1;
    while *i < events.len() {
        match &events[*i] {
            Event::End(e) if *e == end => break,
            Event::Text(t) => out.push_str(t),
            Event::Code(t) => out.push_str(t),
            Event::SoftBreak | Event::HardBreak => out.push('\n'),
            Event::InlineHtml(t) if line_break_regex().is_match(t.trim()) => out.push('\n'),
            _ => {}
        }
        *i += 1;
    }
    *i += 1;
    out
}

/// Flatten a blockquote to text, joining inner paragraphs with newlines.
fn collect_quote(events: &[Event], i: &mut usize) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut depth = 1;
    *i += 1;
    while *i < events.len() {
        match &events[*i] {
            Event::Start(Tag::BlockQuote(_)) => depth += 1,
            Event::End(TagEnd::BlockQuote(_)) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Event::Start(Tag::Paragraph) => {
                parts.push(collect_inline(events, i, TagEnd::Paragraph));
                continue;
            }
            Event::Text(t) => parts.push(t.to_string()),
            _ => {}
        }
        *i += 1;
    }
    *i += 1;
    parts.join("\n")
}

/// Collect list item texts, handling tight and loose items.
fn collect_list_items(events: &[Event], i: &mut usize) -> Vec<String> {
    let mut items = Vec::new();
    let mut depth = 1;
    *i += 1;
    while *i < events.len() {
        match &events[*i] {
            Event::Start(Tag::List(_)) => depth += 1,
            Event::End(TagEnd::List(_)) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Event::Start(Tag::Item) if depth == 1 => {
                items.push(collect_item_text(events, i));
                continue;
            }
            _ => {}
        }
        *i += 1;
    }
    *i += 1;
    items
}

fn collect_item_text(events: &[Event], i: &mut usize) -> String {
    let mut out = String::new();
    let mut depth = 1;
    *i += 1;
    while *i < events.len() {
        match &events[*i] {
            Event::Start(Tag::Item) => depth += 1,
            Event::End(TagEnd::Item) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Event::Text(t) => out.push_str(t),
            Event::Code(t) => out.push_str(t),
            Event::SoftBreak | Event::HardBreak => out.push('\n'),
            Event::InlineHtml(t) if line_break_regex().is_match(t.trim()) => out.push('\n'),
            Event::End(TagEnd::Paragraph) => out.push('\n'),
            _ => {}
        }
        *i += 1;
    }
    *i += 1;
    out.trim_end_matches('\n').to_string()
}

fn collect_table(events: &[Event], i: &mut usize) -> Table {
    let mut headers: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut in_head = false;
    let mut current_row: Vec<String> = Vec::new();

    *i += 1;
    while *i < events.len() {
        match &events[*i] {
            Event::End(TagEnd::Table) => break,
            Event::Start(Tag::TableHead) => {
                in_head = true;
            }
            Event::End(TagEnd::TableHead) => {
                in_head = false;
            }
            Event::Start(Tag::TableRow) => {
                current_row.clear();
            }
            Event::End(TagEnd::TableRow) => {
                rows.push(std::mem::take(&mut current_row));
            }
            Event::Start(Tag::TableCell) => {
                let text = collect_inline(events, i, TagEnd::TableCell);
                if in_head {
                    headers.push(text);
                } else {
                    current_row.push(text);
                }
                continue;
            }
            _ => {}
        }
        *i += 1;
    }
    *i += 1;

    Table { headers, rows }
}

/// Divert a block into the open answer region (flattened to text) or the
/// main block list.
fn emit(block: BodyBlock, blocks: &mut Vec<BodyBlock>, answer: &mut Option<AnswerRegion>) {
    match answer.as_mut() {
        Some(region) => region.paragraphs.push(flatten_block(&block)),
        None => blocks.push(block),
    }
}

fn flatten_block(block: &BodyBlock) -> String {
    match block {
        BodyBlock::Paragraph { text } => text.clone(),
        BodyBlock::Heading { text, .. } => text.clone(),
        BodyBlock::CodeSample(sample) => sample.text.clone(),
        BodyBlock::Callout(callout) => callout.text.clone(),
        BodyBlock::List { items, .. } => items.join("\n"),
        BodyBlock::Table(table) => table
            .rows
            .iter()
            .map(|r| r.join(" "))
            .collect::<Vec<_>>()
            .join("\n"),
        BodyBlock::Quiz(quiz) => quiz.prompt.clone(),
    }
}
