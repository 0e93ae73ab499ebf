//! Document id and slug generation.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;
use unicode_segmentation::UnicodeSegmentation;

/// Convert a string to a URL-safe slug
///
/// Rules:
/// - Lowercase
/// - Replace whitespace with hyphens
/// - Remove special characters (except hyphens)
/// - Collapse multiple hyphens
/// - Trim leading/trailing hyphens
///
/// # Examples
///
/// ```
/// use lectern_core::slugify;
///
/// assert_eq!(slugify("Java Inheritance"), "java-inheritance");
/// assert_eq!(slugify("C++ Lambda Expressions"), "c-lambda-expressions");
/// ```
pub fn slugify(input: &str) -> String {
    let lowercased = input.to_lowercase();

    // Replace whitespace and underscores with hyphens
    let with_hyphens = lowercased
        .graphemes(true)
        .map(|g| match g {
            " " | "_" | "\t" | "\n" => "-",
            _ => g,
        })
        .collect::<String>();

    // Keep ASCII alphanumerics, hyphens, and unicode letters
    let cleaned = with_hyphens
        .graphemes(true)
        .filter_map(|g| {
            let c = g.chars().next()?;
            if c.is_ascii_alphanumeric() || c == '-' {
                Some(g)
            } else if c.is_alphabetic() {
                Some(g)
            } else {
                None
            }
        })
        .collect::<String>();

    let collapsed = hyphen_run_regex().replace_all(&cleaned, "-");
    collapsed.trim_matches('-').to_string()
}

fn hyphen_run_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-+").unwrap())
}

fn dated_stem_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}-.+").unwrap())
}

/// Derive a document id from a file stem, publish date, and title.
///
/// Post files follow the `YYYY-MM-DD-title.md` convention; when the stem
/// already carries the date prefix it is slugified as-is. Otherwise the id
/// is rebuilt from the publish date and title so every id keeps the
/// `date + title` shape.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use lectern_core::document_id;
///
/// let date = NaiveDate::from_ymd_opt(2024, 11, 14).unwrap();
/// assert_eq!(
///     document_id("2024-11-14-java-inheritance", date, "Java Inheritance"),
///     "2024-11-14-java-inheritance"
/// );
/// assert_eq!(
///     document_id("inheritance notes", date, "Java Inheritance"),
///     "2024-11-14-java-inheritance"
/// );
/// ```
pub fn document_id(file_stem: &str, publish_date: NaiveDate, title: &str) -> String {
    if dated_stem_regex().is_match(file_stem) {
        // The date prefix survives slugification untouched
        slugify(file_stem)
    } else {
        format!("{}-{}", publish_date.format("%Y-%m-%d"), slugify(title))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, 14).unwrap()
    }

    #[test]
    fn test_basic_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Java Inheritance"), "java-inheritance");
    }

    #[test]
    fn test_special_characters() {
        assert_eq!(slugify("C++ Programming"), "c-programming");
        assert_eq!(slugify("What's new?"), "whats-new");
        assert_eq!(slugify("Node.js Tips"), "nodejs-tips");
    }

    #[test]
    fn test_multiple_spaces_and_underscores() {
        assert_eq!(slugify("Multiple   Spaces   Here"), "multiple-spaces-here");
        assert_eq!(slugify("snake_case_title"), "snake-case-title");
    }

    #[test]
    fn test_unicode() {
        assert_eq!(slugify("Café"), "café");
    }

    #[test]
    fn test_empty_and_special_only() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_document_id_from_dated_stem() {
        assert_eq!(
            document_id("2024-11-14-java-inheritance", date(), "Ignored"),
            "2024-11-14-java-inheritance"
        );
    }

    #[test]
    fn test_document_id_from_title() {
        assert_eq!(
            document_id("draft", date(), "C++ Lambda Expressions"),
            "2024-11-14-c-lambda-expressions"
        );
    }

    #[test]
    fn test_document_id_normalizes_dated_stem() {
        assert_eq!(
            document_id("2024-11-14-Java Inheritance", date(), "Java Inheritance"),
            "2024-11-14-java-inheritance"
        );
    }
}
