//! Front matter parsing from markdown post files.

use crate::models::FrontMatter;
use chrono::{DateTime, FixedOffset};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Unparseable date: {0}")]
    InvalidDate(String),

    #[error("No front matter block found")]
    MissingBlock,
}

static FRONT_MATTER_REGEX: OnceLock<Regex> = OnceLock::new();

fn front_matter_regex() -> &'static Regex {
    FRONT_MATTER_REGEX.get_or_init(|| Regex::new(r"(?s)^---\s*\n(.*?)\n---\s*\n?(.*)$").unwrap())
}

/// Parse front matter from post content.
///
/// Returns a tuple of (front matter, markdown body). Posts without a
/// leading `---` block are malformed and rejected; the collection loader
/// excludes them rather than aborting the whole load.
///
/// # Example
///
/// ```
/// use lectern_core::frontmatter::parse_front_matter;
///
/// let content = "---\ntitle: Java Inheritance\ndate: 2024-11-14 17:00:00 -0800\ncategories: [Programming, Java]\n---\nBody text.\n";
///
/// let (fm, body) = parse_front_matter(content).unwrap();
/// assert_eq!(fm.title, "Java Inheritance");
/// assert_eq!(fm.categories, vec!["Programming", "Java"]);
/// assert!(body.starts_with("Body text."));
/// ```
pub fn parse_front_matter(content: &str) -> Result<(FrontMatter, String), FrontMatterError> {
    let re = front_matter_regex();

    let Some(captures) = re.captures(content) else {
        return Err(FrontMatterError::MissingBlock);
    };

    let yaml = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    let body = captures.get(2).map(|m| m.as_str()).unwrap_or_default();

    let front_matter: FrontMatter = match serde_yaml::from_str(yaml) {
        Ok(fm) => fm,
        Err(e) => {
            let msg = e.to_string();
            for field in ["title", "date"] {
                if msg.contains(&format!("missing field `{}`", field)) {
                    return Err(FrontMatterError::MissingField(field.to_string()));
                }
            }
            return Err(FrontMatterError::Yaml(e));
        }
    };

    if front_matter.title.trim().is_empty() {
        return Err(FrontMatterError::MissingField("title".to_string()));
    }
    if front_matter.date.trim().is_empty() {
        return Err(FrontMatterError::MissingField("date".to_string()));
    }

    Ok((front_matter, body.to_string()))
}

/// Parse the front matter `date` field into a publish instant.
///
/// The authored form is `2024-11-14 17:00:00 -0800` (space-separated with a
/// `-HHMM` offset); RFC 3339 is also accepted.
pub fn parse_publish_date(raw: &str) -> Result<DateTime<FixedOffset>, FrontMatterError> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S %z") {
        return Ok(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt);
    }

    Err(FrontMatterError::InvalidDate(raw.to_string()))
}
