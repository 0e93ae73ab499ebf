//! Collection loading and read-only queries over loaded documents.

use crate::{
    body::BodyParser,
    config::Config,
    frontmatter::{parse_front_matter, parse_publish_date, FrontMatterError},
    models::{Diagnostic, DiagnosticSeverity, Document},
    slug::document_id,
};
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Content directory not found: {}", .0.display())]
    MissingContentDir(PathBuf),
}

#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("No document with id '{0}'")]
    NotFound(String),
}

/// Per-file failure; the loader records it and moves on.
#[derive(Error, Debug)]
enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    FrontMatter(#[from] FrontMatterError),
}

/// Read-only, ordered set of loaded documents.
///
/// Documents are sorted once at load time by publish date descending, ties
/// broken by id ascending, and are immutable afterwards; every query hands
/// out shared references in that fixed order.
pub struct DocumentCollection {
    documents: Vec<Document>,
    ids: HashMap<String, usize>,
    diagnostics: Vec<Diagnostic>,
}

impl DocumentCollection {
    /// Load the collection described by a config file.
    pub fn load(config: &Config) -> Result<Self, LoadError> {
        Self::load_inner(&config.content_dir(), &config.ignore_patterns)
    }

    /// Load every post under a content directory.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self, LoadError> {
        Self::load_inner(dir.as_ref(), &[])
    }

    fn load_inner(content_dir: &Path, ignore_patterns: &[String]) -> Result<Self, LoadError> {
        if !content_dir.is_dir() {
            return Err(LoadError::MissingContentDir(content_dir.to_path_buf()));
        }

        let files = discover_post_files(content_dir, ignore_patterns);
        tracing::info!("Found {} post files", files.len());

        let parser = BodyParser::new();
        let mut documents: Vec<Document> = Vec::new();
        let mut ids: HashMap<String, usize> = HashMap::new();
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        for path in &files {
            let source_path = path
                .strip_prefix(content_dir)
                .unwrap_or(path)
                .to_string_lossy()
                .to_string();

            match load_document(path, &source_path, &parser, &mut diagnostics) {
                Ok(document) => {
                    if ids.contains_key(&document.id) {
                        // First occurrence wins; the duplicate is excluded
                        tracing::warn!("Duplicate document id: {}", document.id);
                        diagnostics.push(Diagnostic {
                            code: "doc.duplicate_id".to_string(),
                            message: format!(
                                "Document id '{}' already used by another file",
                                document.id
                            ),
                            severity: DiagnosticSeverity::Error,
                            doc_id: Some(document.id.clone()),
                            source_path: Some(source_path),
                            context: None,
                        });
                        continue;
                    }
                    ids.insert(document.id.clone(), documents.len());
                    documents.push(document);
                }
                Err(e) => {
                    tracing::error!("Failed to load {:?}: {}", path, e);
                    diagnostics.push(Diagnostic {
                        code: "frontmatter.malformed".to_string(),
                        message: e.to_string(),
                        severity: DiagnosticSeverity::Error,
                        doc_id: None,
                        source_path: Some(source_path),
                        context: None,
                    });
                }
            }
        }

        // Default display ordering: newest first, id breaks ties
        documents.sort_by(|a, b| {
            b.publish_date
                .cmp(&a.publish_date)
                .then_with(|| a.id.cmp(&b.id))
        });
        let ids = documents
            .iter()
            .enumerate()
            .map(|(i, d)| (d.id.clone(), i))
            .collect();

        tracing::info!("Loaded {} documents", documents.len());

        Ok(Self {
            documents,
            ids,
            diagnostics,
        })
    }

    /// All documents in default order (publish date descending, id
    /// ascending on ties). The iterator is lazy and restartable; repeated
    /// calls yield the same sequence.
    pub fn list_all(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    /// Look up a document by id.
    pub fn get_by_id(&self, id: &str) -> Result<&Document, CollectionError> {
        self.ids
            .get(id)
            .map(|&i| &self.documents[i])
            .ok_or_else(|| CollectionError::NotFound(id.to_string()))
    }

    /// Documents in the given category (exact match), default ordering
    /// preserved.
    pub fn filter_by_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a Document> + 'a {
        self.documents.iter().filter(move |d| d.has_category(category))
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Load-time diagnostics (malformed files, duplicate ids, quiz markup
    /// problems).
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Discover post files under the content root, sorted for deterministic
/// load order.
fn discover_post_files(content_dir: &Path, ignore_patterns: &[String]) -> Vec<PathBuf> {
    let ignores = compile_ignore_patterns(ignore_patterns);
    let mut files: Vec<PathBuf> = WalkDir::new(content_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
        .filter(|e| {
            let rel = e
                .path()
                .strip_prefix(content_dir)
                .unwrap_or(e.path())
                .to_string_lossy()
                .to_string();
            if ignores.iter().any(|re| re.is_match(&rel)) {
                tracing::debug!("Ignoring {} due to ignore_patterns", rel);
                false
            } else {
                true
            }
        })
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

fn compile_ignore_patterns(patterns: &[String]) -> Vec<Regex> {
    let mut compiled = Vec::new();
    for pat in patterns {
        match Regex::new(pat) {
            Ok(re) => compiled.push(re),
            Err(err) => tracing::warn!("Invalid ignore pattern '{}': {}", pat, err),
        }
    }
    compiled
}

/// Parse a single post file into a document.
fn load_document(
    path: &Path,
    source_path: &str,
    parser: &BodyParser,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Document, DocumentError> {
    let content = fs::read_to_string(path)?;
    let (front_matter, body_text) = parse_front_matter(&content)?;
    let publish_date = parse_publish_date(&front_matter.date)?;

    let file_stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    let id = document_id(file_stem, publish_date.date_naive(), &front_matter.title);

    let (body, mut body_diags) = parser.parse(&body_text);
    for diag in &mut body_diags {
        diag.doc_id = Some(id.clone());
        diag.source_path = Some(source_path.to_string());
    }
    diagnostics.append(&mut body_diags);

    Ok(Document {
        id,
        title: front_matter.title.clone(),
        publish_date,
        categories: front_matter.categories.clone(),
        tags: front_matter.tags.clone(),
        math: front_matter.math,
        front_matter,
        body,
        raw_body: Some(body_text),
        source_path: Some(source_path.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_post(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    fn sample_post(title: &str, date: &str, categories: &str) -> String {
        format!(
            "---\ntitle: {}\ndate: {}\ncategories: {}\n---\n\nBody text.\n",
            title, date, categories
        )
    }

    #[test]
    fn test_load_orders_by_date_desc() {
        let dir = tempfile::tempdir().unwrap();
        write_post(
            dir.path(),
            "2024-11-14-java-inheritance.md",
            &sample_post(
                "Java Inheritance",
                "2024-11-14 17:00:00 -0800",
                "[Programming, Java]",
            ),
        );
        write_post(
            dir.path(),
            "2025-01-02-cpp-lambdas.md",
            &sample_post(
                "C++ Lambdas",
                "2025-01-02 09:00:00 -0800",
                "[Programming, C++]",
            ),
        );

        let collection = DocumentCollection::load_dir(dir.path()).unwrap();
        let ids: Vec<&str> = collection.list_all().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["2025-01-02-cpp-lambdas", "2024-11-14-java-inheritance"]);
    }

    #[test]
    fn test_ties_broken_by_id_ascending() {
        let dir = tempfile::tempdir().unwrap();
        let same_date = "2024-11-14 17:00:00 -0800";
        write_post(
            dir.path(),
            "2024-11-14-zeta.md",
            &sample_post("Zeta", same_date, "[Programming]"),
        );
        write_post(
            dir.path(),
            "2024-11-14-alpha.md",
            &sample_post("Alpha", same_date, "[Programming]"),
        );

        let collection = DocumentCollection::load_dir(dir.path()).unwrap();
        let ids: Vec<&str> = collection.list_all().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["2024-11-14-alpha", "2024-11-14-zeta"]);
    }

    #[test]
    fn test_list_all_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        write_post(
            dir.path(),
            "2024-11-14-post.md",
            &sample_post("Post", "2024-11-14 17:00:00 -0800", "[Programming]"),
        );

        let collection = DocumentCollection::load_dir(dir.path()).unwrap();
        let first: Vec<String> = collection.list_all().map(|d| d.id.clone()).collect();
        let second: Vec<String> = collection.list_all().map(|d| d.id.clone()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_get_by_id_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let collection = DocumentCollection::load_dir(dir.path()).unwrap();
        match collection.get_by_id("2024-01-01-missing") {
            Err(CollectionError::NotFound(id)) => assert_eq!(id, "2024-01-01-missing"),
            Ok(_) => panic!("Expected NotFound"),
        }
    }

    #[test]
    fn test_malformed_front_matter_excluded_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_post(
            dir.path(),
            "2024-11-14-good.md",
            &sample_post("Good", "2024-11-14 17:00:00 -0800", "[Programming]"),
        );
        write_post(dir.path(), "2024-11-15-bad.md", "---\ntitle: Bad\n---\nNo date.\n");

        let collection = DocumentCollection::load_dir(dir.path()).unwrap();
        assert_eq!(collection.len(), 1);
        assert!(collection.get_by_id("2024-11-14-good").is_ok());

        let codes: Vec<&str> = collection
            .diagnostics()
            .iter()
            .map(|d| d.code.as_str())
            .collect();
        assert_eq!(codes, vec!["frontmatter.malformed"]);
        assert_eq!(
            collection.diagnostics()[0].source_path.as_deref(),
            Some("2024-11-15-bad.md")
        );
    }

    #[test]
    fn test_unparseable_date_excluded() {
        let dir = tempfile::tempdir().unwrap();
        write_post(
            dir.path(),
            "2024-11-14-post.md",
            "---\ntitle: Post\ndate: not a date\n---\nBody.\n",
        );

        let collection = DocumentCollection::load_dir(dir.path()).unwrap();
        assert!(collection.is_empty());
        assert_eq!(collection.diagnostics().len(), 1);
    }

    #[test]
    fn test_duplicate_id_first_wins() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("drafts");
        fs::create_dir(&sub).unwrap();
        write_post(
            dir.path(),
            "2024-11-14-post.md",
            &sample_post("Post", "2024-11-14 17:00:00 -0800", "[Programming]"),
        );
        write_post(
            &sub,
            "2024-11-14-post.md",
            &sample_post("Post", "2024-11-14 17:00:00 -0800", "[Programming]"),
        );

        let collection = DocumentCollection::load_dir(dir.path()).unwrap();
        assert_eq!(collection.len(), 1);
        let codes: Vec<&str> = collection
            .diagnostics()
            .iter()
            .map(|d| d.code.as_str())
            .collect();
        assert_eq!(codes, vec!["doc.duplicate_id"]);
    }

    #[test]
    fn test_filter_by_category() {
        let dir = tempfile::tempdir().unwrap();
        write_post(
            dir.path(),
            "2024-11-14-java.md",
            &sample_post(
                "Java Inheritance",
                "2024-11-14 17:00:00 -0800",
                "[Programming, Java]",
            ),
        );
        write_post(
            dir.path(),
            "2025-01-02-cpp.md",
            &sample_post(
                "C++ Lambdas",
                "2025-01-02 09:00:00 -0800",
                "[Programming, C++]",
            ),
        );

        let collection = DocumentCollection::load_dir(dir.path()).unwrap();

        let cpp: Vec<&str> = collection
            .filter_by_category("C++")
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(cpp, vec!["2025-01-02-cpp"]);

        let both: Vec<&str> = collection
            .filter_by_category("Programming")
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(both, vec!["2025-01-02-cpp", "2024-11-14-java"]);
    }

    #[test]
    fn test_ignore_patterns() {
        let dir = tempfile::tempdir().unwrap();
        write_post(
            dir.path(),
            "2024-11-14-post.md",
            &sample_post("Post", "2024-11-14 17:00:00 -0800", "[Programming]"),
        );
        write_post(
            dir.path(),
            "2024-11-15-draft.md",
            &sample_post("Draft", "2024-11-15 17:00:00 -0800", "[Programming]"),
        );

        let config =
            Config::for_content_dir(dir.path()).with_ignore_patterns(vec!["draft".to_string()]);

        let collection = DocumentCollection::load(&config).unwrap();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.documents()[0].id, "2024-11-14-post");
    }

    #[test]
    fn test_missing_content_dir() {
        assert!(matches!(
            DocumentCollection::load_dir("/no/such/dir"),
            Err(LoadError::MissingContentDir(_))
        ));
    }

    #[test]
    fn test_publish_date_instant() {
        let dir = tempfile::tempdir().unwrap();
        write_post(
            dir.path(),
            "2024-11-14-java.md",
            &sample_post(
                "Java Inheritance",
                "2024-11-14 17:00:00 -0800",
                "[Programming, Java]",
            ),
        );

        let collection = DocumentCollection::load_dir(dir.path()).unwrap();
        let doc = collection.get_by_id("2024-11-14-java").unwrap();
        assert_eq!(
            doc.publish_date,
            chrono::DateTime::parse_from_rfc3339("2024-11-14T17:00:00-08:00").unwrap()
        );
        assert_eq!(doc.categories, vec!["Programming", "Java"]);
    }
}
