//! # lectern-core
//!
//! Core library for lectern, a loader and validator for collections of
//! educational blog posts stored as markdown files with YAML front matter.
//!
//! This crate provides the fundamental building blocks for parsing front
//! matter, extracting structured body blocks (including quiz sections), and
//! querying the loaded collection.

pub mod body;
pub mod collection;
pub mod config;
pub mod frontmatter;
pub mod models;
pub mod slug;
pub mod validate;

pub use collection::{CollectionError, DocumentCollection, LoadError};
pub use config::Config;
pub use frontmatter::{parse_front_matter, FrontMatterError};
pub use models::{
    BodyBlock, Callout, CalloutKind, CodeSample, Diagnostic, DiagnosticSeverity, Document,
    FrontMatter, QuizQuestion, Table,
};
pub use slug::{document_id, slugify};
pub use validate::validate;
