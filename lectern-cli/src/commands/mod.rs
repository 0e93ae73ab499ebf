//! CLI command implementations.

pub mod check;
pub mod init;
pub mod list;
pub mod show;

pub use check::check_collection;
pub use init::init_project;
pub use list::list_documents;
pub use show::show_document;
