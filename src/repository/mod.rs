// ==========================================
// Humidor Hub - Repository layer
// ==========================================
// Data access only, no business rules.
// All queries are parameterized.
// ==========================================

pub mod document_repo;
pub mod document_repo_impl;
pub mod error;

pub use document_repo::{CollectionChange, DocumentRepository, NewDocument, StoredDocument};
pub use document_repo_impl::DocumentRepositoryImpl;
pub use error::{RepositoryError, RepositoryResult};
