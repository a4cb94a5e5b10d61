// ==========================================
// Humidor Hub - API error types
// ==========================================
// Turns importer / exporter / repository errors into
// messages a user can act on.
// ==========================================

use crate::exporter::ExportError;
use crate::importer::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    // ===== Caller errors =====
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    // ===== Pipeline errors =====
    #[error("import failed: {0}")]
    ImportFailed(String),

    #[error("export failed: {0}")]
    ExportFailed(String),

    // ===== Data access =====
    #[error("database error: {0}")]
    DatabaseError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::UnknownField(_)
            | ImportError::UnknownColumn(_)
            | ImportError::IncompleteMapping { .. }
            | ImportError::MissingHumidor
            | ImportError::UnsupportedFormat(_) => ApiError::InvalidInput(err.to_string()),
            ImportError::FileNotFound(path) => ApiError::NotFound(format!("file {}", path)),
            other => ApiError::ImportFailed(other.to_string()),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { collection, id } => {
                ApiError::NotFound(format!("{}/{}", collection, id))
            }
            other => ApiError::DatabaseError(other.to_string()),
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Repository(repo_err) => repo_err.into(),
            other => ApiError::ExportFailed(other.to_string()),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_error_mapping() {
        let err: ApiError = ImportError::IncompleteMapping {
            missing: vec!["brand".into()],
        }
        .into();
        assert!(matches!(err, ApiError::InvalidInput(ref msg) if msg.contains("brand")));

        let err: ApiError = ImportError::WriteError("disk full".into()).into();
        assert!(matches!(err, ApiError::ImportFailed(_)));

        let err: ApiError = ImportError::NoDataRows.into();
        assert!(matches!(err, ApiError::ImportFailed(_)));
    }

    #[test]
    fn test_export_repository_error_is_database_error() {
        let err: ApiError =
            ExportError::Repository(RepositoryError::LockError("poisoned".into())).into();
        assert!(matches!(err, ApiError::DatabaseError(_)));
    }
}
