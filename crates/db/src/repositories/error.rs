//! Repository error type.

use foodcost_core::reconcile::ReconcileError;
use foodcost_core::validation::ValidationError;
use foodcost_shared::AppError;
use sea_orm::DbErr;

use super::limits::LimitedResource;

/// Errors returned by every repository.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Input failed validation; nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Reconciliation could not be committed; nothing was written.
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    /// The insert-limit oracle vetoed the write.
    #[error("You have reached the limit for {0}")]
    LimitReached(LimitedResource),

    /// A referenced row does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity name.
        entity: &'static str,
        /// Requested ID.
        id: String,
    },

    /// A stored row holds a value the domain cannot represent.
    #[error("Corrupt {entity} row: {reason}")]
    CorruptRow {
        /// Entity name.
        entity: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// Database error; the enclosing transaction was rolled back.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl RepositoryError {
    /// Shorthand for [`RepositoryError::NotFound`].
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Returns the error code for callers.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.error_code(),
            Self::Reconcile(e) => e.error_code(),
            Self::LimitReached(_) => "LIMIT_REACHED",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::CorruptRow { .. } => "CORRUPT_ROW",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Validation(e) => Self::Validation(e.to_string()),
            RepositoryError::Reconcile(e) => Self::BusinessRule(e.to_string()),
            RepositoryError::LimitReached(_) => Self::LimitReached(err.to_string()),
            RepositoryError::NotFound { .. } => Self::NotFound(err.to_string()),
            RepositoryError::CorruptRow { .. } => Self::Internal(err.to_string()),
            RepositoryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}
