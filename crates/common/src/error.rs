use std::fmt::Display;

use crate::factory::FactoryError;
use crate::path::PathError;
use crate::repository::RepositoryError;

/// Coarse classification of a [`ContentError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentErrorKind {
    Validation,
    NotFound,
    Conflict,
    Permission,
    Io,
}

/// Error returned by every content operation.
///
/// Only [`ContentError::Io`] may succeed on retry; the other variants
/// describe a caller mistake or a state the caller has to change first.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ContentError {
    /// Bad caller input
    #[error("validation error: {0}")]
    Validation(String),
    /// The target location (or locale) does not exist
    #[error("not found: {0}")]
    NotFound(String),
    /// The identity tuple is already taken
    #[error("conflict: {0}")]
    Conflict(String),
    /// The session user lacks the required permission
    #[error("permission denied: {0}")]
    Permission(String),
    /// Repository or connection fault
    #[error("repository i/o error: {0}")]
    Io(String),
}

impl ContentError {
    pub fn kind(&self) -> ContentErrorKind {
        match self {
            ContentError::Validation(_) => ContentErrorKind::Validation,
            ContentError::NotFound(_) => ContentErrorKind::NotFound,
            ContentError::Conflict(_) => ContentErrorKind::Conflict,
            ContentError::Permission(_) => ContentErrorKind::Permission,
            ContentError::Io(_) => ContentErrorKind::Io,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind() == ContentErrorKind::Io
    }

    /// Reject an empty required parameter.
    pub(crate) fn require(name: &str, value: &str) -> Result<(), ContentError> {
        if value.is_empty() {
            return Err(ContentError::Validation(format!(
                "parameter {} cannot be empty",
                name
            )));
        }
        Ok(())
    }

    /// Translate a repository fault seen by a read-only check.
    pub(crate) fn io<E: Display>(err: RepositoryError<E>) -> ContentError {
        tracing::error!(error = %err, "repository fault");
        ContentError::Io(err.to_string())
    }

    /// Translate the error of a mutating repository call.
    ///
    /// A uniqueness violation caught by the repository itself is still a
    /// conflict; anything else is an i/o fault.
    pub(crate) fn from_mutation<E: Display>(err: RepositoryError<E>) -> ContentError {
        match err {
            RepositoryError::AlreadyExists(what) => {
                ContentError::Conflict(format!("{} exists", what))
            }
            RepositoryError::KindMismatch(path, existing, requested) => ContentError::Conflict(
                format!("{} exists as a {}, cannot create a {}", path, existing, requested),
            ),
            other => ContentError::io(other),
        }
    }
}

impl From<PathError> for ContentError {
    fn from(err: PathError) -> Self {
        ContentError::Validation(err.to_string())
    }
}

impl From<FactoryError> for ContentError {
    fn from(err: FactoryError) -> Self {
        tracing::error!(error = %err, "cannot materialize repository node");
        ContentError::Io(err.to_string())
    }
}
