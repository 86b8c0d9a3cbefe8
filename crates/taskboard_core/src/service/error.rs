//! Service-level error taxonomy.
//!
//! Every façade operation reports one of these. None of them is fatal and
//! every failing operation leaves the stores as they were before the call.

use crate::model::validation::ValidationError;
use crate::model::{EntityId, EntityKind};
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Coarse error class used by transport adapters to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input shape; the caller may resubmit corrected data.
    ValidationFailed,
    /// Uniqueness violation; the caller may choose another value.
    Conflict,
    /// Target id does not exist.
    NotFound,
    /// Backend failure unrelated to the caller's input.
    Storage,
}

/// Errors from service façade operations.
#[derive(Debug)]
pub enum ServiceError {
    /// Candidate fields violate a constraint.
    Validation(ValidationError),
    /// Another entity already holds a declared-unique value.
    Conflict { field: &'static str, value: String },
    /// Target entity does not exist.
    NotFound { kind: EntityKind, id: EntityId },
    /// Referenced parent project does not exist.
    ParentNotFound(EntityId),
    /// Store-level failure.
    Repo(RepoError),
}

impl ServiceError {
    /// Classifies this error for adapters.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::ParentNotFound(_) => ErrorKind::ValidationFailed,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Repo(_) => ErrorKind::Storage,
        }
    }

    pub(crate) fn not_found(kind: EntityKind, id: EntityId) -> Self {
        Self::NotFound { kind, id }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Conflict { field, .. } => {
                write!(f, "a record with that {field} already exists")
            }
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::ParentNotFound(id) => write!(f, "project not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { kind, id } => Self::NotFound { kind, id },
            other => Self::Repo(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorKind, ServiceError};
    use crate::model::validation::ValidationError;
    use crate::model::EntityKind;
    use crate::repo::RepoError;

    #[test]
    fn repo_not_found_becomes_service_not_found() {
        let err: ServiceError = RepoError::NotFound {
            kind: EntityKind::Task,
            id: 9,
        }
        .into();
        assert!(matches!(
            err,
            ServiceError::NotFound {
                kind: EntityKind::Task,
                id: 9
            }
        ));
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "task not found: 9");
    }

    #[test]
    fn conflict_message_names_field() {
        let err = ServiceError::Conflict {
            field: "email",
            value: "a@b.com".to_string(),
        };
        assert_eq!(err.to_string(), "a record with that email already exists");
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn invalid_input_classes_as_validation_failed() {
        let blank: ServiceError = ValidationError::Blank { field: "title" }.into();
        assert_eq!(blank.kind(), ErrorKind::ValidationFailed);
        assert_eq!(
            ServiceError::ParentNotFound(3).kind(),
            ErrorKind::ValidationFailed
        );
    }
}
