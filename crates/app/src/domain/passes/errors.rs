//! Passes errors.

use sqlx::{Error, error::ErrorKind};
use thiserror::Error;

use crate::domain::{
    passes::records::PassTransitionError,
    qr::QrCodeError,
    students::{StudentsRepositoryError, records::StudentStatus},
};

#[derive(Debug, Error)]
pub enum PassesRepositoryError {
    #[error("student already holds an active pass")]
    ActivePassExists,

    #[error("related resource not found")]
    InvalidReference,

    #[error("storage error")]
    Sql(#[source] Error),
}

/// Partial unique index enforcing one active pass per student.
const ONE_ACTIVE_PASS_INDEX: &str = "passes_one_active_per_student";

impl From<Error> for PassesRepositoryError {
    fn from(error: Error) -> Self {
        let Some(database_error) = error.as_database_error() else {
            return Self::Sql(error);
        };

        match database_error.kind() {
            ErrorKind::UniqueViolation
                if database_error.constraint() == Some(ONE_ACTIVE_PASS_INDEX) =>
            {
                Self::ActivePassExists
            }
            ErrorKind::ForeignKeyViolation => Self::InvalidReference,
            _ => Self::Sql(error),
        }
    }
}

#[derive(Debug, Error)]
pub enum PassesServiceError {
    #[error("pass not found")]
    NotFound,

    #[error("student not found")]
    StudentNotFound,

    #[error("student is {0}")]
    StudentInactive(StudentStatus),

    #[error("student already holds an active pass")]
    ActivePassExists,

    #[error("pass is not active")]
    NotActive,

    #[error("revocation reason must not be empty")]
    MissingReason,

    #[error("temporary code validity must be positive and at most 24 hours")]
    InvalidValidity,

    #[error(transparent)]
    Transition(#[from] PassTransitionError),

    #[error("pass storage error")]
    Repository(#[source] PassesRepositoryError),

    #[error("student lookup failed")]
    Students(#[from] StudentsRepositoryError),

    #[error("failed to encode QR code")]
    QrCode(#[from] QrCodeError),

    #[error("failed to compute pass dates")]
    Date(#[from] jiff::Error),
}

impl From<PassesRepositoryError> for PassesServiceError {
    fn from(error: PassesRepositoryError) -> Self {
        match error {
            PassesRepositoryError::ActivePassExists => Self::ActivePassExists,
            other => Self::Repository(other),
        }
    }
}
