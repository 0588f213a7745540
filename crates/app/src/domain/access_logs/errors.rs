//! Access log errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccessLogsRepositoryError {
    #[error("pass or student not found for access log")]
    InvalidReference,

    #[error("storage error")]
    Sql(#[source] sqlx::Error),
}

impl From<sqlx::Error> for AccessLogsRepositoryError {
    fn from(error: sqlx::Error) -> Self {
        match error.as_database_error().map(|error| error.kind()) {
            Some(sqlx::error::ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            _ => Self::Sql(error),
        }
    }
}
