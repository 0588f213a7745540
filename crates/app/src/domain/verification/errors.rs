//! Verification errors.

use thiserror::Error;

use crate::domain::{passes::PassesRepositoryError, students::StudentsRepositoryError};

/// A dependency failure while judging a scan. Never surfaces to callers;
/// the scan is denied as a verification error instead.
#[derive(Debug, Error)]
pub(crate) enum VerificationFailure {
    #[error("pass lookup failed")]
    Passes(#[from] PassesRepositoryError),

    #[error("student lookup failed")]
    Students(#[from] StudentsRepositoryError),
}
