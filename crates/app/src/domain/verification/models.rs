//! Verification Models

use std::fmt;

use thiserror::Error;

use crate::domain::{
    passes::records::{PassRecord, PassStatus},
    students::records::{StudentRecord, StudentStatus},
};

/// Largest number of codes accepted by a single batch.
pub const MAX_BATCH_SIZE: usize = 100;

/// Why a scan was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    MalformedCode,
    PassNotFound,
    PassInactive(PassStatus),
    PassExpired,
    StudentNotFound,
    StudentInactive(StudentStatus),

    /// Signature, identity binding or freshness check failed.
    InvalidCode,

    /// A dependency failed; the scan was not judged.
    VerificationError,
}

impl DenialReason {
    /// Stable label for metrics and logs.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::MalformedCode => "malformed_code",
            Self::PassNotFound => "pass_not_found",
            Self::PassInactive(_) => "pass_inactive",
            Self::PassExpired => "pass_expired",
            Self::StudentNotFound => "student_not_found",
            Self::StudentInactive(_) => "student_inactive",
            Self::InvalidCode => "invalid_code",
            Self::VerificationError => "verification_error",
        }
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedCode => f.write_str("malformed code"),
            Self::PassNotFound => f.write_str("pass not found"),
            Self::PassInactive(status) => write!(f, "pass is {status}"),
            Self::PassExpired => f.write_str("pass has expired"),
            Self::StudentNotFound => f.write_str("student not found"),
            Self::StudentInactive(status) => write!(f, "student is {status}"),
            Self::InvalidCode => f.write_str("invalid QR code"),
            Self::VerificationError => f.write_str("verification error"),
        }
    }
}

/// Outcome of verifying one scanned code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Granted {
        pass: PassRecord,
        student: StudentRecord,
    },

    /// `pass` is set whenever a pass record was resolved before the denial.
    Denied {
        reason: DenialReason,
        pass: Option<PassRecord>,
    },
}

impl Verification {
    pub(crate) fn denied(reason: DenialReason) -> Self {
        Self::Denied { reason, pass: None }
    }

    pub(crate) fn denied_for(reason: DenialReason, pass: PassRecord) -> Self {
        Self::Denied {
            reason,
            pass: Some(pass),
        }
    }

    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted { .. })
    }

    #[must_use]
    pub fn reason(&self) -> Option<DenialReason> {
        match self {
            Self::Granted { .. } => None,
            Self::Denied { reason, .. } => Some(*reason),
        }
    }

    /// The resolved pass, if any.
    #[must_use]
    pub fn pass(&self) -> Option<&PassRecord> {
        match self {
            Self::Granted { pass, .. } => Some(pass),
            Self::Denied { pass, .. } => pass.as_ref(),
        }
    }

    #[must_use]
    pub fn student(&self) -> Option<&StudentRecord> {
        match self {
            Self::Granted { student, .. } => Some(student),
            Self::Denied { .. } => None,
        }
    }
}

/// One entry of a batch result, tagged with the code it answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchVerification {
    pub qr_code: String,
    pub verification: Verification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BatchVerificationError {
    #[error("batch must contain at least one QR code")]
    Empty,

    #[error("batch of {0} QR codes exceeds the limit of {MAX_BATCH_SIZE}")]
    TooLarge(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denial_reasons_read_as_sentences() {
        assert_eq!(
            DenialReason::PassInactive(PassStatus::Revoked).to_string(),
            "pass is revoked"
        );
        assert_eq!(
            DenialReason::StudentInactive(StudentStatus::Graduated).to_string(),
            "student is graduated"
        );
        assert_eq!(DenialReason::InvalidCode.to_string(), "invalid QR code");
    }

    #[test]
    fn batch_errors_name_the_limit() {
        assert_eq!(
            BatchVerificationError::TooLarge(101).to_string(),
            "batch of 101 QR codes exceeds the limit of 100"
        );
    }
}
