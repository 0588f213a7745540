//! Pass Data

use jiff::Timestamp;

use crate::domain::{
    passes::records::{PassStatus, PassUuid},
    students::records::{SchoolUuid, StudentUuid},
    users::UserUuid,
};

/// Pass type used when none is given.
pub const DEFAULT_PASS_TYPE: &str = "student";

/// Issuance request for a student whose application has been approved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPass {
    pub student_uuid: StudentUuid,
    pub pass_type: String,
    pub issued_by: UserUuid,
}

/// Row to persist for a newly issued pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPassRecord {
    pub uuid: PassUuid,
    pub pass_number: String,
    pub student_uuid: StudentUuid,
    pub school_uuid: SchoolUuid,
    pub qr_code: String,
    pub pass_type: String,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
    pub issued_by: UserUuid,
}

/// Status change applied to a pass that is still active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassStatusUpdate {
    pub status: PassStatus,
    pub revoked_by: Option<UserUuid>,
    pub revoked_at: Option<Timestamp>,
    pub revocation_reason: Option<String>,
}

impl PassStatusUpdate {
    #[must_use]
    pub fn expired() -> Self {
        Self {
            status: PassStatus::Expired,
            revoked_by: None,
            revoked_at: None,
            revocation_reason: None,
        }
    }

    #[must_use]
    pub fn revoked(revoked_by: UserUuid, revoked_at: Timestamp, reason: String) -> Self {
        Self {
            status: PassStatus::Revoked,
            revoked_by: Some(revoked_by),
            revoked_at: Some(revoked_at),
            revocation_reason: Some(reason),
        }
    }
}

/// Revocation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevokePass {
    pub revoked_by: UserUuid,
    pub reason: String,
}

/// A short-lived code for an active pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporaryQrCode {
    pub pass_uuid: PassUuid,
    pub qr_code: String,
    pub expires_at: Timestamp,
}

/// `<SCHOOL>-<YEAR>-<SEQUENCE>`, sequence zero-padded to six digits.
#[must_use]
pub fn format_pass_number(school_code: &str, year: i16, sequence: i64) -> String {
    format!("{}-{year}-{sequence:06}", school_code.trim().to_uppercase())
}
