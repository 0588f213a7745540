//! Access Log Data

use jiff::Timestamp;
use serde_json::Value;

use crate::domain::{
    access_logs::records::{AccessLogUuid, AccessStatus, AccessType},
    passes::records::PassUuid,
    students::records::StudentUuid,
    verification::Verification,
};

/// Default page size when listing access logs.
pub const DEFAULT_LIST_LIMIT: u32 = 50;

/// Largest page size when listing access logs.
pub const MAX_LIST_LIMIT: u32 = 500;

/// Where and how a code was presented.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessAttempt {
    pub access_point_id: String,
    pub access_type: AccessType,
    pub device_info: Option<Value>,
    pub attempted_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAccessLog {
    pub uuid: AccessLogUuid,
    pub student_uuid: Option<StudentUuid>,
    pub pass_uuid: Option<PassUuid>,
    pub access_point_id: String,
    pub accessed_at: Timestamp,
    pub access_type: AccessType,
    pub status: AccessStatus,
    pub reason: Option<String>,
    pub device_info: Option<Value>,
}

impl NewAccessLog {
    /// Ids come from the resolved pass, so an unresolved scan logs none.
    #[must_use]
    pub fn from_verification(attempt: AccessAttempt, verification: &Verification) -> Self {
        let pass = verification.pass();

        Self {
            uuid: AccessLogUuid::new(),
            student_uuid: pass.map(|pass| pass.student_uuid),
            pass_uuid: pass.map(|pass| pass.uuid),
            access_point_id: attempt.access_point_id,
            accessed_at: attempt.attempted_at,
            access_type: attempt.access_type,
            status: if verification.is_granted() {
                AccessStatus::Granted
            } else {
                AccessStatus::Denied
            },
            reason: verification.reason().as_ref().map(ToString::to_string),
            device_info: attempt.device_info,
        }
    }
}
