//! Access Models

use jiff::Timestamp;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use passgate_app::domain::{
    access_logs::records::AccessType,
    passes::records::PassRecord,
    students::records::StudentRecord,
    verification::Verification,
};

/// Direction of travel through the access point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub(crate) enum AccessDirection {
    #[default]
    Entry,
    Exit,
}

impl From<AccessDirection> for AccessType {
    fn from(direction: AccessDirection) -> Self {
        match direction {
            AccessDirection::Entry => AccessType::Entry,
            AccessDirection::Exit => AccessType::Exit,
        }
    }
}

/// Pass details returned to the gate on a grant.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VerifiedPass {
    pub uuid: Uuid,
    pub pass_number: String,
    pub pass_type: String,
    pub expires_at: String,
}

impl From<&PassRecord> for VerifiedPass {
    fn from(pass: &PassRecord) -> Self {
        Self {
            uuid: pass.uuid.into(),
            pass_number: pass.pass_number.clone(),
            pass_type: pass.pass_type.clone(),
            expires_at: pass.expires_at.to_string(),
        }
    }
}

/// Student details returned to the gate on a grant.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VerifiedStudent {
    pub uuid: Uuid,
    pub school_uuid: Uuid,
    pub status: String,
}

impl From<&StudentRecord> for VerifiedStudent {
    fn from(student: &StudentRecord) -> Self {
        Self {
            uuid: student.uuid.into(),
            school_uuid: student.school_uuid.into(),
            status: student.status.to_string(),
        }
    }
}

/// Outcome of one scan.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VerificationResponse {
    /// Whether the code was accepted
    pub valid: bool,

    /// Whether the gate should open
    pub access_granted: bool,

    /// Denial reason, absent on a grant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass: Option<VerifiedPass>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<VerifiedStudent>,

    /// When the decision was made
    pub timestamp: String,

    /// Human-readable summary for the reader display
    pub message: String,
}

impl VerificationResponse {
    /// Pass and student details are only disclosed on a grant.
    pub(crate) fn new(verification: &Verification, decided_at: Timestamp) -> Self {
        match verification {
            Verification::Granted { pass, student } => Self {
                valid: true,
                access_granted: true,
                reason: None,
                pass: Some(pass.into()),
                student: Some(student.into()),
                timestamp: decided_at.to_string(),
                message: "Access granted".to_string(),
            },
            Verification::Denied { reason, .. } => Self {
                valid: false,
                access_granted: false,
                reason: Some(reason.to_string()),
                pass: None,
                student: None,
                timestamp: decided_at.to_string(),
                message: format!("Access denied: {reason}"),
            },
        }
    }
}

/// Outcome of one entry of a batch, tagged with the code it answers.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BatchEntryResponse {
    pub qr_code: String,

    #[serde(flatten)]
    pub result: VerificationResponse,
}
