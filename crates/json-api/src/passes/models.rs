//! Pass Models

use std::string::ToString;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use passgate_app::domain::passes::records::PassRecord;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PassResponse {
    /// The unique identifier of the pass
    pub uuid: Uuid,

    /// Human-readable pass number, e.g. `THS-2026-000042`
    pub pass_number: String,

    pub student_uuid: Uuid,
    pub school_uuid: Uuid,
    pub pass_type: String,

    /// `active`, `expired` or `revoked`
    pub status: String,

    /// The signed payload to render as a QR code
    pub qr_code: String,

    pub issued_at: String,
    pub expires_at: String,
    pub issued_by: Uuid,
    pub revoked_by: Option<Uuid>,
    pub revoked_at: Option<String>,
    pub revocation_reason: Option<String>,
}

impl From<PassRecord> for PassResponse {
    fn from(pass: PassRecord) -> Self {
        PassResponse {
            uuid: pass.uuid.into(),
            pass_number: pass.pass_number,
            student_uuid: pass.student_uuid.into(),
            school_uuid: pass.school_uuid.into(),
            pass_type: pass.pass_type,
            status: pass.status.to_string(),
            qr_code: pass.qr_code,
            issued_at: pass.issued_at.to_string(),
            expires_at: pass.expires_at.to_string(),
            issued_by: pass.issued_by.into(),
            revoked_by: pass.revoked_by.map(Into::into),
            revoked_at: pass.revoked_at.as_ref().map(ToString::to_string),
            revocation_reason: pass.revocation_reason,
        }
    }
}
