//! QR Payload

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

use crate::domain::{
    passes::records::PassUuid,
    qr::QrCodeError,
    students::records::{SchoolUuid, StudentUuid},
};

/// Maximum age of a payload timestamp that is still accepted.
pub const REPLAY_WINDOW: SignedDuration = SignedDuration::from_secs(24 * 60 * 60);

/// Marker for short-lived codes, serialized as `"type": "temporary"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QrKind {
    Temporary,
}

/// Identity a QR code is issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassClaims {
    pub pass_id: PassUuid,
    pub student_id: StudentUuid,
    pub school_id: SchoolUuid,
    pub expires_at: Option<Timestamp>,
    pub kind: Option<QrKind>,
}

impl PassClaims {
    /// Claims for the long-lived code printed on a pass.
    #[must_use]
    pub fn standard(pass_id: PassUuid, student_id: StudentUuid, school_id: SchoolUuid) -> Self {
        Self {
            pass_id,
            student_id,
            school_id,
            expires_at: None,
            kind: None,
        }
    }

    /// Claims for a short-lived code that stops working at `expires_at`.
    #[must_use]
    pub fn temporary(
        pass_id: PassUuid,
        student_id: StudentUuid,
        school_id: SchoolUuid,
        expires_at: Timestamp,
    ) -> Self {
        Self {
            expires_at: Some(expires_at),
            kind: Some(QrKind::Temporary),
            ..Self::standard(pass_id, student_id, school_id)
        }
    }
}

/// A decoded QR payload.
///
/// Field order here is the wire order; the signed subset is serialized by
/// [`SignedFields`] in the same order minus `signature`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QrPayload {
    pub pass_id: PassUuid,
    pub student_id: StudentUuid,
    pub school_id: SchoolUuid,
    pub timestamp: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Timestamp>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<QrKind>,
    pub signature: String,
}

impl QrPayload {
    pub(crate) fn new(claims: &PassClaims, timestamp: Timestamp, signature: String) -> Self {
        Self {
            pass_id: claims.pass_id,
            student_id: claims.student_id,
            school_id: claims.school_id,
            timestamp,
            expires_at: claims.expires_at,
            kind: claims.kind,
            signature,
        }
    }

    #[must_use]
    pub fn is_temporary(&self) -> bool {
        self.kind == Some(QrKind::Temporary)
    }

    /// Whether `timestamp` is no older than [`REPLAY_WINDOW`] at `now`.
    #[must_use]
    pub fn is_within_replay_window(&self, now: Timestamp) -> bool {
        now.duration_since(self.timestamp) <= REPLAY_WINDOW
    }

    /// A temporary code is spent once `now` passes its `expiresAt`. A temporary
    /// code without one is treated as spent.
    #[must_use]
    pub fn is_temporary_expired(&self, now: Timestamp) -> bool {
        if !self.is_temporary() {
            return false;
        }

        self.expires_at.is_none_or(|expires_at| now > expires_at)
    }

    pub(crate) fn signed_fields(&self) -> SignedFields<'_> {
        SignedFields {
            pass_id: &self.pass_id,
            student_id: &self.student_id,
            school_id: &self.school_id,
            timestamp: &self.timestamp,
            expires_at: self.expires_at.as_ref(),
            kind: self.kind,
        }
    }
}

/// Canonical signed subset of a payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignedFields<'a> {
    pass_id: &'a PassUuid,
    student_id: &'a StudentUuid,
    school_id: &'a SchoolUuid,
    timestamp: &'a Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_at: Option<&'a Timestamp>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<QrKind>,
}

impl SignedFields<'_> {
    pub(crate) fn canonical_bytes(&self) -> Result<Vec<u8>, QrCodeError> {
        serde_json::to_vec(self).map_err(QrCodeError::Serialize)
    }
}

/// Parse a scanned string into a payload, failing closed on anything
/// unexpected.
///
/// # Errors
///
/// Returns [`QrCodeError::Malformed`] when the input is not a JSON payload with
/// exactly the expected fields.
pub fn decode(qr_code: &str) -> Result<QrPayload, QrCodeError> {
    serde_json::from_str(qr_code).map_err(QrCodeError::Malformed)
}
