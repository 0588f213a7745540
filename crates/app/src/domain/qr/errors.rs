//! QR codec errors.

use thiserror::Error;

use crate::domain::qr::MIN_SECRET_BYTES;

#[derive(Debug, Error)]
pub enum QrCodeError {
    /// The scanned string is not a well-formed QR payload.
    #[error("malformed QR payload")]
    Malformed(#[source] serde_json::Error),

    #[error("failed to serialize QR payload")]
    Serialize(#[source] serde_json::Error),

    #[error("signing secret must be hex encoded")]
    SecretEncoding,

    #[error("signing secret must be at least {MIN_SECRET_BYTES} bytes")]
    WeakSecret,

    #[error("signing secret was rejected by the HMAC implementation")]
    InvalidKey,
}
