//! QR Credentials
//!
//! The payload embedded in a pass's QR code is a flat JSON object whose
//! identity fields are authenticated with HMAC-SHA256. Only [`QrSigner`] holds
//! the key; decoding is a plain, strict parse.

mod errors;
mod payload;
mod signer;

pub use errors::QrCodeError;
pub use payload::{PassClaims, QrKind, QrPayload, REPLAY_WINDOW, decode};
pub use signer::{MIN_SECRET_BYTES, QrSigner, SigningSecret};
