//! Signing Config

use std::fmt;

use clap::Args;

use passgate_app::domain::qr::{QrCodeError, SigningSecret};

/// QR code signing settings.
#[derive(Args)]
pub struct SigningConfig {
    /// HMAC key used to sign and verify pass QR codes (hex, at least 32 bytes)
    #[arg(long, env = "QR_SIGNING_SECRET", hide_env_values = true)]
    pub qr_signing_secret: String,
}

impl SigningConfig {
    /// Take the configured secret, clearing the raw copy.
    ///
    /// # Errors
    ///
    /// Returns an error when the secret is not hex or too short.
    pub fn take_secret(&mut self) -> Result<SigningSecret, QrCodeError> {
        SigningSecret::try_from(std::mem::take(&mut self.qr_signing_secret))
    }
}

impl fmt::Debug for SigningConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningConfig").finish_non_exhaustive()
    }
}
