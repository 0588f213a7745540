//! QR payload signing.

use std::{fmt, str::FromStr, sync::Arc};

use hmac::{Hmac, Mac};
use jiff::Timestamp;
use rand::{RngCore, rngs::OsRng};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::domain::qr::{PassClaims, QrCodeError, QrPayload, payload::SignedFields};

type HmacSha256 = Hmac<Sha256>;

/// Minimum accepted length of the signing secret.
pub const MIN_SECRET_BYTES: usize = 32;

/// Process-wide HMAC key. Redacted in debug output and wiped on drop.
pub struct SigningSecret {
    bytes: Vec<u8>,
}

impl SigningSecret {
    /// Wrap raw key material.
    ///
    /// # Errors
    ///
    /// Returns [`QrCodeError::WeakSecret`] when fewer than [`MIN_SECRET_BYTES`]
    /// bytes are supplied.
    pub fn new(bytes: Vec<u8>) -> Result<Self, QrCodeError> {
        if bytes.len() < MIN_SECRET_BYTES {
            let mut bytes = bytes;
            bytes.zeroize();

            return Err(QrCodeError::WeakSecret);
        }

        Ok(Self { bytes })
    }

    /// Generate a random secret of [`MIN_SECRET_BYTES`] bytes.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = vec![0_u8; MIN_SECRET_BYTES];

        OsRng.fill_bytes(&mut bytes);

        Self { bytes }
    }

    /// Hex form, as read back by [`FromStr`] and `QR_SIGNING_SECRET`.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Parses the hex encoding produced by [`SigningSecret::to_hex`].
impl FromStr for SigningSecret {
    type Err = QrCodeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let bytes =
            hex::decode(value.trim()).map_err(|_invalid_hex| QrCodeError::SecretEncoding)?;

        Self::new(bytes)
    }
}

/// Parses a hex secret read from configuration and wipes the source string.
impl TryFrom<String> for SigningSecret {
    type Error = QrCodeError;

    fn try_from(mut value: String) -> Result<Self, Self::Error> {
        let secret = value.parse();

        value.zeroize();

        secret
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(**redacted**)")
    }
}

impl Drop for SigningSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

/// Encodes and authenticates QR payloads. The only holder of the secret.
#[derive(Debug, Clone)]
pub struct QrSigner {
    secret: Arc<SigningSecret>,
}

impl QrSigner {
    #[must_use]
    pub fn new(secret: SigningSecret) -> Self {
        Self {
            secret: Arc::new(secret),
        }
    }

    /// Sign `claims` as of `timestamp` and serialize the full payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized.
    pub fn encode(&self, claims: &PassClaims, timestamp: Timestamp) -> Result<String, QrCodeError> {
        let mut payload = QrPayload::new(claims, timestamp, String::new());

        payload.signature = self.sign(&payload.signed_fields())?;

        serde_json::to_string(&payload).map_err(QrCodeError::Serialize)
    }

    /// Recompute the HMAC over the signed fields and compare it with the
    /// embedded signature.
    #[must_use]
    pub fn verify_signature(&self, payload: &QrPayload) -> bool {
        let Ok(expected) = self.sign(&payload.signed_fields()) else {
            return false;
        };

        let embedded = payload.signature.as_bytes();

        if embedded.len() != expected.len() {
            return false;
        }

        expected.as_bytes().ct_eq(embedded).into()
    }

    fn sign(&self, fields: &SignedFields<'_>) -> Result<String, QrCodeError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|_invalid_length| QrCodeError::InvalidKey)?;

        mac.update(&fields.canonical_bytes()?);

        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;
    use testresult::TestResult;
    use uuid::Uuid;

    use crate::domain::{
        passes::records::PassUuid,
        qr::decode,
        students::records::{SchoolUuid, StudentUuid},
    };

    use super::*;

    const SECRET: &str = "7465737420736563726574207465737420736563726574207465737420736563";

    fn signer() -> TestResult<QrSigner> {
        Ok(QrSigner::new(SECRET.parse()?))
    }

    fn claims() -> PassClaims {
        PassClaims::standard(PassUuid::new(), StudentUuid::new(), SchoolUuid::new())
    }

    #[test]
    fn encode_then_decode_preserves_claims_and_verifies() -> TestResult {
        let signer = signer()?;
        let now = Timestamp::now();
        let expires_at = now.checked_add(SignedDuration::from_mins(5))?;

        for claims in [
            claims(),
            PassClaims::temporary(PassUuid::new(), StudentUuid::new(), SchoolUuid::new(), expires_at),
        ] {
            let payload = decode(&signer.encode(&claims, now)?)?;

            assert_eq!(payload.pass_id, claims.pass_id);
            assert_eq!(payload.student_id, claims.student_id);
            assert_eq!(payload.school_id, claims.school_id);
            assert_eq!(payload.expires_at, claims.expires_at);
            assert_eq!(payload.kind, claims.kind);
            assert_eq!(payload.timestamp, now);
            assert!(signer.verify_signature(&payload), "fresh payload must verify");
        }

        Ok(())
    }

    #[test]
    fn wire_format_uses_fixed_field_order() -> TestResult {
        let signer = signer()?;
        let claims = PassClaims::temporary(
            PassUuid::from_uuid(Uuid::nil()),
            StudentUuid::from_uuid(Uuid::nil()),
            SchoolUuid::from_uuid(Uuid::nil()),
            Timestamp::from_second(60)?,
        );

        let encoded = signer.encode(&claims, Timestamp::UNIX_EPOCH)?;

        let prefix = concat!(
            r#"{"passId":"00000000-0000-0000-0000-000000000000","#,
            r#""studentId":"00000000-0000-0000-0000-000000000000","#,
            r#""schoolId":"00000000-0000-0000-0000-000000000000","#,
            r#""timestamp":"1970-01-01T00:00:00Z","#,
            r#""expiresAt":"1970-01-01T00:01:00Z","#,
            r#""type":"temporary","signature":""#,
        );

        assert!(encoded.starts_with(prefix), "unexpected layout: {encoded}");

        Ok(())
    }

    #[test]
    fn flipping_any_signature_character_fails_verification() -> TestResult {
        let signer = signer()?;
        let payload = decode(&signer.encode(&claims(), Timestamp::now())?)?;

        for index in 0..payload.signature.len() {
            let mut tampered = payload.clone();
            let mut bytes = tampered.signature.into_bytes();

            if let Some(byte) = bytes.get_mut(index) {
                *byte = if *byte == b'0' { b'1' } else { b'0' };
            }

            tampered.signature = String::from_utf8(bytes)?;

            assert!(
                !signer.verify_signature(&tampered),
                "tampered signature at {index} must not verify"
            );
        }

        Ok(())
    }

    #[test]
    fn uppercase_signature_is_not_accepted() -> TestResult {
        let signer = signer()?;
        let mut payload = decode(&signer.encode(&claims(), Timestamp::now())?)?;

        payload.signature = payload.signature.to_uppercase();

        assert!(!signer.verify_signature(&payload), "hex must match byte for byte");

        Ok(())
    }

    #[test]
    fn changing_any_signed_field_fails_verification() -> TestResult {
        let signer = signer()?;
        let now = Timestamp::now();
        let expires_at = now.checked_add(SignedDuration::from_mins(5))?;
        let original = decode(&signer.encode(
            &PassClaims::temporary(PassUuid::new(), StudentUuid::new(), SchoolUuid::new(), expires_at),
            now,
        )?)?;

        let mutations: [fn(&mut QrPayload); 6] = [
            |payload| payload.pass_id = PassUuid::new(),
            |payload| payload.student_id = StudentUuid::new(),
            |payload| payload.school_id = SchoolUuid::new(),
            |payload| {
                payload.timestamp = payload
                    .timestamp
                    .checked_add(SignedDuration::from_secs(1))
                    .unwrap_or(Timestamp::UNIX_EPOCH);
            },
            |payload| payload.expires_at = None,
            |payload| payload.kind = None,
        ];

        for (index, mutate) in mutations.iter().enumerate() {
            let mut tampered = original.clone();
            mutate(&mut tampered);

            assert!(
                !signer.verify_signature(&tampered),
                "mutation {index} must invalidate the signature"
            );
        }

        Ok(())
    }

    #[test]
    fn different_secret_does_not_verify() -> TestResult {
        let payload = decode(&signer()?.encode(&claims(), Timestamp::now())?)?;
        let other = QrSigner::new(SigningSecret::generate());

        assert!(!other.verify_signature(&payload), "foreign key must not verify");

        Ok(())
    }

    #[test]
    fn generated_secret_survives_its_hex_form() -> TestResult {
        let generated = SigningSecret::generate();
        let parsed: SigningSecret = generated.to_hex().parse()?;

        assert_eq!(parsed.as_bytes(), generated.as_bytes());
        assert_eq!(parsed.as_bytes().len(), MIN_SECRET_BYTES);

        let payload = decode(&QrSigner::new(generated).encode(&claims(), Timestamp::now())?)?;

        assert!(QrSigner::new(parsed).verify_signature(&payload));

        Ok(())
    }

    #[test]
    fn secret_is_read_as_hex_not_text() -> TestResult {
        let secret = SigningSecret::try_from(format!("  {SECRET}\n"))?;

        assert_eq!(secret.as_bytes().len(), SECRET.len() / 2);
        assert_eq!(secret.as_bytes(), b"test secret test secret test sec");

        Ok(())
    }

    #[test]
    fn non_hex_secret_is_rejected() {
        let text = "an-obviously-test-only-secret-that-is-not-hex-at-all-0123456789";

        assert!(matches!(
            text.parse::<SigningSecret>(),
            Err(QrCodeError::SecretEncoding)
        ));
        assert!(matches!(
            "abc".parse::<SigningSecret>(),
            Err(QrCodeError::SecretEncoding)
        ));
    }

    #[test]
    fn short_secret_is_rejected() {
        let short = "ab".repeat(MIN_SECRET_BYTES - 1);

        assert!(matches!(
            short.parse::<SigningSecret>(),
            Err(QrCodeError::WeakSecret)
        ));
    }

    #[test]
    fn secret_debug_is_redacted() -> TestResult {
        let secret: SigningSecret = SECRET.parse()?;

        assert!(!format!("{secret:?}").contains(SECRET));

        Ok(())
    }
}
