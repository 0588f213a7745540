//! Verification service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{debug, error, warn};

use crate::domain::{
    cache::{PassCache, VERIFICATION_CACHE_TTL},
    passes::{
        PassesRepository,
        data::PassStatusUpdate,
        records::{PassRecord, PassStatus},
    },
    qr::{QrPayload, QrSigner, decode},
    students::StudentsRepository,
    verification::{
        errors::VerificationFailure,
        models::{
            BatchVerification, BatchVerificationError, DenialReason, MAX_BATCH_SIZE, Verification,
        },
    },
};

/// Decides whether a scanned code opens the gate.
#[derive(Clone)]
pub struct PassVerifier {
    passes: Arc<dyn PassesRepository>,
    students: Arc<dyn StudentsRepository>,
    cache: Arc<dyn PassCache>,
    signer: QrSigner,
}

impl PassVerifier {
    #[must_use]
    pub fn new(
        passes: Arc<dyn PassesRepository>,
        students: Arc<dyn StudentsRepository>,
        cache: Arc<dyn PassCache>,
        signer: QrSigner,
    ) -> Self {
        Self {
            passes,
            students,
            cache,
            signer,
        }
    }

    async fn judge(
        &self,
        qr_code: &str,
        now: Timestamp,
    ) -> Result<Verification, VerificationFailure> {
        let payload = match decode(qr_code) {
            Ok(payload) => payload,
            Err(error) => {
                debug!(error = %error, "rejected malformed QR code");

                return Ok(Verification::denied(DenialReason::MalformedCode));
            }
        };

        let pass = if payload.is_temporary() {
            self.passes.find_by_id(payload.pass_id).await?
        } else {
            self.lookup(qr_code, &payload).await?
        };

        let Some(pass) = pass else {
            return Ok(Verification::denied(DenialReason::PassNotFound));
        };

        if pass.status != PassStatus::Active {
            let reason = DenialReason::PassInactive(pass.status);

            return Ok(Verification::denied_for(reason, pass));
        }

        if pass.is_expired_at(now) {
            self.expire(&pass).await;

            return Ok(Verification::denied_for(DenialReason::PassExpired, pass));
        }

        let Some(student) = self.students.find_student(pass.student_uuid).await? else {
            return Ok(Verification::denied_for(
                DenialReason::StudentNotFound,
                pass,
            ));
        };

        if !student.status.is_active() {
            let reason = DenialReason::StudentInactive(student.status);

            return Ok(Verification::denied_for(reason, pass));
        }

        if !self.is_authentic(qr_code, &payload, &pass, now) {
            return Ok(Verification::denied_for(DenialReason::InvalidCode, pass));
        }

        Ok(Verification::Granted { pass, student })
    }

    /// Cache, then the exact stored code, then the pass the payload claims.
    ///
    /// The last step only lets a code that no longer matches the stored one
    /// be denied as invalid instead of reading as an unknown pass; it never
    /// grants.
    async fn lookup(
        &self,
        qr_code: &str,
        payload: &QrPayload,
    ) -> Result<Option<PassRecord>, VerificationFailure> {
        match self.cache.get(qr_code).await {
            Ok(Some(pass)) => return Ok(Some(pass)),
            Ok(None) => {}
            Err(error) => warn!(error = %error, "pass cache read failed, using store"),
        }

        if let Some(pass) = self.passes.find_by_qr_code(qr_code).await? {
            if pass.status == PassStatus::Active {
                if let Err(error) = self
                    .cache
                    .set(qr_code, pass.clone(), VERIFICATION_CACHE_TTL)
                    .await
                {
                    warn!(pass = %pass.uuid, error = %error, "failed to cache pass");
                }
            }

            return Ok(Some(pass));
        }

        Ok(self.passes.find_by_id(payload.pass_id).await?)
    }

    /// Record an observed expiry. Losing the race to another verifier is fine.
    async fn expire(&self, pass: &PassRecord) {
        match self
            .passes
            .update_status(pass.uuid, PassStatusUpdate::expired())
            .await
        {
            Ok(Some(_)) => debug!(pass = %pass.uuid, "expired pass on verification"),
            Ok(None) => {}
            Err(error) => warn!(pass = %pass.uuid, error = %error, "failed to mark pass expired"),
        }
    }

    /// Standard codes must be the exact string on record; temporary codes are
    /// never stored and stand on their signature alone.
    fn is_authentic(
        &self,
        qr_code: &str,
        payload: &QrPayload,
        pass: &PassRecord,
        now: Timestamp,
    ) -> bool {
        (payload.is_temporary() || qr_code == pass.qr_code)
            && self.signer.verify_signature(payload)
            && payload.pass_id == pass.uuid
            && payload.student_id == pass.student_uuid
            && payload.school_id == pass.school_uuid
            && payload.is_within_replay_window(now)
            && !payload.is_temporary_expired(now)
    }
}

#[async_trait]
impl VerificationService for PassVerifier {
    async fn verify(&self, qr_code: &str, now: Timestamp) -> Verification {
        match self.judge(qr_code, now).await {
            Ok(verification) => verification,
            Err(failure) => {
                error!(error = ?failure, "pass verification failed");

                Verification::denied(DenialReason::VerificationError)
            }
        }
    }

    async fn verify_batch(
        &self,
        qr_codes: Vec<String>,
        now: Timestamp,
    ) -> Result<Vec<BatchVerification>, BatchVerificationError> {
        if qr_codes.is_empty() {
            return Err(BatchVerificationError::Empty);
        }

        if qr_codes.len() > MAX_BATCH_SIZE {
            return Err(BatchVerificationError::TooLarge(qr_codes.len()));
        }

        let mut results = Vec::with_capacity(qr_codes.len());

        for qr_code in qr_codes {
            let verification = self.verify(&qr_code, now).await;

            results.push(BatchVerification {
                qr_code,
                verification,
            });
        }

        Ok(results)
    }
}

#[automock]
#[async_trait]
pub trait VerificationService: Send + Sync {
    /// Judge one scanned code as of `now`. Denials, including dependency
    /// failures, are returned as values.
    async fn verify(&self, qr_code: &str, now: Timestamp) -> Verification;

    /// Judge up to [`MAX_BATCH_SIZE`] codes in order.
    ///
    /// # Errors
    ///
    /// Rejects empty and oversized batches before verifying anything.
    async fn verify_batch(
        &self,
        qr_codes: Vec<String>,
        now: Timestamp,
    ) -> Result<Vec<BatchVerification>, BatchVerificationError>;
}
