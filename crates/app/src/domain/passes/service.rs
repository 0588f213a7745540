//! Passes service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp, ToSpan, tz::TimeZone};
use mockall::automock;
use tracing::{info, warn};

use crate::domain::{
    cache::{ISSUANCE_CACHE_TTL, PassCache},
    passes::{
        data::{
            DEFAULT_PASS_TYPE, NewPass, NewPassRecord, PassStatusUpdate, RevokePass,
            TemporaryQrCode, format_pass_number,
        },
        errors::PassesServiceError,
        records::{PassEvent, PassRecord, PassStatus, PassUuid, Transition},
        repository::PassesRepository,
    },
    qr::{PassClaims, QrSigner, REPLAY_WINDOW},
    students::StudentsRepository,
};

/// Staff-facing pass lifecycle: issuance, revocation and code rotation.
#[derive(Clone)]
pub struct PassRegistry {
    passes: Arc<dyn PassesRepository>,
    students: Arc<dyn StudentsRepository>,
    cache: Arc<dyn PassCache>,
    signer: QrSigner,
}

impl PassRegistry {
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

    async fn find_active(
        &self,
        pass: PassUuid,
        now: Timestamp,
    ) -> Result<PassRecord, PassesServiceError> {
        let record = self
            .passes
            .find_by_id(pass)
            .await?
            .ok_or(PassesServiceError::NotFound)?;

        if record.status != PassStatus::Active || record.is_expired_at(now) {
            return Err(PassesServiceError::NotActive);
        }

        Ok(record)
    }

    async fn cache_pass(&self, pass: &PassRecord) {
        if let Err(error) = self
            .cache
            .set(&pass.qr_code, pass.clone(), ISSUANCE_CACHE_TTL)
            .await
        {
            warn!(pass = %pass.uuid, error = %error, "failed to cache pass");
        }
    }

    async fn evict(&self, pass: PassUuid, qr_code: &str) {
        if let Err(error) = self.cache.delete(qr_code).await {
            warn!(pass = %pass, error = %error, "failed to evict cached pass");
        }
    }
}

#[async_trait]
impl PassesService for PassRegistry {
    async fn issue_pass(
        &self,
        pass: NewPass,
        now: Timestamp,
    ) -> Result<PassRecord, PassesServiceError> {
        let student = self
            .students
            .find_student(pass.student_uuid)
            .await?
            .ok_or(PassesServiceError::StudentNotFound)?;

        if !student.status.is_active() {
            return Err(PassesServiceError::StudentInactive(student.status));
        }

        if let Some(existing) = self.passes.find_active_for_student(student.uuid).await? {
            if !existing.is_expired_at(now) {
                return Err(PassesServiceError::ActivePassExists);
            }

            if let Transition::To(status) = existing.status.apply(PassEvent::Expire)? {
                self.passes
                    .update_status(existing.uuid, PassStatusUpdate::expired())
                    .await?;

                info!(pass = %existing.uuid, status = %status, "expired stale pass before issuance");
            }
        }

        let issued_on = now.to_zoned(TimeZone::UTC);
        let expires_at = issued_on.checked_add(1.year())?.timestamp();
        let year = issued_on.year();

        let sequence = self
            .passes
            .next_pass_sequence(student.school_uuid, year)
            .await?;

        let uuid = PassUuid::new();
        let qr_code = self.signer.encode(
            &PassClaims::standard(uuid, student.uuid, student.school_uuid),
            now,
        )?;

        let pass_type = match pass.pass_type.trim() {
            "" => DEFAULT_PASS_TYPE.to_string(),
            pass_type => pass_type.to_string(),
        };

        let created = self
            .passes
            .create_pass(NewPassRecord {
                uuid,
                pass_number: format_pass_number(&student.school_code, year, sequence),
                student_uuid: student.uuid,
                school_uuid: student.school_uuid,
                qr_code,
                pass_type,
                issued_at: now,
                expires_at,
                issued_by: pass.issued_by,
            })
            .await?;

        self.cache_pass(&created).await;

        info!(
            pass = %created.uuid,
            pass_number = %created.pass_number,
            student = %created.student_uuid,
            "issued pass"
        );

        Ok(created)
    }

    async fn revoke_pass(
        &self,
        pass: PassUuid,
        revoke: RevokePass,
        now: Timestamp,
    ) -> Result<PassRecord, PassesServiceError> {
        let reason = revoke.reason.trim();

        if reason.is_empty() {
            return Err(PassesServiceError::MissingReason);
        }

        let record = self
            .passes
            .find_by_id(pass)
            .await?
            .ok_or(PassesServiceError::NotFound)?;

        let Transition::To(_) = record.status.apply(PassEvent::Revoke)? else {
            return Err(PassesServiceError::NotActive);
        };

        let revoked = self
            .passes
            .update_status(
                pass,
                PassStatusUpdate::revoked(revoke.revoked_by, now, reason.to_string()),
            )
            .await?
            .ok_or(PassesServiceError::NotActive)?;

        self.evict(pass, &record.qr_code).await;

        info!(pass = %pass, revoked_by = %revoke.revoked_by, "revoked pass");

        Ok(revoked)
    }

    async fn issue_temporary_code(
        &self,
        pass: PassUuid,
        validity: SignedDuration,
        now: Timestamp,
    ) -> Result<TemporaryQrCode, PassesServiceError> {
        if validity <= SignedDuration::ZERO || validity > REPLAY_WINDOW {
            return Err(PassesServiceError::InvalidValidity);
        }

        let record = self.find_active(pass, now).await?;
        let expires_at = now.checked_add(validity)?.min(record.expires_at);

        let qr_code = self.signer.encode(
            &PassClaims::temporary(
                record.uuid,
                record.student_uuid,
                record.school_uuid,
                expires_at,
            ),
            now,
        )?;

        info!(pass = %pass, expires_at = %expires_at, "issued temporary code");

        Ok(TemporaryQrCode {
            pass_uuid: record.uuid,
            qr_code,
            expires_at,
        })
    }

    async fn refresh_qr_code(
        &self,
        pass: PassUuid,
        now: Timestamp,
    ) -> Result<PassRecord, PassesServiceError> {
        let record = self.find_active(pass, now).await?;

        let qr_code = self.signer.encode(
            &PassClaims::standard(record.uuid, record.student_uuid, record.school_uuid),
            now,
        )?;

        let refreshed = self
            .passes
            .replace_qr_code(pass, &qr_code)
            .await?
            .ok_or(PassesServiceError::NotActive)?;

        self.evict(pass, &record.qr_code).await;
        self.cache_pass(&refreshed).await;

        info!(pass = %pass, "refreshed pass QR code");

        Ok(refreshed)
    }

    async fn get_pass(&self, pass: PassUuid) -> Result<PassRecord, PassesServiceError> {
        self.passes
            .find_by_id(pass)
            .await?
            .ok_or(PassesServiceError::NotFound)
    }
}

#[automock]
#[async_trait]
pub trait PassesService: Send + Sync {
    /// Issue a pass to a student whose application has been approved.
    ///
    /// An active pass that is already past its expiry is expired first and
    /// does not block issuance.
    async fn issue_pass(
        &self,
        pass: NewPass,
        now: Timestamp,
    ) -> Result<PassRecord, PassesServiceError>;

    /// Revoke an active pass and drop it from the verification cache.
    async fn revoke_pass(
        &self,
        pass: PassUuid,
        revoke: RevokePass,
        now: Timestamp,
    ) -> Result<PassRecord, PassesServiceError>;

    /// Sign a short-lived code for an active pass. The code is not stored.
    async fn issue_temporary_code(
        &self,
        pass: PassUuid,
        validity: SignedDuration,
        now: Timestamp,
    ) -> Result<TemporaryQrCode, PassesServiceError>;

    /// Re-sign the stored code of an active pass with a fresh timestamp.
    async fn refresh_qr_code(
        &self,
        pass: PassUuid,
        now: Timestamp,
    ) -> Result<PassRecord, PassesServiceError>;

    async fn get_pass(&self, pass: PassUuid) -> Result<PassRecord, PassesServiceError>;
}
