//! Access logs service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use serde_json::json;
use tracing::{error, info};

use crate::domain::{
    access_logs::{
        data::{AccessAttempt, MAX_LIST_LIMIT, NewAccessLog},
        errors::AccessLogsRepositoryError,
        records::{AccessLogRecord, AccessStatus},
        repository::AccessLogsRepository,
    },
    audit::{AuditTrail, NewAuditEvent, actions},
    passes::records::PassUuid,
    verification::Verification,
};

const PASS_RESOURCE: &str = "pass";

/// Writes the access log and audit trail for every scan.
#[derive(Clone)]
pub struct AccessLogRecorder {
    logs: Arc<dyn AccessLogsRepository>,
    audit: Arc<dyn AuditTrail>,
}

impl AccessLogRecorder {
    #[must_use]
    pub fn new(logs: Arc<dyn AccessLogsRepository>, audit: Arc<dyn AuditTrail>) -> Self {
        Self { logs, audit }
    }
}

#[async_trait]
impl AccessLogService for AccessLogRecorder {
    async fn record(&self, attempt: AccessAttempt, verification: &Verification) {
        let entry = NewAccessLog::from_verification(attempt, verification);
        let uuid = entry.uuid;
        let pass_uuid = entry.pass_uuid;

        let event = NewAuditEvent {
            actor_uuid: None,
            action: match entry.status {
                AccessStatus::Granted => actions::ACCESS_GRANTED,
                AccessStatus::Denied => actions::ACCESS_DENIED,
            },
            resource_type: PASS_RESOURCE,
            resource_uuid: pass_uuid.map(PassUuid::into_uuid),
            metadata: json!({
                "accessLogUuid": uuid.into_uuid(),
                "accessPointId": entry.access_point_id,
                "accessType": entry.access_type,
                "reason": entry.reason,
            }),
            occurred_at: entry.accessed_at,
        };

        match self.logs.create_access_log(entry).await {
            Ok(record) => info!(
                access_log = %record.uuid,
                pass = ?record.pass_uuid,
                access_point = %record.access_point_id,
                status = %record.status,
                reason = record.reason.as_deref().unwrap_or_default(),
                "recorded access attempt"
            ),
            Err(error) => error!(
                access_log = %uuid,
                pass = ?pass_uuid,
                error = ?error,
                "failed to record access attempt"
            ),
        }

        if let Err(error) = self.audit.record_event(event).await {
            error!(access_log = %uuid, error = ?error, "failed to write access audit event");
        }
    }

    async fn list_for_pass(
        &self,
        pass: PassUuid,
        limit: u32,
    ) -> Result<Vec<AccessLogRecord>, AccessLogsRepositoryError> {
        self.logs
            .list_for_pass(pass, limit.clamp(1, MAX_LIST_LIMIT))
            .await
    }
}

#[automock]
#[async_trait]
pub trait AccessLogService: Send + Sync {
    /// Record one access attempt and its audit event.
    ///
    /// Failures are logged and never reach the caller, so a storage outage
    /// cannot change what the gate is told.
    async fn record(&self, attempt: AccessAttempt, verification: &Verification);

    /// Recent attempts made with a pass, newest first.
    async fn list_for_pass(
        &self,
        pass: PassUuid,
        limit: u32,
    ) -> Result<Vec<AccessLogRecord>, AccessLogsRepositoryError>;
}
