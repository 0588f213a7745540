//! Audit Trail
//!
//! Append-only record of security-relevant actions, shared with the rest of
//! the platform.

use async_trait::async_trait;
use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use serde_json::Value;
use sqlx::{PgPool, query};
use thiserror::Error;
use uuid::Uuid;

use crate::{domain::users::UserUuid, uuids::TypedUuid};

const RECORD_EVENT_SQL: &str = include_str!("sql/record_event.sql");

/// Audit Event marker
#[derive(Debug)]
pub struct AuditEventRecord;

/// Audit Event UUID
pub type AuditEventUuid = TypedUuid<AuditEventRecord>;

/// Action tags.
pub mod actions {
    pub const ACCESS_GRANTED: &str = "access.granted";
    pub const ACCESS_DENIED: &str = "access.denied";
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditEvent {
    /// `None` for unauthenticated actors such as gate readers.
    pub actor_uuid: Option<UserUuid>,
    pub action: &'static str,
    pub resource_type: &'static str,
    pub resource_uuid: Option<Uuid>,
    pub metadata: Value,
    pub occurred_at: Timestamp,
}

#[derive(Debug, Error)]
pub enum AuditTrailError {
    #[error("failed to write audit event")]
    Sql(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct PgAuditTrail {
    pool: PgPool,
}

impl PgAuditTrail {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditTrail for PgAuditTrail {
    async fn record_event(&self, event: NewAuditEvent) -> Result<AuditEventUuid, AuditTrailError> {
        let uuid = AuditEventUuid::new();

        query(RECORD_EVENT_SQL)
            .bind(uuid.into_uuid())
            .bind(event.actor_uuid.map(UserUuid::into_uuid))
            .bind(event.action)
            .bind(event.resource_type)
            .bind(event.resource_uuid)
            .bind(event.metadata)
            .bind(SqlxTimestamp::from(event.occurred_at))
            .execute(&self.pool)
            .await?;

        Ok(uuid)
    }
}

#[automock]
#[async_trait]
pub trait AuditTrail: Send + Sync {
    async fn record_event(&self, event: NewAuditEvent) -> Result<AuditEventUuid, AuditTrailError>;
}
