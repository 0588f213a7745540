//! Access Logs Repository

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use serde_json::Value;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query_as};

use crate::domain::{
    access_logs::{
        data::NewAccessLog,
        errors::AccessLogsRepositoryError,
        records::{AccessLogRecord, AccessLogUuid, AccessStatus, AccessType},
    },
    passes::records::PassUuid,
    students::records::StudentUuid,
};

const CREATE_ACCESS_LOG_SQL: &str = include_str!("sql/create_access_log.sql");
const LIST_FOR_PASS_SQL: &str = include_str!("sql/list_for_pass.sql");

#[derive(Debug, Clone)]
pub struct PgAccessLogsRepository {
    pool: PgPool,
}

impl PgAccessLogsRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn decode_column<T>(row: &PgRow, column: &str) -> sqlx::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    row.try_get::<String, _>(column)?
        .parse::<T>()
        .map_err(|error| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(error),
        })
}

impl<'r> FromRow<'r, PgRow> for AccessLogRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: AccessLogUuid::from_uuid(row.try_get("uuid")?),
            student_uuid: row
                .try_get::<Option<uuid::Uuid>, _>("student_uuid")?
                .map(StudentUuid::from_uuid),
            pass_uuid: row
                .try_get::<Option<uuid::Uuid>, _>("pass_uuid")?
                .map(PassUuid::from_uuid),
            access_point_id: row.try_get("access_point_id")?,
            accessed_at: row.try_get::<SqlxTimestamp, _>("accessed_at")?.to_jiff(),
            access_type: decode_column::<AccessType>(row, "access_type")?,
            status: decode_column::<AccessStatus>(row, "status")?,
            reason: row.try_get("reason")?,
            device_info: row.try_get::<Option<Value>, _>("device_info")?,
        })
    }
}

#[async_trait]
impl AccessLogsRepository for PgAccessLogsRepository {
    async fn create_access_log(
        &self,
        log: NewAccessLog,
    ) -> Result<AccessLogRecord, AccessLogsRepositoryError> {
        query_as::<Postgres, AccessLogRecord>(CREATE_ACCESS_LOG_SQL)
            .bind(log.uuid.into_uuid())
            .bind(log.student_uuid.map(StudentUuid::into_uuid))
            .bind(log.pass_uuid.map(PassUuid::into_uuid))
            .bind(log.access_point_id)
            .bind(SqlxTimestamp::from(log.accessed_at))
            .bind(log.access_type.as_str())
            .bind(log.status.as_str())
            .bind(log.reason)
            .bind(log.device_info)
            .fetch_one(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn list_for_pass(
        &self,
        pass: PassUuid,
        limit: u32,
    ) -> Result<Vec<AccessLogRecord>, AccessLogsRepositoryError> {
        query_as::<Postgres, AccessLogRecord>(LIST_FOR_PASS_SQL)
            .bind(pass.into_uuid())
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(Into::into)
    }
}

#[automock]
#[async_trait]
pub trait AccessLogsRepository: Send + Sync {
    async fn create_access_log(
        &self,
        log: NewAccessLog,
    ) -> Result<AccessLogRecord, AccessLogsRepositoryError>;

    /// Most recent first.
    async fn list_for_pass(
        &self,
        pass: PassUuid,
        limit: u32,
    ) -> Result<Vec<AccessLogRecord>, AccessLogsRepositoryError>;
}
