//! Passes Repository

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query_as, query_scalar};

use crate::domain::{
    passes::{
        data::{NewPassRecord, PassStatusUpdate},
        errors::PassesRepositoryError,
        records::{PassRecord, PassStatus, PassUuid},
    },
    students::records::{SchoolUuid, StudentUuid},
    users::UserUuid,
};

const FIND_BY_QR_CODE_SQL: &str = include_str!("sql/find_by_qr_code.sql");
const FIND_BY_ID_SQL: &str = include_str!("sql/find_by_id.sql");
const FIND_ACTIVE_FOR_STUDENT_SQL: &str = include_str!("sql/find_active_for_student.sql");
const NEXT_PASS_SEQUENCE_SQL: &str = include_str!("sql/next_pass_sequence.sql");
const CREATE_PASS_SQL: &str = include_str!("sql/create_pass.sql");
const UPDATE_STATUS_SQL: &str = include_str!("sql/update_status.sql");
const REPLACE_QR_CODE_SQL: &str = include_str!("sql/replace_qr_code.sql");

#[derive(Debug, Clone)]
pub struct PgPassesRepository {
    pool: PgPool,
}

impl PgPassesRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl<'r> FromRow<'r, PgRow> for PassRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status = row
            .try_get::<String, _>("status")?
            .parse::<PassStatus>()
            .map_err(|error| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(error),
            })?;

        Ok(Self {
            uuid: PassUuid::from_uuid(row.try_get("uuid")?),
            pass_number: row.try_get("pass_number")?,
            student_uuid: StudentUuid::from_uuid(row.try_get("student_uuid")?),
            school_uuid: SchoolUuid::from_uuid(row.try_get("school_uuid")?),
            qr_code: row.try_get("qr_code")?,
            pass_type: row.try_get("pass_type")?,
            status,
            issued_at: row.try_get::<SqlxTimestamp, _>("issued_at")?.to_jiff(),
            expires_at: row.try_get::<SqlxTimestamp, _>("expires_at")?.to_jiff(),
            issued_by: UserUuid::from_uuid(row.try_get("issued_by")?),
            revoked_by: row
                .try_get::<Option<uuid::Uuid>, _>("revoked_by")?
                .map(UserUuid::from_uuid),
            revoked_at: row
                .try_get::<Option<SqlxTimestamp>, _>("revoked_at")?
                .map(SqlxTimestamp::to_jiff),
            revocation_reason: row.try_get("revocation_reason")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

#[async_trait]
impl PassesRepository for PgPassesRepository {
    async fn find_by_qr_code(
        &self,
        qr_code: &str,
    ) -> Result<Option<PassRecord>, PassesRepositoryError> {
        query_as::<Postgres, PassRecord>(FIND_BY_QR_CODE_SQL)
            .bind(qr_code)
            .fetch_optional(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn find_by_id(&self, pass: PassUuid) -> Result<Option<PassRecord>, PassesRepositoryError> {
        query_as::<Postgres, PassRecord>(FIND_BY_ID_SQL)
            .bind(pass.into_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn find_active_for_student(
        &self,
        student: StudentUuid,
    ) -> Result<Option<PassRecord>, PassesRepositoryError> {
        query_as::<Postgres, PassRecord>(FIND_ACTIVE_FOR_STUDENT_SQL)
            .bind(student.into_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn next_pass_sequence(
        &self,
        school: SchoolUuid,
        year: i16,
    ) -> Result<i64, PassesRepositoryError> {
        query_scalar::<Postgres, i64>(NEXT_PASS_SEQUENCE_SQL)
            .bind(school.into_uuid())
            .bind(year)
            .fetch_one(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn create_pass(&self, pass: NewPassRecord) -> Result<PassRecord, PassesRepositoryError> {
        query_as::<Postgres, PassRecord>(CREATE_PASS_SQL)
            .bind(pass.uuid.into_uuid())
            .bind(pass.pass_number)
            .bind(pass.student_uuid.into_uuid())
            .bind(pass.school_uuid.into_uuid())
            .bind(pass.qr_code)
            .bind(pass.pass_type)
            .bind(SqlxTimestamp::from(pass.issued_at))
            .bind(SqlxTimestamp::from(pass.expires_at))
            .bind(pass.issued_by.into_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn update_status(
        &self,
        pass: PassUuid,
        update: PassStatusUpdate,
    ) -> Result<Option<PassRecord>, PassesRepositoryError> {
        query_as::<Postgres, PassRecord>(UPDATE_STATUS_SQL)
            .bind(pass.into_uuid())
            .bind(update.status.as_str())
            .bind(update.revoked_by.map(UserUuid::into_uuid))
            .bind(update.revoked_at.map(SqlxTimestamp::from))
            .bind(update.revocation_reason)
            .fetch_optional(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn replace_qr_code(
        &self,
        pass: PassUuid,
        qr_code: &str,
    ) -> Result<Option<PassRecord>, PassesRepositoryError> {
        query_as::<Postgres, PassRecord>(REPLACE_QR_CODE_SQL)
            .bind(pass.into_uuid())
            .bind(qr_code)
            .fetch_optional(&self.pool)
            .await
            .map_err(Into::into)
    }
}

#[automock]
#[async_trait]
pub trait PassesRepository: Send + Sync {
    /// Exact match on the stored QR string.
    async fn find_by_qr_code(
        &self,
        qr_code: &str,
    ) -> Result<Option<PassRecord>, PassesRepositoryError>;

    async fn find_by_id(&self, pass: PassUuid) -> Result<Option<PassRecord>, PassesRepositoryError>;

    async fn find_active_for_student(
        &self,
        student: StudentUuid,
    ) -> Result<Option<PassRecord>, PassesRepositoryError>;

    /// Atomically allocate the next sequence number for a school and year,
    /// starting at 1.
    async fn next_pass_sequence(
        &self,
        school: SchoolUuid,
        year: i16,
    ) -> Result<i64, PassesRepositoryError>;

    /// Insert an active pass.
    ///
    /// Fails with [`PassesRepositoryError::ActivePassExists`] if the student
    /// already holds one.
    async fn create_pass(&self, pass: NewPassRecord) -> Result<PassRecord, PassesRepositoryError>;

    /// Apply a status change only while the pass is still active. Returns
    /// `None` if the pass is missing or has already left the active state.
    async fn update_status(
        &self,
        pass: PassUuid,
        update: PassStatusUpdate,
    ) -> Result<Option<PassRecord>, PassesRepositoryError>;

    /// Swap the stored QR string of an active pass.
    async fn replace_qr_code(
        &self,
        pass: PassUuid,
        qr_code: &str,
    ) -> Result<Option<PassRecord>, PassesRepositoryError>;
}
