//! Students Repository

use async_trait::async_trait;
use mockall::automock;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query_as};
use thiserror::Error;

use crate::domain::students::records::{SchoolUuid, StudentRecord, StudentStatus, StudentUuid};

const FIND_STUDENT_SQL: &str = include_str!("sql/find_student.sql");

#[derive(Debug, Error)]
pub enum StudentsRepositoryError {
    #[error("storage error")]
    Sql(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StudentsRepositoryError {
    fn from(error: sqlx::Error) -> Self {
        Self::Sql(error)
    }
}

/// Read-only view of the student records system.
#[derive(Debug, Clone)]
pub struct PgStudentsRepository {
    pool: PgPool,
}

impl PgStudentsRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl<'r> FromRow<'r, PgRow> for StudentRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status = row
            .try_get::<String, _>("status")?
            .parse::<StudentStatus>()
            .map_err(|error| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(error),
            })?;

        Ok(Self {
            uuid: StudentUuid::from_uuid(row.try_get("uuid")?),
            school_uuid: SchoolUuid::from_uuid(row.try_get("school_uuid")?),
            school_code: row.try_get("school_code")?,
            status,
        })
    }
}

#[async_trait]
impl StudentsRepository for PgStudentsRepository {
    async fn find_student(
        &self,
        student: StudentUuid,
    ) -> Result<Option<StudentRecord>, StudentsRepositoryError> {
        query_as::<Postgres, StudentRecord>(FIND_STUDENT_SQL)
            .bind(student.into_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(Into::into)
    }
}

#[automock]
#[async_trait]
pub trait StudentsRepository: Send + Sync {
    /// Look up a student and the code of their school.
    async fn find_student(
        &self,
        student: StudentUuid,
    ) -> Result<Option<StudentRecord>, StudentsRepositoryError>;
}
