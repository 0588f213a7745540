//! Student Records

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::uuids::TypedUuid;

/// Student UUID
pub type StudentUuid = TypedUuid<StudentRecord>;

/// School Record marker
#[derive(Debug)]
pub struct SchoolRecord;

/// School UUID
pub type SchoolUuid = TypedUuid<SchoolRecord>;

/// Enrolment status, as maintained by the student records system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentStatus {
    Active,
    Inactive,
    Suspended,
    Graduated,
    Withdrawn,
}

impl StudentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Suspended => "suspended",
            Self::Graduated => "graduated",
            Self::Withdrawn => "withdrawn",
        }
    }

    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown student status \"{0}\"")]
pub struct UnknownStudentStatus(pub String);

impl FromStr for StudentStatus {
    type Err = UnknownStudentStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "suspended" => Ok(Self::Suspended),
            "graduated" => Ok(Self::Graduated),
            "withdrawn" => Ok(Self::Withdrawn),
            other => Err(UnknownStudentStatus(other.to_string())),
        }
    }
}

/// Student Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRecord {
    pub uuid: StudentUuid,
    pub school_uuid: SchoolUuid,

    /// Short school code used as the pass number prefix.
    pub school_code: String,

    pub status: StudentStatus,
}
