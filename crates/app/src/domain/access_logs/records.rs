//! Access Log Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::{
    domain::{passes::records::PassUuid, students::records::StudentUuid},
    uuids::TypedUuid,
};

/// Access Log UUID
pub type AccessLogUuid = TypedUuid<AccessLogRecord>;

/// Direction of travel through an access point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessType {
    #[default]
    Entry,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessStatus {
    Granted,
    Denied,
}

impl AccessType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Exit => "exit",
        }
    }
}

impl AccessStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::Denied => "denied",
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for AccessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown access value \"{0}\"")]
pub struct UnknownAccessValue(pub String);

impl FromStr for AccessType {
    type Err = UnknownAccessValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "entry" => Ok(Self::Entry),
            "exit" => Ok(Self::Exit),
            other => Err(UnknownAccessValue(other.to_string())),
        }
    }
}

impl FromStr for AccessStatus {
    type Err = UnknownAccessValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "granted" => Ok(Self::Granted),
            "denied" => Ok(Self::Denied),
            other => Err(UnknownAccessValue(other.to_string())),
        }
    }
}

/// One access attempt, written once and never changed.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessLogRecord {
    pub uuid: AccessLogUuid,
    pub student_uuid: Option<StudentUuid>,
    pub pass_uuid: Option<PassUuid>,
    pub access_point_id: String,
    pub accessed_at: Timestamp,
    pub access_type: AccessType,
    pub status: AccessStatus,
    pub reason: Option<String>,
    pub device_info: Option<Value>,
}
