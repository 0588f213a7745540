//! Pass Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use thiserror::Error;

use crate::{
    domain::{
        students::records::{SchoolUuid, StudentUuid},
        users::UserUuid,
    },
    uuids::TypedUuid,
};

/// Pass UUID
pub type PassUuid = TypedUuid<PassRecord>;

/// Lifecycle state of a pass. `Expired` and `Revoked` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassStatus {
    Active,
    Expired,
    Revoked,
}

/// Something that happens to a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassEvent {
    /// Wall-clock expiry observed.
    Expire,

    /// Explicit revocation by staff.
    Revoke,
}

/// Outcome of applying a [`PassEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    To(PassStatus),
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PassTransitionError {
    #[error("pass is already {0}")]
    Terminal(PassStatus),
}

impl PassStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Revoked => "revoked",
        }
    }

    /// The pass state machine.
    ///
    /// Expiry is idempotent and never fails, since concurrent verifications
    /// may all observe the expiry boundary. Revocation only applies to active
    /// passes.
    ///
    /// # Errors
    ///
    /// Returns [`PassTransitionError::Terminal`] when revoking a pass that has
    /// already expired or been revoked.
    pub const fn apply(self, event: PassEvent) -> Result<Transition, PassTransitionError> {
        match (self, event) {
            (Self::Active, PassEvent::Expire) => Ok(Transition::To(Self::Expired)),
            (Self::Active, PassEvent::Revoke) => Ok(Transition::To(Self::Revoked)),
            (Self::Expired | Self::Revoked, PassEvent::Expire) => Ok(Transition::Unchanged),
            (Self::Expired | Self::Revoked, PassEvent::Revoke) => {
                Err(PassTransitionError::Terminal(self))
            }
        }
    }
}

impl fmt::Display for PassStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown pass status \"{0}\"")]
pub struct UnknownPassStatus(pub String);

impl FromStr for PassStatus {
    type Err = UnknownPassStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "expired" => Ok(Self::Expired),
            "revoked" => Ok(Self::Revoked),
            other => Err(UnknownPassStatus(other.to_string())),
        }
    }
}

/// Pass Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassRecord {
    pub uuid: PassUuid,

    /// Human-readable number, `<SCHOOL>-<YEAR>-<SEQUENCE>`.
    pub pass_number: String,

    pub student_uuid: StudentUuid,
    pub school_uuid: SchoolUuid,

    /// Signed payload currently printed on (or displayed for) the pass.
    pub qr_code: String,

    pub pass_type: String,
    pub status: PassStatus,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
    pub issued_by: UserUuid,
    pub revoked_by: Option<UserUuid>,
    pub revoked_at: Option<Timestamp>,
    pub revocation_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PassRecord {
    /// Whether the expiry date has passed at `now`, regardless of `status`.
    #[must_use]
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now > self.expires_at
    }
}
