//! Users
//!
//! Staff accounts live in another system; only their identifiers reach this
//! crate, as the actors behind issuance and revocation.

use crate::uuids::TypedUuid;

/// User Record marker
#[derive(Debug)]
pub struct UserRecord;

/// User UUID
pub type UserUuid = TypedUuid<UserRecord>;
