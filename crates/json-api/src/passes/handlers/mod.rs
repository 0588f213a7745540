//! Pass Handlers

pub(crate) mod access_logs;
pub(crate) mod get;
pub(crate) mod issue;
pub(crate) mod refresh;
pub(crate) mod revoke;
pub(crate) mod temporary_code;
