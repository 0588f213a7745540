//! Access Handlers

pub(crate) mod batch;
pub(crate) mod verify;
