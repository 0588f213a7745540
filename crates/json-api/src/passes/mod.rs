//! Staff-facing pass management endpoints.
//!
//! These run against the same process-local verification cache as the gate
//! endpoints, so a revocation here stops cached scans immediately.

mod errors;
mod handlers;
mod models;

pub(crate) use handlers::*;
