//! Verification

mod errors;
pub mod models;
pub mod service;

pub use models::{
    BatchVerification, BatchVerificationError, DenialReason, MAX_BATCH_SIZE, Verification,
};
pub use service::*;
