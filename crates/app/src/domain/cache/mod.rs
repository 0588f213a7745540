//! Verification Cache
//!
//! Advisory, TTL-bounded lookup of pass records by the exact QR string that
//! was scanned. The pass store stays the source of truth: callers treat every
//! cache failure as a miss.

use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use crate::domain::passes::records::PassRecord;

mod memory;

pub use memory::InMemoryPassCache;

/// TTL for entries populated on the verification miss path.
pub const VERIFICATION_CACHE_TTL: Duration = Duration::from_secs(30 * 60);

/// TTL for entries populated at issuance.
pub const ISSUANCE_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
}

/// Storage key for a scanned QR string.
#[must_use]
pub fn cache_key(qr_code: &str) -> String {
    format!("pass:{qr_code}")
}

#[automock]
#[async_trait]
pub trait PassCache: Send + Sync {
    /// Cached pass for a QR string, if present and not past its TTL.
    async fn get(&self, qr_code: &str) -> Result<Option<PassRecord>, CacheError>;

    async fn set(&self, qr_code: &str, pass: PassRecord, ttl: Duration) -> Result<(), CacheError>;

    async fn delete(&self, qr_code: &str) -> Result<(), CacheError>;
}
