//! App Context

use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;

use crate::{
    database,
    domain::{
        access_logs::{AccessLogRecorder, AccessLogService, PgAccessLogsRepository},
        audit::PgAuditTrail,
        cache::{InMemoryPassCache, PassCache},
        passes::{PassRegistry, PassesRepository, PassesService, PgPassesRepository},
        qr::{QrSigner, SigningSecret},
        students::{PgStudentsRepository, StudentsRepository},
        verification::{PassVerifier, VerificationService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub passes: Arc<dyn PassesService>,
    pub verification: Arc<dyn VerificationService>,
    pub access_logs: Arc<dyn AccessLogService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(
        url: &str,
        secret: SigningSecret,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        Ok(Self::from_pool(pool, secret))
    }

    /// Wire every service over one pool. The verification cache lives in
    /// this process and is shared by issuance, revocation and verification.
    #[must_use]
    pub fn from_pool(pool: PgPool, secret: SigningSecret) -> Self {
        let signer = QrSigner::new(secret);

        let passes: Arc<dyn PassesRepository> = Arc::new(PgPassesRepository::new(pool.clone()));
        let students: Arc<dyn StudentsRepository> =
            Arc::new(PgStudentsRepository::new(pool.clone()));
        let cache: Arc<dyn PassCache> = Arc::new(InMemoryPassCache::new());

        Self {
            passes: Arc::new(PassRegistry::new(
                Arc::clone(&passes),
                Arc::clone(&students),
                Arc::clone(&cache),
                signer.clone(),
            )),
            verification: Arc::new(PassVerifier::new(passes, students, cache, signer)),
            access_logs: Arc::new(AccessLogRecorder::new(
                Arc::new(PgAccessLogsRepository::new(pool.clone())),
                Arc::new(PgAuditTrail::new(pool)),
            )),
        }
    }
}
