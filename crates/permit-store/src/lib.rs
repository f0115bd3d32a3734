//! Policy-checked Postgres data access for the Permit registry.
//!
//! Every public operation takes the requesting [`Principal`], asks the
//! policy engine for a grant first, and applies the granted row scope and
//! column scope inside the SQL itself. Nothing reads wide and filters in
//! memory afterwards; in particular the anonymous verification lookup
//! projects only the columns its grant names.

use permit_core::{DatabaseConfig, LicensingConfig, Principal};
use permit_policy::PolicyEngine;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

mod applications;
mod error;
mod identity;
mod licenses;
mod rows;

pub use error::StoreError;

/// The data-access layer: a connection pool plus the policy engine every
/// operation consults.
#[derive(Clone)]
pub struct Store {
    pool: PgPool,
    policy: PolicyEngine,
    licensing: LicensingConfig,
}

impl Store {
    /// Connect to Postgres and apply pending migrations.
    pub async fn connect(
        database: &DatabaseConfig,
        licensing: LicensingConfig,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(database.max_connections)
            .connect(&database.url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self {
            pool,
            policy: PolicyEngine::new(),
            licensing,
        })
    }

    /// Build a store on an existing pool (tests, embedding).
    pub fn with_pool(pool: PgPool, licensing: LicensingConfig) -> Self {
        Self {
            pool,
            policy: PolicyEngine::new(),
            licensing,
        }
    }

    /// Cheap connectivity check for the health endpoint.
    pub async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub(crate) fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub(crate) fn policy(&self) -> &PolicyEngine {
        &self.policy
    }

    pub(crate) fn licensing(&self) -> &LicensingConfig {
        &self.licensing
    }

    /// The caller's user id, re-checked after a successful authorization.
    pub(crate) fn require_user_id(principal: &Principal) -> Result<uuid::Uuid, StoreError> {
        principal.user_id.ok_or(StoreError::NotFound)
    }
}
