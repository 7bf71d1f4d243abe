//! The plan store -- durable key-value persistence over [`PlanRecord`],
//! keyed by `(business_name, industry)`.
//!
//! [`PlanStore`] is the persistence seam of the service; [`PgPlanStore`] is
//! the PostgreSQL implementation over the process-scoped pool. Tests
//! substitute in-memory stubs.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use bizplan_db::models::PlanRecord;
use bizplan_db::queries::plans;

/// Persistence interface for plan records.
///
/// # Object Safety
///
/// This trait is object-safe so it can be stored as `Arc<dyn PlanStore>`
/// inside [`crate::PlanService`].
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Look up the record for a key pair. Pure read, no side effects.
    async fn find_by_key(
        &self,
        business_name: &str,
        industry: &str,
    ) -> Result<Option<PlanRecord>>;

    /// Insert or overwrite the record for a key pair as one logical step.
    ///
    /// An existing record keeps its `created_at`; only `plan_text` and
    /// `updated_at` change. Returns the stored record.
    async fn upsert(
        &self,
        business_name: &str,
        industry: &str,
        plan_text: &str,
    ) -> Result<PlanRecord>;

    /// All records, newest first.
    async fn list(&self) -> Result<Vec<PlanRecord>>;
}

// Compile-time assertion: PlanStore must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn PlanStore) {}
};

/// PostgreSQL-backed plan store.
///
/// Holds a clone of the pool created once at startup; `PgPool` is itself a
/// shared handle, so cloning does not open new connections.
#[derive(Clone)]
pub struct PgPlanStore {
    pool: PgPool,
}

impl PgPlanStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlanStore for PgPlanStore {
    async fn find_by_key(
        &self,
        business_name: &str,
        industry: &str,
    ) -> Result<Option<PlanRecord>> {
        plans::find_plan(&self.pool, business_name, industry).await
    }

    async fn upsert(
        &self,
        business_name: &str,
        industry: &str,
        plan_text: &str,
    ) -> Result<PlanRecord> {
        plans::upsert_plan(&self.pool, business_name, industry, plan_text).await
    }

    async fn list(&self) -> Result<Vec<PlanRecord>> {
        plans::list_plans(&self.pool).await
    }
}
