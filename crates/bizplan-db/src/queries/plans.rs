//! Database query functions for the `plans` table.

use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::models::PlanRecord;

/// Look up the plan for a `(business_name, industry)` pair. Pure read, no
/// side effects.
pub async fn find_plan(
    pool: &PgPool,
    business_name: &str,
    industry: &str,
) -> Result<Option<PlanRecord>> {
    let record = sqlx::query_as::<_, PlanRecord>(
        "SELECT * FROM plans WHERE business_name = $1 AND industry = $2",
    )
    .bind(business_name)
    .bind(industry)
    .fetch_optional(pool)
    .await
    .context("failed to fetch plan")?;

    Ok(record)
}

/// Insert or update the plan for a `(business_name, industry)` pair as a
/// single atomic statement.
///
/// On conflict with the unique key the existing row keeps its `created_at`;
/// only `plan_text` and `updated_at` are overwritten. Returns the stored row.
pub async fn upsert_plan(
    pool: &PgPool,
    business_name: &str,
    industry: &str,
    plan_text: &str,
) -> Result<PlanRecord> {
    let record = sqlx::query_as::<_, PlanRecord>(
        "INSERT INTO plans (business_name, industry, plan_text) \
         VALUES ($1, $2, $3) \
         ON CONFLICT (business_name, industry) \
         DO UPDATE SET plan_text = EXCLUDED.plan_text, updated_at = now() \
         RETURNING *",
    )
    .bind(business_name)
    .bind(industry)
    .bind(plan_text)
    .fetch_one(pool)
    .await
    .context("failed to upsert plan")?;

    Ok(record)
}

/// List all plans, ordered by creation time (newest first).
pub async fn list_plans(pool: &PgPool) -> Result<Vec<PlanRecord>> {
    let records = sqlx::query_as::<_, PlanRecord>("SELECT * FROM plans ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
        .context("failed to list plans")?;

    Ok(records)
}
