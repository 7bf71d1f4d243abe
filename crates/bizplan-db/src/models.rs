use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted business plan.
///
/// Exactly one row exists per `(business_name, industry)` pair; the unique
/// index in the migration enforces this. `created_at` is set on first insert
/// and never changes; `plan_text` and `updated_at` are overwritten on every
/// later regeneration for the same key.
///
/// Serializes with camelCase field names to match the wire contract of the
/// HTTP surface (`businessName`, `planText`, ...).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PlanRecord {
    pub id: Uuid,
    pub business_name: String,
    pub industry: String,
    pub plan_text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
