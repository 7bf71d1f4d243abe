//! Plan service layer.
//!
//! Orchestrates the per-request pipeline: validate the key pair, call the
//! completion client, upsert the result, return the text. Each request is
//! independent; there is no cross-request state.

use std::sync::Arc;

use tracing::{info, warn};

use bizplan_db::models::PlanRecord;

use crate::completion::{CompletionClient, CompletionError};
use crate::error::PlanError;
use crate::store::PlanStore;

/// The orchestrator over the completion client and the plan store.
pub struct PlanService {
    client: Arc<dyn CompletionClient>,
    store: Arc<dyn PlanStore>,
}

impl PlanService {
    pub fn new(client: Arc<dyn CompletionClient>, store: Arc<dyn PlanStore>) -> Self {
        Self { client, store }
    }

    /// Generate plan text for a `(business_name, industry)` pair and persist
    /// it under that key.
    ///
    /// Inputs are trimmed before validation; the trimmed values form the
    /// storage key and feed the prompt. Failure at any stage maps to exactly
    /// one [`PlanError`] kind:
    ///
    /// - empty input -> [`PlanError::InvalidRequest`], nothing external is
    ///   invoked;
    /// - completion failure -> [`PlanError::GenerationFailed`], nothing is
    ///   persisted, no retry;
    /// - persistence failure -> [`PlanError::StoreUnavailable`]. Generation
    ///   already succeeded at that point, so the text exists but is not
    ///   durable; the error is surfaced rather than masked.
    pub async fn generate_plan(
        &self,
        business_name: &str,
        industry: &str,
    ) -> Result<String, PlanError> {
        let business_name = business_name.trim();
        let industry = industry.trim();

        if business_name.is_empty() {
            return Err(PlanError::InvalidRequest(
                "businessName must not be empty".to_string(),
            ));
        }
        if industry.is_empty() {
            return Err(PlanError::InvalidRequest(
                "industry must not be empty".to_string(),
            ));
        }

        let plan_text = self
            .client
            .generate(business_name, industry)
            .await
            .map_err(PlanError::GenerationFailed)?;

        // Clients must not return empty text, but the contract of this
        // service is "never an empty success" regardless of implementation.
        if plan_text.trim().is_empty() {
            return Err(PlanError::GenerationFailed(CompletionError::NoText));
        }

        let record = match self
            .store
            .upsert(business_name, industry, &plan_text)
            .await
        {
            Ok(record) => record,
            Err(err) => {
                // The text was generated but never committed; callers get an
                // error, not the undurable text.
                warn!(
                    business_name,
                    industry,
                    chars = plan_text.len(),
                    "generated plan could not be persisted"
                );
                return Err(PlanError::StoreUnavailable(err));
            }
        };

        info!(
            business_name,
            industry,
            chars = record.plan_text.len(),
            "plan generated and stored"
        );
        Ok(record.plan_text)
    }

    /// All persisted plans, newest first.
    pub async fn list_plans(&self) -> Result<Vec<PlanRecord>, PlanError> {
        self.store.list().await.map_err(PlanError::StoreUnavailable)
    }
}
