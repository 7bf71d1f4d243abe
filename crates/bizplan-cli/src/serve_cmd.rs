//! The HTTP surface: a thin axum layer over [`PlanService`].
//!
//! Contract: `POST /generate-plan` returns `200 {"plan": ...}` on success,
//! 400 with a plain-text body on invalid input, 500 with a plain-text body
//! on generation or persistence failure. `GET /plans` returns every persisted
//! record as JSON. Error bodies are simple messages, not structured codes.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use bizplan_core::{PlanError, PlanService};
use bizplan_db::models::PlanRecord;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError(PlanError);

impl From<PlanError> for AppError {
    fn from(err: PlanError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.0 {
            PlanError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            PlanError::GenerationFailed(_) | PlanError::StoreUnavailable(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.0.to_string()).into_response()
    }
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePlanRequest {
    /// Optional here so an absent field surfaces as a 400 from validation
    /// rather than a deserialization rejection.
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    /// Accepted for forward compatibility; not consumed by the pipeline.
    #[serde(default)]
    pub target_market: Option<String>,
    #[serde(default)]
    pub usps: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GeneratePlanResponse {
    pub plan: String,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(service: Arc<PlanService>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/generate-plan", post(generate_plan))
        .route("/plans", get(list_plans))
        .layer(CorsLayer::permissive())
        .with_state(service)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(service: Arc<PlanService>, bind: &str, port: u16) -> Result<()> {
    let app = build_router(service);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("bizplan serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("bizplan serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn index() -> &'static str {
    "Welcome to the Business Plan Generator!"
}

async fn generate_plan(
    State(service): State<Arc<PlanService>>,
    Json(req): Json<GeneratePlanRequest>,
) -> Result<Json<GeneratePlanResponse>, AppError> {
    let business_name = req.business_name.unwrap_or_default();
    let industry = req.industry.unwrap_or_default();

    let plan = service.generate_plan(&business_name, &industry).await?;
    Ok(Json(GeneratePlanResponse { plan }))
}

async fn list_plans(
    State(service): State<Arc<PlanService>>,
) -> Result<Json<Vec<PlanRecord>>, AppError> {
    let plans = service.list_plans().await?;
    Ok(Json(plans))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use bizplan_core::PlanService;
    use bizplan_core::completion::{CompletionClient, CompletionError};
    use bizplan_core::store::PgPlanStore;
    use bizplan_test_utils::TestDb;

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    struct StubClient {
        outcome: Result<&'static str, ()>,
    }

    #[async_trait]
    impl CompletionClient for StubClient {
        async fn generate(
            &self,
            _business_name: &str,
            _industry: &str,
        ) -> Result<String, CompletionError> {
            match self.outcome {
                Ok(text) => Ok(text.to_string()),
                Err(()) => Err(CompletionError::Api {
                    status: 503,
                    message: "stubbed outage".to_string(),
                }),
            }
        }
    }

    fn app(pool: sqlx::PgPool, outcome: Result<&'static str, ()>) -> axum::Router {
        let service = Arc::new(PlanService::new(
            Arc::new(StubClient { outcome }),
            Arc::new(PgPlanStore::new(pool)),
        ));
        super::build_router(service)
    }

    async fn post_json(app: axum::Router, uri: &str, body: &str) -> axum::response::Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn get(app: axum::Router, uri: &str) -> axum::response::Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1_048_576)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_index_welcome_text() {
        let db = TestDb::new().await;

        let resp = get(app(db.pool.clone(), Ok("unused")), "/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        assert_eq!(
            &bytes[..],
            b"Welcome to the Business Plan Generator!".as_slice()
        );

        db.teardown().await;
    }

    #[tokio::test]
    async fn test_generate_plan_success() {
        let db = TestDb::new().await;

        let resp = post_json(
            app(db.pool.clone(), Ok("A plan for a coffee shop...")),
            "/generate-plan",
            r#"{"businessName":"Sample Coffee Shop","industry":"Food and Beverage"}"#,
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["plan"], "A plan for a coffee shop...");

        // The record must exist under the key pair.
        let stored =
            bizplan_db::queries::plans::find_plan(&db.pool, "Sample Coffee Shop", "Food and Beverage")
                .await
                .unwrap()
                .expect("record should have been persisted");
        assert_eq!(stored.plan_text, "A plan for a coffee shop...");

        db.teardown().await;
    }

    #[tokio::test]
    async fn test_generate_plan_missing_business_name() {
        let db = TestDb::new().await;

        let resp = post_json(
            app(db.pool.clone(), Ok("unused")),
            "/generate-plan",
            r#"{"industry":"Food and Beverage"}"#,
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let all = bizplan_db::queries::plans::list_plans(&db.pool).await.unwrap();
        assert!(all.is_empty(), "store must remain unchanged");

        db.teardown().await;
    }

    #[tokio::test]
    async fn test_generate_plan_empty_industry() {
        let db = TestDb::new().await;

        let resp = post_json(
            app(db.pool.clone(), Ok("unused")),
            "/generate-plan",
            r#"{"businessName":"X","industry":"  "}"#,
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        db.teardown().await;
    }

    #[tokio::test]
    async fn test_generate_plan_completion_failure_is_500() {
        let db = TestDb::new().await;

        let resp = post_json(
            app(db.pool.clone(), Err(())),
            "/generate-plan",
            r#"{"businessName":"X","industry":"Y"}"#,
        )
        .await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let all = bizplan_db::queries::plans::list_plans(&db.pool).await.unwrap();
        assert!(all.is_empty(), "no partial record may be written");

        db.teardown().await;
    }

    #[tokio::test]
    async fn test_generate_plan_ignores_extra_fields() {
        let db = TestDb::new().await;

        let resp = post_json(
            app(db.pool.clone(), Ok("plan body")),
            "/generate-plan",
            r#"{"businessName":"X","industry":"Y","targetMarket":"students","usps":"cheap"}"#,
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        db.teardown().await;
    }

    #[tokio::test]
    async fn test_list_plans_empty() {
        let db = TestDb::new().await;

        let resp = get(app(db.pool.clone(), Ok("unused")), "/plans").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json, serde_json::json!([]));

        db.teardown().await;
    }

    #[tokio::test]
    async fn test_list_plans_storage_failure_is_500() {
        let db = TestDb::new().await;

        let app = app(db.pool.clone(), Ok("unused"));
        // Closing the pool makes every query fail, simulating an
        // unreachable database.
        db.pool.close().await;

        let resp = get(app, "/plans").await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        db.teardown().await;
    }

    #[tokio::test]
    async fn test_list_plans_with_data() {
        let db = TestDb::new().await;

        bizplan_db::queries::plans::upsert_plan(&db.pool, "Acme", "Logistics", "a logistics plan")
            .await
            .expect("upsert should succeed");

        let resp = get(app(db.pool.clone(), Ok("unused")), "/plans").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        let arr = json.as_array().expect("response should be an array");
        assert_eq!(arr.len(), 1);
        assert_eq!(arr[0]["businessName"], "Acme");
        assert_eq!(arr[0]["industry"], "Logistics");
        assert_eq!(arr[0]["planText"], "a logistics plan");
        assert!(arr[0].get("createdAt").is_some());

        db.teardown().await;
    }
}
