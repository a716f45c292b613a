//! # HTTP API
//!
//! JSON facade over the engine. One object in, one object out; the only
//! shared state is the read-only policy.
//!
//! | Method | Path         | Body               | Response          |
//! |--------|--------------|--------------------|-------------------|
//! | GET    | `/health`    | -                  | `{status,version}`|
//! | GET    | `/policy`    | -                  | `PolicyConfig`    |
//! | POST   | `/assess`    | `AssessmentRequest`| `Assessment`      |
//! | POST   | `/wean`      | `WeanRequest`      | `WeanReport`      |
//! | POST   | `/discharge` | `DischargeRequest` | `DischargeReport` |

use crate::cli::{evaluate_assessment, evaluate_discharge, evaluate_wean};
use crate::error::{AppError, AppResult};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bronchio_core::{
    Assessment, AssessmentRequest, BronchioError, DischargeReport, DischargeRequest,
    PolicyConfig, WeanReport, WeanRequest,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// STATE
// =============================================================================

#[derive(Debug, Clone)]
pub struct AppState {
    pub policy: Arc<PolicyConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(policy: PolicyConfig) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }
}

// =============================================================================
// RESPONSES
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Body returned for rejected input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
}

impl ErrorResponse {
    fn from_engine(err: &BronchioError) -> Self {
        let value = match err {
            BronchioError::InvalidObservation { value, .. } => Some(*value),
            _ => None,
        };
        Self {
            error: err.to_string(),
            field: err.field().map(str::to_string),
            value,
        }
    }
}

/// Handler error. Engine rejections map to 422, anything else to 500.
#[derive(Debug)]
pub struct ApiError(AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self.0 {
            AppError::Engine(err) => {
                tracing::debug!(error = %err, "request rejected");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(ErrorResponse::from_engine(err)),
                )
                    .into_response()
            }
            other => {
                tracing::error!(error = %other, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: other.to_string(),
                        field: None,
                        value: None,
                    }),
                )
                    .into_response()
            }
        }
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn get_policy(State(state): State<AppState>) -> Json<PolicyConfig> {
    Json(state.policy.as_ref().clone())
}

async fn assess(
    State(state): State<AppState>,
    Json(request): Json<AssessmentRequest>,
) -> Result<Json<Assessment>, ApiError> {
    Ok(Json(evaluate_assessment(&state.policy, &request)?))
}

async fn wean(
    State(state): State<AppState>,
    Json(request): Json<WeanRequest>,
) -> Result<Json<WeanReport>, ApiError> {
    Ok(Json(evaluate_wean(&state.policy, &request)?))
}

async fn discharge(
    State(state): State<AppState>,
    Json(request): Json<DischargeRequest>,
) -> Result<Json<DischargeReport>, ApiError> {
    Ok(Json(evaluate_discharge(&state.policy, &request)?))
}

// =============================================================================
// ROUTER / SERVER
// =============================================================================

/// Build the router with tracing and CORS layers.
pub fn router(policy: PolicyConfig) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/policy", get(get_policy))
        .route("/assess", post(assess))
        .route("/wean", post(wean))
        .route("/discharge", post(discharge))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(AppState::new(policy))
}

/// Bind and serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, policy: PolicyConfig) -> AppResult<()> {
    let app = router(policy);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "bronchio listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
