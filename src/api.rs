//! HTTP API handlers for registration and payment verification.

use crate::core::{
    FieldError, Order, Registrant, RegistrationError, RegistrationFields, RegistrationService,
    VerificationFields,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{error, warn};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub registration: RegistrationService,
}

/// Create the API router.
///
/// With `static_dir` set, unknown GET paths fall back to the frontend's
/// `index.html` so client-side routes keep working.
pub fn create_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let api = Router::new()
        .route("/register", post(register_handler))
        .route("/verify-payment", post(verify_payment_handler));

    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api/auth", api)
        .with_state(Arc::new(state));

    let router = match static_dir {
        Some(dir) => {
            let index = ServeFile::new(dir.join("index.html"));
            router.fallback_service(ServeDir::new(dir).fallback(index))
        }
        None => router,
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// =============================================================================
// Response Types
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MessageResponse {
    fn msg(msg: &str) -> Self {
        Self {
            msg: msg.to_string(),
            errors: None,
            error: None,
        }
    }

    fn validation(errors: Vec<FieldError>) -> Self {
        Self {
            errors: Some(errors),
            ..Self::msg("Validation errors")
        }
    }

    fn failure(msg: &str, error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::msg(msg)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisteredResponse {
    pub msg: String,
    pub user: Registrant,
}

type ApiError = (StatusCode, Json<MessageResponse>);

fn rejection_error(rejection: JsonRejection) -> ApiError {
    warn!("Rejected request body: {}", rejection.body_text());
    (
        StatusCode::BAD_REQUEST,
        Json(MessageResponse::validation(vec![FieldError::new(
            "body",
            &rejection.body_text(),
        )])),
    )
}

/// Map a workflow error onto the wire; `failure_msg` is used for 500s.
fn registration_error(err: RegistrationError, failure_msg: &str) -> ApiError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let body = match err {
        RegistrationError::Validation(errors) => MessageResponse::validation(errors),
        RegistrationError::PaymentNotVerified { .. } => {
            MessageResponse::msg("Payment verification failed")
        }
        other => {
            error!("{}: {} ({})", failure_msg, other, other.recovery_suggestion());
            MessageResponse::failure(failure_msg, other.to_string())
        }
    };

    (status, Json(body))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint.
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Validate registrant fields and open a payment order for the fixed fee.
async fn register_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegistrationFields>, JsonRejection>,
) -> Result<Json<Order>, ApiError> {
    let Json(fields) = payload.map_err(rejection_error)?;

    state
        .registration
        .initiate_order(&fields)
        .await
        .map(Json)
        .map_err(|e| registration_error(e, "Error creating order"))
}

/// Confirm the payment was captured, then store the registrant.
async fn verify_payment_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<VerificationFields>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(fields) = payload.map_err(rejection_error)?;

    let user = state
        .registration
        .verify_and_register(&fields)
        .await
        .map_err(|e| registration_error(e, "Server error"))?;

    Ok((
        StatusCode::CREATED,
        Json(RegisteredResponse {
            msg: "Registration successful".to_string(),
            user,
        }),
    )
        .into_response())
}
