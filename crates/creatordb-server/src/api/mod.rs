mod analysis;
mod image;
mod ingest;
mod profile;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use creatordb_ai::{AnalysisOptions, AnthropicClient};
use creatordb_apify::{ApifyClient, ApifyError};

use crate::middleware::{
    enforce_rate_limit, request_id, require_bearer_auth, AuthState, RateLimitState, RequestId,
};
use crate::proxy::ImageProxy;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub apify: Arc<ApifyClient>,
    pub anthropic: Arc<AnthropicClient>,
    pub image_proxy: Arc<ImageProxy>,
    pub analysis_options: AnalysisOptions,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "forbidden" => StatusCode::FORBIDDEN,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "provider_error" | "ai_contract" => StatusCode::BAD_GATEWAY,
            "provider_timeout" => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Classifies a scrape-provider failure for the caller. Full detail stays in
/// logs; only a generic, user-safe message crosses the boundary.
pub(super) fn map_apify_error(request_id: String, error: &ApifyError) -> ApiError {
    tracing::error!(error = %error, "scrape provider call failed");
    match error {
        ApifyError::Timeout => ApiError::new(
            request_id,
            "provider_timeout",
            "scrape job exceeded the provider's time budget",
        ),
        _ => ApiError::new(request_id, "provider_error", "scrape provider request failed"),
    }
}

pub(super) fn map_db_error(request_id: String, error: &creatordb_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
            HeaderName::from_static("x-account-id"),
        ])
}

fn protected_router(auth: AuthState, rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/creators/{platform}/profile",
            post(profile::check_profile),
        )
        .route(
            "/api/v1/creators/{platform}/ingest",
            post(ingest::ingest_creator),
        )
        .route(
            "/api/v1/creators/{platform}/analysis",
            post(analysis::generate_analysis),
        )
        .route(
            "/api/v1/creators/{platform}/analysis/check",
            get(analysis::check_analysis),
        )
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    rate_limit,
                    enforce_rate_limit,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    auth,
                    require_bearer_auth,
                )),
        )
}

pub fn build_app(state: AppState, auth: AuthState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new()
        .route("/api/v1/health", get(health))
        // Serves <img> tags directly, so it stays outside bearer auth.
        .route("/api/v1/image-proxy", get(image::proxy_image));

    Router::new()
        .merge(public_routes)
        .merge(protected_router(auth, rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match creatordb_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(120, Duration::from_secs(60))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Builds an `AppState` whose external clients point at `server_uri`
    /// (a wiremock server) so no test ever leaves localhost.
    pub fn state_for_tests(pool: PgPool, server_uri: &str) -> AppState {
        AppState {
            pool,
            apify: Arc::new(
                ApifyClient::with_base_url("test-token", 30, server_uri).expect("apify client"),
            ),
            anthropic: Arc::new(
                AnthropicClient::with_base_url("test-key", server_uri).expect("anthropic client"),
            ),
            image_proxy: Arc::new(
                ImageProxy::with_allowed_domains(5, vec!["cdninstagram.com".to_string()])
                    .expect("image proxy"),
            ),
            analysis_options: AnalysisOptions {
                freshness_days: 7,
                post_cap: 50,
                model: "claude-3-5-sonnet-20241022".to_string(),
                max_tokens: 4000,
            },
        }
    }

    pub fn test_app(pool: PgPool, server_uri: &str) -> Router {
        let auth = AuthState::from_env(true).expect("auth");
        build_app(
            state_for_tests(pool, server_uri),
            auth,
            default_rate_limit_state(),
        )
    }
}
