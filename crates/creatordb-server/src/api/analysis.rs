//! AI analysis endpoints: cache-aware generation plus a read-only cache
//! probe.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use creatordb_ai::{AnalysisError, AnalysisKey, AnalysisOutcome};
use creatordb_core::{resolver, Platform};

use super::{ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::{account_id_from_headers, RequestId};

#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckQuery {
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisMetadata {
    pub model: String,
    pub posts_analyzed: i32,
    pub prompt_version: String,
    pub generated_at: DateTime<Utc>,
    pub cached: bool,
}

#[derive(Debug, Serialize)]
pub struct AnalysisData {
    pub username: String,
    pub analysis: serde_json::Value,
    pub metadata: AnalysisMetadata,
}

#[derive(Debug, Serialize)]
pub struct CheckData {
    pub exists: bool,
    pub username: String,
    pub analysis: Option<serde_json::Value>,
}

impl AnalysisData {
    fn from_outcome(outcome: AnalysisOutcome) -> Self {
        Self {
            username: outcome.username,
            analysis: outcome.analysis,
            metadata: AnalysisMetadata {
                model: outcome.model,
                posts_analyzed: outcome.posts_analyzed,
                prompt_version: outcome.prompt_version,
                generated_at: outcome.generated_at,
                cached: outcome.cached,
            },
        }
    }
}

/// `POST /api/v1/creators/{platform}/analysis`
pub async fn generate_analysis(
    State(state): State<AppState>,
    Path(platform): Path<Platform>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    Json(body): Json<AnalysisRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(account) = account_id_from_headers(&headers) else {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "x-account-id header is required",
        ));
    };
    let Some(username) = resolver::username_for(platform, &body.username) else {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            format!("not a valid {platform} username or profile URL"),
        ));
    };

    let key = AnalysisKey {
        account_id: &account.0,
        platform,
        username: &username,
    };
    let outcome = creatordb_ai::run_creator_analysis(
        &state.pool,
        &state.anthropic,
        key,
        &state.analysis_options,
    )
    .await
    .map_err(|e| map_analysis_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: AnalysisData::from_outcome(outcome),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `GET /api/v1/creators/{platform}/analysis/check?username=`
///
/// Read-only: reports whether a stored analysis exists, never generates.
pub async fn check_analysis(
    State(state): State<AppState>,
    Path(platform): Path<Platform>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    Query(query): Query<CheckQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(account) = account_id_from_headers(&headers) else {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "x-account-id header is required",
        ));
    };
    let Some(username) = query
        .username
        .as_deref()
        .and_then(|u| resolver::username_for(platform, u))
    else {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "username query parameter is required",
        ));
    };

    let key = AnalysisKey {
        account_id: &account.0,
        platform,
        username: &username,
    };
    let stored = creatordb_ai::check_stored_analysis(&state.pool, key)
        .await
        .map_err(|e| map_analysis_error(req_id.0.clone(), &e))?;

    let data = match stored {
        Some(outcome) => CheckData {
            exists: true,
            username,
            analysis: Some(outcome.analysis),
        },
        None => CheckData {
            exists: false,
            username,
            analysis: None,
        },
    };

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Classifies an analysis failure for the caller; diagnostic detail (raw
/// completion previews, provider bodies) stays in logs.
fn map_analysis_error(request_id: String, error: &AnalysisError) -> ApiError {
    match error {
        AnalysisError::NoPosts => ApiError::new(
            request_id,
            "not_found",
            "no posts stored for this creator; run ingestion first",
        ),
        AnalysisError::Contract { reason, raw } => {
            tracing::error!(
                reason = reason.as_str(),
                raw_preview = raw.as_str(),
                "AI response failed validation"
            );
            ApiError::new(
                request_id,
                "ai_contract",
                "AI analysis response failed validation",
            )
        }
        AnalysisError::Provider { status, body } => {
            tracing::error!(status = *status, body = body.as_str(), "completion provider error");
            ApiError::new(request_id, "provider_error", "AI analysis request failed")
        }
        AnalysisError::Http(e) => {
            tracing::error!(error = %e, "completion transport failure");
            ApiError::new(request_id, "provider_error", "AI analysis request failed")
        }
        AnalysisError::Db(e) => super::map_db_error(request_id, e),
    }
}
