//! Profile check: resolve a profile URL, scrape the profile details, map
//! them into a canonical record, and upsert it.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use creatordb_apify::normalize;
use creatordb_core::{resolver, Platform, ProfileRecord};

use super::{map_apify_error, ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub struct ProfileCheckRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileCheckData {
    pub exists: bool,
    pub username: String,
    pub profile: Option<ProfileRecord>,
}

/// `POST /api/v1/creators/{platform}/profile`
///
/// Zero scrape results mean "profile not found" and come back as
/// `exists: false`; that is a normal outcome, not an error.
pub async fn check_profile(
    State(state): State<AppState>,
    Path(platform): Path<Platform>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ProfileCheckRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.url.trim().is_empty() {
        return Err(ApiError::new(req_id.0, "validation_error", "url is required"));
    }

    let Some(username) = resolver::username_for(platform, &body.url) else {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            format!("not a valid {platform} profile URL"),
        ));
    };
    let profile_url = canonical_profile_url(platform, &username);

    tracing::info!(%platform, %username, "checking creator profile");

    let record = match platform {
        Platform::Instagram => {
            let items = state
                .apify
                .scrape_instagram_profile(&profile_url)
                .await
                .map_err(|e| map_apify_error(req_id.0.clone(), &e))?;
            items
                .into_iter()
                .next()
                .map(normalize::map_instagram_profile)
                .transpose()
                .map_err(|e| map_apify_error(req_id.0.clone(), &e))?
        }
        Platform::Linkedin => {
            let items = state
                .apify
                .scrape_linkedin_profile(&profile_url)
                .await
                .map_err(|e| map_apify_error(req_id.0.clone(), &e))?;
            items
                .into_iter()
                .next()
                .map(normalize::map_linkedin_profile)
                .transpose()
                .map_err(|e| map_apify_error(req_id.0.clone(), &e))?
        }
    };

    let Some(record) = record else {
        tracing::info!(%platform, %username, "profile not found");
        return Ok(Json(ApiResponse {
            data: ProfileCheckData {
                exists: false,
                username,
                profile: None,
            },
            meta: ResponseMeta::new(req_id.0),
        }));
    };

    // A storage failure must not hide a successful scrape from the caller.
    if let Err(e) = creatordb_db::upsert_profile(&state.pool, &record).await {
        tracing::error!(%platform, username = %record.username, error = %e, "profile upsert failed");
    }

    Ok(Json(ApiResponse {
        data: ProfileCheckData {
            exists: true,
            username: record.username.clone(),
            profile: Some(record),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

fn canonical_profile_url(platform: Platform, username: &str) -> String {
    match platform {
        Platform::Instagram => format!("https://www.instagram.com/{username}/"),
        Platform::Linkedin => format!("https://www.linkedin.com/in/{username}/"),
    }
}
