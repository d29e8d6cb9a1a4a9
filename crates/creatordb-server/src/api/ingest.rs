//! Post ingestion: scrape a creator's recent posts, normalize them, and
//! persist them in one request-scoped pass.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use creatordb_apify::{comments, normalize, ApifyError};
use creatordb_core::{resolver, Platform, PostRecord};

use super::{map_apify_error, ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

/// Default scrape limits per platform; LinkedIn runs cost more per post.
const DEFAULT_INSTAGRAM_LIMIT: u32 = 12;
const DEFAULT_LINKEDIN_LIMIT: u32 = 3;
const MAX_RESULTS_LIMIT: u32 = 50;

/// Comments fetched per LinkedIn post.
const LINKEDIN_COMMENT_LIMIT: u32 = 3;

#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    pub username: String,
    pub results_limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct IngestData {
    pub platform: Platform,
    pub username: String,
    pub total_posts: usize,
    pub posts: Vec<PostRecord>,
    pub saved_count: usize,
    pub error_count: usize,
}

/// `POST /api/v1/creators/{platform}/ingest`
pub async fn ingest_creator(
    State(state): State<AppState>,
    Path(platform): Path<Platform>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<IngestRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.username.trim().is_empty() {
        return Err(ApiError::new(req_id.0, "validation_error", "username is required"));
    }

    let Some(username) = resolver::username_for(platform, &body.username) else {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            format!("not a valid {platform} username or profile URL"),
        ));
    };

    let default_limit = match platform {
        Platform::Instagram => DEFAULT_INSTAGRAM_LIMIT,
        Platform::Linkedin => DEFAULT_LINKEDIN_LIMIT,
    };
    let limit = body
        .results_limit
        .unwrap_or(default_limit)
        .clamp(1, MAX_RESULTS_LIMIT);

    tracing::info!(%platform, %username, limit, "starting creator ingestion");

    let (posts, mapping_failures) = match platform {
        Platform::Instagram => scrape_instagram(&state, &username, limit, &req_id.0).await?,
        Platform::Linkedin => scrape_linkedin(&state, &username, limit, &req_id.0).await?,
    };

    if posts.is_empty() && mapping_failures == 0 {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("no posts found for username: {username}"),
        ));
    }

    let tally = creatordb_db::upsert_posts(&state.pool, &posts).await;
    tracing::info!(
        %platform,
        %username,
        saved = tally.saved,
        failed = tally.failed + mapping_failures,
        "creator ingestion finished"
    );

    Ok(Json(ApiResponse {
        data: IngestData {
            platform,
            username,
            total_posts: posts.len(),
            posts,
            saved_count: tally.saved,
            error_count: tally.failed + mapping_failures,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Scrapes and maps Instagram posts. Returns the mapped records and the
/// number of raw items that could not be mapped.
async fn scrape_instagram(
    state: &AppState,
    username: &str,
    limit: u32,
    request_id: &str,
) -> Result<(Vec<PostRecord>, usize), ApiError> {
    let items = state
        .apify
        .scrape_instagram_posts(username, limit)
        .await
        .map_err(|e| map_apify_error(request_id.to_string(), &e))?;

    let mut posts = Vec::with_capacity(items.len());
    let mut failures = 0;
    for item in items {
        match normalize::map_instagram_post(item, username) {
            Ok(record) => posts.push(record),
            Err(e) => {
                tracing::warn!(username, error = %e, "skipping unmappable instagram post");
                failures += 1;
            }
        }
    }
    Ok((posts, failures))
}

/// Scrapes and maps LinkedIn posts, then enriches posts that have comments
/// with commenter headlines. A failing comment run degrades to posts
/// without commenter data rather than failing the ingestion.
async fn scrape_linkedin(
    state: &AppState,
    username: &str,
    limit: u32,
    request_id: &str,
) -> Result<(Vec<PostRecord>, usize), ApiError> {
    let items = state
        .apify
        .scrape_linkedin_posts(username, limit)
        .await
        .map_err(|e| map_apify_error(request_id.to_string(), &e))?;

    let commented_urns: Vec<String> = items
        .iter()
        .filter(|item| {
            item.stats
                .as_ref()
                .and_then(|s| s.comments)
                .is_some_and(|count| count > 0)
        })
        .filter_map(|item| item.urn.clone())
        .collect();

    let commenters_by_post = if commented_urns.is_empty() {
        std::collections::BTreeMap::new()
    } else {
        match state
            .apify
            .scrape_linkedin_comments(&commented_urns, LINKEDIN_COMMENT_LIMIT)
            .await
        {
            Ok(comment_items) => comments::capture_linkedin_headlines(username, &comment_items),
            Err(e @ ApifyError::Timeout) => {
                return Err(map_apify_error(request_id.to_string(), &e));
            }
            Err(e) => {
                tracing::warn!(username, error = %e, "comment run failed; continuing without commenter data");
                std::collections::BTreeMap::new()
            }
        }
    };

    let mut posts = Vec::with_capacity(items.len());
    let mut failures = 0;
    for item in items {
        match normalize::map_linkedin_post(item, username, &commenters_by_post) {
            Ok(record) => posts.push(record),
            Err(e) => {
                tracing::warn!(username, error = %e, "skipping unmappable linkedin post");
                failures += 1;
            }
        }
    }
    Ok((posts, failures))
}
