//! The image-proxy endpoint: re-serves allow-listed remote images with a
//! controlled content type.
//!
//! This boundary keeps the original's plain `{"error": ...}` body shape and
//! status contract (400 missing param, 403 denied, 502 upstream failure,
//! 504 upstream timeout) because its consumers are `<img>` tags and CDNs,
//! not API clients.

use axum::{
    extract::{Query, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::proxy::ProxyError;

#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
struct ImageErrorBody {
    error: &'static str,
}

/// `GET /api/v1/image-proxy?url=<percent-encoded upstream URL>`
pub async fn proxy_image(
    State(state): State<AppState>,
    Query(query): Query<ImageQuery>,
) -> Response {
    let Some(url) = query.url.filter(|u| !u.trim().is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "image URL is required");
    };

    match state.image_proxy.fetch(&url).await {
        Ok(image) => {
            let mut response = (StatusCode::OK, image.bytes).into_response();
            let headers = response.headers_mut();
            if let Ok(value) = header::HeaderValue::from_str(&image.content_type) {
                headers.insert(header::CONTENT_TYPE, value);
            }
            headers.insert(
                header::CACHE_CONTROL,
                header::HeaderValue::from_static("public, max-age=3600"),
            );
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                header::HeaderValue::from_static("*"),
            );
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                header::HeaderValue::from_static("GET"),
            );
            headers.insert(
                HeaderName::from_static("x-content-type-options"),
                header::HeaderValue::from_static("nosniff"),
            );
            response
        }
        Err(ProxyError::Denied) => {
            error_response(StatusCode::FORBIDDEN, "image URL not from allowed domain")
        }
        Err(ProxyError::Timeout) => {
            error_response(StatusCode::GATEWAY_TIMEOUT, "image fetch timeout")
        }
        Err(ProxyError::Upstream { status }) => {
            tracing::warn!(status, "image proxy upstream failure");
            error_response(StatusCode::BAD_GATEWAY, "failed to fetch image")
        }
        Err(ProxyError::Http(e)) => {
            tracing::warn!(error = %e, "image proxy transport failure");
            error_response(StatusCode::BAD_GATEWAY, "failed to fetch image")
        }
    }
}

fn error_response(status: StatusCode, message: &'static str) -> Response {
    (status, Json(ImageErrorBody { error: message })).into_response()
}
