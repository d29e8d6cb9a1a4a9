//! Fetch-and-reserve for remote avatar images.
//!
//! The target URL arrives only via an opaque internal reference and must
//! contain an allow-listed CDN domain substring; anything else is rejected
//! before any outbound request is made. The proxy sits on a user-facing
//! rendering path, so its timeout is short.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER};
use reqwest::{Client, StatusCode};
use thiserror::Error;

/// Per-platform CDN hostnames an image URL must contain one of.
const ALLOWED_DOMAINS: &[&str] = &[
    "cdninstagram.com",
    "fbcdn.net",
    "instagram.com",
    "scontent-",
    "media.licdn.com",
    "licdn.com",
];

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

#[derive(Debug, Error)]
pub enum ProxyError {
    /// The URL does not contain an allow-listed domain; no fetch was made.
    #[error("image URL is not from an allowed domain")]
    Denied,

    /// The upstream fetch exceeded the proxy timeout.
    #[error("image fetch timed out")]
    Timeout,

    /// The upstream returned a non-success status.
    #[error("upstream image fetch failed with status {status}")]
    Upstream { status: u16 },

    /// Transport failure before any status was received.
    #[error("image fetch failed: {0}")]
    Http(reqwest::Error),
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProxyError::Timeout
        } else {
            ProxyError::Http(err)
        }
    }
}

/// A fetched image ready to re-serve.
#[derive(Debug, Clone)]
pub struct ProxiedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Allow-listed image fetcher with platform-appropriate headers.
pub struct ImageProxy {
    client: Client,
    allowed: Vec<String>,
}

impl ImageProxy {
    /// Creates a proxy with the fixed production allow-list.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, ProxyError> {
        Self::with_allowed_domains(
            timeout_secs,
            ALLOWED_DOMAINS.iter().map(ToString::to_string).collect(),
        )
    }

    /// Creates a proxy with a custom allow-list (for tests).
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_allowed_domains(
        timeout_secs: u64,
        allowed: Vec<String>,
    ) -> Result<Self, ProxyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, allowed })
    }

    fn is_allowed(&self, url: &str) -> bool {
        self.allowed.iter().any(|domain| url.contains(domain))
    }

    /// Fetches the image at `url` and determines its content type.
    ///
    /// A 403 from a LinkedIn CDN gets exactly one fallback attempt with
    /// minimal headers before failing.
    ///
    /// # Errors
    ///
    /// - [`ProxyError::Denied`] when the URL fails the allow-list check; no
    ///   outbound request is made in that case.
    /// - [`ProxyError::Timeout`] when the upstream fetch exceeds the proxy
    ///   timeout.
    /// - [`ProxyError::Upstream`] on a non-success upstream status.
    /// - [`ProxyError::Http`] on transport failure.
    pub async fn fetch(&self, url: &str) -> Result<ProxiedImage, ProxyError> {
        if !self.is_allowed(url) {
            tracing::warn!(url, "image URL rejected by domain allow-list");
            return Err(ProxyError::Denied);
        }

        let is_linkedin_cdn = url.contains("licdn");
        let mut response = self
            .client
            .get(url)
            .headers(platform_headers(is_linkedin_cdn))
            .send()
            .await?;

        if response.status() == StatusCode::FORBIDDEN && is_linkedin_cdn {
            tracing::debug!(url, "403 from LinkedIn CDN, retrying with minimal headers");
            response = self.client.get(url).send().await?;
        }

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "upstream image fetch failed");
            return Err(ProxyError::Upstream {
                status: status.as_u16(),
            });
        }

        let header_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);
        let content_type = content_type_for(url, header_type.as_deref());
        let bytes = response.bytes().await?.to_vec();

        tracing::debug!(url, size = bytes.len(), content_type, "image fetched");
        Ok(ProxiedImage {
            bytes,
            content_type,
        })
    }
}

fn platform_headers(is_linkedin_cdn: bool) -> HeaderMap {
    let referer = if is_linkedin_cdn {
        "https://www.linkedin.com/"
    } else {
        "https://www.instagram.com/"
    };
    let mut headers = HeaderMap::new();
    headers.insert(
        reqwest::header::USER_AGENT,
        HeaderValue::from_static(BROWSER_USER_AGENT),
    );
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("image/webp,image/apng,image/*,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(REFERER, HeaderValue::from_static(referer));
    headers
}

/// Picks the content type: the upstream header when it is an image MIME
/// type, else the URL's file extension, defaulting to JPEG.
fn content_type_for(url: &str, header: Option<&str>) -> String {
    if let Some(header) = header {
        if header.starts_with("image/") {
            return header.to_string();
        }
    }
    if url.contains(".png") {
        "image/png".to_string()
    } else if url.contains(".gif") {
        "image/gif".to_string()
    } else if url.contains(".webp") {
        "image/webp".to_string()
    } else {
        "image/jpeg".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_matches_on_substring() {
        let proxy = ImageProxy::new(15).expect("proxy");
        assert!(proxy.is_allowed("https://scontent-waw1.cdninstagram.com/a.jpg"));
        assert!(proxy.is_allowed("https://media.licdn.com/dms/image/abc"));
        assert!(!proxy.is_allowed("https://evil.example.com/a.jpg"));
    }

    #[test]
    fn content_type_prefers_image_header() {
        assert_eq!(
            content_type_for("https://x/a.png", Some("image/webp")),
            "image/webp"
        );
    }

    #[test]
    fn content_type_falls_back_to_extension_for_non_image_header() {
        assert_eq!(
            content_type_for("https://x/a.png?v=1", Some("text/html")),
            "image/png"
        );
        assert_eq!(content_type_for("https://x/a.gif", None), "image/gif");
        assert_eq!(content_type_for("https://x/a.webp", None), "image/webp");
    }

    #[test]
    fn content_type_defaults_to_jpeg() {
        assert_eq!(content_type_for("https://x/avatar", None), "image/jpeg");
        assert_eq!(
            content_type_for("https://x/avatar", Some("application/octet-stream")),
            "image/jpeg"
        );
    }

    #[test]
    fn referer_matches_owning_platform() {
        let instagram = platform_headers(false);
        assert_eq!(
            instagram.get(REFERER).unwrap(),
            "https://www.instagram.com/"
        );
        let linkedin = platform_headers(true);
        assert_eq!(linkedin.get(REFERER).unwrap(), "https://www.linkedin.com/");
    }
}
