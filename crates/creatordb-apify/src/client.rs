//! HTTP client for the scrape provider's synchronous actor runs.
//!
//! Every call POSTs an actor input to `run-sync-get-dataset-items` and
//! blocks until the provider finishes the job or the request timeout fires.
//! The client never retries: retries against paid, rate-limited, multi-minute
//! jobs are a cost decision that belongs to the caller.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApifyError;
use crate::types::{
    InstagramPostItem, InstagramPostsInput, InstagramProfileInput, InstagramProfileItem,
    LinkedinCommentItem, LinkedinCommentsInput, LinkedinPostItem, LinkedinPostsInput,
    LinkedinProfileInput, LinkedinProfileItem,
};

const DEFAULT_BASE_URL: &str = "https://api.apify.com/v2";

/// Actor id for the Instagram profile-details scraper.
const INSTAGRAM_PROFILE_SCRAPER: &str = "apify~instagram-scraper";

/// Actor id for the Instagram post scraper.
const INSTAGRAM_POST_SCRAPER: &str = "apify~instagram-post-scraper";

/// Actor id for the LinkedIn profile scraper.
const LINKEDIN_PROFILE_SCRAPER: &str = "2SyF0bVxmgGr8IVCZ";

/// Actor id for the LinkedIn post scraper.
const LINKEDIN_POST_SCRAPER: &str = "LQQIXN9Othf8f7R5n";

/// Actor id for the LinkedIn post-comments scraper.
const LINKEDIN_COMMENT_SCRAPER: &str = "2XnpwxfhSW1fAWElp";

/// Client for the scrape provider's synchronous actor-run API.
///
/// Use [`ApifyClient::new`] for production or [`ApifyClient::with_base_url`]
/// to point at a mock server in tests.
pub struct ApifyClient {
    client: Client,
    token: String,
    base_url: Url,
}

impl ApifyClient {
    /// Creates a client pointed at the production provider API.
    ///
    /// `timeout_secs` is the hard ceiling on each synchronous run (the
    /// provider caps runs at five minutes; 360 gives it a buffer).
    ///
    /// # Errors
    ///
    /// Returns [`ApifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(token: &str, timeout_secs: u64) -> Result<Self, ApifyError> {
        Self::with_base_url(token, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ApifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ApifyError::Api`] if `base_url` is not a
    /// valid URL.
    pub fn with_base_url(
        token: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ApifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("creatordb/0.1 (creator-intelligence)")
            .build()?;

        let normalised = base_url.trim_end_matches('/').to_string();
        let base_url = Url::parse(&normalised).map_err(|e| ApifyError::Api {
            status: 0,
            body: format!("invalid base URL '{normalised}': {e}"),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApifyError::Api {
                status: 0,
                body: format!("base URL '{normalised}' has no path segments"),
            });
        }

        Ok(Self {
            client,
            token: token.to_owned(),
            base_url,
        })
    }

    /// Fetches Instagram profile details for a profile URL.
    ///
    /// An empty result means the profile was not found, a normal outcome
    /// distinct from any provider error.
    ///
    /// # Errors
    ///
    /// - [`ApifyError::Timeout`] if the provider reports its own run-time
    ///   budget was exceeded (HTTP 408).
    /// - [`ApifyError::Api`] on any other non-success status.
    /// - [`ApifyError::Http`] on transport failure or request timeout.
    /// - [`ApifyError::Deserialize`] if the dataset items do not match the
    ///   expected shape.
    pub async fn scrape_instagram_profile(
        &self,
        profile_url: &str,
    ) -> Result<Vec<InstagramProfileItem>, ApifyError> {
        let input = InstagramProfileInput::for_url(profile_url);
        self.run_sync(INSTAGRAM_PROFILE_SCRAPER, &input).await
    }

    /// Fetches up to `limit` recent posts (with comment excerpts) for an
    /// Instagram username.
    ///
    /// # Errors
    ///
    /// Same classification as [`Self::scrape_instagram_profile`].
    pub async fn scrape_instagram_posts(
        &self,
        username: &str,
        limit: u32,
    ) -> Result<Vec<InstagramPostItem>, ApifyError> {
        let input = InstagramPostsInput {
            username: vec![username.to_string()],
            results_limit: limit,
            skip_pinned_posts: false,
        };
        self.run_sync(INSTAGRAM_POST_SCRAPER, &input).await
    }

    /// Fetches LinkedIn profile details for a profile URL.
    ///
    /// # Errors
    ///
    /// Same classification as [`Self::scrape_instagram_profile`].
    pub async fn scrape_linkedin_profile(
        &self,
        profile_url: &str,
    ) -> Result<Vec<LinkedinProfileItem>, ApifyError> {
        let input = LinkedinProfileInput::for_url(profile_url);
        self.run_sync(LINKEDIN_PROFILE_SCRAPER, &input).await
    }

    /// Fetches up to `limit` recent posts for a LinkedIn username.
    ///
    /// # Errors
    ///
    /// Same classification as [`Self::scrape_instagram_profile`].
    pub async fn scrape_linkedin_posts(
        &self,
        username: &str,
        limit: u32,
    ) -> Result<Vec<LinkedinPostItem>, ApifyError> {
        let input = LinkedinPostsInput {
            username: username.to_string(),
            limit,
            page_number: 1,
        };
        self.run_sync(LINKEDIN_POST_SCRAPER, &input).await
    }

    /// Fetches recent comments (most recent first) for a set of LinkedIn
    /// post URNs.
    ///
    /// # Errors
    ///
    /// Same classification as [`Self::scrape_instagram_profile`].
    pub async fn scrape_linkedin_comments(
        &self,
        post_urns: &[String],
        limit_per_post: u32,
    ) -> Result<Vec<LinkedinCommentItem>, ApifyError> {
        let input = LinkedinCommentsInput {
            post_ids: post_urns.to_vec(),
            limit: limit_per_post,
            page_number: 1,
            sort_order: "most recent",
        };
        self.run_sync(LINKEDIN_COMMENT_SCRAPER, &input).await
    }

    /// Runs one synchronous actor job and returns its dataset items.
    async fn run_sync<I, T>(&self, actor: &str, input: &I) -> Result<Vec<T>, ApifyError>
    where
        I: Serialize,
        T: DeserializeOwned,
    {
        let url = self.run_sync_url(actor);
        tracing::info!(actor, "starting synchronous scrape run");

        let response = self.client.post(url.clone()).json(input).send().await?;
        let status = response.status();

        if status == StatusCode::REQUEST_TIMEOUT {
            tracing::warn!(actor, "scrape run exceeded the provider's time budget");
            return Err(ApifyError::Timeout);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(actor, status = status.as_u16(), "scrape provider error");
            return Err(ApifyError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let items: Vec<T> =
            serde_json::from_str(&body).map_err(|e| ApifyError::Deserialize {
                context: format!("run-sync dataset for actor {actor}"),
                source: e,
            })?;

        tracing::info!(actor, count = items.len(), "scrape run completed");
        Ok(items)
    }

    /// Builds the `run-sync-get-dataset-items` URL with the token as a
    /// percent-encoded query parameter.
    fn run_sync_url(&self, actor: &str) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().expect("base URL cannot be a base");
            segments.pop_if_empty();
            segments.push("acts");
            segments.push(actor);
            segments.push("run-sync-get-dataset-items");
        }
        url.query_pairs_mut().append_pair("token", &self.token);
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> ApifyClient {
        ApifyClient::with_base_url("test-token", 30, base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn run_sync_url_includes_actor_and_token() {
        let client = test_client("https://api.apify.com/v2");
        let url = client.run_sync_url(INSTAGRAM_POST_SCRAPER);
        assert_eq!(
            url.as_str(),
            "https://api.apify.com/v2/acts/apify~instagram-post-scraper/run-sync-get-dataset-items?token=test-token"
        );
    }

    #[test]
    fn run_sync_url_strips_trailing_slash() {
        let client = test_client("https://api.apify.com/v2/");
        let url = client.run_sync_url(LINKEDIN_POST_SCRAPER);
        assert!(url
            .as_str()
            .starts_with("https://api.apify.com/v2/acts/LQQIXN9Othf8f7R5n/"));
    }

    #[test]
    fn run_sync_url_encodes_token() {
        let client = ApifyClient::with_base_url("a b&c", 30, "https://api.apify.com/v2")
            .expect("client construction should not fail");
        let url = client.run_sync_url(INSTAGRAM_PROFILE_SCRAPER);
        assert!(url.query().unwrap().contains("token=a+b%26c"));
    }
}
