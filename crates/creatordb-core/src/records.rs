//! Canonical records: the system's own normalized representation of
//! profiles and posts, independent of any provider's raw schema.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// One creator profile per `(platform, username)`.
///
/// Numeric engagement fields are `Option`: `None` means the provider did not
/// report the value. "Unknown" never collapses into zero, because zero is a
/// valid observed count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub platform: Platform,
    pub username: String,
    pub display_name: Option<String>,
    pub biography: Option<String>,
    /// Internal image-proxy reference; never a raw third-party CDN URL.
    pub avatar_url: Option<String>,
    /// The upstream CDN URL the avatar reference was derived from.
    pub avatar_source_url: Option<String>,
    pub followers_count: Option<i64>,
    pub following_count: Option<i64>,
    pub posts_count: Option<i64>,
    pub is_private: bool,
    pub is_verified: bool,
    pub is_business: bool,
    pub business_category: Option<String>,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub top_skills: Option<String>,
}

/// One creator post per `(platform, post_id)`.
///
/// `caption` has already passed [`crate::textnorm::normalize`]; `username`
/// is the owning profile's normalized username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecord {
    pub platform: Platform,
    pub username: String,
    pub post_id: String,
    pub caption: String,
    pub likes_count: Option<i64>,
    pub comments_count: Option<i64>,
    pub video_play_count: Option<i64>,
    pub video_duration_secs: Option<f64>,
    pub commenters: CommenterMap,
    pub posted_at: Option<DateTime<Utc>>,
}

/// Deduplicated commenters for one post, keyed by case-normalized commenter
/// identity and always excluding the post's own author.
///
/// The value shape is a per-platform product decision: Instagram stores an
/// occurrence count, LinkedIn stores the commenter's cleaned professional
/// headline (overwritten, not accumulated, on repeat occurrence).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommenterMap {
    Counts(BTreeMap<String, i64>),
    Headlines(BTreeMap<String, String>),
}

impl CommenterMap {
    /// The empty map in the shape used by `platform`.
    #[must_use]
    pub fn empty_for(platform: Platform) -> Self {
        match platform {
            Platform::Instagram => CommenterMap::Counts(BTreeMap::new()),
            Platform::Linkedin => CommenterMap::Headlines(BTreeMap::new()),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            CommenterMap::Counts(m) => m.len(),
            CommenterMap::Headlines(m) => m.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the map contains the given (already normalized) identity.
    #[must_use]
    pub fn contains(&self, identity: &str) -> bool {
        match self {
            CommenterMap::Counts(m) => m.contains_key(identity),
            CommenterMap::Headlines(m) => m.contains_key(identity),
        }
    }
}
