//! Raw payload types for the scrape-provider actors.
//!
//! Field names mirror each actor's dataset schema (camelCase on the
//! Instagram side, snake_case on the LinkedIn side). Every numeric field is
//! an `Option` so that an absent value survives as "unknown" instead of
//! collapsing into zero during canonical mapping.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Actor inputs
// ---------------------------------------------------------------------------

/// Input for the Instagram profile-details scraper.
#[derive(Debug, Clone, Serialize)]
pub struct InstagramProfileInput {
    #[serde(rename = "addParentData")]
    pub add_parent_data: bool,
    #[serde(rename = "directUrls")]
    pub direct_urls: Vec<String>,
    #[serde(rename = "resultsType")]
    pub results_type: &'static str,
    #[serde(rename = "resultsLimit")]
    pub results_limit: u32,
    #[serde(rename = "searchLimit")]
    pub search_limit: u32,
}

impl InstagramProfileInput {
    #[must_use]
    pub fn for_url(url: &str) -> Self {
        Self {
            add_parent_data: false,
            direct_urls: vec![url.to_string()],
            results_type: "details",
            results_limit: 1,
            search_limit: 1,
        }
    }
}

/// Input for the Instagram post scraper.
#[derive(Debug, Clone, Serialize)]
pub struct InstagramPostsInput {
    pub username: Vec<String>,
    #[serde(rename = "resultsLimit")]
    pub results_limit: u32,
    #[serde(rename = "skipPinnedPosts")]
    pub skip_pinned_posts: bool,
}

/// Input for the LinkedIn profile scraper. The `include_*` toggles are off:
/// section payloads the mapper never reads are not worth the run time.
#[derive(Debug, Clone, Serialize)]
pub struct LinkedinProfileInput {
    #[serde(rename = "profileUrls")]
    pub profile_urls: Vec<String>,
    #[serde(rename = "includeSkills")]
    pub include_skills: bool,
    #[serde(rename = "includeExperience")]
    pub include_experience: bool,
    #[serde(rename = "includeEducation")]
    pub include_education: bool,
    #[serde(rename = "includeRecommendations")]
    pub include_recommendations: bool,
    #[serde(rename = "includeAccomplishments")]
    pub include_accomplishments: bool,
    #[serde(rename = "includePeopleAlsoViewed")]
    pub include_people_also_viewed: bool,
    #[serde(rename = "includeActivityPosts")]
    pub include_activity_posts: bool,
}

impl LinkedinProfileInput {
    #[must_use]
    pub fn for_url(url: &str) -> Self {
        Self {
            profile_urls: vec![url.to_string()],
            include_skills: false,
            include_experience: false,
            include_education: false,
            include_recommendations: false,
            include_accomplishments: false,
            include_people_also_viewed: false,
            include_activity_posts: false,
        }
    }
}

/// Input for the LinkedIn post scraper.
#[derive(Debug, Clone, Serialize)]
pub struct LinkedinPostsInput {
    pub username: String,
    pub limit: u32,
    pub page_number: u32,
}

/// Input for the LinkedIn post-comments scraper.
#[derive(Debug, Clone, Serialize)]
pub struct LinkedinCommentsInput {
    #[serde(rename = "postIds")]
    pub post_ids: Vec<String>,
    pub limit: u32,
    pub page_number: u32,
    #[serde(rename = "sortOrder")]
    pub sort_order: &'static str,
}

// ---------------------------------------------------------------------------
// Instagram dataset items
// ---------------------------------------------------------------------------

/// One Instagram profile-details item.
#[derive(Debug, Clone, Deserialize)]
pub struct InstagramProfileItem {
    pub id: Option<String>,
    pub username: String,
    #[serde(rename = "inputUrl")]
    pub input_url: Option<String>,
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    pub biography: Option<String>,
    #[serde(rename = "followersCount")]
    pub followers_count: Option<i64>,
    #[serde(rename = "followsCount")]
    pub follows_count: Option<i64>,
    #[serde(rename = "postsCount")]
    pub posts_count: Option<i64>,
    pub private: Option<bool>,
    pub verified: Option<bool>,
    #[serde(rename = "isBusinessAccount")]
    pub is_business_account: Option<bool>,
    #[serde(rename = "businessCategoryName")]
    pub business_category_name: Option<String>,
    #[serde(rename = "profilePicUrl")]
    pub profile_pic_url: Option<String>,
    #[serde(rename = "profilePicUrlHD")]
    pub profile_pic_url_hd: Option<String>,
}

/// One Instagram post item, with the comment excerpt the scraper attaches.
#[derive(Debug, Clone, Deserialize)]
pub struct InstagramPostItem {
    pub id: Option<String>,
    #[serde(rename = "shortCode")]
    pub short_code: Option<String>,
    pub caption: Option<String>,
    #[serde(rename = "ownerUsername")]
    pub owner_username: Option<String>,
    #[serde(rename = "likesCount")]
    pub likes_count: Option<i64>,
    #[serde(rename = "commentsCount")]
    pub comments_count: Option<i64>,
    #[serde(rename = "videoPlayCount")]
    pub video_play_count: Option<i64>,
    #[serde(rename = "videoDuration")]
    pub video_duration: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "latestComments", default)]
    pub latest_comments: Vec<InstagramComment>,
}

/// One comment (possibly with nested replies) on an Instagram post.
#[derive(Debug, Clone, Deserialize)]
pub struct InstagramComment {
    #[serde(rename = "ownerUsername")]
    pub owner_username: Option<String>,
    pub text: Option<String>,
    #[serde(default)]
    pub replies: Vec<InstagramComment>,
}

// ---------------------------------------------------------------------------
// LinkedIn dataset items
// ---------------------------------------------------------------------------

/// One LinkedIn profile item.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkedinProfileItem {
    #[serde(rename = "publicIdentifier")]
    pub public_identifier: Option<String>,
    #[serde(rename = "linkedinUrl")]
    pub linkedin_url: Option<String>,
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    pub headline: Option<String>,
    pub about: Option<String>,
    pub connections: Option<i64>,
    pub followers: Option<i64>,
    #[serde(rename = "jobTitle")]
    pub job_title: Option<String>,
    #[serde(rename = "companyName")]
    pub company_name: Option<String>,
    #[serde(rename = "companyIndustry")]
    pub company_industry: Option<String>,
    #[serde(rename = "profilePic")]
    pub profile_pic: Option<String>,
    #[serde(rename = "profilePicHighQuality")]
    pub profile_pic_high_quality: Option<String>,
    #[serde(rename = "addressWithCountry")]
    pub address_with_country: Option<String>,
    #[serde(rename = "addressWithoutCountry")]
    pub address_without_country: Option<String>,
    #[serde(rename = "addressCountryOnly")]
    pub address_country_only: Option<String>,
    #[serde(default)]
    pub skills: Vec<LinkedinSkill>,
}

/// A skill entry; the scraper has shipped both `title` and `name` keys.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkedinSkill {
    pub title: Option<String>,
    pub name: Option<String>,
}

impl LinkedinSkill {
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.title.as_deref().or(self.name.as_deref())
    }
}

/// One LinkedIn post item.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkedinPostItem {
    pub urn: Option<String>,
    pub text: Option<String>,
    pub posted_at: Option<LinkedinPostedAt>,
    pub stats: Option<LinkedinPostStats>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkedinPostedAt {
    pub date: Option<String>,
    pub timestamp: Option<i64>,
}

impl LinkedinPostedAt {
    /// Best-effort parse of the scraper's date forms; `None` if neither the
    /// epoch timestamp nor the date string is usable.
    #[must_use]
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        if let Some(ms) = self.timestamp {
            if let Some(dt) = DateTime::from_timestamp_millis(ms) {
                return Some(dt);
            }
        }
        let raw = self.date.as_deref()?;
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkedinPostStats {
    pub total_reactions: Option<i64>,
    pub comments: Option<i64>,
}

/// One LinkedIn comment item (possibly with nested replies).
#[derive(Debug, Clone, Deserialize)]
pub struct LinkedinCommentItem {
    pub author: Option<LinkedinCommentAuthor>,
    /// The URN of the post this comment belongs to, echoed back by the actor.
    pub post_input: Option<String>,
    #[serde(default)]
    pub replies: Vec<LinkedinCommentItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkedinCommentAuthor {
    pub name: Option<String>,
    pub headline: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instagram_post_item_missing_numbers_stay_none() {
        let item: InstagramPostItem = serde_json::from_value(serde_json::json!({
            "id": "123",
            "caption": "hello"
        }))
        .unwrap();
        assert_eq!(item.likes_count, None);
        assert_eq!(item.comments_count, None);
        assert!(item.latest_comments.is_empty());
    }

    #[test]
    fn instagram_post_item_zero_is_preserved() {
        let item: InstagramPostItem = serde_json::from_value(serde_json::json!({
            "id": "123",
            "likesCount": 0
        }))
        .unwrap();
        assert_eq!(item.likes_count, Some(0));
    }

    #[test]
    fn linkedin_posted_at_parses_epoch_and_string_forms() {
        let from_epoch = LinkedinPostedAt {
            date: None,
            timestamp: Some(1_700_000_000_000),
        };
        assert!(from_epoch.as_datetime().is_some());

        let from_string = LinkedinPostedAt {
            date: Some("2024-03-15 08:30:11".to_string()),
            timestamp: None,
        };
        assert!(from_string.as_datetime().is_some());

        let unusable = LinkedinPostedAt {
            date: Some("last tuesday".to_string()),
            timestamp: None,
        };
        assert_eq!(unusable.as_datetime(), None);
    }

    #[test]
    fn linkedin_comment_tree_deserializes_nested_replies() {
        let item: LinkedinCommentItem = serde_json::from_value(serde_json::json!({
            "author": {"name": "Alice", "headline": "CTO"},
            "post_input": "7123",
            "replies": [
                {"author": {"name": "Bob", "headline": "Engineer"}, "post_input": "7123"}
            ]
        }))
        .unwrap();
        assert_eq!(item.replies.len(), 1);
        assert_eq!(
            item.replies[0].author.as_ref().unwrap().name.as_deref(),
            Some("Bob")
        );
    }

    #[test]
    fn instagram_profile_input_serializes_actor_field_names() {
        let input = InstagramProfileInput::for_url("https://www.instagram.com/jdoe/");
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["resultsType"], "details");
        assert_eq!(json["directUrls"][0], "https://www.instagram.com/jdoe/");
        assert_eq!(json["addParentData"], false);
    }
}
