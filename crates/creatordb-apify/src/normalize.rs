//! Canonical mapping from raw scrape-provider records to the system's own
//! profile and post schema.
//!
//! These are pure functions with explicit per-platform field tables. Two
//! rules hold everywhere:
//! - absent numeric fields stay `None`: "unknown" never collapses into
//!   zero, because zero is a valid observed value;
//! - avatar URLs are never persisted as-is; they are rewritten into an
//!   internal image-proxy reference carrying the original URL opaquely
//!   encoded, with the raw URL kept separately for diagnostics.

use std::collections::BTreeMap;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use creatordb_core::resolver::normalize_username;
use creatordb_core::textnorm;
use creatordb_core::{CommenterMap, Platform, PostRecord, ProfileRecord};

use crate::comments::count_instagram_commenters;
use crate::error::ApifyError;
use crate::types::{
    InstagramPostItem, InstagramProfileItem, LinkedinPostItem, LinkedinProfileItem,
};

/// Route the image proxy is mounted on; avatar references point here.
const IMAGE_PROXY_PATH: &str = "/api/v1/image-proxy";

/// Biography/headline length cap applied before persistence.
const BIO_MAX_CHARS: usize = 1000;

/// How many skills are kept in the `top_skills` summary.
const TOP_SKILLS_LIMIT: usize = 5;

/// Rewrites an upstream CDN URL into an internal proxy reference.
#[must_use]
pub fn proxy_reference(source_url: &str) -> String {
    format!(
        "{IMAGE_PROXY_PATH}?url={}",
        utf8_percent_encode(source_url, NON_ALPHANUMERIC)
    )
}

fn clean_capped(text: &str, cap: usize) -> Option<String> {
    let cleaned: String = textnorm::normalize(text).chars().take(cap).collect();
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Maps one Instagram profile-details item into a [`ProfileRecord`].
///
/// Field table: `fullName` -> display name, `biography` -> biography (cleaned,
/// capped), `profilePicUrlHD` (falling back to `profilePicUrl`) -> avatar,
/// `followersCount`/`followsCount`/`postsCount` -> the canonical counts,
/// `private`/`verified`/`isBusinessAccount` -> flags,
/// `businessCategoryName` -> business metadata.
///
/// # Errors
///
/// Returns [`ApifyError::Normalization`] if the item has an empty username.
pub fn map_instagram_profile(item: InstagramProfileItem) -> Result<ProfileRecord, ApifyError> {
    let username = normalize_username(&item.username);
    if username.is_empty() {
        return Err(ApifyError::Normalization {
            context: "instagram profile".to_string(),
            reason: "item has no username".to_string(),
        });
    }

    let avatar_source = item.profile_pic_url_hd.or(item.profile_pic_url);

    Ok(ProfileRecord {
        platform: Platform::Instagram,
        username,
        display_name: item.full_name.filter(|s| !s.is_empty()),
        biography: item
            .biography
            .as_deref()
            .and_then(|b| clean_capped(b, BIO_MAX_CHARS)),
        avatar_url: avatar_source.as_deref().map(proxy_reference),
        avatar_source_url: avatar_source,
        followers_count: item.followers_count,
        following_count: item.follows_count,
        posts_count: item.posts_count,
        is_private: item.private.unwrap_or(false),
        is_verified: item.verified.unwrap_or(false),
        is_business: item.is_business_account.unwrap_or(false),
        business_category: item.business_category_name.filter(|s| !s.is_empty()),
        job_title: None,
        company_name: None,
        location: None,
        top_skills: None,
    })
}

/// Maps one LinkedIn profile item into a [`ProfileRecord`].
///
/// Field table: `publicIdentifier` -> username, `fullName` -> display name,
/// `headline` -> biography (cleaned, capped), `profilePicHighQuality`
/// (falling back to `profilePic`) -> avatar, `followers` -> follower count,
/// `connections` -> connection count, `jobTitle`/`companyName` -> business
/// metadata, address fields (most specific first) -> location, first five
/// skill labels -> `top_skills`.
///
/// # Errors
///
/// Returns [`ApifyError::Normalization`] if the item carries no
/// `publicIdentifier`.
pub fn map_linkedin_profile(item: LinkedinProfileItem) -> Result<ProfileRecord, ApifyError> {
    let username = item
        .public_identifier
        .as_deref()
        .map(normalize_username)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApifyError::Normalization {
            context: "linkedin profile".to_string(),
            reason: "item has no publicIdentifier".to_string(),
        })?;

    let avatar_source = item.profile_pic_high_quality.or(item.profile_pic);

    let location = item
        .address_with_country
        .or(item.address_without_country)
        .or(item.address_country_only)
        .filter(|s| !s.is_empty());

    let skills: Vec<&str> = item
        .skills
        .iter()
        .filter_map(super::types::LinkedinSkill::label)
        .filter(|s| !s.is_empty())
        .take(TOP_SKILLS_LIMIT)
        .collect();
    let top_skills = (!skills.is_empty()).then(|| skills.join(", "));

    Ok(ProfileRecord {
        platform: Platform::Linkedin,
        username,
        display_name: item.full_name.filter(|s| !s.is_empty()),
        biography: item
            .headline
            .as_deref()
            .and_then(|h| clean_capped(h, BIO_MAX_CHARS)),
        avatar_url: avatar_source.as_deref().map(proxy_reference),
        avatar_source_url: avatar_source,
        followers_count: item.followers,
        following_count: item.connections,
        posts_count: None,
        is_private: false,
        is_verified: false,
        is_business: false,
        business_category: item.company_industry.filter(|s| !s.is_empty()),
        job_title: item.job_title.filter(|s| !s.is_empty()),
        company_name: item.company_name.filter(|s| !s.is_empty()),
        location,
        top_skills,
    })
}

/// Maps one Instagram post item into a [`PostRecord`] owned by `username`.
///
/// The caption passes through the text normalizer; commenters are counted
/// from the attached comment excerpt (owner excluded).
///
/// # Errors
///
/// Returns [`ApifyError::Normalization`] if the item has neither an `id`
/// nor a `shortCode` to use as the post identifier.
pub fn map_instagram_post(
    item: InstagramPostItem,
    username: &str,
) -> Result<PostRecord, ApifyError> {
    let post_id = item
        .id
        .clone()
        .or_else(|| item.short_code.clone())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApifyError::Normalization {
            context: "instagram post".to_string(),
            reason: "item has no id or shortCode".to_string(),
        })?;

    let username = normalize_username(username);
    let commenters = count_instagram_commenters(&username, &item.latest_comments);

    Ok(PostRecord {
        platform: Platform::Instagram,
        username,
        post_id,
        caption: textnorm::normalize(item.caption.as_deref().unwrap_or_default()),
        likes_count: item.likes_count,
        comments_count: item.comments_count,
        video_play_count: item.video_play_count,
        video_duration_secs: item.video_duration,
        commenters: CommenterMap::Counts(commenters),
        posted_at: item.timestamp,
    })
}

/// Maps one LinkedIn post item into a [`PostRecord`] owned by `username`.
///
/// `commenters_by_post` is the output of
/// [`crate::comments::capture_linkedin_headlines`] for the batch this post
/// belongs to; posts without an entry get an empty headline map.
///
/// # Errors
///
/// Returns [`ApifyError::Normalization`] if the item has no `urn`.
pub fn map_linkedin_post(
    item: LinkedinPostItem,
    username: &str,
    commenters_by_post: &BTreeMap<String, BTreeMap<String, String>>,
) -> Result<PostRecord, ApifyError> {
    let post_id = item
        .urn
        .clone()
        .filter(|urn| !urn.is_empty())
        .ok_or_else(|| ApifyError::Normalization {
            context: "linkedin post".to_string(),
            reason: "item has no urn".to_string(),
        })?;

    let posted_at = item.posted_at.as_ref().and_then(super::types::LinkedinPostedAt::as_datetime);
    let stats = item.stats.as_ref();
    let headlines = commenters_by_post.get(&post_id).cloned().unwrap_or_default();

    Ok(PostRecord {
        platform: Platform::Linkedin,
        username: normalize_username(username),
        post_id,
        caption: textnorm::normalize(item.text.as_deref().unwrap_or_default()),
        likes_count: stats.and_then(|s| s.total_reactions),
        comments_count: stats.and_then(|s| s.comments),
        video_play_count: None,
        video_duration_secs: None,
        commenters: CommenterMap::Headlines(headlines),
        posted_at,
    })
}
