//! Database operations for the `creator_profiles` table.
//!
//! The natural key is `(platform, username)`; [`upsert_profile`] is a single
//! `INSERT ... ON CONFLICT DO UPDATE` statement, so invoking it twice with
//! the same key never creates a duplicate row and the last write wins.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use creatordb_core::ProfileRecord;

use crate::DbError;

/// A row from the `creator_profiles` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRow {
    pub id: i64,
    pub platform: String,
    pub username: String,
    pub display_name: Option<String>,
    pub biography: Option<String>,
    pub avatar_url: Option<String>,
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
    pub checked_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert or update a canonical profile record, keyed by
/// `(platform, username)`. Returns the row id.
///
/// Every supplied value (including `None`) is written directly: a scrape is
/// a full observation of the profile, so a vanished value really is gone.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn upsert_profile(pool: &PgPool, record: &ProfileRecord) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO creator_profiles \
           (platform, username, display_name, biography, avatar_url, avatar_source_url, \
            followers_count, following_count, posts_count, is_private, is_verified, \
            is_business, business_category, job_title, company_name, location, top_skills, \
            checked_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, NOW()) \
         ON CONFLICT (platform, username) DO UPDATE SET \
           display_name      = EXCLUDED.display_name, \
           biography         = EXCLUDED.biography, \
           avatar_url        = EXCLUDED.avatar_url, \
           avatar_source_url = EXCLUDED.avatar_source_url, \
           followers_count   = EXCLUDED.followers_count, \
           following_count   = EXCLUDED.following_count, \
           posts_count       = EXCLUDED.posts_count, \
           is_private        = EXCLUDED.is_private, \
           is_verified       = EXCLUDED.is_verified, \
           is_business       = EXCLUDED.is_business, \
           business_category = EXCLUDED.business_category, \
           job_title         = EXCLUDED.job_title, \
           company_name      = EXCLUDED.company_name, \
           location          = EXCLUDED.location, \
           top_skills        = EXCLUDED.top_skills, \
           checked_at        = NOW(), \
           updated_at        = NOW() \
         RETURNING id",
    )
    .bind(record.platform.as_str())
    .bind(&record.username)
    .bind(record.display_name.as_deref())
    .bind(record.biography.as_deref())
    .bind(record.avatar_url.as_deref())
    .bind(record.avatar_source_url.as_deref())
    .bind(record.followers_count)
    .bind(record.following_count)
    .bind(record.posts_count)
    .bind(record.is_private)
    .bind(record.is_verified)
    .bind(record.is_business)
    .bind(record.business_category.as_deref())
    .bind(record.job_title.as_deref())
    .bind(record.company_name.as_deref())
    .bind(record.location.as_deref())
    .bind(record.top_skills.as_deref())
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Get the stored profile for `(platform, username)`, if any.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn get_profile(
    pool: &PgPool,
    platform: &str,
    username: &str,
) -> Result<Option<ProfileRow>, DbError> {
    Ok(sqlx::query_as::<_, ProfileRow>(
        "SELECT id, platform, username, display_name, biography, avatar_url, \
                avatar_source_url, followers_count, following_count, posts_count, \
                is_private, is_verified, is_business, business_category, job_title, \
                company_name, location, top_skills, checked_at, created_at, updated_at \
         FROM creator_profiles WHERE platform = $1 AND username = $2",
    )
    .bind(platform)
    .bind(username)
    .fetch_optional(pool)
    .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use creatordb_core::Platform;

    fn sample_profile() -> ProfileRecord {
        ProfileRecord {
            platform: Platform::Instagram,
            username: "jdoe".to_string(),
            display_name: Some("Jane Doe".to_string()),
            biography: Some("Builder of things".to_string()),
            avatar_url: Some("/api/v1/image-proxy?url=abc".to_string()),
            avatar_source_url: Some("https://scontent-x.cdninstagram.com/a.jpg".to_string()),
            followers_count: Some(1200),
            following_count: None,
            posts_count: Some(0),
            is_private: false,
            is_verified: true,
            is_business: false,
            business_category: None,
            job_title: None,
            company_name: None,
            location: None,
            top_skills: None,
        }
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn upsert_twice_keeps_a_single_row(pool: PgPool) {
        let first_id = upsert_profile(&pool, &sample_profile()).await.expect("first upsert");

        let mut updated = sample_profile();
        updated.followers_count = Some(1300);
        let second_id = upsert_profile(&pool, &updated).await.expect("second upsert");

        assert_eq!(first_id, second_id, "same natural key must reuse the row");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM creator_profiles")
            .fetch_one(&pool)
            .await
            .expect("count");
        assert_eq!(count, 1);

        let row = get_profile(&pool, "instagram", "jdoe")
            .await
            .expect("get")
            .expect("row exists");
        assert_eq!(row.followers_count, Some(1300));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn null_and_zero_counts_round_trip_distinctly(pool: PgPool) {
        upsert_profile(&pool, &sample_profile()).await.expect("upsert");

        let row = get_profile(&pool, "instagram", "jdoe")
            .await
            .expect("get")
            .expect("row exists");
        assert_eq!(row.following_count, None, "absent count must stay NULL");
        assert_eq!(row.posts_count, Some(0), "observed zero must stay zero");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn same_username_on_other_platform_is_a_distinct_row(pool: PgPool) {
        upsert_profile(&pool, &sample_profile()).await.expect("instagram upsert");

        let mut linkedin = sample_profile();
        linkedin.platform = Platform::Linkedin;
        upsert_profile(&pool, &linkedin).await.expect("linkedin upsert");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM creator_profiles")
            .fetch_one(&pool)
            .await
            .expect("count");
        assert_eq!(count, 2);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn get_profile_returns_none_for_unknown_key(pool: PgPool) {
        let row = get_profile(&pool, "instagram", "nobody").await.expect("get");
        assert!(row.is_none());
    }
}
