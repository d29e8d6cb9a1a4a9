//! Database operations for the `creator_posts` table.
//!
//! The natural key is `(platform, post_id)`. Posts accumulate across scrape
//! runs; a re-scraped post updates its existing row.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;

use creatordb_core::{CommenterMap, PostRecord};

use crate::DbError;

/// A row from the `creator_posts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRow {
    pub id: i64,
    pub platform: String,
    pub username: String,
    pub post_id: String,
    pub caption: String,
    pub likes_count: Option<i64>,
    pub comments_count: Option<i64>,
    pub video_play_count: Option<i64>,
    pub video_duration_secs: Option<f64>,
    pub commenters: Json<CommenterMap>,
    pub posted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of a batch upsert: how many records were written and how many
/// failed. Per-record failures are logged, not fatal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertTally {
    pub saved: usize,
    pub failed: usize,
}

/// Insert or update one canonical post record, keyed by
/// `(platform, post_id)`.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn upsert_post(pool: &PgPool, record: &PostRecord) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO creator_posts \
           (platform, username, post_id, caption, likes_count, comments_count, \
            video_play_count, video_duration_secs, commenters, posted_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         ON CONFLICT (platform, post_id) DO UPDATE SET \
           username            = EXCLUDED.username, \
           caption             = EXCLUDED.caption, \
           likes_count         = EXCLUDED.likes_count, \
           comments_count      = EXCLUDED.comments_count, \
           video_play_count    = EXCLUDED.video_play_count, \
           video_duration_secs = EXCLUDED.video_duration_secs, \
           commenters          = EXCLUDED.commenters, \
           posted_at           = EXCLUDED.posted_at, \
           updated_at          = NOW()",
    )
    .bind(record.platform.as_str())
    .bind(&record.username)
    .bind(&record.post_id)
    .bind(&record.caption)
    .bind(record.likes_count)
    .bind(record.comments_count)
    .bind(record.video_play_count)
    .bind(record.video_duration_secs)
    .bind(Json(&record.commenters))
    .bind(record.posted_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Upsert a batch of post records, one write per record.
///
/// A failing record does not abort the batch; it is logged and counted in
/// the tally so callers can report partial success.
pub async fn upsert_posts(pool: &PgPool, records: &[PostRecord]) -> UpsertTally {
    let mut tally = UpsertTally::default();
    for record in records {
        match upsert_post(pool, record).await {
            Ok(()) => tally.saved += 1,
            Err(e) => {
                tracing::error!(
                    platform = %record.platform,
                    post_id = %record.post_id,
                    error = %e,
                    "post upsert failed"
                );
                tally.failed += 1;
            }
        }
    }
    tally
}

/// List the most recent stored posts for `(platform, username)`, newest
/// first, capped at `limit`.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn list_recent_posts(
    pool: &PgPool,
    platform: &str,
    username: &str,
    limit: i64,
) -> Result<Vec<PostRow>, DbError> {
    Ok(sqlx::query_as::<_, PostRow>(
        "SELECT id, platform, username, post_id, caption, likes_count, comments_count, \
                video_play_count, video_duration_secs, commenters, posted_at, \
                created_at, updated_at \
         FROM creator_posts \
         WHERE platform = $1 AND username = $2 \
         ORDER BY posted_at DESC NULLS LAST, id DESC \
         LIMIT $3",
    )
    .bind(platform)
    .bind(username)
    .bind(limit)
    .fetch_all(pool)
    .await?)
}
