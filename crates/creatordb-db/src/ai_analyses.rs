//! Database operations for the `creator_ai_analyses` table.
//!
//! One row per `(account_id, platform, username)`. A successful generation
//! replaces the row in a single statement; a failed generation leaves the
//! prior row authoritative. Rows are never deleted by age; a stale row is
//! the fallback when regeneration fails.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `creator_ai_analyses` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AiAnalysisRow {
    pub id: i64,
    pub account_id: String,
    pub platform: String,
    pub username: String,
    pub payload: Json<serde_json::Value>,
    pub model: String,
    pub posts_analyzed: i32,
    pub prompt_version: String,
    pub generated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A freshly generated analysis about to replace (or create) its row.
#[derive(Debug, Clone)]
pub struct NewAiAnalysis<'a> {
    pub account_id: &'a str,
    pub platform: &'a str,
    pub username: &'a str,
    pub payload: &'a serde_json::Value,
    pub model: &'a str,
    pub posts_analyzed: i32,
    pub prompt_version: &'a str,
    pub generated_at: DateTime<Utc>,
}

/// Get the stored analysis for `(account_id, platform, username)`, if any.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn get_ai_analysis(
    pool: &PgPool,
    account_id: &str,
    platform: &str,
    username: &str,
) -> Result<Option<AiAnalysisRow>, DbError> {
    Ok(sqlx::query_as::<_, AiAnalysisRow>(
        "SELECT id, account_id, platform, username, payload, model, posts_analyzed, \
                prompt_version, generated_at, created_at, updated_at \
         FROM creator_ai_analyses \
         WHERE account_id = $1 AND platform = $2 AND username = $3",
    )
    .bind(account_id)
    .bind(platform)
    .bind(username)
    .fetch_optional(pool)
    .await?)
}

/// Replace (or create) the analysis row for its natural key in one write.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn upsert_ai_analysis(pool: &PgPool, new: &NewAiAnalysis<'_>) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO creator_ai_analyses \
           (account_id, platform, username, payload, model, posts_analyzed, \
            prompt_version, generated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         ON CONFLICT (account_id, platform, username) DO UPDATE SET \
           payload        = EXCLUDED.payload, \
           model          = EXCLUDED.model, \
           posts_analyzed = EXCLUDED.posts_analyzed, \
           prompt_version = EXCLUDED.prompt_version, \
           generated_at   = EXCLUDED.generated_at, \
           updated_at     = NOW()",
    )
    .bind(new.account_id)
    .bind(new.platform)
    .bind(new.username)
    .bind(Json(new.payload))
    .bind(new.model)
    .bind(new.posts_analyzed)
    .bind(new.prompt_version)
    .bind(new.generated_at)
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_payload(description: &str) -> serde_json::Value {
        serde_json::json!({
            "username": "jdoe",
            "profile_description": description,
            "competencies": [],
            "unique_trait": null
        })
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn regeneration_replaces_the_row_in_place(pool: PgPool) {
        let first_payload = sample_payload("first");
        let first = NewAiAnalysis {
            account_id: "acct-1",
            platform: "instagram",
            username: "jdoe",
            payload: &first_payload,
            model: "claude-3-5-sonnet-20241022",
            posts_analyzed: 12,
            prompt_version: "2.0",
            generated_at: Utc::now(),
        };
        upsert_ai_analysis(&pool, &first).await.expect("first upsert");

        let second_payload = sample_payload("second");
        let second = NewAiAnalysis {
            payload: &second_payload,
            posts_analyzed: 20,
            ..first
        };
        upsert_ai_analysis(&pool, &second).await.expect("second upsert");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM creator_ai_analyses")
            .fetch_one(&pool)
            .await
            .expect("count");
        assert_eq!(count, 1);

        let row = get_ai_analysis(&pool, "acct-1", "instagram", "jdoe")
            .await
            .expect("get")
            .expect("row exists");
        assert_eq!(row.payload.0["profile_description"], "second");
        assert_eq!(row.posts_analyzed, 20);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn analyses_are_scoped_per_account(pool: PgPool) {
        let payload = sample_payload("shared creator");
        for account in ["acct-1", "acct-2"] {
            let new = NewAiAnalysis {
                account_id: account,
                platform: "instagram",
                username: "jdoe",
                payload: &payload,
                model: "claude-3-5-sonnet-20241022",
                posts_analyzed: 12,
                prompt_version: "2.0",
                generated_at: Utc::now(),
            };
            upsert_ai_analysis(&pool, &new).await.expect("upsert");
        }

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM creator_ai_analyses")
            .fetch_one(&pool)
            .await
            .expect("count");
        assert_eq!(count, 2);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn missing_row_is_none(pool: PgPool) {
        let row = get_ai_analysis(&pool, "acct-1", "linkedin", "nobody")
            .await
            .expect("get");
        assert!(row.is_none());
    }
}
