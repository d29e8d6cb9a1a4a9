//! Analysis pipeline orchestration.
//!
//! 1. Check the cache for a fresh stored analysis; a hit performs no write
//!    and no provider call.
//! 2. Otherwise fetch the creator's most recent stored posts, assemble the
//!    prompt, call the completion provider, and validate the response.
//! 3. A valid result replaces the cached row; a persistence failure is
//!    logged but does not block returning the fresh payload.
//! 4. If regeneration fails and a stale row exists, the stale row is served
//!    as a fallback; it is never evicted purely by age.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use creatordb_core::Platform;
use creatordb_db::{AiAnalysisRow, NewAiAnalysis};

use crate::cache::is_fresh;
use crate::client::AnthropicClient;
use crate::error::AnalysisError;
use crate::prompt::{build_context, build_prompt, PROMPT_VERSION};
use crate::validate::parse_and_validate;

/// The cache key for an analysis.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisKey<'a> {
    pub account_id: &'a str,
    pub platform: Platform,
    pub username: &'a str,
}

/// Tunables resolved from configuration at startup.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub freshness_days: i64,
    pub post_cap: i64,
    pub model: String,
    pub max_tokens: u32,
}

/// An analysis returned to the caller, with generation metadata.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AnalysisOutcome {
    pub username: String,
    pub analysis: serde_json::Value,
    pub model: String,
    pub posts_analyzed: i32,
    pub prompt_version: String,
    pub generated_at: DateTime<Utc>,
    pub cached: bool,
}

impl AnalysisOutcome {
    fn from_row(row: AiAnalysisRow) -> Self {
        Self {
            username: row.username,
            analysis: row.payload.0,
            model: row.model,
            posts_analyzed: row.posts_analyzed,
            prompt_version: row.prompt_version,
            generated_at: row.generated_at,
            cached: true,
        }
    }
}

/// Looks up a stored analysis without generating anything. Used by the
/// check endpoint; ignores freshness.
///
/// # Errors
///
/// Returns [`AnalysisError::Db`] on persistence failure.
pub async fn check_stored_analysis(
    pool: &PgPool,
    key: AnalysisKey<'_>,
) -> Result<Option<AnalysisOutcome>, AnalysisError> {
    let row = creatordb_db::get_ai_analysis(
        pool,
        key.account_id,
        key.platform.as_str(),
        key.username,
    )
    .await?;
    Ok(row.map(AnalysisOutcome::from_row))
}

/// Returns a fresh analysis for the key: the cached row when it is young
/// enough, otherwise a newly generated one.
///
/// # Errors
///
/// - [`AnalysisError::NoPosts`] when no posts are stored for the creator
///   and no prior row exists to fall back to.
/// - [`AnalysisError::Provider`] / [`AnalysisError::Http`] when the
///   completion call fails and no prior row exists.
/// - [`AnalysisError::Contract`] when the completion fails validation and
///   no prior row exists; nothing is cached in that case.
/// - [`AnalysisError::Db`] when reading posts or the cache fails.
pub async fn run_creator_analysis(
    pool: &PgPool,
    client: &AnthropicClient,
    key: AnalysisKey<'_>,
    options: &AnalysisOptions,
) -> Result<AnalysisOutcome, AnalysisError> {
    let existing = creatordb_db::get_ai_analysis(
        pool,
        key.account_id,
        key.platform.as_str(),
        key.username,
    )
    .await?;

    let Some(row) = existing else {
        return generate(pool, client, key, options).await;
    };

    if is_fresh(row.generated_at, Utc::now(), options.freshness_days) {
        tracing::info!(
            username = key.username,
            platform = %key.platform,
            age_days = (Utc::now() - row.generated_at).num_days(),
            "serving cached analysis"
        );
        return Ok(AnalysisOutcome::from_row(row));
    }

    match generate(pool, client, key, options).await {
        Ok(outcome) => Ok(outcome),
        // The stored value stays authoritative when regeneration fails.
        Err(error) => {
            tracing::warn!(
                username = key.username,
                platform = %key.platform,
                error = %error,
                "regeneration failed, serving stale analysis"
            );
            Ok(AnalysisOutcome::from_row(row))
        }
    }
}

async fn generate(
    pool: &PgPool,
    client: &AnthropicClient,
    key: AnalysisKey<'_>,
    options: &AnalysisOptions,
) -> Result<AnalysisOutcome, AnalysisError> {
    let posts = creatordb_db::list_recent_posts(
        pool,
        key.platform.as_str(),
        key.username,
        options.post_cap,
    )
    .await?;

    if posts.is_empty() {
        return Err(AnalysisError::NoPosts);
    }

    let captions: Vec<String> = posts.into_iter().map(|post| post.caption).collect();
    let posts_analyzed = i32::try_from(captions.len()).unwrap_or(i32::MAX);
    let context = build_context(key.platform, &captions);
    let prompt = build_prompt(&context);

    tracing::info!(
        username = key.username,
        platform = %key.platform,
        posts = posts_analyzed,
        context_chars = context.len(),
        "generating creator analysis"
    );

    let raw = client
        .complete(&options.model, options.max_tokens, &prompt)
        .await?;
    let analysis = parse_and_validate(&raw)?;

    let payload = serde_json::to_value(&analysis).map_err(|e| AnalysisError::Contract {
        reason: format!("validated analysis failed to re-serialize: {e}"),
        raw: String::new(),
    })?;
    let generated_at = Utc::now();

    let new = NewAiAnalysis {
        account_id: key.account_id,
        platform: key.platform.as_str(),
        username: key.username,
        payload: &payload,
        model: &options.model,
        posts_analyzed,
        prompt_version: PROMPT_VERSION,
        generated_at,
    };
    // A write failure here must not block returning the fresh payload.
    if let Err(e) = creatordb_db::upsert_ai_analysis(pool, &new).await {
        tracing::error!(
            username = key.username,
            platform = %key.platform,
            error = %e,
            "failed to persist generated analysis"
        );
    }

    Ok(AnalysisOutcome {
        username: key.username.to_string(),
        analysis: payload,
        model: options.model.clone(),
        posts_analyzed,
        prompt_version: PROMPT_VERSION.to_string(),
        generated_at,
        cached: false,
    })
}
