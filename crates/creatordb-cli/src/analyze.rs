//! The `analyze` command: cache-aware AI analysis from the command line.

use anyhow::{bail, Context};
use sqlx::PgPool;

use creatordb_ai::{AnalysisKey, AnalysisOptions, AnthropicClient};
use creatordb_core::{resolver, AppConfig, Platform};

pub async fn run(
    pool: &PgPool,
    config: &AppConfig,
    platform: Platform,
    username_input: &str,
    account: &str,
) -> anyhow::Result<()> {
    let Some(username) = resolver::username_for(platform, username_input) else {
        bail!("'{username_input}' is not a valid {platform} username or profile URL");
    };

    let client =
        AnthropicClient::new(&config.anthropic_api_key).context("constructing completion client")?;
    let options = AnalysisOptions {
        freshness_days: config.analysis_freshness_days,
        post_cap: config.analysis_post_cap,
        model: config.ai_model.clone(),
        max_tokens: config.ai_max_tokens,
    };
    let key = AnalysisKey {
        account_id: account,
        platform,
        username: &username,
    };

    let outcome = creatordb_ai::run_creator_analysis(pool, &client, key, &options)
        .await
        .context("running creator analysis")?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
