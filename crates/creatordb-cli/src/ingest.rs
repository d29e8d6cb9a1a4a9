//! The `ingest` command: the same resolve -> scrape -> map -> persist pipeline
//! the server runs per request, driven from the command line.

use std::collections::BTreeMap;

use anyhow::{bail, Context};
use sqlx::PgPool;

use creatordb_apify::{comments, normalize, ApifyClient};
use creatordb_core::{resolver, AppConfig, Platform, PostRecord};

const DEFAULT_INSTAGRAM_LIMIT: u32 = 12;
const DEFAULT_LINKEDIN_LIMIT: u32 = 3;
const LINKEDIN_COMMENT_LIMIT: u32 = 3;

pub async fn run(
    pool: &PgPool,
    config: &AppConfig,
    platform: Platform,
    username_input: &str,
    limit: Option<u32>,
) -> anyhow::Result<()> {
    let Some(username) = resolver::username_for(platform, username_input) else {
        bail!("'{username_input}' is not a valid {platform} username or profile URL");
    };
    let limit = limit.unwrap_or(match platform {
        Platform::Instagram => DEFAULT_INSTAGRAM_LIMIT,
        Platform::Linkedin => DEFAULT_LINKEDIN_LIMIT,
    });

    let apify = ApifyClient::new(&config.apify_token, config.scrape_timeout_secs)
        .context("constructing scrape client")?;

    tracing::info!(%platform, %username, limit, "ingesting creator posts");

    let (posts, mapping_failures) = match platform {
        Platform::Instagram => {
            let items = apify.scrape_instagram_posts(&username, limit).await?;
            map_all(items.into_iter().map(|item| {
                normalize::map_instagram_post(item, &username)
            }))
        }
        Platform::Linkedin => {
            let items = apify.scrape_linkedin_posts(&username, limit).await?;
            let commented_urns: Vec<String> = items
                .iter()
                .filter(|item| {
                    item.stats
                        .as_ref()
                        .and_then(|s| s.comments)
                        .is_some_and(|count| count > 0)
                })
                .filter_map(|item| item.urn.clone())
                .collect();
            let by_post = if commented_urns.is_empty() {
                BTreeMap::new()
            } else {
                let comment_items = apify
                    .scrape_linkedin_comments(&commented_urns, LINKEDIN_COMMENT_LIMIT)
                    .await?;
                comments::capture_linkedin_headlines(&username, &comment_items)
            };
            map_all(items.into_iter().map(|item| {
                normalize::map_linkedin_post(item, &username, &by_post)
            }))
        }
    };

    if posts.is_empty() && mapping_failures == 0 {
        bail!("no posts found for username: {username}");
    }

    let tally = creatordb_db::upsert_posts(pool, &posts).await;

    let summary = serde_json::json!({
        "platform": platform,
        "username": username,
        "total_posts": posts.len(),
        "saved_count": tally.saved,
        "error_count": tally.failed + mapping_failures,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn map_all<I>(results: I) -> (Vec<PostRecord>, usize)
where
    I: Iterator<Item = Result<PostRecord, creatordb_apify::ApifyError>>,
{
    let mut posts = Vec::new();
    let mut failures = 0;
    for result in results {
        match result {
            Ok(record) => posts.push(record),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unmappable post");
                failures += 1;
            }
        }
    }
    (posts, failures)
}
