mod analyze;
mod ingest;

use anyhow::Context;
use clap::{Parser, Subcommand};

use creatordb_core::Platform;

#[derive(Debug, Parser)]
#[command(name = "creatordb-cli")]
#[command(about = "creatordb command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run pending database migrations.
    Migrate,
    /// Scrape and persist a creator's recent posts.
    Ingest {
        /// Platform: instagram or linkedin.
        #[arg(long)]
        platform: String,
        /// Username or full profile URL.
        #[arg(long)]
        username: String,
        /// How many posts to request from the scrape provider.
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Generate (or fetch from cache) an AI analysis for a creator.
    Analyze {
        /// Platform: instagram or linkedin.
        #[arg(long)]
        platform: String,
        /// Username or full profile URL.
        #[arg(long)]
        username: String,
        /// Account the analysis is keyed under.
        #[arg(long, default_value = "cli")]
        account: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = creatordb_core::load_app_config()?;
    let pool = creatordb_db::connect_pool(
        &config.database_url,
        creatordb_db::PoolConfig::from_app_config(&config),
    )
    .await
    .context("connecting to database")?;

    match cli.command {
        Commands::Migrate => {
            creatordb_db::run_migrations(&pool).await?;
            println!("migrations applied");
        }
        Commands::Ingest {
            platform,
            username,
            limit,
        } => {
            let platform = parse_platform(&platform)?;
            ingest::run(&pool, &config, platform, &username, limit).await?;
        }
        Commands::Analyze {
            platform,
            username,
            account,
        } => {
            let platform = parse_platform(&platform)?;
            analyze::run(&pool, &config, platform, &username, &account).await?;
        }
    }

    Ok(())
}

fn parse_platform(raw: &str) -> anyhow::Result<Platform> {
    raw.parse::<Platform>()
        .context("platform must be 'instagram' or 'linkedin'")
}
