use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub apify_token: String,
    pub anthropic_api_key: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub scrape_timeout_secs: u64,
    pub image_proxy_timeout_secs: u64,
    pub analysis_freshness_days: i64,
    pub analysis_post_cap: i64,
    pub ai_model: String,
    pub ai_max_tokens: u32,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("apify_token", &"[redacted]")
            .field("anthropic_api_key", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("scrape_timeout_secs", &self.scrape_timeout_secs)
            .field("image_proxy_timeout_secs", &self.image_proxy_timeout_secs)
            .field("analysis_freshness_days", &self.analysis_freshness_days)
            .field("analysis_post_cap", &self.analysis_post_cap)
            .field("ai_model", &self.ai_model)
            .field("ai_max_tokens", &self.ai_max_tokens)
            .finish()
    }
}
