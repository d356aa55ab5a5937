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
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Base URL of the external read-only catalog.
    pub external_base_url: String,
    /// Base URL of the remote recommender; `None` disables the remote tier.
    pub recommender_base_url: Option<String>,
    pub user_agent: String,
    /// Page size for external catalog fetches.
    pub external_page_limit: u32,
    pub catalog_timeout_secs: u64,
    /// Additional attempts after the first failure for catalog reads.
    pub catalog_max_retries: u32,
    pub catalog_backoff_base_ms: u64,
    pub recommender_timeout_secs: u64,
    /// Total attempts for the remote recommender tier.
    pub recommender_max_attempts: u32,
    pub recommender_backoff_base_ms: u64,
    /// Default recommendation set size.
    pub recommend_limit: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("external_base_url", &self.external_base_url)
            .field("recommender_base_url", &self.recommender_base_url)
            .field("user_agent", &self.user_agent)
            .field("external_page_limit", &self.external_page_limit)
            .field("catalog_timeout_secs", &self.catalog_timeout_secs)
            .field("catalog_max_retries", &self.catalog_max_retries)
            .field("catalog_backoff_base_ms", &self.catalog_backoff_base_ms)
            .field("recommender_timeout_secs", &self.recommender_timeout_secs)
            .field("recommender_max_attempts", &self.recommender_max_attempts)
            .field(
                "recommender_backoff_base_ms",
                &self.recommender_backoff_base_ms,
            )
            .field("recommend_limit", &self.recommend_limit)
            .finish()
    }
}
