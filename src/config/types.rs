use serde::Deserialize;

/// Default identification header sent with every request
pub const DEFAULT_USER_AGENT: &str = "spacer";

/// Default forum root
pub const DEFAULT_BASE_URL: &str = "https://forums.space.com";

/// Main configuration structure for Spacer
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub client: ClientConfig,
    pub retry: RetryConfig,
    pub storage: StorageConfig,
}

/// Upstream forum and HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ClientConfig {
    /// Value of the User-Agent header
    pub user_agent: String,

    /// Forum root, e.g. `https://forums.space.com`
    pub base_url: String,

    /// Per-request timeout (seconds)
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Transport retry configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RetryConfig {
    /// Number of retries after the first attempt
    pub max_retries: u32,

    /// Delay before retry k is `backoff_factor * 2^(k-1)` seconds
    pub backoff_factor: f64,

    /// HTTP status codes that trigger a retry
    pub status_codes: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            backoff_factor: 0.1,
            status_codes: vec![429, 500, 503],
        }
    }
}

/// Record store configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StorageConfig {
    /// Path to the SQLite database file
    pub database_path: String,

    /// Upsert posts and users while extracting
    pub persist: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: "spacer.db".to_string(),
            persist: true,
        }
    }
}
