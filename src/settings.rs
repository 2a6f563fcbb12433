use std::env;
use std::time::Duration;

const LISTING_URL: &str = "https://fragment.com/?sort=ending&filter=sold";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";
const DB_PATH: &str = "data/sold.sqlite";
const FETCH_TIMEOUT_SECS: u64 = 30;
const ACQUIRE_TIMEOUT_SECS: u64 = 30;
const MAX_CONNECTIONS: u32 = 10;

/// Runtime settings, overridable through the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub listing_url: String,
    pub user_agent: String,
    pub db_path: String,
    pub fetch_timeout: Duration,
    pub acquire_timeout: Duration,
    pub max_connections: u32,
}

impl Settings {
    pub fn from_env() -> Self {
        let fetch_timeout_secs = env::var("FRAGMENT_FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(FETCH_TIMEOUT_SECS);
        let acquire_timeout_secs = env::var("FRAGMENT_DB_ACQUIRE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(ACQUIRE_TIMEOUT_SECS);
        let max_connections = env::var("FRAGMENT_DB_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(MAX_CONNECTIONS);

        Settings {
            listing_url: env::var("FRAGMENT_LISTING_URL").unwrap_or_else(|_| LISTING_URL.into()),
            user_agent: env::var("FRAGMENT_USER_AGENT").unwrap_or_else(|_| USER_AGENT.into()),
            db_path: env::var("FRAGMENT_DB_PATH").unwrap_or_else(|_| DB_PATH.into()),
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            acquire_timeout: Duration::from_secs(acquire_timeout_secs),
            max_connections,
        }
    }
}
