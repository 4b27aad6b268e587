use anyhow::Result;

/// Application configuration loaded from environment variables.
///
/// The credential pool is discovered at startup and is read-only afterwards.
/// An empty pool is not fatal here — the dispatcher fails fast with
/// `NoCredentials` on the first AI call instead, so extraction-only flows
/// keep working.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_keys: Vec<String>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_keys: discover_api_keys(),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Collects all available API keys, in failover order: the primary
/// `GOOGLE_API_KEY` first, then numbered fallbacks `GOOGLE_API_KEY_1`,
/// `GOOGLE_API_KEY_2`, ... stopping at the first gap in the sequence.
pub fn discover_api_keys() -> Vec<String> {
    let mut keys = Vec::new();

    if let Ok(key) = std::env::var("GOOGLE_API_KEY") {
        if !key.is_empty() {
            keys.push(key);
        }
    }

    let mut i = 1;
    while let Ok(key) = std::env::var(format!("GOOGLE_API_KEY_{i}")) {
        if key.is_empty() {
            break;
        }
        keys.push(key);
        i += 1;
    }

    keys
}
