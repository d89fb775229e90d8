use crate::client::roster::RosterPolicy;
use anyhow::{Context, Result, anyhow};
use once_cell::sync::OnceCell;
use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

static CLIENT_CONFIG: OnceCell<ClientConfig> = OnceCell::new();

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Normalised API base, scheme included, no trailing slash.
    pub base_url: String,
    pub request_timeout: Duration,
    pub roster_policy: RosterPolicy,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            request_timeout: Duration::from_secs(30),
            roster_policy: RosterPolicy::OncePerMount,
        }
    }

    /// `HRMS_API_URL`, `HRMS_REQUEST_TIMEOUT_SECS`, `HRMS_ROSTER_MAX_AGE_SECS`.
    /// An explicit `api_url` wins over the environment.
    pub fn from_env(api_url: Option<&str>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let base_url = match api_url {
            Some(url) => url.to_string(),
            None => env::var("HRMS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        };
        let mut config = Self::new(&base_url);

        if let Ok(raw) = env::var("HRMS_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = raw
                .parse()
                .with_context(|| format!("HRMS_REQUEST_TIMEOUT_SECS must be a number, got {raw:?}"))?;
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Ok(raw) = env::var("HRMS_ROSTER_MAX_AGE_SECS") {
            let secs: u64 = raw
                .parse()
                .with_context(|| format!("HRMS_ROSTER_MAX_AGE_SECS must be a number, got {raw:?}"))?;
            config.roster_policy = RosterPolicy::from_max_age_secs(secs);
        }

        Ok(config)
    }
}

/// Install the process-wide configuration. Only the first call succeeds.
pub fn init(config: ClientConfig) -> Result<&'static ClientConfig> {
    CLIENT_CONFIG
        .set(config)
        .map_err(|_| anyhow!("client configuration is already initialised"))?;
    Ok(get())
}

/// The installed configuration, or the defaults when `init` was never called.
pub fn get() -> &'static ClientConfig {
    CLIENT_CONFIG.get_or_init(|| ClientConfig::new(DEFAULT_API_URL))
}

/// Hosts given without a scheme are assumed to be served over https.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}
