// Sync session configuration.
//
// Everything that used to be an ambient default lives here explicitly:
// base URL, API key, dry-run flag, and the default monitoring interval
// applied to monitors declared without one.

use std::time::Duration;

use secrecy::SecretString;
use upkeep_api::TransportConfig;
use url::Url;

/// Production endpoint of the Uptime Robot v2 API.
pub const DEFAULT_BASE_URL: &str = "https://api.uptimerobot.com/v2/";

/// Default monitoring interval for monitors that don't set one.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Configuration for an [`Upkeep`](crate::Upkeep) session.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Base URL of the API.
    pub base_url: Url,

    /// The account's main API key (monitor-specific keys can't manage
    /// contacts).
    pub api_key: SecretString,

    /// When set, `sync()` still fetches remote state and computes the
    /// full diff, but issues no create/update/delete call.
    pub dry_run: bool,

    /// Interval applied to monitor declarations that don't override it.
    pub default_interval: Duration,

    /// Transport settings for the underlying HTTP client.
    pub transport: TransportConfig,
}

impl SyncOptions {
    /// Options for the production API with the given key and defaults
    /// everywhere else.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            api_key: SecretString::from(api_key.into()),
            dry_run: false,
            default_interval: DEFAULT_INTERVAL,
            transport: TransportConfig::default(),
        }
    }
}
