//! Remote store configuration.
//!
//! Provides the `RemoteConfig` struct used by every front end to locate the
//! Supabase bookings table. Values come from a CLI profile and/or the
//! environment; both layers are optional.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::util::{is_http_url, normalize_text_option};

pub const DEFAULT_BOOKINGS_TABLE: &str = "bookings";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const PLACEHOLDER_URL: &str = "https://your-project.supabase.co";
const PLACEHOLDER_ANON_KEY: &str = "your-anon-key";

const ENV_SUPABASE_URL: &str = "DCT_SUPABASE_URL";
const ENV_SUPABASE_ANON_KEY: &str = "DCT_SUPABASE_ANON_KEY";
const ENV_BOOKINGS_TABLE: &str = "DCT_BOOKINGS_TABLE";
const ENV_TIMEOUT_SECS: &str = "DCT_REMOTE_TIMEOUT_SECS";

/// Connection parameters for the remote bookings table.
///
/// The anon key is a public, ship-safe key; it only identifies the project.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RemoteConfig {
    #[serde(default)]
    pub supabase_url: Option<String>,
    #[serde(default)]
    pub supabase_anon_key: Option<String>,
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl RemoteConfig {
    /// Read the `DCT_*` environment variables. Unset or blank values stay `None`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            supabase_url: normalize_text_option(lookup(ENV_SUPABASE_URL)),
            supabase_anon_key: normalize_text_option(lookup(ENV_SUPABASE_ANON_KEY)),
            table: normalize_text_option(lookup(ENV_BOOKINGS_TABLE)),
            timeout_secs: normalize_text_option(lookup(ENV_TIMEOUT_SECS))
                .and_then(|raw| raw.parse().ok()),
        }
    }

    /// Layer `self` over `base`: fields set here win.
    #[must_use]
    pub fn merged_over(self, base: Self) -> Self {
        Self {
            supabase_url: normalize_text_option(self.supabase_url).or(base.supabase_url),
            supabase_anon_key: normalize_text_option(self.supabase_anon_key)
                .or(base.supabase_anon_key),
            table: normalize_text_option(self.table).or(base.table),
            timeout_secs: self.timeout_secs.or(base.timeout_secs),
        }
    }

    /// Static precondition check: both values present, not the template
    /// placeholders, and the URL is a well-formed http(s) endpoint with a host.
    ///
    /// This never touches the network.
    pub fn is_configured(&self) -> bool {
        self.endpoint().is_some() && self.anon_key().is_some()
    }

    /// Normalized base URL without trailing slash, when valid.
    pub fn endpoint(&self) -> Option<String> {
        let url = normalize_text_option(self.supabase_url.clone())?;
        let url = url.trim_end_matches('/').to_string();
        if url == PLACEHOLDER_URL || !is_http_url(&url) {
            return None;
        }
        let parsed = Url::parse(&url).ok()?;
        parsed.host_str().filter(|host| !host.is_empty())?;
        Some(url)
    }

    pub fn anon_key(&self) -> Option<String> {
        normalize_text_option(self.supabase_anon_key.clone())
            .filter(|key| key != PLACEHOLDER_ANON_KEY)
    }

    pub fn table_name(&self) -> String {
        normalize_text_option(self.table.clone())
            .unwrap_or_else(|| DEFAULT_BOOKINGS_TABLE.to_string())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(
            self.timeout_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        )
    }
}
