use serde::{Deserialize, Serialize};

/// Feature flags controlling optional behavior.
///
/// Loaded from `config.toml` at server startup and exposed to clients via a
/// server function. Every field defaults to `false`, so a missing or partial
/// config file turns everything optional off.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FeatureFlags {
    /// Export traces and logs over OTLP.
    #[serde(default)]
    pub telemetry: bool,
    /// Create one demo account per role on startup.
    #[serde(default)]
    pub seed_demo: bool,
}

/// Token lifetimes for the cookie-based session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSettings {
    #[serde(default = "default_access_minutes")]
    pub access_token_minutes: i64,
    #[serde(default = "default_refresh_days")]
    pub refresh_token_days: i64,
}

fn default_access_minutes() -> i64 {
    15
}

fn default_refresh_days() -> i64 {
    7
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            access_token_minutes: default_access_minutes(),
            refresh_token_days: default_refresh_days(),
        }
    }
}

/// Top-level structure of `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default)]
    pub session: SessionSettings,
}
