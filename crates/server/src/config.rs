use shared_types::{AppConfig, FeatureFlags, SessionSettings};
use std::sync::OnceLock;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Path to the config file, relative to the working directory.
const CONFIG_PATH: &str = "config.toml";

/// Parse `config.toml` contents, falling back to defaults on syntax errors.
pub fn parse_config(contents: &str) -> AppConfig {
    toml::from_str(contents).unwrap_or_else(|e| {
        tracing::warn!(path = CONFIG_PATH, error = %e, "config unparseable; using defaults");
        AppConfig::default()
    })
}

/// Load `config.toml` into the process-wide slot. Only the first call reads
/// the file; a missing file means defaults everywhere.
pub fn load_config() -> &'static AppConfig {
    CONFIG.get_or_init(|| {
        let config = match std::fs::read_to_string(CONFIG_PATH) {
            Ok(contents) => parse_config(&contents),
            Err(e) => {
                tracing::info!(path = CONFIG_PATH, error = %e, "no config file; using defaults");
                AppConfig::default()
            }
        };
        tracing::info!(features = ?config.features, session = ?config.session, "config loaded");
        config
    })
}

/// Loaded config, or defaults if [`load_config`] has not run yet.
pub fn app_config() -> &'static AppConfig {
    static DEFAULT: OnceLock<AppConfig> = OnceLock::new();
    CONFIG
        .get()
        .unwrap_or_else(|| DEFAULT.get_or_init(AppConfig::default))
}

pub fn feature_flags() -> &'static FeatureFlags {
    &app_config().features
}

pub fn session_settings() -> &'static SessionSettings {
    &app_config().session
}
