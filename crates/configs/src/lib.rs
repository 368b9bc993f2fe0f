//! # configs
//!
//! Layered settings for settings-gate: built-in defaults, an optional
//! `settings.toml`, then `SETTINGS_GATE__SECTION__KEY` environment variables.
//! A `.env` file is read into the environment first.

use std::path::PathBuf;

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

pub const ENV_PREFIX: &str = "SETTINGS_GATE";

/// Largest cooldown a millisecond-precision duration can hold.
pub const MAX_COOLDOWN_HOURS: i64 = i64::MAX / 3_600_000;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    pub feedback: FeedbackSettings,
    pub log: LogSettings,
    /// The `.env` file that was applied, if any.
    #[serde(skip)]
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Default, Deserialize)]
pub struct DatabaseSettings {
    /// e.g. `sqlite://data/settings.db`. Unset means in-memory storage.
    pub url: Option<SecretString>,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackSettings {
    /// Minimum hours between two feedback prompts for the same user.
    pub cooldown_hours: i64,
}

#[derive(Debug, Deserialize)]
pub struct LogSettings {
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Settings {
    /// Reads `.env`, `settings.toml` (if present) and the environment.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_with_env_file(dotenvy::dotenv().ok())
    }

    fn load_with_env_file(env_file: Option<PathBuf>) -> Result<Self, SettingsError> {
        let raw = defaults()?
            .add_source(File::with_name("settings").required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut settings = Self::from_config(raw)?;
        settings.env_file = env_file;
        Ok(settings)
    }

    pub fn from_config(raw: Config) -> Result<Self, SettingsError> {
        let settings: Settings = raw.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        let cooldown_hours = self.feedback.cooldown_hours;
        if !(0..=MAX_COOLDOWN_HOURS).contains(&cooldown_hours) {
            return Err(SettingsError::Invalid {
                key: "feedback.cooldown_hours",
                reason: format!("must be within 0..={MAX_COOLDOWN_HOURS}, got {cooldown_hours}"),
            });
        }
        if self.server.host.trim().is_empty() {
            return Err(SettingsError::Invalid {
                key: "server.host",
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Builder pre-seeded with every default, so each later source is optional.
pub fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, SettingsError> {
    Ok(Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080_i64)?
        .set_default("feedback.cooldown_hours", 168_i64)?
        .set_default("log.json", false)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;
    use secrecy::ExposeSecret;

    #[test]
    fn defaults_alone_are_valid() {
        let settings = Settings::from_config(defaults().unwrap().build().unwrap()).unwrap();
        assert_eq!(settings.bind_address(), "0.0.0.0:8080");
        assert_eq!(settings.feedback.cooldown_hours, 168);
        assert!(settings.database.url.is_none());
        assert!(!settings.log.json);
    }

    #[test]
    fn toml_overrides_defaults() {
        let raw = defaults()
            .unwrap()
            .add_source(File::from_str(
                r#"
                [server]
                port = 9090

                [database]
                url = "sqlite://settings.db"

                [feedback]
                cooldown_hours = 24
                "#,
                FileFormat::Toml,
            ))
            .build()
            .unwrap();

        let settings = Settings::from_config(raw).unwrap();
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.feedback.cooldown_hours, 24);
        assert_eq!(
            settings.database.url.as_ref().map(|url| url.expose_secret().to_string()),
            Some("sqlite://settings.db".to_string())
        );
    }

    #[test]
    fn negative_cooldown_is_rejected() {
        let raw = defaults()
            .unwrap()
            .set_override("feedback.cooldown_hours", -1_i64)
            .unwrap()
            .build()
            .unwrap();

        let err = Settings::from_config(raw).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { key: "feedback.cooldown_hours", .. }));
    }

    #[test]
    fn unrepresentable_cooldown_is_rejected() {
        let raw = defaults()
            .unwrap()
            .set_override("feedback.cooldown_hours", 9_000_000_000_000_i64)
            .unwrap()
            .build()
            .unwrap();

        let err = Settings::from_config(raw).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { key: "feedback.cooldown_hours", .. }));
    }

    #[test]
    fn largest_cooldown_is_accepted() {
        let raw = defaults()
            .unwrap()
            .set_override("feedback.cooldown_hours", MAX_COOLDOWN_HOURS)
            .unwrap()
            .build()
            .unwrap();

        let settings = Settings::from_config(raw).unwrap();
        assert_eq!(settings.feedback.cooldown_hours, MAX_COOLDOWN_HOURS);
    }

    #[test]
    fn applied_env_file_is_reported() {
        let path = PathBuf::from("/srv/settings-gate/.env");
        let settings = Settings::load_with_env_file(Some(path.clone())).unwrap();
        assert_eq!(settings.env_file, Some(path));

        let plain = Settings::from_config(defaults().unwrap().build().unwrap()).unwrap();
        assert!(plain.env_file.is_none());
    }

    #[test]
    fn database_url_is_redacted_in_debug() {
        let raw = defaults()
            .unwrap()
            .set_override("database.url", "sqlite://secret-path.db")
            .unwrap()
            .build()
            .unwrap();

        let settings = Settings::from_config(raw).unwrap();
        assert!(!format!("{settings:?}").contains("secret-path"));
    }
}
