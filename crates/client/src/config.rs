use std::fmt;

use ::config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use chrono_tz::Tz;
use engine::ChartConfig;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/sync.toml";
const ENV_PREFIX: &str = "SYNC";

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
    /// IANA name used to resolve month boundaries.
    pub timezone: String,
    pub chart: ChartConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            username: String::new(),
            password: String::new(),
            timezone: "Europe/Rome".to_string(),
            chart: ChartConfig::default(),
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timezone", &self.timezone)
            .field("chart", &self.chart)
            .finish()
    }
}

impl AppConfig {
    pub fn tz(&self) -> Result<Tz> {
        Ok(engine::parse_timezone(&self.timezone)?)
    }
}

/// Loads `config/sync.toml` (optional) overlaid with `SYNC_*` variables.
pub fn load() -> Result<AppConfig> {
    load_from(DEFAULT_CONFIG_PATH)
}

pub fn load_from(path: &str) -> Result<AppConfig> {
    let builder = Config::builder().add_source(File::with_name(path).required(false));
    build(builder, environment())
}

/// `SYNC_BASE_URL`, `SYNC_CHART__OTHER_THRESHOLD`, ...
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

fn build(builder: ConfigBuilder<DefaultState>, env: Environment) -> Result<AppConfig> {
    let settings: AppConfig = builder
        .add_source(env)
        .build()?
        .try_deserialize()?;

    // Fail at startup rather than on the first month switch.
    settings.tz()?;

    tracing::info!(
        base_url = %settings.base_url,
        timezone = %settings.timezone,
        "configuration loaded"
    );
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use ::config::{FileFormat, Map};
    use engine::OtherBucket;
    use rust_decimal::Decimal;

    use super::*;
    use crate::error::AppError;

    fn from_toml(toml: &str) -> Result<AppConfig> {
        with_env(toml, &[])
    }

    fn with_env(toml: &str, vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: Map<String, String> = vars
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        build(
            Config::builder().add_source(File::from_str(toml, FileFormat::Toml)),
            environment().source(Some(vars)),
        )
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = load_from("config/does-not-exist").unwrap();
        assert_eq!(settings.timezone, "Europe/Rome");
        assert_eq!(settings.chart, ChartConfig::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let settings = from_toml(
            r#"
            base_url = "https://tracker.example"
            username = "anna"

            [chart]
            other_threshold = 25
            other_bucket = "always"
            "#,
        )
        .unwrap();

        assert_eq!(settings.base_url, "https://tracker.example");
        assert_eq!(settings.username, "anna");
        assert_eq!(settings.chart.other_threshold, Decimal::from(25));
        assert_eq!(settings.chart.other_bucket, OtherBucket::Always);
        assert_eq!(settings.chart.other_label, "Other");
    }

    #[test]
    fn prefixed_variables_override_the_file() {
        let settings = with_env(
            r#"
            base_url = "https://from-file.example"

            [chart]
            other_label = "Rest"
            "#,
            &[
                ("SYNC_BASE_URL", "https://from-env.example"),
                ("SYNC_CHART__OTHER_THRESHOLD", "25"),
                ("OTHER_USERNAME", "ignored"),
            ],
        )
        .unwrap();

        assert_eq!(settings.base_url, "https://from-env.example");
        assert_eq!(settings.chart.other_threshold, Decimal::from(25));
        assert_eq!(settings.chart.other_label, "Rest");
        assert_eq!(settings.username, "");
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let err = from_toml(r#"timezone = "Mars/Olympus""#).unwrap_err();
        assert!(matches!(err, AppError::Engine(_)));
    }

    #[test]
    fn debug_output_hides_password() {
        let settings = AppConfig {
            password: "hunter2".to_string(),
            ..AppConfig::default()
        };
        assert!(!format!("{settings:?}").contains("hunter2"));
    }
}
