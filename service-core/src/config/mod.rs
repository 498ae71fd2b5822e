use crate::error::AppError;
use config::{builder::DefaultState, Config as Cfg, ConfigBuilder, File};
use serde::{de::DeserializeOwned, Deserialize};
use std::fmt;
use std::path::Path;

/// Deployment environment, read from `APP_ENV` (defaults to development).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Environment {
    Development,
    Production,
    Test,
    Other(String),
}

impl Environment {
    pub fn current() -> Self {
        std::env::var("APP_ENV")
            .map(Environment::from)
            .unwrap_or(Environment::Development)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
            Environment::Other(name) => name,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl From<String> for Environment {
    fn from(value: String) -> Self {
        match value.as_str() {
            "development" => Environment::Development,
            "production" => Environment::Production,
            "test" => Environment::Test,
            _ => Environment::Other(value),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of the human-readable format.
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Load layered settings.
///
/// Precedence, lowest first: service defaults, `<config_dir>/default.*`,
/// `<config_dir>/<environment>.*`, `APP_*` variables (`__` separates nested
/// keys), then `PORT`. Both files are optional.
pub fn load<T, F>(config_dir: &Path, defaults: F) -> Result<T, AppError>
where
    T: DeserializeOwned,
    F: FnOnce(ConfigBuilder<DefaultState>) -> Result<ConfigBuilder<DefaultState>, config::ConfigError>,
{
    dotenvy::dotenv().ok();

    let environment = Environment::current();

    let builder = Cfg::builder()
        .set_default("env", environment.as_str())?
        .set_default("log.level", default_log_level())?
        .set_default("log.json", false)?;

    let config = defaults(builder)?
        .add_source(File::from(config_dir.join("default")).required(false))
        .add_source(File::from(config_dir.join(environment.as_str())).required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .set_override_option("port", std::env::var("PORT").ok())?
        .build()?;

    Ok(config.try_deserialize()?)
}
