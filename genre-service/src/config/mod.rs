use crate::services::IdAllocation;
use serde::Deserialize;
use service_core::config::{Environment, LogSettings};
use service_core::error::AppError;
use std::path::PathBuf;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub name: String,
    pub port: u16,
    pub env: Environment,
    /// Served for any path no route claims.
    pub static_dir: PathBuf,
    pub mail: MailSettings,
    #[serde(default)]
    pub log: LogSettings,
    #[serde(default)]
    pub registry: RegistrySettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct MailSettings {
    pub host: String,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct RegistrySettings {
    #[serde(default)]
    pub id_allocation: IdAllocation,
}

impl Settings {
    pub fn load() -> Result<Self, AppError> {
        let service_directory = service_directory();

        let mut settings: Settings =
            service_core::config::load(&service_directory.join("config"), |builder| {
                builder
                    .set_default("name", "Genre Registry")?
                    .set_default("port", 3000)?
                    .set_default("static_dir", "public")?
                    .set_default("mail.host", "localhost")?
                    .set_default("registry.id_allocation", "collection-length")
            })?;

        if settings.static_dir.is_relative() {
            settings.static_dir = service_directory.join(&settings.static_dir);
        }

        Ok(settings)
    }

    /// Request access logging is only wanted while developing.
    pub fn access_log_enabled(&self) -> bool {
        self.env.is_development()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            name: "Genre Registry".to_string(),
            port: 3000,
            env: Environment::Development,
            static_dir: PathBuf::from("public"),
            mail: MailSettings {
                host: "localhost".to_string(),
            },
            log: LogSettings::default(),
            registry: RegistrySettings::default(),
        }
    }
}

fn service_directory() -> PathBuf {
    let base_path = std::env::current_dir().unwrap_or_default();

    // Running from the workspace root or from inside genre-service
    if base_path.ends_with("genre-service") {
        base_path
    } else {
        base_path.join("genre-service")
    }
}
