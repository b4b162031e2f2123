use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct AmbientConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub database: DatabaseConfig,
    pub fcm: FcmConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FcmConfig {
    pub project_id: String,
    /// Inline service-account key. Ignored when `credentials_file` is set.
    pub service_account_key: String,
    pub credentials_file: Option<String>,
    pub enabled: bool,
}

impl AmbientConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(AmbientConfig {
            common: common_config,
            database: DatabaseConfig {
                url: get_env("DATABASE_URL", Some("sqlite:tokens.db"), is_prod)?,
            },
            fcm: FcmConfig {
                project_id: get_env("FCM_PROJECT_ID", Some(""), is_prod)?,
                service_account_key: get_env("FCM_SERVICE_ACCOUNT_KEY", Some(""), is_prod)?,
                credentials_file: env::var("FCM_CREDENTIALS_FILE").ok(),
                enabled: env::var("FCM_ENABLED")
                    .unwrap_or_else(|_| "false".to_string())
                    .parse()
                    .unwrap_or(false),
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
