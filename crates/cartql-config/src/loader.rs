//! Configuration loader with layered sources.

use crate::{AppConfig, ConfigValidator};
use cartql_core::CartqlError;
use config::{Config, ConfigError, Environment, File};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Where the environment name and `CARTQL__*` overrides come from.
#[derive(Debug, Clone)]
enum EnvironmentSource {
    /// `.env`, `CARTQL_ENVIRONMENT` and the process variables.
    Process,
    /// A fixed environment name and variable set; the process is not read.
    Fixed {
        environment: String,
        variables: HashMap<String, String>,
    },
}

/// Configuration loader with runtime refresh support.
#[derive(Clone)]
pub struct ConfigLoader {
    config: Arc<RwLock<AppConfig>>,
    config_dir: String,
    source: EnvironmentSource,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Local overrides
    /// 4. Environment variables with `CARTQL__` prefix
    pub fn new(config_dir: impl Into<String>) -> Result<Self, CartqlError> {
        Self::with_source(config_dir.into(), EnvironmentSource::Process)
    }

    /// Creates a loader that ignores the process environment.
    ///
    /// `variables` stand in for `CARTQL__SECTION__KEY` overrides, keyed the
    /// same way. No `.env` file is read.
    pub fn with_environment(
        config_dir: impl Into<String>,
        environment: impl Into<String>,
        variables: HashMap<String, String>,
    ) -> Result<Self, CartqlError> {
        Self::with_source(
            config_dir.into(),
            EnvironmentSource::Fixed {
                environment: environment.into(),
                variables,
            },
        )
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, CartqlError> {
        Self::new("./config")
    }

    fn with_source(config_dir: String, source: EnvironmentSource) -> Result<Self, CartqlError> {
        let config = Self::load_config(&config_dir, &source)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_dir,
            source,
        })
    }

    /// Returns the current configuration.
    pub async fn get(&self) -> AppConfig {
        self.config.read().await.clone()
    }

    /// Reloads the configuration from disk.
    ///
    /// The current configuration is kept if the new one fails to load.
    pub async fn reload(&self) -> Result<(), CartqlError> {
        let new_config = Self::load_config(&self.config_dir, &self.source)?;
        let mut config = self.config.write().await;
        *config = new_config;
        info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Loads configuration from the specified directory.
    fn load_config(config_dir: &str, source: &EnvironmentSource) -> Result<AppConfig, CartqlError> {
        let (environment, variables): (String, Option<config::Map<String, String>>) = match source {
            EnvironmentSource::Process => {
                if let Err(e) = dotenvy::dotenv() {
                    debug!("No .env file found or error loading it: {}", e);
                }
                let environment = std::env::var("CARTQL_ENVIRONMENT")
                    .unwrap_or_else(|_| "development".to_string());
                (environment, None)
            }
            EnvironmentSource::Fixed {
                environment,
                variables,
            } => (environment.clone(), Some(variables.clone().into_iter().collect())),
        };

        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        // 1. Load default configuration
        let default_path = format!("{}/default.toml", config_dir);
        if Path::new(&default_path).exists() {
            debug!("Loading default config from: {}", default_path);
            builder = builder.add_source(File::with_name(&default_path).required(false));
        }

        // 2. Load environment-specific configuration
        let env_path = format!("{}/{}.toml", config_dir, environment);
        if Path::new(&env_path).exists() {
            debug!("Loading environment config from: {}", env_path);
            builder = builder.add_source(File::with_name(&env_path).required(false));
        }

        // 3. Load local overrides (not committed to version control)
        let local_path = format!("{}/local.toml", config_dir);
        if Path::new(&local_path).exists() {
            debug!("Loading local config from: {}", local_path);
            builder = builder.add_source(File::with_name(&local_path).required(false));
        }

        // 4. Override with environment variables (CARTQL__SECTION__KEY)
        builder = builder.add_source(
            Environment::with_prefix("CARTQL")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(variables),
        );

        let config = builder.build().map_err(config_error_to_cartql_error)?;

        let app_config: AppConfig = config
            .try_deserialize()
            .map_err(config_error_to_cartql_error)?;

        Self::validate_config(&app_config)?;

        Ok(app_config)
    }

    /// Validates the configuration, joining every problem into one error.
    fn validate_config(config: &AppConfig) -> Result<(), CartqlError> {
        ConfigValidator::validate(config).map_err(|errors| {
            let message = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            CartqlError::Configuration(message)
        })
    }

    /// Gets a specific configuration value by key path.
    pub async fn get_value<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let config = self.config.read().await;
        let json = serde_json::to_value(&*config).ok()?;

        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }

        serde_json::from_value(current.clone()).ok()
    }
}

fn config_error_to_cartql_error(err: ConfigError) -> CartqlError {
    CartqlError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_default(dir: &TempDir, contents: &str) {
        fs::write(dir.path().join("default.toml"), contents).unwrap();
    }

    /// Loader that sees neither `.env` nor exported `CARTQL*` variables.
    fn isolated(dir: &TempDir) -> Result<ConfigLoader, CartqlError> {
        ConfigLoader::with_environment(dir.path().to_string_lossy(), "test", HashMap::new())
    }

    #[tokio::test]
    async fn test_load_from_empty_directory_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let loader = isolated(&dir).unwrap();

        let config = loader.get().await;
        assert_eq!(config.attribute_codes.min_length, 1);
        assert_eq!(config.attribute_codes.max_length, 60);
        assert_eq!(config.app.name, "cartql");
    }

    #[tokio::test]
    async fn test_load_attribute_code_section() {
        let dir = TempDir::new().unwrap();
        write_default(
            &dir,
            r#"
            [attribute_codes]
            max_length = 30
            "#,
        );

        let loader = isolated(&dir).unwrap();
        let config = loader.get().await;
        assert_eq!(config.attribute_codes.min_length, 1);
        assert_eq!(config.attribute_codes.max_length, 30);
    }

    #[tokio::test]
    async fn test_inverted_bounds_fail_to_load() {
        let dir = TempDir::new().unwrap();
        write_default(
            &dir,
            r#"
            [attribute_codes]
            min_length = 10
            max_length = 2
            "#,
        );

        let err = isolated(&dir).err().unwrap();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
        assert!(err.to_string().contains("attribute code length"));
    }

    #[tokio::test]
    async fn test_reload_picks_up_changes() {
        let dir = TempDir::new().unwrap();
        write_default(&dir, "[attribute_codes]\nmax_length = 40\n");

        let loader = isolated(&dir).unwrap();
        assert_eq!(loader.get().await.attribute_codes.max_length, 40);

        write_default(&dir, "[attribute_codes]\nmax_length = 50\n");
        loader.reload().await.unwrap();
        assert_eq!(loader.get().await.attribute_codes.max_length, 50);
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_config() {
        let dir = TempDir::new().unwrap();
        write_default(&dir, "[attribute_codes]\nmax_length = 40\n");

        let loader = isolated(&dir).unwrap();

        write_default(&dir, "[attribute_codes]\nmin_length = 50\nmax_length = 40\n");
        assert!(loader.reload().await.is_err());
        assert_eq!(loader.get().await.attribute_codes.max_length, 40);
    }

    #[tokio::test]
    async fn test_get_value_by_path() {
        let dir = TempDir::new().unwrap();
        let loader = isolated(&dir).unwrap();

        let max: Option<usize> = loader.get_value("attribute_codes.max_length").await;
        assert_eq!(max, Some(60));

        let missing: Option<String> = loader.get_value("attribute_codes.nope").await;
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_environment_file_overrides_default() {
        let dir = TempDir::new().unwrap();
        write_default(&dir, "[attribute_codes]\nmax_length = 40\n");
        fs::write(
            dir.path().join("staging.toml"),
            "[attribute_codes]\nmax_length = 20\n",
        )
        .unwrap();

        let staging = ConfigLoader::with_environment(
            dir.path().to_string_lossy(),
            "staging",
            HashMap::new(),
        )
        .unwrap();
        assert_eq!(staging.get().await.attribute_codes.max_length, 20);

        let other = isolated(&dir).unwrap();
        assert_eq!(other.get().await.attribute_codes.max_length, 40);
    }

    #[tokio::test]
    async fn test_variables_override_files() {
        let dir = TempDir::new().unwrap();
        write_default(&dir, "[attribute_codes]\nmax_length = 40\n");

        let mut variables = HashMap::new();
        variables.insert(
            "CARTQL__ATTRIBUTE_CODES__MAX_LENGTH".to_string(),
            "25".to_string(),
        );

        let loader =
            ConfigLoader::with_environment(dir.path().to_string_lossy(), "test", variables)
                .unwrap();
        assert_eq!(loader.get().await.attribute_codes.max_length, 25);

        // Overrides survive a reload.
        loader.reload().await.unwrap();
        assert_eq!(loader.get().await.attribute_codes.max_length, 25);
    }
}
