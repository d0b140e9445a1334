use crate::{
    cli::Cli,
    config::{CatalogConfig, ServerConfig},
    providers::ProviderWhitelist,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration file format for persistent settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConfigFile {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
}

fn to_string(path: &str, config: &ConfigFile) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    if path.ends_with(".json") {
        Ok(serde_json::to_string_pretty(config)?)
    } else {
        // Default to TOML
        Ok(toml::to_string_pretty(config)?)
    }
}

/// Configuration manager for loading and saving configuration files
pub struct ConfigManager {
    config_path: String,
    config: ConfigFile,
}

impl ConfigManager {
    /// Creates a new configuration manager, falling back to defaults when the
    /// file is missing
    ///
    /// # Arguments
    /// * `config_path` - Path to the configuration file
    pub fn new<P: AsRef<Path>>(config_path: P) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let config_path = config_path.as_ref().to_string_lossy().to_string();
        let config = Self::load_config(&config_path)?;

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Loads configuration from file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// The parsed file, or the defaults if there is no file at `path`
    pub fn load_config(path: &str) -> Result<ConfigFile, Box<dyn std::error::Error + Send + Sync>> {
        if !Path::new(path).exists() {
            return Ok(ConfigFile::default());
        }

        let content = fs::read_to_string(path)?;
        let config: ConfigFile = if path.ends_with(".json") {
            serde_json::from_str(&content)?
        } else {
            toml::from_str(&content)?
        };

        Ok(config)
    }

    /// Saves configuration to file
    pub fn save_config(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        fs::write(&self.config_path, to_string(&self.config_path, &self.config)?)?;
        Ok(())
    }

    /// Creates a default configuration file at the specified path
    pub fn create_default_config<P: AsRef<Path>>(
        path: P,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let path_str = path.as_ref().to_string_lossy();
        let content = to_string(&path_str, &ConfigFile::default())?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn get_config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn get_config_mut(&mut self) -> &mut ConfigFile {
        &mut self.config
    }

    /// Applies command line overrides on top of the file settings
    pub fn merge_with_cli_args(&mut self, cli_args: &Cli) {
        if let Some(host) = &cli_args.host {
            self.config.server.host = host.clone();
        }
        if let Some(port) = cli_args.port {
            self.config.server.port = port;
        }
        if let Some(level) = &cli_args.log_level {
            self.config.server.log_level = level.clone();
        }
        if let Some(url) = &cli_args.upstream_url {
            self.config.catalog.upstream_url = url.clone();
        }
        if let Some(url) = &cli_args.base_url {
            self.config.catalog.base_url = url.clone();
        }
        if cli_args.no_whitelist {
            self.config.catalog.whitelist = None;
        }
    }

    /// Validates the current configuration
    pub fn validate_config(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let ConfigFile { server, catalog } = &self.config;

        if server.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if !LOG_LEVELS.contains(&server.log_level.as_str()) {
            errors.push("Log level must be one of: trace, debug, info, warn, error".to_string());
        }

        if catalog.request_timeout_seconds == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if catalog.page_size == 0 {
            errors.push("Page size cannot be 0".to_string());
        }

        for (name, url) in [("Upstream URL", &catalog.upstream_url), ("Base URL", &catalog.base_url)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                errors.push(format!("{name} must start with http:// or https://"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Gets the effective configuration after merging file and CLI settings
    pub fn get_effective_config(&self) -> EffectiveConfig {
        EffectiveConfig {
            server: self.config.server.clone(),
            catalog: self.config.catalog.clone(),
        }
    }
}

/// Effective configuration after merging all sources
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
}

impl EffectiveConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// An absent or empty list turns filtering off.
    pub fn whitelist(&self) -> Option<ProviderWhitelist> {
        self.catalog
            .whitelist
            .as_ref()
            .filter(|providers| !providers.is_empty())
            .map(|providers| ProviderWhitelist::new(providers.iter().cloned()))
    }

    pub fn revalidate(&self) -> Duration {
        Duration::from_secs(self.catalog.revalidate_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog.request_timeout_seconds)
    }
}
