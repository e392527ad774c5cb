/*!
 * Application configuration.
 *
 * Loading, validating and saving `conf.json`, and turning it into the settings
 * object the translation pipeline consumes.
 */

use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::errors::TranslationError;
use crate::language_utils;
use crate::translation::core::{ProviderSettings, TranslationSettings};
use crate::translation::endpoint::EndpointParams;
use crate::translation::fallback::LanguagePreferences;
use crate::translation::filter::FilterConfig;

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Configured translation providers
    #[serde(default = "default_providers")]
    pub providers: Vec<ProviderConfig>,

    /// Preferred and second preferred languages
    #[serde(default)]
    pub languages: LanguagePreferences,

    /// Fragment filter thresholds
    #[serde(default)]
    pub filter: FilterConfig,

    /// Result cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Provider configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProviderConfig {
    /// Identifier callers select the provider with
    pub id: String,

    /// Display name
    #[serde(default = "String::new")]
    pub name: String,

    /// Endpoint URL, with `key`, `tc`, `pbc` and `org` in its query string
    pub endpoint: String,

    /// Whether the provider can be selected
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl ProviderConfig {
    /// Create an enabled provider configuration
    pub fn new(id: impl Into<String>, endpoint: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            endpoint: endpoint.into(),
            enabled: true,
        }
    }
}

/// Result cache settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CacheConfig {
    /// Whether finished translations are cached
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching filter for the `log` facade
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_providers() -> Vec<ProviderConfig> {
    vec![ProviderConfig {
        id: "default".to_string(),
        name: "Default translator".to_string(),
        endpoint: "https://translate.example.com/api/v1/batch?key=&tc=0&pbc=0".to_string(),
        enabled: true,
    }]
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration, writing a default file first when none exists
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        language_utils::resolve_language(&self.languages.preferred)
            .context("Invalid preferred language")?;
        language_utils::resolve_language(&self.languages.second_preferred)
            .context("Invalid second preferred language")?;

        if self.filter.short_content_threshold == 0 {
            warn!("Short content threshold is 0, only blank fragments will be skipped");
        }

        if !self.providers.iter().any(|p| p.enabled) {
            return Err(anyhow!("At least one enabled provider is required"));
        }

        for provider in &self.providers {
            if provider.id.trim().is_empty() {
                return Err(anyhow!("Provider id cannot be empty"));
            }

            if self.providers.iter().filter(|p| p.id == provider.id).count() > 1 {
                return Err(anyhow!("Duplicate provider id: {}", provider.id));
            }

            EndpointParams::parse(&provider.endpoint)
                .with_context(|| format!("Invalid endpoint for provider '{}'", provider.id))?;
        }

        Ok(())
    }

    /// Id of the first enabled provider
    pub fn default_provider_id(&self) -> Option<&str> {
        self.providers
            .iter()
            .find(|p| p.enabled)
            .map(|p| p.id.as_str())
    }

    /// Build the settings object the translation pipeline consumes
    ///
    /// Disabled providers are left out, so selecting one is a configuration error.
    pub fn settings(&self) -> Result<TranslationSettings, TranslationError> {
        let providers = self
            .providers
            .iter()
            .filter(|p| p.enabled)
            .map(|p| {
                Ok(ProviderSettings {
                    id: p.id.clone(),
                    endpoint: EndpointParams::parse(&p.endpoint)?,
                })
            })
            .collect::<Result<Vec<_>, TranslationError>>()?;

        Ok(TranslationSettings {
            providers,
            languages: self.languages.clone(),
            filter: self.filter,
        })
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            providers: default_providers(),
            languages: LanguagePreferences::default(),
            filter: FilterConfig::default(),
            cache: CacheConfig::default(),
            timeout_secs: default_timeout_secs(),
            log_level: LogLevel::default(),
        }
    }
}
