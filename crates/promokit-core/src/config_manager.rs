use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::types::ProviderKind;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Failed to read config: {0}")]
    ReadError(String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration for PromoKit
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PromoKitConfig {
    /// Text-generation backend configuration
    #[serde(default)]
    pub llm: LLMConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Generation history configuration
    #[serde(default)]
    pub history: HistoryConfig,
}

/// Text-generation backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    /// Provider: "openai" (chat completions) or "huggingface" (raw inference)
    #[serde(default = "default_llm_provider")]
    pub provider: String,

    /// Chat model (e.g., "gpt-4", "gpt-3.5-turbo")
    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    /// OpenAI API key; never written back to disk
    #[serde(default, skip_serializing)]
    pub openai_api_key: Option<SecretString>,

    /// Inference model id (e.g., "bigscience/bloom-7b1")
    #[serde(default = "default_huggingface_model")]
    pub huggingface_model: String,

    #[serde(default = "default_huggingface_base_url")]
    pub huggingface_base_url: String,

    /// Hugging Face API token; never written back to disk
    #[serde(default, skip_serializing)]
    pub huggingface_api_key: Option<SecretString>,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Nucleus sampling probability (raw inference only)
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Maximum generated length (raw inference only)
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Request timeout in seconds; unset means no timeout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            openai_model: default_openai_model(),
            openai_base_url: default_openai_base_url(),
            openai_api_key: None,
            huggingface_model: default_huggingface_model(),
            huggingface_base_url: default_huggingface_base_url(),
            huggingface_api_key: None,
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_length: default_max_length(),
            timeout_secs: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level ("trace" .. "error") or an env-filter directive
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "pretty", "json", "compact"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Generation history configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Number of kits retained, newest first
    #[serde(default = "default_history_max_entries")]
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: default_history_max_entries(),
        }
    }
}

// Default value functions
fn default_llm_provider() -> String {
    "huggingface".to_string()
}
fn default_openai_model() -> String {
    "gpt-4".to_string()
}
fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_huggingface_model() -> String {
    "bigscience/bloom-7b1".to_string()
}
fn default_huggingface_base_url() -> String {
    "https://api-inference.huggingface.co/models".to_string()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_top_p() -> f32 {
    0.95
}
fn default_max_length() -> usize {
    2000
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}
fn default_history_max_entries() -> usize {
    DEFAULT_HISTORY_LIMIT
}

/// Configuration manager with layered sources
pub struct ConfigManager {
    config: PromoKitConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration with the following precedence:
    /// 1. Environment variables (.env file)
    /// 2. Config file (.promokit.toml)
    /// 3. Sensible defaults
    pub fn load() -> Result<Self, ConfigError> {
        info!("Loading PromoKit configuration");

        Self::load_dotenv();

        let (config, config_path) = Self::load_config_file()?;
        let config = Self::apply_env_overrides(config, |key| std::env::var(key).ok());
        Self::validate_config(&config)?;

        Self::log_summary(&config, config_path.as_deref());

        Ok(Self {
            config,
            config_path,
        })
    }

    /// Load a specific config file, skipping discovery but still applying env overrides
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let config = Self::read_toml_file(path)?;
        let config = Self::apply_env_overrides(config, |key| std::env::var(key).ok());
        Self::validate_config(&config)?;

        Self::log_summary(&config, Some(path));

        Ok(Self {
            config,
            config_path: Some(path.to_path_buf()),
        })
    }

    fn log_summary(config: &PromoKitConfig, path: Option<&Path>) {
        info!(
            config_file = %path.map(|p| p.display().to_string()).unwrap_or_else(|| "NONE (using defaults)".to_string()),
            provider = %config.llm.provider,
            openai_key = config.llm.openai_api_key.is_some(),
            huggingface_key = config.llm.huggingface_api_key.is_some(),
            "Configuration loaded"
        );
    }

    /// Load .env file if it exists
    fn load_dotenv() {
        if Path::new(".env").exists() {
            if let Err(e) = dotenv::from_filename(".env") {
                warn!("Failed to load .env file: {}", e);
            } else {
                info!("Loaded .env file from current directory");
            }
            return;
        }

        if let Some(home) = dirs::home_dir() {
            let home_env = home.join(".promokit.env");
            if home_env.exists() {
                if let Err(e) = dotenv::from_path(&home_env) {
                    warn!("Failed to load .promokit.env: {}", e);
                } else {
                    info!("Loaded .promokit.env from home directory");
                }
            }
        }
    }

    /// Find and load config file
    /// Search order:
    /// 1. ./.promokit.toml (current directory)
    /// 2. ~/.promokit/config.toml (user config)
    /// 3. Use defaults
    fn load_config_file() -> Result<(PromoKitConfig, Option<PathBuf>), ConfigError> {
        let local_config = Path::new(".promokit.toml");
        if local_config.exists() {
            let config = Self::read_toml_file(local_config)?;
            return Ok((config, Some(local_config.to_path_buf())));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".promokit").join("config.toml");
            if user_config.exists() {
                let config = Self::read_toml_file(&user_config)?;
                return Ok((config, Some(user_config)));
            }
        }

        info!("No config file found, using defaults");
        Ok((PromoKitConfig::default(), None))
    }

    fn read_toml_file(path: &Path) -> Result<PromoKitConfig, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Apply environment variable overrides using `lookup` to resolve each key
    pub fn apply_env_overrides<F>(mut config: PromoKitConfig, lookup: F) -> PromoKitConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(provider) = lookup("PROMOKIT_LLM_PROVIDER") {
            config.llm.provider = provider;
        }
        if let Some(key) = lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()) {
            config.llm.openai_api_key = Some(SecretString::from(key));
        }
        if let Some(key) = lookup("HUGGINGFACE_API_KEY").filter(|k| !k.trim().is_empty()) {
            config.llm.huggingface_api_key = Some(SecretString::from(key));
        }
        if let Some(model) = lookup("PROMOKIT_OPENAI_MODEL") {
            config.llm.openai_model = model;
        }
        if let Some(model) = lookup("PROMOKIT_HUGGINGFACE_MODEL") {
            config.llm.huggingface_model = model;
        }
        if let Some(temp) = lookup("PROMOKIT_TEMPERATURE") {
            match temp.parse() {
                Ok(t) => config.llm.temperature = t,
                Err(_) => warn!("Ignoring invalid PROMOKIT_TEMPERATURE: {}", temp),
            }
        }
        if let Some(timeout) = lookup("PROMOKIT_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(secs) => config.llm.timeout_secs = Some(secs),
                Err(_) => warn!("Ignoring invalid PROMOKIT_TIMEOUT_SECS: {}", timeout),
            }
        }

        // Logging
        if let Some(level) = lookup("RUST_LOG") {
            config.logging.level = level;
        }

        config
    }

    /// Validate configuration
    pub fn validate_config(config: &PromoKitConfig) -> Result<(), ConfigError> {
        // Same parser the provider factory uses
        config.llm.provider.parse::<ProviderKind>().map_err(|_| {
            ConfigError::ValidationError(format!(
                "Invalid LLM provider: {}. Must be one of: openai, huggingface",
                config.llm.provider
            ))
        })?;

        if !(0.0..=2.0).contains(&config.llm.temperature) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid temperature: {}. Must be between 0.0 and 2.0",
                config.llm.temperature
            )));
        }

        if !(config.llm.top_p > 0.0 && config.llm.top_p <= 1.0) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid top_p: {}. Must be in (0.0, 1.0]",
                config.llm.top_p
            )));
        }

        if config.llm.max_length == 0 {
            return Err(ConfigError::ValidationError(
                "max_length must be greater than 0".to_string(),
            ));
        }

        // Accepts plain levels as well as RUST_LOG-style directives
        if EnvFilter::try_new(&config.logging.level).is_err() {
            return Err(ConfigError::ValidationError(format!(
                "Invalid log level: {}. Use trace, debug, info, warn, error or a filter directive",
                config.logging.level
            )));
        }

        match config.logging.format.as_str() {
            "pretty" | "json" | "compact" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log format: {}. Must be one of: pretty, json, compact",
                    other
                )))
            }
        }

        if config.history.max_entries == 0 {
            return Err(ConfigError::ValidationError(
                "history.max_entries must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &PromoKitConfig {
        &self.config
    }

    /// Get the path to the config file that was loaded, if any
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Create a default config file
    pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        let config = PromoKitConfig::default();
        let toml_str =
            toml::to_string_pretty(&config).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::ReadError(e.to_string()))?;
        }

        std::fs::write(path, toml_str).map_err(|e| ConfigError::ReadError(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = PromoKitConfig::default();
        assert_eq!(config.llm.provider, "huggingface");
        assert_eq!(config.llm.temperature, 0.7);
        assert_eq!(config.llm.max_length, 2000);
        assert!(config.llm.openai_api_key.is_none());
        assert!(config.llm.timeout_secs.is_none());
        assert_eq!(config.history.max_entries, 10);
    }

    #[test]
    fn test_config_validation() {
        let config = PromoKitConfig::default();
        assert!(ConfigManager::validate_config(&config).is_ok());

        let mut bad_provider = config.clone();
        bad_provider.llm.provider = "invalid".to_string();
        assert!(ConfigManager::validate_config(&bad_provider).is_err());

        let mut bad_temperature = config.clone();
        bad_temperature.llm.temperature = 3.5;
        assert!(ConfigManager::validate_config(&bad_temperature).is_err());

        let mut bad_top_p = config.clone();
        bad_top_p.llm.top_p = 0.0;
        assert!(ConfigManager::validate_config(&bad_top_p).is_err());

        let mut directive = config.clone();
        directive.logging.level = "promokit_ai=debug,info".to_string();
        assert!(ConfigManager::validate_config(&directive).is_ok());

        let mut bad_format = config;
        bad_format.logging.format = "xml".to_string();
        assert!(ConfigManager::validate_config(&bad_format).is_err());
    }

    #[test]
    fn test_provider_validation_matches_factory_parsing() {
        let mut config = PromoKitConfig::default();

        for accepted in [" openai", "HF", "HuggingFace\n", "openai "] {
            config.llm.provider = accepted.to_string();
            assert!(
                ConfigManager::validate_config(&config).is_ok(),
                "{:?} should validate",
                accepted
            );
            assert!(accepted.parse::<ProviderKind>().is_ok());
        }

        for rejected in ["", "anthropic", "open ai"] {
            config.llm.provider = rejected.to_string();
            let err = ConfigManager::validate_config(&config).unwrap_err();
            assert!(err.to_string().contains("Invalid LLM provider"));
            assert!(rejected.parse::<ProviderKind>().is_err());
        }
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("PROMOKIT_LLM_PROVIDER", "openai"),
            ("OPENAI_API_KEY", "sk-test"),
            ("HUGGINGFACE_API_KEY", "  "),
            ("PROMOKIT_TEMPERATURE", "0.3"),
            ("PROMOKIT_TIMEOUT_SECS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let config = ConfigManager::apply_env_overrides(PromoKitConfig::default(), |key| {
            env.get(key).map(|v| v.to_string())
        });

        assert_eq!(config.llm.provider, "openai");
        assert_eq!(
            config.llm.openai_api_key.as_ref().map(|k| k.expose_secret()),
            Some("sk-test")
        );
        assert!(config.llm.huggingface_api_key.is_none());
        assert_eq!(config.llm.temperature, 0.3);
        assert!(config.llm.timeout_secs.is_none());
    }

    #[test]
    fn test_secrets_are_not_serialized() {
        let mut config = PromoKitConfig::default();
        config.llm.openai_api_key = Some(SecretString::from("sk-secret".to_string()));

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(!toml_str.contains("sk-secret"));
        assert!(!toml_str.contains("openai_api_key"));
    }
}
