mod loader;

use serde::{Deserialize, Serialize};
use std::path::Path;

pub use loader::load_config;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub persona: PersonaConfig,
    #[serde(default)]
    pub stats: StatsConfig,
}

/// Proxy server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

/// Upstream generative-language API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Base URL of the generative-language service
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API version path segment
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Fixed model identifier all requests go to
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_api_version() -> String {
    "v1beta".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash-preview-05-20".to_string()
}

fn default_timeout() -> u64 {
    120
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_version: default_api_version(),
            model: default_model(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl UpstreamConfig {
    /// Returns the base URL with trailing slash stripped
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Full URL of the generateContent endpoint for the configured model
    pub fn generate_url(&self) -> String {
        format!(
            "{}/{}/models/{}:generateContent",
            self.base_url(),
            self.api_version,
            self.model
        )
    }

    /// Full URL of the model metadata endpoint (used by `test-upstream`)
    pub fn model_url(&self) -> String {
        format!("{}/{}/models/{}", self.base_url(), self.api_version, self.model)
    }
}

/// Credential strategy selection
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    #[default]
    ApiKey,
    ServiceAccount,
}

/// Credential configuration
///
/// Exactly one strategy is active per deployment, selected by `mode`. Secrets
/// may be inlined for testing but normally arrive through the named env vars,
/// resolved once at config load.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub mode: AuthMode,
    /// Inline API key (takes precedence over `api_key_env`)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Env var holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Path to a service-account JSON file
    #[serde(default)]
    pub credentials_path: Option<String>,
    /// Env var holding the service-account JSON blob
    #[serde(default = "default_credentials_env")]
    pub credentials_env: String,
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_credentials_env() -> String {
    "GOOGLE_CREDENTIALS_JSON".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            mode: AuthMode::default(),
            api_key: None,
            api_key_env: default_api_key_env(),
            credentials_path: None,
            credentials_env: default_credentials_env(),
        }
    }
}

/// Persona profile selection
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PersonaConfig {
    /// Built-in profile name ("guide" or "staged")
    #[serde(default = "default_profile")]
    pub profile: String,
    /// Optional YAML file overriding the built-in profiles
    #[serde(default)]
    pub file: Option<String>,
}

fn default_profile() -> String {
    "guide".to_string()
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            file: None,
        }
    }
}

/// Stats logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatsConfig {
    #[serde(default = "default_stats_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub format: StatsFormat,
}

fn default_stats_enabled() -> bool {
    true
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            enabled: default_stats_enabled(),
            format: StatsFormat::default(),
        }
    }
}

/// Stats output format
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StatsFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        load_config(path)
    }

    /// Load configuration with fallback to default path
    pub fn load_or_default(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        match config_path {
            Some(path) => Self::from_file(path),
            None => {
                let default_paths = ["config.yaml", "config.yml", "./config/config.yaml"];
                for p in default_paths {
                    let path = Path::new(p);
                    if path.exists() {
                        return Self::from_file(path);
                    }
                }
                Err(ConfigError::NotFound(
                    "No config file found. Tried: config.yaml, config.yml, ./config/config.yaml"
                        .to_string(),
                ))
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_config_defaults() {
        let config = UpstreamConfig::default();
        assert_eq!(config.base_url, "https://generativelanguage.googleapis.com");
        assert_eq!(config.api_version, "v1beta");
        assert_eq!(config.model, "gemini-2.5-flash-preview-05-20");
        assert_eq!(config.timeout_seconds, 120);
    }

    #[test]
    fn test_upstream_generate_url() {
        let config = UpstreamConfig {
            base_url: "http://localhost:18080/".to_string(),
            api_version: "v1beta".to_string(),
            model: "gemini-test".to_string(),
            timeout_seconds: 5,
        };
        assert_eq!(
            config.generate_url(),
            "http://localhost:18080/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn test_upstream_model_url() {
        let config = UpstreamConfig::default();
        assert_eq!(
            config.model_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-preview-05-20"
        );
    }

    #[test]
    fn test_upstream_base_url_trailing_slash() {
        let config = UpstreamConfig {
            base_url: "http://localhost:8080/".to_string(),
            ..UpstreamConfig::default()
        };
        assert_eq!(config.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_auth_config_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.mode, AuthMode::ApiKey);
        assert!(config.api_key.is_none());
        assert_eq!(config.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.credentials_env, "GOOGLE_CREDENTIALS_JSON");
    }

    #[test]
    fn test_auth_mode_serde() {
        let api_key: AuthMode = serde_json::from_str("\"api_key\"").unwrap();
        let sa: AuthMode = serde_json::from_str("\"service_account\"").unwrap();
        assert_eq!(api_key, AuthMode::ApiKey);
        assert_eq!(sa, AuthMode::ServiceAccount);
    }

    #[test]
    fn test_persona_config_default_profile() {
        let config = PersonaConfig::default();
        assert_eq!(config.profile, "guide");
        assert!(config.file.is_none());
    }

    #[test]
    fn test_stats_format_serde() {
        assert_eq!(serde_json::to_string(&StatsFormat::Pretty).unwrap(), "\"pretty\"");
        assert_eq!(serde_json::to_string(&StatsFormat::Json).unwrap(), "\"json\"");
        assert_eq!(serde_json::to_string(&StatsFormat::Compact).unwrap(), "\"compact\"");

        let compact: StatsFormat = serde_json::from_str("\"compact\"").unwrap();
        assert_eq!(compact, StatsFormat::Compact);
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::NotFound("test.yaml".to_string());
        assert!(err.to_string().contains("test.yaml"));

        let err = ConfigError::Validation("invalid URL".to_string());
        assert!(err.to_string().contains("invalid URL"));
    }

    #[test]
    fn test_load_or_default_with_missing_path() {
        let result = AppConfig::load_or_default(Some(Path::new("/nonexistent/config.yaml")));
        assert!(result.is_err());
    }
}
