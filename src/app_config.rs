//! Application configuration from file and environment variables
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Environment variables (prefixed with QUORUM_)
//! 2. Config file (config.toml)
//! 3. Default values
//!
//! Secrets like the SMTP password should be kept in environment variables,
//! not in the config file.

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// Global application configuration
pub static APP_CONFIG: Lazy<RwLock<AppConfig>> = Lazy::new(|| {
    RwLock::new(AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config file, using defaults: {}", e);
        AppConfig::default()
    }))
});

/// Site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,
    pub description: String,
    pub base_url: String,
    /// Whether new accounts may be created
    pub registration_enabled: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Quorum".to_string(),
            description: "A community Q&A board built in Rust".to_string(),
            base_url: "http://localhost:8080".to_string(),
            registration_enabled: true,
        }
    }
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Session timeout in minutes (default: 30 days)
    pub session_timeout_minutes: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            session_timeout_minutes: 43200,
        }
    }
}

/// Content limits configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Posts shown per feed page
    pub posts_per_page: u32,
    /// Notifications shown on the notifications page
    pub notifications_per_page: u32,
    /// Maximum comment length
    pub max_comment_length: u32,
    /// Maximum profile bio length
    pub max_bio_length: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            posts_per_page: 25,
            notifications_per_page: 50,
            max_comment_length: 500,
            max_bio_length: 500,
        }
    }
}

/// Email configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    /// SMTP server host
    pub smtp_host: String,
    /// SMTP server port
    pub smtp_port: u16,
    /// Use TLS for SMTP
    pub smtp_tls: bool,
    /// SMTP username (if required)
    pub smtp_username: String,
    /// SMTP password (should be in env var QUORUM_EMAIL_SMTP_PASSWORD)
    #[serde(default)]
    pub smtp_password: String,
    /// From address for emails
    pub from_address: String,
    /// From name for emails
    pub from_name: String,
    /// Log outgoing mail instead of sending it
    pub mock: bool,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "localhost".to_string(),
            smtp_port: 587,
            smtp_tls: true,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_address: "noreply@localhost".to_string(),
            from_name: "Quorum".to_string(),
            mock: false,
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub site: SiteConfig,
    pub security: SecurityConfig,
    pub limits: LimitsConfig,
    pub email: EmailConfig,
}

impl AppConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &str) -> Result<Self, ConfigError> {
        use config::FileFormat;

        let config = Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // Add config file (optional)
            .add_source(File::new(path, FileFormat::Toml).required(false))
            // Override with environment variables (QUORUM_ prefix)
            // e.g., QUORUM_SITE_NAME, QUORUM_EMAIL_MOCK
            .add_source(
                Environment::with_prefix("QUORUM")
                    .separator("_")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

/// Initialize application configuration
///
/// This triggers the lazy loading of the config file and logs the result.
/// Should be called early in application startup.
pub fn init() {
    let config = APP_CONFIG.read().unwrap();
    log::info!("Configuration loaded: site.name = {}", config.site.name);
}

// Convenience functions for accessing global config

/// Get the current application configuration
pub fn get_config() -> AppConfig {
    APP_CONFIG.read().map(|c| c.clone()).unwrap_or_default()
}

/// Get site configuration
pub fn site() -> SiteConfig {
    get_config().site
}

/// Get security configuration
pub fn security() -> SecurityConfig {
    get_config().security
}

/// Get limits configuration
pub fn limits() -> LimitsConfig {
    get_config().limits
}

/// Get email configuration
pub fn email() -> EmailConfig {
    get_config().email
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.site.name, "Quorum");
        assert!(config.site.registration_enabled);
        assert_eq!(config.limits.posts_per_page, 25);
        assert_eq!(config.limits.max_comment_length, 500);
    }

    #[test]
    fn test_mail_mock_disabled_by_default() {
        let config = AppConfig::default();
        assert!(!config.email.mock);
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut temp_file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[site]
name = "Test Board"
base_url = "https://test.example.com"
registration_enabled = false

[limits]
posts_per_page = 50
"#
        )
        .unwrap();

        let config = AppConfig::load_from_path(temp_file.path().to_str().unwrap()).unwrap();

        assert_eq!(config.site.name, "Test Board");
        assert_eq!(config.site.base_url, "https://test.example.com");
        assert!(!config.site.registration_enabled);
        assert_eq!(config.limits.posts_per_page, 50);
        // Defaults should still apply for unspecified values
        assert_eq!(config.limits.notifications_per_page, 50);
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let config = AppConfig::load_from_path("/nonexistent/config.toml").unwrap();
        assert_eq!(config.site.name, "Quorum");
        assert_eq!(config.security.session_timeout_minutes, 43200);
    }
}
