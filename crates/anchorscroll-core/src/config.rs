use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub enhancer: EnhancerConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhancerConfig {
    /// Attribute added to same-page anchors
    #[serde(default = "default_marker_attribute")]
    pub marker_attribute: String,
    /// Value written into the marker attribute
    #[serde(default = "default_marker_value")]
    pub marker_value: String,
    /// Selector for candidate anchors (attribute selector subset)
    #[serde(default = "default_candidate_selector")]
    pub candidate_selector: String,
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        Self {
            marker_attribute: default_marker_attribute(),
            marker_value: default_marker_value(),
            candidate_selector: default_candidate_selector(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Append the client-side initializer script to enhanced pages
    #[serde(default = "default_true")]
    pub inject_bootstrap: bool,
    /// JavaScript statement that starts the scroll engine
    #[serde(default = "default_init_call")]
    pub init_call: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            inject_bootstrap: default_true(),
            init_call: default_init_call(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Largest page body accepted, in bytes
    #[serde(default = "default_max_page_bytes")]
    pub max_page_bytes: usize,
    /// HTTP proxy URL (e.g., "http://127.0.0.1:7890" or "socks5://127.0.0.1:1080")
    #[serde(default)]
    pub proxy_url: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_timeout(),
            max_page_bytes: default_max_page_bytes(),
            proxy_url: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_marker_attribute() -> String {
    "data-scroll".to_string()
}

fn default_marker_value() -> String {
    "true".to_string()
}

fn default_candidate_selector() -> String {
    r##"a[href*="#"]"##.to_string()
}

fn default_init_call() -> String {
    "smoothScroll.init();".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_page_bytes() -> usize {
    5 * 1024 * 1024
}

impl AppConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, falling back to defaults if it is missing
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to the given path
    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml()?)?;

        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/anchorscroll/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("anchorscroll")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.enhancer.marker_attribute, "data-scroll");
        assert_eq!(config.enhancer.marker_value, "true");
        assert_eq!(config.enhancer.candidate_selector, r##"a[href*="#"]"##);
        assert!(config.engine.inject_bootstrap);
        assert_eq!(config.engine.init_call, "smoothScroll.init();");
        assert_eq!(config.fetch.request_timeout_secs, 30);
        assert!(config.fetch.proxy_url.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [enhancer]
            marker_attribute = "data-smooth"

            [engine]
            inject_bootstrap = false
            "#,
        )
        .unwrap();

        assert_eq!(config.enhancer.marker_attribute, "data-smooth");
        assert_eq!(config.enhancer.marker_value, "true");
        assert!(!config.engine.inject_bootstrap);
        assert_eq!(config.engine.init_call, "smoothScroll.init();");
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml("[fetch]\nrequest_timeout_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_toml_round_trip_preserves_selector() {
        let config = AppConfig::default();
        let text = config.to_toml().unwrap();
        let parsed = AppConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.enhancer.candidate_selector, config.enhancer.candidate_selector);
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let path = std::env::temp_dir().join("anchorscroll-missing-config-test.toml");
        let _ = std::fs::remove_file(&path);
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.enhancer.marker_attribute, "data-scroll");
    }
}
