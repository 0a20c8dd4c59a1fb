//! Configuration module for the CyberAware core
//! Defaults match the mobile app; `minimal` trims timeouts for slow rural links

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{AwarenessError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AwarenessConfig {
    /// How long a profile lookup may take before falling back to `student`
    pub profile_lookup_timeout_ms: u64,

    /// Locale used to render tips, e.g. "en" or "kn"
    pub locale: String,

    /// Locale consulted when the active one has no text for a key
    pub fallback_locale: String,

    /// Optional JSON overrides for the built-in content
    pub tips_catalog_path: Option<PathBuf>,
    pub quiz_catalog_path: Option<PathBuf>,

    /// Extra translation tables, keyed by locale
    pub translation_paths: Vec<(String, PathBuf)>,

    /// Tracing filter used when RUST_LOG is unset
    pub log_filter: String,
}

impl Default for AwarenessConfig {
    fn default() -> Self {
        Self {
            profile_lookup_timeout_ms: 5_000,
            locale: "en".to_string(),
            fallback_locale: "en".to_string(),
            tips_catalog_path: None,
            quiz_catalog_path: None,
            translation_paths: Vec::new(),
            log_filter: "info".to_string(),
        }
    }
}

impl AwarenessConfig {
    /// Create configuration for very low-connectivity environments
    pub fn minimal() -> Self {
        Self {
            profile_lookup_timeout_ms: 1_500,
            log_filter: "warn".to_string(),
            ..Self::default()
        }
    }

    /// Read configuration from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn profile_lookup_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.profile_lookup_timeout_ms)
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        if self.profile_lookup_timeout_ms == 0 {
            return Err(config_error("Profile lookup timeout must be greater than 0"));
        }

        if self.locale.trim().is_empty() {
            return Err(config_error("Locale must not be empty"));
        }

        if self.fallback_locale.trim().is_empty() {
            return Err(config_error("Fallback locale must not be empty"));
        }

        if let Some((locale, _)) = self
            .translation_paths
            .iter()
            .find(|(locale, _)| locale.trim().is_empty())
        {
            return Err(config_error(format!(
                "Translation table has an empty locale tag: {:?}",
                locale
            )));
        }

        Ok(())
    }
}

fn config_error(message: impl Into<String>) -> AwarenessError {
    AwarenessError::ConfigError {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AwarenessConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.profile_lookup_timeout().as_secs(), 5);
    }

    #[test]
    fn test_minimal_config_is_valid() {
        let config = AwarenessConfig::minimal();
        assert!(config.validate().is_ok());
        assert!(config.profile_lookup_timeout_ms < AwarenessConfig::default().profile_lookup_timeout_ms);
    }

    #[test]
    fn test_invalid_settings() {
        let mut config = AwarenessConfig::default();
        config.profile_lookup_timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = AwarenessConfig::default();
        config.locale = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(AwarenessError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AwarenessConfig = serde_json::from_str(r#"{"locale": "kn"}"#).unwrap();
        assert_eq!(config.locale, "kn");
        assert_eq!(config.fallback_locale, "en");
        assert_eq!(config.profile_lookup_timeout_ms, 5_000);
    }
}
