//! Store configuration

use serde::Deserialize;

use crate::error::StoreError;
use crate::projection::{SortDirection, SortKey, SortSpec};

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Page size a new store starts with
    pub default_page_size: usize,
    /// Largest page size `set_page_size` accepts
    pub max_page_size: usize,
    /// How many rejected update events are kept for inspection
    pub rejection_log_capacity: usize,
    pub default_sort_key: SortKey,
    pub default_sort_direction: SortDirection,
    /// Log level: trace, debug, info, warn, error
    pub log_level: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 500,
            rejection_log_capacity: 64,
            default_sort_key: SortKey::CreatedAt,
            default_sort_direction: SortDirection::Desc,
            log_level: "info".to_string(),
        }
    }
}

impl StoreConfig {
    /// Loads configuration from `CLAIMS_STORE_*` environment variables,
    /// falling back to defaults for anything unset
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("CLAIMS_STORE").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn default_sort(&self) -> SortSpec {
        SortSpec::new(self.default_sort_key, self.default_sort_direction)
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if self.max_page_size == 0 {
            return Err(StoreError::InvalidConfig(
                "max_page_size must be at least 1".to_string(),
            ));
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(StoreError::InvalidConfig(format!(
                "default_page_size {} must be within 1..={}",
                self.default_page_size, self.max_page_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(StoreConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_page_size_above_max_rejected() {
        let config = StoreConfig {
            default_page_size: 50,
            max_page_size: 10,
            ..StoreConfig::default()
        };
        assert!(matches!(config.validate(), Err(StoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"default_page_size": 50, "default_sort_key": "total_charged"}"#)
                .unwrap();
        assert_eq!(config.default_page_size, 50);
        assert_eq!(config.max_page_size, 500);
        assert_eq!(config.default_sort(), SortSpec::desc(SortKey::TotalCharged));
    }
}
