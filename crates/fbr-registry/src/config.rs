//! Registry configuration

use crate::error::{RegistryError, Result};
use serde::{Deserialize, Serialize};

/// Registry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Minimum players on a national team
    pub min_national_team_players: usize,
    /// Records per block in paged retrieval
    pub page_size: usize,
    /// Log when a role record is written for a person lacking the role
    pub warn_on_role_mismatch: bool,
    /// Default tracing filter, overridden by `RUST_LOG`
    pub log_filter: String,
    /// Emit logs as JSON
    pub log_json: bool,
}

impl RegistryConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; absent keys keep their defaults
    ///
    /// # Errors
    /// `RegistryError::Config` on malformed TOML or invalid values
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| RegistryError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// `RegistryError::Config` naming the offending key
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(RegistryError::Config("page_size must be positive".into()));
        }
        Ok(())
    }

    /// With minimum national-team size
    #[inline]
    #[must_use]
    pub fn with_min_national_team_players(mut self, min: usize) -> Self {
        self.min_national_team_players = min;
        self
    }

    /// With page size
    #[inline]
    #[must_use]
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    /// With role-mismatch warnings on or off
    #[inline]
    #[must_use]
    pub fn with_role_mismatch_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_role_mismatch = enabled;
        self
    }

    /// With log filter
    #[inline]
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// With JSON log output on or off
    #[inline]
    #[must_use]
    pub fn with_json_logs(mut self, enabled: bool) -> Self {
        self.log_json = enabled;
        self
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            min_national_team_players: 11,
            page_size: 11,
            warn_on_role_mismatch: true,
            log_filter: "info".into(),
            log_json: false,
        }
    }
}
