//! Tracing subscriber setup

use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber
///
/// The filter comes from `RUST_LOG` when set, else from the configuration.
/// A second call leaves the first subscriber in place.
///
/// # Errors
/// `RegistryError::Config` when the configured filter does not parse
pub fn init(config: &RegistryConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_filter)
            .map_err(|e| RegistryError::Config(format!("log_filter: {e}")))?,
    };

    let installed = if config.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        let config = RegistryConfig::new().with_log_filter("warn");
        assert!(init(&config).is_ok());
        assert!(init(&config).is_ok());
    }
}
