use std::env;
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;
use crate::quote::validation::ValidationMode;

/// Quote submission settings
#[derive(Debug, Clone)]
pub struct QuoteConfig {
    /// Which services get their detail rules enforced on submit
    pub validation_mode: ValidationMode,
    /// Where the client is sent after a successful submission
    pub confirmation_path: String,
}

impl QuoteConfig {
    /// Load quote configuration from environment variables
    ///
    /// - QUOTE_VALIDATION_MODE: "strict" (all services) or "legacy" (defaults to strict)
    /// - QUOTE_CONFIRMATION_PATH: defaults to "/quote-submitted"
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading quote configuration from environment variables");

        let validation_mode = match env::var("QUOTE_VALIDATION_MODE") {
            Ok(raw) => raw.parse::<ValidationMode>().map_err(|e| {
                error!("Invalid QUOTE_VALIDATION_MODE value: {}", raw);
                ConfigError::InvalidValue(e)
            })?,
            Err(_) => {
                warn!("QUOTE_VALIDATION_MODE not set, using default: strict");
                ValidationMode::Strict
            }
        };
        debug!("Quote validation mode: {:?}", validation_mode);

        let confirmation_path = env::var("QUOTE_CONFIRMATION_PATH")
            .unwrap_or_else(|_| "/quote-submitted".to_string());
        if !confirmation_path.starts_with('/') {
            error!("QUOTE_CONFIRMATION_PATH must be an absolute path");
            return Err(ConfigError::ValidationError("QUOTE_CONFIRMATION_PATH must start with '/'".to_string()));
        }

        Ok(QuoteConfig { validation_mode, confirmation_path })
    }
}

impl Default for QuoteConfig {
    fn default() -> Self {
        QuoteConfig {
            validation_mode: ValidationMode::Strict,
            confirmation_path: "/quote-submitted".to_string(),
        }
    }
}
