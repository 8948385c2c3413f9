use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;

/// MongoDB configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoConfig {
    /// MongoDB connection URI
    pub uri: String,
    /// Database name
    pub database: String,
    /// Username for authentication (optional)
    pub username: Option<String>,
    /// Password for authentication (optional)
    pub password: Option<String>,
    /// Collection holding quote submissions
    pub quote_collection: String,
    /// Collection holding page content documents
    pub page_collection: String,
    /// Collection holding site settings key/value rows
    pub settings_collection: String,
    /// Collection holding media library entries
    pub media_collection: String,
    /// Connection pool size
    pub pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,
}

fn collection_from_env(var: &str, default: &str) -> String {
    match env::var(var) {
        Ok(name) => {
            debug!("MongoDB collection from {}: {}", var, name);
            name
        }
        Err(_) => {
            debug!("{} not set, using default collection: {}", var, default);
            default.to_string()
        }
    }
}

fn number_from_env<T>(var: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + std::fmt::Display,
{
    let Ok(raw) = env::var(var) else {
        warn!("{} not set, using default: {}", var, default);
        return Ok(default);
    };
    let value = raw.trim().parse::<T>().map_err(|_| {
        error!("Invalid {} value: {}", var, raw);
        ConfigError::InvalidValue(format!("Invalid {} value", var))
    })?;
    debug!("{}: {}", var, value);
    Ok(value)
}

impl MongoConfig {
    /// Load MongoDB configuration from environment variables
    ///
    /// Expected environment variables:
    /// - MONGO_URI: MongoDB connection URI (required)
    /// - MONGO_DATABASE: Database name (required)
    /// - MONGO_QUOTE_COLLECTION: defaults to "quote_submissions"
    /// - MONGO_PAGE_COLLECTION: defaults to "pages"
    /// - MONGO_SETTINGS_COLLECTION: defaults to "site_settings"
    /// - MONGO_MEDIA_COLLECTION: defaults to "media"
    /// - MONGO_POOL_SIZE: Connection pool size (defaults to 10)
    /// - MONGO_CONNECTION_TIMEOUT: Connection timeout in seconds (defaults to 5)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading MongoDB configuration from environment variables");

        let uri = env::var("MONGO_URI")
            .map_err(|_| {
                error!("MONGO_URI environment variable not found");
                ConfigError::EnvVarNotFound("MONGO_URI".to_string())
            })?;

        let database = env::var("MONGO_DATABASE")
            .map_err(|_| {
                error!("MONGO_DATABASE environment variable not found");
                ConfigError::EnvVarNotFound("MONGO_DATABASE".to_string())
            })?;
        debug!("MongoDB database: {}", database);

        let username = env::var("MONGO_USERNAME").ok();
        let password = env::var("MONGO_PASSWORD").ok();
        debug!(username = ?username, password_set = password.is_some(), "MongoDB credentials");

        let quote_collection = collection_from_env("MONGO_QUOTE_COLLECTION", "quote_submissions");
        let page_collection = collection_from_env("MONGO_PAGE_COLLECTION", "pages");
        let settings_collection = collection_from_env("MONGO_SETTINGS_COLLECTION", "site_settings");
        let media_collection = collection_from_env("MONGO_MEDIA_COLLECTION", "media");

        let pool_size: u32 = number_from_env("MONGO_POOL_SIZE", 10)?;
        let connection_timeout_secs: u64 = number_from_env("MONGO_CONNECTION_TIMEOUT", 5)?;

        let config = MongoConfig {
            uri,
            database,
            username,
            password,
            quote_collection,
            page_collection,
            settings_collection,
            media_collection,
            pool_size,
            connection_timeout_secs,
        };

        config.validate()?;
        info!("MongoDB configuration loaded successfully");
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.uri.is_empty() {
            error!("MongoDB URI is empty");
            return Err(ConfigError::ValidationError("MongoDB URI cannot be empty".to_string()));
        }

        if self.database.is_empty() {
            error!("MongoDB database is empty");
            return Err(ConfigError::ValidationError("MongoDB database cannot be empty".to_string()));
        }

        if self.pool_size == 0 {
            error!("MongoDB pool size is 0");
            return Err(ConfigError::ValidationError("MongoDB pool size must be greater than 0".to_string()));
        }

        if self.connection_timeout_secs == 0 {
            error!("MongoDB connection timeout is 0");
            return Err(ConfigError::ValidationError("MongoDB connection timeout must be greater than 0".to_string()));
        }

        let collections = [
            &self.quote_collection,
            &self.page_collection,
            &self.settings_collection,
            &self.media_collection,
        ];
        if collections.iter().any(|c| c.is_empty()) {
            error!("MongoDB collection name is empty");
            return Err(ConfigError::ValidationError("MongoDB collection names cannot be empty".to_string()));
        }

        if let Some(ref user) = self.username {
            if user.is_empty() {
                return Err(ConfigError::ValidationError("MongoDB username cannot be empty if set".to_string()));
            }
        }
        if let Some(ref pass) = self.password {
            if pass.is_empty() {
                return Err(ConfigError::ValidationError("MongoDB password cannot be empty if set".to_string()));
            }
        }
        Ok(())
    }

    /// Open a client and return the configured database handle.
    pub async fn connect(&self) -> Result<mongodb::Database, mongodb::error::Error> {
        use mongodb::{options::{ClientOptions, Credential, ResolverConfig}, Client};

        let mut client_options = ClientOptions::parse_with_resolver_config(&self.uri, ResolverConfig::cloudflare()).await?;
        client_options.app_name = Some("PlazaBackend".to_string());
        client_options.max_pool_size = Some(self.pool_size);
        client_options.connect_timeout = Some(std::time::Duration::from_secs(self.connection_timeout_secs));

        if let (Some(ref username), Some(ref password)) = (&self.username, &self.password) {
            client_options.credential = Some(Credential::builder()
                .username(username.clone())
                .password(password.clone())
                .build());
        }

        let client = Client::with_options(client_options)?;
        Ok(client.database(&self.database))
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: "insurance_plaza".to_string(),
            username: None,
            password: None,
            quote_collection: "quote_submissions".to_string(),
            page_collection: "pages".to_string(),
            settings_collection: "site_settings".to_string(),
            media_collection: "media".to_string(),
            pool_size: 10,
            connection_timeout_secs: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MongoConfig::default();
        assert_eq!(config.database, "insurance_plaza");
        assert_eq!(config.quote_collection, "quote_submissions");
        assert_eq!(config.page_collection, "pages");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_uri() {
        let mut config = MongoConfig::default();
        config.uri = "".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_pool_size() {
        let mut config = MongoConfig::default();
        config.pool_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_collection() {
        let mut config = MongoConfig::default();
        config.page_collection = String::new();
        assert!(config.validate().is_err());
    }
}
