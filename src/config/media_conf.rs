use std::env;
use tracing::{debug, warn};

/// Media library settings
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Prefix joined with a media entry's name to build its public URL
    pub public_url_prefix: String,
}

impl MediaConfig {
    pub fn from_env() -> Self {
        let public_url_prefix = env::var("MEDIA_PUBLIC_URL_PREFIX").unwrap_or_else(|_| {
            warn!("MEDIA_PUBLIC_URL_PREFIX not set, using default: /media");
            "/media".to_string()
        });
        debug!("Media public URL prefix: {}", public_url_prefix);
        MediaConfig { public_url_prefix }
    }

    /// Public URL of a stored media file.
    pub fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.public_url_prefix.trim_end_matches('/'), name.trim_start_matches('/'))
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        MediaConfig { public_url_prefix: "/media".to_string() }
    }
}
