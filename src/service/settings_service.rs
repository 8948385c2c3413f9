use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument};

use crate::repository::settings_repo::SettingsRepository;
use crate::util::error::ServiceError;

pub type SiteSettings = BTreeMap<String, String>;

pub const ROBOTS_SETTING: &str = "robots_txt";

/// Process-wide read-through cache of the `site_settings` rows.
///
/// The first `get` loads from the store; later calls are served from memory
/// until `invalidate` or `refresh`.
pub struct SettingsCache {
    repo: Arc<dyn SettingsRepository>,
    cached: RwLock<Option<Arc<SiteSettings>>>,
}

impl SettingsCache {
    pub fn new(repo: Arc<dyn SettingsRepository>) -> Self {
        SettingsCache { repo, cached: RwLock::new(None) }
    }

    /// Cached settings, loading them on first use. A failed load yields an
    /// empty map and is retried on the next call.
    pub async fn get(&self) -> Arc<SiteSettings> {
        if let Some(settings) = self.cached.read().await.as_ref() {
            return settings.clone();
        }

        let mut slot = self.cached.write().await;
        // Another task may have filled the slot while we waited.
        if let Some(settings) = slot.as_ref() {
            return settings.clone();
        }
        match self.load().await {
            Ok(settings) => {
                *slot = Some(settings.clone());
                settings
            }
            Err(e) => {
                error!("Failed to load site settings: {e}");
                Arc::new(SiteSettings::new())
            }
        }
    }

    pub async fn invalidate(&self) {
        debug!("Invalidating site settings cache");
        *self.cached.write().await = None;
    }

    /// Reloads eagerly. On failure the previous value is dropped.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<Arc<SiteSettings>, ServiceError> {
        let mut slot = self.cached.write().await;
        *slot = None;
        let settings = self.load().await?;
        *slot = Some(settings.clone());
        info!(count = settings.len(), "Site settings refreshed");
        Ok(settings)
    }

    async fn load(&self) -> Result<Arc<SiteSettings>, ServiceError> {
        let rows = self.repo.list_all().await?;
        Ok(Arc::new(rows.into_iter().map(|row| (row.key, row.value)).collect()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RobotsRule {
    Allow { user_agent: String, path: String },
    Disallow { user_agent: String, path: String },
}

/// Reads `key: value` lines. `user-agent` switches the agent the following
/// rules apply to; lines that do not split into exactly two parts are skipped.
pub fn parse_robots_rules(source: &str) -> Vec<RobotsRule> {
    let mut user_agent = "*".to_string();
    let mut rules = Vec::new();
    for line in source.lines() {
        let parts: Vec<&str> = line.split(':').map(str::trim).collect();
        let [key, value] = parts.as_slice() else { continue };
        match key.to_ascii_lowercase().as_str() {
            "user-agent" => user_agent = value.to_string(),
            "allow" => rules.push(RobotsRule::Allow { user_agent: user_agent.clone(), path: value.to_string() }),
            "disallow" => rules.push(RobotsRule::Disallow { user_agent: user_agent.clone(), path: value.to_string() }),
            _ => {}
        }
    }
    rules
}

/// Renders robots.txt from the `robots_txt` setting.
pub fn build_robots_txt(setting: Option<&str>, site_url: &str) -> String {
    let rules = match setting {
        Some(source) if !source.trim().is_empty() => parse_robots_rules(source),
        _ => vec![RobotsRule::Allow { user_agent: "*".to_string(), path: "/".to_string() }],
    };

    let mut out = String::new();
    for rule in &rules {
        let (user_agent, directive, path) = match rule {
            RobotsRule::Allow { user_agent, path } => (user_agent, "Allow", path),
            RobotsRule::Disallow { user_agent, path } => (user_agent, "Disallow", path),
        };
        out.push_str(&format!("User-agent: {}\n{}: {}\n\n", user_agent, directive, path));
    }
    out.push_str(&format!("Sitemap: {}/sitemap.xml\n", site_url.trim_end_matches('/')));
    out
}
