use serde::Serialize;

use crate::config::MediaConfig;
use crate::model::media::MediaItem;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaView {
    pub name: String,
    pub url: String,
    pub created_at: Option<String>,
}

impl MediaView {
    pub fn new(item: MediaItem, config: &MediaConfig) -> Self {
        MediaView { url: config.url_for(&item.name), name: item.name, created_at: item.created_at }
    }
}
