use axum::{extract::State, http::header, response::IntoResponse, Json};
use std::sync::Arc;

use crate::service::settings_service::{build_robots_txt, SettingsCache, SiteSettings, ROBOTS_SETTING};
use crate::util::error::HandlerError;

pub struct SettingsState {
    pub cache: Arc<SettingsCache>,
    /// Base URL used for the sitemap line.
    pub site_url: String,
}

pub async fn robots_handler(State(state): State<Arc<SettingsState>>) -> impl IntoResponse {
    let settings = state.cache.get().await;
    let body = build_robots_txt(settings.get(ROBOTS_SETTING).map(String::as_str), &state.site_url);
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body)
}

pub async fn settings_handler(State(state): State<Arc<SettingsState>>) -> Json<SiteSettings> {
    Json(SiteSettings::clone(&*state.cache.get().await))
}

pub async fn refresh_settings_handler(
    State(state): State<Arc<SettingsState>>,
) -> Result<Json<SiteSettings>, HandlerError> {
    let settings = state.cache.refresh().await?;
    Ok(Json(SiteSettings::clone(&settings)))
}
