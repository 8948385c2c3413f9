#![allow(dead_code)]

use async_trait::async_trait;
use axum::{body::{to_bytes, Body}, http::{Request, StatusCode}, Router};
use bson::oid::ObjectId;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::ServiceExt; // for .oneshot()

use plaza_backend::app::app::{build_router, AppServices};
use plaza_backend::config::{JwtConfig, MediaConfig, QuoteConfig};
use plaza_backend::handler::settings_handler::SettingsState;
use plaza_backend::middlewares::admin_middleware::AdminAuthState;
use plaza_backend::model::media::MediaItem;
use plaza_backend::model::page::Page;
use plaza_backend::model::quote::QuoteSubmission;
use plaza_backend::model::settings::SiteSetting;
use plaza_backend::model::user::User;
use plaza_backend::repository::media_repo::MediaRepository;
use plaza_backend::repository::page_repo::PageRepository;
use plaza_backend::repository::quote_repo::QuoteRepository;
use plaza_backend::repository::repository_error::{RepositoryError, RepositoryResult};
use plaza_backend::repository::settings_repo::SettingsRepository;
use plaza_backend::repository::user_repo::UserRepository;
use plaza_backend::service::media_service::MediaServiceImpl;
use plaza_backend::service::page_service::PageServiceImpl;
use plaza_backend::service::quote_service::QuoteServiceImpl;
use plaza_backend::service::settings_service::SettingsCache;
use plaza_backend::service::user_service::UserServiceImpl;
use plaza_backend::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};

pub const SITE_URL: &str = "https://insuranceplaza.ca";

#[derive(Default)]
pub struct MemoryQuotes {
    pub items: Mutex<Vec<QuoteSubmission>>,
    /// Makes every write fail, as an unreachable database would.
    pub fail_writes: bool,
}

#[async_trait]
impl QuoteRepository for MemoryQuotes {
    async fn create(&self, mut submission: QuoteSubmission) -> RepositoryResult<QuoteSubmission> {
        if self.fail_writes {
            return Err(RepositoryError::database("connection refused"));
        }
        submission.id = Some(ObjectId::new());
        submission.created_at = Some(chrono::Local::now().to_rfc3339());
        self.items.lock().unwrap().push(submission.clone());
        Ok(submission)
    }

    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<QuoteSubmission> {
        self.items
            .lock()
            .unwrap()
            .iter()
            .find(|q| q.id == Some(id))
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("Quote not found: {}", id)))
    }

    async fn list(&self, page: u32, limit: u32) -> RepositoryResult<Vec<QuoteSubmission>> {
        let items = self.items.lock().unwrap();
        let skip = ((page.max(1) - 1) * limit) as usize;
        Ok(items.iter().rev().skip(skip).take(limit as usize).cloned().collect())
    }

    async fn count(&self) -> RepositoryResult<u64> {
        Ok(self.items.lock().unwrap().len() as u64)
    }
}

#[derive(Default)]
pub struct MemoryPages {
    pub pages: Mutex<Vec<Page>>,
}

impl MemoryPages {
    pub fn with(pages: Vec<Page>) -> Self {
        MemoryPages { pages: Mutex::new(pages) }
    }
}

#[async_trait]
impl PageRepository for MemoryPages {
    async fn find_by_slug(&self, slug: &str) -> RepositoryResult<Option<Page>> {
        Ok(self.pages.lock().unwrap().iter().find(|p| p.slug == slug).cloned())
    }

    async fn save(&self, mut page: Page) -> RepositoryResult<Page> {
        page.updated_at = Some(chrono::Local::now().to_rfc3339());
        let mut pages = self.pages.lock().unwrap();
        match pages.iter_mut().find(|p| p.slug == page.slug) {
            Some(existing) => *existing = page.clone(),
            None => pages.push(page.clone()),
        }
        Ok(page)
    }

    async fn list(&self) -> RepositoryResult<Vec<Page>> {
        let mut pages = self.pages.lock().unwrap().clone();
        pages.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(pages)
    }
}

#[derive(Default)]
pub struct MemorySettings {
    pub rows: Mutex<Vec<SiteSetting>>,
    pub loads: Mutex<usize>,
}

impl MemorySettings {
    pub fn with(rows: &[(&str, &str)]) -> Self {
        let rows = rows
            .iter()
            .map(|(key, value)| SiteSetting { id: None, key: key.to_string(), value: value.to_string() })
            .collect();
        MemorySettings { rows: Mutex::new(rows), loads: Mutex::new(0) }
    }

    pub fn set(&self, key: &str, value: &str) {
        let mut rows = self.rows.lock().unwrap();
        rows.retain(|row| row.key != key);
        rows.push(SiteSetting { id: None, key: key.to_string(), value: value.to_string() });
    }
}

#[async_trait]
impl SettingsRepository for MemorySettings {
    async fn list_all(&self) -> RepositoryResult<Vec<SiteSetting>> {
        *self.loads.lock().unwrap() += 1;
        Ok(self.rows.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct MemoryMedia {
    pub items: Vec<MediaItem>,
}

#[async_trait]
impl MediaRepository for MemoryMedia {
    async fn list(&self) -> RepositoryResult<Vec<MediaItem>> {
        let mut items = self.items.clone();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }
}

#[derive(Default)]
pub struct MemoryUsers {
    pub users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn insert(&self, mut user: User) -> RepositoryResult<User> {
        user.id = Some(ObjectId::new());
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }
}

/// In-memory backing stores of a test app, kept so tests can inspect them.
pub struct TestApp {
    pub router: Router,
    pub services: AppServices,
    pub quotes: Arc<MemoryQuotes>,
    pub pages: Arc<MemoryPages>,
    pub settings: Arc<MemorySettings>,
    pub users: Arc<MemoryUsers>,
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
}

#[derive(Default)]
pub struct TestAppBuilder {
    pub quotes: MemoryQuotes,
    pub pages: MemoryPages,
    pub settings: MemorySettings,
    pub media: MemoryMedia,
    pub quote_config: QuoteConfig,
}

impl TestAppBuilder {
    pub fn build(self) -> TestApp {
        let quotes = Arc::new(self.quotes);
        let pages = Arc::new(self.pages);
        let settings = Arc::new(self.settings);
        let users = Arc::new(MemoryUsers::default());
        let jwt_utils = Arc::new(JwtTokenUtilsImpl::new(JwtConfig::default()));

        let services = AppServices {
            quote_service: Arc::new(QuoteServiceImpl::new(quotes.clone(), self.quote_config)),
            page_service: Arc::new(PageServiceImpl::new(pages.clone())),
            settings: Arc::new(SettingsState {
                cache: Arc::new(SettingsCache::new(settings.clone())),
                site_url: SITE_URL.to_string(),
            }),
            media_service: Arc::new(MediaServiceImpl::new(Arc::new(self.media), MediaConfig::default())),
            user_service: Arc::new(UserServiceImpl::new(users.clone(), jwt_utils.clone())),
            admin_auth_state: Arc::new(AdminAuthState { jwt_utils: jwt_utils.clone() }),
        };
        TestApp { router: build_router(&services), services, quotes, pages, settings, users, jwt_utils }
    }
}

pub fn test_app() -> TestApp {
    TestAppBuilder::default().build()
}

impl TestApp {
    pub fn token_for(&self, role: &str) -> String {
        self.jwt_utils
            .generate_token_pair("user123", "someone@example.com", role)
            .expect("token pair")
            .access_token
    }

    pub fn admin_token(&self) -> String {
        self.token_for("admin")
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let body_bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap(); // 1 MB limit
        let json = if body_bytes.is_empty() { Value::Null } else { serde_json::from_slice(&body_bytes).unwrap_or(Value::Null) };
        (status, json)
    }

    pub async fn send_text(&self, req: Request<Body>) -> (StatusCode, String) {
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let body_bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        (status, String::from_utf8(body_bytes.to_vec()).unwrap())
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn authorized(mut req: Request<Body>, token: &str) -> Request<Body> {
    req.headers_mut().insert("authorization", format!("Bearer {}", token).parse().unwrap());
    req
}
