use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::admin_user_conf::AdminUserConfig;
use crate::config::{AppConfig, JwtConfig, MediaConfig, MongoConfig, QuoteConfig};
use crate::handler::settings_handler::SettingsState;
use crate::middlewares::admin_middleware::{AdminAuthState, ADMIN_ROLE};
use crate::model::user::User;
use crate::repository::media_repo::MongoMediaRepository;
use crate::repository::page_repo::MongoPageRepository;
use crate::repository::quote_repo::MongoQuoteRepository;
use crate::repository::settings_repo::MongoSettingsRepository;
use crate::repository::user_repo::MongoUserRepository;
use crate::router::media_router::media_router;
use crate::router::page_router::page_router;
use crate::router::quote_router::quote_router;
use crate::router::settings_router::settings_router;
use crate::router::user_router::user_router;
use crate::service::media_service::MediaServiceImpl;
use crate::service::page_service::PageServiceImpl;
use crate::service::quote_service::QuoteServiceImpl;
use crate::service::settings_service::SettingsCache;
use crate::service::user_service::{UserService, UserServiceImpl};
use crate::util::jwt::JwtTokenUtilsImpl;

/// Everything the routers need, already wired to their repositories.
#[derive(Clone)]
pub struct AppServices {
    pub quote_service: Arc<QuoteServiceImpl>,
    pub page_service: Arc<PageServiceImpl>,
    pub settings: Arc<SettingsState>,
    pub media_service: Arc<MediaServiceImpl>,
    pub user_service: Arc<UserServiceImpl>,
    pub admin_auth_state: Arc<AdminAuthState>,
}

pub fn build_router(services: &AppServices) -> Router {
    let admin = services.admin_auth_state.clone();
    Router::new()
        .merge(quote_router(services.quote_service.clone(), admin.clone()))
        .merge(page_router(services.page_service.clone(), admin.clone()))
        .merge(settings_router(services.settings.clone(), admin.clone()))
        .merge(media_router(services.media_service.clone(), admin))
        .merge(user_router(services.user_service.clone()))
        .route("/health", get(|| async { "OK" }))
}

pub struct App {
    config: AppConfig,
    router: Router,
    pub services: AppServices,
}

impl App {
    pub async fn new() -> Self {
        let config = AppConfig::from_env();

        let jwt_config = JwtConfig::from_env().expect("JWT config error");
        let mongo_config = MongoConfig::from_env().expect("Mongo config error");
        let quote_config = QuoteConfig::from_env().expect("Quote config error");
        let media_config = MediaConfig::from_env();

        let db = mongo_config.connect().await.expect("Failed to connect to MongoDB");
        info!("Connected to MongoDB database '{}'", mongo_config.database);

        let jwt_utils = Arc::new(JwtTokenUtilsImpl::new(jwt_config));
        let services = AppServices {
            quote_service: Arc::new(QuoteServiceImpl::new(
                Arc::new(MongoQuoteRepository::new(&db, &mongo_config)),
                quote_config,
            )),
            page_service: Arc::new(PageServiceImpl::new(Arc::new(MongoPageRepository::new(&db, &mongo_config)))),
            settings: Arc::new(SettingsState {
                cache: Arc::new(SettingsCache::new(Arc::new(MongoSettingsRepository::new(&db, &mongo_config)))),
                site_url: config.site_url.clone(),
            }),
            media_service: Arc::new(MediaServiceImpl::new(
                Arc::new(MongoMediaRepository::new(&db, &mongo_config)),
                media_config,
            )),
            user_service: Arc::new(UserServiceImpl::new(Arc::new(MongoUserRepository::new(&db)), jwt_utils.clone())),
            admin_auth_state: Arc::new(AdminAuthState { jwt_utils }),
        };

        let router = build_router(&services);
        let app = App { config, router, services };
        app.create_first_admin_user().await;
        app
    }

    pub async fn start(self) {
        let addr = SocketAddr::new(self.config.host.parse().expect("Invalid host"), self.config.port);
        info!("🚀 Server running at http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await.expect("Failed to bind address");
        axum::serve(listener, self.router).await.expect("Failed to start server");
    }

    async fn create_first_admin_user(&self) {
        let admin_conf = match AdminUserConfig::from_env() {
            Ok(c) => c,
            Err(e) => {
                warn!("Admin user config not loaded: {e}");
                return;
            }
        };
        bootstrap_admin(self.services.user_service.as_ref(), admin_conf).await;
    }
}

/// Creates the configured admin account unless its email is already taken.
pub async fn bootstrap_admin(user_service: &UserServiceImpl, admin_conf: AdminUserConfig) {
    match user_service.user_repo.find_by_email(&admin_conf.email).await {
        Ok(Some(_)) => {
            info!("Admin user already exists, skipping creation.");
            return;
        }
        Ok(None) => {}
        Err(e) => {
            error!("Failed to check for existing admin user: {e}");
            return;
        }
    }

    let user = User {
        id: None,
        username: admin_conf.username,
        first_name: admin_conf.first_name,
        last_name: admin_conf.last_name,
        email: admin_conf.email,
        password_hash: String::new(),
        role: ADMIN_ROLE.to_string(),
        created_at: None,
        updated_at: None,
    };
    match user_service.register(user, admin_conf.password).await {
        Ok(_) => info!("First admin user created."),
        Err(e) => error!("Failed to create admin user: {e}"),
    }
}
