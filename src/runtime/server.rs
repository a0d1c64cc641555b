//! Server mode
//!
//! Builds the shared state, wires the routes and runs the HTTP server.

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::api::constants;
use crate::api::middleware::{AuthGuard, GuardSettings, RequestIdMiddleware};
use crate::api::services::{
    AppStartTime, CookieBuilder, PageRoot, PageService, auth_routes, health_routes,
    loading_routes, proxy_routes,
};
use crate::config::{CorsConfig, IssueLevel, StaticConfig, validate_config};
use crate::loading::LoadingCoordinator;
use crate::runtime::shutdown;
use crate::services::UpstreamClient;

/// 所有 worker 共享的状态
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<UpstreamClient>,
    pub cookies: CookieBuilder,
    pub loading: Arc<LoadingCoordinator>,
    pub pages: PageRoot,
    pub guard: GuardSettings,
    pub start_time: AppStartTime,
}

impl AppState {
    pub fn from_config(config: &StaticConfig) -> crate::errors::Result<Self> {
        Ok(Self {
            upstream: Arc::new(UpstreamClient::new(&config.upstream)?),
            cookies: CookieBuilder::new(&config.cookie),
            loading: LoadingCoordinator::from_config(&config.loading),
            pages: PageRoot::new(&config.frontend),
            guard: GuardSettings::new(&config.guard, &config.cookie.name),
            start_time: AppStartTime {
                start_datetime: chrono::Utc::now(),
            },
        })
    }
}

/// 注册共享状态与全部路由
///
/// 页面守卫需要在 App 层 `wrap(AuthGuard::new(state.guard.clone()))`，
/// 这里只负责路由本身。
pub fn configure_app(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.app_data(web::Data::new(state.upstream.clone()))
        .app_data(web::Data::new(state.cookies.clone()))
        .app_data(web::Data::new(state.loading.clone()))
        .app_data(web::Data::new(state.pages.clone()))
        .app_data(web::Data::new(state.start_time.clone()))
        .app_data(web::PayloadConfig::new(16 * 1024 * 1024))
        .service(web::scope(constants::HEALTH_PREFIX).service(health_routes()))
        .service(
            web::scope(constants::API_PREFIX)
                .service(proxy_routes())
                .service(auth_routes())
                .service(loading_routes()),
        )
        .service(
            web::resource("/{path:.*}")
                .route(web::get().to(PageService::serve))
                .route(web::head().to(PageService::serve)),
        );
}

/// Validate CORS configuration at startup (runs once)
fn validate_cors_config(cors_config: &CorsConfig) {
    if !cors_config.enabled {
        return;
    }

    if cors_config.allowed_origins.is_empty() {
        warn!(
            "CORS enabled but allowed_origins is empty. \
            No cross-origin requests will be allowed."
        );
    }

    let is_any_origin = cors_config.allowed_origins.iter().any(|o| o == "*");
    if is_any_origin && cors_config.allow_credentials {
        error!(
            "SECURITY WARNING: allow_any_origin + allow_credentials is a dangerous combination! \
            Disabling credentials for safety."
        );
    }
}

/// Build CORS middleware from configuration
pub fn build_cors_middleware(cors_config: &CorsConfig) -> Cors {
    // When CORS is disabled, use browser's default same-origin policy
    if !cors_config.enabled {
        return Cors::default();
    }

    let is_any_origin = cors_config.allowed_origins.iter().any(|o| o == "*");

    let mut cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(cors_config.max_age as usize);

    if is_any_origin {
        cors = cors.allow_any_origin();
    } else {
        for origin in &cors_config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    // 通配 origin + credentials 会让任意站点带 cookie 访问，强制关闭
    if cors_config.allow_credentials && !is_any_origin {
        cors = cors.supports_credentials();
    }

    cors
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: Arc<StaticConfig>) -> Result<()> {
    let issues = validate_config(&config);
    for issue in &issues {
        match issue.level {
            IssueLevel::Warning => warn!("Config: {}", issue),
            IssueLevel::Error => error!("Config: {}", issue),
        }
    }
    if issues.iter().any(|i| i.is_error()) {
        anyhow::bail!("configuration is invalid, refusing to start");
    }

    let state = AppState::from_config(&config).context("Failed to prepare server state")?;
    let loading_for_shutdown = state.loading.clone();

    let cors_config = config.cors.clone();
    validate_cors_config(&cors_config);

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    info!("Using {} worker(s)", cpu_count);
    info!(
        "Proxying {}/* to {}",
        constants::PROXY_PREFIX,
        state.upstream.base_url()
    );
    match state.pages.0 {
        Some(ref dir) => info!("Serving pages from {}", dir.display()),
        None => warn!("frontend.dist_dir not set, pages will return 404"),
    }

    let server = HttpServer::new(move || {
        let cors = build_cors_middleware(&cors_config);
        let state = state.clone();

        App::new()
            .wrap(AuthGuard::new(state.guard.clone()))
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .wrap(cors)
            .wrap(RequestIdMiddleware)
            .configure(|cfg| configure_app(cfg, &state))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = shutdown::listen_for_shutdown(loading_for_shutdown) => {
            warn!("Graceful shutdown complete");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_app_state_from_default_config() {
        let state = AppState::from_config(&StaticConfig::default()).unwrap();
        assert_eq!(state.loading.delay(), Duration::from_millis(120));
        assert_eq!(state.cookies.cookie_name(), "access_token");
        assert!(state.pages.0.is_none());
    }

    #[test]
    fn test_app_state_rejects_bad_upstream() {
        let mut config = StaticConfig::default();
        config.upstream.base_url = "::nope::".to_string();
        assert!(AppState::from_config(&config).is_err());
    }
}
