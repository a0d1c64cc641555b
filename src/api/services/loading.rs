//! 全局加载状态路由

use actix_web::{HttpResponse, web};
use std::sync::Arc;
use tracing::debug;

use crate::loading::LoadingCoordinator;

use super::helpers::success_response;

pub struct LoadingService;

impl LoadingService {
    pub async fn state(loading: web::Data<Arc<LoadingCoordinator>>) -> HttpResponse {
        success_response(loading.snapshot())
    }

    /// 导航时调用，保证不会残留卡住的加载指示器
    pub async fn reset(loading: web::Data<Arc<LoadingCoordinator>>) -> HttpResponse {
        debug!("Loading state reset requested");
        loading.force_hide();
        success_response(loading.snapshot())
    }
}

/// 加载状态路由配置，挂在 `/api` scope 下
pub fn loading_routes() -> actix_web::Scope {
    web::scope("/loading")
        .route("", web::get().to(LoadingService::state))
        .route("/reset", web::post().to(LoadingService::reset))
}
