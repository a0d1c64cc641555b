use actix_web::{HttpResponse, Responder, web};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, trace};

use crate::loading::LoadingCoordinator;
use crate::services::UpstreamClient;

use super::types::{ApiResponse, ErrorCode, HealthResponse};

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// Health Service
///
/// 网关本身无状态，健康检查只报告运行时间、后端地址和加载状态，
/// 不主动探测后端（k8s probes 要求快速响应）。
pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        upstream: web::Data<Arc<UpstreamClient>>,
        loading: web::Data<Arc<LoadingCoordinator>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let now = chrono::Utc::now();
        let uptime_seconds = (now - app_start_time.start_datetime).num_seconds().max(0) as u64;

        let health_data = HealthResponse {
            status: "healthy".to_string(),
            timestamp: now.to_rfc3339(),
            uptime: uptime_seconds,
            upstream: upstream.base_url().to_string(),
            loading: loading.snapshot(),
            response_time_ms: start_time.elapsed().as_millis() as u32,
        };

        debug!(
            "Health check completed in {:?}, uptime: {}s",
            start_time.elapsed(),
            uptime_seconds
        );

        HttpResponse::Ok()
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .json(ApiResponse {
                code: ErrorCode::Success as i32,
                message: "OK".to_string(),
                data: Some(health_data),
            })
    }

    // 简单的就绪检查，只返回 200 状态码
    pub async fn readiness_check() -> impl Responder {
        trace!("Received readiness check request");

        HttpResponse::Ok()
            .append_header(("Content-Type", "text/plain"))
            .body("OK")
    }

    // 活跃性检查
    pub async fn liveness_check() -> impl Responder {
        trace!("Received liveness check request");

        HttpResponse::NoContent().finish()
    }
}

/// Health 路由配置
pub fn health_routes() -> actix_web::Scope {
    web::scope("")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
        .route("/ready", web::get().to(HealthService::readiness_check))
        .route("/ready", web::head().to(HealthService::readiness_check))
        .route("/live", web::get().to(HealthService::liveness_check))
        .route("/live", web::head().to(HealthService::liveness_check))
}
