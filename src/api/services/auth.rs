//! 登出路由

use actix_web::{HttpRequest, HttpResponse, Responder, web};
use tracing::info;

use super::helpers::CookieBuilder;
use super::types::{ApiResponse, ErrorCode, MessageResponse};

pub struct AuthService;

impl AuthService {
    /// 登出 - 通过 `Max-Age=0` 清除 access_token cookie
    pub async fn logout(_req: HttpRequest, cookies: web::Data<CookieBuilder>) -> impl Responder {
        info!("Logout: clearing {} cookie", cookies.cookie_name());

        HttpResponse::Ok()
            .cookie(cookies.build_expired_access_cookie())
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .json(ApiResponse {
                code: ErrorCode::Success as i32,
                message: "OK".to_string(),
                data: Some(MessageResponse {
                    message: "Logout successful".to_string(),
                }),
            })
    }
}

/// 登出路由配置，挂在 `/api` scope 下
pub fn auth_routes() -> actix_web::Resource {
    web::resource("/logout")
        .route(web::post().to(AuthService::logout))
        .route(web::get().to(AuthService::logout))
}
