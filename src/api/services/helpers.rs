//! 响应与 Cookie 帮助函数

use actix_web::HttpResponse;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::StatusCode;
use serde::Serialize;
use tracing::warn;

use crate::config::{CookieConfig, SameSitePolicy};
use crate::errors::GatewayError;

use super::types::{ApiResponse, ErrorCode};

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// 从 GatewayError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
pub fn error_from_gateway(err: &GatewayError) -> HttpResponse {
    error_response(err.http_status(), ErrorCode::from(err), err.message())
}

/// access_token Cookie 构建器
#[derive(Clone, Debug)]
pub struct CookieBuilder {
    name: String,
    same_site: SameSite,
    secure: bool,
    domain: Option<String>,
    max_age_minutes: u64,
}

impl CookieBuilder {
    pub fn new(config: &CookieConfig) -> Self {
        let same_site = match config.same_site {
            SameSitePolicy::Strict => SameSite::Strict,
            SameSitePolicy::Lax => SameSite::Lax,
            SameSitePolicy::None => SameSite::None,
        };

        // 浏览器会拒绝没有 Secure 的 SameSite=None cookie
        let secure = if same_site == SameSite::None && !config.secure {
            warn!("cookie.same_site = None requires Secure, forcing secure = true");
            true
        } else {
            config.secure
        };

        Self {
            name: config.name.clone(),
            same_site,
            secure,
            domain: config.domain.clone(),
            max_age_minutes: config.max_age_minutes,
        }
    }

    fn build_cookie_base(
        &self,
        value: String,
        max_age: actix_web::cookie::time::Duration,
    ) -> Cookie<'static> {
        let mut cookie = Cookie::new(self.name.clone(), value);
        cookie.set_path("/");
        cookie.set_http_only(true);
        cookie.set_secure(self.secure);
        cookie.set_same_site(self.same_site);
        cookie.set_max_age(max_age);
        if let Some(ref domain) = self.domain {
            cookie.set_domain(domain.clone());
        }
        cookie
    }

    pub fn build_access_cookie(&self, token: String) -> Cookie<'static> {
        self.build_cookie_base(
            token,
            actix_web::cookie::time::Duration::minutes(self.max_age_minutes as i64),
        )
    }

    pub fn build_expired_access_cookie(&self) -> Cookie<'static> {
        self.build_cookie_base(String::new(), actix_web::cookie::time::Duration::ZERO)
    }

    pub fn cookie_name(&self) -> &str {
        &self.name
    }

    pub fn max_age_minutes(&self) -> u64 {
        self.max_age_minutes
    }
}
