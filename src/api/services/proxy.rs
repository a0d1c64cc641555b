//! 认证代理路由
//!
//! `/api/proxy/{tail}` 上的任意方法都会被转发到后端 `{base_url}/{tail}`。
//! 浏览器的 `access_token` cookie 会被转换成 `Authorization: Bearer` 头；
//! 登录成功时由网关写入该 cookie。

use actix_web::http::StatusCode;
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use tracing::{debug, info, trace};

use crate::api::constants;
use crate::errors::GatewayError;
use crate::loading::LoadingCoordinator;
use crate::services::{UpstreamClient, UpstreamRequest, UpstreamResponse};

use super::helpers::CookieBuilder;

pub struct ProxyService;

impl ProxyService {
    pub async fn forward(
        req: HttpRequest,
        tail: web::Path<String>,
        body: web::Bytes,
        upstream: web::Data<Arc<UpstreamClient>>,
        cookies: web::Data<CookieBuilder>,
        loading: web::Data<Arc<LoadingCoordinator>>,
    ) -> Result<HttpResponse, GatewayError> {
        let _loading = loading.track(false);
        let tail = tail.into_inner();

        let bearer_token = req
            .cookie(cookies.cookie_name())
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty());

        trace!(
            "Proxying {} /{} (token: {})",
            req.method(),
            tail,
            if bearer_token.is_some() { "present" } else { "absent" }
        );

        let headers = req
            .headers()
            .iter()
            .map(|(name, value)| (name.as_str().to_string(), value.as_bytes().to_vec()))
            .collect();

        let request = UpstreamRequest {
            method: req.method().as_str().to_string(),
            path: tail.clone(),
            query: Some(req.query_string().to_string()).filter(|q| !q.is_empty()),
            headers,
            body,
            bearer_token,
        };

        let response = upstream.forward(request).await?;

        let mut builder = Self::response_builder(&response)?;

        if is_login_path(&tail) && response.is_success() {
            match response.access_token() {
                Some(token) => {
                    info!("Login succeeded, setting {} cookie", cookies.cookie_name());
                    builder.cookie(cookies.build_access_cookie(token));
                }
                None => debug!("Login response without access_token, cookie not set"),
            }
        }

        Ok(builder.body(response.body))
    }

    /// 复制状态码与可透传的响应头
    fn response_builder(
        response: &UpstreamResponse,
    ) -> Result<actix_web::HttpResponseBuilder, GatewayError> {
        let status = StatusCode::from_u16(response.status).map_err(|_| {
            GatewayError::upstream_connection(format!(
                "upstream returned invalid status {}",
                response.status
            ))
        })?;

        let mut builder = HttpResponse::build(status);
        for (name, value) in &response.headers {
            let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_bytes(value),
            ) else {
                debug!("Skipping unrepresentable upstream header {}", name);
                continue;
            };
            builder.append_header((name, value));
        }
        Ok(builder)
    }
}

/// 去掉首尾斜杠后是否为登录接口
pub fn is_login_path(tail: &str) -> bool {
    tail.trim_matches('/') == constants::LOGIN_PATH
}

/// 代理路由配置，挂在 `/api` scope 下
pub fn proxy_routes() -> actix_web::Resource {
    web::resource("/proxy/{tail:.*}").route(web::route().to(ProxyService::forward))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_login_path() {
        assert!(is_login_path("user/login"));
        assert!(is_login_path("/user/login/"));
        assert!(!is_login_path("user/logout"));
        assert!(!is_login_path("user/login/extra"));
        assert!(!is_login_path(""));
    }

    #[test]
    fn test_response_builder_copies_status_and_headers() {
        let response = UpstreamResponse {
            status: 201,
            headers: vec![
                ("content-type".to_string(), b"application/json".to_vec()),
                ("x-total-count".to_string(), b"12".to_vec()),
            ],
            body: bytes::Bytes::from_static(b"{}"),
        };
        let resp = ProxyService::response_builder(&response).unwrap().finish();
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(
            resp.headers().get("x-total-count").unwrap(),
            HeaderValue::from_static("12")
        );
    }

    #[test]
    fn test_response_builder_rejects_invalid_status() {
        let response = UpstreamResponse {
            status: 42,
            headers: vec![],
            body: bytes::Bytes::new(),
        };
        assert!(ProxyService::response_builder(&response).is_err());
    }
}
