//! 后端 API 客户端
//!
//! 代理路由通过它把浏览器请求转发到外部后端。单个 `reqwest::Client`
//! 在所有 worker 之间共享，复用连接池。

use bytes::Bytes;
use std::time::Duration;
use tracing::{debug, trace, warn};
use url::Url;

use crate::config::UpstreamConfig;
use crate::errors::{GatewayError, Result};

/// 逐跳头部，不能跨代理转发
const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// 请求头是否应转发给后端
///
/// `host` 和 `content-length` 由 reqwest 重新计算；浏览器的 `cookie`
/// 只属于网关，不暴露给后端。
pub fn is_forwardable_request_header(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    !HOP_BY_HOP_HEADERS.contains(&name.as_str())
        && name != "host"
        && name != "content-length"
        && name != "cookie"
}

/// 响应头是否应回传给浏览器
///
/// Cookie 由网关统一管理，后端的 `set-cookie` 不透传。
pub fn is_forwardable_response_header(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    !HOP_BY_HOP_HEADERS.contains(&name.as_str())
        && name != "content-length"
        && name != "set-cookie"
}

/// `..` 及其百分号编码形式（`.%2e`、`%2e.`、`%2e%2e`，大小写不敏感）
fn is_parent_segment(segment: &str) -> bool {
    matches!(
        segment.to_ascii_lowercase().as_str(),
        ".." | ".%2e" | "%2e." | "%2e%2e"
    )
}

/// 转发给后端的请求
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub method: String,
    /// 去掉代理前缀后的路径，例如 `user/login`
    pub path: String,
    pub query: Option<String>,
    pub headers: Vec<(String, Vec<u8>)>,
    pub body: Bytes,
    /// 从 cookie 中取出的 access token，存在时覆盖 Authorization 头
    pub bearer_token: Option<String>,
}

/// 后端的响应
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub headers: Vec<(String, Vec<u8>)>,
    pub body: Bytes,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 从 JSON 响应体中取出字符串字段 `access_token`
    pub fn access_token(&self) -> Option<String> {
        let value: serde_json::Value = serde_json::from_slice(&self.body).ok()?;
        value
            .get("access_token")
            .and_then(|t| t.as_str())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string())
    }
}

pub struct UpstreamClient {
    client: reqwest::Client,
    base_url: Url,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.scheme() != "http" && base_url.scheme() != "https" {
            return Err(GatewayError::config(format!(
                "upstream base_url must be http or https, got '{}'",
                base_url.scheme()
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| GatewayError::config(format!("failed to build HTTP client: {}", e)))?;

        debug!(
            "Upstream client created: {} (timeout {}ms)",
            base_url, config.timeout_ms
        );

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// 拼接后端地址：`base_url` 的路径 + `/` + `path`
    ///
    /// 含 `..`（包括 `%2e%2e` 等编码形式）的路径段会被拒绝；拼接后的路径
    /// 也必须仍位于 base_url 的路径前缀之下。
    pub fn build_url(&self, path: &str, query: Option<&str>) -> Result<Url> {
        let path = path.trim_start_matches('/');
        if path.split('/').any(is_parent_segment) {
            return Err(GatewayError::invalid_request(format!(
                "path '{}' contains a parent segment",
                path
            )));
        }

        let mut url = self.base_url.clone();
        let base_path = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{}/{}", base_path, path));

        // set_path 会按 WHATWG 规则归一化点段
        if !url.path().starts_with(&format!("{}/", base_path)) {
            return Err(GatewayError::invalid_request(format!(
                "path '{}' escapes the upstream base path",
                path
            )));
        }

        url.set_query(query.filter(|q| !q.is_empty()));
        url.set_fragment(None);
        Ok(url)
    }

    /// 转发请求，不做重试
    pub async fn forward(&self, request: UpstreamRequest) -> Result<UpstreamResponse> {
        let url = self.build_url(&request.path, request.query.as_deref())?;
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|e| GatewayError::invalid_request(format!("invalid method: {}", e)))?;

        trace!("Forwarding {} {}", method, url);

        let mut builder = self.client.request(method.clone(), url.clone());
        for (name, value) in &request.headers {
            if !is_forwardable_request_header(name) {
                continue;
            }
            if request.bearer_token.is_some() && name.eq_ignore_ascii_case("authorization") {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_slice());
        }
        if let Some(ref token) = request.bearer_token {
            builder = builder.bearer_auth(token);
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!("Upstream request {} {} failed: {}", method, url, e);
            GatewayError::from(e)
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter(|(name, _)| is_forwardable_response_header(name.as_str()))
            .map(|(name, value)| (name.as_str().to_string(), value.as_bytes().to_vec()))
            .collect();
        let body = response.bytes().await.map_err(|e| {
            warn!("Reading upstream response body from {} failed: {}", url, e);
            GatewayError::from(e)
        })?;

        debug!("Upstream {} {} -> {}", method, url, status);

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}
