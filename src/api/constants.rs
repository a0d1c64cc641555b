//! API 模块常量定义
//!
//! 路由前缀、Cookie 名称等硬编码常量。

/// 网关自身 API 的 scope
pub const API_PREFIX: &str = "/api";

/// 代理路由前缀，其后的路径原样拼接到后端 base_url
pub const PROXY_PREFIX: &str = "/api/proxy";

/// 后端登录接口（去掉代理前缀后的路径）
pub const LOGIN_PATH: &str = "user/login";

/// 健康检查路由前缀
pub const HEALTH_PREFIX: &str = "/health";

/// Access Token Cookie 默认名称
pub const ACCESS_COOKIE_NAME: &str = "access_token";

/// 请求 ID 响应头
pub const REQUEST_ID_HEADER: &str = "x-request-id";
