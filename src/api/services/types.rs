//! API 响应类型

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::GatewayError;
use crate::loading::LoadingSnapshot;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字。按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 后端（upstream）错误
/// - 5000-5099: 配置错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    NotFound = 1004,
    InternalServerError = 1005,
    ServiceUnavailable = 1030,

    // 后端错误 2000-2099
    UpstreamUnavailable = 2000,
    UpstreamTimeout = 2001,

    // 配置错误 5000-5099
    ConfigInvalid = 5000,
}

impl From<&GatewayError> for ErrorCode {
    fn from(err: &GatewayError) -> Self {
        match err {
            GatewayError::Validation(_) | GatewayError::InvalidRequest(_) => ErrorCode::BadRequest,
            GatewayError::NotFound(_) => ErrorCode::NotFound,
            GatewayError::UpstreamConnection(_) => ErrorCode::UpstreamUnavailable,
            GatewayError::UpstreamTimeout(_) => ErrorCode::UpstreamTimeout,
            GatewayError::Config(_) => ErrorCode::ConfigInvalid,
            GatewayError::Serialization(_) | GatewayError::FileOperation(_) => {
                ErrorCode::InternalServerError
            }
        }
    }
}

/// 网关自身产生的 JSON 响应
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MessageResponse {
    pub message: String,
}

/// 健康检查响应
#[derive(Serialize, Clone, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: u64,
    pub upstream: String,
    pub loading: LoadingSnapshot,
    pub response_time_ms: u32,
}
