use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

#[derive(Debug, Clone)]
pub enum GatewayError {
    Config(String),
    Validation(String),
    UpstreamConnection(String),
    UpstreamTimeout(String),
    InvalidRequest(String),
    NotFound(String),
    Serialization(String),
    FileOperation(String),
}

impl GatewayError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::Config(_) => "E001",
            GatewayError::Validation(_) => "E002",
            GatewayError::UpstreamConnection(_) => "E003",
            GatewayError::UpstreamTimeout(_) => "E004",
            GatewayError::InvalidRequest(_) => "E005",
            GatewayError::NotFound(_) => "E006",
            GatewayError::Serialization(_) => "E007",
            GatewayError::FileOperation(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            GatewayError::Config(_) => "Configuration Error",
            GatewayError::Validation(_) => "Validation Error",
            GatewayError::UpstreamConnection(_) => "Upstream Connection Error",
            GatewayError::UpstreamTimeout(_) => "Upstream Timeout",
            GatewayError::InvalidRequest(_) => "Invalid Request",
            GatewayError::NotFound(_) => "Resource Not Found",
            GatewayError::Serialization(_) => "Serialization Error",
            GatewayError::FileOperation(_) => "File Operation Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            GatewayError::Config(msg)
            | GatewayError::Validation(msg)
            | GatewayError::UpstreamConnection(msg)
            | GatewayError::UpstreamTimeout(msg)
            | GatewayError::InvalidRequest(msg)
            | GatewayError::NotFound(msg)
            | GatewayError::Serialization(msg)
            | GatewayError::FileOperation(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) | GatewayError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::UpstreamConnection(_) => StatusCode::BAD_GATEWAY,
            GatewayError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::Config(_)
            | GatewayError::Serialization(_)
            | GatewayError::FileOperation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for GatewayError {}

// 便捷的构造函数
impl GatewayError {
    pub fn config<T: Into<String>>(msg: T) -> Self {
        GatewayError::Config(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        GatewayError::Validation(msg.into())
    }

    pub fn upstream_connection<T: Into<String>>(msg: T) -> Self {
        GatewayError::UpstreamConnection(msg.into())
    }

    pub fn upstream_timeout<T: Into<String>>(msg: T) -> Self {
        GatewayError::UpstreamTimeout(msg.into())
    }

    pub fn invalid_request<T: Into<String>>(msg: T) -> Self {
        GatewayError::InvalidRequest(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        GatewayError::NotFound(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        GatewayError::Serialization(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        GatewayError::FileOperation(msg.into())
    }
}

impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        GatewayError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for GatewayError {
    fn from(err: url::ParseError) -> Self {
        GatewayError::Config(format!("invalid URL: {}", err))
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::UpstreamTimeout(err.to_string())
        } else if err.is_builder() {
            GatewayError::InvalidRequest(err.to_string())
        } else {
            GatewayError::UpstreamConnection(err.to_string())
        }
    }
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        self.http_status()
    }

    fn error_response(&self) -> HttpResponse {
        crate::api::services::helpers::error_from_gateway(self)
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
