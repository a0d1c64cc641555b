//! 静态配置验证模块
//!
//! 启动时和 `config check` 命令使用。错误会阻止启动，警告只记录日志。

use strum::EnumMessage;
use url::Url;

use super::{SameSitePolicy, StaticConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueLevel {
    Warning,
    Error,
}

/// 单条配置问题
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub level: IssueLevel,
    pub key: &'static str,
    pub message: String,
}

impl ConfigIssue {
    fn error(key: &'static str, message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Error,
            key,
            message: message.into(),
        }
    }

    fn warning(key: &'static str, message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Warning,
            key,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == IssueLevel::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.level {
            IssueLevel::Warning => "warning",
            IssueLevel::Error => "error",
        };
        write!(f, "[{}] {}: {}", level, self.key, self.message)
    }
}

/// 验证整份配置，返回发现的全部问题
pub fn validate_config(config: &StaticConfig) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();

    if config.server.port == 0 {
        issues.push(ConfigIssue::error("server.port", "port must be non-zero"));
    }

    match Url::parse(&config.upstream.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
            if url.query().is_some() {
                issues.push(ConfigIssue::warning(
                    "upstream.base_url",
                    "query string on base_url is ignored when forwarding",
                ));
            }
        }
        Ok(url) => issues.push(ConfigIssue::error(
            "upstream.base_url",
            format!("unsupported scheme '{}', expected http or https", url.scheme()),
        )),
        Err(e) => issues.push(ConfigIssue::error(
            "upstream.base_url",
            format!("'{}' is not a valid URL: {}", config.upstream.base_url, e),
        )),
    }

    if config.upstream.timeout_ms == 0 {
        issues.push(ConfigIssue::error(
            "upstream.timeout_ms",
            "timeout must be greater than zero",
        ));
    }

    if config.cookie.name.is_empty() {
        issues.push(ConfigIssue::error("cookie.name", "cookie name is empty"));
    }

    if config.cookie.same_site == SameSitePolicy::None && !config.cookie.secure {
        issues.push(ConfigIssue::warning(
            "cookie.secure",
            format!(
                "{}; it will be forced on",
                config.cookie.same_site.get_message().unwrap_or("SameSite=None")
            ),
        ));
    }

    if !config.guard.auth_path.starts_with('/') {
        issues.push(ConfigIssue::error(
            "guard.auth_path",
            "path must start with '/'",
        ));
    }

    if !config.guard.home_path.starts_with('/') {
        issues.push(ConfigIssue::error(
            "guard.home_path",
            "path must start with '/'",
        ));
    }

    if config.guard.enabled && config.guard.auth_path == config.guard.home_path {
        issues.push(ConfigIssue::error(
            "guard.home_path",
            "home_path and auth_path must differ, otherwise the guard redirects in a loop",
        ));
    }

    if config.cors.enabled
        && config.cors.allow_credentials
        && config.cors.allowed_origins.iter().any(|o| o == "*")
    {
        issues.push(ConfigIssue::warning(
            "cors.allow_credentials",
            "wildcard origin combined with credentials is unsafe; credentials will be disabled",
        ));
    }

    if let Some(ref dir) = config.frontend.dist_dir
        && !std::path::Path::new(dir).is_dir()
    {
        issues.push(ConfigIssue::warning(
            "frontend.dist_dir",
            format!("'{}' is not a directory; pages will return 404", dir),
        ));
    }

    issues
}
