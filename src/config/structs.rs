use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumMessage, IntoEnumIterator};

use crate::errors::GatewayError;

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Cookie SameSite 策略
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, EnumIter, AsRefStr, EnumMessage,
)]
#[serde(rename_all = "PascalCase")]
#[strum(serialize_all = "PascalCase")]
pub enum SameSitePolicy {
    #[strum(message = "Most secure, only same-site requests carry cookies")]
    Strict,
    #[strum(message = "Allows top-level navigation to carry cookies")]
    Lax,
    #[default]
    #[strum(message = "Default, cookie is sent cross-site; requires Secure attribute")]
    None,
}

impl std::fmt::Display for SameSitePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strict => write!(f, "Strict"),
            Self::Lax => write!(f, "Lax"),
            Self::None => write!(f, "None"),
        }
    }
}

impl std::str::FromStr for SameSitePolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lax" => Ok(Self::Lax),
            "none" => Ok(Self::None),
            _ => Err(format!(
                "Invalid SameSite policy: '{}'. Valid: {}",
                s,
                Self::iter()
                    .map(|p| p.as_ref().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

/// 静态配置（从 TOML 加载，启动时使用）
///
/// - server: 监听地址、端口、worker 数量
/// - upstream: 后端 API 地址与超时
/// - cookie: access_token cookie 属性
/// - guard: 页面路由守卫
/// - loading: 全局加载指示器的防抖时长
/// - frontend: 前端构建产物目录
/// - cors: 跨域配置
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub cookie: CookieConfig,
    #[serde(default)]
    pub guard: GuardConfig,
    #[serde(default)]
    pub loading: LoadingConfig,
    #[serde(default)]
    pub frontend: FrontendConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：WG，分隔符：__
    /// 示例：WG__UPSTREAM__BASE_URL=http://backend:8000
    pub fn try_load(path: &str) -> Result<Self, GatewayError> {
        use config::{Config, Environment, File};

        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("WG")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| GatewayError::config(format!("failed to build config: {}", e)))?;

        settings
            .try_deserialize::<StaticConfig>()
            .map_err(|e| GatewayError::config(format!("failed to deserialize config: {}", e)))
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), GatewayError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GatewayError::serialization(e.to_string()))?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

/// 后端 API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// 后端 API 基础地址，代理路径会拼接在其后
    #[serde(default = "default_upstream_base_url")]
    pub base_url: String,
    #[serde(default = "default_upstream_timeout_ms")]
    pub timeout_ms: u64,
}

/// access_token Cookie 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieConfig {
    #[serde(default = "default_cookie_name")]
    pub name: String,
    #[serde(default = "default_cookie_secure")]
    pub secure: bool,
    #[serde(default)]
    pub same_site: SameSitePolicy,
    #[serde(default = "default_cookie_max_age_minutes")]
    pub max_age_minutes: u64,
    #[serde(default)]
    pub domain: Option<String>,
}

/// 页面路由守卫配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardConfig {
    #[serde(default = "default_guard_enabled")]
    pub enabled: bool,
    /// 未登录用户被重定向到的登录页
    #[serde(default = "default_auth_path")]
    pub auth_path: String,
    /// 已登录用户访问登录页时被重定向到的首页
    #[serde(default = "default_home_path")]
    pub home_path: String,
    /// 这些前缀下的请求不经过守卫
    #[serde(default = "default_bypass_prefixes")]
    pub bypass_prefixes: Vec<String>,
}

/// 全局加载指示器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadingConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

/// 前端静态资源配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FrontendConfig {
    #[serde(default)]
    pub dist_dir: Option<String>,
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_cors_allow_credentials")]
    pub allow_credentials: bool,
    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    3000
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_upstream_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_upstream_timeout_ms() -> u64 {
    15_000
}

fn default_cookie_name() -> String {
    crate::api::constants::ACCESS_COOKIE_NAME.to_string()
}

fn default_cookie_secure() -> bool {
    true
}

fn default_cookie_max_age_minutes() -> u64 {
    30
}

fn default_guard_enabled() -> bool {
    true
}

fn default_auth_path() -> String {
    "/auth".to_string()
}

fn default_home_path() -> String {
    "/".to_string()
}

fn default_bypass_prefixes() -> Vec<String> {
    ["/api", "/health", "/assets", "/favicon.ico"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_debounce_ms() -> u64 {
    120
}

fn default_cors_allow_credentials() -> bool {
    true
}

fn default_cors_max_age() -> u64 {
    3600
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_upstream_base_url(),
            timeout_ms: default_upstream_timeout_ms(),
        }
    }
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: default_cookie_name(),
            secure: default_cookie_secure(),
            same_site: SameSitePolicy::default(),
            max_age_minutes: default_cookie_max_age_minutes(),
            domain: None,
        }
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            enabled: default_guard_enabled(),
            auth_path: default_auth_path(),
            home_path: default_home_path(),
            bypass_prefixes: default_bypass_prefixes(),
        }
    }
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            allowed_origins: Vec::new(),
            allow_credentials: default_cors_allow_credentials(),
            max_age: default_cors_max_age(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}
