pub mod auth;
pub mod health;
pub mod helpers;
pub mod loading;
pub mod pages;
pub mod proxy;
pub mod types;

pub use auth::{AuthService, auth_routes};
pub use health::{AppStartTime, HealthService, health_routes};
pub use helpers::CookieBuilder;
pub use loading::{LoadingService, loading_routes};
pub use pages::{PageRoot, PageService};
pub use proxy::{ProxyService, proxy_routes};
pub use types::{ApiResponse, ErrorCode};
