use actix_web::{HttpRequest, HttpResponse, web};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::config::FrontendConfig;
use crate::errors::GatewayError;

/// 前端构建产物所在目录；未配置时所有页面返回 404
#[derive(Clone, Debug, Default)]
pub struct PageRoot(pub Option<PathBuf>);

impl PageRoot {
    pub fn new(config: &FrontendConfig) -> Self {
        Self(config.dist_dir.as_ref().map(PathBuf::from))
    }
}

pub struct PageService;

impl PageService {
    /// 服务静态文件；没有扩展名的未知路径回退到 index.html（SPA 路由）
    pub async fn serve(
        req: HttpRequest,
        root: web::Data<PageRoot>,
    ) -> Result<HttpResponse, GatewayError> {
        let Some(ref dir) = root.0 else {
            return Ok(Self::not_found());
        };

        let relative = req.path().trim_start_matches('/');
        if !is_safe_relative_path(relative) {
            debug!("Rejected unsafe page path: {}", req.path());
            return Ok(Self::not_found());
        }

        let candidate = if relative.is_empty() {
            dir.join("index.html")
        } else {
            dir.join(relative)
        };

        if is_file(&candidate).await {
            trace!("Serving page asset {}", candidate.display());
            return Self::file_response(&candidate).await;
        }

        if Path::new(relative).extension().is_none() {
            let index = dir.join("index.html");
            if is_file(&index).await {
                trace!("SPA fallback for {}", req.path());
                return Self::file_response(&index).await;
            }
        }

        debug!("Page not found: {}", req.path());
        Ok(Self::not_found())
    }

    async fn file_response(path: &Path) -> Result<HttpResponse, GatewayError> {
        let content = tokio::fs::read(path).await?;
        Ok(HttpResponse::Ok()
            .content_type(get_content_type(path))
            .body(content))
    }

    fn not_found() -> HttpResponse {
        HttpResponse::NotFound()
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .body("Not Found")
    }
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

/// 拒绝 `..`、反斜杠和空段以外的异常路径
fn is_safe_relative_path(path: &str) -> bool {
    !path.contains('\\')
        && !path.contains('\0')
        && path.split('/').all(|segment| segment != ".." && segment != ".")
}

fn get_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("js") | Some("mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}
