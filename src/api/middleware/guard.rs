//! 页面路由守卫
//!
//! - 未登录访问受保护页面 → 307 重定向到登录页
//! - 已登录访问登录页 → 307 重定向到首页
//!
//! 是否登录只看 access_token cookie 是否存在且非空，token 的有效性由后端判断。

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{Method, header::LOCATION},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::config::GuardConfig;

/// 守卫判定结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Pass,
    Redirect(String),
}

#[derive(Debug, Clone)]
pub struct GuardSettings {
    pub enabled: bool,
    pub auth_path: String,
    pub home_path: String,
    pub bypass_prefixes: Vec<String>,
    pub cookie_name: String,
}

impl GuardSettings {
    pub fn new(guard: &GuardConfig, cookie_name: &str) -> Self {
        Self {
            enabled: guard.enabled,
            auth_path: guard.auth_path.clone(),
            home_path: guard.home_path.clone(),
            bypass_prefixes: guard.bypass_prefixes.clone(),
            cookie_name: cookie_name.to_string(),
        }
    }

    /// 根据路径、方法和登录状态决定放行还是重定向
    pub fn decide(&self, method: &Method, path: &str, authenticated: bool) -> GuardDecision {
        if !self.enabled || *method == Method::OPTIONS {
            return GuardDecision::Pass;
        }

        if self
            .bypass_prefixes
            .iter()
            .any(|prefix| path_has_prefix(path, prefix))
        {
            return GuardDecision::Pass;
        }

        let on_auth_page = path_has_prefix(path, &self.auth_path);

        match (authenticated, on_auth_page) {
            (true, true) => GuardDecision::Redirect(self.home_path.clone()),
            (false, false) => GuardDecision::Redirect(self.auth_path.clone()),
            _ => GuardDecision::Pass,
        }
    }
}

/// `path` 是否位于 `prefix` 之下（按路径段匹配，`/authx` 不属于 `/auth`）
fn path_has_prefix(path: &str, prefix: &str) -> bool {
    let Some(rest) = path.strip_prefix(prefix) else {
        return false;
    };
    rest.is_empty() || rest.starts_with('/') || prefix.ends_with('/')
}

/// Auth guard middleware
#[derive(Clone)]
pub struct AuthGuard {
    settings: Arc<GuardSettings>,
}

impl AuthGuard {
    pub fn new(settings: GuardSettings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGuardMiddleware {
            service: Rc::new(service),
            settings: Arc::clone(&self.settings),
        }))
    }
}

pub struct AuthGuardMiddleware<S> {
    service: Rc<S>,
    settings: Arc<GuardSettings>,
}

impl<S> AuthGuardMiddleware<S> {
    fn is_authenticated(req: &ServiceRequest, cookie_name: &str) -> bool {
        req.cookie(cookie_name)
            .map(|c| !c.value().is_empty())
            .unwrap_or(false)
    }
}

impl<S, B> Service<ServiceRequest> for AuthGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let settings = self.settings.clone();

        Box::pin(async move {
            let authenticated = Self::is_authenticated(&req, &settings.cookie_name);

            match settings.decide(req.method(), req.path(), authenticated) {
                GuardDecision::Pass => {
                    trace!("Guard: pass {}", req.path());
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                GuardDecision::Redirect(location) => {
                    debug!(
                        "Guard: redirecting {} -> {} (authenticated: {})",
                        req.path(),
                        location,
                        authenticated
                    );
                    Ok(req.into_response(
                        HttpResponse::TemporaryRedirect()
                            .insert_header((LOCATION, location))
                            .finish()
                            .map_into_right_body(),
                    ))
                }
            }
        })
    }
}
