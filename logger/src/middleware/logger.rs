use actix_web::body::{BoxBody, MessageBody};
use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::StatusCode,
    web,
};
use colored::{ColoredString, Colorize};
use common::env_config::Config;
use common::jwt::get_jwt_claims_or_error;
use futures::future::{LocalBoxFuture, Ready, ready};
use log::info;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

pub struct LoggerMiddleware {}

impl LoggerMiddleware {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for LoggerMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, B> Transform<S, ServiceRequest> for LoggerMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Transform = LoggerMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LoggerMiddlewareService {
            service: Arc::new(service),
        }))
    }
}

pub struct LoggerMiddlewareService<S> {
    service: Arc<S>,
}

fn colored_status(status: StatusCode) -> ColoredString {
    let code = status.as_u16().to_string();
    match status.as_u16() {
        200..=299 => code.green(),
        300..=399 => code.yellow(),
        400..=499 => code.bright_red(),
        _ => code.red(),
    }
}

fn colored_method(method: &str) -> ColoredString {
    match method {
        "GET" => method.blue(),
        "POST" => method.yellow(),
        "PUT" => method.purple(),
        "DELETE" => method.red(),
        _ => method.normal(),
    }
}

/// One access-log line: `[status] METHOD /path (12ms) user_id=...`.
pub fn format_line(
    status: StatusCode,
    method: &str,
    path: &str,
    elapsed_ms: u128,
    user_id: Option<Uuid>,
) -> String {
    format!(
        "[{}] {} {} {} user_id={}",
        colored_status(status),
        colored_method(method),
        path.bright_white(),
        format!("({elapsed_ms}ms)").bright_black(),
        user_id
            .map_or("None".to_string(), |id| id.to_string())
            .bright_blue(),
    )
}

impl<S, B> Service<ServiceRequest> for LoggerMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let started = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let user_id = get_jwt_claims_or_error(&req).ok().map(|c| c.user_id);

        let console_logging_enabled = req
            .app_data::<web::Data<Arc<Config>>>()
            .is_none_or(|config| config.console_logging_enabled);
        let srv = Arc::clone(&self.service);

        Box::pin(async move {
            let res = srv.call(req).await?;

            if console_logging_enabled {
                info!(
                    "{}",
                    format_line(
                        res.status(),
                        &method,
                        &path,
                        started.elapsed().as_millis(),
                        user_id
                    )
                );
            }

            Ok(res.map_into_boxed_body())
        })
    }
}
