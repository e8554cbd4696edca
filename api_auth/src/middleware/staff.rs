use std::{future::Future, pin::Pin, sync::Arc};

use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use common::{error::AppError, jwt::JwtClaims};
use futures::future::{Ready, ok};

/// Lets only staff through. Must sit inside `AuthMiddleware`.
pub struct StaffMiddleware {}

impl StaffMiddleware {
    pub fn new() -> Self {
        StaffMiddleware {}
    }
}

impl Default for StaffMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, B> Transform<S, ServiceRequest> for StaffMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Transform = StaffMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(StaffMiddlewareService {
            service: Arc::new(service),
        })
    }
}

pub struct StaffMiddlewareService<S> {
    service: Arc<S>,
}

impl<S, B> Service<ServiceRequest> for StaffMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let is_staff = req
            .extensions()
            .get::<JwtClaims>()
            .map(|claims| claims.is_staff);
        let srv = Arc::clone(&self.service);

        Box::pin(async move {
            let rejection = match is_staff {
                Some(true) => None,
                Some(false) => Some(AppError::Forbidden(
                    "You do not have permission to perform this action".to_string(),
                )),
                None => Some(AppError::Unauthorized(
                    "No authorization token provided".to_string(),
                )),
            };

            match rejection {
                Some(error) => Ok(req.into_response(error.to_http_response())),
                None => srv.call(req).await.map(|res| res.map_into_boxed_body()),
            }
        })
    }
}
