use std::{future::Future, pin::Pin, sync::Arc};

use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    web,
};
use futures::future::{Ready, ok};

use common::{
    env_config::Config,
    error::Res,
    jwt::{self, JwtClaims},
};

/// Decodes a bearer token, when one is sent, into a `Res<JwtClaims>` request extension.
/// Rejecting requests is left to the auth middleware.
pub struct ExtractionMiddleware {}

impl ExtractionMiddleware {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for ExtractionMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, B> Transform<S, ServiceRequest> for ExtractionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Transform = ExtractionMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(ExtractionMiddlewareService {
            service: Arc::new(service),
        })
    }
}

pub struct ExtractionMiddlewareService<S> {
    service: Arc<S>,
}

/// Token part of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl<S, B> Service<ServiceRequest> for ExtractionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(bearer_token)
            .map(str::to_owned);

        let secret = req
            .app_data::<web::Data<Arc<Config>>>()
            .map(|config| config.jwt_config.secret.clone());
        let srv = Arc::clone(&self.service);

        Box::pin(async move {
            match (token, secret) {
                (Some(token), Some(secret)) => {
                    let claims_res = jwt::validate_jwt(&token, &secret);
                    req.extensions_mut().insert::<Res<JwtClaims>>(claims_res);
                }
                (Some(_), None) => log::error!("Config missing from app data, token ignored"),
                _ => {}
            }
            srv.call(req).await.map(|res| res.map_into_boxed_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpRequest, HttpResponse};
    use common::{
        env_config::JwtConfig,
        jwt::{ClaimsSpec, generate_access_token},
    };

    async fn claims_echo(req: HttpRequest) -> HttpResponse {
        match req.extensions().get::<Res<JwtClaims>>() {
            Some(Ok(claims)) => HttpResponse::Ok().body(claims.user_id.to_string()),
            Some(Err(_)) => HttpResponse::Ok().body("invalid"),
            None => HttpResponse::Ok().body("none"),
        }
    }

    fn config() -> Arc<Config> {
        Arc::new(Config::for_tests("extractor-secret"))
    }

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer "), None);
    }

    #[actix_web::test]
    async fn valid_token_becomes_claims() {
        let config = config();
        let user_id = uuid::Uuid::new_v4();
        let token = generate_access_token(
            &ClaimsSpec {
                user_id,
                is_staff: false,
            },
            &JwtConfig {
                secret: "extractor-secret".to_string(),
                access_minutes: 5,
                refresh_days: 1,
            },
        )
        .unwrap();

        let app = actix_web::test::init_service(
            App::new()
                .app_data(web::Data::new(config))
                .wrap(ExtractionMiddleware::new())
                .route("/", web::get().to(claims_echo)),
        )
        .await;

        let req = actix_web::test::TestRequest::get()
            .uri("/")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let body = actix_web::test::call_and_read_body(&app, req).await;
        assert_eq!(body, user_id.to_string().as_bytes());

        let req = actix_web::test::TestRequest::get()
            .uri("/")
            .insert_header(("Authorization", "Bearer garbage"))
            .to_request();
        let body = actix_web::test::call_and_read_body(&app, req).await;
        assert_eq!(body, "invalid".as_bytes());

        let req = actix_web::test::TestRequest::get().uri("/").to_request();
        let body = actix_web::test::call_and_read_body(&app, req).await;
        assert_eq!(body, "none".as_bytes());
    }
}
