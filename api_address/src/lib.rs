use actix_web::web;

pub mod routes {
    pub mod address;
}
pub mod services {
    pub mod address;
    pub mod geocoding;
    pub mod parser;
    pub mod validator;
}
pub mod dtos {
    pub mod address;
}

// /address-validation/{validate,statistics,autocomplete}
// /address-validation/validated-addresses[/{id}]
// /address-validation/validation-logs[/{id}]
pub fn mount_address_validation() -> actix_web::Scope {
    web::scope("/address-validation")
        .service(routes::address::post_validate)
        .service(routes::address::get_statistics)
        .service(routes::address::get_addresses)
        .service(routes::address::get_address)
        .service(routes::address::get_logs)
        .service(routes::address::get_log)
        .service(routes::address::get_autocomplete)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test};
    use common::{
        env_config::Config,
        jwt::{ClaimsSpec, generate_token_pair},
    };
    use sqlx::PgPool;
    use uuid::Uuid;

    use super::*;
    use crate::services::validator::AddressValidator;

    const SECRET: &str = "address-secret";

    fn token() -> String {
        let config = Config::for_tests(SECRET);
        let spec = ClaimsSpec {
            user_id: Uuid::new_v4(),
            is_staff: false,
        };
        generate_token_pair(&spec, &config.jwt_config).unwrap().access
    }

    // The pool never connects: these requests are answered before any query runs.
    macro_rules! app {
        () => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(Arc::new(Config::for_tests(SECRET))))
                    .app_data(web::Data::new(Arc::new(
                        PgPool::connect_lazy("postgres://localhost/unused").unwrap(),
                    )))
                    .app_data(web::Data::new(Arc::new(AddressValidator::new(None))))
                    .wrap(extractor::middleware())
                    .service(
                        web::scope("/api").service(
                            mount_address_validation().wrap(api_auth::auth_middleware()),
                        ),
                    ),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn validation_needs_a_token() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/address-validation/validate")
            .set_json(serde_json::json!({ "address": "123 Main St" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn blank_address_is_a_bad_request() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/address-validation/validate")
            .insert_header(("Authorization", format!("Bearer {}", token())))
            .set_json(serde_json::json!({ "address": "  ", "country_hint": "US" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn autocomplete_without_geocoder_is_empty() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/api/address-validation/autocomplete?input=123%20Main")
            .insert_header(("Authorization", format!("Bearer {}", token())))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["predictions"], serde_json::json!([]));
    }

    #[actix_web::test]
    async fn page_zero_is_not_found() {
        let app = app!();
        for uri in [
            "/api/address-validation/validated-addresses?page=0",
            "/api/address-validation/validation-logs?page=0",
        ] {
            let req = test::TestRequest::get()
                .uri(uri)
                .insert_header(("Authorization", format!("Bearer {}", token())))
                .to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }
}
