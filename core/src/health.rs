use actix_web::{Responder, get};
use common::error::Res;
use common::http::Success;
use serde::Serialize;

const API_VERSION: &str = "1.0.0";

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    message: &'static str,
    version: &'static str,
}

fn health() -> Health {
    Health {
        status: "ok",
        message: "DeliveryApp API is running!",
        version: API_VERSION,
    }
}

/// Public liveness probe, served at `/` and `/api/health`.
#[get("/")]
pub async fn get_root() -> Res<impl Responder> {
    Success::ok(health())
}

#[get("/health")]
pub async fn get_health() -> Res<impl Responder> {
    Success::ok(health())
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};

    use super::*;

    #[actix_web::test]
    async fn both_probes_answer() {
        let app = test::init_service(
            App::new()
                .service(get_root)
                .service(web::scope("/api").service(get_health)),
        )
        .await;
        for uri in ["/", "/api/health"] {
            let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert!(res.status().is_success(), "{uri}");
            let body: serde_json::Value = test::read_body_json(res).await;
            assert_eq!(body["status"], "ok");
            assert_eq!(body["version"], "1.0.0");
        }
    }
}
