use actix_web::web;
use middleware::{auth::AuthMiddleware, staff::StaffMiddleware};

pub mod middleware {
    pub mod auth;
    pub mod staff;
}
pub mod routes {
    pub mod auth;
    pub mod register;
}
pub mod services {
    pub mod auth;
    pub mod user;
}
pub mod dtos {
    pub mod auth;
}

// /token, /token/refresh
pub fn mount_token() -> actix_web::Scope {
    web::scope("/token")
        .service(routes::auth::post_token)
        .service(routes::auth::post_refresh)
}

// Public registration endpoints. Mount before the /customers and /drivers scopes.
pub fn mount_customer_registration() -> actix_web::Resource {
    web::resource("/customers/register")
        .route(web::post().to(routes::register::post_register_customer))
}

pub fn mount_driver_registration() -> actix_web::Resource {
    web::resource("/drivers/register").route(web::post().to(routes::register::post_register_driver))
}

// Auth middleware
pub fn auth_middleware() -> AuthMiddleware {
    AuthMiddleware::new()
}

// Staff guard, wrap inside auth_middleware
pub fn staff_middleware() -> StaffMiddleware {
    StaffMiddleware::new()
}
