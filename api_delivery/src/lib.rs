use actix_web::web;

pub mod routes {
    pub mod customer;
    pub mod delivery;
}
pub mod services {
    pub mod access;
    pub mod customer;
    pub mod delivery;
    pub mod placement;
}
pub mod dtos {
    pub mod customer;
    pub mod delivery;
}

// /customers, /customers/me, /customers/{id}
pub fn mount_customers() -> actix_web::Scope {
    web::scope("/customers")
        .service(routes::customer::get_customers)
        .service(routes::customer::get_me)
        .service(routes::customer::get_customer)
        .service(routes::customer::put_customer)
        .service(routes::customer::delete_customer)
}

// /deliveries, /deliveries/request_delivery, /deliveries/{id}
pub fn mount_deliveries() -> actix_web::Scope {
    web::scope("/deliveries")
        .service(routes::delivery::get_deliveries)
        .service(routes::delivery::post_delivery)
        .service(routes::delivery::post_request_delivery)
        .service(routes::delivery::get_delivery)
        .service(routes::delivery::put_delivery)
        .service(routes::delivery::delete_delivery)
}
