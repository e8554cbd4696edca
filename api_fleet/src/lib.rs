use actix_web::web;

pub mod routes {
    pub mod assignment;
    pub mod driver;
    pub mod driver_vehicle;
    pub mod vehicle;
}
pub mod services {
    pub mod assignment;
    pub mod driver;
    pub mod lookup;
    pub mod vehicle;
}
pub mod dtos {
    pub mod fleet;
}

// Staff-only scopes. Wrap each with the staff and auth middleware.

// /drivers, /drivers/{id}
pub fn mount_drivers() -> actix_web::Scope {
    web::scope("/drivers")
        .service(routes::driver::get_drivers)
        .service(routes::driver::post_driver)
        .service(routes::driver::get_driver)
        .service(routes::driver::put_driver)
        .service(routes::driver::delete_driver)
}

// /vehicles, /vehicles/{id}
pub fn mount_vehicles() -> actix_web::Scope {
    web::scope("/vehicles")
        .service(routes::vehicle::get_vehicles)
        .service(routes::vehicle::post_vehicle)
        .service(routes::vehicle::get_vehicle)
        .service(routes::vehicle::put_vehicle)
        .service(routes::vehicle::delete_vehicle)
}

// /driver-vehicles, /driver-vehicles/{id}
pub fn mount_driver_vehicles() -> actix_web::Scope {
    web::scope("/driver-vehicles")
        .service(routes::driver_vehicle::get_driver_vehicles)
        .service(routes::driver_vehicle::post_driver_vehicle)
        .service(routes::driver_vehicle::delete_driver_vehicle)
}

// /assignments, /assignments/{id}
pub fn mount_assignments() -> actix_web::Scope {
    web::scope("/assignments")
        .service(routes::assignment::get_assignments)
        .service(routes::assignment::post_assignment)
        .service(routes::assignment::get_assignment)
        .service(routes::assignment::put_assignment)
        .service(routes::assignment::delete_assignment)
}
