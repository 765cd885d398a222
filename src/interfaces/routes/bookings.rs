use actix_web::web;

use crate::handlers::bookings;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/bookings")
            .service(
                web::resource("/current").route(web::get().to(bookings::list_current_bookings)),
            )
            .service(
                web::resource("/{booking_id}")
                    .route(web::put().to(bookings::update_booking))
                    .route(web::delete().to(bookings::delete_booking)),
            ),
    );
}
