use actix_web::web;

use crate::handlers::{bookings, reviews, spots};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/spots")
            .service(
                web::resource("")
                    .route(web::get().to(spots::list_spots))
                    .route(web::post().to(spots::create_spot)),
            )
            .service(web::resource("/current").route(web::get().to(spots::list_own_spots)))
            .service(
                web::resource("/{spot_id}")
                    .route(web::get().to(spots::get_spot))
                    .route(web::put().to(spots::update_spot))
                    .route(web::delete().to(spots::delete_spot)),
            )
            .service(
                web::resource("/{spot_id}/images").route(web::post().to(spots::add_spot_image)),
            )
            .service(
                web::resource("/{spot_id}/reviews")
                    .route(web::get().to(reviews::list_spot_reviews))
                    .route(web::post().to(reviews::create_review)),
            )
            .service(
                web::resource("/{spot_id}/bookings")
                    .route(web::get().to(bookings::list_spot_bookings))
                    .route(web::post().to(bookings::create_booking)),
            ),
    );
}
