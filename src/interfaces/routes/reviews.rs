use actix_web::web;

use crate::handlers::reviews;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reviews")
            .service(web::resource("/current").route(web::get().to(reviews::list_current_reviews)))
            .service(
                web::resource("/{review_id}")
                    .route(web::put().to(reviews::update_review))
                    .route(web::delete().to(reviews::delete_review)),
            )
            .service(
                web::resource("/{review_id}/images")
                    .route(web::post().to(reviews::add_review_image)),
            ),
    );
}
