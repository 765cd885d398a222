use actix_web::web;

use crate::handlers::images;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/spot-images/{image_id}").route(web::delete().to(images::delete_spot_image)),
    );
    cfg.service(
        web::resource("/review-images/{image_id}")
            .route(web::delete().to(images::delete_review_image)),
    );
}
