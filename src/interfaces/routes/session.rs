use actix_web::web;

use crate::handlers::users;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/session")
            .route(web::post().to(users::login))
            .route(web::get().to(users::restore_session)),
    );
}
