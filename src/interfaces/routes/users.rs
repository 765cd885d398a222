use actix_web::web;

use crate::handlers::users;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/users").route(web::post().to(users::signup)));
}
