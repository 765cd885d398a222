use actix_web::web;

use crate::handlers::home::home;

mod bookings;
mod images;
mod json_error;
mod reviews;
mod session;
mod spots;
mod users;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(json_error::config_routes);
    cfg.service(home);

    cfg.service(
        web::scope("/api")
            .configure(users::config_routes)
            .configure(session::config_routes)
            .configure(spots::config_routes)
            .configure(bookings::config_routes)
            .configure(reviews::config_routes)
            .configure(images::config_routes),
    );
}
