mod domain;
mod infrastructure;
mod interfaces;

pub mod errors;
pub mod graceful_shutdown;
pub mod settings;
pub mod shared_repos;

pub use domain::{conflict, entities, policy, use_cases};
pub use infrastructure::{auth, db};
pub use interfaces::{handlers, middlewares, repositories, routes};

use auth::jwt::JwtService;
use repositories::sqlx_repo::{SqlxBookingRepo, SqlxImageRepo, SqlxReviewRepo, SqlxSpotRepo, SqlxUserRepo};
use shared_repos::SharedRepositories;
use use_cases::auth::AuthHandler;
use use_cases::bookings::BookingHandler;
use use_cases::reviews::ReviewHandler;
use use_cases::spots::SpotHandler;

pub type AppAuthHandler = AuthHandler<SqlxUserRepo, JwtService>;
pub type AppSpotHandler = SpotHandler<SqlxSpotRepo, SqlxImageRepo, SqlxReviewRepo, SqlxUserRepo>;
pub type AppBookingHandler = BookingHandler<SqlxBookingRepo, SqlxSpotRepo>;
pub type AppReviewHandler = ReviewHandler<SqlxReviewRepo, SqlxSpotRepo, SqlxImageRepo>;

pub struct AppState {
    pub auth_handler: AppAuthHandler,
    pub spot_handler: AppSpotHandler,
    pub booking_handler: AppBookingHandler,
    pub review_handler: AppReviewHandler,
}

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> Self {
        let repos = SharedRepositories::new(pool);
        let jwt_service = JwtService::new(config);

        AppState {
            auth_handler: AuthHandler::new(repos.user_repo.clone(), jwt_service),
            spot_handler: SpotHandler::new(
                repos.spot_repo.clone(),
                repos.image_repo.clone(),
                repos.review_repo.clone(),
                repos.user_repo,
            ),
            booking_handler: BookingHandler::new(repos.booking_repo, repos.spot_repo.clone()),
            review_handler: ReviewHandler::new(repos.review_repo, repos.spot_repo, repos.image_repo),
        }
    }
}
