use crate::repositories::sqlx_repo::{
    SqlxBookingRepo, SqlxImageRepo, SqlxReviewRepo, SqlxSpotRepo, SqlxUserRepo,
};

#[derive(Clone)]
pub struct SharedRepositories {
    pub user_repo: SqlxUserRepo,
    pub spot_repo: SqlxSpotRepo,
    pub booking_repo: SqlxBookingRepo,
    pub review_repo: SqlxReviewRepo,
    pub image_repo: SqlxImageRepo,
}

impl SharedRepositories {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SharedRepositories {
            user_repo: SqlxUserRepo::new(pool.clone()),
            spot_repo: SqlxSpotRepo::new(pool.clone()),
            booking_repo: SqlxBookingRepo::new(pool.clone()),
            review_repo: SqlxReviewRepo::new(pool.clone()),
            image_repo: SqlxImageRepo::new(pool),
        }
    }
}
