use sqlx::PgPool;

#[derive(Clone)]
pub struct SqlxUserRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxSpotRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxBookingRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxReviewRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxImageRepo {
    pub pool: PgPool,
}
