pub mod booking;
pub mod image;
pub mod review;
pub mod spot;
pub mod sqlx_repo;
pub mod token;
pub mod user;
