pub mod auth;
pub mod bookings;
pub mod extractors;
pub mod reviews;
pub mod spots;
