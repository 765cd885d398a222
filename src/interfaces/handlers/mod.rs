pub mod bookings;
pub mod home;
pub mod images;
pub mod reviews;
pub mod spots;
pub mod users;
