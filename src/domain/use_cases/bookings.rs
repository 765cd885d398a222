use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::policy::{self, BookingView};
use crate::entities::booking::{
    Booking, BookingDatesRequest, BookingInsert, BookingPublic, BookingWithSpot, BookingWithUser,
};
use crate::errors::AppError;
use crate::interfaces::repositories::booking::BookingRepository;
use crate::interfaces::repositories::spot::SpotRepository;

/// A spot's booking list, projected per the requesting user's relationship
/// to the spot.
#[derive(Debug)]
pub enum SpotBookings {
    /// Owner view: full records with booker identity.
    Full(Vec<BookingWithUser>),
    /// Non-owner view: dates only.
    Limited(Vec<BookingPublic>),
}

pub struct BookingHandler<B, S>
where
    B: BookingRepository,
    S: SpotRepository,
{
    pub booking_repo: B,
    pub spot_repo: S,
}

impl<B, S> BookingHandler<B, S>
where
    B: BookingRepository,
    S: SpotRepository,
{
    pub fn new(booking_repo: B, spot_repo: S) -> Self {
        BookingHandler {
            booking_repo,
            spot_repo,
        }
    }

    pub async fn list_current(&self, user_id: &Uuid) -> Result<Vec<BookingWithSpot>, AppError> {
        let rows = self.booking_repo.list_by_user(user_id).await?;
        Ok(rows.into_iter().map(BookingWithSpot::from).collect())
    }

    pub async fn list_for_spot(
        &self,
        actor: Uuid,
        spot_id: &Uuid,
    ) -> Result<SpotBookings, AppError> {
        let spot = self
            .spot_repo
            .get_spot(spot_id)
            .await?
            .ok_or_else(|| AppError::not_found("Spot"))?;

        match policy::spot_bookings_view(actor, spot.owner_id) {
            BookingView::Full => {
                let bookings = self.booking_repo.list_for_spot_with_users(spot_id).await?;
                Ok(SpotBookings::Full(bookings))
            }
            BookingView::Limited => {
                let bookings = self.booking_repo.list_for_spot(spot_id).await?;
                Ok(SpotBookings::Limited(
                    bookings.iter().map(BookingPublic::from).collect(),
                ))
            }
        }
    }

    /// Validation, then ownership policy, then the transactional
    /// conflict-check-and-insert in the repository.
    pub async fn create(
        &self,
        actor: Uuid,
        spot_id: &Uuid,
        request: &BookingDatesRequest,
        today: NaiveDate,
    ) -> Result<Booking, AppError> {
        let (start_date, end_date) = request
            .into_dates(today)
            .map_err(AppError::Validation)?;

        let spot = self.spot_repo.get_spot(spot_id).await?;
        policy::booking_creation(actor, spot.map(|s| s.owner_id)).require("Spot")?;

        self.booking_repo
            .create_booking(&BookingInsert {
                spot_id: *spot_id,
                user_id: actor,
                start_date,
                end_date,
            })
            .await
    }

    pub async fn update(
        &self,
        actor: Uuid,
        booking_id: &Uuid,
        request: &BookingDatesRequest,
        today: NaiveDate,
    ) -> Result<Booking, AppError> {
        let (start_date, end_date) = request
            .into_dates(today)
            .map_err(AppError::Validation)?;

        let booking = self.booking_repo.get_booking(booking_id).await?;
        policy::booking_update(actor, booking.as_ref(), today).require("Booking")?;
        let booking = booking.ok_or_else(|| AppError::not_found("Booking"))?;

        self.booking_repo
            .update_booking(booking_id, &booking.spot_id, start_date, end_date)
            .await
    }

    pub async fn delete(
        &self,
        actor: Uuid,
        booking_id: &Uuid,
        today: NaiveDate,
    ) -> Result<(), AppError> {
        let booking = self.booking_repo.get_booking(booking_id).await?;
        policy::booking_deletion(actor, booking.as_ref(), today).require("Booking")?;

        self.booking_repo.delete_booking(booking_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::domain::conflict::ConflictFlags;
    use crate::entities::booking::BookingWithSpotOwner;
    use crate::entities::spot::Spot;
    use crate::interfaces::repositories::booking::MockBookingRepository;
    use crate::interfaces::repositories::spot::MockSpotRepository;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn spot_owned_by(owner_id: Uuid) -> Spot {
        Spot {
            id: Uuid::new_v4(),
            owner_id,
            address: "123 Disney Lane".into(),
            city: "San Francisco".into(),
            state: "California".into(),
            country: "United States".into(),
            lat: 37.76,
            lng: -122.47,
            name: "App Academy".into(),
            description: "Place where web developers are created".into(),
            price: 123.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn booking_row(user_id: Uuid, owner_id: Uuid, start: &str, end: &str) -> BookingWithSpotOwner {
        BookingWithSpotOwner {
            id: Uuid::new_v4(),
            spot_id: Uuid::new_v4(),
            user_id,
            start_date: date(start),
            end_date: date(end),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            spot_owner_id: owner_id,
        }
    }

    fn request(start: &str, end: &str) -> BookingDatesRequest {
        BookingDatesRequest {
            start_date: Some(date(start)),
            end_date: Some(date(end)),
        }
    }

    #[tokio::test]
    async fn owner_cannot_book_own_spot() {
        let owner = Uuid::new_v4();
        let spot = spot_owned_by(owner);
        let spot_id = spot.id;

        let mut spot_repo = MockSpotRepository::new();
        spot_repo
            .expect_get_spot()
            .returning(move |_| Ok(Some(spot.clone())));
        let mut booking_repo = MockBookingRepository::new();
        booking_repo.expect_create_booking().never();

        let handler = BookingHandler::new(booking_repo, spot_repo);
        let result = handler
            .create(owner, &spot_id, &request("2025-07-01", "2025-07-05"), date("2025-06-01"))
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn missing_spot_reported_before_any_write() {
        let mut spot_repo = MockSpotRepository::new();
        spot_repo.expect_get_spot().returning(|_| Ok(None));
        let mut booking_repo = MockBookingRepository::new();
        booking_repo.expect_create_booking().never();

        let handler = BookingHandler::new(booking_repo, spot_repo);
        let result = handler
            .create(
                Uuid::new_v4(),
                &Uuid::new_v4(),
                &request("2025-07-01", "2025-07-05"),
                date("2025-06-01"),
            )
            .await;

        assert!(matches!(
            result,
            Err(AppError::NotFound(msg)) if msg == "Spot couldn't be found"
        ));
    }

    #[tokio::test]
    async fn invalid_dates_fail_before_the_spot_is_even_loaded() {
        let mut spot_repo = MockSpotRepository::new();
        spot_repo.expect_get_spot().never();
        let booking_repo = MockBookingRepository::new();

        let handler = BookingHandler::new(booking_repo, spot_repo);
        let result = handler
            .create(
                Uuid::new_v4(),
                &Uuid::new_v4(),
                &request("2025-07-05", "2025-07-01"),
                date("2025-06-01"),
            )
            .await;

        match result {
            Err(AppError::Validation(errors)) => {
                assert!(errors.iter().any(|e| e.field == "endDate"));
            }
            other => panic!("expected validation failure, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn conflicting_dates_surface_boundary_flags() {
        let guest = Uuid::new_v4();
        let spot = spot_owned_by(Uuid::new_v4());
        let spot_id = spot.id;

        let mut spot_repo = MockSpotRepository::new();
        spot_repo
            .expect_get_spot()
            .returning(move |_| Ok(Some(spot.clone())));
        let mut booking_repo = MockBookingRepository::new();
        booking_repo.expect_create_booking().returning(|_| {
            Err(AppError::BookingConflict(ConflictFlags {
                start_date: true,
                end_date: true,
            }))
        });

        let handler = BookingHandler::new(booking_repo, spot_repo);
        let result = handler
            .create(guest, &spot_id, &request("2024-12-24", "2024-12-27"), date("2024-12-01"))
            .await;

        match result {
            Err(AppError::BookingConflict(flags)) => {
                assert!(flags.start_date && flags.end_date);
            }
            other => panic!("expected booking conflict, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn guest_booking_goes_through() {
        let guest = Uuid::new_v4();
        let spot = spot_owned_by(Uuid::new_v4());
        let spot_id = spot.id;

        let mut spot_repo = MockSpotRepository::new();
        spot_repo
            .expect_get_spot()
            .returning(move |_| Ok(Some(spot.clone())));
        let mut booking_repo = MockBookingRepository::new();
        booking_repo.expect_create_booking().returning(move |insert| {
            Ok(Booking {
                id: Uuid::new_v4(),
                spot_id: insert.spot_id,
                user_id: insert.user_id,
                start_date: insert.start_date,
                end_date: insert.end_date,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
        });

        let handler = BookingHandler::new(booking_repo, spot_repo);
        let booking = handler
            .create(guest, &spot_id, &request("2025-07-01", "2025-07-05"), date("2025-06-01"))
            .await
            .expect("booking should succeed");

        assert_eq!(booking.user_id, guest);
        assert_eq!(booking.spot_id, spot_id);
    }

    #[tokio::test]
    async fn ended_booking_cannot_be_edited() {
        let booker = Uuid::new_v4();
        let row = booking_row(booker, Uuid::new_v4(), "2025-05-01", "2025-05-05");
        let booking_id = row.id;

        let mut booking_repo = MockBookingRepository::new();
        booking_repo
            .expect_get_booking()
            .returning(move |_| Ok(Some(row.clone())));
        booking_repo.expect_update_booking().never();

        let handler = BookingHandler::new(booking_repo, MockSpotRepository::new());
        let result = handler
            .update(booker, &booking_id, &request("2025-07-01", "2025-07-05"), date("2025-06-01"))
            .await;

        assert!(matches!(
            result,
            Err(AppError::Forbidden(msg)) if msg == "Past bookings can't be modified"
        ));
    }

    #[tokio::test]
    async fn started_booking_cannot_be_deleted() {
        let booker = Uuid::new_v4();
        let row = booking_row(booker, Uuid::new_v4(), "2025-06-01", "2025-06-10");
        let booking_id = row.id;

        let mut booking_repo = MockBookingRepository::new();
        booking_repo
            .expect_get_booking()
            .returning(move |_| Ok(Some(row.clone())));
        booking_repo.expect_delete_booking().never();

        let handler = BookingHandler::new(booking_repo, MockSpotRepository::new());
        let result = handler.delete(booker, &booking_id, date("2025-06-05")).await;

        assert!(matches!(
            result,
            Err(AppError::Forbidden(msg)) if msg == "Bookings that have been started can't be deleted"
        ));
    }

    #[tokio::test]
    async fn spot_owner_may_delete_a_future_booking() {
        let owner = Uuid::new_v4();
        let row = booking_row(Uuid::new_v4(), owner, "2025-07-01", "2025-07-05");
        let booking_id = row.id;

        let mut booking_repo = MockBookingRepository::new();
        booking_repo
            .expect_get_booking()
            .returning(move |_| Ok(Some(row.clone())));
        booking_repo.expect_delete_booking().returning(|_| Ok(()));

        let handler = BookingHandler::new(booking_repo, MockSpotRepository::new());
        let result = handler.delete(owner, &booking_id, date("2025-06-01")).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn owner_gets_the_full_projection_with_booker_identity() {
        use crate::entities::booking::BookerIdentity;

        let owner = Uuid::new_v4();
        let booker = Uuid::new_v4();
        let spot = spot_owned_by(owner);
        let spot_id = spot.id;

        let mut spot_repo = MockSpotRepository::new();
        spot_repo
            .expect_get_spot()
            .returning(move |_| Ok(Some(spot.clone())));
        let mut booking_repo = MockBookingRepository::new();
        booking_repo
            .expect_list_for_spot_with_users()
            .returning(move |sid| {
                Ok(vec![BookingWithUser {
                    user: BookerIdentity {
                        id: booker,
                        first_name: "Demo".into(),
                        last_name: "User".into(),
                    },
                    id: Uuid::new_v4(),
                    spot_id: *sid,
                    user_id: booker,
                    start_date: date("2025-07-01"),
                    end_date: date("2025-07-05"),
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                }])
            });
        booking_repo.expect_list_for_spot().never();

        let handler = BookingHandler::new(booking_repo, spot_repo);
        match handler.list_for_spot(owner, &spot_id).await.unwrap() {
            SpotBookings::Full(bookings) => {
                assert_eq!(bookings.len(), 1);
                assert_eq!(bookings[0].user.id, booker);
                assert_eq!(bookings[0].user.first_name, "Demo");
                assert_eq!(bookings[0].user.last_name, "User");
            }
            SpotBookings::Limited(_) => panic!("owner must see the full projection"),
        }
    }

    #[tokio::test]
    async fn non_owner_gets_the_limited_projection() {
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let spot = spot_owned_by(owner);
        let spot_id = spot.id;

        let mut spot_repo = MockSpotRepository::new();
        spot_repo
            .expect_get_spot()
            .returning(move |_| Ok(Some(spot.clone())));
        let mut booking_repo = MockBookingRepository::new();
        booking_repo.expect_list_for_spot().returning(move |sid| {
            Ok(vec![Booking {
                id: Uuid::new_v4(),
                spot_id: *sid,
                user_id: Uuid::new_v4(),
                start_date: date("2025-07-01"),
                end_date: date("2025-07-05"),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }])
        });
        booking_repo.expect_list_for_spot_with_users().never();

        let handler = BookingHandler::new(booking_repo, spot_repo);
        match handler.list_for_spot(stranger, &spot_id).await.unwrap() {
            SpotBookings::Limited(bookings) => {
                assert_eq!(bookings.len(), 1);
                assert_eq!(bookings[0].spot_id, spot_id);
            }
            SpotBookings::Full(_) => panic!("non-owner must not see the full projection"),
        }
    }
}
