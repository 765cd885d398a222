//! Ownership-scoped authorization decisions.
//!
//! Pure functions over already-loaded resources: repositories fetch, policy
//! decides, handlers translate `Decision` into HTTP errors. Missing resources
//! always take precedence over forbidden ones so that unauthorized callers
//! cannot probe for existence.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::entities::booking::BookingWithSpotOwner;
use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Forbidden(&'static str),
    NotFound,
}

impl Decision {
    /// `Ok(())` when allowed, otherwise the matching `AppError` with the
    /// original resource name in the 404 message.
    pub fn require(self, resource: &str) -> Result<(), AppError> {
        match self {
            Decision::Allowed => Ok(()),
            Decision::Forbidden(msg) => Err(AppError::Forbidden(msg.to_string())),
            Decision::NotFound => Err(AppError::not_found(resource)),
        }
    }
}

/// How a spot's booking list is projected for the requesting user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingView {
    /// The spot owner sees full records including booker identity.
    Full,
    /// Everyone else sees only spot id and dates.
    Limited,
}

pub fn spot_mutation(actor: Uuid, spot_owner: Option<Uuid>) -> Decision {
    match spot_owner {
        None => Decision::NotFound,
        Some(owner) if owner == actor => Decision::Allowed,
        Some(_) => Decision::Forbidden("Forbidden"),
    }
}

pub fn review_mutation(actor: Uuid, review_author: Option<Uuid>) -> Decision {
    match review_author {
        None => Decision::NotFound,
        Some(author) if author == actor => Decision::Allowed,
        Some(_) => Decision::Forbidden("Forbidden"),
    }
}

/// Owners cannot book their own spot.
pub fn booking_creation(actor: Uuid, spot_owner: Option<Uuid>) -> Decision {
    match spot_owner {
        None => Decision::NotFound,
        Some(owner) if owner == actor => Decision::Forbidden("Forbidden: Cannot book your own spot"),
        Some(_) => Decision::Allowed,
    }
}

/// Only the booker may edit, and only while the booking has not ended.
pub fn booking_update(
    actor: Uuid,
    booking: Option<&BookingWithSpotOwner>,
    today: NaiveDate,
) -> Decision {
    let Some(booking) = booking else {
        return Decision::NotFound;
    };
    if booking.user_id != actor {
        return Decision::Forbidden("Forbidden");
    }
    if booking.end_date < today {
        return Decision::Forbidden("Past bookings can't be modified");
    }
    Decision::Allowed
}

/// The booker or the spot owner may delete, but only before the stay starts.
pub fn booking_deletion(
    actor: Uuid,
    booking: Option<&BookingWithSpotOwner>,
    today: NaiveDate,
) -> Decision {
    let Some(booking) = booking else {
        return Decision::NotFound;
    };
    if booking.start_date <= today {
        return Decision::Forbidden("Bookings that have been started can't be deleted");
    }
    if booking.user_id != actor && booking.spot_owner_id != actor {
        return Decision::Forbidden("Forbidden");
    }
    Decision::Allowed
}

pub fn spot_bookings_view(actor: Uuid, spot_owner: Uuid) -> BookingView {
    if actor == spot_owner {
        BookingView::Full
    } else {
        BookingView::Limited
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
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

    #[test]
    fn missing_resource_wins_over_forbidden() {
        let actor = Uuid::new_v4();
        assert_eq!(spot_mutation(actor, None), Decision::NotFound);
        assert_eq!(review_mutation(actor, None), Decision::NotFound);
        assert_eq!(booking_creation(actor, None), Decision::NotFound);
        assert_eq!(
            booking_update(actor, None, date("2025-06-01")),
            Decision::NotFound
        );
    }

    #[test]
    fn only_the_owner_mutates_a_spot() {
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        assert_eq!(spot_mutation(owner, Some(owner)), Decision::Allowed);
        assert_eq!(
            spot_mutation(stranger, Some(owner)),
            Decision::Forbidden("Forbidden")
        );
    }

    #[test]
    fn owner_cannot_book_own_spot() {
        let owner = Uuid::new_v4();
        let guest = Uuid::new_v4();
        assert!(matches!(
            booking_creation(owner, Some(owner)),
            Decision::Forbidden(_)
        ));
        assert_eq!(booking_creation(guest, Some(owner)), Decision::Allowed);
    }

    #[test]
    fn only_the_booker_updates_a_booking() {
        let booker = Uuid::new_v4();
        let owner = Uuid::new_v4();
        let today = date("2025-06-01");
        let b = booking_row(booker, owner, "2025-06-10", "2025-06-15");

        assert_eq!(booking_update(booker, Some(&b), today), Decision::Allowed);
        // Even the spot owner cannot edit someone else's booking.
        assert_eq!(
            booking_update(owner, Some(&b), today),
            Decision::Forbidden("Forbidden")
        );
    }

    #[test]
    fn ended_bookings_are_immutable() {
        let booker = Uuid::new_v4();
        let b = booking_row(booker, Uuid::new_v4(), "2025-05-01", "2025-05-05");
        assert_eq!(
            booking_update(booker, Some(&b), date("2025-06-01")),
            Decision::Forbidden("Past bookings can't be modified")
        );
        // End date is inclusive for mutability: still editable on checkout day.
        assert_eq!(
            booking_update(booker, Some(&b), date("2025-05-05")),
            Decision::Allowed
        );
    }

    #[test]
    fn booker_or_spot_owner_deletes_future_bookings() {
        let booker = Uuid::new_v4();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let today = date("2025-06-01");
        let b = booking_row(booker, owner, "2025-06-10", "2025-06-15");

        assert_eq!(booking_deletion(booker, Some(&b), today), Decision::Allowed);
        assert_eq!(booking_deletion(owner, Some(&b), today), Decision::Allowed);
        assert_eq!(
            booking_deletion(stranger, Some(&b), today),
            Decision::Forbidden("Forbidden")
        );
    }

    #[test]
    fn started_bookings_cannot_be_deleted() {
        let booker = Uuid::new_v4();
        let b = booking_row(booker, Uuid::new_v4(), "2025-06-01", "2025-06-10");
        // Start boundary counts as started.
        assert_eq!(
            booking_deletion(booker, Some(&b), date("2025-06-01")),
            Decision::Forbidden("Bookings that have been started can't be deleted")
        );
    }

    #[test]
    fn projection_depends_on_ownership() {
        let owner = Uuid::new_v4();
        assert_eq!(spot_bookings_view(owner, owner), BookingView::Full);
        assert_eq!(
            spot_bookings_view(Uuid::new_v4(), owner),
            BookingView::Limited
        );
    }

    #[test]
    fn decision_maps_to_app_errors() {
        assert!(Decision::Allowed.require("Spot").is_ok());
        assert!(matches!(
            Decision::NotFound.require("Spot"),
            Err(AppError::NotFound(msg)) if msg == "Spot couldn't be found"
        ));
        assert!(matches!(
            Decision::Forbidden("Forbidden").require("Spot"),
            Err(AppError::Forbidden(_))
        ));
    }
}
