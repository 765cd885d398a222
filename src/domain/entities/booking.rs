use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::FieldError;

/// A reserved date range on a spot. `end_date` is exclusive: the checkout
/// day is bookable same-day by the next guest.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub spot_id: Uuid,
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn has_started(&self, today: NaiveDate) -> bool {
        self.start_date <= today
    }

    pub fn has_ended(&self, today: NaiveDate) -> bool {
        self.end_date < today
    }
}

/// Booking joined with its spot's owner, for delete authorization.
#[derive(Debug, Clone, FromRow)]
pub struct BookingWithSpotOwner {
    pub id: Uuid,
    pub spot_id: Uuid,
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub spot_owner_id: Uuid,
}

impl BookingWithSpotOwner {
    pub fn booking(&self) -> Booking {
        Booking {
            id: self.id,
            spot_id: self.spot_id,
            user_id: self.user_id,
            start_date: self.start_date,
            end_date: self.end_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Booking as seen by the spot's owner: full record plus booker identity.
#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BookingWithUser {
    #[serde(rename = "User")]
    #[sqlx(flatten)]
    pub user: BookerIdentity,
    pub id: Uuid,
    pub spot_id: Uuid,
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BookerIdentity {
    #[sqlx(rename = "booker_id")]
    pub id: Uuid,
    #[sqlx(rename = "booker_first_name")]
    pub first_name: String,
    #[sqlx(rename = "booker_last_name")]
    pub last_name: String,
}

/// Booking as seen by non-owners: dates only, no identity disclosure.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPublic {
    pub spot_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl From<&Booking> for BookingPublic {
    fn from(b: &Booking) -> Self {
        BookingPublic {
            spot_id: b.spot_id,
            start_date: b.start_date,
            end_date: b.end_date,
        }
    }
}

/// Flat row for the current user's bookings with the spot and its preview
/// image joined in one query.
#[derive(Debug, FromRow)]
pub struct BookingCurrentRow {
    pub id: Uuid,
    pub spot_id: Uuid,
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub spot_owner_id: Uuid,
    pub spot_address: String,
    pub spot_city: String,
    pub spot_state: String,
    pub spot_country: String,
    pub spot_lat: f64,
    pub spot_lng: f64,
    pub spot_name: String,
    pub spot_price: f64,
    pub preview_image: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingWithSpot {
    pub id: Uuid,
    pub spot_id: Uuid,
    #[serde(rename = "Spot")]
    pub spot: BookedSpot,
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedSpot {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
    pub name: String,
    pub price: f64,
    pub preview_image: Option<String>,
}

impl From<BookingCurrentRow> for BookingWithSpot {
    fn from(row: BookingCurrentRow) -> Self {
        BookingWithSpot {
            id: row.id,
            spot_id: row.spot_id,
            spot: BookedSpot {
                id: row.spot_id,
                owner_id: row.spot_owner_id,
                address: row.spot_address,
                city: row.spot_city,
                state: row.spot_state,
                country: row.spot_country,
                lat: row.spot_lat,
                lng: row.spot_lng,
                name: row.spot_name,
                price: row.spot_price,
                preview_image: row.preview_image,
            },
            user_id: row.user_id,
            start_date: row.start_date,
            end_date: row.end_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug)]
pub struct BookingInsert {
    pub spot_id: Uuid,
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDatesRequest {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl BookingDatesRequest {
    /// Collects every applicable failure rather than short-circuiting, so the
    /// response carries a complete per-field error map.
    pub fn validate_range(&self, today: NaiveDate) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.start_date.is_none() {
            errors.push(FieldError::new("startDate", "startDate is required"));
        }
        if self.end_date.is_none() {
            errors.push(FieldError::new("endDate", "endDate is required"));
        }

        if let Some(start) = self.start_date {
            if start < today {
                errors.push(FieldError::new("startDate", "startDate cannot be in the past"));
            }
            if let Some(end) = self.end_date {
                if end <= start {
                    errors.push(FieldError::new(
                        "endDate",
                        "endDate cannot be on or before startDate",
                    ));
                }
            }
        }

        errors
    }

    /// Validated dates, or the collected field errors.
    pub fn into_dates(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), Vec<FieldError>> {
        let errors = self.validate_range(today);
        if errors.is_empty() {
            // Both present when no errors were collected.
            Ok((self.start_date.unwrap(), self.end_date.unwrap()))
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn request(start: Option<&str>, end: Option<&str>) -> BookingDatesRequest {
        BookingDatesRequest {
            start_date: start.map(date),
            end_date: end.map(date),
        }
    }

    #[test]
    fn missing_dates_collect_both_errors() {
        let errors = request(None, None).validate_range(date("2025-06-01"));
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.field == "startDate"));
        assert!(errors.iter().any(|e| e.field == "endDate"));
    }

    #[test]
    fn past_start_rejected_regardless_of_end() {
        let today = date("2025-06-01");
        let errors = request(Some("2025-05-20"), Some("2025-07-01")).validate_range(today);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "startDate");
        assert_eq!(errors[0].message, "startDate cannot be in the past");
    }

    #[test]
    fn end_on_or_before_start_rejected() {
        let today = date("2025-06-01");
        let same_day = request(Some("2025-06-10"), Some("2025-06-10")).validate_range(today);
        assert_eq!(same_day.len(), 1);
        assert_eq!(same_day[0].field, "endDate");

        let inverted = request(Some("2025-06-10"), Some("2025-06-05")).validate_range(today);
        assert_eq!(inverted.len(), 1);
    }

    #[test]
    fn past_start_and_inverted_range_reported_together() {
        let today = date("2025-06-01");
        let errors = request(Some("2025-05-20"), Some("2025-05-10")).validate_range(today);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn valid_range_passes() {
        let today = date("2025-06-01");
        let dates = request(Some("2025-06-01"), Some("2025-06-05")).into_dates(today);
        assert!(dates.is_ok());
    }

    #[test]
    fn booking_lifecycle_boundaries() {
        let b = Booking {
            id: Uuid::new_v4(),
            spot_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            start_date: date("2025-06-10"),
            end_date: date("2025-06-15"),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        // Future
        assert!(!b.has_started(date("2025-06-09")));
        // Active from the start date
        assert!(b.has_started(date("2025-06-10")));
        assert!(!b.has_ended(date("2025-06-15")));
        // Past only after the end date
        assert!(b.has_ended(date("2025-06-16")));
    }
}
