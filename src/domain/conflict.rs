//! Booking date-range conflict evaluation.
//!
//! Ranges are half-open `[start, end)`: two ranges conflict iff they are not
//! disjoint, `s1 < e2 && s2 < e1`. Back-to-back bookings sharing a boundary
//! day never conflict, so a departing guest's checkout day is bookable.

use chrono::NaiveDate;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::entities::booking::Booking;

/// Which boundary of a proposed range collides with existing bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConflictFlags {
    pub start_date: bool,
    pub end_date: bool,
}

impl ConflictFlags {
    pub fn any(&self) -> bool {
        self.start_date || self.end_date
    }

    /// Field error map for the 403 conflict envelope.
    pub fn to_error_map(&self) -> Value {
        let mut map = serde_json::Map::new();
        if self.start_date {
            map.insert(
                "startDate".into(),
                json!("Start date conflicts with an existing booking"),
            );
        }
        if self.end_date {
            map.insert(
                "endDate".into(),
                json!("End date conflicts with an existing booking"),
            );
        }
        Value::Object(map)
    }
}

pub fn overlaps(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Existing bookings whose ranges overlap `[start, end)`, excluding
/// `exclude_booking_id` (the booking being edited). Pure and order-preserving:
/// the result is determined entirely by the input slice.
pub fn find_conflicts<'a>(
    existing: &'a [Booking],
    start: NaiveDate,
    end: NaiveDate,
    exclude_booking_id: Option<Uuid>,
) -> Vec<&'a Booking> {
    existing
        .iter()
        .filter(|b| Some(b.id) != exclude_booking_id)
        .filter(|b| overlaps(start, end, b.start_date, b.end_date))
        .collect()
}

/// Per-boundary flags for a set of conflicting bookings: the start flag is set
/// when the proposed start falls inside an existing span, the end flag when
/// the proposed end does, and both when the proposal fully contains an
/// existing booking.
pub fn conflict_flags(conflicts: &[&Booking], start: NaiveDate, end: NaiveDate) -> ConflictFlags {
    let mut flags = ConflictFlags {
        start_date: false,
        end_date: false,
    };

    for b in conflicts {
        if b.start_date <= start && start < b.end_date {
            flags.start_date = true;
        }
        if b.start_date < end && end <= b.end_date {
            flags.end_date = true;
        }
        if start <= b.start_date && b.end_date <= end {
            flags.start_date = true;
            flags.end_date = true;
        }
    }

    flags
}

/// Convenience wrapper: evaluate a proposal against a spot's bookings and
/// return the boundary flags when anything collides.
pub fn evaluate(
    existing: &[Booking],
    start: NaiveDate,
    end: NaiveDate,
    exclude_booking_id: Option<Uuid>,
) -> Option<ConflictFlags> {
    let conflicts = find_conflicts(existing, start, end, exclude_booking_id);
    if conflicts.is_empty() {
        return None;
    }
    Some(conflict_flags(&conflicts, start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn booking(start: &str, end: &str) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            spot_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            start_date: date(start),
            end_date: date(end),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn disjoint_ranges_do_not_overlap() {
        assert!(!overlaps(
            date("2024-12-01"),
            date("2024-12-05"),
            date("2024-12-10"),
            date("2024-12-15"),
        ));
    }

    #[test]
    fn shared_boundary_day_is_not_a_conflict() {
        // Checkout day equals the next guest's check-in day.
        assert!(!overlaps(
            date("2024-12-20"),
            date("2024-12-25"),
            date("2024-12-25"),
            date("2024-12-30"),
        ));
    }

    #[test]
    fn gap_between_bookings_is_bookable() {
        let existing = vec![
            booking("2024-12-20", "2024-12-25"),
            booking("2024-12-26", "2024-12-30"),
        ];

        let conflicts = find_conflicts(&existing, date("2024-12-25"), date("2024-12-26"), None);
        assert!(conflicts.is_empty());
    }

    #[test]
    fn spanning_range_sets_both_flags() {
        let existing = vec![
            booking("2024-12-20", "2024-12-25"),
            booking("2024-12-26", "2024-12-30"),
        ];

        let flags = evaluate(&existing, date("2024-12-24"), date("2024-12-27"), None)
            .expect("range overlaps both bookings");
        assert!(flags.start_date);
        assert!(flags.end_date);
    }

    #[test]
    fn start_inside_existing_span_sets_start_flag_only() {
        let existing = vec![booking("2024-12-20", "2024-12-25")];

        let flags = evaluate(&existing, date("2024-12-22"), date("2024-12-28"), None).unwrap();
        assert!(flags.start_date);
        assert!(!flags.end_date);
    }

    #[test]
    fn end_inside_existing_span_sets_end_flag_only() {
        let existing = vec![booking("2024-12-20", "2024-12-25")];

        let flags = evaluate(&existing, date("2024-12-15"), date("2024-12-22"), None).unwrap();
        assert!(!flags.start_date);
        assert!(flags.end_date);
    }

    #[test]
    fn proposal_containing_a_booking_sets_both_flags() {
        let existing = vec![booking("2024-12-20", "2024-12-22")];

        let flags = evaluate(&existing, date("2024-12-18"), date("2024-12-28"), None).unwrap();
        assert!(flags.start_date);
        assert!(flags.end_date);
    }

    #[test]
    fn proposal_inside_a_booking_sets_both_flags() {
        let existing = vec![booking("2024-12-10", "2024-12-30")];

        let flags = evaluate(&existing, date("2024-12-15"), date("2024-12-20"), None).unwrap();
        assert!(flags.start_date);
        assert!(flags.end_date);
    }

    #[test]
    fn edited_booking_is_excluded_from_its_own_conflicts() {
        let existing = vec![booking("2024-12-20", "2024-12-25")];
        let own_id = existing[0].id;

        // Re-saving the same dates for the same booking is not a conflict.
        assert!(evaluate(&existing, date("2024-12-20"), date("2024-12-25"), Some(own_id)).is_none());
        // But it still conflicts with anything else.
        assert!(evaluate(&existing, date("2024-12-20"), date("2024-12-25"), None).is_some());
    }

    #[test]
    fn evaluation_is_deterministic() {
        let existing = vec![
            booking("2024-12-01", "2024-12-05"),
            booking("2024-12-10", "2024-12-15"),
        ];
        let first = evaluate(&existing, date("2024-12-04"), date("2024-12-11"), None);
        let second = evaluate(&existing, date("2024-12-04"), date("2024-12-11"), None);
        assert_eq!(first, second);
    }

    #[test]
    fn error_map_carries_only_set_flags() {
        let flags = ConflictFlags {
            start_date: true,
            end_date: false,
        };
        let map = flags.to_error_map();
        assert!(map.get("startDate").is_some());
        assert!(map.get("endDate").is_none());
    }
}
