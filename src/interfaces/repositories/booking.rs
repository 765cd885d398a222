use async_trait::async_trait;
use chrono::NaiveDate;
#[cfg(test)]
use mockall::automock;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    domain::conflict,
    entities::booking::{
        Booking, BookingCurrentRow, BookingInsert, BookingWithSpotOwner, BookingWithUser,
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxBookingRepo,
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn get_booking(&self, id: &Uuid) -> Result<Option<BookingWithSpotOwner>, AppError>;
    async fn list_for_spot(&self, spot_id: &Uuid) -> Result<Vec<Booking>, AppError>;
    async fn list_for_spot_with_users(
        &self,
        spot_id: &Uuid,
    ) -> Result<Vec<BookingWithUser>, AppError>;
    async fn list_by_user(&self, user_id: &Uuid) -> Result<Vec<BookingCurrentRow>, AppError>;
    /// Conflict check and insert in one transaction under a per-spot lock.
    async fn create_booking(&self, booking: &BookingInsert) -> Result<Booking, AppError>;
    /// Conflict check (excluding the booking itself) and update in one
    /// transaction under the same per-spot lock.
    async fn update_booking(
        &self,
        id: &Uuid,
        spot_id: &Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Booking, AppError>;
    async fn delete_booking(&self, id: &Uuid) -> Result<(), AppError>;
}

impl SqlxBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxBookingRepo { pool }
    }
}

/// Serializes all booking writes for one spot. Concurrent writers on the same
/// spot queue here, so the conflict check below sees every committed booking.
async fn lock_spot(tx: &mut Transaction<'_, Postgres>, spot_id: &Uuid) -> Result<(), AppError> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
        .bind(spot_id.to_string())
        .execute(&mut **tx)
        .await?;
    Ok(())
}

async fn bookings_for_spot(
    tx: &mut Transaction<'_, Postgres>,
    spot_id: &Uuid,
) -> Result<Vec<Booking>, AppError> {
    let bookings = sqlx::query_as::<_, Booking>(
        "SELECT * FROM bookings WHERE spot_id = $1 ORDER BY start_date",
    )
    .bind(spot_id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(bookings)
}

#[async_trait]
impl BookingRepository for SqlxBookingRepo {
    async fn get_booking(&self, id: &Uuid) -> Result<Option<BookingWithSpotOwner>, AppError> {
        let booking = sqlx::query_as::<_, BookingWithSpotOwner>(
            r#"
            SELECT b.*, s.owner_id AS spot_owner_id
            FROM bookings b
            JOIN spots s ON s.id = b.spot_id
            WHERE b.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    async fn list_for_spot(&self, spot_id: &Uuid) -> Result<Vec<Booking>, AppError> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE spot_id = $1 ORDER BY start_date",
        )
        .bind(spot_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    async fn list_for_spot_with_users(
        &self,
        spot_id: &Uuid,
    ) -> Result<Vec<BookingWithUser>, AppError> {
        let bookings = sqlx::query_as::<_, BookingWithUser>(
            r#"
            SELECT b.id, b.spot_id, b.user_id, b.start_date, b.end_date,
                   b.created_at, b.updated_at,
                   u.id AS booker_id, u.first_name AS booker_first_name,
                   u.last_name AS booker_last_name
            FROM bookings b
            JOIN users u ON u.id = b.user_id
            WHERE b.spot_id = $1
            ORDER BY b.start_date
            "#,
        )
        .bind(spot_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    async fn list_by_user(&self, user_id: &Uuid) -> Result<Vec<BookingCurrentRow>, AppError> {
        let bookings = sqlx::query_as::<_, BookingCurrentRow>(
            r#"
            SELECT b.id, b.spot_id, b.user_id, b.start_date, b.end_date,
                   b.created_at, b.updated_at,
                   s.owner_id AS spot_owner_id, s.address AS spot_address,
                   s.city AS spot_city, s.state AS spot_state,
                   s.country AS spot_country, s.lat AS spot_lat,
                   s.lng AS spot_lng, s.name AS spot_name, s.price AS spot_price,
                   (SELECT si.url FROM spot_images si
                     WHERE si.spot_id = s.id AND si.preview
                     ORDER BY si.id LIMIT 1) AS preview_image
            FROM bookings b
            JOIN spots s ON s.id = b.spot_id
            WHERE b.user_id = $1
            ORDER BY b.start_date
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    async fn create_booking(&self, booking: &BookingInsert) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::from)?;
        lock_spot(&mut tx, &booking.spot_id).await?;

        let existing = bookings_for_spot(&mut tx, &booking.spot_id).await?;
        if let Some(flags) =
            conflict::evaluate(&existing, booking.start_date, booking.end_date, None)
        {
            return Err(AppError::BookingConflict(flags));
        }

        let created = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (id, spot_id, user_id, start_date, end_date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(booking.spot_id)
        .bind(booking.user_id)
        .bind(booking.start_date)
        .bind(booking.end_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await.map_err(AppError::from)?;
        Ok(created)
    }

    async fn update_booking(
        &self,
        id: &Uuid,
        spot_id: &Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::from)?;
        lock_spot(&mut tx, spot_id).await?;

        let existing = bookings_for_spot(&mut tx, spot_id).await?;
        if let Some(flags) = conflict::evaluate(&existing, start_date, end_date, Some(*id)) {
            return Err(AppError::BookingConflict(flags));
        }

        let updated = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET start_date = $1, end_date = $2, updated_at = NOW()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(start_date)
        .bind(end_date)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await.map_err(AppError::from)?;
        Ok(updated)
    }

    async fn delete_booking(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Booking"));
        }

        Ok(())
    }
}
