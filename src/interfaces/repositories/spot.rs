use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::{
    entities::spot::{Spot, SpotFilters, SpotInsert, SpotSummary},
    errors::AppError,
    repositories::sqlx_repo::SqlxSpotRepo,
};

/// OFFSET from 1-based `page` and `size`.
fn page_offset(page: u32, size: u32) -> i64 {
    let page = page.saturating_sub(1);
    (page as i64) * (size as i64)
}

const SUMMARY_SELECT: &str = r#"
SELECT s.id, s.owner_id, s.address, s.city, s.state, s.country, s.lat, s.lng,
       s.name, s.description, s.price, s.created_at, s.updated_at,
       (SELECT AVG(r.stars)::float8 FROM reviews r WHERE r.spot_id = s.id) AS avg_rating,
       (SELECT si.url FROM spot_images si
         WHERE si.spot_id = s.id AND si.preview
         ORDER BY si.id LIMIT 1) AS preview_image
FROM spots s
"#;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait SpotRepository: Send + Sync {
    async fn create_spot(&self, spot: &SpotInsert) -> Result<Spot, AppError>;
    async fn get_spot(&self, id: &Uuid) -> Result<Option<Spot>, AppError>;
    async fn list_spots(&self, filters: &SpotFilters) -> Result<Vec<SpotSummary>, AppError>;
    async fn list_spots_by_owner(&self, owner_id: &Uuid) -> Result<Vec<SpotSummary>, AppError>;
    async fn update_spot(&self, id: &Uuid, spot: &SpotInsert) -> Result<Spot, AppError>;
    async fn delete_spot(&self, id: &Uuid) -> Result<(), AppError>;
}

impl SqlxSpotRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxSpotRepo { pool }
    }
}

#[async_trait]
impl SpotRepository for SqlxSpotRepo {
    async fn create_spot(&self, spot: &SpotInsert) -> Result<Spot, AppError> {
        let created = sqlx::query_as::<_, Spot>(
            r#"
            INSERT INTO spots (id, owner_id, address, city, state, country, lat, lng,
                               name, description, price, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(spot.owner_id)
        .bind(&spot.address)
        .bind(&spot.city)
        .bind(&spot.state)
        .bind(&spot.country)
        .bind(spot.lat)
        .bind(spot.lng)
        .bind(&spot.name)
        .bind(&spot.description)
        .bind(spot.price)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn get_spot(&self, id: &Uuid) -> Result<Option<Spot>, AppError> {
        let spot = sqlx::query_as::<_, Spot>("SELECT * FROM spots WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(spot)
    }

    async fn list_spots(&self, filters: &SpotFilters) -> Result<Vec<SpotSummary>, AppError> {
        let mut builder = QueryBuilder::new(SUMMARY_SELECT);
        builder.push(" WHERE TRUE");

        if let Some(min_lat) = filters.min_lat {
            builder.push(" AND s.lat >= ").push_bind(min_lat);
        }
        if let Some(max_lat) = filters.max_lat {
            builder.push(" AND s.lat <= ").push_bind(max_lat);
        }
        if let Some(min_lng) = filters.min_lng {
            builder.push(" AND s.lng >= ").push_bind(min_lng);
        }
        if let Some(max_lng) = filters.max_lng {
            builder.push(" AND s.lng <= ").push_bind(max_lng);
        }
        if let Some(min_price) = filters.min_price {
            builder.push(" AND s.price >= ").push_bind(min_price);
        }
        if let Some(max_price) = filters.max_price {
            builder.push(" AND s.price <= ").push_bind(max_price);
        }

        builder.push(" ORDER BY s.created_at DESC");
        builder.push(" LIMIT ").push_bind(filters.size() as i64);
        builder
            .push(" OFFSET ")
            .push_bind(page_offset(filters.page(), filters.size()));

        let spots = builder
            .build_query_as::<SpotSummary>()
            .fetch_all(&self.pool)
            .await?;

        Ok(spots)
    }

    async fn list_spots_by_owner(&self, owner_id: &Uuid) -> Result<Vec<SpotSummary>, AppError> {
        let mut builder = QueryBuilder::new(SUMMARY_SELECT);
        builder.push(" WHERE s.owner_id = ").push_bind(*owner_id);
        builder.push(" ORDER BY s.created_at DESC");

        let spots = builder
            .build_query_as::<SpotSummary>()
            .fetch_all(&self.pool)
            .await?;

        Ok(spots)
    }

    async fn update_spot(&self, id: &Uuid, spot: &SpotInsert) -> Result<Spot, AppError> {
        let updated = sqlx::query_as::<_, Spot>(
            r#"
            UPDATE spots SET
                address = $1, city = $2, state = $3, country = $4,
                lat = $5, lng = $6, name = $7, description = $8, price = $9,
                updated_at = NOW()
            WHERE id = $10
            RETURNING *
            "#,
        )
        .bind(&spot.address)
        .bind(&spot.city)
        .bind(&spot.state)
        .bind(&spot.country)
        .bind(spot.lat)
        .bind(spot.lng)
        .bind(&spot.name)
        .bind(&spot.description)
        .bind(spot.price)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete_spot(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM spots WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Spot"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_zero_based_from_one_based_pages() {
        assert_eq!(page_offset(1, 20), 0);
        assert_eq!(page_offset(3, 20), 40);
        // Page 0 is treated as page 1.
        assert_eq!(page_offset(0, 20), 0);
    }
}
