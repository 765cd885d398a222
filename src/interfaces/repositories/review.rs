use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::review::{Review, ReviewAuthorRow, ReviewCurrentRow, ReviewInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxReviewRepo,
};

/// Review count and average stars for a spot's detail view.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct RatingSummary {
    pub num_reviews: i64,
    pub avg_star_rating: Option<f64>,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn create_review(&self, review: &ReviewInsert) -> Result<Review, AppError>;
    async fn get_review(&self, id: &Uuid) -> Result<Option<Review>, AppError>;
    async fn review_exists(&self, user_id: &Uuid, spot_id: &Uuid) -> Result<bool, AppError>;
    async fn list_for_spot(&self, spot_id: &Uuid) -> Result<Vec<ReviewAuthorRow>, AppError>;
    async fn list_by_user(&self, user_id: &Uuid) -> Result<Vec<ReviewCurrentRow>, AppError>;
    async fn update_review(&self, id: &Uuid, body: &str, stars: i32) -> Result<Review, AppError>;
    async fn delete_review(&self, id: &Uuid) -> Result<(), AppError>;
    async fn rating_summary(&self, spot_id: &Uuid) -> Result<RatingSummary, AppError>;
}

impl SqlxReviewRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxReviewRepo { pool }
    }
}

#[async_trait]
impl ReviewRepository for SqlxReviewRepo {
    async fn create_review(&self, review: &ReviewInsert) -> Result<Review, AppError> {
        let created = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (id, spot_id, user_id, body, stars, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(review.spot_id)
        .bind(review.user_id)
        .bind(&review.body)
        .bind(review.stars)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // One review per (user, spot), backed by a unique index.
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("reviews_user_id_spot_id_key") {
                    return AppError::Duplicate {
                        message: "User already has a review for this spot".into(),
                        errors: Vec::new(),
                    };
                }
            }
            AppError::from(e)
        })?;

        Ok(created)
    }

    async fn get_review(&self, id: &Uuid) -> Result<Option<Review>, AppError> {
        let review = sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(review)
    }

    async fn review_exists(&self, user_id: &Uuid, spot_id: &Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM reviews WHERE user_id = $1 AND spot_id = $2)",
        )
        .bind(user_id)
        .bind(spot_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn list_for_spot(&self, spot_id: &Uuid) -> Result<Vec<ReviewAuthorRow>, AppError> {
        let reviews = sqlx::query_as::<_, ReviewAuthorRow>(
            r#"
            SELECT r.id, r.spot_id, r.user_id, r.body, r.stars,
                   r.created_at, r.updated_at,
                   u.first_name AS author_first_name, u.last_name AS author_last_name
            FROM reviews r
            JOIN users u ON u.id = r.user_id
            WHERE r.spot_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(spot_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    async fn list_by_user(&self, user_id: &Uuid) -> Result<Vec<ReviewCurrentRow>, AppError> {
        let reviews = sqlx::query_as::<_, ReviewCurrentRow>(
            r#"
            SELECT r.id, r.spot_id, r.user_id, r.body, r.stars,
                   r.created_at, r.updated_at,
                   s.owner_id AS spot_owner_id, s.address AS spot_address,
                   s.city AS spot_city, s.state AS spot_state,
                   s.country AS spot_country, s.lat AS spot_lat,
                   s.lng AS spot_lng, s.name AS spot_name, s.price AS spot_price,
                   (SELECT si.url FROM spot_images si
                     WHERE si.spot_id = s.id AND si.preview
                     ORDER BY si.id LIMIT 1) AS preview_image
            FROM reviews r
            JOIN spots s ON s.id = r.spot_id
            WHERE r.user_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    async fn update_review(&self, id: &Uuid, body: &str, stars: i32) -> Result<Review, AppError> {
        let updated = sqlx::query_as::<_, Review>(
            r#"
            UPDATE reviews
            SET body = $1, stars = $2, updated_at = NOW()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(body)
        .bind(stars)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete_review(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Review"));
        }

        Ok(())
    }

    async fn rating_summary(&self, spot_id: &Uuid) -> Result<RatingSummary, AppError> {
        let summary = sqlx::query_as::<_, RatingSummary>(
            r#"
            SELECT COUNT(*) AS num_reviews, AVG(stars)::float8 AS avg_star_rating
            FROM reviews
            WHERE spot_id = $1
            "#,
        )
        .bind(spot_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(summary)
    }
}
