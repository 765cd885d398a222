use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::image::{ReviewImage, ReviewImageWithAuthor, SpotImage, SpotImageWithOwner},
    errors::AppError,
    repositories::sqlx_repo::SqlxImageRepo,
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ImageRepository: Send + Sync {
    async fn create_spot_image(
        &self,
        spot_id: &Uuid,
        url: &str,
        preview: bool,
    ) -> Result<SpotImage, AppError>;
    async fn list_spot_images(&self, spot_id: &Uuid) -> Result<Vec<SpotImage>, AppError>;
    async fn get_spot_image(&self, id: &Uuid) -> Result<Option<SpotImageWithOwner>, AppError>;
    async fn delete_spot_image(&self, id: &Uuid) -> Result<(), AppError>;

    async fn create_review_image(
        &self,
        review_id: &Uuid,
        url: &str,
    ) -> Result<ReviewImage, AppError>;
    async fn count_review_images(&self, review_id: &Uuid) -> Result<i64, AppError>;
    /// Images for a batch of reviews, one query for a whole listing.
    async fn list_review_images(
        &self,
        review_ids: Vec<Uuid>,
    ) -> Result<Vec<ReviewImage>, AppError>;
    async fn get_review_image(&self, id: &Uuid)
        -> Result<Option<ReviewImageWithAuthor>, AppError>;
    async fn delete_review_image(&self, id: &Uuid) -> Result<(), AppError>;
}

impl SqlxImageRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxImageRepo { pool }
    }
}

#[async_trait]
impl ImageRepository for SqlxImageRepo {
    async fn create_spot_image(
        &self,
        spot_id: &Uuid,
        url: &str,
        preview: bool,
    ) -> Result<SpotImage, AppError> {
        let created = sqlx::query_as::<_, SpotImage>(
            r#"
            INSERT INTO spot_images (id, spot_id, url, preview)
            VALUES ($1, $2, $3, $4)
            RETURNING id, spot_id, url, preview
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(spot_id)
        .bind(url)
        .bind(preview)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list_spot_images(&self, spot_id: &Uuid) -> Result<Vec<SpotImage>, AppError> {
        let images = sqlx::query_as::<_, SpotImage>(
            "SELECT id, spot_id, url, preview FROM spot_images WHERE spot_id = $1 ORDER BY id",
        )
        .bind(spot_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(images)
    }

    async fn get_spot_image(&self, id: &Uuid) -> Result<Option<SpotImageWithOwner>, AppError> {
        let image = sqlx::query_as::<_, SpotImageWithOwner>(
            r#"
            SELECT si.id, si.spot_id, si.url, si.preview, s.owner_id AS spot_owner_id
            FROM spot_images si
            JOIN spots s ON s.id = si.spot_id
            WHERE si.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(image)
    }

    async fn delete_spot_image(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM spot_images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Spot Image"));
        }

        Ok(())
    }

    async fn create_review_image(
        &self,
        review_id: &Uuid,
        url: &str,
    ) -> Result<ReviewImage, AppError> {
        let created = sqlx::query_as::<_, ReviewImage>(
            r#"
            INSERT INTO review_images (id, review_id, url)
            VALUES ($1, $2, $3)
            RETURNING id, review_id, url
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(review_id)
        .bind(url)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn count_review_images(&self, review_id: &Uuid) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM review_images WHERE review_id = $1")
                .bind(review_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    async fn list_review_images(
        &self,
        review_ids: Vec<Uuid>,
    ) -> Result<Vec<ReviewImage>, AppError> {
        if review_ids.is_empty() {
            return Ok(Vec::new());
        }

        let images = sqlx::query_as::<_, ReviewImage>(
            "SELECT id, review_id, url FROM review_images WHERE review_id = ANY($1) ORDER BY id",
        )
        .bind(review_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(images)
    }

    async fn get_review_image(
        &self,
        id: &Uuid,
    ) -> Result<Option<ReviewImageWithAuthor>, AppError> {
        let image = sqlx::query_as::<_, ReviewImageWithAuthor>(
            r#"
            SELECT ri.id, ri.review_id, ri.url, r.user_id AS review_author_id
            FROM review_images ri
            JOIN reviews r ON r.id = ri.review_id
            WHERE ri.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(image)
    }

    async fn delete_review_image(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM review_images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Review Image"));
        }

        Ok(())
    }
}
