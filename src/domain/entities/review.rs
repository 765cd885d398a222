use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::entities::image::ReviewImage;
use crate::errors::FieldError;

pub const MAX_REVIEW_IMAGES: i64 = 10;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub spot_id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "review")]
    pub body: String,
    pub stars: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct ReviewAuthorRow {
    pub id: Uuid,
    pub spot_id: Uuid,
    pub user_id: Uuid,
    pub body: String,
    pub stars: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_first_name: String,
    pub author_last_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewWithUser {
    pub id: Uuid,
    pub spot_id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "review")]
    pub body: String,
    pub stars: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "User")]
    pub user: ReviewAuthor,
    #[serde(rename = "ReviewImages")]
    pub review_images: Vec<ReviewImage>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewAuthor {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

impl ReviewAuthorRow {
    pub fn with_images(self, review_images: Vec<ReviewImage>) -> ReviewWithUser {
        ReviewWithUser {
            id: self.id,
            spot_id: self.spot_id,
            user: ReviewAuthor {
                id: self.user_id,
                first_name: self.author_first_name,
                last_name: self.author_last_name,
            },
            user_id: self.user_id,
            body: self.body,
            stars: self.stars,
            created_at: self.created_at,
            updated_at: self.updated_at,
            review_images,
        }
    }
}

/// Flat row for the current user's reviews with the reviewed spot and its
/// preview image joined in one query.
#[derive(Debug, FromRow)]
pub struct ReviewCurrentRow {
    pub id: Uuid,
    pub spot_id: Uuid,
    pub user_id: Uuid,
    pub body: String,
    pub stars: i32,
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
pub struct ReviewWithSpot {
    pub id: Uuid,
    pub spot_id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "review")]
    pub body: String,
    pub stars: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "Spot")]
    pub spot: ReviewedSpot,
    #[serde(rename = "ReviewImages")]
    pub review_images: Vec<ReviewImage>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewedSpot {
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

impl ReviewCurrentRow {
    pub fn with_images(self, review_images: Vec<ReviewImage>) -> ReviewWithSpot {
        ReviewWithSpot {
            id: self.id,
            spot_id: self.spot_id,
            user_id: self.user_id,
            body: self.body,
            stars: self.stars,
            created_at: self.created_at,
            updated_at: self.updated_at,
            spot: ReviewedSpot {
                id: self.spot_id,
                owner_id: self.spot_owner_id,
                address: self.spot_address,
                city: self.spot_city,
                state: self.spot_state,
                country: self.spot_country,
                lat: self.spot_lat,
                lng: self.spot_lng,
                name: self.spot_name,
                price: self.spot_price,
                preview_image: self.preview_image,
            },
            review_images,
        }
    }
}

#[derive(Debug)]
pub struct ReviewInsert {
    pub spot_id: Uuid,
    pub user_id: Uuid,
    pub body: String,
    pub stars: i32,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    #[serde(rename = "review")]
    pub body: Option<String>,
    pub stars: Option<i32>,
}

impl ReviewRequest {
    pub fn validate_fields(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.body.as_deref().map_or(true, |s| s.trim().is_empty()) {
            errors.push(FieldError::new("review", "Review text is required"));
        }
        match self.stars {
            Some(stars) if (1..=5).contains(&stars) => {}
            _ => errors.push(FieldError::new(
                "stars",
                "Stars must be an integer from 1 to 5",
            )),
        }

        errors
    }

    pub fn into_parts(self) -> Result<(String, i32), Vec<FieldError>> {
        let errors = self.validate_fields();
        if errors.is_empty() {
            Ok((self.body.unwrap(), self.stars.unwrap()))
        } else {
            Err(errors)
        }
    }
}
