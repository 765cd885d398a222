use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::FieldError;

const MAX_NAME_LENGTH: usize = 50;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Spot {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing projection: spot plus aggregated rating and the first preview
/// image, both computed in SQL.
#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SpotSummary {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub avg_rating: Option<f64>,
    pub preview_image: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotDetail {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub num_reviews: i64,
    pub avg_star_rating: Option<f64>,
    #[serde(rename = "SpotImages")]
    pub spot_images: Vec<crate::entities::image::SpotImage>,
    #[serde(rename = "Owner")]
    pub owner: SpotOwner,
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SpotOwner {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug)]
pub struct SpotInsert {
    pub owner_id: Uuid,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
    pub name: String,
    pub description: String,
    pub price: f64,
}

/// Create/update payload. Fields are optional so that every missing or
/// out-of-range field is reported at once in the 400 error map.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotRequest {
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
}

impl SpotRequest {
    pub fn validate_fields(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if is_blank(&self.address) {
            errors.push(FieldError::new("address", "Street address is required"));
        }
        if is_blank(&self.city) {
            errors.push(FieldError::new("city", "City is required"));
        }
        if is_blank(&self.state) {
            errors.push(FieldError::new("state", "State is required"));
        }
        if is_blank(&self.country) {
            errors.push(FieldError::new("country", "Country is required"));
        }
        match self.lat {
            Some(lat) if (-90.0..=90.0).contains(&lat) => {}
            _ => errors.push(FieldError::new("lat", "Latitude must be within -90 and 90")),
        }
        match self.lng {
            Some(lng) if (-180.0..=180.0).contains(&lng) => {}
            _ => errors.push(FieldError::new("lng", "Longitude must be within -180 and 180")),
        }
        match &self.name {
            Some(name) if !name.trim().is_empty() && name.chars().count() <= MAX_NAME_LENGTH => {}
            _ => errors.push(FieldError::new("name", "Name must be less than 50 characters")),
        }
        if is_blank(&self.description) {
            errors.push(FieldError::new("description", "Description is required"));
        }
        match self.price {
            Some(price) if price > 0.0 => {}
            _ => errors.push(FieldError::new(
                "price",
                "Price per day must be a positive number",
            )),
        }

        errors
    }

    /// Validated insert payload for `owner_id`, or the collected field errors.
    pub fn into_insert(self, owner_id: Uuid) -> Result<SpotInsert, Vec<FieldError>> {
        let errors = self.validate_fields();
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(SpotInsert {
            owner_id,
            address: self.address.unwrap(),
            city: self.city.unwrap(),
            state: self.state.unwrap(),
            country: self.country.unwrap(),
            lat: self.lat.unwrap(),
            lng: self.lng.unwrap(),
            name: self.name.unwrap(),
            description: self.description.unwrap(),
            price: self.price.unwrap(),
        })
    }
}

fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, |s| s.trim().is_empty())
}

/// Listing filters and pagination, all optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotFilters {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub min_lat: Option<f64>,
    pub max_lat: Option<f64>,
    pub min_lng: Option<f64>,
    pub max_lng: Option<f64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl SpotFilters {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn size(&self) -> u32 {
        self.size.unwrap_or(20).clamp(1, 100)
    }
}
