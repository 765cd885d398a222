use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use url::Url;
use uuid::Uuid;

use crate::errors::FieldError;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SpotImage {
    pub id: Uuid,
    pub spot_id: Uuid,
    pub url: String,
    pub preview: bool,
}

/// Spot image joined with its spot's owner, for delete authorization.
#[derive(Debug, FromRow)]
pub struct SpotImageWithOwner {
    pub id: Uuid,
    pub spot_id: Uuid,
    pub url: String,
    pub preview: bool,
    pub spot_owner_id: Uuid,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ReviewImage {
    pub id: Uuid,
    pub review_id: Uuid,
    pub url: String,
}

/// Review image joined with its review's author, for delete authorization.
#[derive(Debug, FromRow)]
pub struct ReviewImageWithAuthor {
    pub id: Uuid,
    pub review_id: Uuid,
    pub url: String,
    pub review_author_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct NewSpotImageRequest {
    pub url: Option<String>,
    #[serde(default)]
    pub preview: bool,
}

#[derive(Debug, Deserialize)]
pub struct NewReviewImageRequest {
    pub url: Option<String>,
}

/// Images arrive as plain URLs; accept only absolute http(s) ones.
pub fn validate_image_url(url: &Option<String>) -> Result<String, Vec<FieldError>> {
    let raw = match url.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return Err(vec![FieldError::new("url", "Image url is required")]),
    };

    match Url::parse(raw) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => {
            Ok(raw.to_string())
        }
        _ => Err(vec![FieldError::new("url", "Image url must be a valid URL")]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_http_urls_accepted() {
        assert!(validate_image_url(&Some("https://example.com/a.png".into())).is_ok());
        assert!(validate_image_url(&Some("http://example.com/a.png".into())).is_ok());
    }

    #[test]
    fn missing_and_relative_urls_rejected() {
        assert_eq!(validate_image_url(&None).unwrap_err()[0].field, "url");
        assert!(validate_image_url(&Some("not a url".into())).is_err());
        assert!(validate_image_url(&Some("ftp://example.com/a.png".into())).is_err());
    }
}
