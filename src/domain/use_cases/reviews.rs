use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::policy;
use crate::entities::image::ReviewImage;
use crate::entities::review::{
    Review, ReviewInsert, ReviewRequest, ReviewWithSpot, ReviewWithUser, MAX_REVIEW_IMAGES,
};
use crate::errors::AppError;
use crate::interfaces::repositories::image::ImageRepository;
use crate::interfaces::repositories::review::ReviewRepository;
use crate::interfaces::repositories::spot::SpotRepository;

pub struct ReviewHandler<R, S, I>
where
    R: ReviewRepository,
    S: SpotRepository,
    I: ImageRepository,
{
    pub review_repo: R,
    pub spot_repo: S,
    pub image_repo: I,
}

impl<R, S, I> ReviewHandler<R, S, I>
where
    R: ReviewRepository,
    S: SpotRepository,
    I: ImageRepository,
{
    pub fn new(review_repo: R, spot_repo: S, image_repo: I) -> Self {
        ReviewHandler {
            review_repo,
            spot_repo,
            image_repo,
        }
    }

    pub async fn create(
        &self,
        actor: Uuid,
        spot_id: &Uuid,
        request: ReviewRequest,
    ) -> Result<Review, AppError> {
        let (body, stars) = request.into_parts().map_err(AppError::Validation)?;

        if self.spot_repo.get_spot(spot_id).await?.is_none() {
            return Err(AppError::not_found("Spot"));
        }

        if self.review_repo.review_exists(&actor, spot_id).await? {
            return Err(AppError::Duplicate {
                message: "User already has a review for this spot".into(),
                errors: Vec::new(),
            });
        }

        self.review_repo
            .create_review(&ReviewInsert {
                spot_id: *spot_id,
                user_id: actor,
                body,
                stars,
            })
            .await
    }

    pub async fn list_for_spot(&self, spot_id: &Uuid) -> Result<Vec<ReviewWithUser>, AppError> {
        if self.spot_repo.get_spot(spot_id).await?.is_none() {
            return Err(AppError::not_found("Spot"));
        }

        let rows = self.review_repo.list_for_spot(spot_id).await?;
        let mut images = self
            .images_by_review(rows.iter().map(|r| r.id).collect())
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let review_images = images.remove(&row.id).unwrap_or_default();
                row.with_images(review_images)
            })
            .collect())
    }

    pub async fn list_current(&self, actor: &Uuid) -> Result<Vec<ReviewWithSpot>, AppError> {
        let rows = self.review_repo.list_by_user(actor).await?;
        let mut images = self
            .images_by_review(rows.iter().map(|r| r.id).collect())
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let review_images = images.remove(&row.id).unwrap_or_default();
                row.with_images(review_images)
            })
            .collect())
    }

    pub async fn update(
        &self,
        actor: Uuid,
        review_id: &Uuid,
        request: ReviewRequest,
    ) -> Result<Review, AppError> {
        let (body, stars) = request.into_parts().map_err(AppError::Validation)?;

        let review = self.review_repo.get_review(review_id).await?;
        policy::review_mutation(actor, review.map(|r| r.user_id)).require("Review")?;

        self.review_repo.update_review(review_id, &body, stars).await
    }

    pub async fn delete(&self, actor: Uuid, review_id: &Uuid) -> Result<(), AppError> {
        let review = self.review_repo.get_review(review_id).await?;
        policy::review_mutation(actor, review.map(|r| r.user_id)).require("Review")?;

        self.review_repo.delete_review(review_id).await
    }

    pub async fn add_image(
        &self,
        actor: Uuid,
        review_id: &Uuid,
        url: String,
    ) -> Result<ReviewImage, AppError> {
        let review = self.review_repo.get_review(review_id).await?;
        policy::review_mutation(actor, review.map(|r| r.user_id)).require("Review")?;

        if self.image_repo.count_review_images(review_id).await? >= MAX_REVIEW_IMAGES {
            return Err(AppError::Forbidden(
                "Maximum number of images for this resource was reached".into(),
            ));
        }

        self.image_repo.create_review_image(review_id, &url).await
    }

    pub async fn delete_image(&self, actor: Uuid, image_id: &Uuid) -> Result<(), AppError> {
        let image = self.image_repo.get_review_image(image_id).await?;
        match image {
            None => Err(AppError::not_found("Review Image")),
            Some(image) => {
                policy::review_mutation(actor, Some(image.review_author_id))
                    .require("Review Image")?;
                self.image_repo.delete_review_image(image_id).await
            }
        }
    }

    async fn images_by_review(
        &self,
        review_ids: Vec<Uuid>,
    ) -> Result<HashMap<Uuid, Vec<ReviewImage>>, AppError> {
        let images = self.image_repo.list_review_images(review_ids).await?;
        let mut by_review: HashMap<Uuid, Vec<ReviewImage>> = HashMap::new();
        for image in images {
            by_review.entry(image.review_id).or_default().push(image);
        }
        Ok(by_review)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::entities::spot::Spot;
    use crate::interfaces::repositories::image::MockImageRepository;
    use crate::interfaces::repositories::review::MockReviewRepository;
    use crate::interfaces::repositories::spot::MockSpotRepository;

    fn any_spot() -> Spot {
        Spot {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            address: "123 Disney Lane".into(),
            city: "San Francisco".into(),
            state: "California".into(),
            country: "United States".into(),
            lat: 37.76,
            lng: -122.47,
            name: "App Academy".into(),
            description: "Place where web developers are created".into(),
            price: 123.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn review_by(user_id: Uuid) -> Review {
        Review {
            id: Uuid::new_v4(),
            spot_id: Uuid::new_v4(),
            user_id,
            body: "Lovely stay".into(),
            stars: 5,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn request(body: &str, stars: i32) -> ReviewRequest {
        ReviewRequest {
            body: Some(body.into()),
            stars: Some(stars),
        }
    }

    #[tokio::test]
    async fn second_review_for_same_spot_is_a_duplicate() {
        let actor = Uuid::new_v4();
        let spot = any_spot();
        let spot_id = spot.id;

        let mut spot_repo = MockSpotRepository::new();
        spot_repo
            .expect_get_spot()
            .returning(move |_| Ok(Some(spot.clone())));
        let mut review_repo = MockReviewRepository::new();
        review_repo.expect_review_exists().returning(|_, _| Ok(true));
        review_repo.expect_create_review().never();

        let handler = ReviewHandler::new(review_repo, spot_repo, MockImageRepository::new());
        let result = handler.create(actor, &spot_id, request("Great", 5)).await;

        assert!(matches!(
            result,
            Err(AppError::Duplicate { message, .. })
                if message == "User already has a review for this spot"
        ));
    }

    #[tokio::test]
    async fn non_author_cannot_edit_a_review() {
        let author = Uuid::new_v4();
        let review = review_by(author);
        let review_id = review.id;

        let mut review_repo = MockReviewRepository::new();
        review_repo
            .expect_get_review()
            .returning(move |_| Ok(Some(review.clone())));
        review_repo.expect_update_review().never();

        let handler = ReviewHandler::new(
            review_repo,
            MockSpotRepository::new(),
            MockImageRepository::new(),
        );
        let result = handler
            .update(Uuid::new_v4(), &review_id, request("Edited", 4))
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn image_cap_is_enforced() {
        let author = Uuid::new_v4();
        let review = review_by(author);
        let review_id = review.id;

        let mut review_repo = MockReviewRepository::new();
        review_repo
            .expect_get_review()
            .returning(move |_| Ok(Some(review.clone())));
        let mut image_repo = MockImageRepository::new();
        image_repo
            .expect_count_review_images()
            .returning(|_| Ok(MAX_REVIEW_IMAGES));
        image_repo.expect_create_review_image().never();

        let handler = ReviewHandler::new(review_repo, MockSpotRepository::new(), image_repo);
        let result = handler
            .add_image(author, &review_id, "https://example.com/a.png".into())
            .await;

        assert!(matches!(
            result,
            Err(AppError::Forbidden(msg))
                if msg == "Maximum number of images for this resource was reached"
        ));
    }

    #[tokio::test]
    async fn review_for_missing_spot_is_not_found() {
        let mut spot_repo = MockSpotRepository::new();
        spot_repo.expect_get_spot().returning(|_| Ok(None));
        let mut review_repo = MockReviewRepository::new();
        review_repo.expect_review_exists().never();

        let handler = ReviewHandler::new(review_repo, spot_repo, MockImageRepository::new());
        let result = handler
            .create(Uuid::new_v4(), &Uuid::new_v4(), request("Great", 5))
            .await;

        assert!(matches!(
            result,
            Err(AppError::NotFound(msg)) if msg == "Spot couldn't be found"
        ));
    }
}
