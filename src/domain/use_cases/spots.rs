use uuid::Uuid;

use crate::domain::policy;
use crate::entities::image::SpotImage;
use crate::entities::spot::{Spot, SpotDetail, SpotFilters, SpotOwner, SpotRequest, SpotSummary};
use crate::errors::AppError;
use crate::interfaces::repositories::image::ImageRepository;
use crate::interfaces::repositories::review::ReviewRepository;
use crate::interfaces::repositories::spot::SpotRepository;
use crate::interfaces::repositories::user::UserRepository;

pub struct SpotHandler<S, I, R, U>
where
    S: SpotRepository,
    I: ImageRepository,
    R: ReviewRepository,
    U: UserRepository,
{
    pub spot_repo: S,
    pub image_repo: I,
    pub review_repo: R,
    pub user_repo: U,
}

impl<S, I, R, U> SpotHandler<S, I, R, U>
where
    S: SpotRepository,
    I: ImageRepository,
    R: ReviewRepository,
    U: UserRepository,
{
    pub fn new(spot_repo: S, image_repo: I, review_repo: R, user_repo: U) -> Self {
        SpotHandler {
            spot_repo,
            image_repo,
            review_repo,
            user_repo,
        }
    }

    pub async fn create(&self, actor: Uuid, request: SpotRequest) -> Result<Spot, AppError> {
        let insert = request.into_insert(actor).map_err(AppError::Validation)?;
        self.spot_repo.create_spot(&insert).await
    }

    pub async fn list(&self, filters: &SpotFilters) -> Result<Vec<SpotSummary>, AppError> {
        self.spot_repo.list_spots(filters).await
    }

    pub async fn list_own(&self, actor: &Uuid) -> Result<Vec<SpotSummary>, AppError> {
        self.spot_repo.list_spots_by_owner(actor).await
    }

    /// Spot detail assembled from explicit queries: the spot, its images, its
    /// owner, and the review aggregate.
    pub async fn detail(&self, spot_id: &Uuid) -> Result<SpotDetail, AppError> {
        let spot = self
            .spot_repo
            .get_spot(spot_id)
            .await?
            .ok_or_else(|| AppError::not_found("Spot"))?;

        let images = self.image_repo.list_spot_images(spot_id).await?;
        let ratings = self.review_repo.rating_summary(spot_id).await?;
        let owner = self
            .user_repo
            .get_by_id(&spot.owner_id)
            .await?
            .ok_or_else(|| AppError::Internal("Spot owner missing".into()))?;

        Ok(SpotDetail {
            id: spot.id,
            owner_id: spot.owner_id,
            address: spot.address,
            city: spot.city,
            state: spot.state,
            country: spot.country,
            lat: spot.lat,
            lng: spot.lng,
            name: spot.name,
            description: spot.description,
            price: spot.price,
            created_at: spot.created_at,
            updated_at: spot.updated_at,
            num_reviews: ratings.num_reviews,
            avg_star_rating: ratings.avg_star_rating,
            spot_images: images,
            owner: SpotOwner {
                id: owner.id,
                first_name: owner.first_name,
                last_name: owner.last_name,
            },
        })
    }

    pub async fn update(
        &self,
        actor: Uuid,
        spot_id: &Uuid,
        request: SpotRequest,
    ) -> Result<Spot, AppError> {
        let spot = self.spot_repo.get_spot(spot_id).await?;
        policy::spot_mutation(actor, spot.map(|s| s.owner_id)).require("Spot")?;

        let insert = request.into_insert(actor).map_err(AppError::Validation)?;
        self.spot_repo.update_spot(spot_id, &insert).await
    }

    pub async fn delete(&self, actor: Uuid, spot_id: &Uuid) -> Result<(), AppError> {
        let spot = self.spot_repo.get_spot(spot_id).await?;
        policy::spot_mutation(actor, spot.map(|s| s.owner_id)).require("Spot")?;

        self.spot_repo.delete_spot(spot_id).await
    }

    pub async fn add_image(
        &self,
        actor: Uuid,
        spot_id: &Uuid,
        url: String,
        preview: bool,
    ) -> Result<SpotImage, AppError> {
        let spot = self.spot_repo.get_spot(spot_id).await?;
        policy::spot_mutation(actor, spot.map(|s| s.owner_id)).require("Spot")?;

        self.image_repo.create_spot_image(spot_id, &url, preview).await
    }

    pub async fn delete_image(&self, actor: Uuid, image_id: &Uuid) -> Result<(), AppError> {
        let image = self.image_repo.get_spot_image(image_id).await?;
        match image {
            None => Err(AppError::not_found("Spot Image")),
            Some(image) => {
                policy::spot_mutation(actor, Some(image.spot_owner_id)).require("Spot Image")?;
                self.image_repo.delete_spot_image(image_id).await
            }
        }
    }
}
