//! Create Review Handler

use std::sync::Arc;

use larder::reviews::ReviewDraft;
use larder_app::domain::reviews::records::ReviewRecord;
use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{extensions::*, reviews::errors::into_status_error, state::State};

/// Create Review Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateReviewRequest {
    /// One to five stars
    pub rating: u8,

    /// At least ten characters once trimmed
    pub comment: String,

    /// Uploaded image references, at most five
    #[serde(default)]
    pub images: Vec<String>,
}

impl From<CreateReviewRequest> for ReviewDraft {
    fn from(request: CreateReviewRequest) -> Self {
        ReviewDraft {
            rating: request.rating,
            comment: request.comment,
            images: request.images,
        }
    }
}

/// Review Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReviewResponse {
    pub uuid: Uuid,
    pub product_uuid: Uuid,
    pub rating: u8,
    pub comment: String,
    pub images: Vec<String>,
    pub created_at: String,
}

impl From<ReviewRecord> for ReviewResponse {
    fn from(review: ReviewRecord) -> Self {
        Self {
            uuid: review.uuid.into_uuid(),
            product_uuid: review.product_uuid.into_uuid(),
            rating: review.rating,
            comment: review.comment,
            images: review.images,
            created_at: review.created_at.to_string(),
        }
    }
}

/// Create Review Handler
#[endpoint(
    tags("reviews"),
    summary = "Review a Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Review created"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Rating, comment or images rejected"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<CreateReviewRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ReviewResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let review = state
        .app
        .reviews
        .submit_review(user, product.into_inner().into(), json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(review.into()))
}
