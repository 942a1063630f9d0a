//! Errors

use larder_app::domain::reviews::ReviewsServiceError;
use salvo::http::StatusError;
use tracing::error;

pub(crate) fn into_status_error(error: ReviewsServiceError) -> StatusError {
    match error {
        ReviewsServiceError::Invalid(reason) => {
            StatusError::unprocessable_entity().brief(reason.to_string())
        }
        ReviewsServiceError::ProductNotFound => StatusError::not_found().brief("Product not found"),
        ReviewsServiceError::InvalidData => StatusError::bad_request().brief("Invalid review"),
        ReviewsServiceError::Sql(source) => {
            error!("reviews storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
