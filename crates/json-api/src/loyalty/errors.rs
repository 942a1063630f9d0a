//! Errors

use larder_app::domain::loyalty::LoyaltyServiceError;
use salvo::http::StatusError;
use tracing::error;

pub(crate) fn into_status_error(error: LoyaltyServiceError) -> StatusError {
    match error {
        LoyaltyServiceError::Rejected(rejection) => {
            StatusError::unprocessable_entity().brief(rejection.to_string())
        }
        LoyaltyServiceError::NotFound => {
            StatusError::not_found().brief("Loyalty account not found")
        }
        LoyaltyServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid loyalty request")
        }
        LoyaltyServiceError::Sql(source) => {
            error!("loyalty storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
