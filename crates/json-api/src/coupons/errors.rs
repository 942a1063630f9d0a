//! Errors

use larder_app::domain::coupons::CouponsServiceError;
use salvo::http::StatusError;
use tracing::error;

pub(crate) fn into_status_error(error: CouponsServiceError) -> StatusError {
    match error {
        CouponsServiceError::Rejected(rejection) => {
            StatusError::unprocessable_entity().brief(rejection.to_string())
        }
        CouponsServiceError::AlreadyRedeemed => {
            StatusError::conflict().brief("Coupon already redeemed for this order")
        }
        CouponsServiceError::InvalidReference => StatusError::not_found().brief("Order not found"),
        CouponsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid coupon payload")
        }
        CouponsServiceError::Sql(source) => {
            error!("failed to apply coupon: {source}");

            StatusError::internal_server_error()
        }
    }
}
