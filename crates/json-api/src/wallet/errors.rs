//! Errors

use larder_app::domain::wallet::WalletServiceError;
use salvo::http::StatusError;
use tracing::error;

pub(crate) fn into_status_error(error: WalletServiceError) -> StatusError {
    match error {
        WalletServiceError::Rejected(rejection) => {
            StatusError::unprocessable_entity().brief(rejection.to_string())
        }
        WalletServiceError::NotFound => StatusError::not_found().brief("Wallet not found"),
        WalletServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid wallet request")
        }
        WalletServiceError::Sql(source) => {
            error!("wallet storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
