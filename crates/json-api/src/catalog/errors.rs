//! Errors

use larder_app::domain::catalog::CatalogServiceError;
use salvo::http::StatusError;
use tracing::error;

pub(crate) fn into_status_error(error: CatalogServiceError) -> StatusError {
    match error {
        CatalogServiceError::NotFound => StatusError::not_found().brief("Product not found"),
        CatalogServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid catalog query")
        }
        CatalogServiceError::Sql(source) => {
            error!("failed to read catalog: {source}");

            StatusError::internal_server_error()
        }
    }
}
