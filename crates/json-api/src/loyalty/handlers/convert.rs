//! Convert Points Handler

use std::sync::Arc;

use larder_app::domain::loyalty::records::ConversionReceipt;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, loyalty::errors::into_status_error, state::State};

/// Convert Points Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ConvertPointsRequest {
    pub points: u64,
}

/// Conversion Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ConversionResponse {
    /// Points taken from the balance
    pub points: u64,

    /// Amount credited to the wallet, in minor units
    pub amount: u64,

    /// Wallet balance after the credit, in minor units
    pub wallet_balance: u64,
}

impl From<ConversionReceipt> for ConversionResponse {
    fn from(receipt: ConversionReceipt) -> Self {
        Self {
            points: receipt.points,
            amount: receipt.amount,
            wallet_balance: receipt.balance,
        }
    }
}

/// Convert Points Handler
///
/// Turns loyalty points into wallet balance.
#[endpoint(
    tags("loyalty"),
    summary = "Convert Points to Wallet Balance",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Points converted"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Conversion refused"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ConvertPointsRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ConversionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let receipt = state
        .app
        .loyalty
        .convert_to_wallet(user, json.into_inner().points)
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(receipt.into()))
}
