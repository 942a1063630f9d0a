//! Apply Coupon Handler

use std::sync::Arc;

use larder::coupons::AppliedCoupon;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{coupons::errors::into_status_error, extensions::*, state::State};

/// Apply Coupon Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ApplyCouponRequest {
    /// Coupon code as typed by the shopper; matched case-insensitively
    pub code: String,

    /// Order total in minor units
    pub order_total: u64,
}

/// Applied Coupon Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AppliedCouponResponse {
    pub coupon_uuid: Uuid,

    /// Canonical coupon code
    pub code: String,

    /// Discount in minor units, never more than the order total
    pub discount: u64,

    /// What is left to pay in minor units
    pub payable: u64,
}

impl AppliedCouponResponse {
    fn new(applied: AppliedCoupon, order_total: u64) -> Self {
        Self {
            coupon_uuid: applied.coupon_id,
            payable: order_total.saturating_sub(applied.discount),
            code: applied.code,
            discount: applied.discount,
        }
    }
}

/// Apply Coupon Handler
///
/// Validates a coupon against an order total without redeeming it.
#[endpoint(
    tags("coupons"),
    summary = "Apply Coupon",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Coupon accepted"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Coupon rejected"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ApplyCouponRequest>,
    depot: &mut Depot,
) -> Result<Json<AppliedCouponResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;
    let request = json.into_inner();

    if request.code.trim().is_empty() {
        return Err(StatusError::bad_request().brief("Coupon code is required"));
    }

    let applied = state
        .app
        .coupons
        .apply_coupon(user, request.code, request.order_total)
        .await
        .map_err(into_status_error)?;

    Ok(Json(AppliedCouponResponse::new(applied, request.order_total)))
}
