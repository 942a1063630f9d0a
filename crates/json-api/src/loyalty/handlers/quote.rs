//! Redemption Quote Handler

use std::sync::Arc;

use larder_app::domain::loyalty::records::RedemptionOffer;
use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, loyalty::errors::into_status_error, state::State};

/// Redemption Quote Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RedemptionQuoteResponse {
    pub available_points: u64,

    /// Most points usable on this order
    pub max_redeemable_points: u64,

    /// Value of one point in minor units
    pub point_value: u64,

    /// Discount in minor units when every redeemable point is used
    pub max_discount: u64,

    /// Whether the balance meets the redemption minimum
    pub eligible: bool,

    pub min_redeem_points: u64,
}

impl From<RedemptionOffer> for RedemptionQuoteResponse {
    fn from(offer: RedemptionOffer) -> Self {
        Self {
            available_points: offer.quote.available_points,
            max_redeemable_points: offer.quote.max_redeemable_points,
            point_value: offer.quote.point_value,
            max_discount: offer.max_discount,
            eligible: offer.quote.eligible,
            min_redeem_points: offer.quote.min_redeem_points,
        }
    }
}

/// Redemption Quote Handler
///
/// How many points may be redeemed against an order total.
#[endpoint(
    tags("loyalty"),
    summary = "Quote Points Redemption",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    order_total: QueryParam<u64, true>,
    depot: &mut Depot,
) -> Result<Json<RedemptionQuoteResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let offer = state
        .app
        .loyalty
        .quote_redemption(user, order_total.into_inner())
        .await
        .map_err(into_status_error)?;

    Ok(Json(offer.into()))
}

#[cfg(test)]
mod tests {
    use larder::loyalty::RedemptionQuote;
    use larder_app::{context::AppContext, domain::loyalty::MockLoyaltyService};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{TEST_USER_UUID, service, strict_context};

    use super::*;

    fn make_service(loyalty: MockLoyaltyService) -> Service {
        service(
            AppContext {
                loyalty: Arc::new(loyalty),
                ..strict_context()
            },
            Router::with_path("loyalty/redemption").get(handler),
            true,
        )
    }

    #[tokio::test]
    async fn test_quote_forwards_order_total() -> TestResult {
        let mut loyalty = MockLoyaltyService::new();

        loyalty
            .expect_quote_redemption()
            .once()
            .withf(|user, total| *user == TEST_USER_UUID && *total == 100_000)
            .return_once(|_, _| {
                Ok(RedemptionOffer {
                    quote: RedemptionQuote {
                        available_points: 800,
                        max_redeemable_points: 200,
                        point_value: 100,
                        eligible: true,
                        min_redeem_points: 100,
                    },
                    max_discount: 20_000,
                })
            });

        let response: RedemptionQuoteResponse =
            TestClient::get("http://example.com/loyalty/redemption?order_total=100000")
                .send(&make_service(loyalty))
                .await
                .take_json()
                .await?;

        assert_eq!(response.max_redeemable_points, 200);
        assert_eq!(response.max_discount, 20_000);
        assert!(response.eligible);

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_order_total_is_rejected() -> TestResult {
        let mut loyalty = MockLoyaltyService::new();

        loyalty.expect_quote_redemption().never();

        let res = TestClient::get("http://example.com/loyalty/redemption")
            .send(&make_service(loyalty))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
