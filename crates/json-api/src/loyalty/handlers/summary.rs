//! Loyalty Summary Handler

use std::sync::Arc;

use larder_app::domain::loyalty::records::LoyaltySummary;
use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, loyalty::errors::into_status_error, state::State};

/// Loyalty Summary Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LoyaltySummaryResponse {
    /// Point balance, locked points included
    pub total_points: u64,

    /// Points that can be redeemed or converted now
    pub available_points: u64,

    pub lifetime_earned: u64,

    pub lifetime_spent: u64,

    /// bronze, silver, gold or platinum
    pub tier: String,

    /// The tier after this one; absent at the top tier
    pub next_tier: Option<String>,

    /// Progress towards the next tier, 0 to 100
    pub progress_percent: String,

    pub points_to_next_tier: u64,

    /// Points still inside their return window
    pub pending: Vec<PendingPointsResponse>,
}

/// Pending Points Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PendingPointsResponse {
    pub points: u64,

    /// When the points become spendable
    pub unlocks_at: String,
}

impl From<LoyaltySummary> for LoyaltySummaryResponse {
    fn from(summary: LoyaltySummary) -> Self {
        Self {
            total_points: summary.points.total_points,
            available_points: summary.available_points,
            lifetime_earned: summary.points.lifetime_earned,
            lifetime_spent: summary.points.lifetime_spent,
            tier: summary.tier.to_string(),
            next_tier: summary.progress.next.map(|tier| tier.to_string()),
            progress_percent: summary.progress.percent.to_string(),
            points_to_next_tier: summary.progress.points_to_next,
            pending: summary
                .pending
                .into_iter()
                .map(|pending| PendingPointsResponse {
                    points: pending.points,
                    unlocks_at: pending.unlocks_at.to_string(),
                })
                .collect(),
        }
    }
}

/// Loyalty Summary Handler
///
/// Returns the shopper's points, tier and tier progress.
#[endpoint(
    tags("loyalty"),
    summary = "Loyalty Summary",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<LoyaltySummaryResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let summary = state
        .app
        .loyalty
        .summary(user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(summary.into()))
}

#[cfg(test)]
mod tests {
    use larder_app::{
        context::AppContext,
        domain::loyalty::{LoyaltyServiceError, MockLoyaltyService},
    };
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::{
        loyalty::handlers::tests::make_summary,
        test_helpers::{TEST_USER_UUID, service, strict_context},
    };

    use super::*;

    fn make_service(loyalty: MockLoyaltyService, signed_in: bool) -> Service {
        service(
            AppContext {
                loyalty: Arc::new(loyalty),
                ..strict_context()
            },
            Router::with_path("loyalty").get(handler),
            signed_in,
        )
    }

    #[tokio::test]
    async fn test_summary_reports_tier_and_progress() -> TestResult {
        let mut loyalty = MockLoyaltyService::new();

        loyalty
            .expect_summary()
            .once()
            .withf(|user| *user == TEST_USER_UUID)
            .return_once(|_| Ok(make_summary(1_200, 2_500)));

        let response: LoyaltySummaryResponse = TestClient::get("http://example.com/loyalty")
            .send(&make_service(loyalty, true))
            .await
            .take_json()
            .await?;

        assert_eq!(response.tier, "gold");
        assert_eq!(response.next_tier.as_deref(), Some("platinum"));
        assert_eq!(response.points_to_next_tier, 2_500);
        assert_eq!(response.available_points, 1_200);

        Ok(())
    }

    #[tokio::test]
    async fn test_summary_without_user_returns_401() -> TestResult {
        let mut loyalty = MockLoyaltyService::new();

        loyalty.expect_summary().never();

        let res = TestClient::get("http://example.com/loyalty")
            .send(&make_service(loyalty, false))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_account_returns_404() -> TestResult {
        let mut loyalty = MockLoyaltyService::new();

        loyalty
            .expect_summary()
            .once()
            .return_once(|_| Err(LoyaltyServiceError::NotFound));

        let res = TestClient::get("http://example.com/loyalty")
            .send(&make_service(loyalty, true))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
