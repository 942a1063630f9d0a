//! Recommend Products Handler

use std::sync::Arc;

use larder::recommendations::{RecommendationSource, Recommendations};
use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{extensions::*, observability::observe_recommendation, state::State};

/// Where the recommended products came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub(crate) enum RecommendationSourceResponse {
    /// At least one product was picked by the model
    Ai,

    /// Popular products only
    Fallback,
}

impl From<RecommendationSource> for RecommendationSourceResponse {
    fn from(source: RecommendationSource) -> Self {
        match source {
            RecommendationSource::Ai => Self::Ai,
            RecommendationSource::Fallback => Self::Fallback,
        }
    }
}

/// Recommendations Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RecommendationsResponse {
    pub product_ids: Vec<Uuid>,
    pub source: RecommendationSourceResponse,
}

impl From<Recommendations> for RecommendationsResponse {
    fn from(recommendations: Recommendations) -> Self {
        Self {
            product_ids: recommendations.product_ids,
            source: recommendations.source.into(),
        }
    }
}

/// Recommend Products Handler
///
/// Personalised picks from the signed-in shopper's recent orders. Always
/// answers; an empty `fallback` list means the catalog could not be read.
#[endpoint(
    tags("recommendations"),
    summary = "Recommend Products",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Recommended products"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Not signed in"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<RecommendationsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let recommendations = state.app.recommendations.recommend(user).await;

    observe_recommendation(recommendations.source);

    Ok(Json(recommendations.into()))
}

#[cfg(test)]
mod tests {
    use larder_app::{context::AppContext, domain::recommendations::MockRecommendationsService};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{TEST_USER_UUID, service, strict_context};

    use super::*;

    fn make_service(recommendations: MockRecommendationsService, signed_in: bool) -> Service {
        service(
            AppContext {
                recommendations: Arc::new(recommendations),
                ..strict_context()
            },
            Router::with_path("recommendations").post(handler),
            signed_in,
        )
    }

    #[tokio::test]
    async fn test_recommendations_use_camel_case_shape() -> TestResult {
        let picks = vec![Uuid::now_v7(), Uuid::now_v7()];
        let expected = picks.clone();

        let mut recommendations = MockRecommendationsService::new();

        recommendations
            .expect_recommend()
            .once()
            .withf(|user| *user == TEST_USER_UUID)
            .return_once(move |_| Recommendations {
                product_ids: picks,
                source: RecommendationSource::Ai,
            });

        let mut res = TestClient::post("http://example.com/recommendations")
            .send(&make_service(recommendations, true))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: serde_json::Value = res.take_json().await?;

        assert_eq!(body["source"], "ai");
        assert_eq!(
            body["productIds"],
            serde_json::to_value(&expected)?,
            "expected ids in model order"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_requires_sign_in() -> TestResult {
        let mut recommendations = MockRecommendationsService::new();

        recommendations.expect_recommend().never();

        let res = TestClient::post("http://example.com/recommendations")
            .send(&make_service(recommendations, false))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_fallback_is_still_ok() -> TestResult {
        let mut recommendations = MockRecommendationsService::new();

        recommendations
            .expect_recommend()
            .once()
            .return_once(|_| Recommendations {
                product_ids: Vec::new(),
                source: RecommendationSource::Fallback,
            });

        let mut res = TestClient::post("http://example.com/recommendations")
            .send(&make_service(recommendations, true))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: RecommendationsResponse = res.take_json().await?;

        assert_eq!(body.source, RecommendationSourceResponse::Fallback);
        assert!(body.product_ids.is_empty(), "expected no products");

        Ok(())
    }

    #[test]
    fn source_schema_lists_both_values() -> TestResult {
        let ai = serde_json::to_value(RecommendationSourceResponse::from(RecommendationSource::Ai))?;
        let fallback = serde_json::to_value(RecommendationSourceResponse::from(
            RecommendationSource::Fallback,
        ))?;

        assert_eq!(ai, "ai");
        assert_eq!(fallback, "fallback");

        Ok(())
    }
}
