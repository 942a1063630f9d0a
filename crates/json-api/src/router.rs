//! App Router

use salvo::Router;

use crate::{
    auth, catalog, coupons, geocoding, healthcheck, loyalty, observability, recommendations,
    reviews, wallet,
};

/// Every API route. Catalog and geocoding are public; the rest need a bearer token.
pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(observability::metrics_handler))
        .push(
            Router::with_path("catalog")
                .push(Router::with_path("categories").get(catalog::categories::handler))
                .push(Router::with_path("products").get(catalog::products::handler)),
        )
        .push(
            Router::with_path("geocode")
                .push(Router::with_path("forward").get(geocoding::forward::handler))
                .push(Router::with_path("reverse").get(geocoding::reverse::handler)),
        )
        .push(
            Router::new()
                .hoop(auth::middleware::handler)
                .push(Router::with_path("coupons/apply").post(coupons::apply::handler))
                .push(
                    Router::with_path("loyalty")
                        .get(loyalty::summary::handler)
                        .push(Router::with_path("redemption").get(loyalty::quote::handler))
                        .push(Router::with_path("conversions").post(loyalty::convert::handler)),
                )
                .push(
                    Router::with_path("wallet")
                        .get(wallet::get::handler)
                        .push(Router::with_path("top-ups").post(wallet::top_up::handler)),
                )
                .push(
                    Router::with_path("recommendations")
                        .post(recommendations::recommend::handler),
                )
                .push(
                    Router::with_path("products/{product}/reviews")
                        .post(reviews::create::handler),
                ),
        )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use larder_app::{auth::MockAuthService, context::AppContext, domain::catalog::MockCatalogService};
    use salvo::{
        affix_state::inject,
        prelude::*,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use crate::{
        state::State,
        test_helpers::{state_with_auth, strict_context},
    };

    use super::*;

    #[tokio::test]
    async fn test_public_catalog_needs_no_token() -> TestResult {
        let mut catalog = MockCatalogService::new();

        catalog
            .expect_list_categories()
            .once()
            .return_once(|| Ok(Vec::new()));

        let state = State::from_app_context(AppContext {
            catalog: Arc::new(catalog),
            ..strict_context()
        });

        let service = Service::new(Router::new().hoop(inject(state)).push(app_router()));

        let mut res = TestClient::get("http://example.com/catalog/categories")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: serde_json::Value = res.take_json().await?;

        assert_eq!(body["categories"], serde_json::json!([]));

        Ok(())
    }

    #[tokio::test]
    async fn test_account_routes_require_a_token() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer().never();

        let service = Service::new(
            Router::new()
                .hoop(inject(state_with_auth(auth)))
                .push(app_router()),
        );

        for (method, path) in [
            ("GET", "loyalty"),
            ("GET", "wallet"),
            ("POST", "wallet/top-ups"),
            ("POST", "coupons/apply"),
            ("POST", "recommendations"),
        ] {
            let url = format!("http://example.com/{path}");

            let client = match method {
                "POST" => TestClient::post(url),
                _ => TestClient::get(url),
            };

            let res = client.send(&service).await;

            assert_eq!(
                res.status_code,
                Some(StatusCode::UNAUTHORIZED),
                "{method} /{path}"
            );
        }

        Ok(())
    }
}
