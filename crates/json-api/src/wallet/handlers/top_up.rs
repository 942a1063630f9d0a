//! Top Up Wallet Handler

use std::sync::Arc;

use larder::wallet::PaymentMethod;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    extensions::*,
    state::State,
    wallet::{WalletTransactionResponse, errors::into_status_error},
};

/// Top Up Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TopUpRequest {
    /// Amount in minor units
    pub amount: u64,

    /// upi, card or net_banking
    pub method: String,
}

/// Top Up Wallet Handler
///
/// Credits the wallet once the (simulated) payment has gone through.
#[endpoint(
    tags("wallet"),
    summary = "Add Funds",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Funds added"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown payment method"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Amount below minimum"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<TopUpRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<WalletTransactionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;
    let request = json.into_inner();

    let method = request
        .method
        .parse::<PaymentMethod>()
        .or_400("Unsupported payment method")?;

    let transaction = state
        .app
        .wallet
        .add_funds(user, request.amount, method)
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(transaction.into()))
}

#[cfg(test)]
mod tests {
    use larder::wallet::TopUpError;
    use larder_app::{
        context::AppContext,
        domain::wallet::{MockWalletService, WalletServiceError},
    };
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::{
        test_helpers::{service, strict_context},
        wallet::handlers::tests::make_credit,
    };

    use super::*;

    fn make_service(wallet: MockWalletService) -> Service {
        service(
            AppContext {
                wallet: Arc::new(wallet),
                ..strict_context()
            },
            Router::with_path("wallet/top-ups").post(handler),
            true,
        )
    }

    #[tokio::test]
    async fn test_top_up_returns_201_with_transaction() -> TestResult {
        let mut wallet = MockWalletService::new();

        wallet
            .expect_add_funds()
            .once()
            .withf(|_, amount, method| *amount == 50_000 && *method == PaymentMethod::NetBanking)
            .return_once(|_, amount, _| Ok(make_credit(amount, "Added via net banking")));

        let mut res = TestClient::post("http://example.com/wallet/top-ups")
            .json(&json!({ "amount": 50_000, "method": "net-banking" }))
            .send(&make_service(wallet))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let response: WalletTransactionResponse = res.take_json().await?;

        assert_eq!(response.amount, 50_000);
        assert_eq!(response.description, "Added via net banking");

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_method_returns_400() -> TestResult {
        let mut wallet = MockWalletService::new();

        wallet.expect_add_funds().never();

        let res = TestClient::post("http://example.com/wallet/top-ups")
            .json(&json!({ "amount": 50_000, "method": "cash" }))
            .send(&make_service(wallet))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_amount_below_minimum_returns_422() -> TestResult {
        let mut wallet = MockWalletService::new();

        wallet.expect_add_funds().once().return_once(|_, _, _| {
            Err(WalletServiceError::Rejected(TopUpError::BelowMinimum {
                minimum: 1_000,
            }))
        });

        let res = TestClient::post("http://example.com/wallet/top-ups")
            .json(&json!({ "amount": 500, "method": "upi" }))
            .send(&make_service(wallet))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }
}
