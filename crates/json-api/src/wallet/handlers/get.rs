//! Get Wallet Handler

use std::sync::Arc;

use larder::wallet::WalletView;
use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    extensions::*,
    state::State,
    wallet::{WalletTransactionResponse, errors::into_status_error},
};

/// Wallet Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct WalletResponse {
    /// Balance in minor units
    pub balance: u64,

    /// Most recent transactions, newest first
    pub transactions: Vec<WalletTransactionResponse>,
}

impl From<WalletView> for WalletResponse {
    fn from(view: WalletView) -> Self {
        Self {
            balance: view.balance,
            transactions: view.recent.into_iter().map(Into::into).collect(),
        }
    }
}

/// Get Wallet Handler
///
/// Returns the balance and recent transactions. Shoppers without a wallet
/// yet get a zero balance.
#[endpoint(tags("wallet"), summary = "Get Wallet", security(("bearer_auth" = [])))]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<WalletResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let view = state
        .app
        .wallet
        .wallet(user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(view.into()))
}

#[cfg(test)]
mod tests {
    use larder_app::{context::AppContext, domain::wallet::MockWalletService};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::{
        test_helpers::{TEST_USER_UUID, service, strict_context},
        wallet::handlers::tests::make_credit,
    };

    use super::*;

    fn make_service(wallet: MockWalletService) -> Service {
        service(
            AppContext {
                wallet: Arc::new(wallet),
                ..strict_context()
            },
            Router::with_path("wallet").get(handler),
            true,
        )
    }

    #[tokio::test]
    async fn test_wallet_returns_balance_and_transactions() -> TestResult {
        let mut wallet = MockWalletService::new();

        wallet
            .expect_wallet()
            .once()
            .withf(|user| *user == TEST_USER_UUID)
            .return_once(|_| {
                Ok(WalletView {
                    balance: 25_000,
                    recent: vec![make_credit(25_000, "Added via UPI")],
                })
            });

        let response: WalletResponse = TestClient::get("http://example.com/wallet")
            .send(&make_service(wallet))
            .await
            .take_json()
            .await?;

        assert_eq!(response.balance, 25_000);
        assert_eq!(response.transactions.len(), 1, "expected one transaction");
        assert_eq!(
            response.transactions.first().map(|t| t.direction.as_str()),
            Some("credit")
        );

        Ok(())
    }
}
