//! Add-funds flow
//!
//! Drives a [`TopUpDialog`] through a simulated payment. The payment runs as
//! a task in the flow's [`ViewScope`], so dismissing the dialog cancels it
//! and nothing is credited or updated afterwards.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use larder::wallet::{PaymentMethod, TopUpDialog, TopUpError, TopUpRequest, TopUpStep};
use rusty_money::iso::Currency;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::{
    domain::{
        users::UserUuid,
        wallet::{WalletService, WalletServiceError},
    },
    tasks::ViewScope,
};

/// How long the simulated payment takes.
pub const DEFAULT_PAYMENT_DELAY: Duration = Duration::from_secs(2);

/// Outcome of the most recent payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopUpStatus {
    Idle,
    Processing(TopUpRequest),
    Completed(TopUpRequest),

    /// The payment failed; the message is shown to the shopper.
    Failed(String),
}

#[derive(Debug)]
struct FlowState {
    dialog: TopUpDialog,
    status: TopUpStatus,
    balance: Option<u64>,
}

pub struct TopUpFlow {
    wallet: Arc<dyn WalletService>,
    user: UserUuid,
    delay: Duration,
    scope: ViewScope,
    state: Arc<Mutex<FlowState>>,
}

impl std::fmt::Debug for TopUpFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopUpFlow")
            .field("user", &self.user)
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

impl TopUpFlow {
    /// Open the add-funds dialog for `user`.
    ///
    /// # Errors
    ///
    /// Returns an error if the minimum top-up cannot be represented in `currency`.
    pub fn new(
        wallet: Arc<dyn WalletService>,
        user: UserUuid,
        currency: &Currency,
    ) -> Result<Self, TopUpError> {
        Ok(Self {
            wallet,
            user,
            delay: DEFAULT_PAYMENT_DELAY,
            scope: ViewScope::new(),
            state: Arc::new(Mutex::new(FlowState {
                dialog: TopUpDialog::new(currency)?,
                status: TopUpStatus::Idle,
                balance: None,
            })),
        })
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub fn step(&self) -> TopUpStep {
        self.state().dialog.step()
    }

    #[must_use]
    pub fn status(&self) -> TopUpStatus {
        self.state().status.clone()
    }

    /// Balance as of the last successful top-up.
    #[must_use]
    pub fn balance(&self) -> Option<u64> {
        self.state().balance
    }

    /// Accept an amount in minor units.
    ///
    /// # Errors
    ///
    /// Returns [`TopUpError::BelowMinimum`] for amounts under the minimum.
    pub fn submit_amount(&self, amount: u64) -> Result<(), TopUpError> {
        self.state().dialog.submit_amount(amount)
    }

    /// Go back to amount entry.
    ///
    /// # Errors
    ///
    /// Returns an error while a payment is in flight.
    pub fn back(&self) -> Result<(), TopUpError> {
        self.state().dialog.back()
    }

    /// Pick a payment method and start the simulated payment.
    ///
    /// The handle resolves to `true` once the result has been applied, or
    /// `false` if the flow was dismissed first.
    ///
    /// # Errors
    ///
    /// Returns an error if no amount has been accepted yet.
    pub fn pay(&self, method: PaymentMethod) -> Result<JoinHandle<bool>, TopUpError> {
        let request = {
            let mut state = self.state();
            let request = state.dialog.choose_method(method)?;
            state.status = TopUpStatus::Processing(request);
            request
        };

        let wallet = Arc::clone(&self.wallet);
        let user = self.user;
        let delay = self.delay;
        let state = Arc::clone(&self.state);

        let payment = async move {
            tokio::time::sleep(delay).await;

            wallet
                .add_funds(user, request.amount, request.method)
                .await?;

            wallet.wallet(user).await
        };

        Ok(self.scope.spawn(payment, move |result| {
            let mut state = lock(&state);

            match result {
                Ok(view) => {
                    if let Err(error) = state.dialog.complete() {
                        warn!(%error, "top-up finished outside the processing step");
                    }

                    state.dialog.reset();
                    state.balance = Some(view.balance);
                    state.status = TopUpStatus::Completed(request);

                    info!(amount = request.amount, balance = view.balance, "top-up completed");
                }
                Err(error) => {
                    warn!(%error, "top-up failed");

                    if let Err(error) = state.dialog.fail() {
                        warn!(%error, "top-up failed outside the processing step");
                    }

                    state.status = TopUpStatus::Failed(failure_message(&error));
                }
            }
        }))
    }

    /// Close the dialog, cancelling any payment in flight.
    pub fn dismiss(&self) {
        self.scope.close();
    }

    fn state(&self) -> MutexGuard<'_, FlowState> {
        lock(&self.state)
    }
}

fn lock(state: &Mutex<FlowState>) -> MutexGuard<'_, FlowState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn failure_message(error: &WalletServiceError) -> String {
    match error {
        WalletServiceError::Rejected(rejection) => rejection.to_string(),
        _ => "Payment failed. Please try again.".to_string(),
    }
}
