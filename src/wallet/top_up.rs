//! Add-funds dialog
//!
//! Two steps: the shopper enters an amount, then picks a payment method. The
//! payment itself is simulated elsewhere; this type only tracks where the
//! dialog is and rejects invalid transitions.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::{self, PricingError};

/// Smallest top-up, in major currency units.
const MINIMUM_TOP_UP_UNITS: i64 = 10;

/// Smallest top-up in minor units of `currency`.
///
/// # Errors
///
/// Returns a [`PricingError`] if the amount cannot be represented.
pub fn minimum_top_up(currency: &Currency) -> Result<u64, PricingError> {
    pricing::to_minor(Decimal::from(MINIMUM_TOP_UP_UNITS), currency)
}

/// Errors raised by the add-funds dialog.
#[derive(Debug, Error, PartialEq)]
pub enum TopUpError {
    /// The amount is below the minimum top-up.
    #[error("Minimum amount is {}", pricing::display_amount(*.minimum))]
    BelowMinimum {
        /// Minimum top-up in minor units.
        minimum: u64,
    },

    /// The action is not valid in the current step.
    #[error("cannot {action} while the dialog is {step}")]
    InvalidStep {
        /// Attempted action.
        action: &'static str,

        /// Current step name.
        step: &'static str,
    },

    /// The payment method is not supported.
    #[error("unsupported payment method `{0}`")]
    UnknownMethod(String),

    /// Wrapped pricing error.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Supported (simulated) payment methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// UPI
    Upi,

    /// Debit or credit card.
    Card,

    /// Net banking.
    NetBanking,
}

impl PaymentMethod {
    /// Stored name.
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Upi => "upi",
            PaymentMethod::Card => "card",
            PaymentMethod::NetBanking => "net_banking",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = TopUpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "upi" => Ok(PaymentMethod::Upi),
            "card" => Ok(PaymentMethod::Card),
            "net_banking" | "netbanking" => Ok(PaymentMethod::NetBanking),
            _ => Err(TopUpError::UnknownMethod(s.to_string())),
        }
    }
}

/// A top-up ready to be paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopUpRequest {
    /// Amount in minor units.
    pub amount: u64,

    /// Chosen payment method.
    pub method: PaymentMethod,
}

/// Where the dialog is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopUpStep {
    /// Waiting for an amount.
    EnterAmount,

    /// Amount accepted, waiting for a payment method.
    ChooseMethod {
        /// Accepted amount in minor units.
        amount: u64,
    },

    /// Payment in flight.
    Processing(TopUpRequest),

    /// Payment succeeded and the wallet was credited.
    Completed(TopUpRequest),
}

impl TopUpStep {
    fn name(self) -> &'static str {
        match self {
            TopUpStep::EnterAmount => "entering an amount",
            TopUpStep::ChooseMethod { .. } => "choosing a payment method",
            TopUpStep::Processing(_) => "processing",
            TopUpStep::Completed(_) => "completed",
        }
    }
}

/// State of the add-funds dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopUpDialog {
    step: TopUpStep,
    minimum: u64,
}

impl TopUpDialog {
    /// Open the dialog for `currency`.
    ///
    /// # Errors
    ///
    /// Returns a [`TopUpError::Pricing`] if the minimum cannot be represented.
    pub fn new(currency: &Currency) -> Result<Self, TopUpError> {
        Ok(Self {
            step: TopUpStep::EnterAmount,
            minimum: minimum_top_up(currency)?,
        })
    }

    /// The current step.
    pub fn step(&self) -> TopUpStep {
        self.step
    }

    /// The minimum amount in minor units.
    pub fn minimum(&self) -> u64 {
        self.minimum
    }

    /// Accept an amount in minor units and move on to method selection.
    ///
    /// # Errors
    ///
    /// - [`TopUpError::BelowMinimum`]: the amount is under the minimum; the step is unchanged.
    /// - [`TopUpError::InvalidStep`]: the dialog is not waiting for an amount.
    pub fn submit_amount(&mut self, amount: u64) -> Result<(), TopUpError> {
        self.expect_step("enter an amount", |step| {
            matches!(step, TopUpStep::EnterAmount)
        })?;

        if amount < self.minimum {
            return Err(TopUpError::BelowMinimum {
                minimum: self.minimum,
            });
        }

        self.step = TopUpStep::ChooseMethod { amount };

        Ok(())
    }

    /// Go back from method selection to amount entry.
    ///
    /// # Errors
    ///
    /// Returns [`TopUpError::InvalidStep`] unless a method is being chosen.
    pub fn back(&mut self) -> Result<(), TopUpError> {
        self.expect_step("go back", |step| {
            matches!(step, TopUpStep::ChooseMethod { .. })
        })?;

        self.step = TopUpStep::EnterAmount;

        Ok(())
    }

    /// Choose a payment method and start processing.
    ///
    /// # Errors
    ///
    /// Returns [`TopUpError::InvalidStep`] unless a method is being chosen.
    pub fn choose_method(&mut self, method: PaymentMethod) -> Result<TopUpRequest, TopUpError> {
        let TopUpStep::ChooseMethod { amount } = self.step else {
            return Err(self.invalid("choose a payment method"));
        };

        let request = TopUpRequest { amount, method };
        self.step = TopUpStep::Processing(request);

        Ok(request)
    }

    /// Mark the in-flight payment as credited.
    ///
    /// # Errors
    ///
    /// Returns [`TopUpError::InvalidStep`] unless a payment is processing.
    pub fn complete(&mut self) -> Result<TopUpRequest, TopUpError> {
        let TopUpStep::Processing(request) = self.step else {
            return Err(self.invalid("complete a payment"));
        };

        self.step = TopUpStep::Completed(request);

        Ok(request)
    }

    /// Return to method selection after a failed payment.
    ///
    /// # Errors
    ///
    /// Returns [`TopUpError::InvalidStep`] unless a payment is processing.
    pub fn fail(&mut self) -> Result<(), TopUpError> {
        let TopUpStep::Processing(request) = self.step else {
            return Err(self.invalid("fail a payment"));
        };

        self.step = TopUpStep::ChooseMethod {
            amount: request.amount,
        };

        Ok(())
    }

    /// Back to an empty amount entry.
    pub fn reset(&mut self) {
        self.step = TopUpStep::EnterAmount;
    }

    fn expect_step(
        &self,
        action: &'static str,
        allowed: impl FnOnce(TopUpStep) -> bool,
    ) -> Result<(), TopUpError> {
        if allowed(self.step) {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&self, action: &'static str) -> TopUpError {
        TopUpError::InvalidStep {
            action,
            step: self.step.name(),
        }
    }
}
