//! Checkout flow state machine and form validation.
//!
//! The panel moves `Cart -> Details -> Success`; the stage is stored in the
//! session and reset to `Cart` whenever the panel is reopened, so no timed
//! reset exists anywhere. Validation here is the client-side gate: no
//! backend call is made while any scheduling or payment field is missing.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use lima_rocha_core::{PaymentMethod, PickupShift, Price};

/// Fixed pickup notice shown read-only on the form; there is no delivery.
pub const PICKUP_ADDRESS: &str = "Entregas, somente com retirada em loja";

/// Advisory lead-time notice. Informational only, never enforced.
pub const LEAD_TIME_NOTICE: &str =
    "Pedidos devem ser feitos com um dia de antecedência ou antes das 10:00 da manhã do dia atual.";

/// Advisory prepayment notice for large orders. Informational only.
pub const PREPAYMENT_NOTICE: &str =
    "Para pedidos acima de R$ 200,00 com opção de retirada, é necessário o pagamento antecipado de 50%.";

/// Whether the prepayment notice applies to the given subtotal.
#[must_use]
pub fn requires_prepayment(subtotal: Price) -> bool {
    subtotal.amount() > Decimal::from(200)
}

// =============================================================================
// Flow State Machine
// =============================================================================

/// The view the cart panel is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStage {
    /// Line items and subtotal (initial).
    #[default]
    Cart,
    /// The checkout form collecting customer and schedule details.
    Details,
    /// Terminal thank-you view; reopening the panel resets to `Cart`.
    Success,
}

/// A transition that the state machine does not permit.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("cannot begin checkout with an empty cart")]
    EmptyCart,
    #[error("transition not allowed from the {0:?} view")]
    InvalidTransition(CheckoutStage),
}

impl CheckoutStage {
    /// `Cart -> Details`. Only permitted when the cart is non-empty.
    ///
    /// # Errors
    ///
    /// Returns `FlowError` if the cart is empty or the panel is not on the
    /// cart view.
    pub const fn begin(self, cart_is_empty: bool) -> Result<Self, FlowError> {
        match self {
            Self::Cart if cart_is_empty => Err(FlowError::EmptyCart),
            Self::Cart => Ok(Self::Details),
            other => Err(FlowError::InvalidTransition(other)),
        }
    }

    /// `Details -> Cart`, discarding in-progress form data.
    ///
    /// # Errors
    ///
    /// Returns `FlowError` if the panel is not on the form view.
    pub const fn back(self) -> Result<Self, FlowError> {
        match self {
            Self::Details => Ok(Self::Cart),
            other => Err(FlowError::InvalidTransition(other)),
        }
    }

    /// `Details -> Success`. Only called after a fully successful submission.
    ///
    /// # Errors
    ///
    /// Returns `FlowError` if the panel is not on the form view.
    pub const fn complete(self) -> Result<Self, FlowError> {
        match self {
            Self::Details => Ok(Self::Success),
            other => Err(FlowError::InvalidTransition(other)),
        }
    }
}

// =============================================================================
// Form Validation
// =============================================================================

/// Raw checkout form fields, exactly as posted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub whatsapp: String,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub pickup_date: String,
    #[serde(default)]
    pub pickup_shift: String,
    #[serde(default)]
    pub pickup_time: String,
}

/// Validated details handed to order submission. Created fresh per attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutDetails {
    pub name: String,
    pub whatsapp: String,
    pub pickup_address: String,
    pub payment_method: PaymentMethod,
    pub pickup_date: NaiveDate,
    pub pickup_shift: PickupShift,
    pub pickup_time: NaiveTime,
}

/// Why a submitted form was rejected before any network call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("invalid {field}: {value}")]
    InvalidField { field: &'static str, value: String },
}

impl CheckoutForm {
    /// Validate the four mandatory scheduling/payment fields and parse the
    /// whole form into [`CheckoutDetails`].
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::MissingFields` when any mandatory field is
    /// empty, or `CheckoutError::InvalidField` when a value fails to parse.
    pub fn validate(&self) -> Result<CheckoutDetails, CheckoutError> {
        let mut missing = Vec::new();
        for (field, value) in [
            ("payment_method", &self.payment_method),
            ("pickup_date", &self.pickup_date),
            ("pickup_shift", &self.pickup_shift),
            ("pickup_time", &self.pickup_time),
        ] {
            if value.trim().is_empty() {
                missing.push(field);
            }
        }
        if !missing.is_empty() {
            return Err(CheckoutError::MissingFields(missing));
        }

        let payment_method = PaymentMethod::from_str(self.payment_method.trim()).map_err(|_| {
            CheckoutError::InvalidField {
                field: "payment_method",
                value: self.payment_method.clone(),
            }
        })?;

        let pickup_date = NaiveDate::parse_from_str(self.pickup_date.trim(), "%Y-%m-%d")
            .map_err(|_| CheckoutError::InvalidField {
                field: "pickup_date",
                value: self.pickup_date.clone(),
            })?;

        let pickup_shift = PickupShift::from_str(self.pickup_shift.trim()).map_err(|_| {
            CheckoutError::InvalidField {
                field: "pickup_shift",
                value: self.pickup_shift.clone(),
            }
        })?;

        // Browsers send HH:MM, some send HH:MM:SS
        let raw_time = self.pickup_time.trim();
        let pickup_time = NaiveTime::parse_from_str(raw_time, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(raw_time, "%H:%M"))
            .map_err(|_| CheckoutError::InvalidField {
                field: "pickup_time",
                value: self.pickup_time.clone(),
            })?;

        Ok(CheckoutDetails {
            name: self.name.trim().to_string(),
            whatsapp: self.whatsapp.trim().to_string(),
            pickup_address: PICKUP_ADDRESS.to_string(),
            payment_method,
            pickup_date,
            pickup_shift,
            pickup_time,
        })
    }
}
