//! Checkout enums: payment method and pickup shift.
//!
//! Both are stored on the order row as their snake_case wire value; `label()`
//! returns the customer-facing Portuguese text used in templates.

use serde::{Deserialize, Serialize};

/// How the customer intends to pay on pickup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Pix,
    Card,
    Cash,
}

impl PaymentMethod {
    /// All methods, in the order they are offered at checkout.
    pub const ALL: [Self; 3] = [Self::Pix, Self::Card, Self::Cash];

    /// Customer-facing label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pix => "PIX",
            Self::Card => "Cartão de Crédito/Débito",
            Self::Cash => "Dinheiro",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pix => write!(f, "pix"),
            Self::Card => write!(f, "card"),
            Self::Cash => write!(f, "cash"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pix" => Ok(Self::Pix),
            "card" => Ok(Self::Card),
            "cash" => Ok(Self::Cash),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

/// Coarse time-of-day bucket for order pickup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupShift {
    Morning,
    Afternoon,
    Evening,
}

impl PickupShift {
    /// All shifts, in chronological order.
    pub const ALL: [Self; 3] = [Self::Morning, Self::Afternoon, Self::Evening];

    /// Customer-facing label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Morning => "Manhã",
            Self::Afternoon => "Tarde",
            Self::Evening => "Noite",
        }
    }
}

impl std::fmt::Display for PickupShift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Morning => write!(f, "morning"),
            Self::Afternoon => write!(f, "afternoon"),
            Self::Evening => write!(f, "evening"),
        }
    }
}

impl std::str::FromStr for PickupShift {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "morning" => Ok(Self::Morning),
            "afternoon" => Ok(Self::Afternoon),
            "evening" => Ok(Self::Evening),
            _ => Err(format!("invalid pickup shift: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_payment_method_round_trip() {
        for method in PaymentMethod::ALL {
            assert_eq!(PaymentMethod::from_str(&method.to_string()), Ok(method));
        }
    }

    #[test]
    fn test_pickup_shift_round_trip() {
        for shift in PickupShift::ALL {
            assert_eq!(PickupShift::from_str(&shift.to_string()), Ok(shift));
        }
    }

    #[test]
    fn test_wire_values_match_serde() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Pix).unwrap(),
            "\"pix\""
        );
        assert_eq!(
            serde_json::to_string(&PickupShift::Afternoon).unwrap(),
            "\"afternoon\""
        );
    }

    #[test]
    fn test_empty_string_is_rejected() {
        assert!(PaymentMethod::from_str("").is_err());
        assert!(PickupShift::from_str("").is_err());
    }
}
