//! Contact-Unlock Plans
//!
//! The three fixed tiers an employer can buy to see a helper's contact
//! details. Prices are in Nepali rupees; the conversion to paisa happens only
//! where the gateway is called.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Paisa per rupee
const MINOR_UNITS_PER_MAJOR: Decimal = dec!(100);

/// Plan tiers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Basic,
    Standard,
    Premium,
}

/// Price, quota and validity of a plan
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanTerms {
    /// Price in rupees
    pub price: Decimal,

    /// Number of helper contacts the plan covers
    pub contact_quota: u32,

    /// Days the unlock stays valid
    pub validity_days: u32,
}

impl Plan {
    pub const ALL: [Self; 3] = [Self::Basic, Self::Standard, Self::Premium];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Standard => "standard",
            Self::Premium => "premium",
        }
    }

    /// Display name used on the gateway's purchase order
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Standard => "Standard",
            Self::Premium => "Premium",
        }
    }

    pub const fn terms(self) -> PlanTerms {
        match self {
            Self::Basic => PlanTerms {
                price: dec!(500),
                contact_quota: 1,
                validity_days: 7,
            },
            Self::Standard => PlanTerms {
                price: dec!(1000),
                contact_quota: 3,
                validity_days: 14,
            },
            Self::Premium => PlanTerms {
                price: dec!(1500),
                contact_quota: 5,
                validity_days: 21,
            },
        }
    }

    /// Plan price in paisa, the unit the gateway charges in
    pub fn price_minor(self) -> i64 {
        // Table prices are whole rupees, so the conversion cannot fail.
        to_minor_units(self.terms().price).unwrap_or_default()
    }

    /// Check that a caller-supplied amount is exactly this plan's price
    pub fn check_amount(self, amount: Decimal) -> Result<()> {
        let price = self.terms().price;
        if amount == price {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "Amount {amount} does not match the {} plan price of {price}",
                self.as_str()
            )))
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plan {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "basic" => Ok(Self::Basic),
            "standard" => Ok(Self::Standard),
            "premium" => Ok(Self::Premium),
            _ => Err(CoreError::Validation("Invalid plan selected".into())),
        }
    }
}

/// Convert rupees to paisa (×100)
///
/// Rejects negative amounts and amounts with fractions of a paisa.
pub fn to_minor_units(amount: Decimal) -> Result<i64> {
    if amount.is_sign_negative() {
        return Err(CoreError::Validation(format!("Invalid amount: {amount}")));
    }

    let minor = amount * MINOR_UNITS_PER_MAJOR;
    if !minor.fract().is_zero() {
        return Err(CoreError::Validation(format!(
            "Amount {amount} is not a whole number of paisa"
        )));
    }

    minor
        .to_i64()
        .ok_or_else(|| CoreError::Validation(format!("Amount {amount} is out of range")))
}
