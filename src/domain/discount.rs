//! Tiered volume discount.
//!
//! The tier is picked from the order subtotal alone:
//!
//! | subtotal            | discount |
//! |---------------------|----------|
//! | `< 600`             | 0 %      |
//! | `600 ≤ s < 1200`    | 10 %     |
//! | `≥ 1200`            | 20 %     |
//!
//! All arithmetic is exact `BigDecimal`; amounts are rounded half-up to two
//! decimals only when they are displayed or persisted.

use bigdecimal::{BigDecimal, RoundingMode, Zero};
use serde::Serialize;
use utoipa::ToSchema;

use super::errors::DomainError;

pub const CURRENCY: &str = "Kč";

const TEN_PERCENT_THRESHOLD: i64 = 600;
const TWENTY_PERCENT_THRESHOLD: i64 = 1200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DiscountTier {
    None,
    TenPercent,
    TwentyPercent,
}

impl DiscountTier {
    pub fn for_subtotal(subtotal: &BigDecimal) -> Self {
        if *subtotal < BigDecimal::from(TEN_PERCENT_THRESHOLD) {
            DiscountTier::None
        } else if *subtotal < BigDecimal::from(TWENTY_PERCENT_THRESHOLD) {
            DiscountTier::TenPercent
        } else {
            DiscountTier::TwentyPercent
        }
    }

    pub fn percentage(self) -> u8 {
        match self {
            DiscountTier::None => 0,
            DiscountTier::TenPercent => 10,
            DiscountTier::TwentyPercent => 20,
        }
    }

    /// Lower bound of the next tier up, if there is one.
    pub fn next_threshold(self) -> Option<BigDecimal> {
        match self {
            DiscountTier::None => Some(BigDecimal::from(TEN_PERCENT_THRESHOLD)),
            DiscountTier::TenPercent => Some(BigDecimal::from(TWENTY_PERCENT_THRESHOLD)),
            DiscountTier::TwentyPercent => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discount {
    pub subtotal: BigDecimal,
    pub tier: DiscountTier,
    pub discount_percentage: u8,
    pub discount_amount: BigDecimal,
    pub final_total: BigDecimal,
    pub message: String,
}

impl Discount {
    pub fn rounded_subtotal(&self) -> BigDecimal {
        round_money(&self.subtotal)
    }

    pub fn rounded_discount_amount(&self) -> BigDecimal {
        round_money(&self.discount_amount)
    }

    pub fn rounded_final_total(&self) -> BigDecimal {
        round_money(&self.final_total)
    }
}

/// Round half-up to two decimal places.
pub fn round_money(amount: &BigDecimal) -> BigDecimal {
    amount.with_scale_round(2, RoundingMode::HalfUp)
}

/// Compute the discount for an order subtotal.
///
/// A negative subtotal can only come from a caller bug and is rejected.
pub fn compute_discount(subtotal: &BigDecimal) -> Result<Discount, DomainError> {
    if *subtotal < BigDecimal::zero() {
        return Err(DomainError::InvalidInput(format!(
            "subtotal must not be negative, got {}",
            subtotal
        )));
    }

    let tier = DiscountTier::for_subtotal(subtotal);
    let percentage = tier.percentage();
    let discount_amount = subtotal * BigDecimal::from(percentage) / BigDecimal::from(100);
    let final_total = subtotal - &discount_amount;

    let message = match tier.next_threshold() {
        Some(threshold) => {
            let remaining = round_money(&(threshold - subtotal));
            let next = tier_after(tier).percentage();
            format!(
                "Buy for {} {} more and get {}% discount",
                remaining, CURRENCY, next
            )
        }
        None => format!("{}% discount applied", percentage),
    };

    Ok(Discount {
        subtotal: subtotal.clone(),
        tier,
        discount_percentage: percentage,
        discount_amount,
        final_total,
        message,
    })
}

fn tier_after(tier: DiscountTier) -> DiscountTier {
    match tier {
        DiscountTier::None => DiscountTier::TenPercent,
        DiscountTier::TenPercent | DiscountTier::TwentyPercent => DiscountTier::TwentyPercent,
    }
}
