use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::discount::{compute_discount, round_money, Discount};
use super::errors::DomainError;

pub const UNKNOWN_ITEM: &str = "Unknown Item";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            other => Err(DomainError::InvalidInput(format!(
                "unknown order status '{}'",
                other
            ))),
        }
    }
}

/// A line as entered by a user: which item and how many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSelection {
    pub item_id: Uuid,
    pub quantity: i32,
}

/// A persisted order line; `unit_price` is the catalog price at order time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub item_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

impl OrderLine {
    pub fn subtotal(&self) -> BigDecimal {
        &self.unit_price * BigDecimal::from(self.quantity)
    }
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: Uuid,
    pub client_id: Uuid,
    pub lines: Vec<OrderLine>,
    pub delivery_date: NaiveDate,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub total: BigDecimal,
    /// Orders this one replaced when it was produced by a merge.
    pub merged_from: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn subtotal(&self) -> BigDecimal {
        self.lines.iter().map(OrderLine::subtotal).sum()
    }
}

/// Everything needed to insert an order; the repository assigns `created_at`.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub id: Uuid,
    pub client_id: Uuid,
    pub lines: Vec<OrderLine>,
    pub delivery_date: NaiveDate,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub total: BigDecimal,
    pub merged_from: Vec<Uuid>,
}

#[derive(Debug, Clone)]
pub struct OrderChanges {
    pub lines: Vec<OrderLine>,
    pub delivery_date: NaiveDate,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub total: BigDecimal,
}

#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub client_id: Option<Uuid>,
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Clone)]
pub struct ListResult {
    pub items: Vec<Order>,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTotals {
    pub discount: Discount,
}

impl OrderTotals {
    pub fn subtotal(&self) -> &BigDecimal {
        &self.discount.subtotal
    }

    /// The value persisted as `Order::total`.
    pub fn persisted_total(&self) -> BigDecimal {
        self.discount.rounded_final_total()
    }
}

/// Reject empty selections and non-positive quantities before anything is priced.
pub fn validate_selections(selections: &[LineSelection]) -> Result<(), DomainError> {
    if selections.is_empty() {
        return Err(DomainError::InvalidInput(
            "an order needs at least one line".to_string(),
        ));
    }
    for sel in selections {
        if sel.quantity < 1 {
            return Err(DomainError::InvalidInput(format!(
                "quantity for item {} must be at least 1, got {}",
                sel.item_id, sel.quantity
            )));
        }
    }
    Ok(())
}

/// Sum `quantity × unit_price` over the lines and run the discount engine once.
pub fn compute_order_total(lines: &[OrderLine]) -> Result<OrderTotals, DomainError> {
    let mut subtotal = BigDecimal::zero();
    for line in lines {
        if line.quantity < 1 {
            return Err(DomainError::InvalidInput(format!(
                "quantity for item {} must be at least 1, got {}",
                line.item_id, line.quantity
            )));
        }
        if line.unit_price < BigDecimal::zero() {
            return Err(DomainError::InvalidInput(format!(
                "unit price for item {} must not be negative",
                line.item_id
            )));
        }
        subtotal += line.subtotal();
    }
    Ok(OrderTotals {
        discount: compute_discount(&subtotal)?,
    })
}

/// Line total for display.
pub fn display_line_total(line: &OrderLine) -> BigDecimal {
    round_money(&line.subtotal())
}
