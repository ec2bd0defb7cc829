use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub unit_price: BigDecimal,
    pub weight_grams: i32,
    pub picture_url: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields an admin supplies when creating or editing a catalog item.
#[derive(Debug, Clone)]
pub struct ItemInput {
    pub name: String,
    pub category: String,
    pub unit_price: BigDecimal,
    pub weight_grams: i32,
    pub picture_url: Option<String>,
    pub description: Option<String>,
}

impl ItemInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidInput("item name is required".to_string()));
        }
        if self.category.trim().is_empty() {
            return Err(DomainError::InvalidInput(
                "item category is required".to_string(),
            ));
        }
        if self.unit_price < BigDecimal::zero() {
            return Err(DomainError::InvalidInput(
                "unit price must not be negative".to_string(),
            ));
        }
        if self.weight_grams < 0 {
            return Err(DomainError::InvalidInput(
                "weight must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
