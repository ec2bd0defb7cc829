use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DomainError;
use super::order::LineSelection;

/// Copy of a client's most recent order form, used to pre-fill the next one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub notes: Option<String>,
    pub lines: Vec<LineSelection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub vat_id: String,
    pub phone: String,
    pub email: String,
    pub notes: Option<String>,
    pub last_order: Option<OrderSnapshot>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ClientInput {
    pub name: String,
    pub address: String,
    pub vat_id: String,
    pub phone: String,
    pub email: String,
    pub notes: Option<String>,
}

impl ClientInput {
    /// Check required fields and normalise the email to lower case.
    pub fn normalized(mut self) -> Result<Self, DomainError> {
        for (field, value) in [
            ("name", &self.name),
            ("address", &self.address),
            ("vat_id", &self.vat_id),
            ("phone", &self.phone),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::InvalidInput(format!("{} is required", field)));
            }
        }
        self.email = normalize_email(&self.email);
        if !looks_like_email(&self.email) {
            return Err(DomainError::InvalidInput(format!(
                "'{}' is not a valid email",
                self.email
            )));
        }
        Ok(self)
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.contains('@'),
        None => false,
    }
}
