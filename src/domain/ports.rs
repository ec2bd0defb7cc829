use async_trait::async_trait;
use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use super::catalog::{Item, ItemInput};
use super::client::{Client, ClientInput, OrderSnapshot};
use super::errors::DomainError;
use super::order::{ListResult, NewOrder, Order, OrderChanges, OrderFilter, OrderStatus};

pub trait ClientRepository: Send + Sync + 'static {
    fn create(&self, input: ClientInput) -> Result<Client, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, DomainError>;
    /// Case-insensitive exact match.
    fn find_by_email(&self, email: &str) -> Result<Option<Client>, DomainError>;
    fn list(&self) -> Result<Vec<Client>, DomainError>;
    fn update(&self, id: Uuid, input: ClientInput) -> Result<Option<Client>, DomainError>;
    fn set_last_order(&self, id: Uuid, snapshot: OrderSnapshot) -> Result<(), DomainError>;
    /// Returns `false` when nothing was deleted.
    fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}

pub trait ItemRepository: Send + Sync + 'static {
    fn create(&self, input: ItemInput) -> Result<Item, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Item>, DomainError>;
    fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Item>, DomainError>;
    fn list(&self) -> Result<Vec<Item>, DomainError>;
    fn update(&self, id: Uuid, input: ItemInput) -> Result<Option<Item>, DomainError>;
    fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    /// Insert the order together with its lines.
    fn create(&self, order: NewOrder) -> Result<Order, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError>;
    fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Order>, DomainError>;
    /// Newest first, lines included.
    fn list(&self, filter: &OrderFilter, page: i64, limit: i64) -> Result<ListResult, DomainError>;
    /// Every order with its lines, for reporting.
    fn list_all(&self) -> Result<Vec<Order>, DomainError>;
    /// Orders carrying a non-empty `merged_from`.
    fn list_merged(&self) -> Result<Vec<Order>, DomainError>;
    fn update(&self, id: Uuid, changes: OrderChanges) -> Result<Option<Order>, DomainError>;
    fn set_status(&self, id: Uuid, status: OrderStatus) -> Result<Option<Order>, DomainError>;
    fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
    /// Delete all of `ids` in one call; returns how many rows went away.
    fn delete_many(&self, ids: &[Uuid]) -> Result<usize, DomainError>;
}

/// Payload handed to the notification gateway when an order is placed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderNotification {
    pub order_id: String,
    pub client_name: String,
    #[serde(serialize_with = "total_as_number")]
    pub total: BigDecimal,
    pub item_count: usize,
    pub delivery_date: NaiveDate,
}

// The gateway formats the total itself, so it expects a JSON number.
fn total_as_number<S: serde::Serializer>(total: &BigDecimal, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(total.to_f64().unwrap_or_default())
}

#[async_trait]
pub trait OrderNotifier: Send + Sync + 'static {
    async fn notify(&self, notification: &OrderNotification) -> Result<(), DomainError>;
}
