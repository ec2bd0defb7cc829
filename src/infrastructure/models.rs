use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::catalog::Item;
use crate::domain::client::{Client, OrderSnapshot};
use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderLine, OrderStatus};
use crate::schema::{clients, items, order_items, orders};

// ── Clients ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = clients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ClientRow {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub vat_id: String,
    pub phone: String,
    pub email: String,
    pub notes: Option<String>,
    pub last_order_json: Option<Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = clients)]
pub struct NewClientRow {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub vat_id: String,
    pub phone: String,
    pub email: String,
    pub notes: Option<String>,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = clients)]
#[diesel(treat_none_as_null = true)]
pub struct ClientChangeset {
    pub name: String,
    pub address: String,
    pub vat_id: String,
    pub phone: String,
    pub email: String,
    pub notes: Option<String>,
}

impl ClientRow {
    pub fn into_domain(self) -> Client {
        // A snapshot written by an older schema is dropped rather than failing the read.
        let last_order = self
            .last_order_json
            .and_then(|v| serde_json::from_value::<OrderSnapshot>(v).ok());
        Client {
            id: self.id,
            name: self.name,
            address: self.address,
            vat_id: self.vat_id,
            phone: self.phone,
            email: self.email,
            notes: self.notes,
            last_order,
            created_at: self.created_at,
        }
    }
}

// ── Items ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ItemRow {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub unit_price: BigDecimal,
    pub weight_grams: i32,
    pub picture_url: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = items)]
pub struct NewItemRow {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub unit_price: BigDecimal,
    pub weight_grams: i32,
    pub picture_url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = items)]
#[diesel(treat_none_as_null = true)]
pub struct ItemChangeset {
    pub name: String,
    pub category: String,
    pub unit_price: BigDecimal,
    pub weight_grams: i32,
    pub picture_url: Option<String>,
    pub description: Option<String>,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item {
            id: row.id,
            name: row.name,
            category: row.category,
            unit_price: row.unit_price,
            weight_grams: row.weight_grams,
            picture_url: row.picture_url,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

// ── Orders ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub client_id: Uuid,
    pub delivery_date: NaiveDate,
    pub status: String,
    pub notes: Option<String>,
    pub total: BigDecimal,
    pub merged_from: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: Uuid,
    pub client_id: Uuid,
    pub delivery_date: NaiveDate,
    pub status: String,
    pub notes: Option<String>,
    pub total: BigDecimal,
    pub merged_from: Vec<Uuid>,
}

#[derive(
    Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable, Associations,
)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderLineRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub item_id: Uuid,
    pub position: i32,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderLineRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub item_id: Uuid,
    pub position: i32,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

impl NewOrderLineRow {
    pub fn from_lines(order_id: Uuid, lines: &[OrderLine]) -> Vec<Self> {
        lines
            .iter()
            .enumerate()
            .map(|(position, l)| NewOrderLineRow {
                id: Uuid::new_v4(),
                order_id,
                item_id: l.item_id,
                position: position as i32,
                quantity: l.quantity,
                unit_price: l.unit_price.clone(),
            })
            .collect()
    }
}

impl OrderRow {
    /// `lines` must already be sorted by `position`.
    pub fn into_domain(self, lines: Vec<OrderLineRow>) -> Result<Order, DomainError> {
        let status: OrderStatus = self
            .status
            .parse()
            .map_err(|_| DomainError::Remote(format!("order {} has corrupt status", self.id)))?;
        Ok(Order {
            id: self.id,
            client_id: self.client_id,
            lines: lines
                .into_iter()
                .map(|l| OrderLine {
                    item_id: l.item_id,
                    quantity: l.quantity,
                    unit_price: l.unit_price,
                })
                .collect(),
            delivery_date: self.delivery_date,
            status,
            notes: self.notes,
            total: self.total,
            merged_from: self.merged_from,
            created_at: self.created_at,
        })
    }
}
