//! In-memory implementations of the ports for service and handler tests,
//! with switches to make the order store fail or race on demand.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::catalog::{Item, ItemInput};
use crate::domain::client::{normalize_email, Client, ClientInput, OrderSnapshot};
use crate::domain::errors::DomainError;
use crate::domain::order::{ListResult, NewOrder, Order, OrderChanges, OrderFilter, OrderStatus};
use crate::domain::ports::{
    ClientRepository, ItemRepository, OrderNotification, OrderNotifier, OrderRepository,
};

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, DomainError> {
    lock.read()
        .map_err(|_| DomainError::Remote("in-memory store poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, DomainError> {
    lock.write()
        .map_err(|_| DomainError::Remote("in-memory store poisoned".to_string()))
}

// ── Clients ──────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryClientRepository {
    clients: RwLock<HashMap<Uuid, Client>>,
}

impl ClientRepository for InMemoryClientRepository {
    fn create(&self, input: ClientInput) -> Result<Client, DomainError> {
        let mut clients = write(&self.clients)?;
        let email = normalize_email(&input.email);
        if clients.values().any(|c| normalize_email(&c.email) == email) {
            return Err(DomainError::Precondition(format!(
                "a client with email {} already exists",
                input.email
            )));
        }
        let client = Client {
            id: Uuid::new_v4(),
            name: input.name,
            address: input.address,
            vat_id: input.vat_id,
            phone: input.phone,
            email: input.email,
            notes: input.notes,
            last_order: None,
            created_at: Utc::now(),
        };
        clients.insert(client.id, client.clone());
        Ok(client)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, DomainError> {
        Ok(read(&self.clients)?.get(&id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Client>, DomainError> {
        let email = normalize_email(email);
        Ok(read(&self.clients)?
            .values()
            .find(|c| normalize_email(&c.email) == email)
            .cloned())
    }

    fn list(&self) -> Result<Vec<Client>, DomainError> {
        let mut clients: Vec<Client> = read(&self.clients)?.values().cloned().collect();
        clients.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(clients)
    }

    fn update(&self, id: Uuid, input: ClientInput) -> Result<Option<Client>, DomainError> {
        let mut clients = write(&self.clients)?;
        let email = normalize_email(&input.email);
        if clients
            .values()
            .any(|c| c.id != id && normalize_email(&c.email) == email)
        {
            return Err(DomainError::Precondition(format!(
                "a client with email {} already exists",
                input.email
            )));
        }
        Ok(clients.get_mut(&id).map(|c| {
            c.name = input.name;
            c.address = input.address;
            c.vat_id = input.vat_id;
            c.phone = input.phone;
            c.email = input.email;
            c.notes = input.notes;
            c.clone()
        }))
    }

    fn set_last_order(&self, id: Uuid, snapshot: OrderSnapshot) -> Result<(), DomainError> {
        if let Some(c) = write(&self.clients)?.get_mut(&id) {
            c.last_order = Some(snapshot);
        }
        Ok(())
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        Ok(write(&self.clients)?.remove(&id).is_some())
    }
}

// ── Items ────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryItemRepository {
    items: RwLock<HashMap<Uuid, Item>>,
}

impl ItemRepository for InMemoryItemRepository {
    fn create(&self, input: ItemInput) -> Result<Item, DomainError> {
        let item = Item {
            id: Uuid::new_v4(),
            name: input.name,
            category: input.category,
            unit_price: input.unit_price,
            weight_grams: input.weight_grams,
            picture_url: input.picture_url,
            description: input.description,
            created_at: Utc::now(),
        };
        write(&self.items)?.insert(item.id, item.clone());
        Ok(item)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Item>, DomainError> {
        Ok(read(&self.items)?.get(&id).cloned())
    }

    fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Item>, DomainError> {
        let items = read(&self.items)?;
        Ok(ids.iter().filter_map(|id| items.get(id).cloned()).collect())
    }

    fn list(&self) -> Result<Vec<Item>, DomainError> {
        let mut items: Vec<Item> = read(&self.items)?.values().cloned().collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    fn update(&self, id: Uuid, input: ItemInput) -> Result<Option<Item>, DomainError> {
        Ok(write(&self.items)?.get_mut(&id).map(|i| {
            i.name = input.name;
            i.category = input.category;
            i.unit_price = input.unit_price;
            i.weight_grams = input.weight_grams;
            i.picture_url = input.picture_url;
            i.description = input.description;
            i.clone()
        }))
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        Ok(write(&self.items)?.remove(&id).is_some())
    }
}

// ── Orders ───────────────────────────────────────────────────────────────────

/// Order store with switches to make individual calls fail.
#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<Vec<Order>>,
    fail_create: AtomicBool,
    fail_delete: AtomicBool,
    fail_single_delete: AtomicBool,
    deleted_elsewhere: Mutex<Vec<Uuid>>,
}

impl InMemoryOrderRepository {
    pub fn fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    /// Make `delete` and `delete_many` fail.
    pub fn fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    /// Make `delete` fail while `delete_many` keeps working.
    pub fn fail_single_delete(&self, fail: bool) {
        self.fail_single_delete.store(fail, Ordering::SeqCst);
    }

    /// Remove `id` just before the next `delete_many`, as if another request
    /// had deleted it first.
    pub fn delete_elsewhere_before_next_batch(&self, id: Uuid) {
        if let Ok(mut pending) = self.deleted_elsewhere.lock() {
            pending.push(id);
        }
    }

    fn check(&self, flag: &AtomicBool, op: &str) -> Result<(), DomainError> {
        if flag.load(Ordering::SeqCst) {
            return Err(DomainError::Remote(format!("{} failed", op)));
        }
        Ok(())
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn create(&self, order: NewOrder) -> Result<Order, DomainError> {
        self.check(&self.fail_create, "insert")?;
        let order = Order {
            id: order.id,
            client_id: order.client_id,
            lines: order.lines,
            delivery_date: order.delivery_date,
            status: order.status,
            notes: order.notes,
            total: order.total,
            merged_from: order.merged_from,
            created_at: Utc::now(),
        };
        write(&self.orders)?.push(order.clone());
        Ok(order)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        Ok(read(&self.orders)?.iter().find(|o| o.id == id).cloned())
    }

    fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Order>, DomainError> {
        Ok(read(&self.orders)?
            .iter()
            .filter(|o| ids.contains(&o.id))
            .cloned()
            .collect())
    }

    fn list(&self, filter: &OrderFilter, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        let orders = read(&self.orders)?;
        // Insertion order stands in for `created_at`, newest first.
        let matching: Vec<Order> = orders
            .iter()
            .rev()
            .filter(|o| filter.client_id.map_or(true, |id| o.client_id == id))
            .filter(|o| filter.status.map_or(true, |s| o.status == s))
            .cloned()
            .collect();
        let total = matching.len() as i64;
        let offset = ((page - 1) * limit).max(0) as usize;
        Ok(ListResult {
            items: matching
                .into_iter()
                .skip(offset)
                .take(limit.max(0) as usize)
                .collect(),
            total,
        })
    }

    fn list_all(&self) -> Result<Vec<Order>, DomainError> {
        Ok(read(&self.orders)?.clone())
    }

    fn list_merged(&self) -> Result<Vec<Order>, DomainError> {
        Ok(read(&self.orders)?
            .iter()
            .filter(|o| !o.merged_from.is_empty())
            .cloned()
            .collect())
    }

    fn update(&self, id: Uuid, changes: OrderChanges) -> Result<Option<Order>, DomainError> {
        Ok(write(&self.orders)?.iter_mut().find(|o| o.id == id).map(|o| {
            o.lines = changes.lines;
            o.delivery_date = changes.delivery_date;
            o.status = changes.status;
            o.notes = changes.notes;
            o.total = changes.total;
            o.clone()
        }))
    }

    fn set_status(&self, id: Uuid, status: OrderStatus) -> Result<Option<Order>, DomainError> {
        Ok(write(&self.orders)?.iter_mut().find(|o| o.id == id).map(|o| {
            o.status = status;
            o.clone()
        }))
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        self.check(&self.fail_delete, "delete")?;
        self.check(&self.fail_single_delete, "delete")?;
        let mut orders = write(&self.orders)?;
        let before = orders.len();
        orders.retain(|o| o.id != id);
        Ok(orders.len() < before)
    }

    fn delete_many(&self, ids: &[Uuid]) -> Result<usize, DomainError> {
        self.check(&self.fail_delete, "delete")?;
        let mut orders = write(&self.orders)?;
        if let Ok(mut gone) = self.deleted_elsewhere.lock() {
            orders.retain(|o| !gone.contains(&o.id));
            gone.clear();
        }
        let before = orders.len();
        orders.retain(|o| !ids.contains(&o.id));
        Ok(before - orders.len())
    }
}

// ── Notifications ────────────────────────────────────────────────────────────

/// Keeps every notification it is given; optionally reports failure anyway.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<OrderNotification>>,
    fail: AtomicBool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        let n = Self::default();
        n.fail.store(true, Ordering::SeqCst);
        n
    }

    pub fn sent(&self) -> Vec<OrderNotification> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl OrderNotifier for RecordingNotifier {
    async fn notify(&self, notification: &OrderNotification) -> Result<(), DomainError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(notification.clone());
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::Remote("gateway returned 500".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    use super::*;

    fn client_input(email: &str) -> ClientInput {
        ClientInput {
            name: "Bistro".to_string(),
            address: "Brno".to_string(),
            vat_id: "CZ1".to_string(),
            phone: "1".to_string(),
            email: email.to_string(),
            notes: None,
        }
    }

    #[test]
    fn client_email_lookup_is_case_insensitive() {
        let repo = InMemoryClientRepository::default();
        let c = repo.create(client_input("Shop@Example.cz")).expect("create");
        let found = repo.find_by_email("shop@example.CZ").expect("find");
        assert_eq!(found.map(|f| f.id), Some(c.id));
        assert!(repo.create(client_input("SHOP@example.cz")).is_err());
    }

    #[test]
    fn failing_delete_leaves_orders_in_place() {
        let repo = InMemoryOrderRepository::default();
        let order = repo
            .create(NewOrder {
                id: Uuid::new_v4(),
                client_id: Uuid::new_v4(),
                lines: vec![],
                delivery_date: NaiveDate::from_ymd_opt(2026, 10, 20).expect("date"),
                status: OrderStatus::Pending,
                notes: None,
                total: BigDecimal::from(0),
                merged_from: vec![],
            })
            .expect("create");
        repo.fail_delete(true);
        assert!(repo.delete_many(&[order.id]).is_err());
        assert!(repo.find_by_id(order.id).expect("find").is_some());
    }

    #[test]
    fn batch_delete_counts_only_rows_it_removed() {
        let repo = InMemoryOrderRepository::default();
        let ids: Vec<Uuid> = (0..2)
            .map(|_| {
                repo.create(NewOrder {
                    id: Uuid::new_v4(),
                    client_id: Uuid::new_v4(),
                    lines: vec![],
                    delivery_date: NaiveDate::from_ymd_opt(2026, 10, 20).expect("date"),
                    status: OrderStatus::Pending,
                    notes: None,
                    total: BigDecimal::from(0),
                    merged_from: vec![],
                })
                .expect("create")
                .id
            })
            .collect();

        repo.delete_elsewhere_before_next_batch(ids[1]);
        assert_eq!(repo.delete_many(&ids).expect("delete"), 1);
        assert!(repo.list_all().expect("list").is_empty());
    }
}
